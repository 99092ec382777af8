//! Physical-line checks: blank runs, trailing whitespace, length and indentation.

use std::collections::HashMap;

use super::CheckContext;
use crate::error::Result;
use crate::models::{Issue, IssueKind, Language, Location, Severity};
use crate::tokenizer::TokenKind;

fn allowed_blank_run(language: Language) -> usize {
    match language {
        Language::Python => 2,
        _ => 1,
    }
}

pub fn consecutive_blank_lines(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let allowed = allowed_blank_run(ctx.language);
    let mut run = 0;
    // the empty tail after a final newline is not a blank line
    let count = match ctx.lines.last() {
        Some(last) if last.is_empty() => ctx.lines.len() - 1,
        _ => ctx.lines.len(),
    };
    for (n, line) in ctx.lines.iter().take(count).enumerate() {
        if line.trim().is_empty() && !ctx.interior[n] {
            run += 1;
            if run == allowed + 1 {
                out.push(Issue::note(
                    IssueKind::ConsecutiveBlankLines,
                    Location::Line(n + 1),
                    format!("More than {allowed} consecutive blank lines"),
                    Severity::Low,
                ));
            }
        } else {
            run = 0;
        }
    }
    Ok(())
}

pub fn trailing_whitespace(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    for (n, line) in ctx.lines.iter().enumerate() {
        if ctx.interior.get(n + 1).copied().unwrap_or(false) {
            // a literal or comment continues past this line end
            continue;
        }
        if line.ends_with([' ', '\t']) && !line.trim().is_empty() {
            out.push(Issue::note(
                IssueKind::TrailingWhitespace,
                Location::Line(n + 1),
                "Trailing whitespace",
                Severity::Low,
            ));
        }
    }
    Ok(())
}

fn is_comment_line(trimmed: &str, language: Language) -> bool {
    match language {
        Language::Python => trimmed.starts_with('#'),
        _ => trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*'),
    }
}

pub fn line_length(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let limit = ctx.rules.line_length;
    for (n, line) in ctx.lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if ctx.interior[n]
            || is_comment_line(trimmed, ctx.language)
            || trimmed.contains("\"\"\"")
            || trimmed.contains("'''")
        {
            continue;
        }
        let width = line.chars().count();
        if width > limit {
            out.push(Issue::note(
                IssueKind::LineTooLong,
                Location::Line(n + 1),
                format!("Line too long ({width} > {limit})"),
                Severity::Low,
            ));
        }
    }
    Ok(())
}

pub fn indentation(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let heads: HashMap<usize, usize> = ctx
        .line_heads()
        .map(|i| (ctx.line_of_token(i) - 1, i))
        .collect();
    let size = ctx.rules.indentation.size.max(1);
    for (n, line) in ctx.lines.iter().enumerate() {
        if line.trim().is_empty() || ctx.interior[n] || line.trim_start().starts_with('*') {
            continue;
        }
        if let Some(&head) = heads.get(&n) {
            let tok = &ctx.tokens[head];
            let continuation = match ctx.shape.enclosing_text(ctx.tokens, head) {
                Some("(") | Some("[") => true,
                Some("{") => ctx.language == Language::Python,
                _ => false,
            };
            if continuation || (tok.kind == TokenKind::Directive && ctx.language == Language::Cpp) {
                continue;
            }
        }
        let indent: &str = &line[..line.len() - line.trim_start().len()];
        if indent.contains('\t') {
            if !ctx.rules.indentation.use_tabs {
                out.push(Issue::note(
                    IssueKind::TabIndentation,
                    Location::Line(n + 1),
                    "Tab used for indentation",
                    Severity::Medium,
                ));
            }
            continue;
        }
        if indent.len() % size != 0 {
            out.push(Issue::note(
                IssueKind::IndentationNotMultiple,
                Location::Line(n + 1),
                format!("Indentation of {} is not a multiple of {size}", indent.len()),
                Severity::Medium,
            ));
        }
    }
    Ok(())
}
