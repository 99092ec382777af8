//! Python checks.

use super::{declared_names, CheckContext};
use crate::cleanup::python::block_headers;
use crate::error::Result;
use crate::models::{Issue, IssueKind, Location, Severity};
use crate::tokenizer::TokenKind;

/// Blank lines expected between the top-level imports and the code after them.
const BLANK_LINES_AFTER_IMPORTS: usize = 2;

pub fn imports(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let rules = &ctx.rules.imports;
    let first_party = rules.groups.len();
    let mut highest = 0;
    for i in ctx.line_heads() {
        if !toks[i].is_any(&["import", "from"]) {
            continue;
        }
        let mut module = String::new();
        for tok in toks.iter().skip(i + 1) {
            if tok.is_any(&["import", ",", "as"]) || tok.kind == TokenKind::Comment {
                break;
            }
            if ctx.line_index.line_of(tok.start) != ctx.line_of_token(i) - 1 {
                break;
            }
            module.push_str(tok.text);
        }
        if module.is_empty() {
            continue;
        }
        let rank = if module.starts_with('.') { first_party } else { rules.rank(&module) };
        if rank < highest {
            out.push(Issue::note(
                IssueKind::ImportOrder,
                Location::Line(ctx.line_of_token(i)),
                format!(
                    "Import '{}' ({}) should come before {} imports",
                    module,
                    rules.group_name(rank),
                    rules.group_name(highest)
                ),
                Severity::Medium,
            ));
        }
        highest = highest.max(rank);
    }
    Ok(())
}

pub fn class_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    declared_names(
        ctx,
        out,
        &["class"],
        &ctx.rules.naming.class,
        IssueKind::ClassNaming,
        "Class",
        Severity::High,
    )
}

pub fn function_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let Some(pattern) = ctx.rules.naming.function.as_deref() else {
        return Ok(());
    };
    declared_names(
        ctx,
        out,
        &["def"],
        pattern,
        IssueKind::FunctionNaming,
        "Function",
        Severity::Medium,
    )
}

/// A statement after a block colon on the header's line.
///
/// The fix moves the body to its own line one level deeper; the cleanup
/// pass re-derives the final indentation.
pub fn inline_block_body(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let step = ctx.rules.indentation.size;
    for header in block_headers(ctx.text, toks) {
        let Some(body) = header.inline_body else {
            continue;
        };
        let head = ctx.slice(header.start, header.colon);
        let first = toks[body].text;
        out.push(
            Issue::fixable(
                IssueKind::InlineBlockBody,
                body,
                format!("Statement after '{}' header belongs on its own line", toks[header.start].text),
                ctx.slice(header.start, body),
                format!("{head}\n{}{first}", " ".repeat(header.indent + step)),
                Severity::Medium,
            )
            .with_tokens([":", first]),
        );
    }
    Ok(())
}

/// Start of a logical line: a line head outside any bracket or continuation.
fn statement_head(ctx: &CheckContext<'_>, i: usize) -> bool {
    let toks = ctx.tokens;
    ctx.shape.enclosing[i].is_none() && !toks[i].is_closer() && (i == 0 || !toks[i - 1].is("\\"))
}

fn at_column_zero(ctx: &CheckContext<'_>, i: usize) -> bool {
    ctx.gap_before(i).rsplit('\n').next().unwrap_or("").is_empty()
}

/// Top-level imports are followed by two blank lines before other code.
pub fn import_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let heads: Vec<usize> = ctx.line_heads().filter(|&i| statement_head(ctx, i)).collect();
    let top_import = |i: usize| at_column_zero(ctx, i) && toks[i].is_any(&["import", "from"]);
    for pair in heads.windows(2) {
        let (last, next) = (pair[0], pair[1]);
        if !top_import(last) || top_import(next) || toks[next].kind == TokenKind::Comment {
            continue;
        }
        let blank = ctx.gap_before(next).matches('\n').count().saturating_sub(1);
        if blank != BLANK_LINES_AFTER_IMPORTS {
            out.push(Issue::note(
                IssueKind::ImportSpacing,
                Location::Line(ctx.line_of_token(next)),
                format!(
                    "Expected {} blank lines after imports, found {}",
                    BLANK_LINES_AFTER_IMPORTS, blank
                ),
                Severity::Low,
            ));
        }
    }
    Ok(())
}

/// Double-quoted strings that could use single quotes.
pub fn quotes(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    if !ctx.rules.prefer_single_quotes {
        return Ok(());
    }
    for (i, tok) in ctx.tokens.iter().enumerate() {
        if tok.kind != TokenKind::Str {
            continue;
        }
        let body = tok.text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if !body.starts_with('"') || body.starts_with("\"\"\"") || body.contains('\'') {
            continue;
        }
        out.push(
            Issue::note(
                IssueKind::PreferSingleQuotes,
                Location::Token(i),
                format!("Prefer single quotes for {}", tok.text),
                Severity::Low,
            )
            .with_tokens([tok.text]),
        );
    }
    Ok(())
}
