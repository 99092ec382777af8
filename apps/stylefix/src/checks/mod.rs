//! Issue detection.
//!
//! Every check is a plain function over a shared `CheckContext`. Generic
//! token checks run for every language, line checks next, and each
//! language adds its own table. A failing check stops detection for the
//! file; the issues gathered so far are still returned.

pub mod cpp;
pub mod generic;
pub mod java;
pub mod lines;
pub mod python;

use regex::Regex;
use std::collections::HashSet;

use crate::error::{Result, StyleError};
use crate::models::{Issue, IssueKind, Language, Location, RuleSet, Severity};
use crate::shape::{gap_before, LineIndex, Shape};
use crate::tokenizer::Token;

pub type Check = fn(&CheckContext<'_>, &mut Vec<Issue>) -> Result<()>;

const GENERIC_CHECKS: &[(&str, Check)] = &[
    ("operator-spacing", generic::operator_spacing),
    ("colon-spacing", generic::colon_spacing),
    ("comma-spacing", generic::comma_spacing),
    ("bracket-spacing", generic::bracket_spacing),
    ("semicolon-spacing", generic::semicolon_spacing),
    ("keyword-spacing", generic::keyword_spacing),
    ("blank-lines", lines::consecutive_blank_lines),
    ("trailing-whitespace", lines::trailing_whitespace),
    ("line-length", lines::line_length),
    ("indentation", lines::indentation),
];

const JAVA_CHECKS: &[(&str, Check)] = &[
    ("brace-spacing", generic::brace_spacing),
    ("imports", java::imports),
    ("package-naming", java::package_naming),
    ("class-naming", java::class_naming),
    ("method-naming", java::method_naming),
    ("modifier-order", java::modifier_order),
    ("annotation-spacing", java::annotation_spacing),
    ("array-declaration", java::array_declaration),
];

const PYTHON_CHECKS: &[(&str, Check)] = &[
    ("inline-block-body", python::inline_block_body),
    ("imports", python::imports),
    ("import-spacing", python::import_spacing),
    ("class-naming", python::class_naming),
    ("function-naming", python::function_naming),
    ("quotes", python::quotes),
];

const CPP_CHECKS: &[(&str, Check)] = &[
    ("brace-spacing", generic::brace_spacing),
    ("include-order", cpp::include_order),
    ("include-guard", cpp::include_guard),
    ("namespace-brace", cpp::namespace_brace),
    ("pointer-spacing", cpp::pointer_spacing),
    ("class-naming", cpp::class_naming),
    ("function-naming", cpp::function_naming),
];

pub struct CheckContext<'a> {
    pub text: &'a str,
    pub tokens: &'a [Token<'a>],
    pub language: Language,
    pub rules: &'a RuleSet,
    pub shape: Shape,
    pub lines: Vec<&'a str>,
    pub line_index: LineIndex,
    /// Lines whose start lies inside a multi-line literal, comment or directive.
    pub interior: Vec<bool>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        tokens: &'a [Token<'a>],
        text: &'a str,
        language: Language,
        rules: &'a RuleSet,
    ) -> Self {
        let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
        let line_index = LineIndex::new(text);
        let mut interior = vec![false; lines.len()];
        for tok in tokens.iter().filter(|t| t.text.contains('\n')) {
            let first = line_index.line_of(tok.start);
            let last = line_index.line_of(tok.end.saturating_sub(1));
            for flag in interior.iter_mut().take(last + 1).skip(first + 1) {
                *flag = true;
            }
        }
        CheckContext {
            text,
            tokens,
            language,
            rules,
            shape: Shape::analyze(tokens, language),
            lines,
            line_index,
            interior,
        }
    }

    pub fn gap_before(&self, i: usize) -> &'a str {
        gap_before(self.text, self.tokens, i)
    }

    /// Horizontal or vertical whitespace precedes token `i`.
    pub fn spaced_before(&self, i: usize) -> bool {
        !self.gap_before(i).is_empty()
    }

    pub fn spaced_after(&self, i: usize) -> bool {
        i + 1 >= self.tokens.len() || !self.gap_before(i + 1).is_empty()
    }

    /// Token `i + 1` exists on the same line as token `i`.
    pub fn same_line_next(&self, i: usize) -> bool {
        i + 1 < self.tokens.len() && !self.gap_before(i + 1).contains('\n')
    }

    /// Source text covering tokens `from..=to`.
    pub fn slice(&self, from: usize, to: usize) -> &'a str {
        let start = self.tokens[from].start;
        let end = self.tokens[to].end;
        self.text.get(start..end).unwrap_or("")
    }

    /// 1-based line of token `i`.
    pub fn line_of_token(&self, i: usize) -> usize {
        self.line_index.line_of(self.tokens[i].start) + 1
    }

    /// Indices of tokens that start their line.
    pub fn line_heads(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.tokens.len()).filter(move |i| *i == 0 || self.gap_before(*i).contains('\n'))
    }
}

/// Run every check for `language` and return the deduplicated issues.
pub fn detect(tokens: &[Token<'_>], text: &str, language: Language, rules: &RuleSet) -> Vec<Issue> {
    let ctx = CheckContext::new(tokens, text, language, rules);
    let specific = match language {
        Language::Java => JAVA_CHECKS,
        Language::Python => PYTHON_CHECKS,
        Language::Cpp => CPP_CHECKS,
    };

    let mut issues = Vec::new();
    let tagged_from;
    match run_table(&ctx, GENERIC_CHECKS, &mut issues) {
        Ok(()) => {
            tagged_from = issues.len();
            if let Err(e) = run_table(&ctx, specific, &mut issues) {
                tracing::warn!(%language, error = %e, "detection stopped early");
            }
        }
        Err(e) => {
            tagged_from = issues.len();
            tracing::warn!(%language, error = %e, "detection stopped early");
        }
    }
    for issue in issues.iter_mut().skip(tagged_from) {
        issue.language = Some(language);
    }

    let found = issues.len();
    let issues = dedupe(issues);
    tracing::debug!(%language, tokens = tokens.len(), found, kept = issues.len(), "detection done");
    issues
}

fn run_table(ctx: &CheckContext<'_>, table: &[(&str, Check)], out: &mut Vec<Issue>) -> Result<()> {
    for (name, check) in table {
        let before = out.len();
        check(ctx, out)?;
        tracing::trace!(check = name, issues = out.len() - before, "check ran");
    }
    Ok(())
}

/// Keep the first issue for each (kind, old, new, location).
pub fn dedupe(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen: HashSet<(IssueKind, Option<String>, Option<String>, Location)> = HashSet::new();
    issues
        .into_iter()
        .filter(|is| {
            seen.insert((
                is.kind,
                is.old_pattern.clone(),
                is.new_pattern.clone(),
                is.location,
            ))
        })
        .collect()
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| StyleError::invalid_pattern(pattern, e))
}

/// Flag names declared right after one of `introducers` that do not match `pattern`.
pub(crate) fn declared_names(
    ctx: &CheckContext<'_>,
    out: &mut Vec<Issue>,
    introducers: &[&str],
    pattern: &str,
    kind: IssueKind,
    what: &str,
    severity: Severity,
) -> Result<()> {
    let re = compile(pattern)?;
    let toks = ctx.tokens;
    for i in 0..toks.len().saturating_sub(1) {
        if !toks[i].is_any(introducers) {
            continue;
        }
        // `Foo.class`, `template <class T>`
        if i > 0 && (toks[i - 1].is(".") || ctx.shape.angle[i - 1] || ctx.shape.in_angle[i]) {
            continue;
        }
        let name = &toks[i + 1];
        if name.kind != crate::tokenizer::TokenKind::Identifier || re.is_match(name.text) {
            continue;
        }
        out.push(
            Issue::note(
                kind,
                Location::Token(i + 1),
                format!("{} name '{}' does not match {}", what, name.text, pattern),
                severity,
            )
            .with_tokens([toks[i].text, name.text]),
        );
    }
    Ok(())
}
