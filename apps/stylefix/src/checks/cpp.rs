//! C++ checks.

use super::{compile, declared_names, CheckContext};
use crate::error::Result;
use crate::models::rules::BracePlacement;
use crate::models::{Issue, IssueKind, Location, Severity};
use crate::tokenizer::TokenKind;

const GUARD_WINDOW: usize = 10;

const TYPE_KEYWORDS: &[&str] = &[
    "void", "int", "char", "bool", "float", "double", "long", "short", "unsigned", "signed", "auto",
];

/// Target of an `#include` directive, `<...>` or `"..."`.
fn include_target(directive: &str) -> Option<&str> {
    let rest = directive.trim_start_matches('#').trim_start();
    let rest = rest.strip_prefix("include")?.trim();
    Some(rest.split("//").next().unwrap_or(rest).trim())
}

pub fn include_order(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let rules = &ctx.rules.imports;
    let mut highest = 0;
    for (i, tok) in ctx.tokens.iter().enumerate() {
        if tok.kind != TokenKind::Directive {
            continue;
        }
        let Some(target) = include_target(tok.text) else {
            continue;
        };
        let rank = rules.rank(target);
        if rank < highest {
            out.push(Issue::note(
                IssueKind::IncludeOrder,
                Location::Line(ctx.line_of_token(i)),
                format!(
                    "Include {} ({}) should come before {} includes",
                    target,
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

pub fn include_guard(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let directives: Vec<(usize, &str)> = ctx
        .tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Directive)
        .map(|(i, t)| (ctx.line_of_token(i), t.text))
        .collect();
    let has_includes = directives.iter().any(|(_, d)| include_target(d).is_some());
    if !has_includes {
        return Ok(());
    }
    let guarded = directives.iter().any(|(line, d)| {
        let body: String = d.trim_start_matches('#').split_whitespace().collect::<Vec<_>>().join(" ");
        *line <= GUARD_WINDOW && (body.starts_with("ifndef ") || body == "pragma once")
    });
    if !guarded {
        out.push(Issue::note(
            IssueKind::IncludeGuard,
            Location::Line(1),
            "Missing include guard or #pragma once",
            Severity::Low,
        ));
    }
    Ok(())
}

/// Opening brace of a `namespace` block placed by the namespace brace rule.
pub fn namespace_brace(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let placement = ctx.rules.braces.namespace;
    for i in 0..toks.len() {
        if !toks[i].is("namespace") || (i > 0 && toks[i - 1].is("using")) {
            continue;
        }
        // `namespace fs = std::filesystem;` has no block
        let Some(brace) = (i + 1..toks.len())
            .take_while(|&j| !toks[j].is_any(&[";", "="]))
            .find(|&j| toks[j].is("{"))
        else {
            continue;
        };
        let same_line = ctx.line_of_token(brace) == ctx.line_of_token(i);
        let wanted = match placement {
            BracePlacement::SameLine if !same_line => "on the same line",
            BracePlacement::NextLine if same_line => "on the next line",
            _ => continue,
        };
        out.push(Issue::note(
            IssueKind::NamespaceBrace,
            Location::Line(ctx.line_of_token(brace)),
            format!("Namespace opening brace should be {wanted}"),
            Severity::Medium,
        ));
    }
    Ok(())
}

/// `int *p` and `int * p` become `int* p`.
pub fn pointer_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    if !ctx.rules.spacing.pointer_left {
        return Ok(());
    }
    let toks = ctx.tokens;
    for i in 1..toks.len().saturating_sub(1) {
        if !ctx.shape.declarator[i] || toks[i + 1].kind != TokenKind::Identifier {
            continue;
        }
        if !ctx.spaced_before(i) || !ctx.same_line_next(i) || ctx.gap_before(i).contains('\n') {
            continue;
        }
        let (ty, star, name) = (toks[i - 1].text, toks[i].text, toks[i + 1].text);
        out.push(
            Issue::fixable(
                IssueKind::PointerSpacing,
                i,
                format!("Attach '{star}' to the type"),
                ctx.slice(i - 1, i + 1),
                format!("{ty}{star} {name}"),
                Severity::Low,
            )
            .with_tokens([ty, star, name]),
        );
    }
    Ok(())
}

pub fn class_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    declared_names(
        ctx,
        out,
        &["class", "struct"],
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
    let re = compile(pattern)?;
    let toks = ctx.tokens;
    for i in 1..toks.len().saturating_sub(1) {
        let (prev, name) = (&toks[i - 1], &toks[i]);
        if name.kind != TokenKind::Identifier || !toks[i + 1].is("(") {
            continue;
        }
        let type_like = prev.is_any(TYPE_KEYWORDS)
            || ctx.shape.declarator[i - 1]
            || (ctx.shape.angle[i - 1] && prev.text.starts_with('>'))
            || (prev.kind == TokenKind::Identifier && prev.text.ends_with("_t"))
            || prev.is_any(&["string", "size_t"]);
        if !type_like || name.is("main") || re.is_match(name.text) {
            continue;
        }
        out.push(
            Issue::note(
                IssueKind::FunctionNaming,
                Location::Token(i),
                format!("Function name '{}' does not match {}", name.text, pattern),
                Severity::Medium,
            )
            .with_tokens([prev.text, name.text]),
        );
    }
    Ok(())
}
