//! Token checks shared by every language.

use std::collections::HashSet;

use super::CheckContext;
use crate::cleanup::python::block_headers;
use crate::error::Result;
use crate::models::{Issue, IssueKind, Language, RuleSet, Severity};
use crate::shape::ColonRole;
use crate::tokenizer::{Token, TokenKind};

/// Binary operators need whitespace on both sides.
pub fn operator_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 1..toks.len().saturating_sub(1) {
        let tok = &toks[i];
        if tok.kind != TokenKind::Operator || !ctx.rules.spaced_operator(tok.text) {
            continue;
        }
        if ctx.shape.operator_exempt(i) || toks[i - 1].is(".") {
            continue;
        }
        if ctx.language == Language::Python
            && tok.is("=")
            && ctx.shape.enclosing_text(toks, i) == Some("(")
        {
            continue;
        }
        if ctx.spaced_before(i) && ctx.spaced_after(i) {
            continue;
        }
        out.push(spaced_triple(
            ctx,
            i,
            IssueKind::MissingSpacesAroundOperator,
            format!("Missing spaces around operator '{}'", tok.text),
        ));
    }
    Ok(())
}

fn spaced_triple(ctx: &CheckContext<'_>, i: usize, kind: IssueKind, description: String) -> Issue {
    let toks = ctx.tokens;
    let (prev, op, next) = (&toks[i - 1], &toks[i], &toks[i + 1]);
    Issue::fixable(
        kind,
        i,
        description,
        ctx.slice(i - 1, i + 1),
        format!("{} {} {}", prev.text, op.text, next.text),
        Severity::Medium,
    )
    .with_tokens([prev.text, op.text, next.text])
}

/// Python colons take no space before; C-family colons take one on each side.
pub fn colon_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let block: HashSet<usize> = match ctx.language {
        Language::Python => block_headers(ctx.text, toks).iter().map(|h| h.colon).collect(),
        _ => HashSet::new(),
    };
    for i in 1..toks.len() {
        if !toks[i].is(":") {
            continue;
        }
        let gap = ctx.gap_before(i);
        if ctx.language == Language::Python {
            if !gap.is_empty() && !gap.contains('\n') {
                let prev = toks[i - 1].text;
                out.push(
                    Issue::fixable(
                        IssueKind::ExtraSpaceBeforeColon,
                        i,
                        "Extra space before colon",
                        format!("{prev}{gap}:"),
                        format!("{prev}:"),
                        Severity::Low,
                    )
                    .with_tokens([prev, ":"]),
                );
            }
            if !block.contains(&i) && python_colon_wants_space(ctx, i) {
                let (prev, next) = (toks[i - 1].text, toks[i + 1].text);
                out.push(
                    Issue::fixable(
                        IssueKind::MissingSpaceAfterColon,
                        i,
                        "Missing space after ':'",
                        ctx.slice(i - 1, i + 1),
                        format!("{prev}: {next}"),
                        Severity::Low,
                    )
                    .with_tokens([prev, ":", next]),
                );
            }
            continue;
        }
        if i + 1 >= toks.len() || ctx.spaced_before(i) || ctx.spaced_after(i) {
            continue;
        }
        let what = match ctx.shape.colon[i] {
            Some(ColonRole::Spaced) => "Missing spaces around ':'",
            _ => "Missing space around label colon",
        };
        out.push(spaced_triple(ctx, i, IssueKind::MissingSpacesAroundOperator, what.to_string()));
    }
    Ok(())
}

/// Mapping, annotation and lambda colons take one space after; slices none.
fn python_colon_wants_space(ctx: &CheckContext<'_>, i: usize) -> bool {
    if ctx.spaced_after(i) {
        return false;
    }
    let toks = ctx.tokens;
    let next = &toks[i + 1];
    if next.is_closer() || next.is_any(&[",", ";", ":"]) || next.kind == TokenKind::Comment {
        return false;
    }
    let Some(open) = ctx.shape.enclosing[i].filter(|&o| toks[o].is("[")) else {
        return true;
    };
    // `x[lambda a:a]` still wants the space
    let mut lambdas = 0i32;
    for j in open + 1..i {
        if ctx.shape.enclosing[j] != Some(open) {
            continue;
        }
        if toks[j].is("lambda") {
            lambdas += 1;
        } else if toks[j].is(":") {
            lambdas -= 1;
        }
    }
    lambdas > 0
}

/// Same-line whitespace before token `i`, which should hug whatever precedes it.
fn extra_space_before(ctx: &CheckContext<'_>, i: usize, kind: IssueKind) -> Option<Issue> {
    let toks = ctx.tokens;
    let gap = ctx.gap_before(i);
    let prev = &toks[i - 1];
    if gap.is_empty() || gap.contains('\n') || prev.is_opener() || prev.is_any(&[",", ";"]) {
        return None;
    }
    if matches!(prev.kind, TokenKind::Comment | TokenKind::Directive) {
        return None;
    }
    let (prev, tok) = (prev.text, toks[i].text);
    Some(
        Issue::fixable(
            kind,
            i,
            format!("Extra space before '{tok}'"),
            ctx.slice(i - 1, i),
            format!("{prev}{tok}"),
            Severity::Low,
        )
        .with_tokens([prev, tok]),
    )
}

pub fn comma_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 1..toks.len() {
        if !toks[i].is(",") {
            continue;
        }
        out.extend(extra_space_before(ctx, i, IssueKind::ExtraSpaceBeforeComma));
        if !ctx.rules.spacing.after_commas
            || i + 1 >= toks.len()
            || ctx.spaced_after(i)
            || toks[i + 1].is_closer()
        {
            continue;
        }
        let (prev, next) = (toks[i - 1].text, toks[i + 1].text);
        out.push(
            Issue::fixable(
                IssueKind::MissingSpaceAfterComma,
                i,
                "Missing space after comma",
                ctx.slice(i - 1, i + 1),
                format!("{prev}, {next}"),
                Severity::Low,
            )
            .with_tokens([prev, ",", next]),
        );
    }
    Ok(())
}

/// Starts an array initializer element: a literal or a negative number.
fn initializer_element(toks: &[Token<'_>], i: usize) -> bool {
    toks.get(i).is_some_and(|t| {
        t.is_literal() || (t.is("-") && toks.get(i + 1).is_some_and(|n| n.kind == TokenKind::Number))
    })
}

/// No whitespace just inside parentheses; braces depend on the language.
pub fn bracket_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 0..toks.len() {
        let tok = &toks[i];
        let opener = tok.is("(") || tok.is("{");
        if opener
            && ctx.same_line_next(i)
            && ctx.spaced_after(i)
            && !toks[i + 1].is_closer()
            && toks[i + 1].kind != TokenKind::Comment
        {
            let flag = tok.is("(")
                || ctx.language == Language::Python
                || initializer_element(toks, i + 1);
            if flag {
                let kind = if tok.is("(") {
                    IssueKind::ExtraSpaceAfterOpeningParen
                } else {
                    IssueKind::ExtraSpaceAfterOpeningBrace
                };
                let next = toks[i + 1].text;
                out.push(
                    Issue::fixable(
                        kind,
                        i,
                        format!("Extra space after '{}'", tok.text),
                        ctx.slice(i, i + 1),
                        format!("{}{}", tok.text, next),
                        Severity::Low,
                    )
                    .with_tokens([tok.text, next]),
                );
            }
        }
        // `print (x)`
        if ctx.language == Language::Python
            && tok.is("(")
            && i > 0
            && toks[i - 1].kind == TokenKind::Identifier
        {
            out.extend(extra_space_before(ctx, i, IssueKind::ExtraSpaceBeforeParen));
        }
        if tok.is(")") && i > 0 && !toks[i - 1].is("(") {
            let gap = ctx.gap_before(i);
            if !gap.is_empty() && !gap.contains('\n') && toks[i - 1].kind != TokenKind::Comment {
                let prev = toks[i - 1].text;
                out.push(
                    Issue::fixable(
                        IssueKind::ExtraSpaceBeforeClosingParen,
                        i,
                        "Extra space before ')'",
                        ctx.slice(i - 1, i),
                        format!("{prev})"),
                        Severity::Low,
                    )
                    .with_tokens([prev, ")"]),
                );
            }
        }
    }
    Ok(())
}

pub fn semicolon_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 1..toks.len() {
        if !toks[i].is(";") {
            continue;
        }
        out.extend(extra_space_before(ctx, i, IssueKind::ExtraSpaceBeforeSemicolon));
        if i + 1 >= toks.len() || ctx.spaced_after(i) || toks[i + 1].is_any(&[")", "}", ";"]) {
            continue;
        }
        let (prev, next) = (toks[i - 1].text, toks[i + 1].text);
        out.push(
            Issue::fixable(
                IssueKind::MissingSpaceAfterSemicolon,
                i,
                "Missing space after semicolon",
                ctx.slice(i - 1, i + 1),
                format!("{prev}; {next}"),
                Severity::Low,
            )
            .with_tokens([prev, ";", next]),
        );
    }
    Ok(())
}

/// `if(` and friends, plus `else{` in brace languages.
pub fn keyword_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 0..toks.len().saturating_sub(1) {
        let tok = &toks[i];
        if !matches!(tok.kind, TokenKind::Keyword | TokenKind::Identifier) || ctx.spaced_after(i) {
            continue;
        }
        let next = &toks[i + 1];
        if ctx.language != Language::Python && tok.is("else") {
            if next.is("{") {
                out.push(
                    Issue::fixable(
                        IssueKind::MissingSpaceBeforeBraceAfterElse,
                        i,
                        "Missing space between 'else' and '{'",
                        "else{",
                        "else {",
                        Severity::Medium,
                    )
                    .with_tokens(["else", "{"]),
                );
            } else if !next.is("if") && next.kind != TokenKind::Comment {
                out.push(
                    Issue::fixable(
                        IssueKind::MissingSpaceAfterElse,
                        i,
                        "Missing space after 'else'",
                        ctx.slice(i, i + 1),
                        format!("else {}", next.text),
                        Severity::Medium,
                    )
                    .with_tokens(["else", next.text]),
                );
            }
            continue;
        }
        if next.is("(") && ctx.rules.spaces_after_keyword(tok.text) {
            out.push(
                Issue::fixable(
                    IssueKind::MissingSpaceAfterKeyword,
                    i,
                    format!("Missing space after keyword '{}'", tok.text),
                    format!("{}(", tok.text),
                    format!("{} (", tok.text),
                    Severity::Medium,
                )
                .with_tokens([tok.text, "("]),
            );
        }
    }
    Ok(())
}

fn brace_policy_applies(rules: &RuleSet, prev: &Token<'_>) -> bool {
    use crate::models::rules::BracePlacement::SameLine;
    if prev.is(")") {
        rules.braces.method == SameLine || rules.braces.control == SameLine
    } else {
        rules.braces.class == SameLine
    }
}

/// Space before `{` after names and `)`, space after `{` unless it closes at once.
pub fn brace_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 0..toks.len() {
        if !toks[i].is("{") {
            continue;
        }
        if i > 0 && !ctx.spaced_before(i) && brace_policy_applies(ctx.rules, &toks[i - 1]) {
            let prev = &toks[i - 1];
            let kind = if prev.is(")") {
                Some(IssueKind::MissingSpaceBeforeMethodBrace)
            } else if matches!(prev.kind, TokenKind::Identifier | TokenKind::Keyword) && !prev.is("else") {
                Some(IssueKind::MissingSpaceBeforeClassBrace)
            } else {
                None
            };
            if let Some(kind) = kind {
                out.push(
                    Issue::fixable(
                        kind,
                        i,
                        format!("Missing space between '{}' and '{{'", prev.text),
                        format!("{}{{", prev.text),
                        format!("{} {{", prev.text),
                        Severity::Medium,
                    )
                    .with_tokens([prev.text, "{"]),
                );
            }
        }
        let opens_block = i + 1 < toks.len()
            && !ctx.spaced_after(i)
            && !toks[i + 1].is("}")
            && !initializer_element(toks, i + 1)
            && toks[i + 1].kind != TokenKind::Comment;
        if opens_block {
            let next = toks[i + 1].text;
            out.push(
                Issue::fixable(
                    IssueKind::MissingSpaceAfterOpeningBrace,
                    i,
                    "Missing space after '{'",
                    format!("{{{next}"),
                    format!("{{ {next}"),
                    Severity::Low,
                )
                .with_tokens(["{", next]),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::checks::tests::run;
    use crate::models::{IssueKind, Language};

    fn kinds(language: Language, text: &str) -> Vec<(IssueKind, String, String)> {
        run(language, text)
            .into_iter()
            .filter(|i| i.is_fixable())
            .map(|i| (i.kind, i.old_pattern.unwrap(), i.new_pattern.unwrap()))
            .collect()
    }

    #[test]
    fn test_operator_spacing_flags_binary_only() {
        let found = kinds(Language::Java, "x=a+-b;");
        assert!(found.contains(&(IssueKind::MissingSpacesAroundOperator, "x=a".into(), "x = a".into())));
        assert!(found.contains(&(IssueKind::MissingSpacesAroundOperator, "a+-".into(), "a + -".into())));
        assert!(!found.iter().any(|(_, old, _)| old.starts_with("+-b")));
    }

    #[test]
    fn test_generics_and_python_kwargs_exempt() {
        assert!(kinds(Language::Java, "List<String> xs = new ArrayList<>();").is_empty());
        assert!(kinds(Language::Python, "f(a, key=1)\n").is_empty());
    }

    #[test]
    fn test_python_colon_space_before() {
        let found = kinds(Language::Python, "d = {'a' : 1}\n");
        assert_eq!(
            found,
            vec![(IssueKind::ExtraSpaceBeforeColon, "'a' :".into(), "'a':".into())]
        );
    }

    #[test]
    fn test_python_colon_space_after() {
        let found = kinds(Language::Python, "d = {'a':1, 'b': 2}\ndef f(x:int):\n    return x[1:2]\n");
        assert_eq!(
            found,
            vec![
                (IssueKind::MissingSpaceAfterColon, "'a':1".into(), "'a': 1".into()),
                (IssueKind::MissingSpaceAfterColon, "x:int".into(), "x: int".into()),
            ]
        );
        assert!(kinds(Language::Python, "y = x[::2]\nz = x[lambda a: a]\n").is_empty());
    }

    #[test]
    fn test_space_before_comma_and_semicolon() {
        let found = kinds(Language::Java, "int x = 1 ;\nf(a , b);\nfor (int i = 0; ; i++) {}\n");
        assert_eq!(
            found,
            vec![
                (IssueKind::ExtraSpaceBeforeComma, "a ,".into(), "a,".into()),
                (IssueKind::ExtraSpaceBeforeSemicolon, "1 ;".into(), "1;".into()),
            ]
        );
    }

    #[test]
    fn test_python_call_paren_and_inner_spaces() {
        assert_eq!(
            kinds(Language::Python, "print (x)\nok = not (y)\n"),
            vec![(IssueKind::ExtraSpaceBeforeParen, "print (".into(), "print(".into())]
        );
        let found = kinds(Language::Python, "f( x )\n");
        assert!(found.contains(&(IssueKind::ExtraSpaceAfterOpeningParen, "( x".into(), "(x".into())));
        assert!(found.contains(&(IssueKind::ExtraSpaceBeforeClosingParen, "x )".into(), "x)".into())));
    }

    #[test]
    fn test_comma_semicolon_keyword_and_else() {
        let found = kinds(Language::Java, "for(;;){f(a,b);x=1;y=2;}else{}");
        assert!(found.contains(&(IssueKind::MissingSpaceAfterKeyword, "for(".into(), "for (".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceAfterComma, "a,b".into(), "a, b".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceAfterSemicolon, ");x".into(), "); x".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceAfterSemicolon, "1;y".into(), "1; y".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceBeforeBraceAfterElse, "else{".into(), "else {".into())));
        // `for(;;)` semicolons are followed by `;` or `)`
        assert!(!found.iter().any(|(_, old, _)| old == "(;" || old == ";;"));
    }

    #[test]
    fn test_braces_and_array_initializers() {
        let found = kinds(Language::Java, "class A{void f(){int[] a = { 1, 2 };g();}}");
        assert!(found.contains(&(IssueKind::MissingSpaceBeforeClassBrace, "A{".into(), "A {".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceBeforeMethodBrace, "){".into(), ") {".into())));
        assert!(found.contains(&(IssueKind::MissingSpaceAfterOpeningBrace, "{int".into(), "{ int".into())));
        assert!(found.contains(&(IssueKind::ExtraSpaceAfterOpeningBrace, "{ 1".into(), "{1".into())));
        assert!(!found.iter().any(|(_, old, _)| old == "{}"));
    }

    #[test]
    fn test_paren_inner_spaces() {
        let found = kinds(Language::Cpp, "f( a );\n");
        assert!(found.contains(&(IssueKind::ExtraSpaceAfterOpeningParen, "( a".into(), "(a".into())));
        assert!(found.contains(&(IssueKind::ExtraSpaceBeforeClosingParen, "a )".into(), "a)".into())));
    }
}
