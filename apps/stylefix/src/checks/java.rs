//! Java checks.

use super::{compile, declared_names, CheckContext};
use crate::error::Result;
use crate::models::{Issue, IssueKind, Location, Severity};
use crate::tokenizer::{Token, TokenKind};

const MODIFIER_ORDER: &[&str] = &[
    "public", "protected", "private", "abstract", "static", "final", "transient", "volatile",
    "synchronized", "native", "strictfp",
];

const PRIMITIVES: &[&str] = &[
    "void", "int", "long", "short", "byte", "char", "boolean", "float", "double", "var",
];

/// Dotted path after token `i` up to the next `;`, e.g. `java.util.List`.
fn dotted_path(toks: &[Token<'_>], i: usize) -> (String, usize) {
    let mut path = String::new();
    let mut j = i;
    while j < toks.len() && !toks[j].is(";") && toks[j].kind != TokenKind::Comment {
        path.push_str(toks[j].text);
        j += 1;
    }
    (path, j)
}

pub fn imports(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let rules = &ctx.rules.imports;
    let mut highest = 0;
    for i in ctx.line_heads().collect::<Vec<_>>() {
        if !toks[i].is("import") {
            continue;
        }
        let from = if toks.get(i + 1).is_some_and(|t| t.is("static")) { i + 2 } else { i + 1 };
        let (path, _) = dotted_path(toks, from);
        let line = ctx.line_of_token(i);
        if path.ends_with(".*") {
            out.push(Issue::note(
                IssueKind::WildcardImport,
                Location::Line(line),
                format!("Wildcard import '{path}'"),
                Severity::Low,
            ));
        }
        let rank = rules.rank(&path);
        if rank < highest {
            out.push(Issue::note(
                IssueKind::ImportOrder,
                Location::Line(line),
                format!(
                    "Import '{}' ({}) should come before {} imports",
                    path,
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

pub fn package_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let Some(pattern) = ctx.rules.naming.package.as_deref() else {
        return Ok(());
    };
    let re = compile(pattern)?;
    let toks = ctx.tokens;
    for i in ctx.line_heads().collect::<Vec<_>>() {
        if !toks[i].is("package") {
            continue;
        }
        let (path, _) = dotted_path(toks, i + 1);
        if !re.is_match(&path) {
            out.push(Issue::note(
                IssueKind::PackageNaming,
                Location::Line(ctx.line_of_token(i)),
                format!("Package name '{path}' does not match {pattern}"),
                Severity::Medium,
            ));
        }
    }
    Ok(())
}

pub fn class_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    declared_names(
        ctx,
        out,
        &["class", "interface", "enum"],
        &ctx.rules.naming.class,
        IssueKind::ClassNaming,
        "Class",
        Severity::High,
    )
}

fn type_like(ctx: &CheckContext<'_>, i: usize) -> bool {
    let tok = &ctx.tokens[i];
    match tok.kind {
        TokenKind::Keyword => tok.is_any(PRIMITIVES),
        TokenKind::Identifier => tok.text.starts_with(|c: char| c.is_ascii_uppercase()),
        _ => tok.is("]") || (ctx.shape.angle[i] && tok.text.starts_with('>')),
    }
}

pub fn method_naming(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let Some(pattern) = ctx.rules.naming.method.as_deref() else {
        return Ok(());
    };
    let re = compile(pattern)?;
    let toks = ctx.tokens;
    for i in 1..toks.len().saturating_sub(1) {
        let name = &toks[i];
        if name.kind != TokenKind::Identifier || !toks[i + 1].is("(") || !type_like(ctx, i - 1) {
            continue;
        }
        if i >= 2 && toks[i - 2].is_any(&["new", "."]) {
            continue;
        }
        if re.is_match(name.text) {
            continue;
        }
        out.push(
            Issue::note(
                IssueKind::MethodNaming,
                Location::Token(i),
                format!("Method name '{}' does not match {}", name.text, pattern),
                Severity::Medium,
            )
            .with_tokens([toks[i - 1].text, name.text]),
        );
    }
    Ok(())
}

pub fn modifier_order(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    let rank = |t: &Token<'_>| MODIFIER_ORDER.iter().position(|m| t.is(m));
    let mut i = 0;
    while i < toks.len() {
        let start = i;
        while i < toks.len() && rank(&toks[i]).is_some() {
            i += 1;
        }
        if i - start >= 2 {
            let run = &toks[start..i];
            let mut sorted: Vec<&str> = run.iter().map(|t| t.text).collect();
            sorted.sort_by_key(|m| MODIFIER_ORDER.iter().position(|o| o == m));
            let actual: Vec<&str> = run.iter().map(|t| t.text).collect();
            if sorted != actual {
                out.push(
                    Issue::fixable(
                        IssueKind::ModifierOrder,
                        start,
                        format!("Modifiers should be ordered as '{}'", sorted.join(" ")),
                        ctx.slice(start, i - 1),
                        sorted.join(" "),
                        Severity::Low,
                    )
                    .with_tokens(actual),
                );
            }
        }
        i = i.max(start + 1);
    }
    Ok(())
}

/// Last token of the annotation whose `@` is at `at`: its name or its closing `)`.
fn annotation_end(toks: &[Token<'_>], at: usize) -> usize {
    let mut j = at + 1;
    while j + 2 < toks.len() && toks[j + 1].is(".") && toks[j + 2].kind == TokenKind::Identifier {
        j += 2;
    }
    if !toks.get(j + 1).is_some_and(|t| t.is("(")) {
        return j;
    }
    let mut depth = 0usize;
    for (k, tok) in toks.iter().enumerate().skip(j + 1) {
        if tok.is("(") {
            depth += 1;
        } else if tok.is(")") {
            depth -= 1;
            if depth == 0 {
                return k;
            }
        }
    }
    j
}

/// `@ Override` and `@Named("x")String` both need fixing.
pub fn annotation_spacing(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for at in 0..toks.len().saturating_sub(1) {
        let name = at + 1;
        if !toks[at].is("@") || toks[name].kind != TokenKind::Identifier {
            continue;
        }
        if ctx.spaced_before(name) && ctx.same_line_next(at) {
            out.push(
                Issue::fixable(
                    IssueKind::AnnotationSpacing,
                    at,
                    format!("No space expected inside '@{}'", toks[name].text),
                    ctx.slice(at, name),
                    format!("@{}", toks[name].text),
                    Severity::Low,
                )
                .with_tokens(["@", toks[name].text]),
            );
        }
        let end = annotation_end(toks, at);
        let Some(next) = toks.get(end + 1) else {
            continue;
        };
        if !ctx.spaced_after(end) && next.is_word() {
            out.push(
                Issue::fixable(
                    IssueKind::AnnotationSpacing,
                    end + 1,
                    format!("Missing space after annotation '@{}'", toks[name].text),
                    ctx.slice(at, end + 1),
                    format!("{} {}", ctx.slice(at, end), next.text),
                    Severity::Low,
                )
                .with_tokens([toks[end].text, next.text]),
            );
        }
    }
    Ok(())
}

/// `int a[]` in a declaration, proposing `int[] a`.
pub fn array_declaration(ctx: &CheckContext<'_>, out: &mut Vec<Issue>) -> Result<()> {
    let toks = ctx.tokens;
    for i in 1..toks.len().saturating_sub(3) {
        let (ty, name) = (&toks[i - 1], &toks[i]);
        let declares = toks[i + 1].is("[")
            && toks[i + 2].is("]")
            && name.kind == TokenKind::Identifier
            && type_like(ctx, i - 1)
            && !ty.is("]")
            && toks[i + 3].is_any(&[";", "=", ",", ")"]);
        if !declares {
            continue;
        }
        out.push(
            Issue::fixable(
                IssueKind::ArrayDeclaration,
                i,
                format!("Use '{}[] {}' array declaration style", ty.text, name.text),
                ctx.slice(i - 1, i + 2),
                format!("{}[] {}", ty.text, name.text),
                Severity::Low,
            )
            .with_tokens([ty.text, name.text]),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::checks::tests::run;
    use crate::models::{Issue, IssueKind, Language};

    fn of_kind(text: &str, kind: IssueKind) -> Vec<Issue> {
        run(Language::Java, text).into_iter().filter(|i| i.kind == kind).collect()
    }

    #[test]
    fn test_import_groups_and_wildcards() {
        let text = "import org.junit.Test;\nimport java.util.*;\nimport javax.swing.JFrame;\n";
        let order = of_kind(text, IssueKind::ImportOrder);
        assert_eq!(order.len(), 2);
        assert!(order[0].description.contains("java.util.*"));
        assert_eq!(of_kind(text, IssueKind::WildcardImport).len(), 1);
    }

    #[test]
    fn test_package_and_class_naming() {
        assert_eq!(of_kind("package com.Example;\n", IssueKind::PackageNaming).len(), 1);
        assert!(of_kind("package com.example.app;\n", IssueKind::PackageNaming).is_empty());
        let classes = of_kind("class my_thing {}\ninterface Good {}\nenum bad {}\n", IssueKind::ClassNaming);
        assert_eq!(classes.len(), 2);
        assert!(of_kind("Object o = Foo.class;\n", IssueKind::ClassNaming).is_empty());
    }

    #[test]
    fn test_method_naming_only_on_declarations() {
        let text = "class A {\n    void Bad_name() {}\n    int good() { return Helper(); }\n    A a = new Thing();\n}\n";
        let found = of_kind(text, IssueKind::MethodNaming);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tokens, vec!["void", "Bad_name"]);
    }

    #[test]
    fn test_modifier_order() {
        let found = of_kind("static public final int X = 1;\n", IssueKind::ModifierOrder);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].old_pattern.as_deref(), Some("static public final"));
        assert_eq!(found[0].new_pattern.as_deref(), Some("public static final"));
        assert!(of_kind("public static final int X = 1;\n", IssueKind::ModifierOrder).is_empty());
    }

    #[test]
    fn test_annotation_spacing() {
        let found = of_kind("@ Override
@Named(\"x\")String s;
", IssueKind::AnnotationSpacing);
        let pairs: Vec<(&str, &str)> = found
            .iter()
            .map(|i| (i.old_pattern.as_deref().unwrap(), i.new_pattern.as_deref().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("@ Override", "@Override"), ("@Named(\"x\")String", "@Named(\"x\") String")]);
        let clean = "@Override
public void f() {}
@SuppressWarnings(\"all\") int x;
@interface Marker {}
";
        assert!(of_kind(clean, IssueKind::AnnotationSpacing).is_empty());
    }

    #[test]
    fn test_array_declaration_style() {
        let found = of_kind("int nums[] = new int[3];\n", IssueKind::ArrayDeclaration);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].old_pattern.as_deref(), Some("int nums[]"));
        assert_eq!(found[0].new_pattern.as_deref(), Some("int[] nums"));
        assert!(of_kind("int[] nums = new int[3];\n", IssueKind::ArrayDeclaration).is_empty());
    }
}
