//! Whole-file respacing for brace languages.
//!
//! The text is re-tokenized and every pair of adjacent tokens on the same
//! line gets its spacing computed from the pair itself. Line structure and
//! each line's indentation survive; whitespace-only gaps across lines are
//! reduced to their newlines plus the last line's indentation.

use crate::models::{Language, RuleSet};
use crate::shape::{gap_before, ColonRole, Shape};
use crate::tokenizer::{Token, TokenKind, Tokenizer, VALUE_KEYWORDS};

/// Blank lines kept between two code lines.
const MAX_BLANK_LINES: usize = 1;

const PAREN_KEYWORDS: &[&str] = &["return", "throw", "case", "assert", "yield", "await"];

/// Keywords used like functions: `sizeof(x)`, `super(x)`.
const CALL_KEYWORDS: &[&str] = &[
    "sizeof", "alignof", "decltype", "typeid", "static_assert", "noexcept", "alignas", "this",
    "super",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    None,
    One,
    /// Leave the original gap.
    Keep,
    /// Original gap, or one space when there was none.
    Exact,
}

struct Pairs<'t, 'a> {
    tokens: &'t [Token<'a>],
    shape: Shape,
    language: Language,
    rules: &'t RuleSet,
}

pub fn respace(tokenizer: &Tokenizer, rules: &RuleSet, text: &str) -> String {
    let tokens = tokenizer.tokenize(text);
    if tokens.is_empty() {
        return String::new();
    }
    let pairs = Pairs {
        tokens: &tokens,
        shape: Shape::analyze(&tokens, tokenizer.language()),
        language: tokenizer.language(),
        rules,
    };

    let mut out = String::with_capacity(text.len());
    for (i, tok) in tokens.iter().enumerate() {
        let gap = gap_before(text, &tokens, i);
        if i == 0 {
            out.push_str(last_line(gap));
        } else if gap.contains('\n') {
            push_vertical(&mut out, gap);
        } else {
            match pairs.space(i - 1, i) {
                Space::None => {}
                Space::One => out.push(' '),
                Space::Keep => out.push_str(gap),
                Space::Exact if gap.is_empty() => out.push(' '),
                Space::Exact => out.push_str(gap),
            }
        }
        out.push_str(tok.text);
    }
    let tail = gap_before(text, &tokens, tokens.len());
    if tail.contains('\n') {
        out.push('\n');
    }
    out
}

/// Indentation of the last line in a gap.
fn last_line(gap: &str) -> &str {
    gap.rsplit('\n').next().unwrap_or("").trim_start_matches('\r')
}

fn push_vertical(out: &mut String, gap: &str) {
    let newlines = gap.matches('\n').count().min(MAX_BLANK_LINES + 1);
    for _ in 0..newlines {
        out.push('\n');
    }
    out.push_str(last_line(gap));
}

impl Pairs<'_, '_> {
    fn is_angle_open(&self, i: usize) -> bool {
        self.shape.angle[i] && self.tokens[i].is("<")
    }

    fn is_angle_close(&self, i: usize) -> bool {
        self.shape.angle[i] && self.tokens[i].text.starts_with('>')
    }

    fn is_postfix(&self, i: usize) -> bool {
        i > 0 && {
            let prev = &self.tokens[i - 1];
            matches!(prev.kind, TokenKind::Identifier | TokenKind::Number) || prev.is_any(&[")", "]"])
        }
    }

    fn space(&self, p: usize, n: usize) -> Space {
        let (prev, next) = (&self.tokens[p], &self.tokens[n]);

        if next.kind == TokenKind::Comment || prev.kind == TokenKind::Comment {
            return Space::Exact;
        }
        if prev.kind == TokenKind::Directive {
            return Space::Keep;
        }
        if next.is("::") && matches!(prev.kind, TokenKind::Keyword | TokenKind::Operator) {
            return Space::One;
        }
        if prev.is_any(&[".", "::"]) || next.is_any(&[".", "::"]) {
            return Space::None;
        }
        if prev.is("->") || next.is("->") {
            return match self.language {
                Language::Java => Space::One,
                _ => Space::None,
            };
        }
        if next.is("...") {
            return Space::None;
        }
        if prev.is("...") {
            return if next.is_closer() || next.is(",") { Space::None } else { Space::One };
        }
        if next.is_any(&[",", ";"]) {
            return Space::None;
        }
        if prev.is(",") {
            return if next.is_closer() { Space::None } else { Space::One };
        }
        if prev.is(";") {
            return if next.is_any(&[")", ";"]) { Space::None } else { Space::One };
        }
        if prev.is("@") {
            return Space::None;
        }

        if self.is_angle_open(n) {
            let after_keyword = prev.kind == TokenKind::Keyword && !prev.text.ends_with("_cast");
            return if after_keyword { Space::One } else { Space::None };
        }
        if self.is_angle_open(p) || self.is_angle_close(n) {
            return Space::None;
        }
        if self.is_angle_close(p) {
            if next.is_word() || next.is("{") {
                return Space::One;
            }
            if next.is_any(&["(", ")", ">", ">>", "["]) {
                return Space::None;
            }
        }

        if prev.is_any(&["(", "["]) || next.is_any(&[")", "]"]) {
            return Space::None;
        }
        if next.is("}") {
            return if prev.is("{") || prev.is_literal() { Space::None } else { Space::One };
        }
        if prev.is("{") {
            let tight = next.is_literal() || (self.shape.unary[n] && next.is("-"));
            return if tight { Space::None } else { Space::One };
        }
        if next.is("{") || prev.is("}") {
            return Space::One;
        }

        if let Some(role) = self.shape.colon.get(n).copied().flatten() {
            return match role {
                ColonRole::Spaced => Space::One,
                ColonRole::Label => Space::None,
            };
        }
        if self.shape.colon.get(p).copied().flatten().is_some() {
            return Space::One;
        }
        if prev.is("?") || next.is("?") {
            return Space::One;
        }

        if next.is_any(&["++", "--"]) && self.is_postfix(n) {
            return Space::None;
        }
        if prev.is_any(&["++", "--"]) && !self.is_postfix(p) {
            return Space::None;
        }

        if self.shape.declarator[n] {
            return Space::None;
        }
        if self.shape.declarator[p] {
            return if next.is_any(&["*", "&", "&&", ")"]) { Space::None } else { Space::One };
        }
        if self.shape.unary[p] {
            return Space::None;
        }
        if prev.kind == TokenKind::Operator || next.kind == TokenKind::Operator {
            return Space::One;
        }

        if next.is("(") {
            return match prev.kind {
                TokenKind::Keyword if self.rules.spaces_after_keyword(prev.text) || prev.is_any(PAREN_KEYWORDS) => {
                    Space::One
                }
                TokenKind::Keyword if prev.is_any(CALL_KEYWORDS) || prev.is_any(VALUE_KEYWORDS) => Space::None,
                TokenKind::Keyword => Space::Keep,
                TokenKind::Identifier | TokenKind::Str => Space::None,
                _ if prev.is_any(&[")", "]"]) => Space::None,
                _ => Space::Keep,
            };
        }
        if next.is("[") {
            return if prev.is_word() || prev.is_any(&[")", "]"]) { Space::None } else { Space::Keep };
        }
        if prev.is_any(&[")", "]"]) && next.is_word() {
            return Space::One;
        }
        if prev.is_word() && next.is_word() {
            return Space::One;
        }
        Space::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(language: Language, text: &str) -> String {
        let tz = Tokenizer::new(language).unwrap();
        respace(&tz, &RuleSet::for_language(language), text)
    }

    #[test]
    fn test_control_flow_spacing() {
        assert_eq!(clean(Language::Java, "if(x>0){}else{}"), "if (x > 0) {} else {}");
        assert_eq!(
            clean(Language::Java, "for(int i=0;i<10;i++){}"),
            "for (int i = 0; i < 10; i++) {}"
        );
        assert_eq!(clean(Language::Java, "while(--n>0){x+=n;}"), "while (--n > 0) { x += n; }");
    }

    #[test]
    fn test_lines_and_indentation_survive() {
        let text = "class A{\n    void f( int a,int b ){\n\n\n        return;   \n    }\n}\n";
        let expected = "class A {\n    void f(int a, int b) {\n\n        return;\n    }\n}\n";
        assert_eq!(clean(Language::Java, text), expected);
    }

    #[test]
    fn test_generics_arrays_and_colons() {
        assert_eq!(
            clean(Language::Java, "Map<String,List<Integer>> m=new HashMap<>();"),
            "Map<String, List<Integer>> m = new HashMap<>();"
        );
        assert_eq!(clean(Language::Java, "int[] a={ 1,2 };"), "int[] a = {1, 2};");
        assert_eq!(clean(Language::Java, "for(String s:xs){}"), "for (String s : xs) {}");
        assert_eq!(clean(Language::Java, "x=c?a:b;"), "x = c ? a : b;");
        assert_eq!(clean(Language::Java, "switch(x){case 1 :break;}"), "switch (x) { case 1: break; }");
        assert_eq!(clean(Language::Java, "list.forEach(x->f(x));"), "list.forEach(x -> f(x));");
    }

    #[test]
    fn test_comments_and_literals_verbatim() {
        let text = "int a=1;   // keep  this\n/* a  b */int b=\"x  y\".length();\n";
        assert_eq!(
            clean(Language::Java, text),
            "int a = 1;   // keep  this\n/* a  b */ int b = \"x  y\".length();\n"
        );
    }

    #[test]
    fn test_cpp_pointers_templates_and_directives() {
        let text = "#include <vector>\n#define MAX(a,b) ((a)>(b)?(a):(b))\ntemplate<typename T>\nint *f(char **argv,std::vector<int> &v){return a*b+p->x;}\n";
        let expected = "#include <vector>\n#define MAX(a,b) ((a)>(b)?(a):(b))\ntemplate <typename T>\nint* f(char** argv, std::vector<int>& v) { return a * b + p->x; }\n";
        assert_eq!(clean(Language::Cpp, text), expected);
    }

    #[test]
    fn test_cpp_labels_and_casts() {
        let text = "class B:public A{\npublic :\n  B():x(1){}\n};\nint n=static_cast<int>(y);\n";
        let expected = "class B : public A {\npublic:\n  B() : x(1) {}\n};\nint n = static_cast<int>(y);\n";
        assert_eq!(clean(Language::Cpp, text), expected);
    }

    #[test]
    fn test_respace_is_idempotent() {
        let text = "public class A{\n  private int x=-1;\n  int f(int[] a){return a[0]*x;}\n}\n";
        let once = clean(Language::Java, text);
        assert_eq!(clean(Language::Java, &once), once);
    }
}
