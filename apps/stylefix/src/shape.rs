//! Token-shape analysis shared by detection and cleanup.
//!
//! Without a parser, a few questions about a token still need answers:
//! is this `-` unary, is this `<` a generic bracket, is this `*` part of a
//! declarator, which bracket encloses this token. `Shape` answers them once
//! per token sequence.

use crate::models::Language;
use crate::tokenizer::{Token, TokenKind, VALUE_KEYWORDS};

/// How a C-family colon is spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonRole {
    /// Ternary, enhanced for, initializer list, inheritance, assert message.
    Spaced,
    /// `case`, `default`, labels and access specifiers.
    Label,
}

#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub unary: Vec<bool>,
    /// `<`, `>`, `>>`, `>>>` acting as generic/template brackets.
    pub angle: Vec<bool>,
    pub in_angle: Vec<bool>,
    /// C++ `*`, `&`, `&&` binding to a declared name.
    pub declarator: Vec<bool>,
    /// Index of the innermost open bracket around each token.
    pub enclosing: Vec<Option<usize>>,
    pub colon: Vec<Option<ColonRole>>,
}

const CPP_TYPE_NAMES: &[&str] = &[
    "string", "vector", "map", "set", "unordered_map", "unordered_set", "size_t", "array",
    "list", "deque", "pair", "tuple", "optional", "function", "unique_ptr", "shared_ptr",
];

const CPP_TYPE_KEYWORDS: &[&str] = &[
    "int", "char", "void", "bool", "float", "double", "long", "short", "unsigned", "signed",
    "auto", "const", "volatile",
];

const GENERIC_PREFIX_KEYWORDS: &[&str] = &[
    "template", "public", "private", "protected", "static", "final", "abstract",
    "synchronized", "default", "static_cast", "const_cast", "dynamic_cast", "reinterpret_cast",
];

impl Shape {
    pub fn analyze(tokens: &[Token<'_>], language: Language) -> Shape {
        let mut shape = Shape {
            enclosing: enclosing(tokens),
            ..Shape::default()
        };
        let (angle, in_angle) = if language == Language::Python {
            (vec![false; tokens.len()], vec![false; tokens.len()])
        } else {
            angles(tokens)
        };
        shape.angle = angle;
        shape.in_angle = in_angle;
        shape.unary = (0..tokens.len())
            .map(|i| is_unary(tokens, i, language, &shape.angle))
            .collect();
        shape.declarator = if language == Language::Cpp {
            declarators(tokens, &shape.angle)
        } else {
            vec![false; tokens.len()]
        };
        shape.colon = (0..tokens.len())
            .map(|i| {
                (language != Language::Python && tokens[i].is(":"))
                    .then(|| colon_role(tokens, i, language, &shape))
            })
            .collect();
        shape
    }

    /// Opening bracket text around token `i`, if any.
    pub fn enclosing_text<'a>(&self, tokens: &[Token<'a>], i: usize) -> Option<&'a str> {
        self.enclosing
            .get(i)
            .copied()
            .flatten()
            .map(|k| tokens[k].text)
    }

    /// True when a binary-operator spacing rule must not touch token `i`.
    pub fn operator_exempt(&self, i: usize) -> bool {
        self.unary[i] || self.angle[i] || self.in_angle[i] || self.declarator[i]
    }
}

fn enclosing(tokens: &[Token<'_>]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    let mut out = Vec::with_capacity(tokens.len());
    for (i, tok) in tokens.iter().enumerate() {
        let opener_for = match tok.text {
            ")" => Some("("),
            "]" => Some("["),
            "}" => Some("{"),
            _ => None,
        };
        if let Some(open) = opener_for {
            if let Some(pos) = stack.iter().rposition(|k| tokens[*k].is(open)) {
                stack.truncate(pos);
            }
        }
        out.push(stack.last().copied());
        if tok.is_opener() {
            stack.push(i);
        }
    }
    out
}

fn angles(tokens: &[Token<'_>]) -> (Vec<bool>, Vec<bool>) {
    let mut angle = vec![false; tokens.len()];
    let mut inside = vec![false; tokens.len()];
    for i in 0..tokens.len() {
        if !tokens[i].is("<") || angle[i] || i == 0 {
            continue;
        }
        let prev = &tokens[i - 1];
        let candidate = prev.kind == TokenKind::Identifier
            || prev.is(".")
            || (prev.kind == TokenKind::Keyword && prev.is_any(GENERIC_PREFIX_KEYWORDS));
        if !candidate {
            continue;
        }
        let Some(close) = match_angle(tokens, i) else {
            continue;
        };
        for j in i..=close {
            if tokens[j].is_any(&["<", ">", ">>", ">>>"]) {
                angle[j] = true;
            } else {
                inside[j] = true;
            }
        }
    }
    (angle, inside)
}

fn match_angle(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth: i32 = 1;
    for (j, tok) in tokens.iter().enumerate().skip(open + 1) {
        match tok.text {
            "<" => depth += 1,
            ">" => depth -= 1,
            ">>" => depth -= 2,
            ">>>" => depth -= 3,
            "," | "." | "::" | "?" | "[" | "]" | "*" | "&" | "&&" | "..." => {}
            _ if matches!(
                tok.kind,
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::Number
            ) => {}
            _ => return None,
        }
        match depth {
            0 => return Some(j),
            d if d < 0 => return None,
            _ => {}
        }
    }
    None
}

fn is_unary(tokens: &[Token<'_>], i: usize, language: Language, angle: &[bool]) -> bool {
    let tok = &tokens[i];
    let candidate = match language {
        Language::Java => tok.is_any(&["+", "-", "!", "~"]),
        Language::Python => tok.is_any(&["+", "-", "~", "*", "**"]),
        Language::Cpp => tok.is_any(&["+", "-", "!", "~", "*", "&"]),
    };
    if !candidate {
        return false;
    }
    if tok.is_any(&["!", "~"]) {
        return true;
    }
    let Some(prev) = i.checked_sub(1).map(|p| &tokens[p]) else {
        return true;
    };
    match prev.kind {
        TokenKind::Operator => !prev.is_any(&["++", "--"]) && !angle[i - 1],
        TokenKind::Punct => prev.is_any(&["(", "[", "{", "}", ",", ";", "@"]),
        TokenKind::Keyword => !prev.is_any(VALUE_KEYWORDS),
        TokenKind::Comment | TokenKind::Directive => true,
        _ => false,
    }
}

fn type_like(tokens: &[Token<'_>], i: usize, angle: &[bool], declarator: &[bool]) -> bool {
    let tok = &tokens[i];
    match tok.kind {
        TokenKind::Keyword => tok.is_any(CPP_TYPE_KEYWORDS),
        TokenKind::Identifier => {
            tok.text.starts_with(|c: char| c.is_ascii_uppercase())
                || tok.is_any(CPP_TYPE_NAMES)
                || tok.text.ends_with("_t")
        }
        _ => (angle[i] && tok.text.starts_with('>')) || declarator[i],
    }
}

fn declarators(tokens: &[Token<'_>], angle: &[bool]) -> Vec<bool> {
    let mut out = vec![false; tokens.len()];
    for i in 1..tokens.len() {
        if !tokens[i].is_any(&["*", "&", "&&"]) || !type_like(tokens, i - 1, angle, &out) {
            continue;
        }
        let next_ok = tokens.get(i + 1).is_some_and(|n| {
            n.kind == TokenKind::Identifier
                || n.is("const")
                || n.is_any(&["*", "&", ")", ",", ">", ">>"])
        });
        let expression_context = i >= 2 && {
            let pp = &tokens[i - 2];
            (pp.kind == TokenKind::Operator && !pp.is("::") && !angle[i - 2])
                || pp.is_any(&["return", "case", "throw", "delete"])
        };
        out[i] = next_ok && (out[i - 1] || !expression_context);
    }
    out
}

/// Index of the first token of the statement containing `i`.
fn statement_start(tokens: &[Token<'_>], i: usize) -> usize {
    let mut depth = 0i32;
    let mut j = i;
    while j > 0 {
        let tok = &tokens[j - 1];
        match tok.text {
            ")" | "]" => depth += 1,
            "(" | "[" => {
                if depth == 0 {
                    return j;
                }
                depth -= 1;
            }
            ";" | "{" | "}" if depth == 0 => return j,
            _ => {}
        }
        j -= 1;
    }
    0
}

fn colon_role(tokens: &[Token<'_>], i: usize, language: Language, shape: &Shape) -> ColonRole {
    if let Some(k) = shape.enclosing[i] {
        if tokens[k].is("(") && k > 0 && tokens[k - 1].is("for") {
            return ColonRole::Spaced;
        }
    }
    let start = statement_start(tokens, i);
    let mut pending = 0i32;
    let mut depth = 0i32;
    for (j, tok) in tokens.iter().enumerate().take(i).skip(start) {
        match tok.text {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth -= 1,
            "?" if depth == 0 && !shape.in_angle[j] => pending += 1,
            ":" if depth == 0 => pending -= 1,
            _ => {}
        }
    }
    if pending > 0 {
        return ColonRole::Spaced;
    }
    let head = &tokens[start];
    if language == Language::Java && head.is("assert") {
        return ColonRole::Spaced;
    }
    if language == Language::Cpp {
        let prev_paren = i > 0 && tokens[i - 1].is(")");
        let declares_type = tokens[start..i]
            .iter()
            .any(|t| t.is_any(&["class", "struct", "enum"]));
        if prev_paren || declares_type {
            return ColonRole::Spaced;
        }
    }
    ColonRole::Label
}

/// Whitespace between token `i - 1` (or the start of text) and token `i`.
pub fn gap_before<'a>(text: &'a str, tokens: &[Token<'_>], i: usize) -> &'a str {
    let start = if i == 0 { 0 } else { tokens[i - 1].end };
    let end = tokens.get(i).map_or(text.len(), |t| t.start);
    text.get(start..end).unwrap_or("")
}

/// Byte offsets of line starts, for offset → line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> LineIndex {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { starts }
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn shape_of(language: Language, text: &str) -> (Vec<String>, Shape) {
        let tz = Tokenizer::new(language).unwrap();
        let toks = tz.tokenize(text);
        let shape = Shape::analyze(&toks, language);
        (toks.iter().map(|t| t.text.to_string()).collect(), shape)
    }

    fn idx(toks: &[String], text: &str, nth: usize) -> usize {
        toks.iter()
            .enumerate()
            .filter(|(_, t)| *t == text)
            .nth(nth)
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_unary_positions() {
        let (toks, s) = shape_of(Language::Java, "x = -1; f(-a, b - c); return -y;");
        assert!(s.unary[idx(&toks, "-", 0)]);
        assert!(s.unary[idx(&toks, "-", 1)]);
        assert!(!s.unary[idx(&toks, "-", 2)]);
        assert!(s.unary[idx(&toks, "-", 3)]);
    }

    #[test]
    fn test_generic_angles() {
        let (toks, s) = shape_of(Language::Java, "Map<String, List<Integer>> m = new HashMap<>(); if (i < n) {}");
        assert!(s.angle[idx(&toks, "<", 0)]);
        assert!(s.angle[idx(&toks, ">>", 0)]);
        assert!(s.angle[idx(&toks, "<", 2)]);
        assert!(!s.angle[idx(&toks, "<", 3)]);
    }

    #[test]
    fn test_cpp_declarators() {
        let (toks, s) = shape_of(Language::Cpp, "char** argv; const Foo& f = g; int y = a * b;");
        assert!(s.declarator[idx(&toks, "*", 0)]);
        assert!(s.declarator[idx(&toks, "*", 1)]);
        assert!(s.declarator[idx(&toks, "&", 0)]);
        assert!(!s.declarator[idx(&toks, "*", 2)]);
    }

    #[test]
    fn test_colon_roles() {
        let (toks, s) = shape_of(
            Language::Java,
            "for (String a : xs) {} x = c ? 1 : 2; switch (x) { case 1: break; }",
        );
        assert_eq!(s.colon[idx(&toks, ":", 0)], Some(ColonRole::Spaced));
        assert_eq!(s.colon[idx(&toks, ":", 1)], Some(ColonRole::Spaced));
        assert_eq!(s.colon[idx(&toks, ":", 2)], Some(ColonRole::Label));
    }

    #[test]
    fn test_enclosing_and_line_index() {
        let (toks, s) = shape_of(Language::Python, "f(a[1], {b: 2})");
        assert_eq!(s.enclosing[idx(&toks, "1", 0)], Some(idx(&toks, "[", 0)));
        assert_eq!(s.enclosing[idx(&toks, ":", 0)], Some(idx(&toks, "{", 0)));
        assert_eq!(s.enclosing[idx(&toks, ")", 0)], None);

        let li = LineIndex::new("a\nbc\n\nd");
        assert_eq!(li.line_of(0), 0);
        assert_eq!(li.line_of(2), 1);
        assert_eq!(li.line_of(5), 2);
        assert_eq!(li.line_of(6), 3);
    }
}
