//! Regex-driven tokenizer producing typed, span-carrying tokens.
//!
//! Tokenization runs in three steps: protected regions (string and char
//! literals, comments, C++ preprocessor lines) are located first, the code
//! between them is split with the language's composite pattern, and the
//! protected regions are re-inserted as single tokens in source order.
//! Whitespace never becomes a token; the byte spans let later stages see
//! what separated two tokens.

use regex::Regex;

use crate::error::{Result, StyleError};
use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    Str,
    Char,
    Comment,
    /// A whole preprocessor line, continuation lines included.
    Directive,
    Operator,
    Punct,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_any(&self, texts: &[&str]) -> bool {
        texts.contains(&self.text)
    }

    /// Identifiers, keywords and literals.
    pub fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::Char
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::Str | TokenKind::Char)
    }

    pub fn is_opener(&self) -> bool {
        self.is_any(&["(", "[", "{"])
    }

    pub fn is_closer(&self) -> bool {
        self.is_any(&[")", "]", "}"])
    }
}

const JAVA_PROTECTED: &str = r#"//[^\n]*|/\*(?s:.*?)\*/|"""(?s:.*?)"""|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#;

const JAVA_CODE: &str = r"[\p{L}_$][\p{L}\p{N}_$]*|0[xXbB][0-9a-fA-F_]+[lL]?|\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?[fFdDlL]?|\.\d+(?:[eE][+-]?\d+)?[fFdD]?|>>>=|>>>|<<=|>>=|\.\.\.|->|::|\+\+|--|&&|\|\||==|!=|<=|>=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|[=+\-*/%<>!&|^~?:]|[(){}\[\];,.@]|\S";

const PYTHON_PROTECTED: &str = r#"#[^\n]*|(?i:[rbuf]{0,2})(?:"""(?s:.*?)"""|'''(?s:.*?)'''|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*')"#;

const PYTHON_CODE: &str = r"[\p{L}_][\p{L}\p{N}_]*|0[xXoObB][0-9a-fA-F_]+|\d[\d_]*(?:\.\d*)?(?:[eE][+-]?\d+)?[jJ]?|\.\d+(?:[eE][+-]?\d+)?[jJ]?|\*\*=|//=|>>=|<<=|\.\.\.|\*\*|//|->|:=|==|!=|<=|>=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|@=|<<|>>|[=+\-*/%<>!&|^~:]|[(){}\[\];,.@\\]|\S";

const CPP_PROTECTED: &str = r#"(?m:^[ \t]*#(?:[^\n\\]|\\(?s:.))*)|//[^\n]*|/\*(?s:.*?)\*/|(?:u8|[uUL])?"(?:[^"\\\n]|\\.)*"|(?:u8|[uUL])?'(?:[^'\\\n]|\\.)*'"#;

const CPP_CODE: &str = r"[\p{L}_][\p{L}\p{N}_]*|0[xXbB][0-9a-fA-F]+[uUlL]*|\d+(?:\.\d*)?(?:[eE][+-]?\d+)?[fFuUlL]*|\.\d+(?:[eE][+-]?\d+)?[fFlL]?|->\*|<<=|>>=|\.\.\.|->|::|\+\+|--|&&|\|\||==|!=|<=|>=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|[=+\-*/%<>!&|^~?:]|[(){}\[\];,.#]|\S";

pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "yield",
];

pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "catch", "char", "class", "const",
    "constexpr", "const_cast", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "extern", "false", "final", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "nullptr", "operator", "override", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "while",
];

/// Keywords that stand for a value rather than introduce an expression.
pub const VALUE_KEYWORDS: &[&str] = &[
    "this", "super", "true", "false", "null", "nullptr", "None", "True", "False",
];

const PUNCT: &[&str] = &["(", ")", "{", "}", "[", "]", ";", ",", ".", "@", "\\"];

pub fn keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Java => JAVA_KEYWORDS,
        Language::Python => PYTHON_KEYWORDS,
        Language::Cpp => CPP_KEYWORDS,
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    language: Language,
    protected: Regex,
    code: Regex,
}

impl Tokenizer {
    pub fn new(language: Language) -> Result<Tokenizer> {
        let (protected, code) = match language {
            Language::Java => (JAVA_PROTECTED, JAVA_CODE),
            Language::Python => (PYTHON_PROTECTED, PYTHON_CODE),
            Language::Cpp => (CPP_PROTECTED, CPP_CODE),
        };
        Ok(Tokenizer {
            language,
            protected: Regex::new(protected).map_err(|e| StyleError::invalid_pattern(protected, e))?,
            code: Regex::new(code).map_err(|e| StyleError::invalid_pattern(code, e))?,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity(text.len() / 3);
        let mut pos = 0;
        while pos < text.len() {
            let Some(m) = self.protected.find_at(text, pos) else {
                break;
            };
            let start = literal_start(text, m.start(), m.end());
            self.push_code(text, pos, start, &mut tokens);
            if start < m.end() {
                let lexeme = &text[start..m.end()];
                tokens.push(Token {
                    kind: self.protected_kind(lexeme),
                    text: lexeme,
                    start,
                    end: m.end(),
                });
            }
            pos = m.end().max(pos + 1).min(text.len());
        }
        self.push_code(text, pos, text.len(), &mut tokens);
        tokens
    }

    /// Plain lexeme view of `tokenize`.
    pub fn lexemes<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.tokenize(text).into_iter().map(|t| t.text).collect()
    }

    fn push_code<'a>(&self, text: &'a str, from: usize, to: usize, out: &mut Vec<Token<'a>>) {
        if from >= to {
            return;
        }
        for m in self.code.find_iter(&text[from..to]) {
            let lexeme = m.as_str();
            out.push(Token {
                kind: self.code_kind(lexeme),
                text: lexeme,
                start: from + m.start(),
                end: from + m.end(),
            });
        }
    }

    fn protected_kind(&self, lexeme: &str) -> TokenKind {
        if lexeme.starts_with("//") || lexeme.starts_with("/*") {
            return TokenKind::Comment;
        }
        if lexeme.starts_with('#') {
            return match self.language {
                Language::Python => TokenKind::Comment,
                _ => TokenKind::Directive,
            };
        }
        let first_quote = lexeme.chars().find(|c| *c == '"' || *c == '\'');
        match (self.language, first_quote) {
            (Language::Python, _) | (_, Some('"')) => TokenKind::Str,
            _ => TokenKind::Char,
        }
    }

    fn code_kind(&self, lexeme: &str) -> TokenKind {
        let mut chars = lexeme.chars();
        let first = chars.next().unwrap_or(' ');
        if first.is_ascii_digit() || (first == '.' && chars.next().is_some_and(|c| c.is_ascii_digit())) {
            TokenKind::Number
        } else if first.is_alphabetic() || first == '_' || first == '$' {
            if keywords(self.language).contains(&lexeme) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            }
        } else if PUNCT.contains(&lexeme) {
            TokenKind::Punct
        } else if lexeme.len() > 1 || "=+-*/%<>!&|^~?:".contains(first) {
            TokenKind::Operator
        } else {
            TokenKind::Other
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Where a protected match really begins: directive indentation is code
/// whitespace, and a literal prefix glued to a preceding identifier is part
/// of that identifier.
fn literal_start(text: &str, start: usize, end: usize) -> usize {
    let matched = &text[start..end];
    let trimmed = matched.trim_start_matches([' ', '\t']);
    let start = start + (matched.len() - trimmed.len());
    let begins_alnum = text[start..].chars().next().is_some_and(|c| c.is_alphanumeric());
    let glued = text[..start].chars().next_back().is_some_and(is_word_char);
    if begins_alnum && glued {
        start + text[start..end].find(['"', '\'']).unwrap_or(0)
    } else {
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(language: Language, text: &str) -> Vec<String> {
        Tokenizer::new(language)
            .unwrap()
            .lexemes(text)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_java_compound_operators_stay_whole() {
        let toks = lex(Language::Java, "if(a==b&&c!=d){x+=1;i++;}");
        assert_eq!(
            toks,
            vec!["if", "(", "a", "==", "b", "&&", "c", "!=", "d", ")", "{", "x", "+=", "1", ";", "i", "++", ";", "}"]
        );
    }

    #[test]
    fn test_literals_are_protected() {
        let toks = lex(Language::Java, r#"s = "a+b, c;" + 'x';"#);
        assert_eq!(toks, vec!["s", "=", "\"a+b, c;\"", "+", "'x'", ";"]);

        let t = Tokenizer::new(Language::Java).unwrap();
        let kinds: Vec<TokenKind> = t.tokenize(r#""s" 'c' // it's"#).iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Str, TokenKind::Char, TokenKind::Comment]);
    }

    #[test]
    fn test_python_triple_quotes_prefixes_and_comments() {
        let toks = lex(Language::Python, "x = f'{a}' # don't\ny = '''a\nb'''\nz **= 2");
        assert_eq!(
            toks,
            vec!["x", "=", "f'{a}'", "# don't", "y", "=", "'''a\nb'''", "z", "**=", "2"]
        );
        // a prefix letter glued to an identifier stays in the identifier
        assert_eq!(lex(Language::Python, "elif'x'"), vec!["elif", "'x'"]);
    }

    #[test]
    fn test_cpp_directives_and_scope_operators() {
        let t = Tokenizer::new(Language::Cpp).unwrap();
        let toks = t.tokenize("#include <vector>\n  # define X 1\nstd::vector<int> v; p->x;");
        assert_eq!(toks[0].kind, TokenKind::Directive);
        assert_eq!(toks[0].text, "#include <vector>");
        assert_eq!(toks[1].text, "# define X 1");
        let rest: Vec<&str> = toks[2..].iter().map(|t| t.text).collect();
        assert_eq!(rest, vec!["std", "::", "vector", "<", "int", ">", "v", ";", "p", "->", "x", ";"]);
    }

    #[test]
    fn test_spans_and_kinds() {
        let t = Tokenizer::new(Language::Java).unwrap();
        let text = "int  x = 10;";
        let toks = t.tokenize(text);
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert_eq!((toks[1].start, toks[1].end), (5, 6));
        assert_eq!(toks[3].kind, TokenKind::Number);
        assert_eq!(toks[4].kind, TokenKind::Punct);
        for tok in &toks {
            assert_eq!(&text[tok.start..tok.end], tok.text);
        }
    }

    #[test]
    fn test_no_character_lost() {
        let text = "a@b#c`d";
        let joined: String = lex(Language::Java, text).concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_unterminated_quote_degrades_to_single_token() {
        let toks = lex(Language::Java, "x = \"abc\ny;");
        assert_eq!(toks, vec!["x", "=", "\"", "abc", "y", ";"]);
    }
}
