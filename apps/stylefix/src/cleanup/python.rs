//! Python reformatting: statement splitting, spacing and re-indentation.
//!
//! Physical lines are grouped into logical lines (open brackets and
//! backslashes continue a line). Each logical line is cut after its block
//! colons, so `if x:print(1)` becomes a header and a body. Every resulting
//! segment is respaced pair by pair and placed at the level reported by a
//! `BlockTracker`.

use super::blocks::BlockTracker;
use crate::models::{Language, RuleSet};
use crate::shape::{gap_before, Shape};
use crate::tokenizer::{Token, TokenKind, Tokenizer, VALUE_KEYWORDS};

const BLOCK_HEADS: &[&str] = &[
    "if", "elif", "else", "for", "while", "try", "except", "finally", "with", "def", "class",
    "async",
];

/// Soft keywords that open a block only when the colon ends the line.
const SOFT_HEADS: &[&str] = &["match", "case"];

const TRANSITIONS: &[&str] = &["elif", "else", "except", "finally"];

const TERMINALS: &[&str] = &["pass", "break", "continue", "return", "raise"];

/// Blank-line runs at or above this length collapse to a single blank line.
const BLANK_RUN_COLLAPSE: usize = 3;

const TAB_WIDTH: usize = 8;

/// Physical lines joined by brackets or backslashes.
#[derive(Debug, Clone, Copy)]
struct LogicalLine {
    start: usize,
    end: usize,
    /// Source column of the first token.
    indent: usize,
    blank_before: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: usize,
    end: usize,
    block_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    None,
    One,
    Two,
    Keep,
}

fn width(indent: &str) -> usize {
    indent.chars().fold(0, |col, c| match c {
        '\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
        ' ' => col + 1,
        _ => col,
    })
}

fn last_line(gap: &str) -> &str {
    gap.rsplit('\n').next().unwrap_or("")
}

fn logical_lines(text: &str, tokens: &[Token<'_>]) -> Vec<LogicalLine> {
    let mut bounds = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            let continued = depth > 0 || tokens[i - 1].is("\\");
            if !continued && gap_before(text, tokens, i).contains('\n') {
                bounds.push((start, i));
                start = i;
            }
        }
        if tok.is_opener() {
            depth += 1;
        } else if tok.is_closer() {
            depth = depth.saturating_sub(1);
        }
    }
    if start < tokens.len() {
        bounds.push((start, tokens.len()));
    }
    bounds
        .into_iter()
        .map(|(start, end)| {
            let gap = gap_before(text, tokens, start);
            LogicalLine {
                start,
                end,
                indent: width(last_line(gap)),
                blank_before: gap.matches('\n').count().saturating_sub(1),
            }
        })
        .collect()
}

/// Index of the colon closing the block header that starts at `start`.
fn block_colon(tokens: &[Token<'_>], start: usize, end: usize) -> Option<usize> {
    let head = &tokens[start];
    let soft = head.kind == TokenKind::Identifier && head.is_any(SOFT_HEADS);
    if !soft && !(head.kind == TokenKind::Keyword && head.is_any(BLOCK_HEADS)) {
        return None;
    }
    let mut depth = 0usize;
    let mut lambdas = 0usize;
    for (j, tok) in tokens.iter().enumerate().take(end).skip(start + 1) {
        if tok.is_opener() {
            depth += 1;
        } else if tok.is_closer() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && tok.is("lambda") {
            lambdas += 1;
        } else if depth == 0 && tok.is(":") {
            if lambdas > 0 {
                lambdas -= 1;
                continue;
            }
            let ends_line = tokens[j + 1..end].iter().all(|t| t.kind == TokenKind::Comment);
            return (!soft || ends_line).then_some(j);
        }
    }
    None
}

fn segments(tokens: &[Token<'_>], line: &LogicalLine) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut start = line.start;
    loop {
        let Some(colon) = block_colon(tokens, start, line.end) else {
            out.push(Segment { start, end: line.end, block_header: false });
            return out;
        };
        let rest = colon + 1;
        let only_comment = tokens[rest..line.end].iter().all(|t| t.kind == TokenKind::Comment);
        if only_comment {
            out.push(Segment { start, end: line.end, block_header: true });
            return out;
        }
        out.push(Segment { start, end: rest, block_header: true });
        start = rest;
    }
}

/// A colon that opens a block, as the cleanup pass splits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    /// First token of the header.
    pub start: usize,
    pub colon: usize,
    /// First token of a body written on the header's own line.
    pub inline_body: Option<usize>,
    /// Source column of the logical line holding the header.
    pub indent: usize,
}

pub(crate) fn block_headers(text: &str, tokens: &[Token<'_>]) -> Vec<BlockHeader> {
    let mut out = Vec::new();
    for line in logical_lines(text, tokens) {
        let segs = segments(tokens, &line);
        for (k, seg) in segs.iter().enumerate() {
            if !seg.block_header {
                continue;
            }
            if let Some(colon) = block_colon(tokens, seg.start, line.end) {
                out.push(BlockHeader {
                    start: seg.start,
                    colon,
                    inline_body: segs.get(k + 1).map(|next| next.start),
                    indent: line.indent,
                });
            }
        }
    }
    out
}

struct Layout<'t, 'a> {
    text: &'t str,
    tokens: &'t [Token<'a>],
    shape: Shape,
}

impl Layout<'_, '_> {
    /// A `lambda` in the same bracket as colon `i` is still waiting for its colon.
    fn lambda_pending(&self, seg: &Segment, i: usize) -> bool {
        let here = self.shape.enclosing[i];
        let mut pending = 0i32;
        for j in seg.start..i {
            if self.shape.enclosing[j] != here {
                continue;
            }
            if self.tokens[j].is("lambda") {
                pending += 1;
            } else if self.tokens[j].is(":") {
                pending -= 1;
            }
        }
        pending > 0
    }

    fn is_binary(&self, seg: &Segment, i: usize) -> bool {
        let tok = &self.tokens[i];
        (tok.kind == TokenKind::Operator && !self.shape.unary[i]) || (tok.is("@") && i != seg.start)
    }

    fn space(&self, seg: &Segment, p: usize, n: usize) -> Space {
        let (prev, next) = (&self.tokens[p], &self.tokens[n]);

        if next.kind == TokenKind::Comment {
            return Space::Two;
        }
        if next.is(".") {
            return if prev.is("from") { Space::One } else { Space::None };
        }
        if prev.is(".") {
            return if next.is("import") { Space::One } else { Space::None };
        }
        if prev.is("@") && p == seg.start {
            return Space::None;
        }
        if prev.is_opener() || next.is_closer() {
            return Space::None;
        }
        if next.is_any(&[",", ";", ":"]) {
            return Space::None;
        }
        if prev.is(":") {
            let in_subscript = self.shape.enclosing_text(self.tokens, p) == Some("[");
            return if in_subscript && !self.lambda_pending(seg, p) { Space::None } else { Space::One };
        }
        if prev.is_any(&[",", ";"]) {
            return Space::One;
        }
        let keyword_argument =
            |k: usize| self.tokens[k].is("=") && self.shape.enclosing_text(self.tokens, k) == Some("(");
        if keyword_argument(p) || keyword_argument(n) {
            return Space::None;
        }
        if self.shape.unary[p] {
            return Space::None;
        }
        if self.is_binary(seg, p) || self.is_binary(seg, n) || next.kind == TokenKind::Operator {
            return Space::One;
        }
        if next.is_opener() {
            return match prev.kind {
                TokenKind::Keyword if !prev.is_any(VALUE_KEYWORDS) => Space::One,
                _ if next.is("{") && prev.is_word() => Space::One,
                TokenKind::Identifier | TokenKind::Str | TokenKind::Keyword => Space::None,
                _ if prev.is_closer() => Space::None,
                _ => Space::Keep,
            };
        }
        if prev.is_closer() && next.is_word() {
            return Space::One;
        }
        if prev.is_word() && next.is_word() {
            return Space::One;
        }
        if next.is("\\") {
            return Space::One;
        }
        Space::Keep
    }

    /// Segment text with continuation lines shifted by the indentation change.
    fn render(&self, seg: &Segment, line: &LogicalLine, base: &str, out: &mut String) {
        for i in seg.start..seg.end {
            if i > seg.start {
                let gap = gap_before(self.text, self.tokens, i);
                if gap.contains('\n') {
                    let shift = width(last_line(gap)).saturating_sub(line.indent);
                    out.push('\n');
                    out.push_str(base);
                    out.push_str(&" ".repeat(shift));
                } else {
                    match self.space(seg, i - 1, i) {
                        Space::None => {}
                        Space::One => out.push(' '),
                        Space::Two => out.push_str("  "),
                        Space::Keep => out.push_str(gap),
                    }
                }
            }
            out.push_str(self.tokens[i].text);
        }
    }
}

pub fn reformat(tokenizer: &Tokenizer, rules: &RuleSet, text: &str) -> String {
    let tokens = tokenizer.tokenize(text);
    if tokens.is_empty() {
        return String::new();
    }
    let layout = Layout {
        text,
        tokens: &tokens,
        shape: Shape::analyze(&tokens, Language::Python),
    };
    let unit = rules.indent_unit();
    let mut tracker = BlockTracker::new();
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for (n, line) in logical_lines(text, &tokens).iter().enumerate() {
        if n > 0 {
            out.push('\n');
            let blanks = if line.blank_before >= BLANK_RUN_COLLAPSE { 1 } else { line.blank_before };
            for _ in 0..blanks {
                out.push('\n');
            }
        }

        let head = &tokens[line.start];
        if head.kind == TokenKind::Comment && line.end == line.start + 1 {
            out.push_str(&unit.repeat(tracker.comment_level(line.indent)));
            out.push_str(head.text);
            continue;
        }

        let mut indent = line.indent;
        for (k, seg) in segments(&tokens, line).iter().enumerate() {
            let first = &tokens[seg.start];
            let transition = k == 0 && first.kind == TokenKind::Keyword && first.is_any(TRANSITIONS);
            let level = tracker.enter_line(indent, transition);
            if k > 0 {
                out.push('\n');
            }
            let base = unit.repeat(level);
            out.push_str(&base);
            layout.render(seg, line, &base, &mut out);

            if seg.block_header {
                let inline = seg.end < line.end;
                tracker.open_block(indent, inline);
                if inline {
                    indent += 1;
                }
            } else if first.kind == TokenKind::Keyword && first.is_any(TERMINALS) {
                tracker.note_terminal();
            }
        }
    }

    if gap_before(text, &tokens, tokens.len()).contains('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> String {
        let tz = Tokenizer::new(Language::Python).unwrap();
        reformat(&tz, &RuleSet::for_language(Language::Python), text)
    }

    #[test]
    fn test_inline_bodies_are_unrolled() {
        assert_eq!(clean("def hello():pass"), "def hello():\n    pass");
        assert_eq!(
            clean("if x>0:print('P')\nelse:print('N')"),
            "if x > 0:\n    print('P')\nelse:\n    print('N')"
        );
        assert_eq!(clean("if a:if b:pass\n"), "if a:\n    if b:\n        pass\n");
    }

    #[test]
    fn test_block_headers_report_inline_bodies() {
        let tz = Tokenizer::new(Language::Python).unwrap();
        let text = "class A:\n    def f(self):return {'k': 1}\n    g = lambda: 0\n";
        let toks = tz.tokenize(text);
        let found: Vec<(usize, Option<&str>, usize)> = block_headers(text, &toks)
            .iter()
            .map(|h| (toks[h.colon].start, h.inline_body.map(|b| toks[b].text), h.indent))
            .collect();
        assert_eq!(found, vec![(7, None, 0), (24, Some("return"), 4)]);
    }

    #[test]
    fn test_colon_spacing_by_context() {
        assert_eq!(clean("d={'a':1,'b':2}"), "d = {'a': 1, 'b': 2}");
        assert_eq!(clean("y=x[1 : 3]+x[::2]"), "y = x[1:3] + x[::2]");
        assert_eq!(clean("f=lambda a:a*2"), "f = lambda a: a * 2");
        assert_eq!(clean("def f(a:int=1)->str:\n    return str(a)\n"), "def f(a: int=1) -> str:\n    return str(a)\n");
    }

    #[test]
    fn test_flat_source_is_reindented() {
        let text = "for i in range(3):\nif i:\nprint(i)\nelse:\ncontinue\nprint('done')\n";
        let expected = "for i in range(3):\n    if i:\n        print(i)\n    else:\n        continue\n    print('done')\n";
        assert_eq!(clean(text), expected);
    }

    #[test]
    fn test_indented_source_keeps_structure() {
        let text = "class A:\n  def f(self,x):\n    if x :\n      return -x\n    return x  # positive\n\n\n\n\nz = A()\n";
        let expected = "class A:\n    def f(self, x):\n        if x:\n            return -x\n        return x  # positive\n\nz = A()\n";
        assert_eq!(clean(text), expected);
    }

    #[test]
    fn test_continuations_and_comments() {
        let text = "\n\nitems = [1,\n         2]  # two\n# note\ntotal = a + \\\n    b\n";
        let expected = "items = [1,\n         2]  # two\n# note\ntotal = a + \\\n    b\n";
        assert_eq!(clean(text), expected);
    }

    #[test]
    fn test_kwargs_unpacking_and_decorators() {
        assert_eq!(
            clean("@app.route( '/' )\ndef f(*args,**kw):\n    return g(a = -1, *args)\n"),
            "@app.route('/')\ndef f(*args, **kw):\n    return g(a=-1, *args)\n"
        );
        assert_eq!(clean("from . import x\nfrom .m import y\n"), "from . import x\nfrom .m import y\n");
    }

    #[test]
    fn test_reformat_is_idempotent() {
        let text = "if x>0:print('P')\nelif x<0:\n  pass\nelse:print({'k':[1,2][0:1]})\n";
        let once = clean(text);
        assert_eq!(clean(&once), once);
    }
}
