//! Explicit block-scope stack for indentation-significant code.
//!
//! Every open block remembers the source indentation of its header and,
//! once its first body line is seen, the indentation of its body. The
//! emitted level of a line is the number of scopes open around it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scope {
    header_indent: usize,
    body_indent: Option<usize>,
}

impl Scope {
    /// Body not indented past its header, as in flattened one-line input.
    fn degenerate(&self) -> bool {
        self.body_indent.is_some_and(|body| body <= self.header_indent)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockTracker {
    scopes: Vec<Scope>,
    pending_terminal: bool,
}

impl BlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a statement line with source indentation `indent` and return its level.
    ///
    /// `transition` marks `elif`/`else`/`except`/`finally`, which close the
    /// block they continue.
    pub fn enter_line(&mut self, indent: usize, transition: bool) -> usize {
        if std::mem::take(&mut self.pending_terminal)
            && self.scopes.last().is_some_and(Scope::degenerate)
        {
            self.scopes.pop();
        }

        if let Some(top) = self.scopes.last_mut() {
            if top.body_indent.is_none() && !(transition && indent <= top.header_indent) {
                top.body_indent = Some(indent);
            }
        }

        while let Some(body) = self.scopes.last().and_then(|s| s.body_indent) {
            if indent < body {
                self.scopes.pop();
            } else {
                break;
            }
        }

        if transition {
            while self.scopes.last().is_some_and(|s| s.header_indent > indent) {
                self.scopes.pop();
            }
            if self.scopes.last().is_some_and(|s| s.header_indent == indent) {
                self.scopes.pop();
            }
        }
        self.scopes.len()
    }

    /// Level a comment-only line at `indent` would get, leaving the stack untouched.
    pub fn comment_level(&self, indent: usize) -> usize {
        let mut level = self.scopes.len();
        for scope in self.scopes.iter().rev() {
            let inside = match scope.body_indent {
                Some(body) => indent >= body,
                None => indent > scope.header_indent,
            };
            if inside {
                break;
            }
            level -= 1;
        }
        level
    }

    /// A block header ending in a colon was emitted at `header_indent`.
    ///
    /// An `inline` body follows on the same source line; it gets a
    /// synthetic indentation one column past the header.
    pub fn open_block(&mut self, header_indent: usize, inline: bool) {
        self.scopes.push(Scope {
            header_indent,
            body_indent: inline.then_some(header_indent + 1),
        });
    }

    /// The last line was `pass`, `break`, `continue`, `return` or `raise`.
    pub fn note_terminal(&mut self) {
        self.pending_terminal = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented_source_follows_dedent() {
        let mut t = BlockTracker::new();
        assert_eq!(t.enter_line(0, false), 0); // def f():
        t.open_block(0, false);
        assert_eq!(t.enter_line(4, false), 1); // if x:
        t.open_block(4, false);
        assert_eq!(t.enter_line(8, false), 2); // return 1
        t.note_terminal();
        assert_eq!(t.enter_line(4, false), 1); // return 2
        assert_eq!(t.enter_line(0, false), 0);
    }

    #[test]
    fn test_flat_source_uses_terminals_and_transitions() {
        let mut t = BlockTracker::new();
        assert_eq!(t.enter_line(0, false), 0); // if a:
        t.open_block(0, false);
        assert_eq!(t.enter_line(0, false), 1); // pass
        t.note_terminal();
        assert_eq!(t.enter_line(0, true), 0); // else:
        t.open_block(0, false);
        assert_eq!(t.enter_line(0, false), 1); // x = 1
        assert_eq!(t.enter_line(0, true), 0); // finally:
    }

    #[test]
    fn test_inline_bodies() {
        let mut t = BlockTracker::new();
        assert_eq!(t.enter_line(0, false), 0); // if x:
        t.open_block(0, true);
        assert_eq!(t.enter_line(1, false), 1); // print('P')
        assert_eq!(t.enter_line(0, true), 0); // else:
        t.open_block(0, true);
        assert_eq!(t.enter_line(1, false), 1); // print('N')
        assert_eq!(t.enter_line(0, false), 0);
    }

    #[test]
    fn test_comment_level_does_not_mutate() {
        let mut t = BlockTracker::new();
        t.enter_line(0, false);
        t.open_block(0, false);
        assert_eq!(t.comment_level(4), 1);
        assert_eq!(t.comment_level(0), 0);
        assert_eq!(t.enter_line(4, false), 1);
    }
}
