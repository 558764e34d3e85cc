//! Compact text notation for binary trees.
//!
//! ```text
//! node  := label [ "{" child "," child "}" ]
//! child := "_" | node
//! label := quoted | bare
//! ```
//!
//! A bare label is any run of characters other than whitespace, `{`, `}`,
//! `,` and `"`. Quoted labels accept `\"` and `\\` escapes. `_` marks a
//! missing child. Example: `f(2) { f(1), f(0) }`.

use tracing::instrument;

use crate::domain::builder::TreeSpec;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{BinaryTree, Side};

const EMPTY_CHILD: &str = "_";

#[instrument(level = "debug", skip(input), fields(len = input.len()))]
pub fn parse_tree(input: &str) -> DomainResult<BinaryTree> {
    parse_spec(input)?.build()
}

pub fn parse_spec(input: &str) -> DomainResult<TreeSpec> {
    let mut parser = Parser { input, pos: 0 };
    parser.skip_ws();
    let root = parser
        .node()?
        .ok_or_else(|| DomainError::parse(0, "the root node cannot be empty"))?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(DomainError::parse(parser.pos, "unexpected trailing input"));
    }
    Ok(root)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> DomainResult<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(DomainError::parse(
                self.pos,
                format!("expected '{}', found '{}'", expected, c),
            )),
            None => Err(DomainError::parse(
                self.pos,
                format!("expected '{}', found end of input", expected),
            )),
        }
    }

    /// Parses one node with all its descendants; `Ok(None)` for the `_` marker.
    ///
    /// Nesting is tracked on an explicit stack of open nodes, each waiting for
    /// its left or right child, so input depth is bounded by memory only.
    fn node(&mut self) -> DomainResult<Option<TreeSpec>> {
        let mut open: Vec<(TreeSpec, Side)> = Vec::new();
        loop {
            let mut done = match self.label()? {
                Some(label) => {
                    self.skip_ws();
                    if self.peek() == Some('{') {
                        self.bump();
                        open.push((TreeSpec::leaf(label), Side::Left));
                        continue;
                    }
                    Some(TreeSpec::leaf(label))
                }
                None => None,
            };

            // Hand the finished node to its parent, closing parents whose
            // right child just completed
            loop {
                let Some((mut parent, side)) = open.pop() else {
                    return Ok(done);
                };
                match side {
                    Side::Left => {
                        parent.left = done.map(Box::new);
                        self.expect(',')?;
                        open.push((parent, Side::Right));
                        break;
                    }
                    Side::Right => {
                        parent.right = done.map(Box::new);
                        self.expect('}')?;
                        done = Some(parent);
                    }
                }
            }
        }
    }

    /// Label of the next node; `Ok(None)` for the `_` marker.
    fn label(&mut self) -> DomainResult<Option<String>> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.quoted().map(Some),
            Some(_) => {
                let bare = self.bare()?;
                Ok((bare != EMPTY_CHILD).then_some(bare))
            }
            None => Err(DomainError::parse(self.pos, "expected a label")),
        }
    }

    fn bare(&mut self) -> DomainResult<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',' | '"') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            let found = self.peek().map(String::from).unwrap_or_default();
            return Err(DomainError::parse(
                start,
                format!("expected a label, found '{}'", found),
            ));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn quoted(&mut self) -> DomainResult<String> {
        let start = self.pos;
        self.bump();
        let mut label = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(label),
                Some('\\') => match self.bump() {
                    Some(c @ ('"' | '\\')) => label.push(c),
                    Some(c) => {
                        return Err(DomainError::parse(
                            self.pos - c.len_utf8(),
                            format!("unknown escape '\\{}'", c),
                        ))
                    }
                    None => break,
                },
                Some(c) => label.push(c),
                None => break,
            }
        }
        Err(DomainError::parse(start, "unterminated quoted label"))
    }
}
