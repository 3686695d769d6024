//! Top-level Less declaration parsing.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This is deliberately not a Less compiler. Theme variant files are flat
//! variable files (`@primary-color: #1890ff;` and friends), so the parser
//! only needs to walk the top level of the file: collect `@name: value;`
//! declarations, skip everything else (comments, strings, rule blocks,
//! at-rules such as `@import` or `@media`), and reject input that is not
//! structurally valid Less.
//!
//! Nested declarations are never collected: a variable declared inside a
//! rule block or mixin is scoped and does not participate in theming.

use crate::error::LessError;

/// A single top-level variable declaration.
///
/// `name` is stored without its leading `@` sigil. `value` is the raw
/// declaration text between `:` and `;`, trimmed; same-file variable
/// references are resolved later (see [`crate::vars`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    /// 1-based source line of the declaration's `@` sigil.
    pub line: usize,
}

/// Parse the top-level variable declarations of a Less source string.
///
/// Returns declarations in source order. A file with no top-level
/// declarations parses to an empty vector, not an error.
///
/// # Errors
///
/// Returns [`LessError::Parse`] for structurally invalid input:
/// unterminated strings/comments, unclosed blocks, a stray `}`, a
/// declaration outside any rule block, or a variable declaration missing
/// its terminating `;`.
pub fn parse_declarations(source: &str) -> Result<Vec<Declaration>, LessError> {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn run(mut self) -> Result<Vec<Declaration>, LessError> {
        let mut declarations = Vec::new();

        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                // Less tolerates stray semicolons between top-level items
                b';' => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'}' => return Err(self.error("unexpected '}'")),
                b'@' => {
                    if let Some(decl) = self.scan_at_item()? {
                        declarations.push(decl);
                    }
                }
                _ => self.scan_rule()?,
            }
        }

        Ok(declarations)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn error(&self, message: &str) -> LessError {
        LessError::Parse {
            message: message.to_string(),
            line: self.line,
            hint: None,
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LessError> {
        let start_line = self.line;
        self.pos += 2; // consume "/*"
        while let Some(b) = self.peek() {
            if b == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return Ok(());
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        Err(LessError::Parse {
            message: "unterminated comment".to_string(),
            line: start_line,
            hint: None,
        })
    }

    fn skip_string(&mut self, quote: u8) -> Result<(), LessError> {
        let start_line = self.line;
        self.pos += 1; // consume opening quote
        while let Some(b) = self.peek() {
            match b {
                b'\\' => {
                    // escape: skip the backslash and the escaped byte
                    self.pos += 2;
                }
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(LessError::Parse {
            message: "unterminated string".to_string(),
            line: start_line,
            hint: None,
        })
    }

    /// Skip a balanced `{ ... }` block; `pos` must be on the opening `{`.
    fn skip_block(&mut self) -> Result<(), LessError> {
        let start_line = self.line;
        self.pos += 1;
        let mut depth = 1usize;
        while let Some(b) = self.peek() {
            match b {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'\'' | b'"' => self.skip_string(b)?,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(LessError::Parse {
            message: "unclosed block".to_string(),
            line: start_line,
            hint: None,
        })
    }

    /// Skip whitespace and comments without leaving the current item.
    fn skip_trivia(&mut self) -> Result<(), LessError> {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    /// Scan an item starting with `@`: either a variable declaration
    /// (returned) or an at-rule such as `@import`/`@media` (skipped).
    ///
    /// The distinction is purely structural: `@name` followed by `:` is a
    /// variable declaration, anything else is an at-rule terminated by `;`
    /// or a block.
    fn scan_at_item(&mut self) -> Result<Option<Declaration>, LessError> {
        let decl_line = self.line;
        self.pos += 1; // consume '@'

        let name_start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == name_start {
            return Err(self.error("expected identifier after '@'"));
        }
        let name = &self.src[name_start..self.pos];

        self.skip_trivia()?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            let value = self.scan_declaration_value(decl_line)?;
            return Ok(Some(Declaration {
                name: name.to_string(),
                value,
                line: decl_line,
            }));
        }

        // At-rule: skip to its terminating ';' or over its block
        while let Some(b) = self.peek() {
            match b {
                b';' => {
                    self.pos += 1;
                    return Ok(None);
                }
                b'{' => {
                    self.skip_block()?;
                    return Ok(None);
                }
                b'\'' | b'"' => self.skip_string(b)?,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(LessError::Parse {
            message: format!("unterminated @{} rule", name),
            line: decl_line,
            hint: None,
        })
    }

    /// Scan a declaration value up to its terminating `;`.
    ///
    /// Strings, comments and detached rulesets (`@a: { ... };`) are skipped
    /// as opaque units so a `;` inside them does not end the value.
    fn scan_declaration_value(&mut self, decl_line: usize) -> Result<String, LessError> {
        let value_start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b';' => {
                    let value = self.src[value_start..self.pos].trim().to_string();
                    self.pos += 1;
                    return Ok(value);
                }
                b'\'' | b'"' => self.skip_string(b)?,
                b'{' => self.skip_block()?,
                b'}' => return Err(self.error("unexpected '}' in declaration value")),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(LessError::Parse {
            message: "declaration missing terminating ';'".to_string(),
            line: decl_line,
            hint: None,
        })
    }

    /// Scan a rule (`.selector { ... }`) and skip its block entirely.
    /// Declarations inside the block are scoped, never top-level.
    fn scan_rule(&mut self) -> Result<(), LessError> {
        let start_line = self.line;
        while let Some(b) = self.peek() {
            match b {
                b'{' => return self.skip_block(),
                b';' => return Err(self.error("declaration outside a rule block")),
                b'}' => return Err(self.error("unexpected '}'")),
                b'\'' | b'"' => self.skip_string(b)?,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(LessError::Parse {
            message: "unexpected end of input in selector".to_string(),
            line: start_line,
            hint: None,
        })
    }
}
