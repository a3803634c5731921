//! Lexical analyzer for host type expressions.
//!
//! Produces a flat token vector from annotation text such as
//! `Annotated[dict[str, int], "py::dict"] | None`. Dotted names
//! (`np.float64`, `typing.Optional`) are lexed as a single [`Token::Name`].

use crate::error::TypeError;

/// A single lexical token of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An identifier, possibly dotted (`int`, `np.int32`, `typing.List`).
    Name(String),
    /// A quoted string literal, with the quotes removed.
    Str(String),
    /// An integer literal. Never a valid type, kept so that errors can name it.
    Number(String),
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `...`
    Ellipsis,
    /// End of input.
    Eof,
}

/// Lexes a type expression into tokens. The result always ends with [`Token::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>, TypeError> {
    let mut lexer = Lexer {
        text: source,
        source: source.as_bytes(),
        pos: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, TypeError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.source.len() {
                tokens.push(Token::Eof);
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn error(&self, reason: String) -> TypeError {
        TypeError::malformed_type(self.text, reason)
    }

    fn next_token(&mut self) -> Result<Token, TypeError> {
        let c = self.peek();
        let single = match c {
            b'[' => Some(Token::LBracket),
            b']' => Some(Token::RBracket),
            b',' => Some(Token::Comma),
            b'|' => Some(Token::Pipe),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(token);
        }

        match c {
            b'.' if self.peek_at(1) == b'.' && self.peek_at(2) == b'.' => {
                self.pos += 3;
                Ok(Token::Ellipsis)
            }
            b'"' | b'\'' => self.lex_string(c),
            b'0'..=b'9' | b'-' => Ok(self.lex_number()),
            c if c == b'_' || c.is_ascii_alphabetic() => self.lex_name(),
            _ => {
                let ch = self.text[self.pos..].chars().next().unwrap_or('?');
                Err(self.error(format!("unexpected character '{ch}' at offset {}", self.pos)))
            }
        }
    }

    fn lex_name(&mut self) -> Result<Token, TypeError> {
        let start = self.pos;
        loop {
            while self.peek() == b'_' || self.peek().is_ascii_alphanumeric() {
                self.pos += 1;
            }
            // a dot continues the name only when another segment follows
            let next = self.peek_at(1);
            if self.peek() == b'.' && (next == b'_' || next.is_ascii_alphabetic()) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.peek() == b'.' && self.peek_at(1) != b'.' {
            return Err(self.error(format!("dangling '.' at offset {}", self.pos)));
        }
        Ok(Token::Name(self.text[start..self.pos].to_string()))
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        Token::Number(self.text[start..self.pos].to_string())
    }

    fn lex_string(&mut self, quote: u8) -> Result<Token, TypeError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                0 if self.pos >= self.source.len() => {
                    return Err(self.error(format!(
                        "unterminated string literal starting at offset {start}"
                    )));
                }
                b'\\' => {
                    let escaped = self.peek_at(1);
                    if escaped == quote || escaped == b'\\' {
                        value.push(escaped as char);
                        self.pos += 2;
                    } else {
                        value.push('\\');
                        self.pos += 1;
                    }
                }
                c if c == quote => {
                    self.pos += 1;
                    return Ok(Token::Str(value));
                }
                _ => {
                    // copy one full UTF-8 character
                    let ch = self.text[self.pos..].chars().next().unwrap_or('\0');
                    value.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }
}
