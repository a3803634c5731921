//! Syntax tree and recursive-descent parser for host type expressions.
//!
//! [`TypeExpr`] is a faithful, uninterpreted view of the annotation text: it
//! still contains `Annotated[...]` wrappers, string literals, and callable
//! parameter lists. Interpretation happens in [`crate::annotation`] and
//! [`crate::tree`].

use std::fmt;

use crate::error::TypeError;
use crate::lexer::{lex, Token};

/// The parsed, uninterpreted form of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare (possibly dotted) name: `int`, `np.int32`, `None`.
    Name(String),
    /// A subscripted generic: `list[int]`, `Annotated[int, "uint32_t"]`.
    Subscript {
        /// The generic origin.
        name: String,
        /// The type arguments, in source order.
        args: Vec<TypeExpr>,
    },
    /// A bracketed list, only meaningful as a `Callable` parameter list.
    List(Vec<TypeExpr>),
    /// A `A | B | ...` union written with the pipe operator.
    Union(Vec<TypeExpr>),
    /// The `...` marker.
    Ellipsis,
    /// A quoted string literal.
    Str(String),
    /// An integer literal.
    Number(String),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{name}"),
            TypeExpr::Subscript { name, args } => {
                write!(f, "{name}[")?;
                write_joined(f, args, ", ")?;
                write!(f, "]")
            }
            TypeExpr::List(items) => {
                write!(f, "[")?;
                write_joined(f, items, ", ")?;
                write!(f, "]")
            }
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Ellipsis => write!(f, "..."),
            TypeExpr::Str(text) => write!(f, "{text:?}"),
            TypeExpr::Number(text) => write!(f, "{text}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Parses annotation text into a [`TypeExpr`].
///
/// The whole input must be consumed; trailing tokens are an error.
pub fn parse_expr(text: &str) -> Result<TypeExpr, TypeError> {
    let tokens = lex(text)?;
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_union()?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(parser.error(format!("unexpected trailing {}", describe(other)))),
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, reason: String) -> TypeError {
        TypeError::malformed_type(self.text, reason)
    }

    fn expect(&mut self, expected: Token) -> Result<(), TypeError> {
        let found = self.bump();
        if found == expected {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                describe(&expected),
                describe(&found)
            )))
        }
    }

    fn parse_union(&mut self) -> Result<TypeExpr, TypeError> {
        let first = self.parse_atom()?;
        if *self.peek() != Token::Pipe {
            return Ok(first);
        }
        let mut members = vec![first];
        while *self.peek() == Token::Pipe {
            self.bump();
            members.push(self.parse_atom()?);
        }
        Ok(TypeExpr::Union(members))
    }

    fn parse_atom(&mut self) -> Result<TypeExpr, TypeError> {
        match self.bump() {
            Token::Name(name) => {
                if *self.peek() != Token::LBracket {
                    return Ok(TypeExpr::Name(name));
                }
                self.bump();
                let args = self.parse_list_items()?;
                if args.is_empty() {
                    return Err(self.error(format!("'{name}[]' needs at least one type argument")));
                }
                Ok(TypeExpr::Subscript { name, args })
            }
            Token::LBracket => Ok(TypeExpr::List(self.parse_list_items()?)),
            Token::Ellipsis => Ok(TypeExpr::Ellipsis),
            Token::Str(text) => Ok(TypeExpr::Str(text)),
            Token::Number(text) => Ok(TypeExpr::Number(text)),
            other => Err(self.error(format!("expected a type, found {}", describe(&other)))),
        }
    }

    /// Parses comma-separated items up to and including the closing `]`.
    fn parse_list_items(&mut self) -> Result<Vec<TypeExpr>, TypeError> {
        let mut items = Vec::new();
        if *self.peek() == Token::RBracket {
            self.bump();
            return Ok(items);
        }
        loop {
            items.push(self.parse_union()?);
            match self.peek() {
                Token::Comma => {
                    self.bump();
                }
                _ => break,
            }
        }
        self.expect(Token::RBracket)?;
        Ok(items)
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Name(name) => format!("name '{name}'"),
        Token::Str(text) => format!("string {text:?}"),
        Token::Number(text) => format!("number {text}"),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::Ellipsis => "'...'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}
