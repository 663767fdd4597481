//! Error types for scanning, parsing and compiling filter queries.

use crate::scanner::{Token, TokenKind};
use std::fmt;
use thiserror::Error;

/// A specialized Result type for the query pipeline.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by the scanner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    /// No lexical rule matches the input at `position`.
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// The query holds nothing but whitespace.
    #[error("no tokens present")]
    NoTokens,
}

/// What the parser was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A token of exactly this kind.
    Token(TokenKind),
    /// Any literal: number, string, boolean or date.
    Literal,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Literal => f.write_str("LITERAL"),
        }
    }
}

impl From<TokenKind> for Expected {
    fn from(kind: TokenKind) -> Self {
        Expected::Token(kind)
    }
}

/// Errors raised by the parser.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The lookahead does not fit the production being parsed.
    #[error("unexpected token: {}, expected: {expected} at position {}", .found.text, .found.offset)]
    UnexpectedToken { found: Token, expected: Expected },

    /// The input ran out where a token was required.
    #[error("unexpected end of input, expected: {expected} at position {position}")]
    UnexpectedEndOfInput { expected: Expected, position: usize },

    /// A literal token whose text cannot be converted to its value.
    #[error("invalid literal '{text}' at position {position}: {reason}")]
    InvalidLiteral {
        text: String,
        reason: String,
        position: usize,
    },

    /// Tokens remain after a complete query in strict mode.
    #[error("unexpected trailing input: {} at position {}", .found.text, .found.offset)]
    TrailingInput { found: Token },
}

impl ParseError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(found: Token, expected: impl Into<Expected>) -> Self {
        ParseError::UnexpectedToken {
            found,
            expected: expected.into(),
        }
    }

    /// Creates an unexpected end of input error.
    pub fn unexpected_end(expected: impl Into<Expected>, position: usize) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.into(),
            position,
        }
    }

    /// Byte offset in the query where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { found, .. } | ParseError::TrailingInput { found } => {
                found.offset
            }
            ParseError::UnexpectedEndOfInput { position, .. }
            | ParseError::InvalidLiteral { position, .. } => *position,
        }
    }
}

/// Any failure of the scan -> parse pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
