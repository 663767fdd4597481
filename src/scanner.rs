//! Pull-based tokenizer for filter queries.
//!
//! The scanner walks the query with a byte cursor and, on every request,
//! tries the lexical rules in table order against the remaining text. The
//! first rule that matches a non-empty prefix produces the token.

use crate::error::LexError;
use serde::{Deserialize, Serialize};
use std::fmt;

mod rules;

/// Kinds of token produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Number,
    String,
    Boolean,
    /// Unquoted RFC3339 timestamp
    Date,
    OpenParen,
    CloseParen,
    Comma,
    /// One of `eq`, `ne`, `gt`, `ge`, `lt`, `le`
    RelationalOperator,
    /// One of `and`, `or`
    LogicalOperator,
    Identifier,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Date => "DATE",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Comma => ",",
            TokenKind::RelationalOperator => "RELATIONAL_OPERATOR",
            TokenKind::LogicalOperator => "LOGICAL_OPERATOR",
            TokenKind::Identifier => "IDENTIFIER",
        };
        f.write_str(name)
    }
}

/// A token with the exact text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched text; string tokens keep their quotes.
    pub text: String,
    /// Byte offset of the first character in the query.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }
}

pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }

    /// The full query being scanned.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the next unscanned character.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more_tokens(&self) -> bool {
        self.cursor < self.text.len()
    }

    /// Scans the next token.
    ///
    /// Returns `Ok(None)` once the input is exhausted; trailing whitespace
    /// counts as exhausted input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while self.has_more_tokens() {
            let rest = &self.text[self.cursor..];
            let matched = rules::RULES
                .iter()
                .find_map(|rule| rule.match_len(rest).map(|len| (len, rule.kind)));

            let Some((len, kind)) = matched else {
                let character = rest.chars().next().unwrap_or_default();
                return Err(LexError::UnexpectedCharacter {
                    character,
                    position: self.cursor,
                });
            };

            let start = self.cursor;
            self.cursor += len;

            if let Some(kind) = kind {
                let token = Token::new(kind, &rest[..len], start);
                log::trace!("scanned {} '{}' at {}", token.kind, token.text, start);
                return Ok(Some(token));
            }
        }

        Ok(None)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next_token().transpose();
        if matches!(item, Some(Err(_))) {
            // Lexical errors are not recoverable; stop after reporting one.
            self.cursor = self.text.len();
        }
        item
    }
}

/// Scans the whole query into a token list.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    Scanner::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Token {
        Scanner::new(text)
            .next_token()
            .expect("scan should succeed")
            .expect("a token should be present")
    }

    #[test]
    fn test_empty_input_is_end_of_input() {
        assert_eq!(Scanner::new("").next_token(), Ok(None));
        assert_eq!(Scanner::new(" \t\n ").next_token(), Ok(None));
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let token = single("   42");
        assert_eq!(token, Token::new(TokenKind::Number, "42", 3));
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(single("eq").kind, TokenKind::RelationalOperator);
        assert_eq!(single("and").kind, TokenKind::LogicalOperator);
        assert_eq!(single("true").kind, TokenKind::Boolean);
        assert_eq!(single("equal").kind, TokenKind::Identifier);
        assert_eq!(single("order").kind, TokenKind::Identifier);
        assert_eq!(single("falsey").kind, TokenKind::Identifier);
    }

    #[test]
    fn test_string_keeps_quotes() {
        assert_eq!(single(r#""sith lord""#).text, r#""sith lord""#);
        assert_eq!(single("'jedi'").text, "'jedi'");
    }

    #[test]
    fn test_date_before_number() {
        let token = single("2020-04-03T08:58:26Z");
        assert_eq!(token.kind, TokenKind::Date);
        assert_eq!(token.text, "2020-04-03T08:58:26Z");
    }

    #[test]
    fn test_unexpected_character_reports_offset() {
        let mut scanner = Scanner::new("eq(a, +1)");
        let kinds: Vec<_> = (0..3)
            .map(|_| scanner.next_token().unwrap().unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::RelationalOperator,
                TokenKind::OpenParen,
                TokenKind::Identifier
            ]
        );
        scanner.next_token().unwrap();
        assert_eq!(
            scanner.next_token(),
            Err(LexError::UnexpectedCharacter {
                character: '+',
                position: 6
            })
        );
    }

    #[test]
    fn test_unterminated_string_is_rejected() {
        assert_eq!(
            tokenize(r#"eq(a, "open)"#),
            Err(LexError::UnexpectedCharacter {
                character: '"',
                position: 6
            })
        );
    }

    #[test]
    fn test_character_classes_are_ascii_only() {
        let cases = [
            ("eq(naïve, 1)", 'ï', 5),
            ("eq(a, ٣)", '٣', 6),
            ("eq(a,\u{a0}1)", '\u{a0}', 5),
        ];
        for (text, character, position) in cases {
            assert_eq!(
                tokenize(text),
                Err(LexError::UnexpectedCharacter {
                    character,
                    position
                }),
                "query {text:?}"
            );
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut scanner = Scanner::new("1 $ 2");
        assert!(matches!(scanner.next(), Some(Ok(_))));
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
