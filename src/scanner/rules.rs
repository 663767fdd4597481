use super::TokenKind;
use regex::Regex;
use std::sync::LazyLock;

/// One entry of the lexical table. A rule without a kind is skipped.
pub(super) struct Rule {
    pub pattern: Regex,
    pub kind: Option<TokenKind>,
}

impl Rule {
    fn new(pattern: &str, kind: Option<TokenKind>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid lexical rule"),
            kind,
        }
    }

    /// Length of the non-empty prefix of `text` this rule matches, if any.
    pub fn match_len(&self, text: &str) -> Option<usize> {
        self.pattern
            .find(text)
            .map(|m| m.end())
            .filter(|len| *len > 0)
    }
}

/// Lexical rules in priority order; the first matching rule wins.
///
/// Every pattern starts with `(?-u)` so `\s`, `\d`, `\w` and `\b` only match
/// ASCII. Keywords share a character class with identifiers, so every keyword
/// rule is anchored on a word boundary and listed before `\w+`. The date rule
/// must precede the number rule or the year would lex as a number.
pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Whitespace
        Rule::new(r"(?-u)^\s+", None),
        // Delimiters
        Rule::new(r"^\(", Some(TokenKind::OpenParen)),
        Rule::new(r"^\)", Some(TokenKind::CloseParen)),
        Rule::new(r"^,", Some(TokenKind::Comma)),
        // RFC3339 timestamps, e.g. 2020-04-03T08:58:26Z
        Rule::new(
            r"(?-u)^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})",
            Some(TokenKind::Date),
        ),
        // Numbers
        Rule::new(r"(?-u)^\d+", Some(TokenKind::Number)),
        // eq, ne, lt, le, gt, ge
        Rule::new(
            r"(?-u)^(?:eq|ne|lt|le|gt|ge)\b",
            Some(TokenKind::RelationalOperator),
        ),
        // and, or
        Rule::new(r"(?-u)^(?:and|or)\b", Some(TokenKind::LogicalOperator)),
        Rule::new(r"(?-u)^(?:true|false)\b", Some(TokenKind::Boolean)),
        Rule::new(r"(?-u)^\w+", Some(TokenKind::Identifier)),
        // Quoted strings, no escapes
        Rule::new(r#"^"[^"]*""#, Some(TokenKind::String)),
        Rule::new(r"^'[^']*'", Some(TokenKind::String)),
    ]
});
