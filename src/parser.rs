//! Recursive descent parser for filter queries.

use crate::error::{Expected, LexError, ParseError, QueryResult};
use crate::scanner::{Scanner, Token, TokenKind};
use chrono::DateTime;

mod ast;

pub use ast::{Literal, LogOp, LogicalFunction, Node, Program, RelOp, RelationalFunction};

/// LL(1) parser over a pull-based [`Scanner`].
///
/// # Grammar
///
/// ```text
/// Program            -> Expression
/// Expression         -> Function | Literal
/// Function           -> LogicalFunction | RelationalFunction
/// LogicalFunction    -> LogOp '(' Arguments ')'
/// RelationalFunction -> RelOp '(' Identifier ',' Literal ')'
/// Arguments          -> Expression ',' Expression (',' Expression)*
/// Literal            -> Number | String | Boolean | Date
/// ```
///
/// The production is chosen from the kind of the lookahead token alone; there
/// is no backtracking. Parsing stops at the first error.
///
/// # Example
///
/// ```
/// use filter_query::parser::{Node, QueryParser};
///
/// let program = QueryParser::parse(r#"and(eq(name, "x"), gt(count, 2))"#).unwrap();
/// assert!(matches!(program.body, Node::Logical(_)));
/// ```
pub struct QueryParser<'a> {
    scanner: Scanner<'a>,
    lookahead: Option<Token>,
    strict: bool,
}

impl<'a> QueryParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
            lookahead: None,
            strict: false,
        }
    }

    /// Reject tokens left over after a complete expression.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parses `text` with default (non-strict) settings.
    pub fn parse(text: &str) -> QueryResult<Program> {
        QueryParser::new(text).run()
    }

    /// Parses the whole query into a [`Program`].
    ///
    /// # Errors
    ///
    /// Returns `LexError::NoTokens` for an empty or whitespace-only query, the
    /// first lexical error met while pulling tokens, or the first `ParseError`.
    pub fn run(mut self) -> QueryResult<Program> {
        self.lookahead = self.scanner.next_token()?;
        if self.lookahead.is_none() {
            return Err(LexError::NoTokens.into());
        }

        let program = self.program()?;

        if self.strict
            && let Some(found) = self.lookahead.take()
        {
            return Err(ParseError::TrailingInput { found }.into());
        }

        log::debug!("parsed query {:?}", self.scanner.text());
        Ok(program)
    }

    fn program(&mut self) -> QueryResult<Program> {
        let body = self.expression()?;
        Ok(Program { body })
    }

    fn expression(&mut self) -> QueryResult<Node> {
        match self.lookahead_kind() {
            Some(TokenKind::RelationalOperator) => self.relational_function(),
            Some(TokenKind::LogicalOperator) => self.logical_function(),
            _ => Ok(Node::Literal(self.literal()?)),
        }
    }

    fn relational_function(&mut self) -> QueryResult<Node> {
        let operator_token = self.eat(TokenKind::RelationalOperator)?;
        let operator = operator_token
            .text
            .parse::<RelOp>()
            .map_err(|_| ParseError::unexpected_token(operator_token, TokenKind::RelationalOperator))?;
        log::trace!("entering relational function '{operator}'");

        self.eat(TokenKind::OpenParen)?;
        let field = self.eat(TokenKind::Identifier)?.text;
        self.eat(TokenKind::Comma)?;
        let value = self.literal()?;
        self.eat(TokenKind::CloseParen)?;

        Ok(Node::relational(operator, field, value))
    }

    fn logical_function(&mut self) -> QueryResult<Node> {
        let operator_token = self.eat(TokenKind::LogicalOperator)?;
        let operator = operator_token
            .text
            .parse::<LogOp>()
            .map_err(|_| ParseError::unexpected_token(operator_token, TokenKind::LogicalOperator))?;
        log::trace!("entering logical function '{operator}'");

        self.eat(TokenKind::OpenParen)?;
        let arguments = self.arguments()?;
        self.eat(TokenKind::CloseParen)?;

        Ok(Node::logical(operator, arguments))
    }

    /// Two or more comma separated expressions.
    fn arguments(&mut self) -> QueryResult<Vec<Node>> {
        let mut arguments = vec![self.expression()?];

        self.eat(TokenKind::Comma)?;
        arguments.push(self.expression()?);

        while self.lookahead_kind() == Some(TokenKind::Comma) {
            self.eat(TokenKind::Comma)?;
            arguments.push(self.expression()?);
        }

        Ok(arguments)
    }

    fn literal(&mut self) -> QueryResult<Literal> {
        match self.lookahead_kind() {
            Some(TokenKind::Number) => self.numeric_literal(),
            Some(TokenKind::String) => self.string_literal(),
            Some(TokenKind::Boolean) => self.boolean_literal(),
            Some(TokenKind::Date) => self.date_literal(),
            _ => Err(self.expected_literal().into()),
        }
    }

    fn expected_literal(&mut self) -> ParseError {
        match self.lookahead.take() {
            Some(found) => ParseError::unexpected_token(found, Expected::Literal),
            None => ParseError::unexpected_end(Expected::Literal, self.end_position()),
        }
    }

    fn numeric_literal(&mut self) -> QueryResult<Literal> {
        let token = self.eat(TokenKind::Number)?;
        let value = token
            .text
            .parse::<i64>()
            .map_err(|e| invalid_literal(&token, e))?;
        Ok(Literal::Numeric(value))
    }

    fn string_literal(&mut self) -> QueryResult<Literal> {
        let token = self.eat(TokenKind::String)?;
        // Both delimiters are single-byte quotes.
        let value = &token.text[1..token.text.len() - 1];
        Ok(Literal::String(value.to_string()))
    }

    fn boolean_literal(&mut self) -> QueryResult<Literal> {
        let token = self.eat(TokenKind::Boolean)?;
        let value = token
            .text
            .parse::<bool>()
            .map_err(|e| invalid_literal(&token, e))?;
        Ok(Literal::Boolean(value))
    }

    fn date_literal(&mut self) -> QueryResult<Literal> {
        let token = self.eat(TokenKind::Date)?;
        let value = DateTime::parse_from_rfc3339(&token.text)
            .map_err(|e| invalid_literal(&token, e))?;
        Ok(Literal::Date(value))
    }

    /// Consumes the lookahead if it has the expected kind and pulls the next token.
    fn eat(&mut self, expected: TokenKind) -> QueryResult<Token> {
        let Some(token) = self.lookahead.take() else {
            return Err(ParseError::unexpected_end(expected, self.end_position()).into());
        };

        if token.kind != expected {
            return Err(ParseError::unexpected_token(token, expected).into());
        }

        self.lookahead = self.scanner.next_token()?;
        Ok(token)
    }

    fn lookahead_kind(&self) -> Option<TokenKind> {
        self.lookahead.as_ref().map(|token| token.kind)
    }

    fn end_position(&self) -> usize {
        self.scanner.text().len()
    }
}

fn invalid_literal(token: &Token, reason: impl ToString) -> ParseError {
    ParseError::InvalidLiteral {
        text: token.text.clone(),
        reason: reason.to_string(),
        position: token.offset,
    }
}
