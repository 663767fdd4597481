//! Abstract syntax tree for filter queries.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Relational operators accepted in field comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl RelOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            RelOp::Eq => "eq",
            RelOp::Ne => "ne",
            RelOp::Gt => "gt",
            RelOp::Ge => "ge",
            RelOp::Lt => "lt",
            RelOp::Le => "le",
        }
    }
}

impl FromStr for RelOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(RelOp::Eq),
            "ne" => Ok(RelOp::Ne),
            "gt" => Ok(RelOp::Gt),
            "ge" => Ok(RelOp::Ge),
            "lt" => Ok(RelOp::Lt),
            "le" => Ok(RelOp::Le),
            _ => Err(format!("unknown relational operator: '{s}'")),
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Logical combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOp {
    And,
    Or,
}

impl LogOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogOp::And => "and",
            LogOp::Or => "or",
        }
    }
}

impl FromStr for LogOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(LogOp::And),
            "or" => Ok(LogOp::Or),
            _ => Err(format!("unknown logical operator: '{s}'")),
        }
    }
}

impl fmt::Display for LogOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A literal value written in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Literal {
    #[serde(rename = "NumericLiteral")]
    Numeric(i64),
    /// Quotes already stripped.
    #[serde(rename = "StringLiteral")]
    String(String),
    #[serde(rename = "BooleanLiteral")]
    Boolean(bool),
    #[serde(rename = "DateLiteral")]
    Date(DateTime<FixedOffset>),
}

/// `op(field, literal)`: the field is always a bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationalFunction {
    pub operator: RelOp,
    pub field: String,
    pub value: Literal,
}

/// `op(expr, expr, ...)` with at least two arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalFunction {
    pub operator: LogOp,
    pub arguments: Vec<Node>,
}

/// Any complete expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    Literal(Literal),
    #[serde(rename = "RelationalFunction")]
    Relational(RelationalFunction),
    #[serde(rename = "LogicalFunction")]
    Logical(LogicalFunction),
}

impl Node {
    /// Creates a relational function node.
    ///
    /// # Example
    ///
    /// ```
    /// use filter_query::parser::{Literal, Node, RelOp};
    ///
    /// let node = Node::relational(RelOp::Gt, "count", Literal::Numeric(2));
    /// assert!(matches!(node, Node::Relational(_)));
    /// ```
    pub fn relational(operator: RelOp, field: impl Into<String>, value: Literal) -> Self {
        Node::Relational(RelationalFunction {
            operator,
            field: field.into(),
            value,
        })
    }

    /// Creates a logical function node.
    pub fn logical(operator: LogOp, arguments: Vec<Node>) -> Self {
        Node::Logical(LogicalFunction {
            operator,
            arguments,
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Literal(Literal::String(value.into()))
    }

    pub fn number(value: i64) -> Self {
        Node::Literal(Literal::Numeric(value))
    }

    pub fn boolean(value: bool) -> Self {
        Node::Literal(Literal::Boolean(value))
    }
}

/// A parsed query: exactly one root expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub body: Node,
}
