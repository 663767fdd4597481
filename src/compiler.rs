//! Compiles a parsed query into a document-store filter.
//!
//! # Output shape
//!
//! ```text
//! eq(f, v)           {f: v}
//! ne|gt|ge|lt|le     {f: {"$ne"|"$gt"|"$gte"|"$lt"|"$lte": v}}
//! and|or(a, b, ...)  {"$and"|"$or": [a', b', ...]}
//! bare literal v     {"$or": [{field: v} for field in literal_comparison_fields]}
//! ```
//!
//! A bare literal is a literal that stands for a whole expression, either the
//! entire query or one argument of a logical function. The fan-out across the
//! configured fields lives here so the grammar stays free of it.

use crate::parser::{Literal, LogOp, LogicalFunction, Node, Program, RelOp, RelationalFunction};
use chrono::Utc;

mod document;

pub use document::{Document, FilterValue};

/// Document-store spelling of a comparison. `eq` has none: equality is
/// written as a plain `{field: value}` pair.
pub fn comparison_operator(operator: RelOp) -> Option<&'static str> {
    match operator {
        RelOp::Eq => None,
        RelOp::Ne => Some("$ne"),
        RelOp::Gt => Some("$gt"),
        RelOp::Ge => Some("$gte"),
        RelOp::Lt => Some("$lt"),
        RelOp::Le => Some("$lte"),
    }
}

/// Document-store spelling of a logical combinator.
pub fn logical_operator(operator: LogOp) -> &'static str {
    match operator {
        LogOp::And => "$and",
        LogOp::Or => "$or",
    }
}

/// Walks a [`Program`] and emits its filter [`Document`].
///
/// The compiler only reads the tree; compiling the same program twice gives
/// equal documents.
pub struct FilterCompiler<'a> {
    literal_comparison_fields: &'a [String],
}

impl<'a> FilterCompiler<'a> {
    /// `literal_comparison_fields` are the fields a bare literal is matched
    /// against, in output order.
    pub fn new(literal_comparison_fields: &'a [String]) -> Self {
        Self {
            literal_comparison_fields,
        }
    }

    pub fn compile(&self, program: &Program) -> Document {
        let document = self.compile_expression(&program.body);
        log::debug!("compiled filter with {} top-level key(s)", document.len());
        document
    }

    /// Compiles any expression node.
    ///
    /// # Panics
    ///
    /// Panics on a logical function with fewer than two arguments. The parser
    /// never builds one, so this only fires for hand-built trees.
    pub fn compile_expression(&self, node: &Node) -> Document {
        match node {
            Node::Relational(function) => self.relational_function(function),
            Node::Logical(function) => self.logical_function(function),
            Node::Literal(literal) => self.literal_fan_out(literal),
        }
    }

    fn relational_function(&self, function: &RelationalFunction) -> Document {
        let value = literal_value(&function.value);
        let mut document = Document::new();

        match comparison_operator(function.operator) {
            None => document.insert(function.field.as_str(), value),
            Some(operator) => {
                let mut comparison = Document::new();
                comparison.insert(operator, value);
                document.insert(function.field.as_str(), comparison);
            }
        }

        document
    }

    fn logical_function(&self, function: &LogicalFunction) -> Document {
        assert!(
            function.arguments.len() >= 2,
            "logical function '{}' requires at least two arguments, got {}",
            function.operator,
            function.arguments.len()
        );

        let arguments: Vec<Document> = function
            .arguments
            .iter()
            .map(|argument| self.compile_expression(argument))
            .collect();

        let mut document = Document::new();
        document.insert(logical_operator(function.operator), arguments);
        document
    }

    fn literal_fan_out(&self, literal: &Literal) -> Document {
        if self.literal_comparison_fields.is_empty() {
            log::warn!("no literal comparison fields configured; bare literal yields an empty $or");
        }

        let value = literal_value(literal);
        let comparisons: Vec<Document> = self
            .literal_comparison_fields
            .iter()
            .map(|field| {
                let mut comparison = Document::new();
                comparison.insert(field.as_str(), value.clone());
                comparison
            })
            .collect();

        let mut document = Document::new();
        document.insert(logical_operator(LogOp::Or), comparisons);
        document
    }
}

fn literal_value(literal: &Literal) -> FilterValue {
    match literal {
        Literal::Numeric(value) => FilterValue::Int(*value),
        Literal::String(value) => FilterValue::String(value.clone()),
        Literal::Boolean(value) => FilterValue::Bool(*value),
        Literal::Date(value) => FilterValue::DateTime(value.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::parser::QueryParser;
    use chrono::TimeZone;

    fn fields() -> Vec<String> {
        vec!["title".to_string(), "email".to_string()]
    }

    fn compile(text: &str) -> Document {
        let fields = fields();
        let program = QueryParser::parse(text).expect("query should parse");
        FilterCompiler::new(&fields).compile(&program)
    }

    #[test]
    fn test_equality_has_no_wrapper() {
        assert_eq!(compile(r#"eq(policyId, "someId")"#), doc! { "policyId" => "someId" });
        assert_eq!(compile("eq(cores, 10)"), doc! { "cores" => 10i64 });
    }

    #[test]
    fn test_comparison_operators_are_wrapped() {
        let cases = [
            ("ne", "$ne"),
            ("gt", "$gt"),
            ("ge", "$gte"),
            ("lt", "$lt"),
            ("le", "$lte"),
        ];
        for (keyword, operator) in cases {
            assert_eq!(
                compile(&format!("{keyword}(cores, 4)")),
                doc! { "cores" => doc! { operator => 4i64 } },
                "operator {keyword}"
            );
        }
    }

    #[test]
    fn test_bare_literal_fans_out_in_field_order() {
        assert_eq!(
            compile(r#""sith""#),
            doc! { "$or" => vec![doc! { "title" => "sith" }, doc! { "email" => "sith" }] }
        );
    }

    #[test]
    fn test_date_literal_becomes_utc_timestamp() {
        let expected = Utc.with_ymd_and_hms(2020, 4, 3, 6, 58, 26).unwrap();
        assert_eq!(
            compile("ge(created, 2020-04-03T08:58:26+02:00)"),
            doc! { "created" => doc! { "$gte" => expected } }
        );
    }

    #[test]
    fn test_empty_field_list_yields_empty_or() {
        let program = QueryParser::parse("1").unwrap();
        let document = FilterCompiler::new(&[]).compile(&program);
        assert_eq!(document, doc! { "$or" => Vec::<Document>::new() });
    }

    #[test]
    #[should_panic(expected = "requires at least two arguments")]
    fn test_hand_built_single_argument_logical_function_panics() {
        let fields = fields();
        let node = Node::logical(LogOp::And, vec![Node::number(1)]);
        FilterCompiler::new(&fields).compile_expression(&node);
    }
}
