//! Cypher subset parser using Pest
//!
//! Turns query text into a validated [`QueryPlan`]. Syntax problems surface as
//! [`ParseError`], semantic ones as [`ValidationError`].

use super::ast::*;
use super::QueryResult;
use crate::graph::{Label, PropertyValue};
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "query/cypher.pest"]
struct CypherParser;

/// Parser errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Query text does not match the grammar
    #[error("Parse error: {0}")]
    Syntax(#[from] pest::error::Error<Rule>),

    /// Literal that matches the grammar but has no value representation
    #[error("Invalid literal {literal} at {}:{}: {reason}", .position.0, .position.1)]
    InvalidLiteral {
        literal: String,
        reason: String,
        position: (usize, usize),
    },
}

impl ParseError {
    /// (line, column) of the failure, 1-based
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax(err) => match &err.line_col {
                LineColLocation::Pos(pos) => Some(*pos),
                LineColLocation::Span(start, _) => Some(*start),
            },
            ParseError::InvalidLiteral { position, .. } => Some(*position),
        }
    }
}

/// Semantic errors in a grammatically valid query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Variable `{0}` is returned but not bound by any MATCH clause")]
    UnboundVariable(String),

    #[error("Pattern ({variable}) names {} labels, at most one is allowed", .labels.len())]
    MultipleLabels { variable: String, labels: Vec<Label> },

    #[error("Pattern ({variable}) repeats property key `{key}`")]
    DuplicatePropertyKey { variable: String, key: String },
}

/// Parse and validate a query string
pub fn parse_query(input: &str) -> QueryResult<QueryPlan> {
    let pairs = CypherParser::parse(Rule::statement, input).map_err(ParseError::from)?;

    let mut plan = QueryPlan::new();

    for pair in pairs {
        if pair.as_rule() != Rule::statement {
            continue;
        }
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::query {
                parse_body(inner, &mut plan)?;
            }
        }
    }

    plan.validate()?;
    Ok(plan)
}

fn parse_body(pair: Pair<Rule>, plan: &mut QueryPlan) -> QueryResult<()> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::match_clause => {
                plan.reading_clauses.push(parse_match_clause(inner)?);
            }
            Rule::return_clause => {
                for item in inner.into_inner() {
                    if item.as_rule() == Rule::variable {
                        plan.return_variables.insert(item.as_str().to_string());
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_match_clause(pair: Pair<Rule>) -> QueryResult<ReadingClause> {
    let mut patterns = Vec::new();

    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::node_pattern {
            patterns.push(parse_node_pattern(inner)?);
        }
    }

    Ok(ReadingClause { patterns })
}

fn parse_node_pattern(pair: Pair<Rule>) -> QueryResult<NodePattern> {
    let mut variable = String::new();
    let mut labels = Vec::new();
    let mut properties = BTreeMap::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::variable => {
                variable = inner.as_str().to_string();
            }
            Rule::node_labels => {
                for label_pair in inner.into_inner() {
                    if label_pair.as_rule() == Rule::label {
                        labels.push(Label::new(name_text(label_pair)));
                    }
                }
            }
            Rule::properties => {
                properties = parse_properties(inner, &variable)?;
            }
            _ => {}
        }
    }

    Ok(NodePattern {
        variable,
        labels,
        properties,
    })
}

fn parse_properties(
    pair: Pair<Rule>,
    variable: &str,
) -> QueryResult<BTreeMap<String, PropertyValue>> {
    let mut props = BTreeMap::new();

    for entry in pair.into_inner() {
        if entry.as_rule() != Rule::property_entry {
            continue;
        }

        let (key, value) = parse_property_entry(entry)?;
        if props.contains_key(&key) {
            return Err(ValidationError::DuplicatePropertyKey {
                variable: variable.to_string(),
                key,
            }
            .into());
        }
        props.insert(key, value);
    }

    Ok(props)
}

fn parse_property_entry(entry: Pair<Rule>) -> Result<(String, PropertyValue), ParseError> {
    let span = entry.as_span();
    let mut key = None;
    let mut value = None;

    for part in entry.into_inner() {
        match part.as_rule() {
            Rule::property_key => key = Some(name_text(part)),
            Rule::string_literal | Rule::boolean | Rule::integer => {
                value = Some(parse_literal(part)?);
            }
            _ => {}
        }
    }

    match (key, value) {
        (Some(key), Some(value)) => Ok((key, value)),
        _ => Err(ParseError::Syntax(pest::error::Error::new_from_span(
            ErrorVariant::CustomError {
                message: "property entry needs a key and a literal value".to_string(),
            },
            span,
        ))),
    }
}

/// Text of a name that may be written plain or between backticks
fn name_text(pair: Pair<Rule>) -> String {
    let whole = pair.as_str().to_string();
    pair.into_inner()
        .find(|p| matches!(p.as_rule(), Rule::plain_name | Rule::quoted_name))
        .map(|p| p.as_str().to_string())
        .unwrap_or(whole)
}

fn parse_literal(pair: Pair<Rule>) -> Result<PropertyValue, ParseError> {
    let position = pair.as_span().start_pos().line_col();

    match pair.as_rule() {
        Rule::boolean => Ok(PropertyValue::Boolean(
            pair.as_str().eq_ignore_ascii_case("true"),
        )),
        Rule::integer => {
            let text = pair.as_str();
            text.parse::<i64>()
                .map(PropertyValue::Integer)
                .map_err(|e| ParseError::InvalidLiteral {
                    literal: text.to_string(),
                    reason: e.to_string(),
                    position,
                })
        }
        Rule::string_literal => {
            // Quotes are stripped; contents are taken verbatim
            let content = pair
                .into_inner()
                .find(|p| matches!(p.as_rule(), Rule::single_quoted | Rule::double_quoted))
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            Ok(PropertyValue::String(content))
        }
        _ => Err(ParseError::InvalidLiteral {
            literal: pair.as_str().to_string(),
            reason: "unsupported literal".to_string(),
            position,
        }),
    }
}
