//! Query plan produced by the parser
//!
//! The plan is purely structural: it names node patterns and the variables
//! to return. [`QueryPlan::validate`] enforces the semantic rules the grammar
//! cannot express.

use super::parser::ValidationError;
use crate::graph::{Filter, Label, PropertyValue};
use indexmap::IndexSet;
use std::collections::BTreeMap;
use std::fmt;

/// Parsed query: `MATCH ... [MATCH ...] RETURN v1, v2`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPlan {
    /// One entry per MATCH clause, in query order
    pub reading_clauses: Vec<ReadingClause>,
    /// Variables listed after RETURN, deduplicated, in query order
    pub return_variables: IndexSet<String>,
}

/// A single MATCH clause
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadingClause {
    pub patterns: Vec<NodePattern>,
}

/// Node pattern: (n:Person {name: "Alice"})
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    /// Variable bound by this pattern
    pub variable: String,
    /// Labels as written; a valid plan has at most one
    pub labels: Vec<Label>,
    /// Exact-match property constraints
    pub properties: BTreeMap<String, PropertyValue>,
}

impl NodePattern {
    pub fn new(variable: impl Into<String>) -> Self {
        NodePattern {
            variable: variable.into(),
            labels: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The pattern's label, if it names one
    pub fn label(&self) -> Option<&Label> {
        self.labels.first()
    }

    /// Property constraints in their canonical byte encoding
    pub fn encoded_properties(&self) -> BTreeMap<String, Vec<u8>> {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), value.encode()))
            .collect()
    }

    /// Store filter selecting the nodes this pattern matches
    pub fn to_filter(&self) -> Filter {
        Filter {
            labels: self.labels.clone(),
            properties: self.encoded_properties(),
        }
    }

    /// True for a bare `(n)` that matches every node
    pub fn is_unrestricted(&self) -> bool {
        self.labels.is_empty() && self.properties.is_empty()
    }
}

impl fmt::Display for NodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.variable)?;
        for label in &self.labels {
            write!(f, ":{}", QueryName(label.as_str()))?;
        }
        if !self.properties.is_empty() {
            write!(f, " {{")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", QueryName(key), value)?;
            }
            write!(f, "}}")?;
        }
        write!(f, ")")
    }
}

/// Label or key as written in query text, backticked unless it is a plain name
struct QueryName<'a>(&'a str);

impl fmt::Display for QueryName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = !self.0.is_empty()
            && self.0.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            f.write_str(self.0)
        } else {
            write!(f, "`{}`", self.0)
        }
    }
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every node pattern across all reading clauses
    pub fn patterns(&self) -> impl Iterator<Item = &NodePattern> {
        self.reading_clauses.iter().flat_map(|clause| clause.patterns.iter())
    }

    /// Variables bound by some MATCH clause
    pub fn bound_variables(&self) -> IndexSet<&str> {
        self.patterns().map(|p| p.variable.as_str()).collect()
    }

    /// Check the rules the grammar does not enforce
    ///
    /// - a pattern names at most one label
    /// - every RETURN variable is bound by a MATCH clause
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pattern) = self.patterns().find(|p| p.labels.len() > 1) {
            return Err(ValidationError::MultipleLabels {
                variable: pattern.variable.clone(),
                labels: pattern.labels.clone(),
            });
        }

        let bound = self.bound_variables();
        if let Some(unbound) = self
            .return_variables
            .iter()
            .find(|v| !bound.contains(v.as_str()))
        {
            return Err(ValidationError::UnboundVariable(unbound.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.reading_clauses {
            write!(f, "MATCH ")?;
            for (i, pattern) in clause.patterns.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", pattern)?;
            }
            write!(f, " ")?;
        }
        write!(f, "RETURN ")?;
        for (i, variable) in self.return_variables.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", variable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(patterns: Vec<NodePattern>, returns: &[&str]) -> QueryPlan {
        QueryPlan {
            reading_clauses: patterns
                .into_iter()
                .map(|p| ReadingClause { patterns: vec![p] })
                .collect(),
            return_variables: returns.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_pattern_filter() {
        let pattern = NodePattern::new("n")
            .with_label("Person")
            .with_property("age", 21i64)
            .with_property("male", true);

        assert_eq!(pattern.label(), Some(&Label::new("Person")));
        assert!(!pattern.is_unrestricted());

        let filter = pattern.to_filter();
        assert_eq!(filter.labels, vec![Label::new("Person")]);
        assert_eq!(filter.properties.get("age"), Some(&b"21".to_vec()));
        assert_eq!(filter.properties.get("male"), Some(&b"true".to_vec()));
    }

    #[test]
    fn test_bare_pattern_is_unrestricted() {
        let pattern = NodePattern::new("n");
        assert!(pattern.is_unrestricted());
        assert!(pattern.to_filter().is_unrestricted());
    }

    #[test]
    fn test_validate_ok() {
        let p = plan(
            vec![NodePattern::new("n").with_label("Car"), NodePattern::new("m")],
            &["n", "m"],
        );
        assert!(p.validate().is_ok());
        assert_eq!(p.patterns().count(), 2);
    }

    #[test]
    fn test_validate_multiple_labels() {
        let p = plan(
            vec![NodePattern::new("n").with_label("Animal").with_label("Person")],
            &["n"],
        );
        assert!(matches!(
            p.validate(),
            Err(ValidationError::MultipleLabels { ref variable, .. }) if variable == "n"
        ));
    }

    #[test]
    fn test_validate_unbound_return() {
        let p = plan(vec![NodePattern::new("n")], &["n", "m"]);
        assert_eq!(
            p.validate(),
            Err(ValidationError::UnboundVariable("m".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let p = plan(
            vec![NodePattern::new("n").with_label("Person").with_property("name", "Foo")],
            &["n"],
        );
        assert_eq!(p.to_string(), "MATCH (n:Person {name: \"Foo\"}) RETURN n");
    }

    #[test]
    fn test_display_quotes_non_plain_names() {
        let p = plan(
            vec![NodePattern::new("n").with_label("my-label").with_property("first name", true)],
            &["n"],
        );
        let text = p.to_string();
        assert_eq!(text, "MATCH (n:`my-label` {`first name`: true}) RETURN n");
        assert_eq!(crate::query::parse_query(&text).unwrap(), p);
    }
}
