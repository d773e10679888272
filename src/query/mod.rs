//! Query processing module
//!
//! Supports a restricted Cypher subset:
//! - One or more `MATCH (v:Label {key: literal, ...})` clauses
//! - A `RETURN v1, v2` clause naming bound variables
//!
//! Matches from all clauses are unioned. The result of a query is a new graph
//! holding copies of the matched nodes.

pub mod ast;
pub mod executor;
pub mod parser;

use crate::graph::{GraphError, GraphStore};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

// Re-export main types
pub use ast::{NodePattern, QueryPlan, ReadingClause};
pub use executor::QueryExecutor;
pub use parser::{parse_query, ParseError, Rule, ValidationError};

/// Query errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Query engine - high-level interface for executing queries
pub struct QueryEngine {}

impl QueryEngine {
    /// Create a new query engine
    pub fn new() -> Self {
        Self {}
    }

    /// Parse and validate a query without running it
    pub fn parse(&self, query_str: &str) -> QueryResult<QueryPlan> {
        parse_query(query_str)
    }

    /// Parse and execute a query, returning the matched subgraph
    pub fn execute(&self, query_str: &str, store: &GraphStore) -> QueryResult<GraphStore> {
        let start = Instant::now();
        let plan = match self.parse(query_str) {
            Ok(plan) => plan,
            Err(e) => {
                debug!("Rejected query {:?}: {}", query_str, e);
                return Err(e);
            }
        };
        debug!("Parsed query in {:?}: {}", start.elapsed(), plan);

        let start = Instant::now();
        let result = QueryExecutor::new(store).execute(&plan)?;
        debug!(
            "Executed query in {:?}, {} nodes matched",
            start.elapsed(),
            result.node_count()
        );

        Ok(result)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Run a query against this store
    pub fn query(&self, query_str: &str) -> QueryResult<GraphStore> {
        QueryEngine::new().execute(query_str, self)
    }
}
