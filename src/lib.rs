//! Draft Graph
//!
//! An in-memory property graph with a small Cypher-style query language.
//!
//! # Architecture
//!
//! - [`graph`]: nodes, edges and the lock-guarded [`GraphStore`], plus
//!   snapshot iteration and whole-graph dump/load
//! - [`query`]: a Pest grammar for `MATCH ... RETURN ...`, the validated
//!   [`QueryPlan`] it produces, and the executor that materializes matches
//!   into a new graph
//! - [`config`]: YAML engine configuration
//!
//! Every store operation takes the store's reader/writer lock for its whole
//! duration, so a `GraphStore` can be shared between threads behind an `Arc`.
//!
//! ## Example Usage
//!
//! ```rust
//! use draftgraph::graph::{properties, GraphStore, PropertyMap};
//!
//! let store = GraphStore::new();
//!
//! store.add_node("n1", "Person", properties([("name", "Alice")])).unwrap();
//! store.add_node("n2", "Person", properties([("name", "Bob")])).unwrap();
//! store.add_node("n3", "Car", PropertyMap::new()).unwrap();
//! store.add_edge("e1", "n1", "knows", "n2", PropertyMap::new()).unwrap();
//!
//! let people = store.query("MATCH (n:Person) RETURN n").unwrap();
//! assert_eq!(people.node_count(), 2);
//! assert_eq!(people.edge_count(), 0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod query;

// Re-export main types for convenience
pub use config::{ConfigError, DumpFormat, EngineConfig};

pub use graph::{
    DumpError, Edge, Filter, GraphDump, GraphError, GraphResult, GraphStore, Label, Node,
    PropertyMap, PropertyValue, Snapshot,
};

pub use query::{
    parse_query, ParseError, QueryEngine, QueryError, QueryExecutor, QueryPlan, QueryResult,
    ValidationError,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
