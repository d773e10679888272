//! Core graph store implementation
//!
//! This module implements the property graph data model with:
//! - Nodes with a single label, properties and adjacency sets
//! - Directed edges with a label and properties
//! - Multiple edges between the same pair of nodes
//! - A lock-guarded in-memory store with snapshot enumeration
//! - Whole-graph dump and reload

pub mod dump;
pub mod edge;
pub mod filter;
pub mod iterator;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use dump::{DumpError, DumpResult, EdgeRecord, GraphDump, LoadSummary, NodeRecord};
pub use edge::Edge;
pub use filter::Filter;
pub use iterator::Snapshot;
pub use node::Node;
pub use property::{properties, PropertyKind, PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{Endpoint, Label};
