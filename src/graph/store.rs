//! In-memory graph storage implementation
//!
//! A [`GraphStore`] owns a node table and an edge table, both keyed by the
//! caller-assigned uid, and keeps every node's adjacency sets consistent with
//! the edge table. All access goes through one reader/writer lock: mutations
//! hold it exclusively for their whole duration, reads hold it shared.

use super::edge::Edge;
use super::filter::Filter;
use super::iterator::Snapshot;
use super::node::Node;
use super::property::PropertyMap;
use super::types::{Endpoint, Label};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("Edge {0} not found")]
    EdgeNotFound(String),

    #[error("Node {0} already exists")]
    NodeAlreadyExists(String),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(String),

    #[error("Invalid edge: {role} node {uid} does not exist")]
    MissingEndpoint { role: Endpoint, uid: String },

    #[error("Can not remove node {uid} with edges attached (edge count: {count})")]
    NodeHasEdges { uid: String, count: usize },

    #[error("Invalid {kind} property value: {reason}")]
    InvalidProperty { kind: String, reason: String },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Node and edge tables guarded together by the store's lock
#[derive(Debug, Default)]
pub(super) struct GraphTables {
    pub(super) nodes: FxHashMap<String, Node>,
    pub(super) edges: FxHashMap<String, Edge>,
}

/// Summary of a store's contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Number of nodes per label
    pub label_counts: BTreeMap<Label, usize>,
    /// Number of edges per relationship type
    pub edge_label_counts: BTreeMap<Label, usize>,
    /// When this store was created
    pub started_at: DateTime<Utc>,
}

/// In-memory graph storage
///
/// Safe to share between threads (`Arc<GraphStore>`); every method takes
/// `&self`. Independent stores never share state, so a query result, a test
/// fixture and a long-lived service graph can coexist in one process.
#[derive(Debug)]
pub struct GraphStore {
    pub(super) tables: RwLock<GraphTables>,
    started_at: DateTime<Utc>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            tables: RwLock::new(GraphTables::default()),
            started_at: Utc::now(),
        }
    }

    // ---- nodes ----

    /// Check whether a node with this uid exists
    pub fn has_node(&self, uid: &str) -> bool {
        self.tables.read().nodes.contains_key(uid)
    }

    /// Add a new node with empty adjacency sets
    ///
    /// The label is free-form; see [`Label`] for how queries refer to it.
    pub fn add_node(
        &self,
        uid: impl Into<String>,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> GraphResult<Node> {
        let node = Node::new_with_properties(uid, label, properties);
        let mut tables = self.tables.write();

        if tables.nodes.contains_key(&node.uid) {
            return Err(GraphError::NodeAlreadyExists(node.uid));
        }

        tables.nodes.insert(node.uid.clone(), node.clone());
        Ok(node)
    }

    /// Get a copy of the node with this uid
    pub fn node(&self, uid: &str) -> GraphResult<Node> {
        self.tables
            .read()
            .nodes
            .get(uid)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(uid.to_string()))
    }

    /// Replace a node's label and properties
    ///
    /// The stored adjacency sets are kept as they are: edges are only ever
    /// attached or detached through [`add_edge`](Self::add_edge) and
    /// [`remove_edge`](Self::remove_edge).
    pub fn update_node(&self, node: Node) -> GraphResult<Node> {
        let mut tables = self.tables.write();

        let stored = tables
            .nodes
            .get_mut(&node.uid)
            .ok_or_else(|| GraphError::NodeNotFound(node.uid.clone()))?;
        stored.overwrite_with(node);
        Ok(stored.clone())
    }

    /// Remove a node that has no incident edges
    pub fn remove_node(&self, uid: &str) -> GraphResult<()> {
        let mut tables = self.tables.write();

        let node = tables
            .nodes
            .get(uid)
            .ok_or_else(|| GraphError::NodeNotFound(uid.to_string()))?;

        if node.has_edges() {
            return Err(GraphError::NodeHasEdges {
                uid: uid.to_string(),
                count: node.degree(),
            });
        }

        tables.nodes.remove(uid);
        Ok(())
    }

    /// Snapshot of every node
    pub fn nodes(&self) -> Snapshot<Node> {
        let tables = self.tables.read();
        Snapshot::new(tables.nodes.values().cloned().collect())
    }

    /// Snapshot of the nodes accepted by `filter`
    pub fn nodes_by(&self, filter: &Filter) -> Snapshot<Node> {
        let tables = self.tables.read();
        Snapshot::new(
            tables
                .nodes
                .values()
                .filter(|node| filter.matches_node(node))
                .cloned()
                .collect(),
        )
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.tables.read().nodes.len()
    }

    // ---- edges ----

    /// Check whether an edge with this uid exists
    pub fn has_edge(&self, uid: &str) -> bool {
        self.tables.read().edges.contains_key(uid)
    }

    /// Add a directed edge between two existing nodes
    ///
    /// Endpoint existence is checked under the same write guard as the
    /// insert, so a concurrent `remove_node` cannot slip in between.
    pub fn add_edge(
        &self,
        uid: impl Into<String>,
        source: impl Into<String>,
        label: impl Into<Label>,
        target: impl Into<String>,
        properties: PropertyMap,
    ) -> GraphResult<Edge> {
        let edge = Edge::new_with_properties(uid, source, label, target, properties);
        let mut tables = self.tables.write();

        if !tables.nodes.contains_key(&edge.source) {
            return Err(GraphError::MissingEndpoint {
                role: Endpoint::Source,
                uid: edge.source,
            });
        }
        if !tables.nodes.contains_key(&edge.target) {
            return Err(GraphError::MissingEndpoint {
                role: Endpoint::Target,
                uid: edge.target,
            });
        }
        if tables.edges.contains_key(&edge.uid) {
            return Err(GraphError::EdgeAlreadyExists(edge.uid));
        }

        if let Some(source) = tables.nodes.get_mut(&edge.source) {
            source.attach_out(&edge.uid);
        }
        if let Some(target) = tables.nodes.get_mut(&edge.target) {
            target.attach_in(&edge.uid);
        }

        tables.edges.insert(edge.uid.clone(), edge.clone());
        Ok(edge)
    }

    /// Get a copy of the edge with this uid
    pub fn edge(&self, uid: &str) -> GraphResult<Edge> {
        self.tables
            .read()
            .edges
            .get(uid)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(uid.to_string()))
    }

    /// Remove an edge and detach it from both endpoints
    ///
    /// Removing an unknown uid is a no-op; the return value tells the two
    /// cases apart (`true` if an edge was removed).
    pub fn remove_edge(&self, uid: &str) -> bool {
        let mut tables = self.tables.write();

        let Some(edge) = tables.edges.remove(uid) else {
            return false;
        };

        if let Some(source) = tables.nodes.get_mut(&edge.source) {
            source.detach_out(uid);
        }
        if let Some(target) = tables.nodes.get_mut(&edge.target) {
            target.detach_in(uid);
        }
        true
    }

    /// Snapshot of every edge
    pub fn edges(&self) -> Snapshot<Edge> {
        let tables = self.tables.read();
        Snapshot::new(tables.edges.values().cloned().collect())
    }

    /// Snapshot of the edges accepted by `filter`
    pub fn edges_by(&self, filter: &Filter) -> Snapshot<Edge> {
        let tables = self.tables.read();
        Snapshot::new(
            tables
                .edges
                .values()
                .filter(|edge| filter.matches_edge(edge))
                .cloned()
                .collect(),
        )
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.tables.read().edges.len()
    }

    /// Edges pointing at a node, resolved from its adjacency set
    pub fn in_edges(&self, uid: &str) -> GraphResult<Vec<Edge>> {
        let tables = self.tables.read();
        let node = tables
            .nodes
            .get(uid)
            .ok_or_else(|| GraphError::NodeNotFound(uid.to_string()))?;
        Ok(Self::resolve(&tables, node.in_edges()))
    }

    /// Edges leaving a node, resolved from its adjacency set
    pub fn out_edges(&self, uid: &str) -> GraphResult<Vec<Edge>> {
        let tables = self.tables.read();
        let node = tables
            .nodes
            .get(uid)
            .ok_or_else(|| GraphError::NodeNotFound(uid.to_string()))?;
        Ok(Self::resolve(&tables, node.out_edges()))
    }

    fn resolve(tables: &GraphTables, uids: Vec<String>) -> Vec<Edge> {
        uids.iter()
            .filter_map(|uid| tables.edges.get(uid).cloned())
            .collect()
    }

    // ---- whole graph ----

    /// Counts per label and relationship type
    pub fn statistics(&self) -> GraphStatistics {
        let tables = self.tables.read();

        let mut label_counts = BTreeMap::new();
        for node in tables.nodes.values() {
            *label_counts.entry(node.label.clone()).or_insert(0) += 1;
        }
        let mut edge_label_counts = BTreeMap::new();
        for edge in tables.edges.values() {
            *edge_label_counts.entry(edge.label.clone()).or_insert(0) += 1;
        }

        GraphStatistics {
            node_count: tables.nodes.len(),
            edge_count: tables.edges.len(),
            label_counts,
            edge_label_counts,
            started_at: self.started_at,
        }
    }

    /// True if the store holds no nodes (and therefore no edges)
    pub fn is_empty(&self) -> bool {
        self.tables.read().nodes.is_empty()
    }
}
