//! Whole-graph dump and reload
//!
//! A dump lists every node (with its resolved adjacency lists) and every
//! edge. Loading replays node inserts first and edge inserts second, since an
//! edge needs both endpoints to exist.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::store::{GraphError, GraphStore};
use super::types::Label;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Dump errors
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type DumpResult<T> = Result<T, DumpError>;

/// A node as it appears in a dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uid: String,
    pub label: Label,
    pub properties: PropertyMap,
    #[serde(default)]
    pub in_edges: Vec<String>,
    #[serde(default)]
    pub out_edges: Vec<String>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        NodeRecord {
            uid: node.uid.clone(),
            label: node.label.clone(),
            properties: node.properties.clone(),
            in_edges: node.in_edges(),
            out_edges: node.out_edges(),
        }
    }
}

/// An edge as it appears in a dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub uid: String,
    pub source: String,
    pub label: Label,
    pub target: String,
    pub properties: PropertyMap,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        EdgeRecord {
            uid: edge.uid.clone(),
            source: edge.source.clone(),
            label: edge.label.clone(),
            target: edge.target.clone(),
            properties: edge.properties.clone(),
        }
    }
}

/// Full contents of a graph, sorted by uid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDump {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// What a load inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub nodes: usize,
    pub edges: usize,
}

impl GraphDump {
    pub fn to_json(&self) -> DumpResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> DumpResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DumpResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> DumpResult<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> DumpResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write_binary<W: Write>(&self, writer: W) -> DumpResult<()> {
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn read_binary<R: Read>(reader: R) -> DumpResult<Self> {
        Ok(bincode::deserialize_from(reader)?)
    }
}

impl GraphStore {
    /// Dump every node and edge under a single read guard
    pub fn dump(&self) -> GraphDump {
        let tables = self.tables.read();

        let mut nodes: Vec<NodeRecord> = tables.nodes.values().map(NodeRecord::from).collect();
        let mut edges: Vec<EdgeRecord> = tables.edges.values().map(EdgeRecord::from).collect();
        drop(tables);

        nodes.sort_by(|a, b| a.uid.cmp(&b.uid));
        edges.sort_by(|a, b| a.uid.cmp(&b.uid));
        GraphDump { nodes, edges }
    }

    /// Replay a dump into this store: all nodes, then all edges
    ///
    /// The adjacency lists in the dump are informational; they are rebuilt
    /// by the edge inserts. Stops at the first failing insert.
    pub fn load(&self, dump: &GraphDump) -> Result<LoadSummary, GraphError> {
        let start = Instant::now();

        for node in &dump.nodes {
            self.add_node(node.uid.clone(), node.label.clone(), node.properties.clone())?;
        }
        debug!("Loaded {} nodes", dump.nodes.len());

        for edge in &dump.edges {
            self.add_edge(
                edge.uid.clone(),
                edge.source.clone(),
                edge.label.clone(),
                edge.target.clone(),
                edge.properties.clone(),
            )?;
        }

        let summary = LoadSummary {
            nodes: dump.nodes.len(),
            edges: dump.edges.len(),
        };
        info!(
            "Loaded {} nodes and {} edges in {:?}",
            summary.nodes,
            summary.edges,
            start.elapsed()
        );
        Ok(summary)
    }

    /// Build a new store from a dump
    pub fn from_dump(dump: &GraphDump) -> Result<GraphStore, GraphError> {
        let store = GraphStore::new();
        store.load(dump)?;
        Ok(store)
    }
}
