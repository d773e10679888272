//! Edge implementation for property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::Label;
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
///
/// Edges have:
/// - A caller-assigned unique uid
/// - A source node uid (the edge goes FROM this node)
/// - A label (relationship type)
/// - A target node uid
/// - Properties (key-value pairs)
///
/// Any number of edges may share the same (source, label, target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub uid: String,

    /// Source node
    pub source: String,

    /// Relationship type (e.g., "KNOWS", "OWNS")
    pub label: Label,

    /// Target node
    pub target: String,

    /// Properties associated with this edge
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        uid: impl Into<String>,
        source: impl Into<String>,
        label: impl Into<Label>,
        target: impl Into<String>,
    ) -> Self {
        Self::new_with_properties(uid, source, label, target, PropertyMap::new())
    }

    /// Create a new edge with properties
    pub fn new_with_properties(
        uid: impl Into<String>,
        source: impl Into<String>,
        label: impl Into<Label>,
        target: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            uid: uid.into(),
            source: source.into(),
            label: label.into(),
            target: target.into(),
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &str, node2: &str) -> bool {
        (self.source == node1 && self.target == node2)
            || (self.source == node2 && self.target == node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &str) -> bool {
        self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &str) -> bool {
        self.target == node
    }
}
