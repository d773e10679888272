//! Node implementation for property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node in the property graph
///
/// Nodes have:
/// - A caller-assigned unique uid
/// - Exactly one label
/// - Properties (key-value pairs)
/// - The uids of their incoming and outgoing edges
///
/// The adjacency sets are owned by the [`GraphStore`](super::GraphStore);
/// they can be read but not edited from outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub uid: String,

    /// Label of this node
    pub label: Label,

    /// Properties associated with this node
    pub properties: PropertyMap,

    #[serde(default)]
    in_edges: BTreeSet<String>,

    #[serde(default)]
    out_edges: BTreeSet<String>,
}

impl Node {
    /// Create a new node with no properties
    pub fn new(uid: impl Into<String>, label: impl Into<Label>) -> Self {
        Self::new_with_properties(uid, label, PropertyMap::new())
    }

    /// Create a new node with properties
    pub fn new_with_properties(
        uid: impl Into<String>,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> Self {
        Node {
            uid: uid.into(),
            label: label.into(),
            properties,
            in_edges: BTreeSet::new(),
            out_edges: BTreeSet::new(),
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        &self.label == label
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Uids of edges pointing at this node, sorted
    pub fn in_edges(&self) -> Vec<String> {
        self.in_edges.iter().cloned().collect()
    }

    /// Uids of edges leaving this node, sorted
    pub fn out_edges(&self) -> Vec<String> {
        self.out_edges.iter().cloned().collect()
    }

    /// Total number of incident edges
    pub fn degree(&self) -> usize {
        self.in_edges.len() + self.out_edges.len()
    }

    pub(crate) fn has_edges(&self) -> bool {
        !self.in_edges.is_empty() || !self.out_edges.is_empty()
    }

    pub(crate) fn attach_in(&mut self, edge_uid: &str) {
        self.in_edges.insert(edge_uid.to_string());
    }

    pub(crate) fn attach_out(&mut self, edge_uid: &str) {
        self.out_edges.insert(edge_uid.to_string());
    }

    pub(crate) fn detach_in(&mut self, edge_uid: &str) {
        self.in_edges.remove(edge_uid);
    }

    pub(crate) fn detach_out(&mut self, edge_uid: &str) {
        self.out_edges.remove(edge_uid);
    }

    /// Replace label and properties, keeping uid and adjacency
    pub(crate) fn overwrite_with(&mut self, other: Node) {
        self.label = other.label;
        self.properties = other.properties;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node() {
        let node = Node::new("node-foo", "Person");
        assert_eq!(node.uid, "node-foo");
        assert!(node.has_label(&Label::new("Person")));
        assert!(!node.has_label(&Label::new("Animal")));
        assert_eq!(node.degree(), 0);
        assert!(node.in_edges().is_empty());
        assert!(node.out_edges().is_empty());
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new("n1", "Person");
        assert!(node.set_property("name", "Alice").is_none());
        node.set_property("age", 30i64);

        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Alice"));
        assert!(node.has_property("age"));

        let old = node.set_property("name", "Alicia");
        assert_eq!(old, Some(PropertyValue::from("Alice")));

        assert_eq!(node.remove_property("age"), Some(PropertyValue::Integer(30)));
        assert!(!node.has_property("age"));
    }

    #[test]
    fn test_adjacency_bookkeeping() {
        let mut node = Node::new("n1", "Person");
        node.attach_out("e2");
        node.attach_out("e1");
        node.attach_in("e3");
        node.attach_out("e1");

        assert_eq!(node.out_edges(), vec!["e1".to_string(), "e2".to_string()]);
        assert_eq!(node.in_edges(), vec!["e3".to_string()]);
        assert_eq!(node.degree(), 3);
        assert!(node.has_edges());

        node.detach_out("e1");
        node.detach_out("e2");
        node.detach_in("e3");
        assert!(!node.has_edges());
    }

    #[test]
    fn test_overwrite_keeps_adjacency() {
        let mut stored = Node::new("n1", "Person");
        stored.attach_in("e1");

        let mut replacement = Node::new("n1", "Robot");
        replacement.set_property("model", "T-800");
        stored.overwrite_with(replacement);

        assert_eq!(stored.label, Label::new("Robot"));
        assert_eq!(stored.in_edges(), vec!["e1".to_string()]);
        assert!(stored.has_property("model"));
    }
}
