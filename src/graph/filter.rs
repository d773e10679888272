//! Label and property filters for enumerating nodes and edges

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::Label;
use std::collections::BTreeMap;

/// Selection criteria for [`GraphStore::nodes_by`](super::GraphStore::nodes_by)
/// and [`GraphStore::edges_by`](super::GraphStore::edges_by)
///
/// An entity matches when its label is one of `labels` (any label if empty)
/// and every entry of `properties` is present with a byte-equal canonical
/// encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub labels: Vec<Label>,
    pub properties: BTreeMap<String, Vec<u8>>,
}

impl Filter {
    /// A filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into().encode());
        self
    }

    /// Require a raw canonical encoding for a key
    pub fn with_encoded_property(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.properties.insert(key.into(), bytes.into());
        self
    }

    /// True if this filter accepts every entity
    pub fn is_unrestricted(&self) -> bool {
        self.labels.is_empty() && self.properties.is_empty()
    }

    pub fn matches_node(&self, node: &Node) -> bool {
        self.matches(&node.label, &node.properties)
    }

    pub fn matches_edge(&self, edge: &Edge) -> bool {
        self.matches(&edge.label, &edge.properties)
    }

    fn matches(&self, label: &Label, properties: &PropertyMap) -> bool {
        if !self.labels.is_empty() && !self.labels.contains(label) {
            return false;
        }

        self.properties.iter().all(|(key, expected)| {
            properties
                .get(key)
                .is_some_and(|value| value.matches_encoded(expected))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(uid: &str, name: &str) -> Node {
        let mut node = Node::new(uid, "person");
        node.set_property("name", name);
        node
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = Filter::new();
        assert!(filter.is_unrestricted());
        assert!(filter.matches_node(&person("n1", "foo")));
        assert!(filter.matches_edge(&Edge::new("e1", "a", "KNOWS", "b")));
    }

    #[test]
    fn test_filter_by_labels() {
        let n1 = person("node-n1", "foo");
        let n2 = Node::new("node-n2", "car");
        let n4 = Node::new("node-n4", "bike");

        let single = Filter::new().with_label("person");
        assert!(single.matches_node(&n1));
        assert!(!single.matches_node(&n2));

        // several labels are alternatives
        let many = Filter::new().with_label("person").with_label("bike");
        assert!(many.matches_node(&n1));
        assert!(many.matches_node(&n4));
        assert!(!many.matches_node(&n2));
    }

    #[test]
    fn test_filter_by_properties() {
        let mut dog = Node::new("node-dog", "animal");
        dog.set_property("name", "socks");
        dog.set_property("age", 4i64);

        assert!(Filter::new().with_property("name", "socks").matches_node(&dog));
        assert!(Filter::new()
            .with_property("name", "socks")
            .with_property("age", 4i64)
            .matches_node(&dog));
        assert!(!Filter::new().with_property("name", "rex").matches_node(&dog));
        assert!(!Filter::new().with_property("owner", "bob").matches_node(&dog));
        // canonical bytes compare equal across kinds
        assert!(Filter::new().with_encoded_property("age", "4").matches_node(&dog));
    }

    #[test]
    fn test_filter_label_and_properties() {
        let filter = Filter::new().with_label("KNOWS").with_property("since", 2020i64);
        let mut edge = Edge::new("e1", "a", "KNOWS", "b");
        assert!(!filter.matches_edge(&edge));
        edge.set_property("since", 2020i64);
        assert!(filter.matches_edge(&edge));

        let other = Edge::new_with_properties("e2", "a", "OWNS", "b", edge.properties.clone());
        assert!(!filter.matches_edge(&other));
    }
}
