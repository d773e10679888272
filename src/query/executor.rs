//! Query execution against a graph store
//!
//! Every pattern of every MATCH clause is evaluated over one node snapshot.
//! Matches are unioned and copied into a fresh [`GraphStore`].

use super::ast::QueryPlan;
use super::QueryResult;
use crate::graph::{Filter, GraphStore};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Query executor for read-only MATCH ... RETURN queries
pub struct QueryExecutor<'a> {
    store: &'a GraphStore,
}

impl<'a> QueryExecutor<'a> {
    /// Create a new query executor
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Execute a plan and return the matched nodes as a new graph
    ///
    /// The result holds no edges. A node matching several patterns is
    /// inserted once.
    pub fn execute(&self, plan: &QueryPlan) -> QueryResult<GraphStore> {
        let filters: Vec<Filter> = plan.patterns().map(|p| p.to_filter()).collect();
        let result = GraphStore::new();

        if filters.is_empty() {
            return Ok(result);
        }

        let snapshot = self.store.nodes();
        let scanned = snapshot.size();
        let mut seen = FxHashSet::default();

        for node in snapshot {
            if seen.contains(&node.uid) {
                continue;
            }
            if filters.iter().any(|filter| filter.matches_node(&node)) {
                seen.insert(node.uid.clone());
                result.add_node(node.uid, node.label, node.properties)?;
            }
        }

        debug!(
            "Matched {} of {} nodes across {} patterns",
            seen.len(),
            scanned,
            filters.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{properties, PropertyMap, PropertyValue};
    use crate::query::ast::{NodePattern, ReadingClause};
    use crate::query::parse_query;

    fn create_test_store() -> GraphStore {
        let store = GraphStore::new();
        store
            .add_node("n1", "Person", properties([("name", "Alice")]))
            .unwrap();
        store
            .add_node("n2", "Person", properties([("name", PropertyValue::from("Bob")), ("age", 21i64.into())]))
            .unwrap();
        store.add_node("n3", "Car", PropertyMap::new()).unwrap();
        store
            .add_edge("e1", "n1", "knows", "n2", PropertyMap::new())
            .unwrap();
        store
    }

    fn uids(graph: &GraphStore) -> Vec<String> {
        let mut uids: Vec<String> = graph.nodes().into_iter().map(|n| n.uid).collect();
        uids.sort();
        uids
    }

    #[test]
    fn test_label_match() {
        let store = create_test_store();
        let plan = parse_query("MATCH (n:Person) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();

        assert_eq!(uids(&result), vec!["n1", "n2"]);
        assert_eq!(result.edge_count(), 0);
    }

    #[test]
    fn test_property_match_is_byte_exact() {
        let store = create_test_store();
        let plan = parse_query("MATCH (n {age: 21}) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(uids(&result), vec!["n2"]);

        let plan = parse_query("MATCH (n {age: '21'}) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(uids(&result), vec!["n2"]);

        let plan = parse_query("MATCH (n {name: 'alice'}) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_bare_pattern_selects_all() {
        let store = create_test_store();
        let plan = parse_query("MATCH (n) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(uids(&result), vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn test_overlapping_patterns_deduplicated() {
        let store = create_test_store();
        let plan = parse_query("MATCH (n:Person) MATCH (m {name: 'Bob'}) RETURN n, m").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(uids(&result), vec!["n1", "n2"]);
    }

    #[test]
    fn test_result_nodes_copy_label_and_properties() {
        let store = create_test_store();
        let plan = parse_query("MATCH (n:Person {name: 'Alice'}) RETURN n").unwrap();
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();

        let alice = result.node("n1").unwrap();
        assert_eq!(alice.label.as_str(), "Person");
        assert_eq!(alice.get_property("name"), Some(&PropertyValue::from("Alice")));
        assert!(alice.out_edges().is_empty());

        // source untouched
        assert_eq!(store.node("n1").unwrap().out_edges(), vec!["e1".to_string()]);
    }

    #[test]
    fn test_empty_plan_yields_empty_graph() {
        let store = create_test_store();
        let result = QueryExecutor::new(&store).execute(&QueryPlan::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_hand_built_plan() {
        let store = create_test_store();
        let plan = QueryPlan {
            reading_clauses: vec![ReadingClause {
                patterns: vec![NodePattern::new("c").with_label("Car")],
            }],
            return_variables: ["c".to_string()].into_iter().collect(),
        };
        let result = QueryExecutor::new(&store).execute(&plan).unwrap();
        assert_eq!(uids(&result), vec!["n3"]);
    }
}
