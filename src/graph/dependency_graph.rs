//! Dependency graph container backed by petgraph.
//!
//! Nodes are package names and edges point from a dependent package to the
//! package it depends on. The graph is filled in by the builder and treated
//! as read-only afterwards.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Errors raised while analyzing a completed dependency graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    /// The subgraph reachable from the requested root contains a cycle.
    #[error("Dependency cycle detected: {}", .path.join(" -> "))]
    Cycle {
        /// Packages forming the cycle; the first package is repeated at the end.
        path: Vec<String>,
    },

    /// The requested root is not a node of the graph.
    #[error("Package '{root}' is not part of the dependency graph")]
    UnknownRoot { root: String },
}

/// A directed graph of package dependencies.
///
/// Edges point from the dependent package to its dependency. Adding an edge
/// always creates both endpoints, and adding the same edge twice has no
/// further effect. Self-loops are stored like any other edge.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("requests", "urllib3");
/// graph.add_edge("requests", "idna");
/// graph.add_edge("requests", "idna");
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph, weighted by package name
    graph: DiGraph<String, ()>,
    /// Maps package names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Packages excluded by the name filter during the build
    ignored: BTreeSet<String>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package to the graph, returning its node index.
    ///
    /// If the package already exists, its existing index is returned.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }

        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Records that `from` directly depends on `to`.
    ///
    /// Both packages are created if absent. Returns `true` if the edge is
    /// new, `false` if it was already present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// assert!(graph.add_edge("flask", "jinja2"));
    /// assert!(!graph.add_edge("flask", "jinja2"));
    /// assert!(graph.contains("jinja2"));
    /// ```
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);

        if self.graph.contains_edge(from_idx, to_idx) {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Marks a package as excluded by the name filter.
    pub fn mark_ignored(&mut self, name: &str) {
        self.ignored.insert(name.to_string());
    }

    /// Packages excluded by the name filter, in sorted order.
    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    /// Returns the set of all known package names.
    pub fn nodes(&self) -> BTreeSet<String> {
        self.graph.node_weights().cloned().collect()
    }

    /// Returns the direct dependencies of a package in sorted order.
    ///
    /// Unknown packages have no dependencies.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut deps: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect();
        deps.sort_unstable();
        deps
    }

    /// Returns every edge as a `(dependent, dependency)` pair, sorted.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Checks if a package exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Returns the number of packages in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of dependency edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph has no packages.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    pub(crate) fn name_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Node indices ordered by package name.
    pub(crate) fn sorted_indices(&self) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort_unstable_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        indices
    }

    /// Outgoing neighbors of a node ordered by package name.
    pub(crate) fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        neighbors.sort_unstable_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(graph.nodes().is_empty());
        assert!(graph.ignored().is_empty());
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let idx = graph.add_node("requests");
        let idx2 = graph.add_node("requests");

        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains("requests"));
    }

    #[test]
    fn test_add_edge_creates_both_nodes() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("requests", "urllib3");

        assert!(graph.contains("requests"));
        assert!(graph.contains("urllib3"));
        assert!(graph.dependencies_of("urllib3").is_empty());
    }

    #[test]
    fn test_add_edge_no_duplicates() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_self_loop_is_kept() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "a");

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependencies_of("a"), vec!["a"]);
    }

    #[test]
    fn test_dependencies_sorted() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("app", "zope");
        graph.add_edge("app", "attrs");
        graph.add_edge("app", "lxml");

        assert_eq!(graph.dependencies_of("app"), vec!["attrs", "lxml", "zope"]);
        assert!(graph.dependencies_of("missing").is_empty());
    }

    #[test]
    fn test_edges_sorted() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("b", "c");
        graph.add_edge("a", "c");
        graph.add_edge("a", "b");

        assert_eq!(graph.edges(), vec![("a", "b"), ("a", "c"), ("b", "c")]);
    }

    #[test]
    fn test_nodes_contains_edge_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("c", "d");

        let nodes = graph.nodes();
        for (from, to) in graph.edges() {
            assert!(nodes.contains(from));
            assert!(nodes.contains(to));
        }
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_mark_ignored() {
        let mut graph = DependencyGraph::new();
        graph.mark_ignored("pytest");
        graph.mark_ignored("pytest");

        assert_eq!(graph.ignored().len(), 1);
        assert!(!graph.contains("pytest"));
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Dependency cycle detected: a -> b -> a");

        let err = GraphError::UnknownRoot { root: "x".into() };
        assert_eq!(
            err.to_string(),
            "Package 'x' is not part of the dependency graph"
        );
    }
}
