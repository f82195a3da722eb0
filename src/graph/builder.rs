//! Breadth-first construction of a dependency graph from a [`DependencySource`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::DependencyGraph;
use crate::source::{DependencySource, RepositoryResult};

/// Builds the dependency graph reachable from `root`.
///
/// Packages are expanded layer by layer. Each package is expanded at most
/// once, so the traversal terminates on cyclic dependency data. Any package
/// whose name contains `filter` (case-sensitive substring, ignored when
/// empty) is recorded in [`DependencyGraph::ignored`]: it is never expanded
/// and no edge to it is added.
///
/// Every package other than the root enters the graph through an edge. The
/// root is added as a node before its lookup, so a root without
/// dependencies yields a one-node graph rather than an empty one. A root
/// that matches the filter yields an empty graph.
///
/// # Errors
///
/// The first lookup failure aborts the build and is returned unchanged.
///
/// # Example
///
/// ```
/// use depgraph::graph::build_graph;
/// use depgraph::source::FixtureSource;
///
/// let source = FixtureSource::parse_str("A: B C-test\nB: C\n").unwrap();
/// let graph = build_graph("A", &source, "-test").unwrap();
///
/// assert_eq!(graph.edges(), vec![("A", "B"), ("B", "C")]);
/// assert!(graph.ignored().contains("C-test"));
/// ```
pub fn build_graph<S>(root: &str, source: &S, filter: &str) -> RepositoryResult<DependencyGraph>
where
    S: DependencySource + ?Sized,
{
    let mut graph = DependencyGraph::new();
    let mut visited: HashSet<String> = HashSet::new();
    let matches_filter = |name: &str| !filter.is_empty() && name.contains(filter);

    let mut layer = vec![root.to_string()];
    let mut depth = 0usize;

    while !layer.is_empty() {
        let mut next_layer = Vec::new();

        for package in layer {
            if !visited.insert(package.clone()) {
                continue;
            }

            if matches_filter(&package) {
                if package == root {
                    warn!(root, filter, "Root package matches the filter; graph will be empty");
                }
                graph.mark_ignored(&package);
                continue;
            }

            if package == root {
                graph.add_node(root);
            }
            let deps = source.direct_dependencies(&package)?;
            debug!(package = %package, depth, count = deps.len(), "Expanding package");

            for dep in deps {
                if matches_filter(&dep) {
                    graph.mark_ignored(&dep);
                    continue;
                }
                graph.add_edge(&package, &dep);
                if !visited.contains(&dep) {
                    next_layer.push(dep);
                }
            }
        }

        layer = next_layer;
        depth += 1;
    }

    info!(
        root,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ignored = graph.ignored().len(),
        "Built dependency graph"
    );
    Ok(graph)
}
