//! Load order: a dependency-first topological order of the packages
//! reachable from a root.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use super::cycles::{cycle_path, Color, Frame};
use super::{DependencyGraph, GraphError};

/// Computes the order in which the packages reachable from `root` can be
/// loaded, every package appearing after all of its dependencies.
///
/// The order is the DFS post-order from `root`. Sibling dependencies are
/// visited in ascending name order, which makes the result reproducible.
///
/// # Errors
///
/// - [`GraphError::Cycle`] if the reachable subgraph contains a cycle
/// - [`GraphError::UnknownRoot`] if `root` is not in the graph
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{load_order, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("A", "B");
/// graph.add_edge("A", "C");
/// graph.add_edge("B", "C");
///
/// assert_eq!(load_order(&graph, "A").unwrap(), vec!["C", "B", "A"]);
/// ```
pub fn load_order(graph: &DependencyGraph, root: &str) -> Result<Vec<String>, GraphError> {
    let root_idx = graph.index_of(root).ok_or_else(|| GraphError::UnknownRoot {
        root: root.to_string(),
    })?;

    let mut color: HashMap<NodeIndex, Color> = HashMap::new();
    let mut order = Vec::new();

    color.insert(root_idx, Color::Gray);
    let mut stack = vec![Frame::new(graph, root_idx)];

    while let Some(frame) = stack.last_mut() {
        let Some(&neighbor) = frame.neighbors.get(frame.next) else {
            color.insert(frame.node, Color::Black);
            order.push(graph.name_of(frame.node).to_string());
            stack.pop();
            continue;
        };
        frame.next += 1;

        match color.get(&neighbor).copied().unwrap_or(Color::White) {
            Color::Gray => {
                return Err(GraphError::Cycle {
                    path: cycle_path(graph, &stack, neighbor),
                })
            }
            Color::White => {
                color.insert(neighbor, Color::Gray);
                stack.push(Frame::new(graph, neighbor));
            }
            Color::Black => {}
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_simple_order() {
        let graph = graph_from(&[("A", "B"), ("A", "C"), ("B", "C")]);
        assert_eq!(load_order(&graph, "A").unwrap(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let graph = graph_from(&[
            ("app", "web"),
            ("app", "db"),
            ("web", "http"),
            ("web", "json"),
            ("db", "json"),
            ("http", "socket"),
            ("db", "socket"),
        ]);

        let order = load_order(&graph, "app").unwrap();
        assert_eq!(order.len(), graph.node_count());
        for (from, to) in graph.edges() {
            assert!(position(&order, to) < position(&order, from), "{to} must precede {from}");
        }
    }

    #[test]
    fn test_siblings_visited_in_name_order() {
        let graph = graph_from(&[("root", "zeta"), ("root", "alpha"), ("root", "mid")]);
        assert_eq!(
            load_order(&graph, "root").unwrap(),
            vec!["alpha", "mid", "zeta", "root"]
        );
    }

    #[test]
    fn test_only_reachable_packages() {
        let graph = graph_from(&[("a", "b"), ("c", "d"), ("d", "c")]);
        // the c/d cycle is unreachable from "a"
        assert_eq!(load_order(&graph, "a").unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_order_from_inner_node() {
        let graph = graph_from(&[("a", "b"), ("b", "c")]);
        assert_eq!(load_order(&graph, "b").unwrap(), vec!["c", "b"]);
    }

    #[test]
    fn test_cycle_is_error() {
        let graph = graph_from(&[("A", "B"), ("B", "A")]);
        assert_eq!(
            load_order(&graph, "A").unwrap_err(),
            GraphError::Cycle {
                path: vec!["A".into(), "B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_self_loop_is_error() {
        let graph = graph_from(&[("a", "b"), ("b", "b")]);
        assert!(matches!(
            load_order(&graph, "a"),
            Err(GraphError::Cycle { .. })
        ));
    }

    #[test]
    fn test_unknown_root() {
        let graph = graph_from(&[("a", "b")]);
        assert_eq!(
            load_order(&graph, "missing").unwrap_err(),
            GraphError::UnknownRoot {
                root: "missing".into()
            }
        );
    }

    #[test]
    fn test_isolated_root() {
        let mut graph = DependencyGraph::new();
        graph.add_node("solo");
        assert_eq!(load_order(&graph, "solo").unwrap(), vec!["solo"]);
    }
}
