//! Cycle detection over the whole dependency graph.
//!
//! Uses a three-color depth-first search driven by an explicit stack, so
//! deep dependency chains do not grow the call stack.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use super::DependencyGraph;

/// DFS node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    /// Not visited yet
    White,
    /// On the current DFS path
    Gray,
    /// Fully explored
    Black,
}

/// One DFS stack entry: a node and the neighbors still to visit.
pub(crate) struct Frame {
    pub(crate) node: NodeIndex,
    pub(crate) neighbors: Vec<NodeIndex>,
    pub(crate) next: usize,
}

impl Frame {
    pub(crate) fn new(graph: &DependencyGraph, node: NodeIndex) -> Self {
        Self {
            node,
            neighbors: graph.sorted_neighbors(node),
            next: 0,
        }
    }
}

/// Builds the cycle path from the stack, starting at the gray node `target`
/// and closing back on it.
pub(crate) fn cycle_path(graph: &DependencyGraph, stack: &[Frame], target: NodeIndex) -> Vec<String> {
    let start = stack
        .iter()
        .position(|frame| frame.node == target)
        .unwrap_or(0);

    let mut path: Vec<String> = stack[start..]
        .iter()
        .map(|frame| graph.name_of(frame.node).to_string())
        .collect();
    path.push(graph.name_of(target).to_string());
    path
}

/// Returns `true` if any directed cycle exists anywhere in the graph.
///
/// All packages are considered, not only those reachable from a root.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{has_cycle, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("a", "b");
/// assert!(!has_cycle(&graph));
///
/// graph.add_edge("b", "a");
/// assert!(has_cycle(&graph));
/// ```
pub fn has_cycle(graph: &DependencyGraph) -> bool {
    find_cycle(graph).is_some()
}

/// Returns the first cycle found, as a path whose last package repeats the first.
///
/// Packages are scanned in name order, so the reported cycle is stable
/// across runs.
pub fn find_cycle(graph: &DependencyGraph) -> Option<Vec<String>> {
    let mut color: HashMap<NodeIndex, Color> = HashMap::with_capacity(graph.node_count());

    for start in graph.sorted_indices() {
        if color.get(&start).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }

        color.insert(start, Color::Gray);
        let mut stack = vec![Frame::new(graph, start)];

        while let Some(frame) = stack.last_mut() {
            let Some(&neighbor) = frame.neighbors.get(frame.next) else {
                color.insert(frame.node, Color::Black);
                stack.pop();
                continue;
            };
            frame.next += 1;

            match color.get(&neighbor).copied().unwrap_or(Color::White) {
                Color::Gray => return Some(cycle_path(graph, &stack, neighbor)),
                Color::White => {
                    color.insert(neighbor, Color::Gray);
                    stack.push(Frame::new(graph, neighbor));
                }
                Color::Black => {}
            }
        }
    }

    None
}
