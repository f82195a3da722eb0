//! Graph engine for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] container, the breadth-first
//! [`build_graph`] traversal that fills it from a dependency source, cycle
//! detection and load-order computation.
//!
//! # Example
//!
//! ```rust
//! use depgraph::graph::{build_graph, has_cycle, load_order};
//! use depgraph::source::FixtureSource;
//!
//! let source = FixtureSource::parse_str("A: B C\nB: C\nC:\n").unwrap();
//! let graph = build_graph("A", &source, "").unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert!(!has_cycle(&graph));
//! assert_eq!(load_order(&graph, "A").unwrap(), vec!["C", "B", "A"]);
//! ```

mod builder;
mod cycles;
mod dependency_graph;
mod order;

pub use builder::build_graph;
pub use cycles::{find_cycle, has_cycle};
pub use dependency_graph::{DependencyGraph, GraphError};
pub use order::load_order;
