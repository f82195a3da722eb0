//! depgraph - dependency graph explorer for Python packages
//!
//! This crate discovers the transitive dependencies of a package from the
//! PyPI registry or a fixture file, detects cycles, computes a load order
//! and writes a Mermaid diagram of the result.

pub mod app;
pub mod config;
pub mod graph;
pub mod logging;
pub mod source;
pub mod visualize;
