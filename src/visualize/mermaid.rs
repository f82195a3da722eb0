//! Mermaid flowchart generation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::VisualizationError;
use crate::graph::DependencyGraph;

/// Writes the graph as a top-down Mermaid flowchart.
///
/// Packages are emitted in name order. A package without dependencies is
/// declared on its own line; every edge gets one line.
pub fn write_mermaid<W: Write>(graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "graph TD")?;

    for name in graph.nodes() {
        let deps = graph.dependencies_of(&name);
        if deps.is_empty() {
            writeln!(writer, "    \"{}\"", name)?;
            continue;
        }
        for dep in deps {
            writeln!(writer, "    \"{}\" --> \"{}\"", name, dep)?;
        }
    }

    Ok(())
}

/// Renders the graph as Mermaid text.
///
/// # Example
///
/// ```
/// use depgraph::graph::DependencyGraph;
/// use depgraph::visualize::to_mermaid;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("flask", "click");
///
/// let text = to_mermaid(&graph).unwrap();
/// assert_eq!(text, "graph TD\n    \"click\"\n    \"flask\" --> \"click\"\n");
/// ```
pub fn to_mermaid(graph: &DependencyGraph) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_mermaid(graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Saves Mermaid text to `path`, returning the path written.
pub fn save_mermaid(text: &str, path: &Path) -> Result<PathBuf, VisualizationError> {
    fs::write(path, text).map_err(|source| VisualizationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
