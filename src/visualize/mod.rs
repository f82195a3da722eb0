//! Diagram output for dependency graphs.
//!
//! The graph is written as a Mermaid flowchart (`.mmd`) and then
//! rendered to an image by the external Mermaid CLI. Every failure here is
//! reported as a [`VisualizationError`], which callers treat as a warning.

pub mod mermaid;
pub mod render;

use std::path::{Path, PathBuf};

pub use mermaid::{save_mermaid, to_mermaid, write_mermaid};
pub use render::{render_png, render_with, MERMAID_CLI};

use crate::graph::DependencyGraph;

/// Errors that can occur while producing a diagram.
#[derive(Debug, thiserror::Error)]
pub enum VisualizationError {
    /// The diagram source could not be written.
    #[error("Failed to write diagram {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer binary is not installed or not on `PATH`.
    #[error("Renderer '{program}' not found. Install Mermaid CLI: npm install -g @mermaid-js/mermaid-cli")]
    RendererNotFound { program: String },

    /// The renderer could not be started.
    #[error("Failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but reported a failure.
    #[error("Renderer '{program}' failed ({status}): {stderr}")]
    RenderFailed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Path of the Mermaid source written next to `image_path`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use depgraph::visualize::mermaid_path_for;
///
/// assert_eq!(mermaid_path_for(Path::new("out/graph.png")), Path::new("out/graph.mmd"));
/// ```
pub fn mermaid_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("mmd")
}

/// Writes the Mermaid source next to `image_path` and renders the image
/// with `mmdc`.
///
/// Returns the path of the Mermaid file. The `.mmd` file is left in place
/// when rendering fails.
pub fn visualize(graph: &DependencyGraph, image_path: &Path) -> Result<PathBuf, VisualizationError> {
    let mermaid_path = mermaid_path_for(image_path);
    let text = to_mermaid(graph).map_err(|source| VisualizationError::Io {
        path: mermaid_path.clone(),
        source,
    })?;
    save_mermaid(&text, &mermaid_path)?;
    render_png(&mermaid_path, image_path)?;
    Ok(mermaid_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mermaid_path_without_extension() {
        assert_eq!(mermaid_path_for(Path::new("graph")), PathBuf::from("graph.mmd"));
    }

    #[test]
    fn test_visualize_keeps_mermaid_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");

        // mmdc may be missing; the source must be written either way
        match visualize(&graph, &dir.path().join("deps.png")) {
            Ok(written) => assert_eq!(written, dir.path().join("deps.mmd")),
            Err(e) => assert!(!matches!(e, VisualizationError::Io { .. }), "{e}"),
        }
        assert_eq!(
            std::fs::read_to_string(dir.path().join("deps.mmd")).unwrap(),
            "graph TD\n    \"a\" --> \"b\"\n    \"b\"\n"
        );
    }

    #[test]
    fn test_visualize_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let graph = DependencyGraph::new();

        let err = visualize(&graph, &dir.path().join("missing").join("deps.png")).unwrap_err();
        assert!(matches!(err, VisualizationError::Io { .. }));
    }
}
