//! Image rendering through the Mermaid CLI (`mmdc`).

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::VisualizationError;

/// Name of the Mermaid CLI binary.
pub const MERMAID_CLI: &str = "mmdc";

/// Renders a Mermaid file to an image using `mmdc`.
pub fn render_png(mermaid_path: &Path, image_path: &Path) -> Result<(), VisualizationError> {
    render_with(MERMAID_CLI, mermaid_path, image_path)
}

/// Renders a Mermaid file to an image using the given renderer binary.
///
/// The renderer is invoked as `<program> -i <mermaid> -o <image>`.
pub fn render_with(
    program: &str,
    mermaid_path: &Path,
    image_path: &Path,
) -> Result<(), VisualizationError> {
    debug!(
        program,
        input = %mermaid_path.display(),
        output = %image_path.display(),
        "Rendering diagram"
    );

    let output = Command::new(program)
        .arg("-i")
        .arg(mermaid_path)
        .arg("-o")
        .arg(image_path)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => VisualizationError::RendererNotFound {
                program: program.to_string(),
            },
            _ => VisualizationError::Spawn {
                program: program.to_string(),
                source,
            },
        })?;

    if !output.status.success() {
        return Err(VisualizationError::RenderFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_with(
            "depgraph-no-such-renderer",
            &dir.path().join("g.mmd"),
            &dir.path().join("g.png"),
        )
        .unwrap_err();

        assert!(matches!(err, VisualizationError::RendererNotFound { .. }));
        assert!(err.to_string().contains("npm install -g @mermaid-js/mermaid-cli"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_renderer() {
        let dir = tempfile::tempdir().unwrap();
        // `false` ignores its arguments and exits with status 1
        let err = render_with("false", &dir.path().join("g.mmd"), &dir.path().join("g.png"))
            .unwrap_err();

        assert!(matches!(err, VisualizationError::RenderFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_renderer() {
        let dir = tempfile::tempdir().unwrap();
        render_with("true", &dir.path().join("g.mmd"), &dir.path().join("g.png")).unwrap();
    }
}
