//! Command-line workflow: build the graph, analyze it and report.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::AppConfig;
use crate::graph::{build_graph, find_cycle, load_order, DependencyGraph};
use crate::source::{open_source, DependencySource, RepositoryError};
use crate::visualize::{self, mermaid_path_for};

/// Process exit code for a successful run.
pub const EXIT_OK: u8 = 0;
/// Process exit code for an invalid command line.
pub const EXIT_CONFIG_ERROR: u8 = 2;
/// Process exit code for a dependency lookup failure.
pub const EXIT_REPOSITORY_ERROR: u8 = 3;

/// Runs the whole workflow for a validated configuration.
///
/// Regular output goes to `out`, errors and warnings to `err`. Returns the
/// process exit code; `Err` is reserved for failures writing the report.
pub fn run<O: Write, E: Write>(config: &AppConfig, out: &mut O, err: &mut E) -> Result<u8> {
    print_config(config, out)?;

    let source = match open_source(config.mode, &config.repo) {
        Ok(source) => source,
        Err(e) => return report_repository_error(&e, err),
    };

    if config.show_direct {
        match source.direct_dependencies(&config.package_name) {
            Ok(deps) => print_direct(&config.package_name, &deps, out)?,
            Err(e) => return report_repository_error(&e, err),
        }
    }

    let graph = match build_graph(&config.package_name, &source, &config.filter_substring) {
        Ok(graph) => graph,
        Err(e) => return report_repository_error(&e, err),
    };

    print_summary(&graph, out)?;

    if config.show_order {
        print_load_order(&graph, &config.package_name, out, err)?;
    }

    if config.visualize {
        write_diagram(&graph, config, out, err)?;
    }

    Ok(EXIT_OK)
}

fn report_repository_error<E: Write>(error: &RepositoryError, err: &mut E) -> Result<u8> {
    writeln!(err, "[REPOSITORY ERROR] {error}").context("Failed to write error report")?;
    Ok(EXIT_REPOSITORY_ERROR)
}

fn print_config<O: Write>(config: &AppConfig, out: &mut O) -> Result<()> {
    writeln!(out, "=== depgraph configuration ===")?;
    for (key, value) in config.as_pairs() {
        writeln!(out, "{key} = {value}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_direct<O: Write>(package: &str, deps: &[String], out: &mut O) -> Result<()> {
    writeln!(out, "=== direct dependencies of {package} ===")?;
    if deps.is_empty() {
        writeln!(out, "(none)")?;
    }
    for dep in deps {
        writeln!(out, "- {dep}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_summary<O: Write>(graph: &DependencyGraph, out: &mut O) -> Result<()> {
    writeln!(out, "=== dependency graph ===")?;
    writeln!(out, "packages: {}", graph.node_count())?;
    writeln!(out, "edges: {}", graph.edge_count())?;

    if !graph.ignored().is_empty() {
        let ignored: Vec<&str> = graph.ignored().iter().map(String::as_str).collect();
        writeln!(out, "ignored: {}", ignored.join(", "))?;
    }

    match find_cycle(graph) {
        Some(path) => writeln!(out, "cycles: detected ({})", path.join(" -> "))?,
        None => writeln!(out, "cycles: none")?,
    }
    writeln!(out)?;
    Ok(())
}

fn print_load_order<O: Write, E: Write>(
    graph: &DependencyGraph,
    root: &str,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match load_order(graph, root) {
        Ok(order) => {
            writeln!(out, "=== load order ===")?;
            for (i, package) in order.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, package)?;
            }
            writeln!(out)?;
        }
        Err(e) => {
            warn!(error = %e, "Skipping load order");
            writeln!(err, "[GRAPH WARNING] Load order unavailable: {e}")?;
        }
    }
    Ok(())
}

fn write_diagram<O: Write, E: Write>(
    graph: &DependencyGraph,
    config: &AppConfig,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match visualize::visualize(graph, &config.output_image) {
        Ok(mermaid_path) => {
            writeln!(out, "Mermaid diagram: {}", mermaid_path.display())?;
            writeln!(out, "Image: {}", config.output_image.display())?;
        }
        Err(e) => {
            warn!(error = %e, "Visualization failed");
            if mermaid_path_for(&config.output_image).is_file() {
                writeln!(
                    out,
                    "Mermaid diagram: {}",
                    mermaid_path_for(&config.output_image).display()
                )?;
            }
            writeln!(err, "[VISUALIZATION WARNING] {e}")?;
        }
    }
    Ok(())
}
