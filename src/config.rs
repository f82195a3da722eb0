//! Command-line definition and validated application configuration.

use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use reqwest::Url;

/// Errors found while validating the command line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `--package` is missing or blank.
    #[error("Package name (--package) is missing or empty")]
    EmptyPackage,

    /// `--repo` is missing or blank.
    #[error("Repository URL or fixture path (--repo) is missing or empty")]
    EmptyRepository,

    /// PyPI mode was selected but `--repo` is not an http(s) URL with a host.
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    /// Test mode was selected but the fixture file does not exist.
    #[error("Test repository file not found: {}", .0.display())]
    FixtureNotFound(PathBuf),

    /// Test mode was selected but the fixture path is not a regular file.
    #[error("Expected a test repository file, but this is not a file: {}", .0.display())]
    FixtureNotFile(PathBuf),

    /// The output image path points at a directory.
    #[error("Output image path is a directory: {}", .0.display())]
    ImageIsDirectory(PathBuf),
}

/// Where dependency data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RepositoryMode {
    /// Live PyPI registry
    #[default]
    Pypi,
    /// Local fixture file
    Test,
}

impl fmt::Display for RepositoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pypi => write!(f, "pypi"),
            Self::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "depgraph")]
#[command(version)]
#[command(about = "Analyze and visualize the dependency graph of Python packages", long_about = None)]
pub struct Cli {
    /// Name of the package to analyze
    #[arg(short, long)]
    pub package: String,

    /// Repository URL (PyPI project page) or fixture file path in test mode
    #[arg(short, long)]
    pub repo: String,

    /// Repository mode
    #[arg(short, long, value_enum, default_value_t = RepositoryMode::Pypi)]
    pub mode: RepositoryMode,

    /// Output image file for the dependency graph
    #[arg(short, long = "output-image", default_value = "graph.png")]
    pub output_image: PathBuf,

    /// Skip every package whose name contains this substring
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Print the direct dependencies of the package
    #[arg(long)]
    pub show_direct: bool,

    /// Print the load order of the package's dependencies
    #[arg(long)]
    pub show_order: bool,

    /// Do not write or render the diagram
    #[arg(long)]
    pub no_visualize: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub package_name: String,
    pub repo: String,
    pub mode: RepositoryMode,
    pub output_image: PathBuf,
    pub filter_substring: String,
    pub show_direct: bool,
    pub show_order: bool,
    pub visualize: bool,
}

impl AppConfig {
    /// Validates the parsed command line.
    ///
    /// Package name and repository are trimmed. In PyPI mode the repository
    /// must be an http(s) URL with a host; in test mode it must be an
    /// existing file. An image path without extension gets `.png`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let package_name = cli.package.trim();
        if package_name.is_empty() {
            return Err(ConfigError::EmptyPackage);
        }

        let repo = cli.repo.trim();
        if repo.is_empty() {
            return Err(ConfigError::EmptyRepository);
        }

        match cli.mode {
            RepositoryMode::Pypi => validate_repo_url(repo)?,
            RepositoryMode::Test => {
                let path = PathBuf::from(repo);
                if !path.exists() {
                    return Err(ConfigError::FixtureNotFound(path));
                }
                if !path.is_file() {
                    return Err(ConfigError::FixtureNotFile(path));
                }
            }
        }

        let mut output_image = cli.output_image.clone();
        if output_image.is_dir() {
            return Err(ConfigError::ImageIsDirectory(output_image));
        }
        if output_image.extension().is_none() {
            output_image.set_extension("png");
        }

        Ok(Self {
            package_name: package_name.to_string(),
            repo: repo.to_string(),
            mode: cli.mode,
            output_image,
            filter_substring: cli.filter.clone(),
            show_direct: cli.show_direct,
            show_order: cli.show_order,
            visualize: !cli.no_visualize,
        })
    }

    /// Key/value pairs describing the configuration, in display order.
    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("package_name", self.package_name.clone()),
            ("repo", self.repo.clone()),
            ("mode", self.mode.to_string()),
            ("output_image", self.output_image.display().to_string()),
            ("filter_substring", self.filter_substring.clone()),
        ]
    }
}

fn validate_repo_url(repo: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRepositoryUrl {
        url: repo.to_string(),
        reason,
    };

    let url = Url::parse(repo).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid("expected an http(s) URL with a host".to_string()));
    }
    Ok(())
}
