//! Dependency sources for depgraph.
//!
//! A [`DependencySource`] answers one question: which packages does a given
//! package directly depend on? The graph builder only talks to this trait,
//! so the live registry and the fixture file are interchangeable.
//!
//! # Supported Sources
//!
//! - **PyPI JSON API** ([`PypiSource`]) - live registry metadata
//! - **Fixture file** ([`FixtureSource`]) - `name: dep1 dep2` lines for repeatable tests
//!
//! # Example
//!
//! ```
//! use depgraph::source::{DependencySource, FixtureSource};
//!
//! let source = FixtureSource::parse_str("A: B C\nB: C\n").unwrap();
//! assert_eq!(source.direct_dependencies("A").unwrap(), vec!["B", "C"]);
//! assert!(source.direct_dependencies("Z").unwrap().is_empty());
//! ```

pub mod fixture;
pub mod pypi;

use std::path::{Path, PathBuf};

pub use fixture::FixtureSource;
pub use pypi::{parse_requirement_name, PypiSource};

use crate::config::RepositoryMode;

/// Errors that can occur while looking up dependencies.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The repository URL could not be parsed or has no host.
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP request failed before a response was received.
    #[error("Failed to fetch metadata from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The registry does not know the package.
    #[error("Package '{package}' not found at {url}")]
    NotFound { package: String, url: String },

    /// The registry answered with an unexpected status code.
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The registry response body is not the expected JSON document.
    #[error("Malformed metadata from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The fixture file could not be read.
    #[error("Failed to read fixture file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture line is not of the form `name: dep1 dep2 ...`.
    #[error("Malformed fixture line {line} in {}: '{content}'", .path.display())]
    MalformedFixture {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

/// Result type alias for dependency lookups.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Supplies the direct dependency names of a package.
pub trait DependencySource {
    /// Returns the names of the packages `package` directly depends on.
    fn direct_dependencies(&self, package: &str) -> RepositoryResult<Vec<String>>;
}

impl<S: DependencySource + ?Sized> DependencySource for Box<S> {
    fn direct_dependencies(&self, package: &str) -> RepositoryResult<Vec<String>> {
        (**self).direct_dependencies(package)
    }
}

impl<S: DependencySource + ?Sized> DependencySource for &S {
    fn direct_dependencies(&self, package: &str) -> RepositoryResult<Vec<String>> {
        (**self).direct_dependencies(package)
    }
}

/// Opens the dependency source selected by `mode`.
///
/// In [`RepositoryMode::Pypi`] `repo` is the registry or project URL; in
/// [`RepositoryMode::Test`] it is the path of a fixture file, which is
/// loaded immediately.
pub fn open_source(mode: RepositoryMode, repo: &str) -> RepositoryResult<Box<dyn DependencySource>> {
    let source: Box<dyn DependencySource> = match mode {
        RepositoryMode::Pypi => Box::new(PypiSource::new(repo)?),
        RepositoryMode::Test => Box::new(FixtureSource::from_path(Path::new(repo))?),
    };
    Ok(source)
}
