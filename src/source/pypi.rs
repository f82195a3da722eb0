//! Live dependency source backed by the PyPI JSON API.
//!
//! Metadata is fetched from `<origin>/pypi/<name>/json`, where the origin is
//! taken from the configured repository URL. Only `info.requires_dist` is
//! read; every entry is reduced to its bare, lower-cased package name.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{DependencySource, RepositoryError, RepositoryResult};

const USER_AGENT: &str = concat!("depgraph/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ProjectMetadata {
    #[serde(default)]
    info: ProjectInfo,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectInfo {
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// Dependency source that queries a PyPI-compatible registry.
#[derive(Debug, Clone)]
pub struct PypiSource {
    repo_url: Url,
    client: Client,
}

impl PypiSource {
    /// Creates a source for the given repository URL.
    ///
    /// Accepts either a registry root (`https://pypi.org`) or a project page
    /// (`https://pypi.org/project/requests/`).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidUrl`] if the URL does not parse or
    /// is not an http(s) URL with a host.
    pub fn new(repo_url: &str) -> RepositoryResult<Self> {
        let invalid = |reason: String| RepositoryError::InvalidUrl {
            url: repo_url.to_string(),
            reason,
        };

        let url = Url::parse(repo_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid("expected an http(s) URL with a host".to_string()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| RepositoryError::Request {
                url: repo_url.to_string(),
                source,
            })?;

        Ok(Self {
            repo_url: url,
            client,
        })
    }

    /// Name from a `/project/<name>/` URL path, if the URL has one.
    fn project_in_url(&self) -> Option<&str> {
        let mut segments = self.repo_url.path_segments()?;
        match (segments.next(), segments.next()) {
            (Some("project"), Some(name)) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Resolves the name used for the metadata lookup.
    ///
    /// The project name in the repository URL wins only when it refers to the
    /// same package (PEP 503 normalized comparison). It is not substituted
    /// for every lookup: doing so would resolve each transitive dependency
    /// to the URL's project. The result is always lower-cased.
    pub fn canonical_name(&self, package: &str) -> String {
        let name = match self.project_in_url() {
            Some(url_name) if normalize(url_name) == normalize(package) => url_name,
            _ => package,
        };
        name.to_lowercase()
    }

    /// Metadata endpoint for a package.
    pub fn metadata_url(&self, package: &str) -> String {
        let mut origin = self.repo_url.origin().ascii_serialization();
        origin.push_str("/pypi/");
        origin.push_str(&self.canonical_name(package));
        origin.push_str("/json");
        origin
    }
}

impl DependencySource for PypiSource {
    fn direct_dependencies(&self, package: &str) -> RepositoryResult<Vec<String>> {
        let url = self.metadata_url(package);
        debug!(%url, package, "Fetching package metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| RepositoryError::Request {
                url: url.clone(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(RepositoryError::NotFound {
                    package: package.to_string(),
                    url,
                })
            }
            status => {
                return Err(RepositoryError::Status {
                    status: status.as_u16(),
                    url,
                })
            }
        }

        let body = response.text().map_err(|source| RepositoryError::Request {
            url: url.clone(),
            source,
        })?;
        let metadata: ProjectMetadata =
            serde_json::from_str(&body).map_err(|source| RepositoryError::Json {
                url: url.clone(),
                source,
            })?;

        let deps: Vec<String> = metadata
            .info
            .requires_dist
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| parse_requirement_name(entry))
            .collect();

        debug!(package, count = deps.len(), "Resolved direct dependencies");
        Ok(deps)
    }
}

/// Extracts the bare, lower-cased package name from a requirement specifier.
///
/// Environment markers after `;` are dropped and the name is cut at the first
/// space, parenthesis, extras bracket or version operator.
///
/// # Example
///
/// ```
/// use depgraph::source::parse_requirement_name;
///
/// assert_eq!(parse_requirement_name("PySocks (>=1.5.6) ; extra == 'socks'"), Some("pysocks".to_string()));
/// assert_eq!(parse_requirement_name("urllib3[brotli]>=1.21.1"), Some("urllib3".to_string()));
/// assert_eq!(parse_requirement_name(" ; python_version < '3.8'"), None);
/// ```
pub fn parse_requirement_name(spec: &str) -> Option<String> {
    let requirement = spec.split(';').next().unwrap_or_default().trim();
    let end = requirement
        .find(|c: char| matches!(c, ' ' | '(' | '[' | '<' | '>' | '=' | '!' | '~'))
        .unwrap_or(requirement.len());
    let name = requirement[..end].trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

/// PEP 503 style normalization used to compare package names.
fn normalize(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}
