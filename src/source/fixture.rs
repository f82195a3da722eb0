//! File-backed dependency source used for repeatable tests.
//!
//! The fixture format is line oriented:
//!
//! ```text
//! # comment
//! A: B C
//! B: C
//! C:
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. A package listed
//! more than once gets the union of its dependency lists.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DependencySource, RepositoryError, RepositoryResult};

/// Dependency source loaded eagerly from a fixture file.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    packages: BTreeMap<String, BTreeSet<String>>,
}

impl FixtureSource {
    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the file cannot be read and
    /// [`RepositoryError::MalformedFixture`] for a line without a `name:` prefix.
    pub fn from_path(path: &Path) -> RepositoryResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::parse(&content, path)?;
        debug!(
            path = %path.display(),
            packages = source.len(),
            "Loaded fixture repository"
        );
        Ok(source)
    }

    /// Parses fixture content held in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::source::FixtureSource;
    ///
    /// let source = FixtureSource::parse_str("# demo\nA: B\n\nB:\n").unwrap();
    /// assert_eq!(source.len(), 2);
    /// ```
    pub fn parse_str(content: &str) -> RepositoryResult<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> RepositoryResult<Self> {
        let mut packages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (number, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || RepositoryError::MalformedFixture {
                path: PathBuf::from(path),
                line: number + 1,
                content: raw.to_string(),
            };

            let (name, deps) = line.split_once(':').ok_or_else(malformed)?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(malformed());
            }

            packages
                .entry(name.to_string())
                .or_default()
                .extend(deps.split_whitespace().map(str::to_string));
        }

        Ok(Self { packages })
    }

    /// Number of packages declared in the fixture.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the fixture declares no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl DependencySource for FixtureSource {
    fn direct_dependencies(&self, package: &str) -> RepositoryResult<Vec<String>> {
        Ok(self
            .packages
            .get(package)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_fixture() {
        let source = FixtureSource::parse_str("A: B C\nB: C\nC:\n").unwrap();

        assert_eq!(source.len(), 3);
        assert_eq!(source.direct_dependencies("A").unwrap(), vec!["B", "C"]);
        assert_eq!(source.direct_dependencies("B").unwrap(), vec!["C"]);
        assert!(source.direct_dependencies("C").unwrap().is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let content = "# header\n\n   \nA: B\n  # indented comment\n";
        let source = FixtureSource::parse_str(content).unwrap();

        assert_eq!(source.len(), 1);
        assert_eq!(source.direct_dependencies("A").unwrap(), vec!["B"]);
    }

    #[test]
    fn test_dependencies_sorted_and_deduplicated() {
        let source = FixtureSource::parse_str("A: D B C B\n").unwrap();
        assert_eq!(source.direct_dependencies("A").unwrap(), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_repeated_package_merges() {
        let source = FixtureSource::parse_str("A: C\nA: B\n").unwrap();
        assert_eq!(source.direct_dependencies("A").unwrap(), vec!["B", "C"]);
    }

    #[test]
    fn test_unknown_package_has_no_dependencies() {
        let source = FixtureSource::parse_str("A: B\n").unwrap();
        assert!(source.direct_dependencies("Z").unwrap().is_empty());
        // B is only mentioned as a dependency
        assert!(source.direct_dependencies("B").unwrap().is_empty());
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        let err = FixtureSource::parse_str("A: B\nthis line is broken\n").unwrap_err();
        match err {
            RepositoryError::MalformedFixture { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "this line is broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_is_malformed() {
        let err = FixtureSource::parse_str(": B C\n").unwrap_err();
        assert!(matches!(err, RepositoryError::MalformedFixture { line: 1, .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "requests: urllib3 idna").unwrap();
        writeln!(file, "urllib3:").unwrap();

        let source = FixtureSource::from_path(file.path()).unwrap();
        assert_eq!(
            source.direct_dependencies("requests").unwrap(),
            vec!["idna", "urllib3"]
        );
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = FixtureSource::from_path(&path).unwrap_err();
        assert!(matches!(err, RepositoryError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_malformed_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "broken").unwrap();

        let err = FixtureSource::from_path(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 1"));
        assert!(message.contains("'broken'"));
    }
}
