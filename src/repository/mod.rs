//! Artifact lookup.
//!
//! The engine only needs one answer from a repository: does this artifact
//! exist, and where. [`ArtifactResolver`] is that seam; [`LocalRepository`]
//! answers it from Maven-layout directories on disk.
//!
//! Version ranges are never looked up. [`resolve_artifact`] rejects them with
//! [`GleanerError::VersionRangeUnsupported`] before the resolver is consulted.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::GleanerError;
use crate::model::Coordinate;

/// A repository that can locate artifacts.
pub trait ArtifactResolver {
    /// Locate the artifact file for `coords`.
    ///
    /// # Errors
    ///
    /// [`GleanerError::ArtifactNotFound`] when the repository has no such artifact.
    fn resolve(&self, coords: &Coordinate) -> Result<PathBuf, GleanerError>;
}

/// Resolve `coords`, refusing version ranges without consulting `resolver`.
pub fn resolve_artifact(
    resolver: &dyn ArtifactResolver,
    coords: &Coordinate,
) -> Result<PathBuf, GleanerError> {
    if coords.version.is_range() {
        return Err(GleanerError::VersionRangeUnsupported {
            coordinate: coords.to_string(),
        });
    }
    let path = resolver.resolve(coords)?;
    debug!("Dependency found at {}", path.display());
    Ok(path)
}

/// Maven-layout repositories on the local filesystem.
///
/// Roots are searched in order; the first existing file wins.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    roots: Vec<PathBuf>,
}

impl LocalRepository {
    /// Repository over the given roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
        }
    }

    /// `~/.m2/repository`, if a home directory is known.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    /// Searched roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Path of an artifact relative to a repository root.
    ///
    /// `<group as dirs>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<ext>`
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::model::Coordinate;
    /// use gleaner::repository::LocalRepository;
    /// use std::path::PathBuf;
    ///
    /// let coords = Coordinate::for_type("org.example", "lib", "1.0", None, "test-jar");
    /// assert_eq!(
    ///     LocalRepository::relative_path(&coords),
    ///     PathBuf::from("org/example/lib/1.0/lib-1.0-tests.jar")
    /// );
    /// ```
    pub fn relative_path(coords: &Coordinate) -> PathBuf {
        let mut path: PathBuf = coords.group_id.split('.').collect();
        path.push(&coords.artifact_id);
        path.push(coords.version.as_str());

        let mut file_name = format!("{}-{}", coords.artifact_id, coords.version);
        if !coords.classifier.is_empty() {
            file_name.push('-');
            file_name.push_str(&coords.classifier);
        }
        file_name.push('.');
        file_name.push_str(&coords.extension);
        path.push(file_name);
        path
    }

    fn candidate(root: &Path, relative: &Path) -> Option<PathBuf> {
        let path = root.join(relative);
        trace!("Probing {}", path.display());
        path.is_file().then_some(path)
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, coords: &Coordinate) -> Result<PathBuf, GleanerError> {
        let relative = Self::relative_path(coords);
        self.roots.iter().find_map(|root| Self::candidate(root, &relative)).ok_or_else(|| {
            GleanerError::ArtifactNotFound {
                coordinate: coords.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::tempdir;

    fn install(root: &Path, coords: &Coordinate) -> PathBuf {
        let path = root.join(LocalRepository::relative_path(coords));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_relative_path_layout() {
        let pom = Coordinate::new("org.apache.maven", "maven-parent", "41", "pom");
        assert_eq!(
            LocalRepository::relative_path(&pom),
            PathBuf::from("org/apache/maven/maven-parent/41/maven-parent-41.pom")
        );
    }

    #[test]
    fn test_resolve_searches_roots_in_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let coords = Coordinate::new("g", "a", "1", "jar");
        let expected = install(second.path(), &coords);

        let repo =
            LocalRepository::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(repo.resolve(&coords).unwrap(), expected);

        let preferred = install(first.path(), &coords);
        assert_eq!(repo.resolve(&coords).unwrap(), preferred);
    }

    #[test]
    fn test_resolve_missing() {
        let root = tempdir().unwrap();
        let repo = LocalRepository::new(vec![root.path().to_path_buf()]);
        let result = repo.resolve(&Coordinate::new("g", "missing", "1", "jar"));
        assert!(matches!(result, Err(GleanerError::ArtifactNotFound { .. })));
    }

    struct CountingResolver(Cell<usize>);

    impl ArtifactResolver for CountingResolver {
        fn resolve(&self, _coords: &Coordinate) -> Result<PathBuf, GleanerError> {
            self.0.set(self.0.get() + 1);
            Ok(PathBuf::from("/found"))
        }
    }

    #[test]
    fn test_ranges_never_reach_the_resolver() {
        let resolver = CountingResolver(Cell::new(0));
        let range = Coordinate::new("g", "a", "[1.0,2.0)", "jar");
        assert!(matches!(
            resolve_artifact(&resolver, &range),
            Err(GleanerError::VersionRangeUnsupported { .. })
        ));
        assert_eq!(resolver.0.get(), 0);

        resolve_artifact(&resolver, &Coordinate::new("g", "a", "1.0", "jar")).unwrap();
        assert_eq!(resolver.0.get(), 1);
    }
}
