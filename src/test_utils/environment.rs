//! Temporary test environment with a Maven-layout repository on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::BuildFixture;
use crate::model::Coordinate;
use crate::repository::LocalRepository;

/// Temporary directory holding a project dir and a repository root.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub repository_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let repository_dir = temp_dir.path().join("repository");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&repository_dir)?;

        Ok(Self {
            temp_dir,
            project_dir,
            repository_dir,
        })
    }

    /// Write a build description into the project directory.
    pub fn write_build(&self, fixture: &BuildFixture) -> Result<PathBuf> {
        fixture.write_to(&self.project_dir)
    }

    /// Write a properties file into the project directory.
    pub fn write_properties(&self, properties: &[(&str, &str)]) -> Result<PathBuf> {
        let mut content = String::from("[properties]\n");
        for (key, value) in properties {
            content.push_str(&format!("{key:?} = {value:?}\n"));
        }
        let path = self.project_dir.join("gleaner.toml");
        fs::write(&path, content).context("Failed to write properties file")?;
        Ok(path)
    }

    /// Place an empty artifact file for a canonical id (`group:artifact:ext:version`).
    pub fn install(&self, id: &str) -> Result<PathBuf> {
        let parts: Vec<&str> = id.split(':').collect();
        let [group, artifact, extension, version] = parts.as_slice() else {
            anyhow::bail!("Not a canonical id: {id}");
        };
        let coords = Coordinate::new(*group, *artifact, *version, *extension);
        let path = self.repository_dir.join(LocalRepository::relative_path(&coords));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, b"").with_context(|| format!("Failed to install {id}"))?;
        Ok(path)
    }

    /// Install every id.
    pub fn install_all(&self, ids: &[&str]) -> Result<()> {
        for id in ids {
            self.install(id)?;
        }
        Ok(())
    }

    /// Repository over this environment's root.
    pub fn repository(&self) -> LocalRepository {
        LocalRepository::new(vec![self.repository_dir.clone()])
    }

    /// Path inside the temp directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(relative)
    }
}
