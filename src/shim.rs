//! Model and plugin loading on behalf of the host build.
//!
//! While the host computes execution plans it loads parent models, dependency
//! models and plugin descriptors. [`LoadingShim`] intercepts each of those
//! loads, registers the requested coordinate with the [`Collector`], and never
//! lets a missing artifact fail the plan: it answers with a stub instead.
//! This is how dependencies that appear in no declaration are discovered.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::collector::{Collector, ResolutionStatus};
use crate::host::{ModelLoader, MojoDescriptor, PluginManager};
use crate::model::{Coordinate, Dependency, Parent, Plugin};
use crate::repository::{ArtifactResolver, resolve_artifact};

/// Location reported by stub models.
pub const STUB_LOCATION: &str = "gleaner stub";

/// Minimal model synthesised for an artifact that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubModel {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version
    pub version: String,
    /// Packaging
    pub packaging: String,
}

impl StubModel {
    /// Stub with the given identity and packaging.
    pub fn new(group_id: &str, artifact_id: &str, version: &str, packaging: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: packaging.to_string(),
        }
    }

    /// Render as a model version 4.0.0 POM.
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::shim::StubModel;
    ///
    /// let pom = StubModel::new("org.example", "lib", "1.0", "pom").to_pom();
    /// assert!(pom.contains("<modelVersion>4.0.0</modelVersion>"));
    /// assert!(pom.contains("<artifactId>lib</artifactId>"));
    /// ```
    pub fn to_pom(&self) -> String {
        let mut pom = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        pom.push_str("<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n");
        for (element, value) in [
            ("modelVersion", "4.0.0"),
            ("groupId", self.group_id.as_str()),
            ("artifactId", self.artifact_id.as_str()),
            ("version", self.version.as_str()),
            ("packaging", self.packaging.as_str()),
        ] {
            let _ = writeln!(pom, "  <{element}>{}</{element}>", escape_xml(value));
        }
        pom.push_str("</project>\n");
        pom
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// A model handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A model file found in the repository
    File(PathBuf),
    /// A placeholder for a model that could not be found
    Stub(StubModel),
}

impl ModelSource {
    /// Where the model came from: a `file://` URL, or [`STUB_LOCATION`].
    pub fn location(&self) -> String {
        match self {
            Self::File(path) => format!("file://{}", path.display()),
            Self::Stub(_) => STUB_LOCATION.to_string(),
        }
    }

    /// Model text.
    ///
    /// # Errors
    ///
    /// Returns the read error of a model file.
    pub fn open(&self) -> io::Result<String> {
        match self {
            Self::File(path) => fs::read_to_string(path),
            Self::Stub(stub) => Ok(stub.to_pom()),
        }
    }

    /// Returns `true` for a placeholder model.
    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Stub(_))
    }
}

/// The [`ModelLoader`] gleaner hands to the host.
///
/// Every load registers its coordinate with the collector and settles the
/// record's resolution state. A record that has already settled as
/// unresolved is answered with a stub without asking the repository again.
pub struct LoadingShim<'a> {
    collector: &'a Collector,
    repository: &'a dyn ArtifactResolver,
    plugin_manager: &'a dyn PluginManager,
}

impl<'a> LoadingShim<'a> {
    /// Shim registering into `collector`.
    pub fn new(
        collector: &'a Collector,
        repository: &'a dyn ArtifactResolver,
        plugin_manager: &'a dyn PluginManager,
    ) -> Self {
        Self {
            collector,
            repository,
            plugin_manager,
        }
    }

    fn load_model(&self, coords: &Coordinate) -> Option<PathBuf> {
        let dep = self.collector.lookup(coords);
        if dep.status() == ResolutionStatus::Unresolved {
            return None;
        }
        match resolve_artifact(self.repository, coords) {
            Ok(path) => {
                dep.settle(true);
                Some(path)
            }
            Err(e) => {
                debug!("Cannot load model {}: {}", coords, e);
                dep.settle(false);
                None
            }
        }
    }
}

impl ModelLoader for LoadingShim<'_> {
    fn resolve_parent_model(&self, parent: &Parent) -> ModelSource {
        if let Some(path) = self.load_model(&parent.coordinate()) {
            debug!("Parent POM found at {}", path.display());
            return ModelSource::File(path);
        }
        debug!("Stubbed parent POM {}", parent.artifact_id);
        ModelSource::Stub(StubModel::new(
            &parent.group_id,
            &parent.artifact_id,
            &parent.version,
            "pom",
        ))
    }

    fn resolve_dependency_model(&self, dependency: &Dependency) -> ModelSource {
        if let Some(path) = self.load_model(&dependency.coordinate()) {
            debug!("Dependency POM found at {}", path.display());
            return ModelSource::File(path);
        }
        warn!("Stubbed dependency POM {}", dependency.artifact_id);
        ModelSource::Stub(StubModel::new(
            &dependency.group_id,
            &dependency.artifact_id,
            &dependency.version,
            &dependency.type_name,
        ))
    }

    fn mojo_descriptor(&self, plugin: &Plugin, goal: &str) -> MojoDescriptor {
        let dep = self.collector.lookup(&plugin.coordinate());
        if dep.status() != ResolutionStatus::Unresolved {
            match self.plugin_manager.mojo_descriptor(plugin, goal) {
                Ok(descriptor) => {
                    dep.settle(true);
                    return descriptor;
                }
                Err(e) => {
                    debug!("Cannot load plugin {}: {}", plugin.id(), e);
                    dep.settle(false);
                }
            }
        }
        debug!("Stubbed plugin {} goal {}", plugin.artifact_id, goal);
        MojoDescriptor::stub(goal)
    }
}
