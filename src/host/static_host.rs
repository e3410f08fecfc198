//! A build host driven by a TOML build description.
//!
//! The description lists the build's projects with their declarations, the
//! goals being built, and a catalog of plugin goal descriptors (what each
//! plugin jar would declare about its goals):
//!
//! ```toml
//! goals = ["install"]
//!
//! [[plugins]]
//! group = "org.apache.maven.plugins"
//! artifact = "maven-compiler-plugin"
//! mojos = [
//!     { goal = "compile", phase = "compile", requires = "compile" },
//!     { goal = "testCompile", phase = "test-compile", requires = "test" },
//! ]
//!
//! [[projects]]
//! group = "org.example"
//! artifact = "app"
//! version = "1.0"
//! file = "/work/app/pom.xml"
//! parent = { group = "org.example", artifact = "parent", version = "7", line = 6 }
//!
//! [[projects.dependencies]]
//! group = "junit"
//! artifact = "junit"
//! version = "4.13.2"
//! scope = "test"
//! line = 30
//!
//! [[projects.executions]]
//! goal = "compile"
//! plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", line = 45 }
//! ```
//!
//! Plans contain the executions whose phase falls at or before the furthest
//! requested lifecycle phase, in lifecycle order. Goals that are not default
//! lifecycle phases put every execution in the plan.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::{BuildHost, ExecutionPlan, ModelLoader, MojoDescriptor, MojoExecution, PluginManager};
use crate::config::parse_config;
use crate::core::GleanerError;
use crate::model::{Plugin, Project};
use crate::reactor::ModuleIndex;
use crate::repository::{ArtifactResolver, resolve_artifact};

/// Phases of the default lifecycle, in order.
const DEFAULT_LIFECYCLE: &[&str] = &[
    "validate",
    "initialize",
    "generate-sources",
    "process-sources",
    "generate-resources",
    "process-resources",
    "compile",
    "process-classes",
    "generate-test-sources",
    "process-test-sources",
    "generate-test-resources",
    "process-test-resources",
    "test-compile",
    "process-test-classes",
    "test",
    "prepare-package",
    "package",
    "pre-integration-test",
    "integration-test",
    "post-integration-test",
    "verify",
    "install",
    "deploy",
];

fn phase_position(phase: &str) -> Option<usize> {
    DEFAULT_LIFECYCLE.iter().position(|p| *p == phase)
}

/// What a plugin declares about one of its goals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MojoSpec {
    /// Goal name
    pub goal: String,
    /// Default phase, `none` when unbound
    #[serde(default)]
    pub phase: Option<String>,
    /// Required dependency resolution
    #[serde(default)]
    pub requires: Option<String>,
}

/// Catalog entry for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginSpec {
    /// Group id
    #[serde(rename = "group")]
    pub group_id: String,
    /// Artifact id
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    /// Goals of the plugin
    #[serde(default)]
    pub mojos: Vec<MojoSpec>,
}

/// The whole build description file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDescription {
    /// Goals or lifecycle phases being built
    #[serde(default)]
    pub goals: Vec<String>,
    /// Plugin goal catalog
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    /// Projects in build order
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// [`BuildHost`] over a [`BuildDescription`].
#[derive(Debug, Clone)]
pub struct StaticBuildHost {
    description: BuildDescription,
}

impl StaticBuildHost {
    /// Host over an in-memory description.
    ///
    /// Declarations without an explicit source inherit their project's `file`.
    pub fn new(mut description: BuildDescription) -> Self {
        for project in &mut description.projects {
            project.attach_sources();
        }
        Self {
            description,
        }
    }

    /// Load a description file.
    pub fn load(path: &Path) -> Result<Self, GleanerError> {
        let description: BuildDescription = parse_config(path)?;
        debug!(
            "Loaded build description {} with {} projects",
            path.display(),
            description.projects.len()
        );
        Ok(Self::new(description))
    }

    /// Goals being built.
    pub fn goals(&self) -> &[String] {
        &self.description.goals
    }

    /// Plugin manager answering from this description's plugin catalog.
    pub fn plugin_manager<'a>(&'a self, repository: &'a dyn ArtifactResolver) -> CatalogPluginManager<'a> {
        CatalogPluginManager {
            catalog: &self.description.plugins,
            repository,
        }
    }

    /// Furthest lifecycle phase requested, or `None` to plan every execution.
    fn phase_limit(&self) -> Option<usize> {
        self.description.goals.iter().filter_map(|goal| phase_position(goal)).max()
    }
}

impl BuildHost for StaticBuildHost {
    fn projects(&self) -> &[Project] {
        &self.description.projects
    }

    fn calculate_plan(
        &self,
        project: &Project,
        setup: bool,
        loader: &dyn ModelLoader,
    ) -> anyhow::Result<ExecutionPlan> {
        let reactor = ModuleIndex::new(self.projects());

        if let Some(parent) = &project.parent {
            if reactor.find(&parent.coordinate()).is_none() {
                let model = loader.resolve_parent_model(parent);
                debug!("Parent model of {} from {}", project.artifact_id, model.location());
            }
        }
        for import in &project.imports {
            if reactor.find(&import.coordinate()).is_none() {
                let model = loader.resolve_dependency_model(import);
                debug!("Imported model of {} from {}", project.artifact_id, model.location());
            }
        }

        let limit = self.phase_limit();
        let mut executions = Vec::new();
        for execution in &project.executions {
            if execution.goal.is_empty() {
                anyhow::bail!(
                    "Execution {} of plugin {} in project {} has no goal",
                    execution.execution_id(),
                    execution.plugin.id(),
                    project.artifact_id
                );
            }
            let descriptor = loader.mojo_descriptor(&execution.plugin, &execution.goal);
            let phase = execution.phase.clone().unwrap_or_else(|| descriptor.phase.clone());
            let position = phase_position(&phase);
            if limit.is_some_and(|limit| position.is_none_or(|p| p > limit)) {
                debug!("Execution {} in phase {} not planned", execution.execution_id(), phase);
                continue;
            }

            let mut plugin = execution.plugin.clone();
            if !setup {
                plugin.dependencies.clear();
            }
            executions.push((
                position,
                MojoExecution {
                    plugin,
                    goal: execution.goal.clone(),
                    execution_id: execution.execution_id(),
                    lifecycle_phase: phase,
                    descriptor,
                },
            ));
        }
        if limit.is_some() {
            executions.sort_by_key(|(position, _)| *position);
        }

        Ok(ExecutionPlan {
            executions: executions.into_iter().map(|(_, execution)| execution).collect(),
        })
    }
}

/// [`PluginManager`] backed by a plugin catalog and a repository.
///
/// A goal can be loaded only if the plugin artifact resolves and the catalog
/// declares the goal.
pub struct CatalogPluginManager<'a> {
    catalog: &'a [PluginSpec],
    repository: &'a dyn ArtifactResolver,
}

impl PluginManager for CatalogPluginManager<'_> {
    fn mojo_descriptor(&self, plugin: &Plugin, goal: &str) -> Result<MojoDescriptor, GleanerError> {
        resolve_artifact(self.repository, &plugin.coordinate())?;

        self.catalog
            .iter()
            .filter(|spec| spec.group_id == plugin.group_id && spec.artifact_id == plugin.artifact_id)
            .flat_map(|spec| &spec.mojos)
            .find(|mojo| mojo.goal == goal)
            .map(|mojo| MojoDescriptor {
                goal: mojo.goal.clone(),
                phase: mojo.phase.clone().unwrap_or_else(|| "none".to_string()),
                dependency_resolution_required: mojo.requires.clone(),
                stub: false,
            })
            .ok_or_else(|| GleanerError::MojoNotFound {
                plugin: plugin.id(),
                goal: goal.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, Parent};
    use crate::shim::{ModelSource, StubModel};
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Loader that records calls and answers from the catalog directly.
    #[derive(Default)]
    struct RecordingLoader {
        calls: RefCell<Vec<String>>,
        requires: Option<String>,
    }

    impl ModelLoader for RecordingLoader {
        fn resolve_parent_model(&self, parent: &Parent) -> ModelSource {
            self.calls.borrow_mut().push(format!("parent {}", parent.artifact_id));
            ModelSource::File(PathBuf::from("/repo/parent.pom"))
        }

        fn resolve_dependency_model(&self, dependency: &Dependency) -> ModelSource {
            self.calls.borrow_mut().push(format!("model {}", dependency.artifact_id));
            ModelSource::Stub(StubModel::new(
                &dependency.group_id,
                &dependency.artifact_id,
                &dependency.version,
                &dependency.type_name,
            ))
        }

        fn mojo_descriptor(&self, plugin: &Plugin, goal: &str) -> MojoDescriptor {
            self.calls.borrow_mut().push(format!("mojo {}:{}", plugin.artifact_id, goal));
            let phase = match goal {
                "compile" => "compile",
                "testCompile" => "test-compile",
                "jar" => "package",
                "deploy" => "deploy",
                _ => "none",
            };
            MojoDescriptor {
                goal: goal.to_string(),
                phase: phase.to_string(),
                dependency_resolution_required: self.requires.clone(),
                stub: false,
            }
        }
    }

    const DESCRIPTION: &str = r#"
goals = ["package"]

[[projects]]
group = "org.example"
artifact = "parent"
version = "1.0"
packaging = "pom"

[[projects]]
group = "org.example"
artifact = "app"
version = "1.0"
file = "/work/app/pom.xml"
parent = { group = "org.example", artifact = "parent", version = "1.0", line = 3 }

[[projects.imports]]
group = "org.junit"
artifact = "junit-bom"
version = "5.10.0"
type = "pom"
scope = "import"

[[projects.executions]]
goal = "jar"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-jar-plugin", version = "3.3.0" }

[[projects.executions]]
goal = "compile"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", dependencies = [
    { group = "org.ow2.asm", artifact = "asm", version = "9.6" },
] }

[[projects.executions]]
goal = "deploy"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-deploy-plugin", version = "3.1.1" }
"#;

    fn host() -> StaticBuildHost {
        StaticBuildHost::new(toml::from_str(DESCRIPTION).unwrap())
    }

    #[test]
    fn test_plan_orders_and_limits_by_phase() {
        let host = host();
        let loader = RecordingLoader::default();
        let plan = host.calculate_plan(&host.projects()[1], true, &loader).unwrap();

        let goals: Vec<&str> = plan.executions.iter().map(|e| e.goal.as_str()).collect();
        assert_eq!(goals, vec!["compile", "jar"]);
        assert_eq!(plan.executions[0].lifecycle_phase, "compile");
        assert_eq!(plan.executions[0].execution_id, "default-compile");
        assert_eq!(plan.executions[0].plugin.dependencies.len(), 1);
        assert_eq!(
            plan.executions[0].plugin.dependencies[0].source.as_deref(),
            Some("/work/app/pom.xml")
        );
    }

    #[test]
    fn test_reactor_parent_is_not_loaded() {
        let host = host();
        let loader = RecordingLoader::default();
        host.calculate_plan(&host.projects()[1], false, &loader).unwrap();

        let calls = loader.calls.borrow();
        assert!(!calls.iter().any(|c| c.starts_with("parent")));
        assert!(calls.contains(&"model junit-bom".to_string()));
        assert!(calls.contains(&"mojo maven-deploy-plugin:deploy".to_string()));
    }

    #[test]
    fn test_dry_plan_has_no_plugin_dependencies() {
        let host = host();
        let plan =
            host.calculate_plan(&host.projects()[1], false, &RecordingLoader::default()).unwrap();
        assert!(plan.executions.iter().all(|e| e.plugin.dependencies.is_empty()));
    }

    #[test]
    fn test_non_phase_goals_plan_everything() {
        let mut description: BuildDescription = toml::from_str(DESCRIPTION).unwrap();
        description.goals = vec!["dependency:tree".to_string()];
        let host = StaticBuildHost::new(description);
        let plan =
            host.calculate_plan(&host.projects()[1], true, &RecordingLoader::default()).unwrap();
        let goals: Vec<&str> = plan.executions.iter().map(|e| e.goal.as_str()).collect();
        assert_eq!(goals, vec!["jar", "compile", "deploy"]);
    }

    #[test]
    fn test_execution_without_goal_fails() {
        let mut description: BuildDescription = toml::from_str(DESCRIPTION).unwrap();
        description.projects[1].executions[0].goal.clear();
        let host = StaticBuildHost::new(description);
        let result = host.calculate_plan(&host.projects()[1], true, &RecordingLoader::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_plugin_manager() {
        use crate::repository::LocalRepository;

        let root = tempfile::tempdir().unwrap();
        let description: BuildDescription = toml::from_str(
            r#"
[[plugins]]
group = "org.apache.maven.plugins"
artifact = "maven-surefire-plugin"
mojos = [{ goal = "test", phase = "test", requires = "test" }]
"#,
        )
        .unwrap();
        let host = StaticBuildHost::new(description);
        let repository = LocalRepository::new(vec![root.path().to_path_buf()]);
        let manager = host.plugin_manager(&repository);

        let plugin: Plugin = toml::from_str(
            r#"
group = "org.apache.maven.plugins"
artifact = "maven-surefire-plugin"
version = "3.2.5"
"#,
        )
        .unwrap();

        assert!(matches!(
            manager.mojo_descriptor(&plugin, "test"),
            Err(GleanerError::ArtifactNotFound { .. })
        ));

        let jar = root.path().join(LocalRepository::relative_path(&plugin.coordinate()));
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        std::fs::write(&jar, b"").unwrap();

        let descriptor = manager.mojo_descriptor(&plugin, "test").unwrap();
        assert_eq!(descriptor.phase, "test");
        assert_eq!(descriptor.dependency_resolution_required.as_deref(), Some("test"));
        assert!(!descriptor.stub);

        assert!(matches!(
            manager.mojo_descriptor(&plugin, "integration-test"),
            Err(GleanerError::MojoNotFound { .. })
        ));
    }
}
