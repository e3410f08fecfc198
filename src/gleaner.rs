//! The resolution driver.
//!
//! [`Gleaner`] harvests build dependencies in three passes over the build,
//! each followed by a resolution sweep:
//!
//! 1. **Model**: every parent that is not part of the build is registered.
//! 2. **Plan**: a dry execution plan is computed for every project. The host
//!    loads models and plugin descriptors through the [`LoadingShim`], which
//!    registers everything it is asked for.
//! 3. **Exec**: full plans are computed. Each planned plugin is registered,
//!    together with the plugin dependencies and project dependencies whose
//!    scope is needed by the planned goals.
//!
//! A sweep resolves every record that has not been resolved yet and rebuilds
//! the set of build requirements. Records with a recorded declaration site are
//! *strong*; the rest were only discovered through the shim and are *weak*.
//! An unresolved strong dependency stops the run with only the strong
//! dependencies reported; unresolved weak dependencies are reported alongside
//! them. Either way the later passes are skipped, since they would only
//! compute plans against stubs.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::collector::{Collector, Dep, ResolutionStatus, SYSTEM_VERSION};
use crate::compat::CompatVersionResolver;
use crate::config::Properties;
use crate::core::GleanerError;
use crate::filter::DependencyFilter;
use crate::host::{BuildHost, PluginManager};
use crate::model::{
    Coordinate, Dependency, InputLocationTracker, Parent, Plugin, Scope, expand_required_scope,
};
use crate::output;
use crate::reactor::ModuleIndex;
use crate::repository::{ArtifactResolver, resolve_artifact};
use crate::shim::LoadingShim;

/// Settings of one run, compiled from [`Properties`].
#[derive(Debug, Clone, Default)]
pub struct GleanerConfig {
    /// Dependencies left out of the output
    pub filter: DependencyFilter,
    /// Compat version rules
    pub compat: CompatVersionResolver,
    /// Capability namespace
    pub namespace: Option<String>,
    /// File receiving the capability lines
    pub output_file: Option<PathBuf>,
}

impl GleanerConfig {
    /// Compile the run settings.
    ///
    /// # Errors
    ///
    /// Fails on an invalid filter pattern or compat rule.
    pub fn from_properties(properties: &Properties) -> Result<Self, GleanerError> {
        Ok(Self {
            filter: DependencyFilter::from_properties(properties)?,
            compat: CompatVersionResolver::from_properties(properties)?,
            namespace: properties.namespace().map(str::to_string),
            output_file: properties.output_file(),
        })
    }
}

/// The pass a run stopped after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Parent models
    Model,
    /// Dry execution plans
    Plan,
    /// Full execution plans
    Exec,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Model => "model",
            Self::Plan => "plan",
            Self::Exec => "exec",
        };
        f.write_str(name)
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GleanReport {
    /// Last pass that ran
    pub stage: Stage,
    /// `true` when every registered dependency resolved
    pub complete: bool,
    /// Emitted capability strings
    pub build_requires: BTreeSet<String>,
    /// Canonical ids of unresolved dependencies
    pub missing: Vec<String>,
    /// Number of strong dependencies
    pub strong: usize,
    /// Number of weak dependencies
    pub weak: usize,
}

/// The three-pass build dependency harvester.
///
/// # Examples
///
/// ```no_run
/// use gleaner::config::Properties;
/// use gleaner::gleaner::{Gleaner, GleanerConfig};
/// use gleaner::host::StaticBuildHost;
/// use gleaner::repository::LocalRepository;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let host = StaticBuildHost::load(Path::new("build.toml"))?;
/// let repository = LocalRepository::new(vec!["/usr/share/maven-repo".into()]);
/// let plugins = host.plugin_manager(&repository);
/// let config = GleanerConfig::from_properties(&Properties::new())?;
///
/// let report = Gleaner::new(config).execute(&host, &repository, &plugins)?;
/// for capability in &report.build_requires {
///     println!("BuildRequires: {capability}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gleaner {
    config: GleanerConfig,
}

impl Gleaner {
    /// Driver with the given settings.
    pub fn new(config: GleanerConfig) -> Self {
        Self {
            config,
        }
    }

    /// Run all passes over `host`'s build.
    ///
    /// The build requirements are emitted (logged, and written to the output
    /// file when one is configured) whenever the run stops at a sweep, whether
    /// or not dependencies are missing.
    ///
    /// # Errors
    ///
    /// [`GleanerError::PlanComputation`] if the host fails to compute a plan.
    /// Nothing is emitted in that case.
    pub fn execute(
        &self,
        host: &dyn BuildHost,
        repository: &dyn ArtifactResolver,
        plugin_manager: &dyn PluginManager,
    ) -> Result<GleanReport, GleanerError> {
        let mut run = Run {
            config: &self.config,
            collector: Collector::new(),
            reactor: ModuleIndex::new(host.projects()),
            repository,
            build_requires: BTreeSet::new(),
        };
        let stage = run.execute(host, plugin_manager)?;
        Ok(run.report(stage))
    }
}

/// State of one run. The collector lives exactly as long as the run.
struct Run<'a> {
    config: &'a GleanerConfig,
    collector: Collector,
    reactor: ModuleIndex<'a>,
    repository: &'a dyn ArtifactResolver,
    build_requires: BTreeSet<String>,
}

impl<'a> Run<'a> {
    fn execute(
        &mut self,
        host: &'a dyn BuildHost,
        plugin_manager: &dyn PluginManager,
    ) -> Result<Stage, GleanerError> {
        for project in host.projects() {
            if let Some(parent) = &project.parent {
                self.process_parent(parent);
            }
        }
        if !self.sweep() {
            error!("Missing model dependencies");
            self.output();
            return Ok(Stage::Model);
        }

        for project in host.projects() {
            let shim = LoadingShim::new(&self.collector, self.repository, plugin_manager);
            host.calculate_plan(project, false, &shim).map_err(|e| GleanerError::PlanComputation {
                project: project.artifact_id.clone(),
                reason: format!("{e:#}"),
            })?;
        }
        if !self.sweep() {
            error!("Missing plan dependencies");
            self.output();
            return Ok(Stage::Plan);
        }

        for project in host.projects() {
            if let Some(parent) = &project.parent {
                self.process_parent(parent);
            }
            let shim = LoadingShim::new(&self.collector, self.repository, plugin_manager);
            let plan = host.calculate_plan(project, true, &shim).map_err(|e| {
                GleanerError::PlanComputation {
                    project: project.artifact_id.clone(),
                    reason: format!("{e:#}"),
                }
            })?;
            info!("Build plan for project {}", project.artifact_id);

            let mut phase = "";
            let mut scopes = BTreeSet::new();
            for execution in &plan.executions {
                if phase != execution.lifecycle_phase {
                    phase = execution.lifecycle_phase.as_str();
                    info!("  Phase {}", phase);
                }
                self.process_plugin(&execution.plugin);
                let requirement = execution.descriptor.dependency_resolution_required.as_deref();
                let execution_scopes = expand_required_scope(requirement);
                info!(
                    "    Execution: plugin {} goal {} id {} scope {}{}",
                    execution.plugin.artifact_id,
                    execution.goal,
                    execution.execution_id,
                    requirement.unwrap_or("none"),
                    format_scopes(&execution_scopes)
                );
                for dependency in &execution.plugin.dependencies {
                    if execution_scopes.contains(&dependency.effective_scope()) {
                        self.process_dependency(dependency);
                    } else {
                        debug!("Plugin dependency scope {} excluded", dependency.effective_scope());
                    }
                }
                scopes.extend(execution_scopes);
            }
            info!("  Required dependency scopes: {}", format_scopes(&scopes));

            for dependency in &project.dependencies {
                if scopes.contains(&dependency.effective_scope()) {
                    self.process_dependency(dependency);
                } else {
                    debug!("Dependency scope {} excluded", dependency.effective_scope());
                }
            }
        }
        self.collector.summarize();

        if !self.sweep() {
            error!("Missing exec dependencies");
            self.output();
            return Ok(Stage::Exec);
        }
        info!("BUILD DEPS READY");
        self.output();
        Ok(Stage::Exec)
    }

    /// Register a declaration unless it refers to a project of the build.
    fn register(&self, coords: &Coordinate, declaration: &impl InputLocationTracker) {
        if let Some(project) = self.reactor.find(coords) {
            debug!("    --> reactor: {}", project.artifact_id);
            return;
        }
        self.collector.lookup(coords).found_at(declaration);
    }

    fn process_parent(&self, parent: &Parent) {
        self.register(&parent.coordinate(), parent);
    }

    fn process_dependency(&self, dependency: &Dependency) {
        self.register(&dependency.coordinate(), dependency);
    }

    fn process_plugin(&self, plugin: &Plugin) {
        self.register(&plugin.coordinate(), plugin);
    }

    /// Resolve outstanding records and rebuild the build requirements.
    ///
    /// Returns `true` when every record is resolved.
    fn sweep(&mut self) -> bool {
        self.build_requires.clear();
        let deps = self.collector.deps();

        let mut unresolved: Vec<&Arc<Dep>> = Vec::new();
        for dep in &deps {
            match dep.status() {
                ResolutionStatus::Unknown => {
                    let coords = dep.coordinate();
                    debug!("Resolving dep {}", coords);
                    match resolve_artifact(self.repository, &coords) {
                        Ok(path) => {
                            dep.settle(true);
                            debug!("Dependency {} found at {}", coords, path.display());
                        }
                        Err(e) => {
                            dep.settle(false);
                            debug!("Dependency {} ABSENT: {}", coords, e);
                            unresolved.push(dep);
                        }
                    }
                }
                ResolutionStatus::Unresolved => unresolved.push(dep),
                ResolutionStatus::Resolved => {}
            }
        }

        let mut unresolved_strong = false;
        for dep in deps.iter().filter(|dep| dep.is_strong()) {
            if dep.status() == ResolutionStatus::Resolved {
                info!("Strong dependency: {}", dep.id);
            } else {
                unresolved_strong = true;
                error!("Unresolved strong dependency: {}", dep.id);
            }
            for location in dep.found_locations() {
                info!("  declared at {}", location);
            }
            self.add_dep(dep);
        }

        if unresolved.is_empty() {
            return true;
        }
        if unresolved_strong {
            return false;
        }
        for dep in unresolved {
            error!("Unresolved weak dependency: {}", dep.id);
            self.add_dep(dep);
        }
        false
    }

    fn add_dep(&mut self, dep: &Dep) {
        if self.config.filter.is_dependency_filtered(dep) {
            warn!("Dependency {} is filtered", dep.id);
            return;
        }
        let version = self.config.compat.resolve_version_for(dep);
        if version != SYSTEM_VERSION {
            info!("Using compat version {} for {}", version, dep.id);
        }
        dep.set_resolved_version(version.to_string());
        self.build_requires.insert(dep.capability(self.config.namespace.as_deref()));
    }

    fn output(&self) {
        output::emit(&self.build_requires, self.config.output_file.as_deref());
    }

    fn report(self, stage: Stage) -> GleanReport {
        let deps = self.collector.deps();
        let missing: Vec<String> = deps
            .iter()
            .filter(|dep| dep.status() != ResolutionStatus::Resolved)
            .map(|dep| dep.id.clone())
            .collect();
        let strong = deps.iter().filter(|dep| dep.is_strong()).count();
        GleanReport {
            stage,
            complete: missing.is_empty(),
            build_requires: self.build_requires,
            missing,
            strong,
            weak: deps.len() - strong,
        }
    }
}

/// `[compile, provided, system]`
fn format_scopes(scopes: &BTreeSet<Scope>) -> String {
    let names: Vec<&str> = scopes.iter().map(|scope| scope.as_str()).collect();
    format!("[{}]", names.join(", "))
}
