//! The host build engine, seen from gleaner.
//!
//! gleaner does not compute build plans itself. It asks a [`BuildHost`] for
//! each project's execution plan, and the host loads whatever models and
//! plugin descriptors it needs through a [`ModelLoader`] that gleaner
//! supplies. Every load the host performs is how implicit dependencies are
//! discovered.
//!
//! ```text
//! Gleaner ──calculate_plan──▶ BuildHost
//!    ▲                           │ resolve_parent_model / resolve_dependency_model / mojo_descriptor
//!    │                           ▼
//!    └──── Collector ◀──── LoadingShim (ModelLoader)
//! ```
//!
//! [`StaticBuildHost`] is a host driven by a TOML build description.

mod static_host;

pub use static_host::{BuildDescription, CatalogPluginManager, MojoSpec, PluginSpec, StaticBuildHost};

use crate::core::GleanerError;
use crate::model::{Dependency, Parent, Plugin, Project};
use crate::shim::ModelSource;

/// Metadata of one plugin goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MojoDescriptor {
    /// Goal name
    pub goal: String,
    /// Default lifecycle phase the goal binds to
    pub phase: String,
    /// Dependency resolution the goal requires (`compile`, `test`, ...)
    pub dependency_resolution_required: Option<String>,
    /// `true` for a placeholder synthesised because the plugin could not be loaded
    pub stub: bool,
}

impl MojoDescriptor {
    /// Placeholder for a goal of a plugin that could not be loaded.
    ///
    /// Binds to `validate` and requires no dependency resolution.
    pub fn stub(goal: &str) -> Self {
        Self {
            goal: goal.to_string(),
            phase: "validate".to_string(),
            dependency_resolution_required: None,
            stub: true,
        }
    }
}

/// One planned goal execution.
#[derive(Debug, Clone)]
pub struct MojoExecution {
    /// Plugin declaration; carries plugin-level dependencies only in full (setup) plans
    pub plugin: Plugin,
    /// Goal
    pub goal: String,
    /// Execution id
    pub execution_id: String,
    /// Phase the execution runs in
    pub lifecycle_phase: String,
    /// Descriptor of the goal
    pub descriptor: MojoDescriptor,
}

/// Ordered goal executions of one project.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    /// Executions in run order
    pub executions: Vec<MojoExecution>,
}

/// Loads models and plugin descriptors on behalf of the host.
///
/// These are the only loading operations a host may delegate. None of them
/// fail: an artifact that cannot be found yields a placeholder so the host
/// can finish computing its plan.
pub trait ModelLoader {
    /// Load a parent model.
    fn resolve_parent_model(&self, parent: &Parent) -> ModelSource;

    /// Load the model of a dependency (imported bom, plugin dependency, ...).
    fn resolve_dependency_model(&self, dependency: &Dependency) -> ModelSource;

    /// Load the descriptor of a plugin goal.
    fn mojo_descriptor(&self, plugin: &Plugin, goal: &str) -> MojoDescriptor;
}

/// The host's own plugin loading, which the loading shim wraps.
pub trait PluginManager {
    /// Load the descriptor of `goal` from `plugin`.
    ///
    /// # Errors
    ///
    /// Fails when the plugin artifact cannot be resolved or has no such goal.
    fn mojo_descriptor(&self, plugin: &Plugin, goal: &str) -> Result<MojoDescriptor, GleanerError>;
}

/// A multi-module build that can compute execution plans.
pub trait BuildHost {
    /// All projects of the build, in build order.
    fn projects(&self) -> &[Project];

    /// Compute the execution plan of `project` without executing anything.
    ///
    /// With `setup` the plan is fully configured, including plugin-level
    /// dependencies. Every model or descriptor the host needs is loaded
    /// through `loader`.
    ///
    /// # Errors
    ///
    /// Any failure is fatal to the run.
    fn calculate_plan(
        &self,
        project: &Project,
        setup: bool,
        loader: &dyn ModelLoader,
    ) -> anyhow::Result<ExecutionPlan>;
}
