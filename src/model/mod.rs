//! Build model types shared by the engine and its collaborators.
//!
//! - [`coordinate`] - artifact coordinates, artifact type handlers, version constraints
//! - [`project`] - projects and the parent/dependency/plugin declarations they carry
//! - [`scope`] - dependency scopes and plugin dependency-resolution requirements
//!
//! These are plain data types. The build description loaded by
//! [`crate::host::StaticBuildHost`] deserializes straight into them, which is
//! why most of them derive [`serde::Deserialize`].

pub mod coordinate;
pub mod project;
pub mod scope;

pub use coordinate::{ArtifactType, Coordinate, VersionConstraint};
pub use project::{
    Dependency, Execution, InputLocation, InputLocationTracker, Parent, Plugin, Project,
};
pub use scope::{ResolutionScope, Scope, expand_required_scope};
