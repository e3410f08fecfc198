//! Dependency scopes and plugin dependency-resolution requirements.
//!
//! A plugin goal declares which dependency scopes it needs resolved before it
//! runs (`requiresDependencyResolution`). [`expand_required_scope`] turns that
//! requirement into the concrete set of declared scopes a build needs present.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

/// Scope of a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// `compile`, also the scope of a dependency declared without one
    Compile,
    /// `provided`
    Provided,
    /// `runtime`
    Runtime,
    /// `test`
    Test,
    /// `system`
    System,
    /// `import`, only meaningful in dependency management
    Import,
}

impl Scope {
    /// Scope name as written in build files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency resolution a plugin goal requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionScope {
    /// `compile`
    Compile,
    /// `runtime`
    Runtime,
    /// `compile+runtime`
    CompileRuntime,
    /// `runtime+system`
    RuntimeSystem,
    /// `test`
    Test,
}

impl ResolutionScope {
    /// Parse a requirement string. Unrecognised values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "compile" => Some(Self::Compile),
            "runtime" => Some(Self::Runtime),
            "compile+runtime" => Some(Self::CompileRuntime),
            "runtime+system" => Some(Self::RuntimeSystem),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Declared scopes that must be available for this requirement.
    pub fn included_scopes(self) -> BTreeSet<Scope> {
        let scopes: &[Scope] = match self {
            Self::Compile => &[Scope::System, Scope::Provided, Scope::Compile],
            Self::Runtime => &[Scope::Compile, Scope::Runtime],
            Self::CompileRuntime => {
                &[Scope::System, Scope::Provided, Scope::Compile, Scope::Runtime]
            }
            Self::RuntimeSystem => &[Scope::System, Scope::Compile, Scope::Runtime],
            Self::Test => {
                &[Scope::System, Scope::Provided, Scope::Compile, Scope::Runtime, Scope::Test]
            }
        };
        scopes.iter().copied().collect()
    }
}

/// Expand a goal's dependency-resolution requirement into included scopes.
///
/// No requirement, or one that is not recognised, includes nothing.
///
/// # Examples
///
/// ```
/// use gleaner::model::{Scope, expand_required_scope};
///
/// let scopes = expand_required_scope(Some("runtime"));
/// assert!(scopes.contains(&Scope::Compile));
/// assert!(scopes.contains(&Scope::Runtime));
/// assert!(!scopes.contains(&Scope::Provided));
/// assert!(expand_required_scope(None).is_empty());
/// ```
pub fn expand_required_scope(requirement: Option<&str>) -> BTreeSet<Scope> {
    requirement
        .and_then(ResolutionScope::parse)
        .map(ResolutionScope::included_scopes)
        .unwrap_or_default()
}
