//! Projects and the declarations gleaner harvests from them.
//!
//! Every declaration type can report where it was declared through
//! [`InputLocationTracker`]. Declarations that carry a location become *strong*
//! dependencies when registered by the driver.

use serde::Deserialize;

use super::coordinate::Coordinate;
use super::scope::Scope;

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLocation {
    /// Line number within the declaring file
    pub line: u32,
    /// Declaring file, possibly as a `file://` URL
    pub source: Option<String>,
}

impl InputLocation {
    /// Human-readable provenance, `<file> line <n>`.
    ///
    /// A leading `file://` is stripped; an unknown file renders as `UNKNOWN`.
    pub fn render(&self) -> String {
        let source = self.source.as_deref().unwrap_or("UNKNOWN");
        let source = source.strip_prefix("file://").unwrap_or(source);
        format!("{source} line {}", self.line)
    }

    /// Provenance string for an optional location; `UNKNOWN-location` when absent.
    pub fn render_opt(location: Option<&Self>) -> String {
        location.map_or_else(|| "UNKNOWN-location".to_string(), Self::render)
    }
}

/// Anything that remembers where it was declared.
pub trait InputLocationTracker {
    /// The declaration site, if known.
    fn location(&self) -> Option<InputLocation>;
}

macro_rules! located {
    ($ty:ty) => {
        impl InputLocationTracker for $ty {
            fn location(&self) -> Option<InputLocation> {
                self.line.map(|line| InputLocation {
                    line,
                    source: self.source.clone(),
                })
            }
        }
    };
}

/// A parent declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parent {
    /// Group id
    #[serde(rename = "group")]
    pub group_id: String,
    /// Artifact id
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    /// Version
    pub version: String,
    /// Declaration line
    #[serde(default)]
    pub line: Option<u32>,
    /// Declaring file
    #[serde(default)]
    pub source: Option<String>,
}

impl Parent {
    /// Parents always resolve to the `pom` artifact.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.version, "pom")
    }
}

located!(Parent);

fn default_type() -> String {
    "jar".to_string()
}

/// A dependency declaration, either a project's own or a plugin's.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dependency {
    /// Group id
    #[serde(rename = "group")]
    pub group_id: String,
    /// Artifact id
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    /// Version or version range
    pub version: String,
    /// Declared type, `jar` when omitted
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    /// Declared classifier
    #[serde(default)]
    pub classifier: Option<String>,
    /// Declared scope, `None` when omitted
    #[serde(default)]
    pub scope: Option<Scope>,
    /// Declaration line
    #[serde(default)]
    pub line: Option<u32>,
    /// Declaring file
    #[serde(default)]
    pub source: Option<String>,
}

impl Dependency {
    /// Coordinates derived from the declared type and classifier.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::for_type(
            &self.group_id,
            &self.artifact_id,
            &self.version,
            self.classifier.as_deref(),
            &self.type_name,
        )
    }

    /// Effective scope; an undeclared scope means `compile`.
    pub fn effective_scope(&self) -> Scope {
        self.scope.unwrap_or(Scope::Compile)
    }
}

located!(Dependency);

/// A build plugin declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Plugin {
    /// Group id
    #[serde(rename = "group")]
    pub group_id: String,
    /// Artifact id
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    /// Version
    pub version: String,
    /// Dependencies added to the plugin's classpath
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Declaration line
    #[serde(default)]
    pub line: Option<u32>,
    /// Declaring file
    #[serde(default)]
    pub source: Option<String>,
}

impl Plugin {
    /// Coordinates of the plugin artifact itself (`maven-plugin` type, a jar).
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::for_type(&self.group_id, &self.artifact_id, &self.version, None, "maven-plugin")
    }

    /// `group:artifact:version`
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

located!(Plugin);

/// One plugin goal bound into a project's build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Execution {
    /// Plugin providing the goal
    pub plugin: Plugin,
    /// Goal name
    pub goal: String,
    /// Execution id, `default-<goal>` when omitted
    #[serde(default)]
    pub id: Option<String>,
    /// Lifecycle phase override; the goal's default phase is used otherwise
    #[serde(default)]
    pub phase: Option<String>,
}

impl Execution {
    /// Execution id as the build reports it.
    pub fn execution_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| format!("default-{}", self.goal))
    }
}

fn default_packaging() -> String {
    "jar".to_string()
}

/// A module of the build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Group id
    #[serde(rename = "group")]
    pub group_id: String,
    /// Artifact id
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    /// Version
    pub version: String,
    /// Packaging, `jar` when omitted
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Build file the declarations come from
    #[serde(default)]
    pub file: Option<String>,
    /// Parent declaration
    #[serde(default)]
    pub parent: Option<Parent>,
    /// The project's own dependencies
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Models the build loads internally while computing plans (imported boms, ...)
    #[serde(default)]
    pub imports: Vec<Dependency>,
    /// Plugin executions bound into the build
    #[serde(default)]
    pub executions: Vec<Execution>,
}

impl Project {
    /// Give every declaration without an explicit source this project's build file.
    pub fn attach_sources(&mut self) {
        let Some(file) = self.file.clone() else {
            return;
        };
        let fill = |source: &mut Option<String>| {
            if source.is_none() {
                *source = Some(file.clone());
            }
        };
        if let Some(parent) = &mut self.parent {
            fill(&mut parent.source);
        }
        for dependency in self.dependencies.iter_mut().chain(self.imports.iter_mut()) {
            fill(&mut dependency.source);
        }
        for execution in &mut self.executions {
            fill(&mut execution.plugin.source);
            for dependency in &mut execution.plugin.dependencies {
                fill(&mut dependency.source);
            }
        }
    }
}
