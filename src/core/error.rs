//! Error handling for gleaner
//!
//! Two layers, the same split the rest of the crate relies on:
//! 1. [`GleanerError`] - strongly-typed failures raised by the engine and its collaborators
//! 2. [`ErrorContext`] - a wrapper adding details and suggestions for CLI display
//!
//! # Error Categories
//!
//! - **Configuration**: [`GleanerError::InvalidProperty`], [`GleanerError::InvalidPattern`],
//!   [`GleanerError::ConfigNotFound`], [`GleanerError::ConfigParseError`]
//! - **Resolution**: [`GleanerError::VersionRangeUnsupported`], [`GleanerError::ArtifactNotFound`],
//!   [`GleanerError::MojoNotFound`]
//! - **Host build**: [`GleanerError::PlanComputation`]
//!
//! Resolution errors are per-record and never abort a run by themselves; the
//! driver records them as unresolved dependencies. Configuration and host
//! errors are fatal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gleaner::core::{GleanerError, user_friendly_error};
//!
//! let error = GleanerError::InvalidProperty {
//!     key: "gleaner.version.1".to_string(),
//!     value: "junit:junit".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for gleaner operations
#[derive(Error, Debug)]
pub enum GleanerError {
    /// A version override entry is not of the form `pattern=version`
    #[error("Invalid property value of {key}: {value}")]
    InvalidProperty {
        /// Property key
        key: String,
        /// Offending value
        value: String,
    },

    /// A filter or version override pattern is not a valid regular expression
    #[error("Invalid pattern in {key}: {pattern}")]
    InvalidPattern {
        /// Property key
        key: String,
        /// Offending pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A configuration or build description file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was looked up
        path: String,
    },

    /// A configuration or build description file could not be parsed
    #[error("Invalid configuration syntax in {file}")]
    ConfigParseError {
        /// File that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// The coordinate carries a version range, which is never resolved
    #[error("Version ranges are not supported: {coordinate}")]
    VersionRangeUnsupported {
        /// Display form of the coordinate
        coordinate: String,
    },

    /// The repository has no artifact for the coordinate
    #[error("Artifact not found: {coordinate}")]
    ArtifactNotFound {
        /// Display form of the coordinate
        coordinate: String,
    },

    /// The plugin does not declare the requested goal
    #[error("Mojo '{goal}' not found in plugin {plugin}")]
    MojoNotFound {
        /// `group:artifact:version` of the plugin
        plugin: String,
        /// Requested goal
        goal: String,
    },

    /// The host build engine failed to compute an execution plan
    #[error("Failed to calculate execution plan for project {project}: {reason}")]
    PlanComputation {
        /// Artifact id of the project
        project: String,
        /// Host failure message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for GleanerError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidProperty {
                key,
                value,
            } => Self::InvalidProperty {
                key: key.clone(),
                value: value.clone(),
            },
            Self::InvalidPattern {
                key,
                pattern,
                source,
            } => Self::InvalidPattern {
                key: key.clone(),
                pattern: pattern.clone(),
                source: source.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::VersionRangeUnsupported {
                coordinate,
            } => Self::VersionRangeUnsupported {
                coordinate: coordinate.clone(),
            },
            Self::ArtifactNotFound {
                coordinate,
            } => Self::ArtifactNotFound {
                coordinate: coordinate.clone(),
            },
            Self::MojoNotFound {
                plugin,
                goal,
            } => Self::MojoNotFound {
                plugin: plugin.clone(),
                goal: goal.clone(),
            },
            Self::PlanComputation {
                project,
                reason,
            } => Self::PlanComputation {
                project: project.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone, keep its message
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::TomlError(e.clone()),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GleanerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: GleanerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// [`GleanerError`] values anywhere in the chain get tailored suggestions;
/// IO and TOML errors get generic guidance; everything else is shown with
/// its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gleaner_error) = error.chain().find_map(|e| e.downcast_ref::<GleanerError>()) {
        return create_error_context(gleaner_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(GleanerError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct");
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(GleanerError::TomlError(toml_error.clone()))
            .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GleanerError::Other {
        message,
    })
}

fn create_error_context(error: GleanerError) -> ErrorContext {
    match &error {
        GleanerError::InvalidProperty {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Version overrides must have the form -Dgleaner.version.<n>=<pattern>=<version>")
            .with_details("The value is split on '=' and must yield exactly a pattern and a version"),
        GleanerError::InvalidPattern {
            source,
            ..
        } => {
            let details = source.to_string();
            ErrorContext::new(error)
                .with_suggestion("Patterns are regular expressions matched against 'groupId:artifactId'; escape literal dots as '\\.'")
                .with_details(details)
        }
        GleanerError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the path passed to --config or --build"),
        GleanerError::ConfigParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax and field names of the file")
                .with_details(details)
        }
        GleanerError::PlanComputation {
            ..
        } => ErrorContext::new(error)
            .with_details("The host build failed while computing the execution plan; no build dependencies were emitted"),
        _ => ErrorContext::new(error),
    }
}
