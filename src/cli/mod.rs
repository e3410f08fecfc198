//! Command-line interface for gleaner.
//!
//! gleaner reads a build description, harvests every artifact the build needs
//! from the given repositories, and prints the requirements as
//! `BuildRequires:` capability lines.
//!
//! # Usage
//!
//! ```bash
//! # Harvest against the default ~/.m2/repository
//! gleaner --build build.toml
//!
//! # System repository, filter out site plugins, write the capabilities to a file
//! gleaner --build build.toml --repo /usr/share/maven-repo \
//!     -D 'gleaner.filter.site=org\.apache\.maven\.plugins:maven-site-plugin' \
//!     --output build-requires.txt
//!
//! # Fail the invocation when something is missing
//! gleaner --build build.toml --fail-on-missing
//! ```
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Run completed (dependencies may be missing unless `--fail-on-missing`) |
//! | 1 | Error: bad configuration, unreadable build description, plan failure |
//! | 2 | Dependencies missing and `--fail-on-missing` given |


use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{OUTPUT_FILE_PROPERTY, Properties};
use crate::gleaner::{Gleaner, GleanerConfig};
use crate::host::{BuildHost, StaticBuildHost};
use crate::repository::LocalRepository;

/// Exit status of a run that completed with missing dependencies under
/// `--fail-on-missing`.
pub const EXIT_MISSING: i32 = 2;

/// Runtime configuration derived from the command line.
///
/// Holds what the process sets up before the run itself, so tests can check
/// flag handling without touching global state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is not set.
    ///
    /// `"debug"` with `--verbose`, `"warn"` with `--quiet`, `"info"` otherwise.
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over [`log_level`](Self::log_level). Calling this more
    /// than once has no effect.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for gleaner.
#[derive(Parser, Debug)]
#[command(
    name = "gleaner",
    about = "Harvest the build dependencies of a Maven build",
    version,
    author,
    long_about = "gleaner computes the execution plans of a Maven build without running it, \
                  records every artifact the build would load, and reports them as \
                  BuildRequires capabilities."
)]
pub struct Cli {
    /// Build description (TOML) listing the build's projects and plugin catalog.
    #[arg(short, long, value_name = "FILE")]
    build: PathBuf,

    /// Maven-layout repository root to resolve artifacts from.
    ///
    /// May be repeated; roots are searched in order. Defaults to
    /// `~/.m2/repository`.
    #[arg(short = 'r', long = "repo", value_name = "DIR")]
    repositories: Vec<PathBuf>,

    /// Properties file with a `[properties]` table.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set a property, overriding the properties file.
    ///
    /// ```bash
    /// gleaner --build build.toml -D gleaner.version.junit=junit:junit=4
    /// ```
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Write the capabilities to this file, one per line.
    ///
    /// Shorthand for `-D gleaner.outputFile=<FILE>`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exit with status 2 when any dependency could not be resolved.
    #[arg(long)]
    fail_on_missing: bool,

    /// Enable verbose output (debug logging).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl Cli {
    /// Build a [`CliConfig`] from the parsed CLI arguments.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use gleaner::cli::Cli;
    /// use clap::Parser;
    ///
    /// let cli = Cli::parse_from(["gleaner", "--build", "build.toml", "--verbose"]);
    /// assert_eq!(cli.build_config().log_level, Some("debug".to_string()));
    /// ```
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };
        CliConfig {
            log_level: Some(log_level.to_string()),
        }
    }

    /// Properties from the file, then defines, then `--output`.
    fn properties(&self) -> Result<Properties> {
        let mut properties = match &self.config {
            Some(path) => Properties::load(path)
                .with_context(|| format!("Failed to load properties from {}", path.display()))?,
            None => Properties::new(),
        };
        properties.merge(Properties::from_defines(&self.defines));
        if let Some(output) = &self.output {
            properties.set(OUTPUT_FILE_PROPERTY, output.to_string_lossy());
        }
        Ok(properties)
    }

    fn repository(&self) -> Result<LocalRepository> {
        if !self.repositories.is_empty() {
            return Ok(LocalRepository::new(self.repositories.clone()));
        }
        let root = LocalRepository::default_root()
            .context("No --repo given and the home directory is unknown")?;
        debug!("Using default repository {}", root.display());
        Ok(LocalRepository::new(vec![root]))
    }

    /// Run gleaner and return the process exit status.
    ///
    /// # Errors
    ///
    /// Configuration, build description and plan computation failures.
    pub fn execute(self) -> Result<i32> {
        let properties = self.properties()?;
        let config = GleanerConfig::from_properties(&properties)
            .context("Invalid gleaner configuration")?;
        let host = StaticBuildHost::load(&self.build).with_context(|| {
            format!("Failed to load build description {}", self.build.display())
        })?;
        let repository = self.repository()?;
        let plugins = host.plugin_manager(&repository);

        info!(
            "Harvesting {} projects for goals {:?}",
            host.projects().len(),
            host.goals()
        );
        let report = Gleaner::new(config).execute(&host, &repository, &plugins)?;
        debug!(
            "Stopped after {} pass: {} strong, {} weak, {} missing",
            report.stage,
            report.strong,
            report.weak,
            report.missing.len()
        );

        if !report.complete && self.fail_on_missing {
            warn!("{} dependencies could not be resolved", report.missing.len());
            return Ok(EXIT_MISSING);
        }
        Ok(0)
    }
}
