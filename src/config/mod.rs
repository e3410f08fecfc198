//! Run configuration.
//!
//! gleaner is configured through a flat table of string properties, the way a
//! build tool passes `-Dkey=value` system properties. Properties come from an
//! optional TOML file with a `[properties]` table and from command-line
//! defines; defines win.
//!
//! # Keys
//!
//! | Key | Meaning |
//! |---|---|
//! | `gleaner.filter.<suffix>` | regex over `groupId:artifactId`; matches are left out of the output |
//! | `gleaner.version.<suffix>` | `<regex>=<version>`; compat version for matching dependencies |
//! | `gleaner.outputFile` | file receiving the capability lines |
//! | `gleaner.namespace` | namespace prefix for capability strings |
//!
//! Filter and version entries apply in lexicographic order of their keys.
//! When `gleaner.outputFile` is absent, the `GLEANER_OUTPUT_FILE` environment
//! variable is used.
//!
//! # Example file
//!
//! ```toml
//! [properties]
//! "gleaner.filter.01" = "org\\.apache\\.maven\\.plugins:maven-site-plugin"
//! "gleaner.version.01" = "junit:junit=4"
//! "gleaner.outputFile" = "build-requires.txt"
//! ```

pub mod parser;

pub use parser::parse_config;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::GleanerError;

/// Key prefix of dependency filter patterns.
pub const FILTER_PREFIX: &str = "gleaner.filter.";
/// Key prefix of compat version rules.
pub const VERSION_PREFIX: &str = "gleaner.version.";
/// Key of the output file path.
pub const OUTPUT_FILE_PROPERTY: &str = "gleaner.outputFile";
/// Key of the capability namespace.
pub const NAMESPACE_PROPERTY: &str = "gleaner.namespace";
/// Environment variable consulted when [`OUTPUT_FILE_PROPERTY`] is not set.
pub const OUTPUT_FILE_ENV: &str = "GLEANER_OUTPUT_FILE";

#[derive(Debug, Default, Deserialize)]
struct PropertiesFile {
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

/// Sorted property table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the `[properties]` table of a TOML file.
    pub fn load(path: &Path) -> Result<Self, GleanerError> {
        let file: PropertiesFile = parse_config(path)?;
        Ok(Self {
            entries: file.properties,
        })
    }

    /// Build a table from `key=value` defines.
    ///
    /// The value is everything after the first `=`, so it may itself contain
    /// `=`. A define without `=` sets the key to `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::config::Properties;
    ///
    /// let props = Properties::from_defines(["gleaner.version.1=junit:junit=4", "debug"]);
    /// assert_eq!(props.get("gleaner.version.1"), Some("junit:junit=4"));
    /// assert_eq!(props.get("debug"), Some("true"));
    /// ```
    pub fn from_defines<I, S>(defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut props = Self::new();
        for define in defines {
            let define = define.as_ref();
            match define.split_once('=') {
                Some((key, value)) => props.set(key, value),
                None => props.set(define, "true"),
            }
        }
        props
    }

    /// Set one property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Value of a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of this table.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Entries whose key starts with `prefix`, in key order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Output file from the property, falling back to the environment.
    pub fn output_file(&self) -> Option<PathBuf> {
        self.get(OUTPUT_FILE_PROPERTY)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(OUTPUT_FILE_ENV).map(PathBuf::from))
    }

    /// Capability namespace, if a non-blank one is configured.
    pub fn namespace(&self) -> Option<&str> {
        self.get(NAMESPACE_PROPERTY).filter(|ns| !ns.trim().is_empty())
    }
}
