//! Compat version overrides.
//!
//! Some packages install artifacts under a compat version (`junit:junit:4`)
//! rather than the system one. Rules map a `groupId:artifactId` pattern to the
//! version to require; the first rule in key order that fully matches wins,
//! and dependencies matching no rule get [`SYSTEM_VERSION`].

use regex::Regex;
use tracing::debug;

use crate::collector::{Dep, SYSTEM_VERSION};
use crate::config::{Properties, VERSION_PREFIX};
use crate::core::GleanerError;
use crate::filter::full_match_regex;

/// Ordered `(pattern, version)` rules.
#[derive(Debug, Clone, Default)]
pub struct CompatVersionResolver {
    rules: Vec<(Regex, String)>,
}

impl CompatVersionResolver {
    /// Compile every `gleaner.version.*` property, in key order.
    ///
    /// # Errors
    ///
    /// - [`GleanerError::InvalidProperty`] unless the value splits on `=` into exactly two parts
    /// - [`GleanerError::InvalidPattern`] if the pattern part is not a valid regex
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::compat::CompatVersionResolver;
    /// use gleaner::config::Properties;
    ///
    /// let props = Properties::from_defines(["gleaner.version.1=junit:junit=4=5"]);
    /// assert!(CompatVersionResolver::from_properties(&props).is_err());
    /// ```
    pub fn from_properties(properties: &Properties) -> Result<Self, GleanerError> {
        let mut rules = Vec::new();
        for (key, value) in properties.with_prefix(VERSION_PREFIX) {
            let parts: Vec<&str> = value.splitn(3, '=').collect();
            let [pattern, version] = parts.as_slice() else {
                return Err(GleanerError::InvalidProperty {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            };
            debug!("Compat version rule {}: {} -> {}", key, pattern, version);
            rules.push((full_match_regex(key, pattern)?, (*version).to_string()));
        }
        Ok(Self {
            rules,
        })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Version for a `groupId:artifactId` key.
    pub fn resolve_version_for_key(&self, key: &str) -> &str {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(key))
            .map_or(SYSTEM_VERSION, |(_, version)| version.as_str())
    }

    /// Version to require for a dependency.
    pub fn resolve_version_for(&self, dep: &Dep) -> &str {
        self.resolve_version_for_key(&dep.key())
    }
}
