//! Pattern-based exclusion of dependencies from the output.
//!
//! Patterns are regular expressions matched against `groupId:artifactId`.
//! A pattern must match the whole key, so `com\.example:.*` filters
//! `com.example:foo` but not `com.example2:foo`.
//!
//! # Examples
//!
//! ```
//! use gleaner::config::Properties;
//! use gleaner::filter::DependencyFilter;
//!
//! # fn example() -> Result<(), gleaner::core::GleanerError> {
//! let props = Properties::from_defines([r"gleaner.filter.1=com\.example:.*"]);
//! let filter = DependencyFilter::from_properties(&props)?;
//! assert!(filter.is_key_filtered("com.example:foo"));
//! assert!(!filter.is_key_filtered("com.example2:foo"));
//! # Ok(())
//! # }
//! ```

use regex::Regex;
use tracing::debug;

use crate::collector::Dep;
use crate::config::{FILTER_PREFIX, Properties};
use crate::core::GleanerError;

/// Compile `pattern` so that it only matches complete input strings.
pub(crate) fn full_match_regex(key: &str, pattern: &str) -> Result<Regex, GleanerError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| GleanerError::InvalidPattern {
        key: key.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Ordered set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct DependencyFilter {
    patterns: Vec<Regex>,
}

impl DependencyFilter {
    /// Compile every `gleaner.filter.*` property, in key order.
    ///
    /// # Errors
    ///
    /// [`GleanerError::InvalidPattern`] for a value that is not a valid regex.
    pub fn from_properties(properties: &Properties) -> Result<Self, GleanerError> {
        let patterns = properties
            .with_prefix(FILTER_PREFIX)
            .map(|(key, pattern)| {
                debug!("Filter pattern {} = {}", key, pattern);
                full_match_regex(key, pattern)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
        })
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` when no pattern is configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns `true` if any pattern matches the whole `groupId:artifactId` key.
    pub fn is_key_filtered(&self, key: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(key))
    }

    /// Returns `true` if the dependency is excluded from the output.
    pub fn is_dependency_filtered(&self, dep: &Dep) -> bool {
        self.is_key_filtered(&dep.key())
    }
}
