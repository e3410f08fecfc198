//! Artifact coordinates.
//!
//! A [`Coordinate`] is the (group, artifact, extension, classifier, version)
//! tuple identifying one artifact. Its canonical id deliberately leaves the
//! classifier out, so lookups that differ only by classifier collapse onto one
//! dependency record.

use std::fmt;

/// The version requested by a declaration, kept verbatim.
///
/// Maven version ranges (`[1.0,2.0)`, `(,1.5]`, `[3.0]`) are recognised but
/// never resolved: the driver treats them as unresolvable without asking the
/// repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint(String);

impl VersionConstraint {
    /// Wrap a version request string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The version request as declared.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the request is a version range rather than a single version.
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::model::VersionConstraint;
    ///
    /// assert!(VersionConstraint::new("[1.0,2.0)").is_range());
    /// assert!(VersionConstraint::new("(,1.5]").is_range());
    /// assert!(!VersionConstraint::new("1.0").is_range());
    /// assert!(!VersionConstraint::new("SYSTEM").is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        let version = self.0.trim();
        version.starts_with(['[', '(']) && version.ends_with([']', ')'])
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a declared dependency type maps onto a file extension and classifier.
///
/// Mirrors Maven's default artifact handlers. Unknown types use the type name
/// as the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactType {
    /// File extension of the artifact
    pub extension: &'static str,
    /// Classifier implied by the type, empty if none
    pub classifier: &'static str,
}

impl ArtifactType {
    /// Look up the handler for a declared type.
    ///
    /// Returns `None` for types without a built-in handler.
    pub fn for_type(type_name: &str) -> Option<Self> {
        let (extension, classifier) = match type_name {
            "jar" | "maven-plugin" | "ejb" => ("jar", ""),
            "pom" => ("pom", ""),
            "test-jar" => ("jar", "tests"),
            "ejb-client" => ("jar", "client"),
            "java-source" => ("jar", "sources"),
            "javadoc" => ("jar", "javadoc"),
            "war" => ("war", ""),
            "ear" => ("ear", ""),
            "rar" => ("rar", ""),
            _ => return None,
        };
        Some(Self {
            extension,
            classifier,
        })
    }
}

/// Coordinates of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// File extension (`jar`, `pom`, ...)
    pub extension: String,
    /// Classifier, empty when absent
    pub classifier: String,
    /// Requested version or version range
    pub version: VersionConstraint,
}

impl Coordinate {
    /// Coordinates with an explicit extension and no classifier.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            extension: extension.into(),
            classifier: String::new(),
            version: VersionConstraint::new(version),
        }
    }

    /// Coordinates derived from a declared type, the way dependency declarations are mapped.
    ///
    /// A non-empty declared classifier wins over the classifier implied by the type.
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::model::Coordinate;
    ///
    /// let coords = Coordinate::for_type("org.example", "lib", "1.0", None, "test-jar");
    /// assert_eq!(coords.extension, "jar");
    /// assert_eq!(coords.classifier, "tests");
    /// ```
    pub fn for_type(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<&str>,
        type_name: &str,
    ) -> Self {
        let (extension, implied) = match ArtifactType::for_type(type_name) {
            Some(handler) => (handler.extension.to_string(), handler.classifier),
            None => (type_name.to_string(), ""),
        };
        let classifier = match classifier {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => implied.to_string(),
        };
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            extension,
            classifier,
            version: VersionConstraint::new(version),
        }
    }

    /// Canonical identity key: `group:artifact:extension:version`.
    ///
    /// The classifier is not part of the key.
    pub fn canonical_id(&self) -> String {
        format!("{}:{}:{}:{}", self.group_id, self.artifact_id, self.extension, self.version)
    }

    /// `group:artifact`, the string filter and version override patterns match against.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}
