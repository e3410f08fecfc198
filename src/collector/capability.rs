//! RPM capability strings for Maven artifacts.
//!
//! Packaging tools match these strings byte-for-byte against the `mvn(...)`
//! provides generated for installed artifacts, so the separator placement
//! below is fixed:
//!
//! | extension | classifier | version | result |
//! |---|---|---|---|
//! | jar | | SYSTEM | `mvn(g:a)` |
//! | pom | | SYSTEM | `mvn(g:a:pom:)` |
//! | jar | tests | 1.0 | `mvn(g:a::tests:1.0)` |
//! | jar | | 1.0 | `mvn(g:a:1.0)` |

/// Version meaning "whatever is installed on the system".
pub const SYSTEM_VERSION: &str = "SYSTEM";

/// Parts of a capability string.
#[derive(Debug, Clone, Copy)]
pub struct Capability<'a> {
    /// Group id
    pub group_id: &'a str,
    /// Artifact id
    pub artifact_id: &'a str,
    /// Extension, `jar` is the default and is omitted
    pub extension: &'a str,
    /// Classifier, empty is omitted
    pub classifier: &'a str,
    /// Compat version, [`SYSTEM_VERSION`] is omitted
    pub version: &'a str,
    /// Package version appended as ` = <v>`
    pub package_version: Option<&'a str>,
    /// Software collection namespace prefixed as `<ns>-`
    pub namespace: Option<&'a str>,
}

impl<'a> Capability<'a> {
    /// A plain `jar` capability on the system version.
    pub const fn new(group_id: &'a str, artifact_id: &'a str) -> Self {
        Self {
            group_id,
            artifact_id,
            extension: "jar",
            classifier: "",
            version: SYSTEM_VERSION,
            package_version: None,
            namespace: None,
        }
    }

    /// Assemble the capability string.
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner::collector::Capability;
    ///
    /// let cap = Capability { extension: "pom", ..Capability::new("x", "y") };
    /// assert_eq!(cap.format(), "mvn(x:y:pom:)");
    /// ```
    pub fn format(&self) -> String {
        let custom_extension = self.extension != "jar";
        let custom_classifier = !self.classifier.is_empty();
        let custom_version = self.version != SYSTEM_VERSION;

        let mut out = String::new();
        if let Some(namespace) = self.namespace.filter(|ns| !ns.trim().is_empty()) {
            out.push_str(namespace);
            out.push('-');
        }
        out.push_str("mvn(");
        out.push_str(self.group_id);
        out.push(':');
        out.push_str(self.artifact_id);
        if custom_classifier || custom_extension {
            out.push(':');
        }
        if custom_extension {
            out.push_str(self.extension);
        }
        if custom_classifier {
            out.push(':');
            out.push_str(self.classifier);
        }
        if custom_classifier || custom_extension || custom_version {
            out.push(':');
        }
        if custom_version {
            out.push_str(self.version);
        }
        out.push(')');
        if let Some(package_version) = self.package_version {
            out.push_str(" = ");
            out.push_str(package_version);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap<'a>(extension: &'a str, classifier: &'a str, version: &'a str) -> Capability<'a> {
        Capability {
            extension,
            classifier,
            version,
            ..Capability::new("x", "y")
        }
    }

    #[test]
    fn test_separator_placement() {
        assert_eq!(cap("jar", "", "SYSTEM").format(), "mvn(x:y)");
        assert_eq!(cap("pom", "", "SYSTEM").format(), "mvn(x:y:pom:)");
        assert_eq!(cap("jar", "tests", "1.0").format(), "mvn(x:y::tests:1.0)");
        assert_eq!(cap("jar", "", "1.0").format(), "mvn(x:y:1.0)");
        assert_eq!(cap("pom", "", "2").format(), "mvn(x:y:pom:2)");
        assert_eq!(cap("jar", "tests", "SYSTEM").format(), "mvn(x:y::tests:)");
        assert_eq!(cap("war", "client", "3").format(), "mvn(x:y:war:client:3)");
    }

    #[test]
    fn test_namespace_and_package_version() {
        let with_ns = Capability {
            namespace: Some("rh-maven"),
            package_version: Some("1.2-3"),
            ..Capability::new("x", "y")
        };
        assert_eq!(with_ns.format(), "rh-maven-mvn(x:y) = 1.2-3");

        let blank_ns = Capability {
            namespace: Some("  "),
            ..Capability::new("x", "y")
        };
        assert_eq!(blank_ns.format(), "mvn(x:y)");
    }
}
