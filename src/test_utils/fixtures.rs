//! Build description fixtures.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A build description file for tests.
#[derive(Clone, Debug)]
pub struct BuildFixture {
    pub content: String,
    pub name: String,
}

impl BuildFixture {
    /// One module with a parent, two dependencies and two plugins.
    pub fn single_module() -> Self {
        Self {
            name: "single_module".to_string(),
            content: r#"
goals = ["install"]

[[plugins]]
group = "org.apache.maven.plugins"
artifact = "maven-compiler-plugin"
mojos = [
    { goal = "compile", phase = "compile", requires = "compile" },
    { goal = "testCompile", phase = "test-compile", requires = "test" },
]

[[plugins]]
group = "org.apache.maven.plugins"
artifact = "maven-jar-plugin"
mojos = [{ goal = "jar", phase = "package", requires = "runtime" }]

[[projects]]
group = "org.example"
artifact = "widget"
version = "1.0"
file = "/work/widget/pom.xml"
parent = { group = "org.example", artifact = "example-parent", version = "5", line = 6 }

[[projects.dependencies]]
group = "com.google.guava"
artifact = "guava"
version = "33.0"
line = 21

[[projects.dependencies]]
group = "org.junit.jupiter"
artifact = "junit-jupiter"
version = "5.10.0"
scope = "test"
line = 26

[[projects.executions]]
goal = "compile"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", line = 40 }

[[projects.executions]]
goal = "testCompile"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", line = 40 }

[[projects.executions]]
goal = "jar"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-jar-plugin", version = "3.3.0", line = 52 }
"#
            .trim()
            .to_string(),
        }
    }

    /// Canonical ids of every artifact [`single_module`](Self::single_module) needs.
    pub fn single_module_artifacts() -> &'static [&'static str] {
        &[
            "org.example:example-parent:pom:5",
            "com.google.guava:guava:jar:33.0",
            "org.junit.jupiter:junit-jupiter:jar:5.10.0",
            "org.apache.maven.plugins:maven-compiler-plugin:jar:3.13.0",
            "org.apache.maven.plugins:maven-jar-plugin:jar:3.3.0",
        ]
    }

    /// Two modules, one depending on the other, with an imported bom.
    pub fn multi_module() -> Self {
        Self {
            name: "multi_module".to_string(),
            content: r#"
goals = ["package"]

[[plugins]]
group = "org.apache.maven.plugins"
artifact = "maven-compiler-plugin"
mojos = [{ goal = "compile", phase = "compile", requires = "compile" }]

[[projects]]
group = "org.example"
artifact = "aggregator"
version = "2.1"
packaging = "pom"
file = "/work/pom.xml"

[[projects]]
group = "org.example"
artifact = "api"
version = "2.1"
file = "/work/api/pom.xml"
parent = { group = "org.example", artifact = "aggregator", version = "2.1", line = 4 }

[[projects.executions]]
goal = "compile"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", line = 30 }

[[projects]]
group = "org.example"
artifact = "impl"
version = "2.1"
file = "/work/impl/pom.xml"
parent = { group = "org.example", artifact = "aggregator", version = "2.1", line = 4 }

[[projects.dependencies]]
group = "org.example"
artifact = "api"
version = "2.1"
line = 14

[[projects.dependencies]]
group = "org.example"
artifact = "api"
version = "2.1"
type = "test-jar"
scope = "test"
line = 19

[[projects.imports]]
group = "org.junit"
artifact = "junit-bom"
version = "5.10.0"
type = "pom"
scope = "import"

[[projects.executions]]
goal = "compile"
plugin = { group = "org.apache.maven.plugins", artifact = "maven-compiler-plugin", version = "3.13.0", line = 30 }
"#
            .trim()
            .to_string(),
        }
    }

    /// A description that is not valid TOML.
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: "[[projects]\ngroup = ".to_string(),
        }
    }

    /// Write the fixture to `dir/build.toml`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("build.toml");
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {} fixture", self.name))?;
        Ok(path)
    }
}
