//! Index of the modules being built.
//!
//! A coordinate that names one of the build's own modules is satisfied by the
//! build itself and must never become a build dependency. The index is keyed
//! by exact group, artifact and version.

use std::collections::HashMap;

use crate::model::{Coordinate, Project};

/// Lookup of in-progress modules by group/artifact/version.
#[derive(Debug, Default)]
pub struct ModuleIndex<'a> {
    modules: HashMap<&'a str, HashMap<&'a str, HashMap<&'a str, &'a Project>>>,
}

impl<'a> ModuleIndex<'a> {
    /// Index every project of the build.
    pub fn new(projects: &'a [Project]) -> Self {
        let mut modules: HashMap<&str, HashMap<&str, HashMap<&str, &Project>>> = HashMap::new();
        for project in projects {
            modules
                .entry(project.group_id.as_str())
                .or_default()
                .entry(project.artifact_id.as_str())
                .or_default()
                .insert(project.version.as_str(), project);
        }
        Self {
            modules,
        }
    }

    /// The module `coords` refers to, if it is part of the build.
    ///
    /// Extension and classifier are ignored.
    pub fn find(&self, coords: &Coordinate) -> Option<&'a Project> {
        self.modules
            .get(coords.group_id.as_str())?
            .get(coords.artifact_id.as_str())?
            .get(coords.version.as_str())
            .copied()
    }
}
