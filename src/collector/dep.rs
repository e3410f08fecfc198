//! The per-artifact dependency record.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::capability::{Capability, SYSTEM_VERSION};
use crate::model::{Coordinate, InputLocation, InputLocationTracker};

/// Resolution state of a dependency record.
///
/// A record leaves [`Unknown`](ResolutionStatus::Unknown) at most once and
/// keeps its settled state for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStatus {
    /// Not attempted yet
    #[default]
    Unknown,
    /// Found in the repository
    Resolved,
    /// Not found, or not resolvable at all (version ranges)
    Unresolved,
}

#[derive(Debug)]
struct DepState {
    coords: Coordinate,
    found_locations: BTreeSet<String>,
    status: ResolutionStatus,
    resolved_version: Option<String>,
}

/// One harvested dependency.
///
/// Identity fields are fixed by the first lookup that created the record.
/// The coordinate snapshot, provenance and resolution state are mutable and
/// shared between the driver and the loading shim.
#[derive(Debug)]
pub struct Dep {
    /// Canonical id, `group:artifact:extension:version`
    pub id: String,
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Extension
    pub extension: String,
    /// Classifier seen by the first lookup
    pub classifier: String,
    /// Version request seen by the first lookup
    pub version: String,
    state: Mutex<DepState>,
}

impl Dep {
    pub(crate) fn new(coords: &Coordinate) -> Self {
        Self {
            id: coords.canonical_id(),
            group_id: coords.group_id.clone(),
            artifact_id: coords.artifact_id.clone(),
            extension: coords.extension.clone(),
            classifier: coords.classifier.clone(),
            version: coords.version.to_string(),
            state: Mutex::new(DepState {
                coords: coords.clone(),
                found_locations: BTreeSet::new(),
                status: ResolutionStatus::Unknown,
                resolved_version: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DepState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `group:artifact`
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Coordinates passed by the most recent lookup.
    pub fn coordinate(&self) -> Coordinate {
        self.state().coords.clone()
    }

    pub(crate) fn set_coordinate(&self, coords: Coordinate) {
        self.state().coords = coords;
    }

    /// Record a declaration site, making this a strong dependency.
    pub fn found_at(&self, declaration: &impl InputLocationTracker) {
        let location = InputLocation::render_opt(declaration.location().as_ref());
        self.state().found_locations.insert(location);
    }

    /// Recorded declaration sites, sorted.
    pub fn found_locations(&self) -> Vec<String> {
        self.state().found_locations.iter().cloned().collect()
    }

    /// Strong dependencies have at least one recorded declaration site.
    pub fn is_strong(&self) -> bool {
        !self.state().found_locations.is_empty()
    }

    /// Current resolution state.
    pub fn status(&self) -> ResolutionStatus {
        self.state().status
    }

    /// Settle an unknown record as resolved or unresolved.
    ///
    /// A record that already settled keeps its state. Returns the state after the call.
    pub fn settle(&self, resolved: bool) -> ResolutionStatus {
        let mut state = self.state();
        if state.status == ResolutionStatus::Unknown {
            state.status =
                if resolved { ResolutionStatus::Resolved } else { ResolutionStatus::Unresolved };
        }
        state.status
    }

    /// Compat version assigned during output classification.
    pub fn resolved_version(&self) -> Option<String> {
        self.state().resolved_version.clone()
    }

    pub(crate) fn set_resolved_version(&self, version: String) {
        self.state().resolved_version = Some(version);
    }

    /// Capability string for this record.
    ///
    /// Uses the compat version when one has been assigned, `SYSTEM` otherwise.
    pub fn capability(&self, namespace: Option<&str>) -> String {
        let version = self.resolved_version();
        Capability {
            group_id: &self.group_id,
            artifact_id: &self.artifact_id,
            extension: &self.extension,
            classifier: &self.classifier,
            version: version.as_deref().unwrap_or(SYSTEM_VERSION),
            package_version: None,
            namespace,
        }
        .format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parent;

    fn parent(line: Option<u32>) -> Parent {
        Parent {
            group_id: "org.example".to_string(),
            artifact_id: "parent".to_string(),
            version: "7".to_string(),
            line,
            source: Some("file:///src/pom.xml".to_string()),
        }
    }

    #[test]
    fn test_settle_only_once() {
        let dep = Dep::new(&Coordinate::new("g", "a", "1", "jar"));
        assert_eq!(dep.status(), ResolutionStatus::Unknown);
        assert_eq!(dep.settle(false), ResolutionStatus::Unresolved);
        assert_eq!(dep.settle(true), ResolutionStatus::Unresolved);
        assert_eq!(dep.status(), ResolutionStatus::Unresolved);
    }

    #[test]
    fn test_found_at_makes_strong() {
        let dep = Dep::new(&parent(None).coordinate());
        assert!(!dep.is_strong());

        dep.found_at(&parent(None));
        dep.found_at(&parent(Some(4)));
        dep.found_at(&parent(Some(4)));

        assert!(dep.is_strong());
        assert_eq!(dep.found_locations(), vec!["/src/pom.xml line 4", "UNKNOWN-location"]);
    }

    #[test]
    fn test_capability_uses_identity_and_compat_version() {
        let dep = Dep::new(&parent(None).coordinate());
        assert_eq!(dep.capability(None), "mvn(org.example:parent:pom:)");

        dep.set_resolved_version("7".to_string());
        assert_eq!(dep.capability(None), "mvn(org.example:parent:pom:7)");
        assert_eq!(dep.capability(Some("ns")), "ns-mvn(org.example:parent:pom:7)");
    }
}
