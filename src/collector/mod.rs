//! The coordinate registry.
//!
//! [`Collector`] interns every coordinate the run encounters into exactly one
//! [`Dep`] per canonical id. It is shared by reference between the
//! [`Gleaner`](crate::gleaner::Gleaner) driver and the
//! [`LoadingShim`](crate::shim::LoadingShim), which calls back into it while
//! the host build computes plans. All map mutation happens under a single
//! lock; records are never removed.
//!
//! # Examples
//!
//! ```
//! use gleaner::collector::Collector;
//! use gleaner::model::Coordinate;
//! use std::sync::Arc;
//!
//! let collector = Collector::new();
//! let a = collector.lookup(&Coordinate::new("junit", "junit", "4.13.2", "jar"));
//! let b = collector.lookup(&Coordinate::new("junit", "junit", "4.13.2", "jar"));
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(collector.len(), 1);
//! ```

mod capability;
mod dep;

pub use capability::{Capability, SYSTEM_VERSION};
pub use dep::{Dep, ResolutionStatus};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::model::Coordinate;

/// Registry of every dependency harvested during one run.
#[derive(Debug, Default)]
pub struct Collector {
    deps: Mutex<BTreeMap<String, Arc<Dep>>>,
}

impl Collector {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn deps_map(&self) -> MutexGuard<'_, BTreeMap<String, Arc<Dep>>> {
        self.deps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the record for `coords`, creating it on first sight.
    ///
    /// The record's coordinate snapshot is overwritten with `coords` even when
    /// the record already existed.
    pub fn lookup(&self, coords: &Coordinate) -> Arc<Dep> {
        let mut deps = self.deps_map();
        let dep = deps
            .entry(coords.canonical_id())
            .or_insert_with(|| Arc::new(Dep::new(coords)))
            .clone();
        dep.set_coordinate(coords.clone());
        dep
    }

    /// Snapshot of all records, ordered by canonical id.
    pub fn deps(&self) -> Vec<Arc<Dep>> {
        self.deps_map().values().cloned().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.deps_map().len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.deps_map().is_empty()
    }

    /// Log every record with its declaration sites.
    pub fn summarize(&self) {
        for dep in self.deps() {
            debug!("Found dependency: {}", dep.id);
            for location in dep.found_locations() {
                debug!("  at {}", location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_lookup_returns_same_record() {
        let collector = Collector::new();
        let first = collector.lookup(&Coordinate::new("g", "a", "1", "jar"));
        let second = collector.lookup(&Coordinate::new("g", "a", "1", "jar"));
        let other = collector.lookup(&Coordinate::new("g", "a", "1", "pom"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_classifier_collapses_onto_one_record() {
        let collector = Collector::new();
        let plain = collector.lookup(&Coordinate::for_type("g", "a", "1", None, "jar"));
        let tests = collector.lookup(&Coordinate::for_type("g", "a", "1", Some("tests"), "jar"));

        assert!(Arc::ptr_eq(&plain, &tests));
        assert_eq!(collector.len(), 1);
        // identity keeps the first lookup's classifier, the snapshot follows the latest
        assert_eq!(plain.classifier, "");
        assert_eq!(plain.coordinate().classifier, "tests");
    }

    #[test]
    fn test_lookup_overwrites_snapshot_on_hit() {
        let collector = Collector::new();
        let dep = collector.lookup(&Coordinate::for_type("g", "a", "1", Some("x"), "jar"));
        collector.lookup(&Coordinate::for_type("g", "a", "1", Some("y"), "jar"));
        assert_eq!(dep.coordinate().classifier, "y");
    }

    #[test]
    fn test_deps_are_ordered_by_id() {
        let collector = Collector::new();
        collector.lookup(&Coordinate::new("z", "a", "1", "jar"));
        collector.lookup(&Coordinate::new("a", "b", "1", "jar"));
        collector.lookup(&Coordinate::new("m", "c", "1", "pom"));

        let ids: Vec<String> = collector.deps().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["a:b:jar:1", "m:c:pom:1", "z:a:jar:1"]);
    }

    #[test]
    fn test_concurrent_lookups_intern_once() {
        let collector = Arc::new(Collector::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || {
                    for n in 0..50 {
                        collector.lookup(&Coordinate::new("g", format!("a{}", n % 10), "1", "jar"));
                        collector.lookup(&Coordinate::new("g", format!("t{i}"), "1", "jar"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(collector.len(), 18);
    }
}
