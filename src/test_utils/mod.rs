//! Test utilities for gleaner
//!
//! Helpers for unit and integration tests: logging setup, an in-memory
//! repository, build description fixtures, and a temporary environment with a
//! Maven-layout repository on disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use gleaner::test_utils::{BuildFixture, TestEnvironment};
//!
//! let env = TestEnvironment::new().unwrap();
//! let build = env.write_build(&BuildFixture::single_module()).unwrap();
//! env.install_all(BuildFixture::single_module_artifacts()).unwrap();
//! assert!(build.exists());
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::BuildFixture;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, Once, PoisonError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::GleanerError;
use crate::model::Coordinate;
use crate::repository::ArtifactResolver;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without logging.
///
/// # Example
///
/// ```rust,no_run
/// use tracing::Level;
///
/// gleaner::test_utils::init_test_logging(Some(Level::DEBUG));
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Repository holding a fixed set of artifacts, keyed by canonical id.
///
/// Records every query so tests can assert what was looked up.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    artifacts: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl MemoryRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository containing the given canonical ids (`group:artifact:ext:version`).
    pub fn with(ids: &[&str]) -> Self {
        Self {
            artifacts: ids.iter().map(|id| (*id).to_string()).collect(),
            queries: Mutex::default(),
        }
    }

    /// Canonical ids queried so far, in query order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns `true` if `id` was queried at least once.
    pub fn queried(&self, id: &str) -> bool {
        self.queries().iter().any(|query| query == id)
    }
}

impl ArtifactResolver for MemoryRepository {
    fn resolve(&self, coords: &Coordinate) -> Result<PathBuf, GleanerError> {
        let id = coords.canonical_id();
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).push(id.clone());
        if self.artifacts.contains(&id) {
            Ok(PathBuf::from("/memory").join(id.replace(':', "/")))
        } else {
            Err(GleanerError::ArtifactNotFound {
                coordinate: coords.to_string(),
            })
        }
    }
}
