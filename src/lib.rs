//! gleaner: harvest the build dependencies of a Maven build.
//!
//! gleaner drives a build host through plan computation without executing
//! anything, intercepts every model and plugin the host loads, and reports the
//! artifacts the build needs as RPM-style `mvn(...)` capability strings.
//!
//! # Architecture
//!
//! - [`collector`]: the coordinate registry and dependency records
//! - [`filter`], [`compat`]: output filtering and compat versions
//! - [`gleaner`]: the three-pass resolution driver
//! - [`host`]: the build host seam and a TOML-described static host
//! - [`shim`]: model and plugin loading on behalf of the host
//! - [`repository`]: artifact lookup
//! - [`reactor`]: the index of the build's own modules
//! - [`output`]: emission of the build requirements
//! - [`config`]: run properties
//! - [`cli`]: the command line

pub mod cli;
pub mod collector;
pub mod compat;
pub mod config;
pub mod core;
pub mod filter;
pub mod gleaner;
pub mod host;
pub mod model;
pub mod output;
pub mod reactor;
pub mod repository;
pub mod shim;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
