//! Integration test suite for gleaner
//!
//! End-to-end tests driving the library against on-disk repositories and
//! the `gleaner` binary itself.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **harvest**: full runs through the driver with a local repository
//! - **cli**: the binary, its output and exit status
//! - **config**: properties files and the environment

mod cli;
mod config;
mod harvest;
