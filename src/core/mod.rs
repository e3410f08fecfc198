//! Core types for gleaner
//!
//! Holds the crate-wide error type and the user-facing error context used by
//! the CLI. Every fallible operation in the engine returns either
//! [`GleanerError`] directly or an [`anyhow::Error`] wrapping one, so the CLI
//! can always recover the typed error through [`user_friendly_error`].

pub mod error;

pub use error::{ErrorContext, GleanerError, user_friendly_error};
