//! # snapstore-core
//!
//! Core types for the snapstore snapshot assertion store.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other snapstore crates. It provides:
//!
//! - Error types and error kinds
//! - Run mode (verify vs. record) and its resolution from flags/environment
//! - Escaping rules shared by the serializer and the artifact format
//! - YAML configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other snapstore crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod escape;
pub mod mode;

// Re-export commonly used types
pub use config::{
    validate_path_template, SnapshotConfig, DEFAULT_PATH_TEMPLATE, DEFAULT_SERIALIZER,
    PATH_PLACEHOLDERS,
};
pub use error::{BoxError, Error, ErrorKind, Mismatch, Result, MISSING_SNAPSHOT_TIP};
pub use escape::{check_template_body, escape_template, unescape_template, TemplateBodyError};
pub use mode::{RunMode, UPDATE_SNAPSHOTS_ENV, UPDATE_SNAPSHOTS_FLAG};
