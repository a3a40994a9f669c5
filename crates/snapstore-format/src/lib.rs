//! # snapstore-format
//!
//! On-disk artifact format for snapstore.
//!
//! An artifact is a sequence of bindings, one per stored snapshot:
//!
//! ```text
//! exports[`<escaped-id>`] = `<escaped-value>`;
//! ```
//!
//! This crate provides:
//! - A parser for the constrained binding grammar (no code is evaluated)
//! - A renderer producing the exact on-disk text
//!
//! Keys and values are kept in their escaped form on both sides, so a
//! parse followed by a render reproduces the input byte for byte.
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on snapstore-core only.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod parser;
pub mod render;

use std::collections::BTreeMap;

/// Escaped snapshot id mapped to escaped snapshot text, in key order.
pub type Snapshots = BTreeMap<String, String>;

// Re-export commonly used types
pub use parser::{parse_artifact, ArtifactParser, ParseError, ParseErrorReason};
pub use render::{render_artifact, render_entry, EntryPart, RenderError};
