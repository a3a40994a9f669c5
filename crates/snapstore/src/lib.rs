//! # snapstore
//!
//! Snapshot assertion store.
//!
//! A test records a computed value as a named snapshot on its first run;
//! later runs re-serialize the value and compare it byte for byte against
//! the stored artifact.
//!
//! This crate provides:
//! - The public API of the workspace, re-exported in one place
//! - The `snapstore` operator CLI for inspecting snapshot artifacts
//!
//! ## Architecture
//!
//! This is Layer 4 - the top-level crate that ties together:
//! - snapstore-core: errors, run mode, escaping and configuration
//! - snapstore-format: the artifact parser and renderer
//! - snapstore-serialize: the serialization pipeline
//! - snapstore-manager: snapshot files and the run-scoped manager
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use snapstore::{RunMode, SnapshotManager, TestInfo};
//!
//! let manager = Arc::new(SnapshotManager::new(RunMode::from_env()));
//! let assert = manager.create_assert();
//! assert.assert(&TestInfo::new("tests/math.rs", "adds numbers"), &(1 + 2))?;
//! manager.write_snapshot_files()?;
//! # Ok::<(), snapstore::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use snapstore_core::{
    escape_template, unescape_template, Error, ErrorKind, Result, RunMode, SnapshotConfig,
};
pub use snapstore_format::{parse_artifact, render_artifact, Snapshots};
pub use snapstore_manager::{
    default_resolve_snapshot_path, AssertOptions, SnapshotAssert, SnapshotFile, SnapshotManager,
    SnapshotManagerConfig, SnapshotPathResolver, TestContext, TestInfo,
};
pub use snapstore_serialize::{
    builtin_registry, serializer_fn, Serializer, SerializerChain, SerializerRegistry, Stage,
};
