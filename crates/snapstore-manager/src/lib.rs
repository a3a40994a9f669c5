//! # snapstore-manager
//!
//! Run-scoped snapshot management for snapstore.
//!
//! This crate provides:
//! - Snapshot path resolution (default `<source>.snapshot`, closures or templates)
//! - [`SnapshotFile`]: one artifact, its id counters and its stored snapshots
//! - [`SnapshotManager`]: mode, default serializers, file registry and end-of-run flush
//! - [`SnapshotAssert`]: the assertion entry point used from inside a test
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on snapstore-core,
//! snapstore-format and snapstore-serialize.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assert;
pub mod context;
pub mod file;
pub mod id;
pub mod manager;
pub mod resolver;

// Re-export commonly used types
pub use assert::{AssertOptions, SnapshotAssert};
pub use context::{TestContext, TestInfo};
pub use file::SnapshotFile;
pub use id::IdAllocator;
pub use manager::{SharedSnapshotFile, SnapshotManager, SnapshotManagerConfig};
pub use resolver::{default_resolve_snapshot_path, SnapshotPathResolver};
