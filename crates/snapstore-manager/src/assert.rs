//! Snapshot assertion entry point.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use snapstore_core::{escape_template, Error, Mismatch, Result};
use snapstore_serialize::{builtin_registry, SerializerChain};

use crate::context::TestContext;
use crate::manager::SnapshotManager;

/// Per-assertion options.
#[derive(Debug, Clone, Default)]
pub struct AssertOptions {
    /// Serializers to use instead of the manager's defaults
    pub serializers: Option<SerializerChain>,
}

impl AssertOptions {
    /// Options that use the manager's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `serializers` for this assertion.
    pub fn with_serializers(mut self, serializers: SerializerChain) -> Self {
        self.serializers = Some(serializers);
        self
    }

    /// Use built-in serializers looked up by name for this assertion.
    pub fn with_serializer_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.serializers = Some(
            builtin_registry().chain_from_names(names, "options.serializers")?,
        );
        Ok(self)
    }
}

/// Snapshot assertion bound to a [`SnapshotManager`].
#[derive(Clone)]
pub struct SnapshotAssert {
    manager: Arc<SnapshotManager>,
}

impl SnapshotAssert {
    pub(crate) fn new(manager: Arc<SnapshotManager>) -> Self {
        Self { manager }
    }

    /// Manager this assertion reports to.
    pub fn manager(&self) -> &Arc<SnapshotManager> {
        &self.manager
    }

    /// Assert `actual` against the next snapshot of the running test.
    pub fn assert<C, T>(&self, ctx: &C, actual: &T) -> Result<()>
    where
        C: TestContext + ?Sized,
        T: Serialize + ?Sized,
    {
        self.assert_with(ctx, actual, &AssertOptions::default())
    }

    /// Like [`SnapshotAssert::assert`], with per-call options.
    ///
    /// In record mode the value is stored and the assertion passes. In verify
    /// mode the artifact is loaded on first use and the serialized value must
    /// equal the stored one exactly.
    pub fn assert_with<C, T>(&self, ctx: &C, actual: &T, options: &AssertOptions) -> Result<()>
    where
        C: TestContext + ?Sized,
        T: Serialize + ?Sized,
    {
        let source_file = ctx
            .file_path()
            .ok_or(Error::InvalidSnapshotFilename { filename: None })?;
        let file = self.manager.resolve_snapshot_file(source_file)?;
        let mut file = file.lock();
        let id = file.next_id(ctx.full_name());
        let value = self
            .manager
            .serialize(actual, options.serializers.as_ref())?;

        if self.manager.mode().is_record() {
            debug!("Recording snapshot '{}'", id);
            file.set_snapshot(&id, value);
            return Ok(());
        }

        file.read_file()?;
        let expected = file.get_snapshot(&escape_template(&id))?;
        if expected == value {
            debug!("Snapshot '{}' matches", id);
            return Ok(());
        }

        warn!(
            "Snapshot '{}' does not match '{}'",
            id,
            file.snapshot_path().display()
        );
        Err(Error::SnapshotMismatch(Box::new(Mismatch {
            snapshot: id,
            filename: file.snapshot_path().to_path_buf(),
            expected: expected.to_string(),
            actual: value,
        })))
    }
}
