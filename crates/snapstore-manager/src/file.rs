//! In-memory view of one snapshot artifact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use snapstore_core::{escape_template, Error, Result, RunMode};
use snapstore_format::{parse_artifact, render_artifact, Snapshots};

/// Snapshots belonging to one test source file.
///
/// Keys of the stored map are escaped ids; values are serialized, escaped
/// snapshot text. [`SnapshotFile::set_snapshot`] escapes the id it is given,
/// while [`SnapshotFile::get_snapshot`] looks its argument up unchanged.
#[derive(Debug)]
pub struct SnapshotFile {
    source_file: PathBuf,
    snapshot_path: PathBuf,
    snapshots: Snapshots,
    ids: crate::IdAllocator,
    loaded: bool,
    dirty: bool,
}

impl SnapshotFile {
    /// Create an empty snapshot file.
    ///
    /// In record mode the file counts as already loaded, so the artifact on
    /// disk is never read.
    pub fn new(source_file: PathBuf, snapshot_path: PathBuf, mode: RunMode) -> Self {
        Self {
            source_file,
            snapshot_path,
            snapshots: Snapshots::new(),
            ids: crate::IdAllocator::new(),
            loaded: mode.is_record(),
            dirty: false,
        }
    }

    /// Resolved artifact location.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Allocate the next id for `base`, e.g. `"adds numbers 2"`.
    pub fn next_id(&mut self, base: &str) -> String {
        self.ids.next(base)
    }

    /// Parse the artifact into memory. Runs at most once.
    pub fn read_file(&mut self) -> Result<()> {
        if self.loaded {
            debug!(
                "Skipping read of snapshot file '{}'",
                self.snapshot_path.display()
            );
            return Ok(());
        }

        debug!(
            "Reading snapshot file '{}' for '{}'",
            self.snapshot_path.display(),
            self.source_file.display()
        );
        let content = fs::read_to_string(&self.snapshot_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::SnapshotFileMissing {
                    filename: self.snapshot_path.clone(),
                    source,
                }
            } else {
                Error::SnapshotFileUnreadable {
                    filename: self.snapshot_path.clone(),
                    source: Box::new(source),
                }
            }
        })?;

        let parsed = parse_artifact(&content).map_err(|source| Error::SnapshotFileUnreadable {
            filename: self.snapshot_path.clone(),
            source: Box::new(source),
        })?;

        debug!(
            "Loaded {} snapshot(s) from '{}'",
            parsed.len(),
            self.snapshot_path.display()
        );
        self.snapshots.extend(parsed);
        self.loaded = true;
        Ok(())
    }

    /// Stored text for an already-escaped id.
    pub fn get_snapshot(&self, id: &str) -> Result<&str> {
        self.snapshots
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| Error::SnapshotNotFound {
                snapshot: id.to_string(),
                filename: self.snapshot_path.clone(),
            })
    }

    /// Store serialized text under a raw id.
    pub fn set_snapshot(&mut self, id: &str, value: impl Into<String>) {
        self.snapshots.insert(escape_template(id), value.into());
        self.dirty = true;
    }

    /// Write the artifact, creating parent directories as needed.
    ///
    /// The full text is rendered before anything touches the filesystem; if
    /// any entry cannot be rendered nothing is written.
    pub fn write(&mut self) -> Result<()> {
        let output = render_artifact(&self.snapshots).map_err(|e| self.write_error(e))?;

        if let Some(parent) = self
            .snapshot_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        fs::write(&self.snapshot_path, output).map_err(|e| self.write_error(e))?;

        info!(
            "Wrote {} snapshot(s) to '{}'",
            self.snapshots.len(),
            self.snapshot_path.display()
        );
        self.dirty = false;
        Ok(())
    }

    /// Whether the artifact has been parsed (always true in record mode).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether snapshots changed since creation or the last write.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshots are stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Stored (escaped) ids, in key order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }

    /// All stored snapshots.
    pub fn snapshots(&self) -> &Snapshots {
        &self.snapshots
    }

    /// Mutable access to the stored snapshots, bypassing id escaping.
    pub fn snapshots_mut(&mut self) -> &mut Snapshots {
        self.dirty = true;
        &mut self.snapshots
    }

    fn write_error<E>(&self, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::SnapshotWriteFailed {
            filename: self.snapshot_path.clone(),
            source: Box::new(source),
        }
    }
}
