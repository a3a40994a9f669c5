//! Snapshot manager for coordinating the snapshot files of one run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use snapstore_core::{Error, Result, RunMode, SnapshotConfig};
use snapstore_serialize::{builtin_registry, default_chain, SerializerChain, SerializerRegistry};

use crate::assert::SnapshotAssert;
use crate::file::SnapshotFile;
use crate::resolver::SnapshotPathResolver;

/// Snapshot file shared between the manager and running tests.
pub type SharedSnapshotFile = Arc<Mutex<SnapshotFile>>;

/// Configuration for snapshot manager.
#[derive(Debug, Clone)]
pub struct SnapshotManagerConfig {
    /// Verify or record
    pub mode: RunMode,

    /// Chain used when an assertion does not bring its own
    pub serializers: SerializerChain,

    /// Maps test source files to artifact paths
    pub resolver: SnapshotPathResolver,
}

impl Default for SnapshotManagerConfig {
    fn default() -> Self {
        Self::new(RunMode::Verify)
    }
}

impl SnapshotManagerConfig {
    /// Default serializers and path resolver in the given mode.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            serializers: default_chain(),
            resolver: SnapshotPathResolver::default(),
        }
    }

    /// Build from a loaded [`SnapshotConfig`] using the built-in serializers.
    pub fn from_config(config: &SnapshotConfig) -> Result<Self> {
        Self::from_config_with_registry(config, builtin_registry())
    }

    /// Build from a loaded [`SnapshotConfig`] using a custom registry.
    pub fn from_config_with_registry(
        config: &SnapshotConfig,
        registry: &SerializerRegistry,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            serializers: registry.chain_from_names(&config.serializers, "serializers")?,
            resolver: SnapshotPathResolver::from_template(&config.path_template)?,
        })
    }

    /// Replace the path resolver.
    pub fn set_resolve_snapshot_path<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Path) -> Option<PathBuf> + Send + Sync + 'static,
    {
        self.resolver = SnapshotPathResolver::new(f);
        self
    }

    /// Replace the path resolver with a template-based one.
    pub fn set_resolve_snapshot_path_template(&mut self, template: &str) -> Result<&mut Self> {
        self.resolver = SnapshotPathResolver::from_template(template)?;
        Ok(self)
    }

    /// Replace the default serializers wholesale.
    pub fn set_default_snapshot_serializers(&mut self, serializers: SerializerChain) -> &mut Self {
        self.serializers = serializers;
        self
    }

    /// Replace the default serializers with built-ins looked up by name.
    pub fn set_default_snapshot_serializer_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<&mut Self> {
        self.serializers = builtin_registry().chain_from_names(names, "serializers")?;
        Ok(self)
    }
}

/// Owns the snapshot files touched during one run.
pub struct SnapshotManager {
    config: SnapshotManagerConfig,
    files: RwLock<HashMap<PathBuf, SharedSnapshotFile>>,
}

impl SnapshotManager {
    /// Create a manager with default serializers and path resolver.
    pub fn new(mode: RunMode) -> Self {
        Self::with_config(SnapshotManagerConfig::new(mode))
    }

    /// Create a manager with custom configuration.
    pub fn with_config(config: SnapshotManagerConfig) -> Self {
        debug!(
            "Creating snapshot manager: mode={}, serializers={:?}, resolver={:?}",
            config.mode, config.serializers, config.resolver
        );
        Self {
            config,
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Run mode, fixed for the lifetime of the manager.
    pub fn mode(&self) -> RunMode {
        self.config.mode
    }

    /// Active configuration.
    pub fn config(&self) -> &SnapshotManagerConfig {
        &self.config
    }

    /// Serialize a value with `serializers`, or the default chain when `None`.
    ///
    /// An empty chain casts the value to text without any transform.
    pub fn serialize<T: Serialize + ?Sized>(
        &self,
        value: &T,
        serializers: Option<&SerializerChain>,
    ) -> Result<String> {
        serializers
            .unwrap_or(&self.config.serializers)
            .serialize(value)
    }

    /// Get the snapshot file for a test source, creating it on first use.
    pub fn resolve_snapshot_file(&self, source_file: &Path) -> Result<SharedSnapshotFile> {
        if let Some(file) = self.files.read().get(source_file) {
            return Ok(Arc::clone(file));
        }

        let snapshot_path = match self.config.resolver.resolve(source_file) {
            Some(path) if !path.as_os_str().is_empty() => path,
            other => return Err(Error::InvalidSnapshotFilename { filename: other }),
        };

        let mut files = self.files.write();
        let file = files.entry(source_file.to_path_buf()).or_insert_with(|| {
            debug!(
                "Resolved snapshot file for '{}': '{}'",
                source_file.display(),
                snapshot_path.display()
            );
            Arc::new(Mutex::new(SnapshotFile::new(
                source_file.to_path_buf(),
                snapshot_path,
                self.config.mode,
            )))
        });

        Ok(Arc::clone(file))
    }

    /// Create the assertion entry point bound to this manager.
    pub fn create_assert(self: &Arc<Self>) -> SnapshotAssert {
        SnapshotAssert::new(Arc::clone(self))
    }

    /// Persist every touched snapshot file. Does nothing in verify mode.
    pub fn write_snapshot_files(&self) -> Result<()> {
        if !self.config.mode.is_record() {
            debug!("Skipping write of snapshot files in verify mode");
            return Ok(());
        }

        let files: Vec<SharedSnapshotFile> = self.files.read().values().cloned().collect();
        for file in files {
            file.lock().write()?;
        }

        Ok(())
    }

    /// Number of snapshot files touched so far.
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }
}

impl Default for SnapshotManager {
    fn default() -> Self {
        Self::with_config(SnapshotManagerConfig::default())
    }
}
