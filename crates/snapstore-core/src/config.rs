//! Configuration types for snapstore.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, RunMode, UPDATE_SNAPSHOTS_ENV};

/// Default artifact location: next to the test source.
pub const DEFAULT_PATH_TEMPLATE: &str = "{path}.snapshot";

/// Serializer used when none is configured.
pub const DEFAULT_SERIALIZER: &str = "json-pretty";

/// Placeholders understood by `path_template`.
///
/// - `{path}`: the full test source path
/// - `{dir}`: its parent directory
/// - `{file}`: its file name
/// - `{stem}`: its file name without extension
pub const PATH_PLACEHOLDERS: &[&str] = &["path", "dir", "file", "stem"];

/// Snapshot store configuration loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Verify or record
    pub mode: RunMode,
    /// Template mapping a test source path to its artifact path
    pub path_template: String,
    /// Names of the serializers applied, in order
    pub serializers: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Verify,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            serializers: vec![DEFAULT_SERIALIZER.to_string()],
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: SnapshotConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Switch to record mode if the environment asks for it.
    ///
    /// A configured `record` mode is never turned back into `verify`.
    pub fn with_env_overrides(self) -> Self {
        self.with_env_value(std::env::var(UPDATE_SNAPSHOTS_ENV).ok().as_deref())
    }

    /// Apply a raw [`UPDATE_SNAPSHOTS_ENV`] value.
    pub fn with_env_value(mut self, value: Option<&str>) -> Self {
        if RunMode::from_env_value(value).is_record() {
            self.mode = RunMode::Record;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        validate_path_template(&self.path_template)?;

        for (i, name) in self.serializers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::invalid_arg_type(
                    format!("serializers[{i}]"),
                    "a serializer name",
                    "an empty string",
                ));
            }
        }

        Ok(())
    }
}

/// Check that a path template only uses known placeholders and names the source file.
pub fn validate_path_template(template: &str) -> crate::Result<()> {
    let mut names_file = false;
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            Error::invalid_arg_value(
                "path_template",
                "has an unclosed placeholder",
                format!("'{template}'"),
            )
        })?;
        let name = &after[..end];
        if !PATH_PLACEHOLDERS.contains(&name) {
            return Err(Error::invalid_arg_value(
                "path_template",
                format!("uses unknown placeholder '{{{name}}}'"),
                format!("'{template}'"),
            ));
        }
        names_file |= name != "dir";
        rest = &after[end + 1..];
    }

    if !names_file {
        return Err(Error::invalid_arg_value(
            "path_template",
            "must contain one of {path}, {file} or {stem}",
            format!("'{template}'"),
        ));
    }

    Ok(())
}
