//! Snapshot path resolution.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snapstore_core::{validate_path_template, Result, DEFAULT_PATH_TEMPLATE};

type ResolveFn = dyn Fn(&Path) -> Option<PathBuf> + Send + Sync;

/// Default artifact location: the test source path with `.snapshot` appended.
pub fn default_resolve_snapshot_path(source_file: &Path) -> PathBuf {
    let mut path = OsString::from(source_file.as_os_str());
    path.push(".snapshot");
    PathBuf::from(path)
}

/// Maps a test source file to the location of its snapshot artifact.
///
/// Returning `None` means no artifact location exists for that source.
#[derive(Clone)]
pub struct SnapshotPathResolver {
    resolve: Arc<ResolveFn>,
    description: String,
}

impl SnapshotPathResolver {
    /// Wrap a resolver function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Path) -> Option<PathBuf> + Send + Sync + 'static,
    {
        Self {
            resolve: Arc::new(f),
            description: "custom".to_string(),
        }
    }

    /// Build a resolver from a path template such as `{dir}/__snapshots__/{file}.snap`.
    pub fn from_template(template: &str) -> Result<Self> {
        validate_path_template(template)?;
        let owned = template.to_string();
        Ok(Self {
            resolve: Arc::new(move |source: &Path| expand_template(&owned, source)),
            description: format!("template '{template}'"),
        })
    }

    /// Resolve the artifact path for `source_file`.
    pub fn resolve(&self, source_file: &Path) -> Option<PathBuf> {
        (self.resolve)(source_file)
    }
}

impl Default for SnapshotPathResolver {
    fn default() -> Self {
        Self {
            resolve: Arc::new(|source: &Path| Some(default_resolve_snapshot_path(source))),
            description: format!("template '{DEFAULT_PATH_TEMPLATE}'"),
        }
    }
}

impl fmt::Debug for SnapshotPathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotPathResolver")
            .field("resolve", &self.description)
            .finish()
    }
}

fn expand_template(template: &str, source: &Path) -> Option<PathBuf> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        let value = match &after[..end] {
            "path" => source.to_string_lossy().into_owned(),
            "dir" => match source.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    parent.to_string_lossy().into_owned()
                }
                _ => ".".to_string(),
            },
            "file" => source.file_name()?.to_string_lossy().into_owned(),
            "stem" => source.file_stem()?.to_string_lossy().into_owned(),
            _ => return None,
        };
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Some(PathBuf::from(out))
}
