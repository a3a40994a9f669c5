//! Test context supplied by the surrounding test framework.

use std::path::{Path, PathBuf};

/// What the store needs to know about the currently executing test.
pub trait TestContext {
    /// Source file the test is defined in, if known.
    fn file_path(&self) -> Option<&Path>;

    /// Stable, fully qualified test name used as the snapshot base name.
    fn full_name(&self) -> &str;
}

/// Plain [`TestContext`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    /// Source file of the test
    pub file_path: Option<PathBuf>,
    /// Fully qualified test name
    pub full_name: String,
}

impl TestInfo {
    /// Create a context for a test in `file_path`.
    pub fn new(file_path: impl Into<PathBuf>, full_name: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            full_name: full_name.into(),
        }
    }

    /// Create a context whose source file is unknown.
    pub fn without_file(full_name: impl Into<String>) -> Self {
        Self {
            file_path: None,
            full_name: full_name.into(),
        }
    }
}

impl TestContext for TestInfo {
    fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }
}
