//! Error types for snapstore.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed error used as the cause of store-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Guidance attached to every "snapshot is missing" failure.
pub const MISSING_SNAPSHOT_TIP: &str =
    "Missing snapshots can be generated by rerunning the command with the --test-update-snapshots flag.";

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration input has the wrong shape
    InvalidArgType,
    /// Configuration input has the right shape but an unusable value
    InvalidArgValue,
    /// Store-level failure (missing/corrupt/unwritable artifact, bad pipeline output)
    InvalidState,
    /// Snapshot did not match the stored value
    Assertion,
    /// Plain I/O failure outside of the snapshot store
    Io,
    /// Configuration file could not be loaded
    Config,
}

impl ErrorKind {
    /// Stable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgType => "ERR_INVALID_ARG_TYPE",
            ErrorKind::InvalidArgValue => "ERR_INVALID_ARG_VALUE",
            ErrorKind::InvalidState => "ERR_INVALID_STATE",
            ErrorKind::Assertion => "ERR_ASSERTION",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Config => "ERR_CONFIG",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Main error type for snapstore operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Argument or property has the wrong shape
    #[error("The \"{name}\" {} must be {expected}. Received {received}", noun(.name))]
    InvalidArgType {
        /// Argument or property name (e.g. `options.serializers[1]`)
        name: String,
        /// Description of the accepted shape
        expected: String,
        /// Description of what was received
        received: String,
    },

    /// Argument or property has an unusable value
    #[error("The {} '{name}' {reason}. Received {received}", noun(.name))]
    InvalidArgValue {
        /// Argument or property name
        name: String,
        /// Why the value was rejected
        reason: String,
        /// Description of what was received
        received: String,
    },

    /// Snapshot artifact does not exist on disk
    #[error("Cannot read snapshot file '{}.' {}", .filename.display(), MISSING_SNAPSHOT_TIP)]
    SnapshotFileMissing {
        /// Resolved artifact path
        filename: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot artifact exists but cannot be read or is corrupt
    #[error("Cannot read snapshot file '{}.'", .filename.display())]
    SnapshotFileUnreadable {
        /// Resolved artifact path
        filename: PathBuf,
        /// Underlying read or parse error
        #[source]
        source: BoxError,
    },

    /// Requested snapshot id is not present in the artifact
    #[error("Snapshot '{snapshot}' not found in '{}.' {}", .filename.display(), MISSING_SNAPSHOT_TIP)]
    SnapshotNotFound {
        /// Requested (escaped) snapshot id
        snapshot: String,
        /// Resolved artifact path
        filename: PathBuf,
    },

    /// Snapshot artifact could not be rendered or written
    #[error("Cannot write snapshot file '{}.'", .filename.display())]
    SnapshotWriteFailed {
        /// Resolved artifact path
        filename: PathBuf,
        /// Underlying render or I/O error
        #[source]
        source: BoxError,
    },

    /// Storage path could not be determined for the current test
    #[error("Invalid snapshot filename.")]
    InvalidSnapshotFilename {
        /// What the resolver produced, if anything
        filename: Option<PathBuf>,
    },

    /// Serializer chain failed or did not finish on text
    #[error("The provided serializers did not generate a string.")]
    SerializerOutput {
        /// Value that entered the pipeline
        input: serde_json::Value,
        /// Failure raised by a serializer step, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Raw value could not be converted into the pipeline's value model
    #[error("The provided value of type '{type_name}' could not be converted for serialization.")]
    ValueConversion {
        /// Rust type name of the rejected value
        type_name: &'static str,
        /// Underlying conversion error
        #[source]
        source: serde_json::Error,
    },

    /// Freshly serialized value differs from the stored snapshot
    #[error("{0}")]
    SnapshotMismatch(Box<Mismatch>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Error kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgType { .. } => ErrorKind::InvalidArgType,
            Error::InvalidArgValue { .. } => ErrorKind::InvalidArgValue,
            Error::SnapshotFileMissing { .. }
            | Error::SnapshotFileUnreadable { .. }
            | Error::SnapshotNotFound { .. }
            | Error::SnapshotWriteFailed { .. }
            | Error::InvalidSnapshotFilename { .. }
            | Error::SerializerOutput { .. }
            | Error::ValueConversion { .. } => ErrorKind::InvalidState,
            Error::SnapshotMismatch(_) => ErrorKind::Assertion,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Stable error code, e.g. `ERR_INVALID_STATE`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Artifact path this error refers to, if any.
    pub fn filename(&self) -> Option<&Path> {
        match self {
            Error::SnapshotFileMissing { filename, .. }
            | Error::SnapshotFileUnreadable { filename, .. }
            | Error::SnapshotNotFound { filename, .. }
            | Error::SnapshotWriteFailed { filename, .. } => Some(filename),
            Error::InvalidSnapshotFilename { filename } => filename.as_deref(),
            Error::SnapshotMismatch(mismatch) => Some(&mismatch.filename),
            _ => None,
        }
    }

    /// Snapshot id this error refers to, if any.
    pub fn snapshot_id(&self) -> Option<&str> {
        match self {
            Error::SnapshotNotFound { snapshot, .. } => Some(snapshot),
            Error::SnapshotMismatch(mismatch) => Some(&mismatch.snapshot),
            _ => None,
        }
    }

    /// Whether rerunning in record mode is the expected fix.
    pub fn is_missing_snapshot(&self) -> bool {
        matches!(
            self,
            Error::SnapshotFileMissing { .. } | Error::SnapshotNotFound { .. }
        )
    }

    /// Build an [`Error::InvalidArgType`].
    pub fn invalid_arg_type(
        name: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Error::InvalidArgType {
            name: name.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    /// Build an [`Error::InvalidArgValue`].
    pub fn invalid_arg_value(
        name: impl Into<String>,
        reason: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Error::InvalidArgValue {
            name: name.into(),
            reason: reason.into(),
            received: received.into(),
        }
    }
}

fn noun(name: &str) -> &'static str {
    if name.contains('.') || name.contains('[') {
        "property"
    } else {
        "argument"
    }
}

/// Details of a failed snapshot comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Snapshot id that was compared
    pub snapshot: String,
    /// Artifact the expected value came from
    pub filename: PathBuf,
    /// Stored value
    pub expected: String,
    /// Freshly serialized value
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Snapshot '{}' does not match '{}'. Expected values to be strictly equal:",
            self.snapshot,
            self.filename.display()
        )?;
        if self.differs_only_in_line_endings() {
            writeln!(f, "Values differ only in line endings (\\r shown literally).")?;
        }
        writeln!(f, "+ actual - expected")?;

        let expected: Vec<String> = visible_lines(&self.expected);
        let actual: Vec<String> = visible_lines(&self.actual);
        for i in 0..expected.len().max(actual.len()) {
            match (expected.get(i), actual.get(i)) {
                (Some(e), Some(a)) if e == a => writeln!(f, "  {e}")?,
                (e, a) => {
                    if let Some(a) = a {
                        writeln!(f, "+ {a}")?;
                    }
                    if let Some(e) = e {
                        writeln!(f, "- {e}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Mismatch {
    /// Whether the values are equal once `\r\n` is read as `\n`.
    pub fn differs_only_in_line_endings(&self) -> bool {
        self.expected != self.actual
            && self.expected.replace("\r\n", "\n") == self.actual.replace("\r\n", "\n")
    }
}

// Split on '\n' only so a stray '\r' stays on its line and is printed as `\r`.
fn visible_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|line| line.replace('\r', "\\r")).collect()
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
