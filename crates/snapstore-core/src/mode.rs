//! Run mode of a snapshot manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Command-line flag that switches a run into record mode.
pub const UPDATE_SNAPSHOTS_FLAG: &str = "--test-update-snapshots";

/// Environment variable that switches a run into record mode.
pub const UPDATE_SNAPSHOTS_ENV: &str = "SNAPSTORE_UPDATE";

/// Whether snapshots are compared against disk or regenerated.
///
/// Fixed for the lifetime of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Compare fresh values against the stored artifact
    #[default]
    Verify,
    /// Store fresh values unconditionally and rewrite artifacts at the end of the run
    Record,
}

impl RunMode {
    /// Map an "update snapshots" flag to a mode.
    pub fn from_update_flag(update: bool) -> Self {
        if update {
            RunMode::Record
        } else {
            RunMode::Verify
        }
    }

    /// Resolve the mode from command-line arguments.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_update_flag(
            args.into_iter()
                .any(|arg| arg.as_ref() == UPDATE_SNAPSHOTS_FLAG),
        )
    }

    /// Resolve the mode from the `SNAPSTORE_UPDATE` environment variable.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(UPDATE_SNAPSHOTS_ENV).ok().as_deref())
    }

    /// Resolve the mode from a raw environment value.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let update = value
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self::from_update_flag(update)
    }

    /// Whether this is [`RunMode::Record`].
    pub fn is_record(&self) -> bool {
        matches!(self, RunMode::Record)
    }

    /// Mode name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Verify => "verify",
            RunMode::Record => "record",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verify" => Ok(RunMode::Verify),
            "record" | "update" => Ok(RunMode::Record),
            _ => Err(Error::invalid_arg_value(
                "mode",
                "must be one of 'verify' or 'record'",
                format!("'{s}'"),
            )),
        }
    }
}
