//! Operator commands over snapshot artifacts.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, error};

use snapstore_core::{escape_template, unescape_template, RunMode};
use snapstore_manager::SnapshotFile;

use crate::cli::Command;

/// Run a parsed command, writing its output to `out`.
///
/// Returns `Ok(false)` when the command ran but found a problem that should
/// produce a non-zero exit status.
pub fn run(command: &Command, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::List { artifact, filter } => list(artifact, filter.as_deref(), out),
        Command::Show { artifact, id, raw } => show(artifact, id, *raw, out),
        Command::Check { artifacts } => check(artifacts, out),
    }
}

fn load(artifact: &Path) -> snapstore_core::Result<SnapshotFile> {
    let mut file = SnapshotFile::new(artifact.to_path_buf(), artifact.to_path_buf(), RunMode::Verify);
    file.read_file()?;
    Ok(file)
}

/// Print the unescaped ids stored in `artifact`, optionally filtered.
pub fn list(artifact: &Path, filter: Option<&str>, out: &mut impl Write) -> Result<bool> {
    let filter = filter
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter pattern")?;
    let file = load(artifact)?;

    let mut shown = 0;
    for id in file.ids().map(unescape_template) {
        if filter.as_ref().map_or(true, |re| re.is_match(&id)) {
            writeln!(out, "{id}")?;
            shown += 1;
        }
    }
    debug!("Listed {} of {} snapshot(s)", shown, file.len());

    Ok(true)
}

/// Print one stored value.
///
/// Unless `raw` is set, the value is unescaped and the newline that wraps
/// every serialized snapshot is dropped.
pub fn show(artifact: &Path, id: &str, raw: bool, out: &mut impl Write) -> Result<bool> {
    let file = load(artifact)?;
    let value = file.get_snapshot(&escape_template(id))?;

    if raw {
        write!(out, "{value}")?;
    } else {
        let value = unescape_template(value);
        let value = value.strip_prefix('\n').unwrap_or(&value);
        writeln!(out, "{}", value.strip_suffix('\n').unwrap_or(value))?;
    }

    Ok(true)
}

/// Validate each artifact, printing its entry count or the reason it failed.
pub fn check(artifacts: &[impl AsRef<Path>], out: &mut impl Write) -> Result<bool> {
    let mut ok = true;

    for artifact in artifacts {
        let artifact = artifact.as_ref();
        match load(artifact) {
            Ok(file) => writeln!(out, "ok      {} ({} snapshots)", artifact.display(), file.len())?,
            Err(err) => {
                error!("Snapshot artifact '{}' failed validation", artifact.display());
                let cause = std::error::Error::source(&err)
                    .map(|cause| format!(": {cause}"))
                    .unwrap_or_default();
                writeln!(out, "FAILED  {}: {err}{cause}", artifact.display())?;
                ok = false;
            }
        }
    }

    Ok(ok)
}
