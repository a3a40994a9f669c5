//! Rendering of snapshot artifacts.

use std::fmt;

use thiserror::Error;

use snapstore_core::{check_template_body, TemplateBodyError};

use crate::Snapshots;

/// Which half of a binding failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPart {
    /// The snapshot id
    Id,
    /// The stored text
    Value,
}

impl fmt::Display for EntryPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPart::Id => f.write_str("id"),
            EntryPart::Value => f.write_str("value"),
        }
    }
}

/// A stored entry cannot be written without corrupting the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Snapshot '{key}' has an invalid {part}: {source}")]
pub struct RenderError {
    /// Key of the offending entry
    pub key: String,
    /// Part that failed
    pub part: EntryPart,
    /// Underlying body error
    #[source]
    pub source: TemplateBodyError,
}

/// Render one binding, including its trailing newline.
pub fn render_entry(key: &str, value: &str) -> Result<String, RenderError> {
    check_template_body(key).map_err(|source| RenderError {
        key: key.to_string(),
        part: EntryPart::Id,
        source,
    })?;
    check_template_body(value).map_err(|source| RenderError {
        key: key.to_string(),
        part: EntryPart::Value,
        source,
    })?;
    Ok(format!("exports[`{key}`] = `{value}`;\n"))
}

/// Render a complete artifact.
///
/// Entries appear in key order and are separated by a blank line. Nothing is
/// returned unless every entry renders.
pub fn render_artifact(snapshots: &Snapshots) -> Result<String, RenderError> {
    let entries = snapshots
        .iter()
        .map(|(key, value)| render_entry(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_artifact;

    #[test]
    fn test_render_entry() {
        assert_eq!(
            render_entry("foo 1", "\nfoo value\n").unwrap(),
            "exports[`foo 1`] = `\nfoo value\n`;\n"
        );
    }

    #[test]
    fn test_render_sorted_and_separated() {
        let mut snapshots = Snapshots::new();
        snapshots.insert("b 1".to_string(), "\n2\n".to_string());
        snapshots.insert("a 1".to_string(), "\n1\n".to_string());

        let text = render_artifact(&snapshots).unwrap();
        assert_eq!(
            text,
            "exports[`a 1`] = `\n1\n`;\n\nexports[`b 1`] = `\n2\n`;\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_artifact(&Snapshots::new()).unwrap(), "");
    }

    #[test]
    fn test_render_rejects_unescaped_value() {
        let mut snapshots = Snapshots::new();
        snapshots.insert("a 1".to_string(), "\nok\n".to_string());
        snapshots.insert("b 1".to_string(), "bad ` value".to_string());

        let err = render_artifact(&snapshots).unwrap_err();
        assert_eq!(err.key, "b 1");
        assert_eq!(err.part, EntryPart::Value);
        assert_eq!(err.source, TemplateBodyError::UnescapedBacktick(4));
    }

    #[test]
    fn test_render_rejects_unescaped_id() {
        let err = render_entry("${x} 1", "\n1\n").unwrap_err();
        assert_eq!(err.part, EntryPart::Id);
        assert!(err.to_string().contains("invalid id"));
    }

    #[test]
    fn test_parse_render_is_byte_stable() {
        let src = "exports[`a\\` 1`] = `\n\\${x}\n`;\n\nexports[`b 1`] = `\n2\n`;\n";
        let snapshots = parse_artifact(src).unwrap();
        assert_eq!(render_artifact(&snapshots).unwrap(), src);
    }
}
