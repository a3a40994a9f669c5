//! Escaping for template-literal bodies.
//!
//! Snapshot ids and values are stored inside backtick-delimited literals that
//! would otherwise allow `${...}` interpolation. Three sequences are escaped:
//! backslash becomes `\\`, backtick becomes `` \` `` and `${` becomes `\${`.

use thiserror::Error;

/// Escape raw text so it can be embedded in a template-literal body.
///
/// # Example
/// ```
/// use snapstore_core::escape_template;
///
/// assert_eq!(escape_template("a`b"), "a\\`b");
/// assert_eq!(escape_template("${x}"), "\\${x}");
/// ```
pub fn escape_template(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_template`].
///
/// A backslash followed by any other character is kept verbatim.
pub fn unescape_template(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '`' | '$')) => out.push(next),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Why a string is not a well-formed escaped template-literal body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateBodyError {
    /// A backtick that would terminate the literal early
    #[error("unescaped backtick at byte {0}")]
    UnescapedBacktick(usize),

    /// A `${` that would start an interpolation
    #[error("unescaped interpolation at byte {0}")]
    Interpolation(usize),

    /// A trailing backslash with nothing to escape
    #[error("dangling escape at byte {0}")]
    DanglingEscape(usize),
}

/// Check that `body` can be placed between backticks unchanged.
pub fn check_template_body(body: &str) -> Result<(), TemplateBodyError> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if i + 1 >= bytes.len() {
                    return Err(TemplateBodyError::DanglingEscape(i));
                }
                // Escapes are ASCII; skipping one byte past a multi-byte char
                // lands inside it but no ASCII byte can follow there.
                i += 2;
            }
            b'`' => return Err(TemplateBodyError::UnescapedBacktick(i)),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                return Err(TemplateBodyError::Interpolation(i))
            }
            _ => i += 1,
        }
    }
    Ok(())
}
