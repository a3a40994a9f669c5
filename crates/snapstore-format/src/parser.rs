//! Parser for snapshot artifacts.
//!
//! Grammar (whitespace, `//` and `/* */` comments allowed between tokens):
//!
//! ```text
//! artifact := binding*
//! binding  := "exports" "[" template "]" "=" template ";"
//! template := "`" body "`"
//! ```
//!
//! A body may contain any character except an unescaped backtick or an
//! unescaped `${`. Bodies are returned still escaped, with `\r\n` and lone
//! `\r` read as `\n` so artifacts checked out with CRLF line endings still
//! match. A
//! leading UTF-8 byte order mark is ignored.

use thiserror::Error;
use tracing::warn;

use snapstore_core::TemplateBodyError;

use crate::Snapshots;

/// Why an artifact could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorReason {
    /// A specific token was expected
    #[error("expected {0}")]
    Expected(&'static str),

    /// Template literal ran into end of input
    #[error("unterminated template literal")]
    UnterminatedLiteral,

    /// Block comment ran into end of input
    #[error("unterminated comment")]
    UnterminatedComment,

    /// Template body is not a plain string
    #[error("{0}")]
    InvalidBody(TemplateBodyError),
}

/// Malformed artifact, with the position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed snapshot file: {reason} at line {line}, column {column}")]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// 1-based column (in characters)
    pub column: usize,
    /// What went wrong
    pub reason: ParseErrorReason,
}

/// Parse artifact text into its snapshot map.
///
/// # Example
/// ```
/// use snapstore_format::parse_artifact;
///
/// let snapshots = parse_artifact("exports[`foo 1`] = `\n5\n`;\n").unwrap();
/// assert_eq!(snapshots["foo 1"], "\n5\n");
/// ```
pub fn parse_artifact(src: &str) -> Result<Snapshots, ParseError> {
    ArtifactParser::new(src).parse()
}

/// Cursor-based artifact parser.
#[derive(Debug)]
pub struct ArtifactParser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> ArtifactParser<'a> {
    /// Create a parser over `src`.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Parse all bindings.
    pub fn parse(mut self) -> Result<Snapshots, ParseError> {
        let mut snapshots = Snapshots::new();

        if self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }

        loop {
            self.skip_trivia()?;
            if self.is_eof() {
                break;
            }

            let (key, value) = self.binding()?;
            if snapshots.contains_key(&key) {
                warn!("Duplicate snapshot '{}' in artifact, keeping the last value", key);
            }
            snapshots.insert(key, value);
        }

        Ok(snapshots)
    }

    fn binding(&mut self) -> Result<(String, String), ParseError> {
        self.expect("exports", "'exports'")?;
        self.skip_trivia()?;
        self.expect("[", "'['")?;
        self.skip_trivia()?;
        let key = self.template()?;
        self.skip_trivia()?;
        self.expect("]", "']'")?;
        self.skip_trivia()?;
        self.expect("=", "'='")?;
        self.skip_trivia()?;
        let value = self.template()?;
        self.skip_trivia()?;
        self.expect(";", "';'")?;
        Ok((key, value))
    }

    fn template(&mut self) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column);
        self.expect("`", "template literal")?;

        let start = self.pos;
        loop {
            let at = (self.line, self.column);
            match self.bump() {
                None => {
                    return Err(ParseError {
                        line,
                        column,
                        reason: ParseErrorReason::UnterminatedLiteral,
                    })
                }
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(ParseError {
                            line,
                            column,
                            reason: ParseErrorReason::UnterminatedLiteral,
                        });
                    }
                }
                Some('`') => break,
                Some('$') if self.peek() == Some('{') => {
                    return Err(ParseError {
                        line: at.0,
                        column: at.1,
                        reason: ParseErrorReason::InvalidBody(TemplateBodyError::Interpolation(
                            self.pos - 1 - start,
                        )),
                    })
                }
                Some(_) => {}
            }
        }

        // Closing backtick is one byte.
        let body = &self.src[start..self.pos - 1];
        if body.contains('\r') {
            Ok(body.replace("\r\n", "\n").replace('\r', "\n"))
        } else {
            Ok(body.to_string())
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.rest().starts_with("//") => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.rest().starts_with("/*") => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        if self.rest().starts_with("*/") {
                            self.bump();
                            self.bump();
                            break;
                        }
                        if self.bump().is_none() {
                            return Err(ParseError {
                                line,
                                column,
                                reason: ParseErrorReason::UnterminatedComment,
                            });
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, token: &str, what: &'static str) -> Result<(), ParseError> {
        if !self.rest().starts_with(token) {
            return Err(ParseError {
                line: self.line,
                column: self.column,
                reason: ParseErrorReason::Expected(what),
            });
        }
        for _ in token.chars() {
            self.bump();
        }
        Ok(())
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}
