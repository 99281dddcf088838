//! Exam file content parsing.
//!
//! Two formats are accepted: strict JSON (`.json`) and JSON-with-comments
//! (`.jsonc`, which also tolerates trailing commas). Both parse into a
//! generic `serde_json::Value`, preserving nesting as written.

use serde_json::Value;
use thiserror::Error;

/// Content format, derived from a file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Strict JSON grammar.
    Json,
    /// JSON plus comments and trailing commas.
    Jsonc,
}

impl Format {
    /// Map a file extension to a format.
    ///
    /// The match is case-sensitive: `file.JSON` is not an exam file.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "jsonc" => Some(Self::Jsonc),
            _ => None,
        }
    }
}

/// Content parse failure. The aggregator wraps this with the file path.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSONC: {0}")]
    Jsonc(#[from] jsonc_parser::errors::ParseError),
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("no JSON value found")]
    NoValue,
}

/// Parse raw file content into a generic JSON value.
///
/// All-or-nothing: either the whole document parses or an error comes back.
/// A relaxed document that contains only whitespace and comments carries no
/// value and is rejected as [`ParseError::NoValue`].
pub fn parse(bytes: &[u8], format: Format) -> Result<Value, ParseError> {
    match format {
        Format::Json => Ok(serde_json::from_slice(bytes)?),
        Format::Jsonc => {
            let text = std::str::from_utf8(bytes)?;
            let options = jsonc_parser::ParseOptions::default();
            jsonc_parser::parse_to_serde_value(text, &options)?.ok_or(ParseError::NoValue)
        }
    }
}
