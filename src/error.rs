//! Structured error types for font loading and subsetting.
//!
//! Errors fall into four groups: missing resources (files, glyphs, collection
//! entries), malformed input (bad container tags, corrupt tables, bad numeric
//! suffixes), I/O failures, and unsupported font flavors.

use std::num::ParseIntError;
use std::path::PathBuf;

/// The unified error type returned by the public font API.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// A font file named by path does not exist.
    #[error("Font file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A font file exists but could not be read.
    #[error("Failed to read font file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data is not a TrueType collection (`ttcf` tag missing or header truncated).
    #[error("Invalid TrueType collection file: {0}")]
    InvalidCollection(String),

    /// A collection subfont index is past the end of the collection.
    #[error("Font index {index} out of range (collection has {count} fonts)")]
    IndexOutOfRange { index: u32, count: u32 },

    /// A `name.ttc,N` font name whose index is not a number.
    #[error("Bad numeric format in font name '{name}': {source}")]
    BadNumericFormat {
        name: String,
        #[source]
        source: ParseIntError,
    },

    /// The sfnt parser rejected the font data.
    #[error("Invalid font format: {0}")]
    InvalidFormat(String),

    /// A table required for the requested operation is absent.
    #[error("Missing {0} table")]
    MissingTable(&'static str),

    /// A table is present but its contents are inconsistent.
    #[error("Malformed {table} table: {reason}")]
    MalformedTable { table: &'static str, reason: String },

    /// A glyph id beyond the font's glyph count.
    #[error("Glyph {gid} out of range (font has {count} glyphs)")]
    GlyphOutOfRange { gid: u16, count: u16 },

    #[error("Unsupported font: {0}")]
    Unsupported(String),
}

impl FontError {
    pub(crate) fn malformed(table: &'static str, reason: impl Into<String>) -> Self {
        FontError::MalformedTable {
            table,
            reason: reason.into(),
        }
    }

    /// Map an `io::Error` from reading `path`, distinguishing a missing file.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            FontError::FileNotFound(path)
        } else {
            FontError::Io { path, source }
        }
    }
}

impl From<ttf_parser::FaceParsingError> for FontError {
    fn from(e: ttf_parser::FaceParsingError) -> Self {
        FontError::InvalidFormat(e.to_string())
    }
}

pub type FontResult<T> = Result<T, FontError>;
