//! # Forme Fonts
//!
//! Font program loading, identity caching, and TrueType subsetting for PDF
//! output.
//!
//! A PDF writer asks for fonts by name ("Helvetica", "fonts/Inter.ttf",
//! "fonts/Family.ttc,1") or by raw bytes, over and over, from many threads.
//! This crate turns each of those requests into a single shared
//! [`FontProgram`], parsed once and cached by identity, and cuts embedded
//! TrueType programs down to the glyphs a document actually uses.
//!
//! ## Architecture
//!
//! ```text
//! Font request (name / bytes / collection entry)
//!       ↓
//!   [resolver]    - Classify the request, dispatch to one loader
//!       ↓
//!   [cache]       - One program per FontCacheKey, first save wins
//!       ↓
//!   [truetype]    - Parsed sfnt: names, glyph index, metrics
//!       ↓
//!   [subset]      - Glyph closure, rebuilt tables, fresh checksums
//! ```
//!
//! [`font::glyph_names`] maps PostScript glyph names to Unicode for the
//! simple-font encodings the PDF layer writes.

pub mod error;
pub mod font;

pub use error::{FontError, FontResult};
pub use font::{
    FontCacheKey, FontNameResolver, FontNames, FontProgram, FontProgramCache, SubsetFont,
    SubsetOptions, TrueTypeCollection, TrueTypeProgram,
};

/// Subset raw TrueType bytes to `gids`.
///
/// Convenience for callers that hold font data rather than a cached
/// program. The data is parsed afresh and not cached.
pub fn subset_font(
    data: impl Into<std::sync::Arc<[u8]>>,
    gids: impl IntoIterator<Item = u16>,
    options: &SubsetOptions,
) -> FontResult<SubsetFont> {
    let program = TrueTypeProgram::from_bytes(data, 0)?;
    font::subset(&program, gids, options)
}

/// Font names for a request, resolved through the process-wide cache.
pub fn resolve_font(name: Option<&str>, bytes: Option<&[u8]>) -> FontResult<Option<FontNames>> {
    FontNameResolver::new().resolve(name, bytes)
}
