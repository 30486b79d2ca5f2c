//! # Font Management
//!
//! Loading, identifying, caching, and subsetting font programs for PDF
//! embedding.
//!
//! A font request (a name, a path, raw bytes, or a collection entry) is
//! resolved once into a shared [`FontProgram`]. The [`cache`] guarantees at
//! most one program per distinct source; [`subset`] then cuts TrueType
//! programs down to the glyphs a document actually uses.

pub mod cache;
pub mod cid;
pub mod collection;
pub mod glyph_names;
pub mod key;
pub mod loader;
pub mod resolver;
pub mod sfnt;
pub mod standard;
pub mod subset;
pub mod truetype;
pub mod type1;

#[cfg(test)]
pub(crate) mod test_font;

pub use cache::FontProgramCache;
pub use cid::CidFont;
pub use collection::TrueTypeCollection;
pub use key::FontCacheKey;
pub use loader::{FontLoader, FontSource};
pub use resolver::FontNameResolver;
pub use standard::StandardFont;
pub use subset::{subset, SubsetFont, SubsetOptions};
pub use truetype::TrueTypeProgram;
pub use type1::Type1Metrics;

use serde::Serialize;

/// A parsed font program, shared through the cache.
#[derive(Debug)]
pub enum FontProgram {
    /// One of the 14 standard PDF fonts. No embedding needed.
    Standard(StandardFont),
    /// A Type 1 font known through its AFM or PFM metrics.
    Type1(Type1Metrics),
    /// A predefined CJK font supplied by the viewer.
    Cid(&'static CidFont),
    /// A TrueType/OpenType font that needs to be embedded.
    TrueType(TrueTypeProgram),
}

impl FontProgram {
    pub fn font_names(&self) -> FontNames {
        match self {
            FontProgram::Standard(font) => font.names(),
            FontProgram::Type1(metrics) => metrics.names().clone(),
            FontProgram::Cid(font) => font.names(),
            FontProgram::TrueType(program) => program.names().clone(),
        }
    }

    /// The TrueType program, if this is one. Only these can be subset.
    pub fn as_true_type(&self) -> Option<&TrueTypeProgram> {
        match self {
            FontProgram::TrueType(program) => Some(program),
            _ => None,
        }
    }
}

/// Descriptive names and basic style metrics of a font program.
///
/// The lower-cased keys are used for case-insensitive font matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontNames {
    font_name: String,
    style: String,
    weight: u16,
    italic_angle: f32,
    monospace: bool,
    full_name_lower: String,
    font_name_lower: String,
    family_name_lower: String,
}

impl FontNames {
    pub fn new(font_name: &str, full_name: &str, family_name: &str, style: &str, weight: u16) -> Self {
        Self {
            font_name: font_name.to_string(),
            style: style.to_string(),
            weight,
            italic_angle: 0.0,
            monospace: false,
            full_name_lower: full_name.to_lowercase(),
            font_name_lower: font_name.to_lowercase(),
            family_name_lower: family_name.to_lowercase(),
        }
    }

    /// Canonical (PostScript) font name.
    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Numeric weight class, 100..=900.
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Degrees counter-clockwise from vertical; negative for right-leaning.
    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    pub fn is_monospace(&self) -> bool {
        self.monospace
    }

    pub fn full_name_lower(&self) -> &str {
        &self.full_name_lower
    }

    pub fn font_name_lower(&self) -> &str {
        &self.font_name_lower
    }

    pub fn family_name_lower(&self) -> &str {
        &self.family_name_lower
    }

    pub(crate) fn set_italic_angle(&mut self, angle: f32) {
        self.italic_angle = angle;
    }

    pub(crate) fn set_monospace(&mut self, monospace: bool) {
        self.monospace = monospace;
    }
}
