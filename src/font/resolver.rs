//! # Font Name Resolution
//!
//! Turns a font request (a name, raw bytes, or both) into the descriptive
//! [`FontNames`] of the program behind it, loading and caching the program on
//! the way.
//!
//! Named requests are classified once and dispatched to a single loader:
//!
//! ```text
//! "Helvetica", "Times-Bold,Italic"  -> standard font
//! "fonts/Garamond.afm", "x.pfm"     -> Type 1 metrics
//! "STSong-Light"                    -> predefined CID font
//! "fonts/Inter.ttf", "x.otf"        -> TrueType / OpenType file
//! "fonts/Family.ttc,1"              -> collection entry
//! ```
//!
//! Byte-only requests try each format in turn until one parses.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use super::cache::FontProgramCache;
use super::cid::CidFont;
use super::collection::TrueTypeCollection;
use super::key::{split_collection_suffix, FontCacheKey};
use super::loader::FontLoader;
use super::standard::StandardFont;
use super::truetype::TrueTypeProgram;
use super::type1::Type1Metrics;
use super::{FontNames, FontProgram};
use crate::error::{FontError, FontResult};

/// Style suffixes a PDF font name may carry after a comma.
const STYLE_SUFFIXES: [&str; 3] = [",BoldItalic", ",Bold", ",Italic"];

/// What a font name refers to.
#[derive(Debug, Clone, PartialEq)]
enum FontKind<'a> {
    Standard(StandardFont),
    Type1Metrics(&'a str),
    Cid(&'static CidFont),
    TrueType(&'a str),
    CollectionEntry { path: &'a str, index: u32 },
}

/// One attempt at making sense of anonymous font bytes.
type BytesStrategy = fn(&[u8]) -> FontResult<FontProgram>;

const BYTES_STRATEGIES: [(&str, BytesStrategy); 3] = [
    ("TrueType", true_type_from_bytes),
    ("AFM", afm_from_bytes),
    ("PFM", pfm_from_bytes),
];

fn true_type_from_bytes(data: &[u8]) -> FontResult<FontProgram> {
    TrueTypeProgram::from_bytes(data.to_vec(), 0).map(FontProgram::TrueType)
}

fn afm_from_bytes(data: &[u8]) -> FontResult<FontProgram> {
    Type1Metrics::parse_afm(data).map(FontProgram::Type1)
}

fn pfm_from_bytes(data: &[u8]) -> FontResult<FontProgram> {
    Type1Metrics::parse_pfm(data).map(FontProgram::Type1)
}

#[derive(Debug, Clone, Copy)]
pub struct FontNameResolver<'c> {
    cache: &'c FontProgramCache,
}

impl Default for FontNameResolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FontNameResolver<'static> {
    pub fn new() -> Self {
        Self {
            cache: FontProgramCache::global(),
        }
    }
}

impl<'c> FontNameResolver<'c> {
    pub fn with_cache(cache: &'c FontProgramCache) -> Self {
        Self { cache }
    }

    /// Resolve a request to its font names.
    ///
    /// Returns `Ok(None)` when nothing is recognized: an unknown name, bytes
    /// no format accepts, or neither input. Errors only come from named
    /// requests whose target fails to load.
    pub fn resolve(&self, name: Option<&str>, bytes: Option<&[u8]>) -> FontResult<Option<FontNames>> {
        let key = match (name, bytes) {
            (Some(name), _) => FontCacheKey::name(name),
            (None, Some(data)) => FontCacheKey::bytes(data),
            (None, None) => return Ok(None),
        };
        if let Some(program) = self.cache.get(&key) {
            return Ok(Some(program.font_names()));
        }

        let program = match name {
            Some(name) => self.load_named(name, bytes)?,
            None => bytes.and_then(load_anonymous).map(Arc::new),
        };
        Ok(program.map(|program| self.cache.save(program, key).font_names()))
    }

    fn load_named(&self, name: &str, bytes: Option<&[u8]>) -> FontResult<Option<Arc<FontProgram>>> {
        let Some(kind) = classify(name)? else {
            debug!("No font known by the name {}", name);
            return Ok(None);
        };

        let program = match kind {
            FontKind::Standard(font) => FontProgram::Standard(font),
            FontKind::Cid(font) => FontProgram::Cid(font),
            FontKind::Type1Metrics(path) => {
                let data = match bytes {
                    Some(data) => data.to_vec(),
                    None => read_file(path)?,
                };
                let metrics = if has_extension(path, "pfm") {
                    Type1Metrics::parse_pfm(&data)?
                } else {
                    Type1Metrics::parse_afm(&data)?
                };
                FontProgram::Type1(metrics)
            }
            FontKind::TrueType(path) => {
                let program = match bytes {
                    Some(data) => TrueTypeProgram::from_bytes(data.to_vec(), 0)?,
                    None => TrueTypeProgram::from_path(path, 0)?,
                };
                FontProgram::TrueType(program)
            }
            FontKind::CollectionEntry { path, index } => {
                let collection = match bytes {
                    Some(data) => TrueTypeCollection::from_bytes(data.to_vec())?,
                    None => TrueTypeCollection::from_path(path)?,
                };
                return collection
                    .subfont_with(&FontLoader::with_cache(self.cache), index)
                    .map(Some);
            }
        };
        Ok(Some(Arc::new(program)))
    }
}

fn load_anonymous(data: &[u8]) -> Option<FontProgram> {
    BYTES_STRATEGIES.iter().find_map(|(format, strategy)| match strategy(data) {
        Ok(program) => Some(program),
        Err(e) => {
            debug!("Font bytes are not {}: {}", format, e);
            None
        }
    })
}

fn classify(name: &str) -> FontResult<Option<FontKind<'_>>> {
    if let Some((path, index)) = split_collection_suffix(name) {
        let index = index.parse().map_err(|source| FontError::BadNumericFormat {
            name: name.to_string(),
            source,
        })?;
        return Ok(Some(FontKind::CollectionEntry { path, index }));
    }
    if has_extension(name, "ttc") {
        return Ok(Some(FontKind::CollectionEntry {
            path: name,
            index: 0,
        }));
    }
    if has_extension(name, "afm") || has_extension(name, "pfm") {
        return Ok(Some(FontKind::Type1Metrics(name)));
    }
    if has_extension(name, "ttf") || has_extension(name, "otf") {
        return Ok(Some(FontKind::TrueType(name)));
    }

    let base = strip_style_suffix(name);
    if let Some(font) = StandardFont::from_name(base) {
        return Ok(Some(FontKind::Standard(font)));
    }
    Ok(CidFont::find(base).map(FontKind::Cid))
}

fn strip_style_suffix(name: &str) -> &str {
    STYLE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn read_file(path: &str) -> FontResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| FontError::from_io(path, e))
}
