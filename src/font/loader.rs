//! Font loading with cache participation.
//!
//! Every TrueType program the crate hands out comes through
//! [`FontLoader::load_true_type`], which consults the cache before parsing
//! and records the result afterwards when caching is requested.

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use super::cache::FontProgramCache;
use super::key::FontCacheKey;
use super::truetype::TrueTypeProgram;
use super::FontProgram;
use crate::error::FontResult;

/// Where a font's data comes from.
#[derive(Debug, Clone)]
pub enum FontSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl FontSource {
    pub fn cache_key(&self) -> FontCacheKey {
        match self {
            FontSource::Path(path) => FontCacheKey::name(path.to_string_lossy()),
            FontSource::Bytes(data) => FontCacheKey::bytes(data),
        }
    }

    /// A short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FontSource::Path(path) => path.display().to_string(),
            FontSource::Bytes(data) => format!("<{} bytes>", data.len()),
        }
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        FontSource::Path(path)
    }
}

impl From<Vec<u8>> for FontSource {
    fn from(data: Vec<u8>) -> Self {
        FontSource::Bytes(data.into())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FontLoader<'c> {
    cache: &'c FontProgramCache,
}

impl Default for FontLoader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader<'static> {
    /// A loader backed by the process-wide cache.
    pub fn new() -> Self {
        Self {
            cache: FontProgramCache::global(),
        }
    }
}

impl<'c> FontLoader<'c> {
    pub fn with_cache(cache: &'c FontProgramCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &'c FontProgramCache {
        self.cache
    }

    /// Load a TrueType program, optionally font `index` of a collection.
    ///
    /// With `cached`, an existing program for the same source is returned
    /// without parsing, and a fresh parse is recorded (or discarded in favour
    /// of a concurrent winner).
    pub fn load_true_type(
        &self,
        source: &FontSource,
        index: Option<u32>,
        cached: bool,
    ) -> FontResult<Arc<FontProgram>> {
        let key = match index {
            Some(index) => source.cache_key().indexed(index),
            None => source.cache_key(),
        };
        if cached {
            if let Some(program) = self.cache.get(&key) {
                debug!("Font cache hit for {}", source.describe());
                return Ok(program);
            }
        }

        let face_index = index.unwrap_or(0);
        let program = match source {
            FontSource::Path(path) => TrueTypeProgram::from_path(path, face_index)?,
            FontSource::Bytes(data) => TrueTypeProgram::from_bytes(Arc::clone(data), face_index)?,
        };
        let program = Arc::new(FontProgram::TrueType(program));

        Ok(if cached {
            self.cache.save(program, key)
        } else {
            program
        })
    }
}
