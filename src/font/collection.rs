//! # TrueType Collections
//!
//! A `.ttc` file bundles several sfnt fonts that share table data. The
//! collection header is validated up front; individual fonts are parsed only
//! when asked for through [`TrueTypeCollection::subfont`].

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use super::loader::{FontLoader, FontSource};
use super::FontProgram;
use crate::error::{FontError, FontResult};

const COLLECTION_TAG: &[u8; 4] = b"ttcf";
const HEADER_SIZE: usize = 12;

#[derive(Debug, Clone)]
pub struct TrueTypeCollection {
    source: FontSource,
    font_count: u32,
    cached: bool,
}

impl TrueTypeCollection {
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> FontResult<Self> {
        let data: Arc<[u8]> = data.into();
        let font_count = parse_header(&data, "byte buffer")?;
        Ok(Self {
            source: FontSource::Bytes(data),
            font_count,
            cached: true,
        })
    }

    /// Open a collection file. Only the header is read here.
    pub fn from_path(path: impl AsRef<Path>) -> FontResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FontError::FileNotFound(path.to_path_buf()));
        }
        let mut header = Vec::with_capacity(HEADER_SIZE);
        File::open(path)
            .and_then(|file| file.take(HEADER_SIZE as u64).read_to_end(&mut header))
            .map_err(|e| FontError::from_io(path, e))?;

        let font_count = parse_header(&header, &path.display().to_string())?;
        Ok(Self {
            source: FontSource::Path(path.to_path_buf()),
            font_count,
            cached: true,
        })
    }

    pub fn font_count(&self) -> u32 {
        self.font_count
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Whether later [`subfont`](Self::subfont) calls go through the font
    /// cache. Fonts already returned are unaffected.
    pub fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    /// Load font `index` through the process-wide cache.
    pub fn subfont(&self, index: u32) -> FontResult<Arc<FontProgram>> {
        self.subfont_with(&FontLoader::new(), index)
    }

    pub fn subfont_with(&self, loader: &FontLoader<'_>, index: u32) -> FontResult<Arc<FontProgram>> {
        if index >= self.font_count {
            return Err(FontError::IndexOutOfRange {
                index,
                count: self.font_count,
            });
        }
        loader.load_true_type(&self.source, Some(index), self.cached)
    }
}

fn parse_header(header: &[u8], source: &str) -> FontResult<u32> {
    if header.len() < HEADER_SIZE {
        return Err(FontError::InvalidCollection(format!(
            "{}: header truncated",
            source
        )));
    }
    if &header[0..4] != COLLECTION_TAG {
        return Err(FontError::InvalidCollection(format!(
            "{}: missing ttcf tag",
            source
        )));
    }
    // Bytes 4..8 hold the version, which does not affect the layout we read.
    Ok(u32::from_be_bytes([header[8], header[9], header[10], header[11]]))
}
