//! Font identity keys for the program cache.

use std::sync::Arc;

/// Number of leading bytes that take part in byte-source identity.
///
/// Two sources with equal length and an equal prefix of this size are
/// treated as the same font. This is an approximate identity: fonts that
/// differ only past the prefix collide.
pub const BYTES_KEY_PREFIX: usize = 10_000;

/// What uniquely identifies a font source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontCacheKey {
    /// A path, logical font name, or other string request.
    Name(String),
    /// Raw font data, identified by length and leading bytes.
    Bytes(BytesKey),
    /// A font inside a collection.
    Indexed { base: Box<FontCacheKey>, index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytesKey {
    len: usize,
    prefix: Arc<[u8]>,
}

impl FontCacheKey {
    /// Key for a named font. A `path.ttc,N` name becomes the indexed key of
    /// its collection, so it equals `FontCacheKey::name(path).indexed(N)`.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        if let Some((path, index)) = split_collection_suffix(&name) {
            if let Ok(index) = index.parse::<u32>() {
                return FontCacheKey::Name(path.to_string()).indexed(index);
            }
        }
        FontCacheKey::Name(name)
    }

    pub fn bytes(data: &[u8]) -> Self {
        let prefix = &data[..data.len().min(BYTES_KEY_PREFIX)];
        FontCacheKey::Bytes(BytesKey {
            len: data.len(),
            prefix: Arc::from(prefix),
        })
    }

    /// Wrap this key with a collection index. Indexing an already indexed
    /// key replaces its index.
    pub fn indexed(self, index: u32) -> Self {
        match self {
            FontCacheKey::Indexed { base, .. } => FontCacheKey::Indexed { base, index },
            base => FontCacheKey::Indexed {
                base: Box::new(base),
                index,
            },
        }
    }
}

/// Split `path.ttc,suffix` into `(path.ttc, suffix)`; the extension is
/// matched case-insensitively.
pub(crate) fn split_collection_suffix(name: &str) -> Option<(&str, &str)> {
    let (path, suffix) = name.rsplit_once(',')?;
    if path.len() >= 4
        && path.is_char_boundary(path.len() - 4)
        && path[path.len() - 4..].eq_ignore_ascii_case(".ttc")
    {
        Some((path, suffix))
    } else {
        None
    }
}
