//! # Glyph Names
//!
//! Bidirectional glyph name ↔ Unicode lookup, after the Adobe Glyph List.
//!
//! The process-wide table is built once on first use from the list embedded
//! in the crate, or from the file named by `FORME_GLYPH_LIST` when set. A
//! resource that cannot be read leaves the table empty; lookups then fall
//! back to the `uniXXXX` naming convention only.

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, warn};
use once_cell::sync::Lazy;

/// Environment variable naming an alternate glyph list file.
pub const GLYPH_LIST_ENV: &str = "FORME_GLYPH_LIST";

const EMBEDDED_GLYPH_LIST: &str = include_str!("../../resources/glyphlist.txt");

static GLYPH_NAMES: Lazy<GlyphNameTable> = Lazy::new(|| match std::env::var_os(GLYPH_LIST_ENV) {
    Some(path) => match std::fs::File::open(&path) {
        Ok(file) => GlyphNameTable::load_or_empty(std::io::BufReader::new(file)),
        Err(e) => {
            warn!(
                "Glyph list {} could not be opened, glyph names disabled: {}",
                path.to_string_lossy(),
                e
            );
            GlyphNameTable::default()
        }
    },
    None => GlyphNameTable::load_or_empty(EMBEDDED_GLYPH_LIST.as_bytes()),
});

/// An immutable glyph name ↔ code point table.
#[derive(Debug, Clone, Default)]
pub struct GlyphNameTable {
    name_to_unicode: HashMap<String, u32>,
    unicode_to_name: HashMap<u32, String>,
}

impl GlyphNameTable {
    /// The process-wide table.
    pub fn global() -> &'static GlyphNameTable {
        &GLYPH_NAMES
    }

    /// Parse a `name;HEX` list. Lines listing several code points are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut table = GlyphNameTable::default();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, codes)) = line.split_once(';') else {
                debug!("Skipping glyph list line without separator: {:?}", line);
                continue;
            };
            let mut values = codes.split_whitespace();
            let (Some(hex), None) = (values.next(), values.next()) else {
                continue;
            };
            match u32::from_str_radix(hex, 16) {
                Ok(code) => table.insert(name.trim(), code),
                Err(e) => debug!("Skipping glyph {:?} with bad code {:?}: {}", name, hex, e),
            }
        }
        Ok(table)
    }

    /// Like [`from_reader`](Self::from_reader), but a failed read yields an
    /// empty table and a warning instead of an error.
    pub fn load_or_empty<R: BufRead>(reader: R) -> Self {
        match Self::from_reader(reader) {
            Ok(table) => table,
            Err(e) => {
                warn!("Glyph list could not be read, glyph names disabled: {}", e);
                GlyphNameTable::default()
            }
        }
    }

    fn insert(&mut self, name: &str, code: u32) {
        self.name_to_unicode.insert(name.to_string(), code);
        // First name listed for a code point is the canonical one.
        self.unicode_to_name
            .entry(code)
            .or_insert_with(|| name.to_string());
    }

    /// Look up the code point for a glyph name, falling back to `uniXXXX`.
    pub fn name_to_unicode(&self, name: &str) -> Option<u32> {
        self.name_to_unicode
            .get(name)
            .copied()
            .or_else(|| parse_uni_name(name))
    }

    pub fn unicode_to_name(&self, code: u32) -> Option<&str> {
        self.unicode_to_name.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.name_to_unicode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_unicode.is_empty()
    }

    /// Iterate over `(name, code point)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.name_to_unicode.iter().map(|(n, &c)| (n.as_str(), c))
    }
}

/// `uniXXXX` with exactly four hex digits, prefix matched case-insensitively.
fn parse_uni_name(name: &str) -> Option<u32> {
    if name.len() != 7 || !name.is_char_boundary(3) || !name[..3].eq_ignore_ascii_case("uni") {
        return None;
    }
    let hex = &name[3..];
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Look up a glyph name in the process-wide table.
pub fn name_to_unicode(name: &str) -> Option<u32> {
    GlyphNameTable::global().name_to_unicode(name)
}

/// Look up the canonical glyph name for a code point in the process-wide table.
pub fn unicode_to_name(code: u32) -> Option<&'static str> {
    GlyphNameTable::global().unicode_to_name(code)
}
