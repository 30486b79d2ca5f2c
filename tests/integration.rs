//! Integration tests for the font pipeline.
//!
//! These tests go through the public API only, from a font request to
//! subset bytes. They verify:
//! - Requests by name, path, bytes and collection entry resolve correctly
//! - The cache hands out one program per font source, across threads
//! - Collections validate their header and index
//! - Subset output is a valid sfnt that keeps the requested outlines

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

use forme_fonts::font::glyph_names;
use forme_fonts::font::sfnt::{table_checksum, write_font, CHECKSUM_MAGIC};
use forme_fonts::font::{FontLoader, StandardFont};
use forme_fonts::{
    FontCacheKey, FontError, FontNameResolver, FontProgramCache, SubsetOptions, TrueTypeCollection,
    TrueTypeProgram,
};
use pretty_assertions::assert_eq;

// ─── Helpers ────────────────────────────────────────────────────

/// A four-glyph TrueType font: 0 and 1 simple, 2 a composite of 1, 3 empty.
fn make_font(post_script_name: &str, weight: u16) -> Vec<u8> {
    write_font(0x00010000, font_tables(post_script_name, weight))
}

fn simple_glyph(seed: u8) -> Vec<u8> {
    let mut glyph = vec![0, 1, 0, 0, 0, 0, 0, 100, 2, 0xBC];
    glyph.extend_from_slice(&[0, 2, 0, 0, seed, seed, 0, 0]);
    glyph
}

fn composite_glyph(component: u16) -> Vec<u8> {
    let mut glyph = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 100, 2, 0xBC];
    glyph.extend_from_slice(&0x0003u16.to_be_bytes());
    glyph.extend_from_slice(&component.to_be_bytes());
    glyph.extend_from_slice(&[0, 5, 0, 5]);
    glyph
}

fn font_tables(post_script_name: &str, weight: u16) -> Vec<([u8; 4], Vec<u8>)> {
    let glyphs = [simple_glyph(1), simple_glyph(2), composite_glyph(1), Vec::new()];
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for glyph in &glyphs {
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
        glyf.extend_from_slice(glyph);
    }
    loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&2048u16.to_be_bytes());
    head[50..52].copy_from_slice(&1i16.to_be_bytes());

    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
    hhea[34..36].copy_from_slice(&4u16.to_be_bytes());

    let mut hmtx = Vec::new();
    for (advance, lsb) in [(1000u16, 0i16), (1200, 10), (1200, 20), (600, 0)] {
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&lsb.to_be_bytes());
    }

    let mut maxp = 0x00005000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&(glyphs.len() as u16).to_be_bytes());

    let mut os2 = vec![0u8; 78];
    os2[4..6].copy_from_slice(&weight.to_be_bytes());

    vec![
        (*b"glyf", glyf),
        (*b"head", head),
        (*b"hhea", hhea),
        (*b"hmtx", hmtx),
        (*b"loca", loca),
        (*b"maxp", maxp),
        (*b"name", name_table(post_script_name)),
        (*b"OS/2", os2),
    ]
}

fn name_table(post_script_name: &str) -> Vec<u8> {
    let records = [(1u16, "Integration Sans"), (2, "Regular"), (6, post_script_name)];
    let mut data = Vec::new();
    let mut strings = Vec::new();
    for v in [0u16, records.len() as u16, 6 + 12 * records.len() as u16] {
        data.extend_from_slice(&v.to_be_bytes());
    }
    for (name_id, value) in records {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        for v in [3u16, 1, 0x0409, name_id, encoded.len() as u16, strings.len() as u16] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        strings.extend_from_slice(&encoded);
    }
    data.extend_from_slice(&strings);
    data
}

/// Pack standalone fonts into a `ttcf` collection. Table offsets in a
/// collection are file-relative, so each directory is shifted by its base.
fn make_collection(fonts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"ttcf".to_vec();
    out.extend_from_slice(&0x00010000u32.to_be_bytes());
    out.extend_from_slice(&(fonts.len() as u32).to_be_bytes());

    let mut base = 12 + 4 * fonts.len();
    let mut bodies = Vec::new();
    for font in fonts {
        out.extend_from_slice(&(base as u32).to_be_bytes());
        let mut body = font.clone();
        let num_tables = u16::from_be_bytes([body[4], body[5]]) as usize;
        for i in 0..num_tables {
            let at = 12 + i * 16 + 8;
            let offset = u32::from_be_bytes([body[at], body[at + 1], body[at + 2], body[at + 3]]);
            body[at..at + 4].copy_from_slice(&(offset + base as u32).to_be_bytes());
        }
        base += body.len();
        bodies.push(body);
    }
    for body in bodies {
        out.extend_from_slice(&body);
    }
    out
}

// ─── Resolver Tests ─────────────────────────────────────────────

#[test]
fn test_resolve_standard_font() {
    let cache = FontProgramCache::new();
    let resolver = FontNameResolver::with_cache(&cache);
    let names = resolver.resolve(Some("Times-Italic"), None).unwrap().unwrap();
    assert_eq!(names.font_name(), "Times-Italic");
    assert_eq!(names.family_name_lower(), "times");
    assert!(names.italic_angle() < 0.0);
    assert_eq!(
        cache
            .get(&FontCacheKey::name("Times-Italic"))
            .unwrap()
            .font_names(),
        StandardFont::TimesItalic.names()
    );
}

#[test]
fn test_resolve_font_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("IntegrationSans.ttf");
    std::fs::write(&path, make_font("IntegrationSans-Regular", 400)).unwrap();
    let name = path.to_str().unwrap();

    let cache = FontProgramCache::new();
    let resolver = FontNameResolver::with_cache(&cache);
    let names = resolver.resolve(Some(name), None).unwrap().unwrap();
    assert_eq!(names.font_name(), "IntegrationSans-Regular");
    assert_eq!(names.full_name_lower(), "integration sans");

    // Second request is served from the cache even once the file is gone.
    std::fs::remove_file(&path).unwrap();
    let again = resolver.resolve(Some(name), None).unwrap().unwrap();
    assert_eq!(again, names);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_resolve_unknown_inputs() {
    let cache = FontProgramCache::new();
    let resolver = FontNameResolver::with_cache(&cache);
    assert!(resolver.resolve(Some("Wingdings"), None).unwrap().is_none());
    assert!(resolver.resolve(None, Some([0u8; 64].as_slice())).unwrap().is_none());
    assert!(matches!(
        resolver.resolve(Some("fonts/Family.ttc,x"), None),
        Err(FontError::BadNumericFormat { .. })
    ));
}

#[test]
fn test_concurrent_resolution_shares_program() {
    const THREADS: usize = 8;
    let cache = Arc::new(FontProgramCache::new());
    let data = Arc::new(make_font("IntegrationSans-Bold", 700));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let data = Arc::clone(&data);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                FontNameResolver::with_cache(&cache)
                    .resolve(None, Some(data.as_slice()))
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let names = handle.join().unwrap();
        assert_eq!(names.font_name(), "IntegrationSans-Bold");
        assert_eq!(names.weight(), 700);
    }
    assert_eq!(cache.len(), 1);
}

// ─── Collection Tests ───────────────────────────────────────────

#[test]
fn test_collection_subfonts() {
    let ttc = make_collection(&[
        make_font("IntegrationSans-Regular", 400),
        make_font("IntegrationSans-Bold", 700),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("IntegrationSans.ttc");
    std::fs::write(&path, &ttc).unwrap();

    let collection = TrueTypeCollection::from_path(&path).unwrap();
    assert_eq!(collection.font_count(), 2);

    let cache = FontProgramCache::new();
    let loader = FontLoader::with_cache(&cache);
    let bold = collection.subfont_with(&loader, 1).unwrap();
    assert_eq!(bold.font_names().font_name(), "IntegrationSans-Bold");
    assert!(matches!(
        collection.subfont_with(&loader, 2),
        Err(FontError::IndexOutOfRange { index: 2, count: 2 })
    ));

    // The name form of the same entry hits the program loaded above.
    let resolver = FontNameResolver::with_cache(&cache);
    let spec = format!("{},1", path.display());
    let names = resolver.resolve(Some(spec.as_str()), None).unwrap().unwrap();
    assert_eq!(names.weight(), 700);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_collection_rejects_plain_font() {
    let err = TrueTypeCollection::from_bytes(make_font("IntegrationSans-Regular", 400)).unwrap_err();
    assert!(matches!(err, FontError::InvalidCollection(_)));

    let err = TrueTypeCollection::from_path("/no/such/dir/fonts.ttc").unwrap_err();
    assert!(matches!(err, FontError::FileNotFound(_)));
}

#[test]
fn test_collection_key_normalization() {
    assert_eq!(
        FontCacheKey::name("fonts/a.TTC,2"),
        FontCacheKey::name("fonts/a.TTC").indexed(2)
    );
    assert_ne!(
        FontCacheKey::name("fonts/a.ttc").indexed(1),
        FontCacheKey::name("fonts/a.ttc").indexed(2)
    );
}

// ─── Subset Tests ───────────────────────────────────────────────

#[test]
fn test_subset_keeps_requested_outlines() {
    let data = make_font("IntegrationSans-Regular", 400);
    let source = TrueTypeProgram::from_bytes(data.clone(), 0).unwrap();

    let result = forme_fonts::subset_font(data, [2], &SubsetOptions::default()).unwrap();
    assert_eq!(result.glyphs, BTreeSet::from([0, 1, 2]));
    assert_eq!(table_checksum(&result.data), CHECKSUM_MAGIC);

    let output = TrueTypeProgram::from_bytes(result.data, 0).unwrap();
    assert_eq!(output.num_glyphs(), 4);
    for gid in 0..3 {
        assert_eq!(output.glyph_data(gid).unwrap(), source.glyph_data(gid).unwrap());
        assert_eq!(
            output.horizontal_metric(gid).unwrap(),
            source.horizontal_metric(gid).unwrap()
        );
    }
    assert!(output.glyph_data(3).unwrap().is_empty());
    assert_eq!(output.names(), source.names());
}

#[test]
fn test_subset_with_table_trimming() {
    let data = make_font("IntegrationSans-Regular", 400);
    let options = SubsetOptions::from_json(r#"{"subsetTables": true, "keepNotdef": false}"#).unwrap();

    let result = forme_fonts::subset_font(data, [1], &options).unwrap();
    assert_eq!(result.glyphs, BTreeSet::from([1]));

    let output = TrueTypeProgram::from_bytes(result.data, 0).unwrap();
    assert_eq!(output.num_glyphs(), 2);
    assert!(output.glyph_data(0).unwrap().is_empty());
    assert_eq!(output.horizontal_metric(1).unwrap().advance, 1200);
}

#[test]
fn test_subset_rejects_bad_glyph() {
    let data = make_font("IntegrationSans-Regular", 400);
    let err = forme_fonts::subset_font(data, [4], &SubsetOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::GlyphOutOfRange { gid: 4, count: 4 }));

    let err = forme_fonts::subset_font(vec![0u8; 16], [0], &SubsetOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::InvalidFormat(_)));
}

// ─── Glyph Name Tests ───────────────────────────────────────────

#[test]
fn test_glyph_name_lookups() {
    assert_eq!(glyph_names::name_to_unicode("Aring"), Some(0x00C5));
    assert_eq!(glyph_names::unicode_to_name(0x20AC), Some("Euro"));
    assert_eq!(glyph_names::name_to_unicode("afii10017"), Some(0x0410));
    assert_eq!(glyph_names::unicode_to_name(0x0410), Some("Acyrillic"));
    assert_eq!(glyph_names::name_to_unicode("uni2603"), Some(0x2603));
    assert_eq!(glyph_names::name_to_unicode("nosuchglyph"), None);
}
