//! # TrueType Font Subsetter
//!
//! Cuts a TrueType font down to the glyphs a document actually uses. A
//! typical font is 50-200KB; a subset with ~100 glyphs is usually 5-15KB.
//!
//! Glyph ids are preserved. The `cmap` is copied through unchanged, so the
//! subset still maps characters to the same ids; glyphs that were not kept
//! simply have empty outlines and zero metrics.
//!
//! ## Approach
//!
//! 1. Close the requested set over composite glyph references
//! 2. Copy outline and metric records of retained glyphs
//! 3. Rebuild `glyf`, `loca`, `hmtx`, `hhea` and `gvar` (plus `maxp`,
//!    `post`, `vmtx`, `vhea` when trimming tables)
//! 4. Write a new table directory with fresh checksums

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::sfnt::{read_u16, read_u32, write_font, write_u16, write_u32, Tag};
use super::truetype::{LocaFormat, LongMetric, TrueTypeProgram};
use crate::error::{FontError, FontResult};

const POST_FORMAT_2: u32 = 0x00020000;
const POST_FORMAT_3: u32 = 0x00030000;
/// Fixed header shared by every `post` format.
const POST_HEADER_SIZE: usize = 32;

/// Offset of `numberOfHMetrics` / `numOfLongVerMetrics` in `hhea` / `vhea`.
const METRICS_COUNT_OFFSET: usize = 34;
const MAXP_NUM_GLYPHS_OFFSET: usize = 4;

const GVAR_HEADER_SIZE: usize = 20;
const GVAR_GLYPH_COUNT_OFFSET: usize = 12;
/// `gvar` flag bit selecting 32-bit glyph variation offsets.
const GVAR_LONG_OFFSETS: u16 = 0x0001;

/// How far the subsetter trims beyond the outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubsetOptions {
    /// Also shrink the glyph count to the highest retained id and trim
    /// per-glyph tables (`maxp`, `post`, `gvar`, `vmtx`, `hdmx`, `LTSH`) to
    /// match.
    pub subset_tables: bool,
    /// Always keep glyph 0 (`.notdef`), which renderers fall back to.
    pub keep_notdef: bool,
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            subset_tables: false,
            keep_notdef: true,
        }
    }
}

impl SubsetOptions {
    /// Parse options from JSON, e.g. `{"subsetTables": true}`. Missing
    /// fields take their defaults.
    pub fn from_json(json: &str) -> FontResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FontError::InvalidFormat(format!("subset options: {}", e)))
    }
}

/// Result of subsetting a font.
#[derive(Debug, Clone)]
pub struct SubsetFont {
    /// The subset TrueType file bytes.
    pub data: Vec<u8>,
    /// Every glyph id with an outline in the subset, composites' components
    /// included.
    pub glyphs: BTreeSet<u16>,
}

/// Subset `program` to `gids` and whatever they reference.
pub fn subset(
    program: &TrueTypeProgram,
    gids: impl IntoIterator<Item = u16>,
    options: &SubsetOptions,
) -> FontResult<SubsetFont> {
    if !program.has_glyph_outlines() {
        return Err(FontError::Unsupported(format!(
            "{} has no glyf table; only TrueType outlines can be subset",
            program.names().font_name()
        )));
    }
    program.load_tables()?;

    let notdef = options.keep_notdef.then_some(0);
    let glyphs = program.flat_glyphs(gids.into_iter().chain(notdef))?;

    let num_glyphs = if options.subset_tables {
        glyphs.last().map_or(1, |&gid| gid + 1)
    } else {
        program.num_glyphs()
    };

    let (glyf, loca) = rebuild_outlines(program, &glyphs, num_glyphs)?;

    let h_metrics = collect_metrics(&glyphs, num_glyphs, |gid| program.horizontal_metric(gid))?;
    let (hmtx, num_h_metrics) = encode_metrics(&h_metrics);
    let vertical = if options.subset_tables {
        rebuild_vertical(program, &glyphs, num_glyphs)?
    } else {
        None
    };

    let mut tables: Vec<(Tag, Vec<u8>)> = Vec::new();
    for record in program.table_records() {
        let tag = record.tag;
        let source = program
            .table(&tag)
            .ok_or_else(|| FontError::InvalidFormat(format!("table {} is unreadable", record.tag_str())))?;

        let data = match &tag {
            b"glyf" => glyf.clone(),
            b"loca" => loca.clone(),
            b"hmtx" => hmtx.clone(),
            b"hhea" => with_metrics_count("hhea", source, num_h_metrics)?,
            b"DSIG" => continue,
            b"hdmx" | b"LTSH" if options.subset_tables => continue,
            b"maxp" if options.subset_tables => rebuild_maxp(source, num_glyphs)?,
            b"post" if options.subset_tables => rebuild_post(source)?,
            b"gvar" => rebuild_gvar(source, &glyphs, num_glyphs)?,
            b"vhea" | b"vmtx" if vertical.is_some() => continue,
            _ => source.to_vec(),
        };
        tables.push((tag, data));
    }

    if let Some((vhea, vmtx)) = vertical {
        tables.push((*b"vhea", vhea));
        tables.push((*b"vmtx", vmtx));
    }

    let data = write_font(program.sfnt_version(), tables);
    debug!(
        "Subset {}: kept {} of {} glyphs, {} -> {} bytes",
        program.names().font_name(),
        glyphs.len(),
        program.num_glyphs(),
        program.data().len(),
        data.len()
    );
    Ok(SubsetFont { data, glyphs })
}

// ─── Outlines ───────────────────────────────────────────────────

/// New `glyf` and `loca` tables in the source `loca` format. Retained
/// outlines are copied byte for byte, so short-format offsets stay even.
fn rebuild_outlines(
    program: &TrueTypeProgram,
    glyphs: &BTreeSet<u16>,
    num_glyphs: u16,
) -> FontResult<(Vec<u8>, Vec<u8>)> {
    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(num_glyphs as usize + 1);
    for gid in 0..num_glyphs {
        offsets.push(glyf.len() as u32);
        if glyphs.contains(&gid) {
            glyf.extend_from_slice(program.glyph_data(gid)?);
        }
    }
    offsets.push(glyf.len() as u32);

    let loca = build_loca(&offsets, program.loca_format()?);
    Ok((glyf, loca))
}

fn build_loca(offsets: &[u32], format: LocaFormat) -> Vec<u8> {
    let mut data = Vec::new();
    match format {
        LocaFormat::Short => {
            for &offset in offsets {
                data.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
            }
        }
        LocaFormat::Long => {
            for &offset in offsets {
                data.extend_from_slice(&offset.to_be_bytes());
            }
        }
    }
    data
}

// ─── Metrics ────────────────────────────────────────────────────

fn collect_metrics(
    glyphs: &BTreeSet<u16>,
    num_glyphs: u16,
    metric: impl Fn(u16) -> FontResult<LongMetric>,
) -> FontResult<Vec<LongMetric>> {
    (0..num_glyphs)
        .map(|gid| {
            if glyphs.contains(&gid) {
                metric(gid)
            } else {
                Ok(LongMetric::default())
            }
        })
        .collect()
}

/// Encode an `hmtx`/`vmtx` table. Trailing glyphs sharing the last advance
/// keep only their side bearing. Returns the table and its long-metric count.
fn encode_metrics(metrics: &[LongMetric]) -> (Vec<u8>, u16) {
    let mut num_long = metrics.len();
    while num_long > 1 && metrics[num_long - 2].advance == metrics[num_long - 1].advance {
        num_long -= 1;
    }

    let mut data = Vec::with_capacity(num_long * 4 + (metrics.len() - num_long) * 2);
    for metric in &metrics[..num_long] {
        data.extend_from_slice(&metric.to_bytes());
    }
    for metric in &metrics[num_long..] {
        data.extend_from_slice(&metric.side_bearing.to_be_bytes());
    }
    (data, num_long as u16)
}

fn with_metrics_count(table: &'static str, source: &[u8], count: u16) -> FontResult<Vec<u8>> {
    if source.len() < METRICS_COUNT_OFFSET + 2 {
        return Err(FontError::malformed(table, "table truncated"));
    }
    let mut data = source.to_vec();
    write_u16(&mut data, METRICS_COUNT_OFFSET, count);
    Ok(data)
}

fn rebuild_vertical(
    program: &TrueTypeProgram,
    glyphs: &BTreeSet<u16>,
    num_glyphs: u16,
) -> FontResult<Option<(Vec<u8>, Vec<u8>)>> {
    let Some(vhea) = program.table(b"vhea") else {
        return Ok(None);
    };
    if program.table(b"vmtx").is_none() {
        return Ok(None);
    }

    let metrics = collect_metrics(glyphs, num_glyphs, |gid| {
        Ok(program.vertical_metric(gid)?.unwrap_or_default())
    })?;
    let (vmtx, num_v_metrics) = encode_metrics(&metrics);
    let vhea = with_metrics_count("vhea", vhea, num_v_metrics)?;
    Ok(Some((vhea, vmtx)))
}

// ─── Per-glyph Tables ───────────────────────────────────────────

fn rebuild_maxp(maxp: &[u8], num_glyphs: u16) -> FontResult<Vec<u8>> {
    if maxp.len() < MAXP_NUM_GLYPHS_OFFSET + 2 {
        return Err(FontError::malformed("maxp", "table truncated"));
    }
    let mut data = maxp.to_vec();
    write_u16(&mut data, MAXP_NUM_GLYPHS_OFFSET, num_glyphs);
    Ok(data)
}

/// Variation data for retained glyphs only, indexed over `num_glyphs`. The
/// source offset format is kept and shared tuples are copied as-is.
fn rebuild_gvar(gvar: &[u8], glyphs: &BTreeSet<u16>, num_glyphs: u16) -> FontResult<Vec<u8>> {
    let truncated = || FontError::malformed("gvar", "table truncated");
    if gvar.len() < GVAR_HEADER_SIZE {
        return Err(truncated());
    }
    let axis_count = read_u16(gvar, 4).ok_or_else(truncated)? as usize;
    let shared_count = read_u16(gvar, 6).ok_or_else(truncated)? as usize;
    let shared_offset = read_u32(gvar, 8).ok_or_else(truncated)? as usize;
    let source_count = read_u16(gvar, GVAR_GLYPH_COUNT_OFFSET).ok_or_else(truncated)?;
    let flags = read_u16(gvar, 14).ok_or_else(truncated)?;
    let data_offset = read_u32(gvar, 16).ok_or_else(truncated)? as usize;
    let long_offsets = flags & GVAR_LONG_OFFSETS != 0;
    let offset_size = if long_offsets { 4 } else { 2 };

    let offset_at = |gid: u16| -> FontResult<usize> {
        let at = GVAR_HEADER_SIZE + gid as usize * offset_size;
        let offset = if long_offsets {
            read_u32(gvar, at).map(|v| v as usize)
        } else {
            read_u16(gvar, at).map(|v| v as usize * 2)
        };
        offset.map(|o| data_offset + o).ok_or_else(truncated)
    };

    let shared_len = shared_count * axis_count * 2;
    let shared = if shared_len == 0 {
        &[][..]
    } else {
        gvar.get(shared_offset..shared_offset + shared_len)
            .ok_or_else(|| FontError::malformed("gvar", "shared tuples out of bounds"))?
    };

    // Records from a short-offset table have even lengths, so the rebuilt
    // offsets stay representable in the same format.
    let mut variations = Vec::new();
    let mut offsets = Vec::with_capacity(num_glyphs as usize + 1);
    for gid in 0..num_glyphs {
        offsets.push(variations.len());
        if gid < source_count && glyphs.contains(&gid) {
            let record = gvar
                .get(offset_at(gid)?..offset_at(gid + 1)?)
                .ok_or_else(|| FontError::malformed("gvar", "glyph variation data out of bounds"))?;
            variations.extend_from_slice(record);
        }
    }
    offsets.push(variations.len());

    let new_shared_offset = GVAR_HEADER_SIZE + offsets.len() * offset_size;
    let new_data_offset = new_shared_offset + shared.len();

    let mut data = gvar[..GVAR_HEADER_SIZE].to_vec();
    write_u32(&mut data, 8, new_shared_offset as u32);
    write_u16(&mut data, GVAR_GLYPH_COUNT_OFFSET, num_glyphs);
    write_u32(&mut data, 16, new_data_offset as u32);
    for offset in offsets {
        if long_offsets {
            data.extend_from_slice(&(offset as u32).to_be_bytes());
        } else {
            data.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
        }
    }
    data.extend_from_slice(shared);
    data.extend_from_slice(&variations);
    Ok(data)
}

/// Glyph names index the full glyph range, so format 2 becomes format 3
/// (no names). Other formats carry no per-glyph data.
fn rebuild_post(post: &[u8]) -> FontResult<Vec<u8>> {
    let version = read_u32(post, 0).ok_or_else(|| FontError::malformed("post", "table truncated"))?;
    if version != POST_FORMAT_2 {
        return Ok(post.to_vec());
    }
    if post.len() < POST_HEADER_SIZE {
        return Err(FontError::malformed("post", "table truncated"));
    }
    let mut data = post[..POST_HEADER_SIZE].to_vec();
    write_u32(&mut data, 0, POST_FORMAT_3);
    Ok(data)
}

// ─── Tests ──────────────────────────────────────────────────────
