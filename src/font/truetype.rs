//! # TrueType Programs
//!
//! A parsed TrueType/OpenType font, standalone or taken from a collection.
//! ttf-parser validates the container and reads names and style metrics;
//! raw table bytes are kept so the subsetter can copy them exactly.
//!
//! The glyph index (`loca` offsets and metric counts) is materialized on
//! first use, or eagerly through [`TrueTypeProgram::load_tables`].

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use super::sfnt::{read_i16, read_u16, read_u32, TableRecord, Tag};
use super::FontNames;
use crate::error::{FontError, FontResult};

// Composite glyph component flags.
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Size of the glyph header (numberOfContours + bounding box).
const GLYPH_HEADER_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    Short,
    Long,
}

/// One advance + side bearing pair from `hmtx` or `vmtx`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl LongMetric {
    pub fn to_bytes(self) -> [u8; 4] {
        let [a0, a1] = self.advance.to_be_bytes();
        let [s0, s1] = self.side_bearing.to_be_bytes();
        [a0, a1, s0, s1]
    }
}

#[derive(Debug)]
struct GlyphIndex {
    loca_format: LocaFormat,
    /// `num_glyphs + 1` byte offsets into `glyf`; empty without `glyf`.
    loca: Vec<u32>,
    num_h_metrics: u16,
}

#[derive(Debug)]
pub struct TrueTypeProgram {
    data: Arc<[u8]>,
    index: u32,
    directory_offset: u32,
    sfnt_version: u32,
    tables: Vec<TableRecord>,
    num_glyphs: u16,
    names: FontNames,
    glyph_index: OnceCell<GlyphIndex>,
}

impl TrueTypeProgram {
    /// Parse font `index` of `data` (0 for a plain sfnt).
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, index: u32) -> FontResult<Self> {
        let data: Arc<[u8]> = data.into();
        let face = ttf_parser::Face::parse(&data, index)?;
        let raw = face.raw_face();

        let mut tables = Vec::new();
        for record in raw.table_records {
            let tag = record.tag.to_bytes();
            let end = record.offset as usize + record.length as usize;
            if end > data.len() {
                return Err(FontError::InvalidFormat(format!(
                    "table {} extends past the end of the file",
                    String::from_utf8_lossy(&tag)
                )));
            }
            tables.push(TableRecord {
                tag,
                checksum: record.check_sum,
                offset: record.offset,
                length: record.length,
            });
        }

        let directory_offset = if data.starts_with(b"ttcf") {
            read_u32(&data, 12 + 4 * index as usize)
                .ok_or_else(|| FontError::InvalidCollection("offset table truncated".into()))?
        } else {
            0
        };
        let sfnt_version = read_u32(&data, directory_offset as usize)
            .ok_or_else(|| FontError::InvalidFormat("table directory truncated".into()))?;

        let names = read_names(&face);
        let num_glyphs = face.number_of_glyphs();
        drop(face);

        let mut program = Self {
            data,
            index,
            directory_offset,
            sfnt_version,
            tables,
            num_glyphs,
            names,
            glyph_index: OnceCell::new(),
        };
        program.correct_names();
        debug!(
            "Parsed TrueType program {} ({} glyphs, {} tables)",
            program.names.font_name(),
            program.num_glyphs,
            program.tables.len()
        );
        Ok(program)
    }

    /// Read and parse a font file. The file is closed before parsing starts.
    pub fn from_path(path: impl AsRef<Path>, index: u32) -> FontResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| FontError::from_io(path, e))?;
        Self::from_bytes(data, index)
    }

    /// Apply metrics that describe the font better than its name records.
    fn correct_names(&mut self) {
        if let Some(angle) = self.table(b"post").and_then(|post| read_u32(post, 4)) {
            self.names.set_italic_angle(angle as i32 as f32 / 65536.0);
        }
        let single_advance = self
            .table(b"hhea")
            .and_then(|hhea| read_u16(hhea, 34))
            .is_some_and(|n| n == 1 && self.num_glyphs > 1);
        if single_advance {
            self.names.set_monospace(true);
        }
    }

    pub fn names(&self) -> &FontNames {
        &self.names
    }

    /// The whole file the program was parsed from.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index within a collection; 0 for a plain sfnt.
    pub fn collection_index(&self) -> u32 {
        self.index
    }

    /// Offset of this font's table directory within [`data`](Self::data).
    pub fn directory_offset(&self) -> u32 {
        self.directory_offset
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn table_records(&self) -> &[TableRecord] {
        &self.tables
    }

    pub fn table(&self, tag: &Tag) -> Option<&[u8]> {
        let record = self.tables.iter().find(|r| &r.tag == tag)?;
        let start = record.offset as usize;
        self.data.get(start..start + record.length as usize)
    }

    fn require_table(&self, tag: &'static str) -> FontResult<&[u8]> {
        let bytes: &Tag = tag
            .as_bytes()
            .try_into()
            .map_err(|_| FontError::MissingTable(tag))?;
        self.table(bytes).ok_or(FontError::MissingTable(tag))
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    pub fn has_glyph_outlines(&self) -> bool {
        self.table(b"glyf").is_some()
    }

    /// Materialize the glyph index now rather than on first glyph access.
    pub fn load_tables(&self) -> FontResult<()> {
        self.glyph_index().map(|_| ())
    }

    pub fn loca_format(&self) -> FontResult<LocaFormat> {
        Ok(self.glyph_index()?.loca_format)
    }

    /// Number of long metrics in `hmtx` (`hhea.numberOfHMetrics`).
    pub fn num_h_metrics(&self) -> FontResult<u16> {
        Ok(self.glyph_index()?.num_h_metrics)
    }

    fn glyph_index(&self) -> FontResult<&GlyphIndex> {
        self.glyph_index.get_or_try_init(|| self.build_glyph_index())
    }

    fn build_glyph_index(&self) -> FontResult<GlyphIndex> {
        let head = self.require_table("head")?;
        let loca_format = match read_i16(head, 50) {
            Some(0) => LocaFormat::Short,
            Some(1) => LocaFormat::Long,
            other => {
                return Err(FontError::malformed(
                    "head",
                    format!("indexToLocFormat {:?}", other),
                ))
            }
        };
        let num_h_metrics = read_u16(self.require_table("hhea")?, 34)
            .ok_or_else(|| FontError::malformed("hhea", "table truncated"))?;

        let loca = match (self.table(b"glyf"), self.table(b"loca")) {
            (Some(glyf), Some(loca)) => parse_loca(loca, loca_format, self.num_glyphs, glyf.len())?,
            (Some(_), None) => return Err(FontError::MissingTable("loca")),
            (None, _) => Vec::new(),
        };

        Ok(GlyphIndex {
            loca_format,
            loca,
            num_h_metrics,
        })
    }

    fn check_gid(&self, gid: u16) -> FontResult<()> {
        if gid < self.num_glyphs {
            Ok(())
        } else {
            Err(FontError::GlyphOutOfRange {
                gid,
                count: self.num_glyphs,
            })
        }
    }

    /// Raw outline record of a glyph; empty for glyphs without contours.
    pub fn glyph_data(&self, gid: u16) -> FontResult<&[u8]> {
        self.check_gid(gid)?;
        let index = self.glyph_index()?;
        let glyf = self.require_table("glyf")?;
        let start = index.loca[gid as usize] as usize;
        let end = index.loca[gid as usize + 1] as usize;
        Ok(&glyf[start..end])
    }

    /// Glyph ids a composite glyph is built from; empty for simple glyphs.
    pub fn component_glyphs(&self, gid: u16) -> FontResult<Vec<u16>> {
        composite_components(self.glyph_data(gid)?, gid)
    }

    /// Expand `gids` to include every glyph reachable through composite
    /// references. Each glyph is visited once, so cyclic references end.
    pub fn flat_glyphs(&self, gids: impl IntoIterator<Item = u16>) -> FontResult<BTreeSet<u16>> {
        let mut visited = BTreeSet::new();
        let mut pending = Vec::new();
        for gid in gids {
            self.check_gid(gid)?;
            if visited.insert(gid) {
                pending.push(gid);
            }
        }

        while let Some(gid) = pending.pop() {
            for component in self.component_glyphs(gid)? {
                if component >= self.num_glyphs {
                    return Err(FontError::malformed(
                        "glyf",
                        format!("glyph {} references missing glyph {}", gid, component),
                    ));
                }
                if visited.insert(component) {
                    pending.push(component);
                }
            }
        }
        Ok(visited)
    }

    /// The `hmtx` record of a glyph.
    pub fn horizontal_metric(&self, gid: u16) -> FontResult<LongMetric> {
        self.check_gid(gid)?;
        let num_h_metrics = self.glyph_index()?.num_h_metrics;
        read_long_metric(self.require_table("hmtx")?, "hmtx", num_h_metrics, gid)
    }

    /// The `vmtx` record of a glyph, if the font has vertical metrics.
    pub fn vertical_metric(&self, gid: u16) -> FontResult<Option<LongMetric>> {
        self.check_gid(gid)?;
        let (Some(vhea), Some(vmtx)) = (self.table(b"vhea"), self.table(b"vmtx")) else {
            return Ok(None);
        };
        let count = read_u16(vhea, 34).ok_or_else(|| FontError::malformed("vhea", "table truncated"))?;
        read_long_metric(vmtx, "vmtx", count, gid).map(Some)
    }
}

fn read_names(face: &ttf_parser::Face) -> FontNames {
    let name = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
    };
    let family = name(ttf_parser::name_id::TYPOGRAPHIC_FAMILY)
        .or_else(|| name(ttf_parser::name_id::FAMILY))
        .unwrap_or_default();
    let style = name(ttf_parser::name_id::SUBFAMILY).unwrap_or_else(|| "Regular".to_string());
    let full_name = name(ttf_parser::name_id::FULL_NAME).unwrap_or_else(|| family.clone());
    let font_name = name(ttf_parser::name_id::POST_SCRIPT_NAME)
        .unwrap_or_else(|| full_name.replace(' ', ""));

    let mut names = FontNames::new(&font_name, &full_name, &family, &style, face.weight().to_number());
    names.set_monospace(face.is_monospaced());
    names
}

fn parse_loca(loca: &[u8], format: LocaFormat, num_glyphs: u16, glyf_len: usize) -> FontResult<Vec<u32>> {
    let count = num_glyphs as usize + 1;
    let entry_size = match format {
        LocaFormat::Short => 2,
        LocaFormat::Long => 4,
    };
    if loca.len() < count * entry_size {
        return Err(FontError::malformed(
            "loca",
            format!("{} bytes is too short for {} glyphs", loca.len(), num_glyphs),
        ));
    }

    let mut offsets = Vec::with_capacity(count);
    for i in 0..count {
        let offset = match format {
            LocaFormat::Short => read_u16(loca, i * 2).map(|v| v as u32 * 2),
            LocaFormat::Long => read_u32(loca, i * 4),
        }
        .ok_or_else(|| FontError::malformed("loca", "table truncated"))?;

        if offset as usize > glyf_len {
            return Err(FontError::malformed(
                "loca",
                format!("offset {} of glyph {} is past the end of glyf", offset, i),
            ));
        }
        if offsets.last().is_some_and(|&prev| offset < prev) {
            return Err(FontError::malformed(
                "loca",
                format!("offsets decrease at glyph {}", i),
            ));
        }
        offsets.push(offset);
    }
    Ok(offsets)
}

/// Walk the component records of a glyph outline.
pub(crate) fn composite_components(glyph: &[u8], gid: u16) -> FontResult<Vec<u16>> {
    if glyph.is_empty() {
        return Ok(Vec::new());
    }
    let truncated = || FontError::malformed("glyf", format!("glyph {} is truncated", gid));
    let num_contours = read_i16(glyph, 0).ok_or_else(truncated)?;
    if glyph.len() < GLYPH_HEADER_SIZE {
        return Err(truncated());
    }
    if num_contours >= 0 {
        return Ok(Vec::new());
    }

    let mut components = Vec::new();
    let mut pos = GLYPH_HEADER_SIZE;
    loop {
        let flags = read_u16(glyph, pos).ok_or_else(truncated)?;
        let component = read_u16(glyph, pos + 2).ok_or_else(truncated)?;
        components.push(component);
        pos += 4;

        pos += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            pos += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            pos += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            pos += 8;
        }
        if pos > glyph.len() {
            return Err(truncated());
        }

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(components)
}

fn read_long_metric(mtx: &[u8], table: &'static str, num_long: u16, gid: u16) -> FontResult<LongMetric> {
    if num_long == 0 {
        return Err(FontError::malformed(table, "no long metrics"));
    }
    let out_of_bounds = || FontError::malformed(table, format!("no metric for glyph {}", gid));
    let num_long = num_long as usize;
    let gid = gid as usize;

    if gid < num_long {
        let advance = read_u16(mtx, gid * 4).ok_or_else(out_of_bounds)?;
        let side_bearing = read_i16(mtx, gid * 4 + 2).ok_or_else(out_of_bounds)?;
        Ok(LongMetric { advance, side_bearing })
    } else {
        let advance = read_u16(mtx, (num_long - 1) * 4).ok_or_else(out_of_bounds)?;
        let side_bearing =
            read_i16(mtx, num_long * 4 + (gid - num_long) * 2).ok_or_else(out_of_bounds)?;
        Ok(LongMetric { advance, side_bearing })
    }
}
