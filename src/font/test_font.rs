//! Synthetic TrueType fonts for unit tests.
//!
//! The default font has 12 glyphs:
//!
//! | gid | outline |
//! |-----|---------|
//! | 0 | simple (.notdef) |
//! | 1 | empty (space) |
//! | 2, 3, 4, 6, 7, 9 | simple |
//! | 5 | composite of 7 and 9 |
//! | 8 | composite of 5 (scaled) |
//! | 10, 11 | composites referencing each other |
//!
//! Glyphs 0..8 have long metrics, glyphs 8..12 share the advance of glyph 7.

use super::sfnt::Tag;

#[derive(Debug, Clone)]
pub(crate) enum TestGlyph {
    Empty,
    Simple,
    /// `(component gid, scaled)`
    Composite(Vec<(u16, bool)>),
}

#[derive(Debug, Clone)]
pub(crate) struct TestFont {
    pub glyphs: Vec<TestGlyph>,
    pub num_h_metrics: u16,
    pub long_loca: bool,
    pub family: String,
    pub subfamily: String,
    pub post_script_name: String,
    pub weight: u16,
    /// 16.16 fixed.
    pub italic_angle: i32,
    pub fixed_pitch: bool,
    pub post_format_2: bool,
    pub vertical_metrics: bool,
    pub extra_tables: Vec<(Tag, Vec<u8>)>,
}

impl Default for TestFont {
    fn default() -> Self {
        use TestGlyph::*;
        Self {
            glyphs: vec![
                Simple,
                Empty,
                Simple,
                Simple,
                Simple,
                Composite(vec![(7, false), (9, false)]),
                Simple,
                Simple,
                Composite(vec![(5, true)]),
                Simple,
                Composite(vec![(11, false)]),
                Composite(vec![(10, false)]),
            ],
            num_h_metrics: 8,
            long_loca: false,
            family: "Forme Test".to_string(),
            subfamily: "Regular".to_string(),
            post_script_name: "FormeTest-Regular".to_string(),
            weight: 400,
            italic_angle: 0,
            fixed_pitch: false,
            post_format_2: false,
            vertical_metrics: false,
            extra_tables: Vec::new(),
        }
    }
}

impl TestFont {
    pub fn advance(gid: u16) -> u16 {
        500 + 10 * gid
    }

    pub fn glyph_bytes(&self, gid: u16) -> Vec<u8> {
        match &self.glyphs[gid as usize] {
            TestGlyph::Empty => Vec::new(),
            TestGlyph::Simple => {
                let mut data = Vec::new();
                data.extend_from_slice(&1i16.to_be_bytes());
                for v in [0i16, 0, 100 + gid as i16, 700] {
                    data.extend_from_slice(&v.to_be_bytes());
                }
                data.extend_from_slice(&[gid as u8, 0xA5, gid as u8, 0x5A, 1, 2, 3, 4]);
                data
            }
            TestGlyph::Composite(components) => {
                let mut data = Vec::new();
                data.extend_from_slice(&(-1i16).to_be_bytes());
                data.extend_from_slice(&[0; 8]);
                for (i, &(component, scaled)) in components.iter().enumerate() {
                    let mut flags: u16 = 0x0001 | 0x0002;
                    if scaled {
                        flags |= 0x0008;
                    }
                    if i + 1 < components.len() {
                        flags |= 0x0020;
                    }
                    data.extend_from_slice(&flags.to_be_bytes());
                    data.extend_from_slice(&component.to_be_bytes());
                    data.extend_from_slice(&[0, 10, 0, 20]);
                    if scaled {
                        data.extend_from_slice(&0x2000u16.to_be_bytes());
                    }
                }
                data
            }
        }
    }

    pub fn tables(&self) -> Vec<(Tag, Vec<u8>)> {
        let num_glyphs = self.glyphs.len() as u16;

        let mut glyf = Vec::new();
        let mut offsets = vec![0u32];
        for gid in 0..num_glyphs {
            glyf.extend_from_slice(&self.glyph_bytes(gid));
            offsets.push(glyf.len() as u32);
        }
        let mut loca = Vec::new();
        for offset in offsets {
            if self.long_loca {
                loca.extend_from_slice(&offset.to_be_bytes());
            } else {
                loca.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
            }
        }

        let mut head = vec![0u8; 54];
        head[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        head[12..16].copy_from_slice(&0x5F0F3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&1000u16.to_be_bytes());
        head[50..52].copy_from_slice(&(self.long_loca as i16).to_be_bytes());

        let mut hhea = vec![0u8; 36];
        hhea[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        hhea[18..20].copy_from_slice(&1i16.to_be_bytes());
        hhea[34..36].copy_from_slice(&self.num_h_metrics.to_be_bytes());

        let mut hmtx = Vec::new();
        for gid in 0..num_glyphs {
            if gid < self.num_h_metrics {
                hmtx.extend_from_slice(&Self::advance(gid).to_be_bytes());
            }
            hmtx.extend_from_slice(&(gid as i16).to_be_bytes());
        }

        let mut maxp = Vec::new();
        maxp.extend_from_slice(&0x00005000u32.to_be_bytes());
        maxp.extend_from_slice(&num_glyphs.to_be_bytes());

        let mut post = vec![0u8; 32];
        let version: u32 = if self.post_format_2 { 0x00020000 } else { 0x00030000 };
        post[0..4].copy_from_slice(&version.to_be_bytes());
        post[4..8].copy_from_slice(&self.italic_angle.to_be_bytes());
        post[12..16].copy_from_slice(&(self.fixed_pitch as u32).to_be_bytes());
        if self.post_format_2 {
            post.extend_from_slice(&num_glyphs.to_be_bytes());
            for gid in 0..num_glyphs {
                post.extend_from_slice(&gid.to_be_bytes());
            }
        }

        let mut os2 = vec![0u8; 78];
        os2[4..6].copy_from_slice(&self.weight.to_be_bytes());

        let full_name = format!("{} {}", self.family, self.subfamily);
        let mut tables = vec![
            (*b"cmap", minimal_cmap()),
            (*b"glyf", glyf),
            (*b"head", head),
            (*b"hhea", hhea),
            (*b"hmtx", hmtx),
            (*b"loca", loca),
            (*b"maxp", maxp),
            (
                *b"name",
                name_table(&[
                    (1, &self.family),
                    (2, &self.subfamily),
                    (4, &full_name),
                    (6, &self.post_script_name),
                ]),
            ),
            (*b"OS/2", os2),
            (*b"post", post),
        ];

        if self.vertical_metrics {
            let mut vhea = vec![0u8; 36];
            vhea[0..4].copy_from_slice(&0x00011000u32.to_be_bytes());
            vhea[34..36].copy_from_slice(&num_glyphs.to_be_bytes());
            let mut vmtx = Vec::new();
            for gid in 0..num_glyphs {
                vmtx.extend_from_slice(&(1000 + gid).to_be_bytes());
                vmtx.extend_from_slice(&(-(gid as i16)).to_be_bytes());
            }
            tables.push((*b"vhea", vhea));
            tables.push((*b"vmtx", vmtx));
        }

        tables.extend(self.extra_tables.iter().cloned());
        tables
    }

    pub fn build(&self) -> Vec<u8> {
        sfnt_at(&self.tables(), 0)
    }
}

fn minimal_cmap() -> Vec<u8> {
    let mut cmap = Vec::new();
    for v in [0u16, 1, 3, 1] {
        cmap.extend_from_slice(&v.to_be_bytes());
    }
    cmap.extend_from_slice(&12u32.to_be_bytes());
    // format 4, one sentinel segment
    for v in [4u16, 24, 0, 2, 2, 0, 0, 0xFFFF, 0, 0xFFFF, 1, 0] {
        cmap.extend_from_slice(&v.to_be_bytes());
    }
    cmap
}

fn name_table(records: &[(u16, &str)]) -> Vec<u8> {
    let mut strings = Vec::new();
    let mut data = Vec::new();
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&(records.len() as u16).to_be_bytes());
    data.extend_from_slice(&(6 + 12 * records.len() as u16).to_be_bytes());
    for &(name_id, value) in records {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(|c| c.to_be_bytes()).collect();
        for v in [3u16, 1, 0x0409, name_id, encoded.len() as u16, strings.len() as u16] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        strings.extend_from_slice(&encoded);
    }
    data.extend_from_slice(&strings);
    data
}

/// Lay out an sfnt whose first byte sits at `base` within the final file.
pub(crate) fn sfnt_at(tables: &[(Tag, Vec<u8>)], base: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x00010000u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&[0; 6]);
    let mut offset = base + 12 + tables.len() * 16;
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += (data.len() + 3) & !3;
    }
    for (_, data) in tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

/// A `ttcf` collection holding the given fonts.
pub(crate) fn collection(fonts: &[TestFont]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&0x00010000u32.to_be_bytes());
    out.extend_from_slice(&(fonts.len() as u32).to_be_bytes());
    let mut position = 12 + 4 * fonts.len();
    let mut bodies = Vec::new();
    for font in fonts {
        out.extend_from_slice(&(position as u32).to_be_bytes());
        let body = sfnt_at(&font.tables(), position);
        position += body.len();
        bodies.push(body);
    }
    for body in bodies {
        out.extend_from_slice(&body);
    }
    out
}
