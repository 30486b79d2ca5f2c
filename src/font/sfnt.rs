//! # sfnt Container Writing
//!
//! Table checksums and table directory serialization for TrueType/OpenType
//! files. Tables are written in tag order at 4-byte aligned offsets, and the
//! `head` table's `checkSumAdjustment` is fixed up last so the whole file
//! sums to [`CHECKSUM_MAGIC`].

/// A four-byte table tag, e.g. `*b"glyf"`.
pub type Tag = [u8; 4];

/// The whole-file checksum every valid sfnt resolves to.
pub const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// Offset of `checkSumAdjustment` inside the `head` table.
pub const HEAD_CHECKSUM_ADJUSTMENT: usize = 8;

const HEADER_SIZE: usize = 12;
const RECORD_SIZE: usize = 16;

/// One entry of a table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    /// The tag as printable text, for diagnostics.
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Sum of the table's big-endian 32-bit words, the last word zero-padded.
pub fn table_checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .fold(0u32, |sum, word| {
            sum.wrapping_add(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
        });
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Serialize a complete sfnt file from `(tag, data)` pairs.
///
/// Table lengths are recorded unpadded. The `head` checksum is computed with
/// `checkSumAdjustment` zeroed, then the adjustment is written into the
/// finished file.
pub fn write_font(sfnt_version: u32, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);

    // Binary search hints are computed wide and saturate at the u16 fields.
    let num_tables = tables.len().min(u16::MAX as usize) as u16;
    let entry_selector = if num_tables > 0 { num_tables.ilog2() } else { 0 };
    let search_range = if num_tables > 0 { 16u32 << entry_selector } else { 0 };
    let range_shift = (u32::from(num_tables) * 16).saturating_sub(search_range);
    let search_range = search_range.min(u32::from(u16::MAX)) as u16;
    let range_shift = range_shift.min(u32::from(u16::MAX)) as u16;
    let entry_selector = entry_selector as u16;

    let dir_size = HEADER_SIZE + tables.len() * RECORD_SIZE;
    let body_size: usize = tables.iter().map(|(_, data)| padded_len(data.len())).sum();

    let mut output: Vec<u8> = Vec::with_capacity(dir_size + body_size);
    output.extend_from_slice(&sfnt_version.to_be_bytes());
    output.extend_from_slice(&num_tables.to_be_bytes());
    output.extend_from_slice(&search_range.to_be_bytes());
    output.extend_from_slice(&entry_selector.to_be_bytes());
    output.extend_from_slice(&range_shift.to_be_bytes());

    let mut head_offset = None;
    let mut table_offset = dir_size;
    for (tag, data) in tables.iter_mut() {
        if tag == b"head" && data.len() >= HEAD_CHECKSUM_ADJUSTMENT + 4 {
            write_u32(data, HEAD_CHECKSUM_ADJUSTMENT, 0);
            head_offset = Some(table_offset);
        }
        output.extend_from_slice(tag);
        output.extend_from_slice(&table_checksum(data).to_be_bytes());
        output.extend_from_slice(&(table_offset as u32).to_be_bytes());
        output.extend_from_slice(&(data.len() as u32).to_be_bytes());
        table_offset += padded_len(data.len());
    }

    for (_, data) in &tables {
        output.extend_from_slice(data);
        output.resize(padded_len(output.len()), 0);
    }

    if let Some(offset) = head_offset {
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(table_checksum(&output));
        write_u32(&mut output, offset + HEAD_CHECKSUM_ADJUSTMENT, adjustment);
    }

    output
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

// ─── Byte Helpers ───────────────────────────────────────────────

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_i16(data: &[u8], offset: usize) -> Option<i16> {
    read_u16(data, offset).map(|v| v as i16)
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Callers check the length first.
pub(crate) fn write_u16(data: &mut [u8], offset: usize, val: u16) {
    data[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
}

pub(crate) fn write_u32(data: &mut [u8], offset: usize, val: u32) {
    data[offset..offset + 4].copy_from_slice(&val.to_be_bytes());
}
