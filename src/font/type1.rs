//! # Type 1 Metrics Headers
//!
//! Reads the naming fields of Type 1 font metrics files: Adobe Font Metrics
//! (`.afm`, text) and Printer Font Metrics (`.pfm`, little-endian binary).
//! Character metrics are not read; only what a [`FontNames`] needs.

use super::FontNames;
use crate::error::{FontError, FontResult};

/// The metrics file a Type 1 font was described by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsFormat {
    Afm,
    Pfm,
}

#[derive(Debug, Clone)]
pub struct Type1Metrics {
    pub format: MetricsFormat,
    names: FontNames,
}

impl Type1Metrics {
    pub fn names(&self) -> &FontNames {
        &self.names
    }

    /// Parse the global section of an AFM file.
    pub fn parse_afm(data: &[u8]) -> FontResult<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| FontError::InvalidFormat(format!("AFM is not text: {}", e)))?;
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        if !lines.next().is_some_and(|l| l.starts_with("StartFontMetrics")) {
            return Err(FontError::InvalidFormat(
                "AFM does not begin with StartFontMetrics".to_string(),
            ));
        }

        let mut font_name = None;
        let mut full_name = None;
        let mut family_name = None;
        let mut weight = None;
        let mut italic_angle = 0.0f32;
        let mut fixed_pitch = false;
        for line in lines {
            let (key, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let value = value.trim();
            match key {
                "FontName" => font_name = Some(value.to_string()),
                "FullName" => full_name = Some(value.to_string()),
                "FamilyName" => family_name = Some(value.to_string()),
                "Weight" => weight = Some(value.to_string()),
                "ItalicAngle" => italic_angle = value.parse().unwrap_or(0.0),
                "IsFixedPitch" => fixed_pitch = value == "true",
                "StartCharMetrics" | "EndFontMetrics" => break,
                _ => {}
            }
        }

        let font_name = font_name
            .ok_or_else(|| FontError::InvalidFormat("AFM has no FontName".to_string()))?;
        let weight = weight.unwrap_or_else(|| "Regular".to_string());
        let style = style_from(&weight, italic_angle != 0.0);
        let mut names = FontNames::new(
            &font_name,
            full_name.as_deref().unwrap_or(&font_name),
            family_name.as_deref().unwrap_or(&font_name),
            &style,
            weight_class(&weight),
        );
        names.set_italic_angle(italic_angle);
        names.set_monospace(fixed_pitch);
        Ok(Type1Metrics {
            format: MetricsFormat::Afm,
            names,
        })
    }

    /// Parse the header, extension and driver info of a PFM file.
    pub fn parse_pfm(data: &[u8]) -> FontResult<Self> {
        const EXTENSION_END: usize = 147;
        let invalid = |reason: &str| FontError::InvalidFormat(format!("PFM {}", reason));

        if data.len() < EXTENSION_END {
            return Err(invalid("header truncated"));
        }
        let version = le_u16(data, 0);
        if version != 0x0100 && version != 0x0200 {
            return Err(invalid("version not recognized"));
        }
        if le_u32(data, 2) as usize != data.len() {
            return Err(invalid("size field does not match file length"));
        }

        let italic = data[80] != 0;
        let weight = le_u16(data, 83);
        // Bit 0 set means variable pitch.
        let fixed_pitch = data[90] & 1 == 0;
        let face_name = c_string_at(data, le_u32(data, 105) as usize)
            .ok_or_else(|| invalid("face name out of bounds"))?;
        let post_script_name = c_string_at(data, le_u32(data, 139) as usize)
            .ok_or_else(|| invalid("driver info out of bounds"))?;

        let mut italic_angle = 0.0;
        if italic {
            // etmSlant, tenths of a degree.
            let slant_at = le_u32(data, 119) as usize + 22;
            if slant_at + 2 <= data.len() {
                italic_angle = le_u16(data, slant_at) as i16 as f32 / 10.0;
            }
        }

        let weight_name = match weight {
            0..=349 => "Light",
            350..=549 => "Regular",
            550..=649 => "SemiBold",
            _ => "Bold",
        };
        let mut names = FontNames::new(
            &post_script_name,
            &post_script_name,
            &face_name,
            &style_from(weight_name, italic),
            weight,
        );
        names.set_italic_angle(italic_angle);
        names.set_monospace(fixed_pitch);
        Ok(Type1Metrics {
            format: MetricsFormat::Pfm,
            names,
        })
    }
}

fn style_from(weight: &str, italic: bool) -> String {
    match (weight, italic) {
        (_, false) => weight.to_string(),
        ("Regular" | "Roman" | "Normal" | "Book", true) => "Italic".to_string(),
        (_, true) => format!("{} Italic", weight),
    }
}

/// Map an AFM `Weight` value to a numeric weight class.
fn weight_class(weight: &str) -> u16 {
    match weight.to_ascii_lowercase().replace([' ', '-'], "").as_str() {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "medium" => 500,
        "semibold" | "demibold" | "demi" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" | "heavy" => 800,
        "black" | "ultra" => 900,
        _ => 400,
    }
}

fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn c_string_at(data: &[u8], offset: usize) -> Option<String> {
    let tail = data.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0)?;
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}
