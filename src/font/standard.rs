//! The 14 standard PDF fonts. They are never embedded, so their names come
//! from this table rather than from a font file.

use super::FontNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    pub const ALL: [StandardFont; 14] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
        Self::Symbol,
        Self::ZapfDingbats,
    ];

    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Match a PDF font name exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.pdf_name() == name)
    }

    pub fn family(&self) -> &'static str {
        match self {
            Self::Helvetica
            | Self::HelveticaBold
            | Self::HelveticaOblique
            | Self::HelveticaBoldOblique => "Helvetica",
            Self::TimesRoman | Self::TimesBold | Self::TimesItalic | Self::TimesBoldItalic => {
                "Times"
            }
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => "Courier",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    fn style(&self) -> &'static str {
        match self.pdf_name().split_once('-') {
            Some((_, style)) => style,
            None => "Regular",
        }
    }

    fn is_bold(&self) -> bool {
        self.style().starts_with("Bold")
    }

    fn italic_angle(&self) -> f32 {
        match self {
            Self::TimesItalic => -15.5,
            Self::TimesBoldItalic => -15.0,
            Self::HelveticaOblique
            | Self::HelveticaBoldOblique
            | Self::CourierOblique
            | Self::CourierBoldOblique => -12.0,
            _ => 0.0,
        }
    }

    pub fn names(&self) -> FontNames {
        let full_name = self.pdf_name().replace('-', " ");
        let mut names = FontNames::new(
            self.pdf_name(),
            &full_name,
            self.family(),
            self.style(),
            if self.is_bold() { 700 } else { 400 },
        );
        names.set_italic_angle(self.italic_angle());
        names.set_monospace(self.family() == "Courier");
        names
    }
}
