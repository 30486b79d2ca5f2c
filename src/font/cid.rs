//! Predefined CID-keyed CJK fonts that viewers supply themselves.
//!
//! Only the names are known here; character collections and CMaps belong to
//! the PDF layer.

use super::FontNames;

#[derive(Debug, PartialEq, Eq)]
pub struct CidFont {
    pub name: &'static str,
    pub family: &'static str,
    /// Adobe character collection ordering, e.g. `Japan1`.
    pub ordering: &'static str,
    pub weight: u16,
}

static CID_FONTS: &[CidFont] = &[
    CidFont { name: "HeiseiMin-W3", family: "HeiseiMin", ordering: "Japan1", weight: 300 },
    CidFont { name: "HeiseiKakuGo-W5", family: "HeiseiKakuGo", ordering: "Japan1", weight: 500 },
    CidFont { name: "KozMinPro-Regular", family: "KozMinPro", ordering: "Japan1", weight: 400 },
    CidFont { name: "MSung-Light", family: "MSung", ordering: "CNS1", weight: 300 },
    CidFont { name: "MSungStd-Light", family: "MSungStd", ordering: "CNS1", weight: 300 },
    CidFont { name: "MHei-Medium", family: "MHei", ordering: "CNS1", weight: 500 },
    CidFont { name: "STSong-Light", family: "STSong", ordering: "GB1", weight: 300 },
    CidFont { name: "STSongStd-Light", family: "STSongStd", ordering: "GB1", weight: 300 },
    CidFont { name: "HYGoThic-Medium", family: "HYGoThic", ordering: "Korea1", weight: 500 },
    CidFont { name: "HYSMyeongJo-Medium", family: "HYSMyeongJo", ordering: "Korea1", weight: 500 },
];

impl CidFont {
    pub fn find(name: &str) -> Option<&'static CidFont> {
        CID_FONTS.iter().find(|font| font.name == name)
    }

    pub fn all() -> &'static [CidFont] {
        CID_FONTS
    }

    pub fn names(&self) -> FontNames {
        let style = self.name.rsplit_once('-').map_or("Regular", |(_, s)| s);
        FontNames::new(self.name, self.name, self.family, style, self.weight)
    }
}
