//! Scripts identified by their ISO 15924 tag.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::glyph_position::TextDirection;
use crate::tag::{from_string, DisplayTag};

/// A writing script, stored as its four letter ISO 15924 code.
///
/// Tags are normalized to the ISO 15924 capitalization (`Latn`, `Arab`), so scripts built from
/// differently cased strings compare equal.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Script(u32);

impl Script {
    /// No script has been set.
    pub const UNSPECIFIED: Script = Script(0);

    pub const COMMON: Script = Script(tag!(b"Zyyy"));
    pub const INHERITED: Script = Script(tag!(b"Zinh"));
    pub const UNKNOWN: Script = Script(tag!(b"Zzzz"));

    pub const ARABIC: Script = Script(tag!(b"Arab"));
    pub const ARMENIAN: Script = Script(tag!(b"Armn"));
    pub const BENGALI: Script = Script(tag!(b"Beng"));
    pub const CYRILLIC: Script = Script(tag!(b"Cyrl"));
    pub const DEVANAGARI: Script = Script(tag!(b"Deva"));
    pub const GEORGIAN: Script = Script(tag!(b"Geor"));
    pub const GREEK: Script = Script(tag!(b"Grek"));
    pub const GUJARATI: Script = Script(tag!(b"Gujr"));
    pub const GURMUKHI: Script = Script(tag!(b"Guru"));
    pub const HAN: Script = Script(tag!(b"Hani"));
    pub const HANGUL: Script = Script(tag!(b"Hang"));
    pub const HEBREW: Script = Script(tag!(b"Hebr"));
    pub const HIRAGANA: Script = Script(tag!(b"Hira"));
    pub const KANNADA: Script = Script(tag!(b"Knda"));
    pub const KATAKANA: Script = Script(tag!(b"Kana"));
    pub const KHMER: Script = Script(tag!(b"Khmr"));
    pub const LAO: Script = Script(tag!(b"Laoo"));
    pub const LATIN: Script = Script(tag!(b"Latn"));
    pub const MALAYALAM: Script = Script(tag!(b"Mlym"));
    pub const MONGOLIAN: Script = Script(tag!(b"Mong"));
    pub const MYANMAR: Script = Script(tag!(b"Mymr"));
    pub const NKO: Script = Script(tag!(b"Nkoo"));
    pub const ORIYA: Script = Script(tag!(b"Orya"));
    pub const SINHALA: Script = Script(tag!(b"Sinh"));
    pub const SYRIAC: Script = Script(tag!(b"Syrc"));
    pub const TAMIL: Script = Script(tag!(b"Taml"));
    pub const TELUGU: Script = Script(tag!(b"Telu"));
    pub const THAANA: Script = Script(tag!(b"Thaa"));
    pub const THAI: Script = Script(tag!(b"Thai"));
    pub const TIBETAN: Script = Script(tag!(b"Tibt"));

    /// Build a script from an ISO 15924 tag in any letter case.
    ///
    /// A zero tag gives `Script::UNSPECIFIED`.
    pub const fn from_iso15924_tag(tag: u32) -> Script {
        if tag == 0 {
            Script::UNSPECIFIED
        } else {
            // Upper case first letter, lower case the rest.
            Script((tag & 0xDFDF_DFDF) | 0x0020_2020)
        }
    }

    pub const fn tag(self) -> u32 {
        self.0
    }

    pub fn is_specified(self) -> bool {
        self != Script::UNSPECIFIED
    }

    /// The direction this script is written in when set horizontally.
    ///
    /// Scripts that have been written in either direction return `TextDirection::Unspecified`.
    /// All other scripts, including an unspecified one, are left-to-right.
    pub fn horizontal_direction(self) -> TextDirection {
        use rtl_tags as rtl;

        // Derived from https://github.com/harfbuzz/harfbuzz/blob/bdee8658c68cf400e266c91039d741b5047c2519/src/hb-common.cc#L556-L644
        // License: MIT
        // Copyright (c) 2009, 2010 Red Hat, Inc.
        // Copyright (c) 2011, 2012 Google, Inc.
        match self.0 {
            // Unicode 1.1
            | rtl::ARAB // Arabic
            | rtl::HEBR // Hebrew

            // Unicode 3.0
            | rtl::SYRC // Syriac
            | rtl::THAA // Thaana

            // Unicode 4.0
            | rtl::CPRT // Cypriot Syllabary

            // Unicode 4.1
            | rtl::KHAR // Kharosthi

            // Unicode 5.0
            | rtl::PHNX // Phoenician
            | rtl::NKOO // N'Ko

            // Unicode 5.1
            | rtl::LYDI // Lydian

            // Unicode 5.2
            | rtl::AVST // Avestan
            | rtl::ARMI // Imperial Aramaic
            | rtl::PHLI // Inscriptional Pahlavi
            | rtl::PRTI // Inscriptional Parthian
            | rtl::SARB // Old South Arabian
            | rtl::ORKH // Old Turkic, Orkhon Runic
            | rtl::SAMR // Samaritan

            // Unicode 6.0
            | rtl::MAND // Mandaic, Mandaean

            // Unicode 6.1
            | rtl::MERC // Meroitic Cursive
            | rtl::MERO // Meroitic Hieroglyphs

            // Unicode 7.0
            | rtl::MANI // Manichaean
            | rtl::MEND // Mende Kikakui
            | rtl::NBAT // Nabataean
            | rtl::NARB // Old North Arabian
            | rtl::PALM // Palmyrene
            | rtl::PHLP // Psalter Pahlavi

            // Unicode 8.0
            | rtl::HATR // Hatran

            // Unicode 9.0
            | rtl::ADLM // Adlam

            // Unicode 11.0
            | rtl::ROHG // Hanifi Rohingya
            | rtl::SOGO // Old Sogdian
            | rtl::SOGD // Sogdian

            // Unicode 12.0
            | rtl::ELYM // Elymaic

            // Unicode 13.0
            | rtl::CHRS // Chorasmian
            | rtl::YEZI // Yezidi

            // Unicode 14.0
            | rtl::OUGR // Old Uyghur

            // Unicode 16.0
            | rtl::GARA => TextDirection::RightToLeft, // Garay

            // Historically written either way
            | either_way::HUNG // Old Hungarian
            | either_way::ITAL // Old Italic
            | either_way::RUNR => TextDirection::Unspecified, // Runic

            _ => TextDirection::LeftToRight,
        }
    }
}

mod rtl_tags {
    // Unicode 1.1
    pub const ARAB: u32 = tag!(b"Arab"); // Arabic
    pub const HEBR: u32 = tag!(b"Hebr"); // Hebrew

    // Unicode 3.0
    pub const SYRC: u32 = tag!(b"Syrc"); // Syriac
    pub const THAA: u32 = tag!(b"Thaa"); // Thaana

    // Unicode 4.0
    pub const CPRT: u32 = tag!(b"Cprt"); // Cypriot Syllabary

    // Unicode 4.1
    pub const KHAR: u32 = tag!(b"Khar"); // Kharosthi

    // Unicode 5.0
    pub const PHNX: u32 = tag!(b"Phnx"); // Phoenician
    pub const NKOO: u32 = tag!(b"Nkoo"); // N'Ko

    // Unicode 5.1
    pub const LYDI: u32 = tag!(b"Lydi"); // Lydian

    // Unicode 5.2
    pub const AVST: u32 = tag!(b"Avst"); // Avestan
    pub const ARMI: u32 = tag!(b"Armi"); // Imperial Aramaic
    pub const PHLI: u32 = tag!(b"Phli"); // Inscriptional Pahlavi
    pub const PRTI: u32 = tag!(b"Prti"); // Inscriptional Parthian
    pub const SARB: u32 = tag!(b"Sarb"); // Old South Arabian
    pub const ORKH: u32 = tag!(b"Orkh"); // Old Turkic, Orkhon Runic
    pub const SAMR: u32 = tag!(b"Samr"); // Samaritan

    // Unicode 6.0
    pub const MAND: u32 = tag!(b"Mand"); // Mandaic, Mandaean

    // Unicode 6.1
    pub const MERC: u32 = tag!(b"Merc"); // Meroitic Cursive
    pub const MERO: u32 = tag!(b"Mero"); // Meroitic Hieroglyphs

    // Unicode 7.0
    pub const MANI: u32 = tag!(b"Mani"); // Manichaean
    pub const MEND: u32 = tag!(b"Mend"); // Mende Kikakui
    pub const NBAT: u32 = tag!(b"Nbat"); // Nabataean
    pub const NARB: u32 = tag!(b"Narb"); // Old North Arabian
    pub const PALM: u32 = tag!(b"Palm"); // Palmyrene
    pub const PHLP: u32 = tag!(b"Phlp"); // Psalter Pahlavi

    // Unicode 8.0
    pub const HATR: u32 = tag!(b"Hatr"); // Hatran

    // Unicode 9.0
    pub const ADLM: u32 = tag!(b"Adlm"); // Adlam

    // Unicode 11.0
    pub const ROHG: u32 = tag!(b"Rohg"); // Hanifi Rohingya
    pub const SOGO: u32 = tag!(b"Sogo"); // Old Sogdian
    pub const SOGD: u32 = tag!(b"Sogd"); // Sogdian

    // Unicode 12.0
    pub const ELYM: u32 = tag!(b"Elym"); // Elymaic

    // Unicode 13.0
    pub const CHRS: u32 = tag!(b"Chrs"); // Chorasmian
    pub const YEZI: u32 = tag!(b"Yezi"); // Yezidi

    // Unicode 14.0
    pub const OUGR: u32 = tag!(b"Ougr"); // Old Uyghur

    // Unicode 16.0
    pub const GARA: u32 = tag!(b"Gara"); // Garay
}

mod either_way {
    pub const HUNG: u32 = tag!(b"Hung"); // Old Hungarian
    pub const ITAL: u32 = tag!(b"Ital"); // Old Italic
    pub const RUNR: u32 = tag!(b"Runr"); // Runic
}

/// Parses a four letter ISO 15924 code in any letter case, e.g. `"arab"` or `"Arab"`, or
/// `"unspecified"` for [`Script::UNSPECIFIED`].
impl FromStr for Script {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unspecified") {
            return Ok(Script::UNSPECIFIED);
        }
        if s.len() != 4 {
            return Err(if s.is_empty() {
                ParseError::Empty
            } else {
                ParseError::BadValue
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ParseError::BadValue);
        }
        from_string(s).map(Script::from_iso15924_tag)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_specified() {
            DisplayTag(self.0).fmt(f)
        } else {
            f.write_str("unspecified")
        }
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self)
    }
}
