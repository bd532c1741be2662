use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Positioning of one glyph in shaped output, in font units.
///
/// Advances say how far the pen moves after drawing the glyph, offsets move the glyph itself
/// without affecting the pen.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphPosition {
    pub hori_advance: i32,
    pub vert_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Logical direction that text is laid out in.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextDirection {
    #[default]
    Unspecified,
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl GlyphPosition {
    pub const fn new(hori_advance: i32, vert_advance: i32, x_offset: i32, y_offset: i32) -> Self {
        GlyphPosition {
            hori_advance,
            vert_advance,
            x_offset,
            y_offset,
        }
    }

    /// Advance of this glyph along the given direction.
    ///
    /// Returns 0 when the direction is unspecified.
    pub fn advance(&self, direction: TextDirection) -> i32 {
        if direction.is_horizontal() {
            self.hori_advance
        } else if direction.is_vertical() {
            self.vert_advance
        } else {
            0
        }
    }
}

impl TextDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, TextDirection::LeftToRight | TextDirection::RightToLeft)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, TextDirection::TopToBottom | TextDirection::BottomToTop)
    }

    pub fn is_forward(self) -> bool {
        matches!(self, TextDirection::LeftToRight | TextDirection::TopToBottom)
    }

    pub fn is_backward(self) -> bool {
        matches!(self, TextDirection::RightToLeft | TextDirection::BottomToTop)
    }

    pub fn is_specified(self) -> bool {
        self != TextDirection::Unspecified
    }

    /// The opposite direction on the same axis.
    pub fn reverse(self) -> Self {
        match self {
            TextDirection::Unspecified => TextDirection::Unspecified,
            TextDirection::LeftToRight => TextDirection::RightToLeft,
            TextDirection::RightToLeft => TextDirection::LeftToRight,
            TextDirection::TopToBottom => TextDirection::BottomToTop,
            TextDirection::BottomToTop => TextDirection::TopToBottom,
        }
    }
}

/// Parses `ltr`, `rtl`, `ttb`, `btt` and `unspecified`.
///
/// Only the first letter of a direction is significant and case is ignored, so `"l"`, `"LTR"`
/// and `"left-to-right"` all parse as `LeftToRight`.
impl FromStr for TextDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unspecified") {
            return Ok(TextDirection::Unspecified);
        }
        match s.bytes().next().map(|b| b.to_ascii_lowercase()) {
            Some(b'l') => Ok(TextDirection::LeftToRight),
            Some(b'r') => Ok(TextDirection::RightToLeft),
            Some(b't') => Ok(TextDirection::TopToBottom),
            Some(b'b') => Ok(TextDirection::BottomToTop),
            Some(_) => Err(ParseError::BadValue),
            None => Err(ParseError::Empty),
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextDirection::Unspecified => "unspecified",
            TextDirection::LeftToRight => "ltr",
            TextDirection::RightToLeft => "rtl",
            TextDirection::TopToBottom => "ttb",
            TextDirection::BottomToTop => "btt",
        };
        f.write_str(s)
    }
}
