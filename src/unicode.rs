//! Unicode constants and text decoding.

pub mod encoding;

/// U+FFFD REPLACEMENT CHARACTER
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

pub const MAX_CODEPOINT: u32 = 0x10FFFF;

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;
const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Returns true if `u` is a Unicode scalar value, i.e. a code point that is not a surrogate.
pub fn is_scalar_value(u: u32) -> bool {
    u <= MAX_CODEPOINT && !SURROGATES.contains(&u)
}

pub(crate) fn is_high_surrogate(u: u16) -> bool {
    HIGH_SURROGATES.contains(&u)
}

pub(crate) fn is_low_surrogate(u: u16) -> bool {
    LOW_SURROGATES.contains(&u)
}

pub(crate) fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
}
