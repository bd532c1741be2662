//! Decoding of text in the encodings accepted by [`Buffer`](crate::buffer::Buffer).
//!
//! Decoders are lenient: malformed input decodes to the caller supplied replacement code
//! point, one replacement per ill-formed sequence, and decoding carries on after it.

use std::ops::RangeInclusive;

use crate::unicode::{combine_surrogates, is_high_surrogate, is_low_surrogate, is_scalar_value};

/// A text encoding that can be decoded forwards and backwards.
pub trait TextEncoding {
    type CodeUnit: Copy;

    /// Decode the character at the start of `text`.
    ///
    /// Returns the code point and the number of code units it occupied, which is at least one,
    /// or `None` if `text` is empty.
    fn decode(text: &[Self::CodeUnit], replacement: u32) -> Option<(u32, usize)>;

    /// Decode the character that ends at the end of `text`.
    fn decode_prev(text: &[Self::CodeUnit], replacement: u32) -> Option<(u32, usize)>;
}

/// UTF-8 with maximal subpart replacement of ill-formed sequences.
pub struct Utf8;

/// UTF-16 in native endianness. Unpaired surrogates are replaced individually.
pub struct Utf16;

/// UTF-32. Surrogates and values beyond U+10FFFF are replaced.
pub struct Utf32;

/// ISO 8859-1, where every byte is the code point of the same value.
pub struct Latin1;

/// Code points passed through without validation.
pub struct Codepoints;

impl TextEncoding for Utf8 {
    type CodeUnit = u8;

    fn decode(text: &[u8], replacement: u32) -> Option<(u32, usize)> {
        let (&first, rest) = text.split_first()?;
        // Sequence length and the valid range of the second byte, per Table 3-7 of the Unicode
        // Standard. Later bytes are always 0x80..=0xBF.
        let (len, second): (usize, RangeInclusive<u8>) = match first {
            0x00..=0x7F => return Some((u32::from(first), 1)),
            0xC2..=0xDF => (2, 0x80..=0xBF),
            0xE0 => (3, 0xA0..=0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80..=0xBF),
            0xED => (3, 0x80..=0x9F),
            0xF0 => (4, 0x90..=0xBF),
            0xF1..=0xF3 => (4, 0x80..=0xBF),
            0xF4 => (4, 0x80..=0x8F),
            _ => return Some((replacement, 1)),
        };

        let mask: u8 = 0x7F >> len;
        let mut cp = u32::from(first & mask);
        for i in 1..len {
            let valid = match rest.get(i - 1) {
                Some(&b) if i == 1 => second.contains(&b),
                Some(&b) => (0x80u8..=0xBF).contains(&b),
                None => false,
            };
            if !valid {
                return Some((replacement, i));
            }
            cp = (cp << 6) | u32::from(rest[i - 1] & 0x3F);
        }
        Some((cp, len))
    }

    fn decode_prev(text: &[u8], replacement: u32) -> Option<(u32, usize)> {
        let end = text.len();
        if end == 0 {
            return None;
        }

        // Back up over at most three continuation bytes, then check that decoding forward from
        // there lands exactly on the end.
        let mut start = end - 1;
        while start > 0 && text[start] & 0xC0 == 0x80 && end - start < 4 {
            start -= 1;
        }
        match Utf8::decode(&text[start..], replacement) {
            Some((cp, len)) if start + len == end => Some((cp, len)),
            _ => Some((replacement, 1)),
        }
    }
}

impl TextEncoding for Utf16 {
    type CodeUnit = u16;

    fn decode(text: &[u16], replacement: u32) -> Option<(u32, usize)> {
        let (&u, rest) = text.split_first()?;
        if is_high_surrogate(u) {
            match rest.first() {
                Some(&low) if is_low_surrogate(low) => Some((combine_surrogates(u, low), 2)),
                _ => Some((replacement, 1)),
            }
        } else if is_low_surrogate(u) {
            Some((replacement, 1))
        } else {
            Some((u32::from(u), 1))
        }
    }

    fn decode_prev(text: &[u16], replacement: u32) -> Option<(u32, usize)> {
        let (&u, rest) = text.split_last()?;
        if is_low_surrogate(u) {
            match rest.last() {
                Some(&high) if is_high_surrogate(high) => Some((combine_surrogates(high, u), 2)),
                _ => Some((replacement, 1)),
            }
        } else if is_high_surrogate(u) {
            Some((replacement, 1))
        } else {
            Some((u32::from(u), 1))
        }
    }
}

impl TextEncoding for Utf32 {
    type CodeUnit = u32;

    fn decode(text: &[u32], replacement: u32) -> Option<(u32, usize)> {
        text.first().map(|&u| (validate(u, replacement), 1))
    }

    fn decode_prev(text: &[u32], replacement: u32) -> Option<(u32, usize)> {
        text.last().map(|&u| (validate(u, replacement), 1))
    }
}

impl TextEncoding for Latin1 {
    type CodeUnit = u8;

    fn decode(text: &[u8], _replacement: u32) -> Option<(u32, usize)> {
        text.first().map(|&b| (u32::from(b), 1))
    }

    fn decode_prev(text: &[u8], _replacement: u32) -> Option<(u32, usize)> {
        text.last().map(|&b| (u32::from(b), 1))
    }
}

impl TextEncoding for Codepoints {
    type CodeUnit = u32;

    fn decode(text: &[u32], _replacement: u32) -> Option<(u32, usize)> {
        text.first().map(|&u| (u, 1))
    }

    fn decode_prev(text: &[u32], _replacement: u32) -> Option<(u32, usize)> {
        text.last().map(|&u| (u, 1))
    }
}

fn validate(u: u32, replacement: u32) -> u32 {
    if is_scalar_value(u) {
        u
    } else {
        replacement
    }
}
