use glyphbuf::Buffer;

/// The code points (or glyph ids) of every element in the buffer.
#[allow(dead_code)]
pub fn codepoints(buffer: &Buffer) -> Vec<u32> {
    buffer
        .glyph_infos()
        .iter()
        .map(|info| info.codepoint)
        .collect()
}

#[allow(dead_code)]
pub fn clusters(buffer: &Buffer) -> Vec<u32> {
    buffer.glyph_infos().iter().map(|info| info.cluster).collect()
}

/// Encode a string as UTF-16 code units.
#[allow(dead_code)]
pub fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Encode a string as UTF-32 code units.
#[allow(dead_code)]
pub fn utf32(s: &str) -> Vec<u32> {
    s.chars().map(u32::from).collect()
}
