//! The shaping buffer.
//!
//! A [`Buffer`] collects Unicode text, along with the direction, script and language of that
//! text, ready to be handed to a shaper. The shaper replaces the text with positioned glyphs in
//! place, after which the same buffer is read back by the caller. [`ContentType`] records which
//! of these phases the buffer is in and appends are checked against it.
//!
//! ```
//! use glyphbuf::{Buffer, ContentType, Script, TextDirection};
//!
//! let mut buffer = Buffer::new();
//! buffer.add_str("abc")?;
//! buffer.set_direction(TextDirection::LeftToRight);
//! buffer.set_script(Script::LATIN);
//!
//! assert_eq!(buffer.content_type(), ContentType::Unicode);
//! assert_eq!(buffer.len(), 3);
//! # Ok::<(), glyphbuf::BufferError>(())
//! ```

use std::fmt;
use std::ops::Range;

use bitflags::bitflags;
use log::{debug, warn};
use tinyvec::ArrayVec;

use crate::error::{AllocationError, BufferError};
use crate::glyph_position::{GlyphPosition, TextDirection};
use crate::language::Language;
use crate::script::Script;
use crate::segment::SegmentProperties;
use crate::unicode::encoding::{Codepoints, Latin1, TextEncoding, Utf16, Utf32, Utf8};
use crate::unicode::REPLACEMENT_CHARACTER;

/// Maximum number of code points kept on either side of an appended item.
pub const CONTEXT_LENGTH: usize = 5;

/// Default limit on the number of elements a buffer will hold.
pub const DEFAULT_MAX_LEN: usize = 0x3FFF_FFFF;

type Context = ArrayVec<[u32; CONTEXT_LENGTH]>;

/// The phase a buffer is in.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContentType {
    /// Nothing has been added since the buffer was created or reset.
    #[default]
    Invalid,
    /// The buffer holds characters awaiting shaping.
    Unicode,
    /// The buffer holds shaped, positioned glyphs.
    Glyphs,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Invalid => f.write_str("invalid"),
            ContentType::Unicode => f.write_str("unicode"),
            ContentType::Glyphs => f.write_str("glyphs"),
        }
    }
}

bitflags! {
    /// Hints to the shaper about the text in the buffer.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct BufferFlags: u32 {
        /// The buffer holds the beginning of the text.
        const BEGINNING_OF_TEXT = 0x01;
        /// The buffer holds the end of the text.
        const END_OF_TEXT = 0x02;
        /// Keep default ignorable characters visible instead of hiding them.
        const PRESERVE_DEFAULT_IGNORABLES = 0x04;
        /// Remove default ignorable characters from the output.
        const REMOVE_DEFAULT_IGNORABLES = 0x08;
        /// Do not insert U+25CC DOTTED CIRCLE before broken clusters.
        const DO_NOT_INSERT_DOTTED_CIRCLE = 0x10;
    }
}

/// How the shaper should merge clusters.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ClusterLevel {
    /// Marks are merged into their base, and clusters stay monotone.
    #[default]
    MonotoneGraphemes,
    /// Every character keeps its own cluster, and clusters stay monotone.
    MonotoneCharacters,
    /// Every character keeps its own cluster, which may end up out of order.
    Characters,
}

/// One element of the buffer.
///
/// Before shaping `codepoint` is a Unicode code point, after shaping it is a glyph id. The
/// cluster is carried through shaping unchanged so glyphs can be mapped back to the text.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphInfo {
    pub codepoint: u32,
    pub cluster: u32,
}

impl GlyphInfo {
    pub const fn new(codepoint: u32, cluster: u32) -> Self {
        GlyphInfo { codepoint, cluster }
    }

    /// The glyph id of a shaped element.
    pub fn glyph_id(&self) -> u32 {
        self.codepoint
    }

    /// The character of an unshaped element, if it is a valid scalar value.
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

/// A glyph produced by a shaper, see [`Buffer::replace_with_glyphs`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    pub cluster: u32,
    pub position: GlyphPosition,
}

/// Input and output buffer for text shaping.
///
/// Dropping the buffer releases its storage.
#[derive(Debug, Clone)]
pub struct Buffer {
    infos: Vec<GlyphInfo>,
    positions: Vec<GlyphPosition>,
    content_type: ContentType,
    props: SegmentProperties,
    flags: BufferFlags,
    cluster_level: ClusterLevel,
    replacement: u32,
    invisible_glyph: u32,
    not_found_glyph: u32,
    max_len: usize,
    pre_context: Context,
    post_context: Context,
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::new()
    }
}

impl Buffer {
    /// Create an empty buffer. No storage is allocated until content is added.
    pub fn new() -> Self {
        Buffer {
            infos: Vec::new(),
            positions: Vec::new(),
            content_type: ContentType::Invalid,
            props: SegmentProperties::default(),
            flags: BufferFlags::empty(),
            cluster_level: ClusterLevel::default(),
            replacement: REPLACEMENT_CHARACTER,
            invisible_glyph: 0,
            not_found_glyph: 0,
            max_len: DEFAULT_MAX_LEN,
            pre_context: Context::new(),
            post_context: Context::new(),
        }
    }

    /// Create an empty buffer with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let mut buffer = Buffer::new();
        buffer.reserve(capacity)?;
        Ok(buffer)
    }

    /// Return the buffer to the state of a newly created one.
    ///
    /// Contents, context and segment properties are cleared and all settings are restored to
    /// their defaults. Allocated storage is kept for reuse.
    pub fn reset(&mut self) {
        self.clear_contents();
        self.flags = BufferFlags::empty();
        self.cluster_level = ClusterLevel::default();
        self.replacement = REPLACEMENT_CHARACTER;
        self.invisible_glyph = 0;
        self.not_found_glyph = 0;
        self.max_len = DEFAULT_MAX_LEN;
    }

    /// Clear contents, context and segment properties, keeping flags and other settings.
    pub fn clear_contents(&mut self) {
        self.infos.clear();
        self.positions.clear();
        self.content_type = ContentType::Invalid;
        self.props = SegmentProperties::default();
        self.pre_context.clear();
        self.post_context.clear();
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Force the content type without touching the contents.
    ///
    /// This is for callers that fill the buffer by other means than the append and shaping
    /// operations. Setting `Glyphs` gives every element a zeroed position; any other content
    /// type discards positions. The contents themselves are not converted, so setting a type
    /// that does not describe them leaves the buffer meaningless to a shaper.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        if content_type == ContentType::Invalid && !self.infos.is_empty() {
            warn!(
                "marking buffer of {} elements as invalid content",
                self.infos.len()
            );
        }
        match content_type {
            ContentType::Glyphs => self.positions.resize(self.infos.len(), GlyphPosition::default()),
            ContentType::Invalid | ContentType::Unicode => self.positions.clear(),
        }
        self.content_type = content_type;
    }

    pub fn direction(&self) -> TextDirection {
        self.props.direction
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        self.props.direction = direction;
    }

    pub fn script(&self) -> Script {
        self.props.script
    }

    pub fn set_script(&mut self, script: Script) {
        self.props.script = script;
    }

    /// The language of the text, or `None` if it has not been set.
    pub fn language(&self) -> Option<Language> {
        self.props.language
    }

    pub fn set_language(&mut self, language: Option<Language>) {
        self.props.language = language;
    }

    pub fn segment_properties(&self) -> SegmentProperties {
        self.props
    }

    pub fn set_segment_properties(&mut self, props: SegmentProperties) {
        self.props = props;
    }

    /// Fill in unset segment properties. See [`SegmentProperties::guess`].
    pub fn guess_segment_properties(&mut self) {
        self.props.guess();
    }

    pub fn flags(&self) -> BufferFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: BufferFlags) {
        self.flags = flags;
    }

    pub fn cluster_level(&self) -> ClusterLevel {
        self.cluster_level
    }

    pub fn set_cluster_level(&mut self, cluster_level: ClusterLevel) {
        self.cluster_level = cluster_level;
    }

    /// Code point substituted for malformed input by the `add_utf*` operations.
    pub fn replacement_codepoint(&self) -> u32 {
        self.replacement
    }

    pub fn set_replacement_codepoint(&mut self, replacement: u32) {
        self.replacement = replacement;
    }

    /// Glyph the shaper should use for invisible characters, 0 meaning hide them.
    pub fn invisible_glyph(&self) -> u32 {
        self.invisible_glyph
    }

    pub fn set_invisible_glyph(&mut self, glyph_id: u32) {
        self.invisible_glyph = glyph_id;
    }

    /// Glyph the shaper should use for characters the font does not map.
    pub fn not_found_glyph(&self) -> u32 {
        self.not_found_glyph
    }

    pub fn set_not_found_glyph(&mut self, glyph_id: u32) {
        self.not_found_glyph = glyph_id;
    }

    /// Maximum number of elements the buffer may hold.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Set the maximum number of elements. Existing contents are not truncated.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
    }

    pub fn glyph_infos(&self) -> &[GlyphInfo] {
        &self.infos
    }

    pub fn glyph_infos_mut(&mut self) -> &mut [GlyphInfo] {
        &mut self.infos
    }

    /// Positions of shaped glyphs. Empty unless the content type is `Glyphs`.
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.positions
    }

    pub fn glyph_positions_mut(&mut self) -> &mut [GlyphPosition] {
        &mut self.positions
    }

    /// Code points preceding the buffer contents, nearest first.
    pub fn pre_context(&self) -> &[u32] {
        &self.pre_context
    }

    /// Code points following the buffer contents, nearest first.
    pub fn post_context(&self) -> &[u32] {
        &self.post_context
    }

    /// Append one code point with an explicit cluster.
    ///
    /// The code point is not validated. The post-context is cleared.
    pub fn add(&mut self, codepoint: u32, cluster: u32) -> Result<(), BufferError> {
        self.check_accepts_text()?;
        self.reserve(1)?;
        self.infos.push(GlyphInfo::new(codepoint, cluster));
        self.post_context.clear();
        self.content_type = ContentType::Unicode;
        Ok(())
    }

    /// Append code points without validation. Clusters are indices into `text`.
    pub fn add_codepoints(&mut self, text: &[u32]) -> Result<(), BufferError> {
        self.add_codepoints_item(text, 0, None)
    }

    pub fn add_codepoints_item(
        &mut self,
        text: &[u32],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.add_item::<Codepoints>(text, item_offset, item_length)
    }

    /// Append UTF-32 text, replacing invalid values. Clusters are indices into `text`.
    pub fn add_utf32(&mut self, text: &[u32]) -> Result<(), BufferError> {
        self.add_utf32_item(text, 0, None)
    }

    pub fn add_utf32_item(
        &mut self,
        text: &[u32],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.add_item::<Utf32>(text, item_offset, item_length)
    }

    /// Append UTF-16 text, replacing unpaired surrogates. Clusters are code unit indices into
    /// `text`.
    pub fn add_utf16(&mut self, text: &[u16]) -> Result<(), BufferError> {
        self.add_utf16_item(text, 0, None)
    }

    pub fn add_utf16_item(
        &mut self,
        text: &[u16],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.add_item::<Utf16>(text, item_offset, item_length)
    }

    /// Append UTF-8 text, replacing ill-formed sequences. Clusters are byte indices into `text`.
    pub fn add_utf8(&mut self, text: &[u8]) -> Result<(), BufferError> {
        self.add_utf8_item(text, 0, None)
    }

    pub fn add_utf8_item(
        &mut self,
        text: &[u8],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.add_item::<Utf8>(text, item_offset, item_length)
    }

    /// Append ISO 8859-1 text. Clusters are byte indices into `text`.
    pub fn add_latin1(&mut self, text: &[u8]) -> Result<(), BufferError> {
        self.add_latin1_item(text, 0, None)
    }

    pub fn add_latin1_item(
        &mut self,
        text: &[u8],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.add_item::<Latin1>(text, item_offset, item_length)
    }

    /// Append a string. Clusters are byte indices into `text`.
    pub fn add_str(&mut self, text: &str) -> Result<(), BufferError> {
        self.add_utf8(text.as_bytes())
    }

    /// Append the item `text[item_offset..item_offset + item_length]`, decoded as `E`.
    ///
    /// `item_length` of `None` extends the item to the end of `text`. Text outside the item
    /// is recorded as context for the shaper but not added. Each element's cluster is the
    /// offset of its first code unit in `text`.
    pub fn add_item<E: TextEncoding>(
        &mut self,
        text: &[E::CodeUnit],
        item_offset: usize,
        item_length: Option<usize>,
    ) -> Result<(), BufferError> {
        self.check_accepts_text()?;
        let item = item_range(text.len(), item_offset, item_length)?;
        u32::try_from(text.len())?;

        let orig_len = self.infos.len();
        let saved_pre_context = self.pre_context.clone();
        match self.add_decoded::<E>(text, item) {
            Ok(()) => {
                self.content_type = ContentType::Unicode;
                Ok(())
            }
            Err(err) => {
                debug!(
                    "rolling back append of {} elements: {}",
                    self.infos.len() - orig_len,
                    err
                );
                self.infos.truncate(orig_len);
                self.pre_context = saved_pre_context;
                Err(err)
            }
        }
    }

    fn add_decoded<E: TextEncoding>(
        &mut self,
        text: &[E::CodeUnit],
        item: Range<usize>,
    ) -> Result<(), BufferError> {
        let replacement = self.replacement;
        // Every element takes at least one code unit, so this is an upper bound.
        let remaining = self.max_len.saturating_sub(self.infos.len());
        self.reserve(item.len().min(remaining))?;

        if self.infos.is_empty() && item.start > 0 {
            self.pre_context.clear();
            let mut prefix = &text[..item.start];
            while self.pre_context.len() < CONTEXT_LENGTH {
                match E::decode_prev(prefix, replacement) {
                    Some((cp, len)) => {
                        self.pre_context.push(cp);
                        prefix = &prefix[..prefix.len() - len];
                    }
                    None => break,
                }
            }
        }

        let mut offset = item.start;
        while let Some((cp, len)) = E::decode(&text[offset..item.end], replacement) {
            self.reserve(1)?;
            // Text length was checked to fit in u32 so offsets do too.
            self.infos.push(GlyphInfo::new(cp, offset as u32));
            offset += len;
        }

        self.post_context.clear();
        let mut suffix = &text[item.end..];
        while self.post_context.len() < CONTEXT_LENGTH {
            match E::decode(suffix, replacement) {
                Some((cp, len)) => {
                    self.post_context.push(cp);
                    suffix = &suffix[len..];
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Append `range` of `source` to this buffer.
    ///
    /// An empty buffer without content adopts the content type of `source`; otherwise both
    /// buffers must hold the same kind of content. Elements of a source that was forced to
    /// `Invalid` are appended as characters. When this buffer is empty its context is
    /// taken from around the range in `source`.
    pub fn append(&mut self, source: &Buffer, range: Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > source.len() {
            return Err(BufferError::ItemOutOfBounds {
                offset: range.start,
                length: range.end.saturating_sub(range.start),
                text_length: source.len(),
            });
        }

        // Elements of a source forced to `Invalid` carry no positions, so they are characters.
        let source_type = match source.content_type {
            ContentType::Invalid if !source.is_empty() => ContentType::Unicode,
            content_type => content_type,
        };
        let orig_len = self.infos.len();
        let content_type = if orig_len == 0 && self.content_type == ContentType::Invalid {
            source_type
        } else if source_type == ContentType::Invalid {
            self.content_type
        } else if self.content_type != source_type {
            return Err(BufferError::ContentType {
                expected: self.content_type,
                actual: source_type,
            });
        } else {
            self.content_type
        };

        self.reserve(range.len())?;
        if content_type == ContentType::Glyphs {
            self.positions.try_reserve(range.len())?;
            // A glyph buffer always has a position for each element.
            self.positions.resize(orig_len, GlyphPosition::default());
            self.positions
                .extend_from_slice(&source.positions[range.clone()]);
        }
        self.infos.extend_from_slice(&source.infos[range.clone()]);
        self.content_type = content_type;

        if content_type == ContentType::Unicode {
            if orig_len == 0 {
                self.pre_context = if range.start == 0 {
                    source.pre_context.clone()
                } else {
                    source.infos[..range.start]
                        .iter()
                        .rev()
                        .take(CONTEXT_LENGTH)
                        .map(|info| info.codepoint)
                        .collect()
                };
            }
            self.post_context = if range.end == source.len() {
                source.post_context.clone()
            } else {
                source.infos[range.end..]
                    .iter()
                    .take(CONTEXT_LENGTH)
                    .map(|info| info.codepoint)
                    .collect()
            };
        }

        Ok(())
    }

    /// Replace the characters in the buffer with shaped glyphs.
    ///
    /// This is the operation a [`Shaper`](crate::shape::Shaper) uses to deliver its output. The
    /// buffer must hold characters (or nothing at all); afterwards its content type is
    /// `Glyphs` and it holds exactly `glyphs`. On error the buffer is left unchanged.
    pub fn replace_with_glyphs<I>(&mut self, glyphs: I) -> Result<(), BufferError>
    where
        I: IntoIterator<Item = ShapedGlyph>,
    {
        self.check_accepts_text()?;

        let glyphs = glyphs.into_iter();
        let mut infos = Vec::new();
        let mut positions = Vec::new();
        let (lower, _) = glyphs.size_hint();
        infos.try_reserve(lower.min(self.max_len))?;
        positions.try_reserve(lower.min(self.max_len))?;
        for glyph in glyphs {
            if infos.len() >= self.max_len {
                return Err(AllocationError::LimitExceeded {
                    limit: self.max_len,
                }
                .into());
            }
            infos.try_reserve(1)?;
            positions.try_reserve(1)?;
            infos.push(GlyphInfo::new(glyph.glyph_id, glyph.cluster));
            positions.push(glyph.position);
        }

        self.infos = infos;
        self.positions = positions;
        self.content_type = ContentType::Glyphs;
        Ok(())
    }

    /// Reverse the order of all elements.
    pub fn reverse(&mut self) {
        let len = self.len();
        self.reverse_range(0..len);
    }

    /// Reverse the order of the elements in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn reverse_range(&mut self, range: Range<usize>) {
        self.infos[range.clone()].reverse();
        if !self.positions.is_empty() {
            self.positions[range].reverse();
        }
    }

    /// Reverse the order of clusters while keeping the elements of each cluster in order.
    pub fn reverse_clusters(&mut self) {
        self.reverse();
        let mut start = 0;
        while start < self.infos.len() {
            let cluster = self.infos[start].cluster;
            let end = self.infos[start..]
                .iter()
                .position(|info| info.cluster != cluster)
                .map_or(self.infos.len(), |n| start + n);
            self.reverse_range(start..end);
            start = end;
        }
    }

    fn check_accepts_text(&self) -> Result<(), BufferError> {
        match self.content_type {
            ContentType::Unicode => Ok(()),
            ContentType::Invalid if self.infos.is_empty() => Ok(()),
            actual => Err(BufferError::ContentType {
                expected: ContentType::Unicode,
                actual,
            }),
        }
    }

    /// Make room for `additional` more elements within the length limit.
    fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        let limit = self.max_len;
        match self.infos.len().checked_add(additional) {
            Some(required) if required <= limit => {}
            _ => return Err(AllocationError::LimitExceeded { limit }.into()),
        }
        self.infos.try_reserve(additional)?;
        Ok(())
    }
}

fn item_range(
    text_length: usize,
    item_offset: usize,
    item_length: Option<usize>,
) -> Result<Range<usize>, BufferError> {
    let out_of_bounds = || BufferError::ItemOutOfBounds {
        offset: item_offset,
        length: item_length.unwrap_or(0),
        text_length,
    };
    let item_length = match item_length {
        Some(length) => length,
        None => text_length.checked_sub(item_offset).ok_or_else(out_of_bounds)?,
    };
    match item_offset.checked_add(item_length) {
        Some(end) if end <= text_length => Ok(item_offset..end),
        _ => Err(out_of_bounds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{clusters, codepoints};

    mod add {
        use super::*;

        #[test]
        fn test_sets_unicode() {
            let mut buffer = Buffer::new();
            assert_eq!(buffer.content_type(), ContentType::Invalid);
            buffer.add(0x1F600, 7).unwrap();
            assert_eq!(buffer.content_type(), ContentType::Unicode);
            assert_eq!(buffer.glyph_infos(), &[GlyphInfo::new(0x1F600, 7)]);
        }

        #[test]
        fn test_does_not_validate() {
            let mut buffer = Buffer::new();
            buffer.add(0xD800, 0).unwrap();
            assert_eq!(codepoints(&buffer), vec![0xD800]);
        }

        #[test]
        fn test_clears_post_context() {
            let mut buffer = Buffer::new();
            buffer.add_utf8_item(b"abcdef", 0, Some(2)).unwrap();
            assert_eq!(buffer.post_context(), &[0x63, 0x64, 0x65, 0x66]);
            buffer.add(0x67, 6).unwrap();
            assert!(buffer.post_context().is_empty());
        }

        #[test]
        fn test_rejected_after_shaping() {
            let mut buffer = Buffer::new();
            buffer.add(0x41, 0).unwrap();
            buffer.set_content_type(ContentType::Glyphs);
            assert_eq!(
                buffer.add(0x42, 1),
                Err(BufferError::ContentType {
                    expected: ContentType::Unicode,
                    actual: ContentType::Glyphs,
                })
            );
            assert_eq!(buffer.len(), 1);
        }
    }

    mod add_item {
        use super::*;

        #[test]
        fn test_clusters_count_from_text_start() {
            let mut buffer = Buffer::new();
            buffer.add_utf8_item(b"hello world", 6, Some(5)).unwrap();
            assert_eq!(codepoints(&buffer), "world".chars().map(u32::from).collect::<Vec<_>>());
            assert_eq!(clusters(&buffer), vec![6, 7, 8, 9, 10]);
        }

        #[test]
        fn test_context() {
            let mut buffer = Buffer::new();
            buffer.add_utf8_item(b"abcdefghijklm", 6, Some(2)).unwrap();
            assert_eq!(codepoints(&buffer), vec![0x67, 0x68]);
            // Nearest first: f e d c b
            assert_eq!(buffer.pre_context(), &[0x66, 0x65, 0x64, 0x63, 0x62]);
            assert_eq!(buffer.post_context(), &[0x69, 0x6A, 0x6B, 0x6C, 0x6D]);
        }

        #[test]
        fn test_pre_context_only_for_empty_buffer() {
            let mut buffer = Buffer::new();
            buffer.add_utf8_item(b"abc", 1, Some(1)).unwrap();
            assert_eq!(buffer.pre_context(), &[0x61]);
            buffer.add_utf8_item(b"xyz", 2, None).unwrap();
            assert_eq!(buffer.pre_context(), &[0x61]);
            assert_eq!(codepoints(&buffer), vec![0x62, 0x7A]);
            assert_eq!(clusters(&buffer), vec![1, 2]);
        }

        #[test]
        fn test_context_decodes_multibyte() {
            let mut buffer = Buffer::new();
            let text = "é😀x".as_bytes();
            buffer.add_utf8_item(text, 6, Some(1)).unwrap();
            assert_eq!(buffer.pre_context(), &[0x1F600, 0xE9]);
            assert_eq!(clusters(&buffer), vec![6]);
        }

        #[test]
        fn test_sequence_split_by_item_end() {
            let mut buffer = Buffer::new();
            // The surrogate pair straddles the end of the item.
            buffer
                .add_utf16_item(&[0x41, 0xD83D, 0xDE00], 0, Some(2))
                .unwrap();
            assert_eq!(codepoints(&buffer), vec![0x41, REPLACEMENT_CHARACTER]);
            assert_eq!(buffer.post_context(), &[REPLACEMENT_CHARACTER]);
        }

        #[test]
        fn test_empty_item_sets_unicode() {
            let mut buffer = Buffer::new();
            buffer.add_utf8(b"").unwrap();
            assert_eq!(buffer.content_type(), ContentType::Unicode);
            assert!(buffer.is_empty());
        }

        #[test]
        fn test_out_of_bounds() {
            let mut buffer = Buffer::new();
            assert_eq!(
                buffer.add_utf8_item(b"abc", 2, Some(2)),
                Err(BufferError::ItemOutOfBounds {
                    offset: 2,
                    length: 2,
                    text_length: 3,
                })
            );
            assert!(matches!(
                buffer.add_utf8_item(b"abc", 4, None),
                Err(BufferError::ItemOutOfBounds { .. })
            ));
            assert_eq!(buffer.content_type(), ContentType::Invalid);
        }

        #[test]
        fn test_whole_slice_equals_full_item() {
            let text = [0x61, 0x62, 0x63];
            let mut whole = Buffer::new();
            whole.add_codepoints(&text).unwrap();
            let mut item = Buffer::new();
            item.add_codepoints_item(&text, 0, Some(3)).unwrap();
            assert_eq!(whole.glyph_infos(), item.glyph_infos());
            assert_eq!(clusters(&whole), vec![0, 1, 2]);
        }
    }

    mod limits {
        use super::*;

        #[test]
        fn test_max_len_rolls_back() {
            let mut buffer = Buffer::new();
            buffer.set_max_len(4);
            buffer.add_str("ab").unwrap();
            let err = buffer.add_str("cde").unwrap_err();
            assert_eq!(
                err,
                BufferError::Allocation(AllocationError::LimitExceeded { limit: 4 })
            );
            assert_eq!(codepoints(&buffer), vec![0x61, 0x62]);
        }

        #[test]
        fn test_multibyte_text_fits_limit() {
            let mut buffer = Buffer::new();
            buffer.set_max_len(2);
            // Six bytes but only two characters.
            buffer.add_str("€€").unwrap();
            assert_eq!(buffer.len(), 2);
        }

        #[test]
        fn test_with_capacity_over_limit() {
            assert!(matches!(
                Buffer::with_capacity(DEFAULT_MAX_LEN + 1),
                Err(BufferError::Allocation(AllocationError::LimitExceeded { .. }))
            ));
            let buffer = Buffer::with_capacity(16).unwrap();
            assert!(buffer.is_empty());
            assert_eq!(buffer.content_type(), ContentType::Invalid);
        }
    }

    mod content_type {
        use super::*;

        #[test]
        fn test_set_glyphs_adds_positions() {
            let mut buffer = Buffer::new();
            buffer.add_str("ab").unwrap();
            buffer.set_content_type(ContentType::Glyphs);
            assert_eq!(buffer.glyph_positions(), &[GlyphPosition::default(); 2]);
            buffer.set_content_type(ContentType::Unicode);
            assert!(buffer.glyph_positions().is_empty());
            assert_eq!(codepoints(&buffer), vec![0x61, 0x62]);
        }

        #[test]
        fn test_invalid_with_contents_rejects_append() {
            let mut buffer = Buffer::new();
            buffer.add_str("a").unwrap();
            buffer.set_content_type(ContentType::Invalid);
            assert!(buffer.add_str("b").is_err());
        }

        #[test]
        fn test_display() {
            assert_eq!(ContentType::Glyphs.to_string(), "glyphs");
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn test_restores_settings() {
            let mut buffer = Buffer::new();
            buffer.add_str("abc").unwrap();
            buffer.set_flags(BufferFlags::BEGINNING_OF_TEXT | BufferFlags::END_OF_TEXT);
            buffer.set_cluster_level(ClusterLevel::Characters);
            buffer.set_replacement_codepoint(0x3F);
            buffer.set_not_found_glyph(3);
            buffer.set_max_len(100);
            buffer.reset();
            assert_eq!(buffer.flags(), BufferFlags::empty());
            assert_eq!(buffer.cluster_level(), ClusterLevel::MonotoneGraphemes);
            assert_eq!(buffer.replacement_codepoint(), REPLACEMENT_CHARACTER);
            assert_eq!(buffer.not_found_glyph(), 0);
            assert_eq!(buffer.max_len(), DEFAULT_MAX_LEN);
        }

        #[test]
        fn test_clear_contents_keeps_settings() {
            let mut buffer = Buffer::new();
            buffer.add_utf8_item(b"abc", 1, Some(1)).unwrap();
            buffer.set_direction(TextDirection::RightToLeft);
            buffer.set_flags(BufferFlags::END_OF_TEXT);
            buffer.set_invisible_glyph(5);
            buffer.clear_contents();
            assert!(buffer.is_empty());
            assert!(buffer.pre_context().is_empty());
            assert!(buffer.post_context().is_empty());
            assert_eq!(buffer.content_type(), ContentType::Invalid);
            assert_eq!(buffer.direction(), TextDirection::Unspecified);
            assert_eq!(buffer.flags(), BufferFlags::END_OF_TEXT);
            assert_eq!(buffer.invisible_glyph(), 5);
        }
    }

    mod append {
        use super::*;

        #[test]
        fn test_range_with_context() {
            let mut source = Buffer::new();
            source.add_str("abcdefgh").unwrap();
            let mut buffer = Buffer::new();
            buffer.append(&source, 2..4).unwrap();
            assert_eq!(codepoints(&buffer), vec![0x63, 0x64]);
            assert_eq!(clusters(&buffer), vec![2, 3]);
            assert_eq!(buffer.pre_context(), &[0x62, 0x61]);
            assert_eq!(buffer.post_context(), &[0x65, 0x66, 0x67, 0x68]);
            assert_eq!(buffer.content_type(), ContentType::Unicode);
        }

        #[test]
        fn test_whole_buffer_keeps_source_context() {
            let mut source = Buffer::new();
            source.add_utf8_item(b"xyabz", 2, Some(2)).unwrap();
            let mut buffer = Buffer::new();
            buffer.append(&source, 0..2).unwrap();
            assert_eq!(buffer.pre_context(), source.pre_context());
            assert_eq!(buffer.post_context(), source.post_context());
        }

        #[test]
        fn test_glyphs() {
            let mut source = Buffer::new();
            source
                .replace_with_glyphs(vec![ShapedGlyph {
                    glyph_id: 9,
                    cluster: 0,
                    position: GlyphPosition::new(600, 0, 0, 0),
                }])
                .unwrap();
            let mut buffer = Buffer::new();
            buffer.append(&source, 0..1).unwrap();
            buffer.append(&source, 0..1).unwrap();
            assert_eq!(buffer.content_type(), ContentType::Glyphs);
            assert_eq!(buffer.len(), 2);
            assert_eq!(buffer.glyph_positions().len(), 2);
        }

        #[test]
        fn test_forced_invalid_source_appends_characters() {
            let mut source = Buffer::new();
            source.add_str("ab").unwrap();
            source.set_content_type(ContentType::Invalid);
            let mut buffer = Buffer::new();
            buffer.append(&source, 0..2).unwrap();
            assert_eq!(buffer.content_type(), ContentType::Unicode);
            buffer.add_str("c").unwrap();
            assert_eq!(codepoints(&buffer), vec![0x61, 0x62, 0x63]);

            buffer.append(&source, 1..2).unwrap();
            assert_eq!(codepoints(&buffer), vec![0x61, 0x62, 0x63, 0x62]);
        }

        #[test]
        fn test_mismatched_content() {
            let mut source = Buffer::new();
            source.add_str("a").unwrap();
            source.set_content_type(ContentType::Glyphs);
            let mut buffer = Buffer::new();
            buffer.add_str("b").unwrap();
            assert_eq!(
                buffer.append(&source, 0..1),
                Err(BufferError::ContentType {
                    expected: ContentType::Unicode,
                    actual: ContentType::Glyphs,
                })
            );
        }

        #[test]
        fn test_out_of_bounds() {
            let source = Buffer::new();
            let mut buffer = Buffer::new();
            assert!(matches!(
                buffer.append(&source, 0..1),
                Err(BufferError::ItemOutOfBounds { .. })
            ));
        }
    }

    mod reverse {
        use super::*;

        #[test]
        fn test_reverse_range() {
            let mut buffer = Buffer::new();
            buffer.add_str("abcd").unwrap();
            buffer.reverse_range(1..3);
            assert_eq!(codepoints(&buffer), vec![0x61, 0x63, 0x62, 0x64]);
        }

        #[test]
        fn test_reverse_clusters_keeps_cluster_order() {
            let mut buffer = Buffer::new();
            for (cp, cluster) in [(1, 0), (2, 0), (3, 1), (4, 2), (5, 2)] {
                buffer.add(cp, cluster).unwrap();
            }
            buffer.reverse_clusters();
            assert_eq!(codepoints(&buffer), vec![4, 5, 3, 1, 2]);
            assert_eq!(clusters(&buffer), vec![2, 2, 1, 0, 0]);
        }

        #[test]
        fn test_positions_follow_infos() {
            let mut buffer = Buffer::new();
            buffer
                .replace_with_glyphs((0..3).map(|i| ShapedGlyph {
                    glyph_id: i,
                    cluster: i,
                    position: GlyphPosition::new(i as i32 * 100, 0, 0, 0),
                }))
                .unwrap();
            buffer.reverse();
            let advances = buffer
                .glyph_positions()
                .iter()
                .map(|pos| pos.hori_advance)
                .collect::<Vec<_>>();
            assert_eq!(advances, vec![200, 100, 0]);
            assert_eq!(clusters(&buffer), vec![2, 1, 0]);
        }
    }

    mod replace_with_glyphs {
        use super::*;

        #[test]
        fn test_rejects_glyph_buffer() {
            let mut buffer = Buffer::new();
            buffer.replace_with_glyphs(Vec::new()).unwrap();
            assert_eq!(buffer.content_type(), ContentType::Glyphs);
            assert!(buffer.replace_with_glyphs(Vec::new()).is_err());
        }

        #[test]
        fn test_limit_leaves_buffer_unchanged() {
            let mut buffer = Buffer::new();
            buffer.add_str("ab").unwrap();
            buffer.set_max_len(2);
            let glyphs = (0..3).map(|i| ShapedGlyph {
                glyph_id: i,
                cluster: 0,
                ..ShapedGlyph::default()
            });
            assert!(buffer.replace_with_glyphs(glyphs).is_err());
            assert_eq!(buffer.content_type(), ContentType::Unicode);
            assert_eq!(codepoints(&buffer), vec![0x61, 0x62]);
        }
    }

    #[test]
    fn test_item_range() {
        assert_eq!(item_range(5, 0, None), Ok(0..5));
        assert_eq!(item_range(5, 2, None), Ok(2..5));
        assert_eq!(item_range(5, 5, None), Ok(5..5));
        assert_eq!(item_range(5, 1, Some(3)), Ok(1..4));
        assert!(item_range(5, 6, None).is_err());
        assert!(item_range(5, usize::MAX, Some(2)).is_err());
    }
}
