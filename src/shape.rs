//! The contract between a [`Buffer`] and the shaping engine that fills it with glyphs.

use log::warn;

use crate::buffer::{Buffer, ContentType};
use crate::error::BufferError;

/// A shaping engine.
///
/// Implementations read the characters and segment properties of the buffer and deliver their
/// output with [`Buffer::replace_with_glyphs`] (or by editing the glyph infos and positions in
/// place and setting the content type to `Glyphs`). Font and feature data belong to the
/// implementation, not to the buffer.
pub trait Shaper {
    type Error: From<BufferError>;

    fn shape(&self, buffer: &mut Buffer) -> Result<(), Self::Error>;
}

/// Shape the characters in `buffer` with `shaper`.
///
/// The buffer must hold characters; a buffer that has never had text added is shaped as empty
/// text. Unset direction and language are guessed before the shaper runs. If the shaper
/// returns without leaving glyphs in the buffer an error is returned.
///
/// When the shaper fails, the content type and segment properties the buffer had before the
/// call are restored.
pub fn shape<S: Shaper>(shaper: &S, buffer: &mut Buffer) -> Result<(), S::Error> {
    let content_type = buffer.content_type();
    let props = buffer.segment_properties();
    match content_type {
        ContentType::Unicode => {}
        ContentType::Invalid if buffer.is_empty() => buffer.set_content_type(ContentType::Unicode),
        actual => {
            return Err(BufferError::ContentType {
                expected: ContentType::Unicode,
                actual,
            }
            .into())
        }
    }
    buffer.guess_segment_properties();

    if let Err(err) = shaper.shape(buffer) {
        if buffer.content_type() != ContentType::Glyphs {
            buffer.set_content_type(content_type);
            buffer.set_segment_properties(props);
        }
        return Err(err);
    }

    match buffer.content_type() {
        ContentType::Glyphs => Ok(()),
        actual => {
            warn!("shaper left buffer with {} content", actual);
            Err(BufferError::ContentType {
                expected: ContentType::Glyphs,
                actual,
            }
            .into())
        }
    }
}
