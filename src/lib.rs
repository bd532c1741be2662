#![warn(rust_2018_idioms)]

//! A text shaping buffer.
//!
//! [`Buffer`] holds the characters of a run of text together with its direction, script and
//! language until a [`Shaper`] turns them into positioned glyphs, which are then read back from
//! the same buffer.

#[macro_use]
pub mod tag;

pub mod buffer;
pub mod error;
pub mod glyph_position;
pub mod language;
pub mod script;
pub mod segment;
pub mod shape;
pub mod unicode;


#[cfg(test)]
extern crate self as glyphbuf;

pub use crate::buffer::{Buffer, BufferFlags, ClusterLevel, ContentType, GlyphInfo, ShapedGlyph};
pub use crate::error::{AllocationError, BufferError, ParseError};
pub use crate::glyph_position::{GlyphPosition, TextDirection};
pub use crate::language::Language;
pub use crate::script::Script;
pub use crate::segment::SegmentProperties;
pub use crate::shape::{shape, Shaper};
