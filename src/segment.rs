use crate::glyph_position::TextDirection;
use crate::language::Language;
use crate::script::Script;

/// The properties a shaper needs to know about a run of text.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SegmentProperties {
    pub direction: TextDirection,
    pub script: Script,
    pub language: Option<Language>,
}

impl SegmentProperties {
    pub fn new(direction: TextDirection, script: Script, language: Option<Language>) -> Self {
        SegmentProperties {
            direction,
            script,
            language,
        }
    }

    /// Fill in any unset direction and language.
    ///
    /// An unspecified direction is taken from the script, or left-to-right if the script could
    /// be written either way. A missing language becomes the process default. The script is
    /// never changed.
    pub fn guess(&mut self) {
        if !self.direction.is_specified() {
            self.direction = match self.script.horizontal_direction() {
                TextDirection::Unspecified => TextDirection::LeftToRight,
                direction => direction,
            };
        }
        if self.language.is_none() {
            self.language = Language::process_default();
        }
    }
}
