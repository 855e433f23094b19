//! Emoji stickers - the building blocks of a document.

use serde::{Deserialize, Serialize};

use crate::geometry::{to_view, Point, Position, Rect, Size};

/// Unique identifier for an emoji within a document.
///
/// Ids are handed out by [`crate::EmojiArt::add_emoji`] in increasing order
/// and are never reused, even after the emoji is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiId(u64);

impl EmojiId {
    /// Wrap a raw id. Documents assign ids themselves; this exists for
    /// callers that receive ids over an external boundary.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EmojiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An emoji placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    id: EmojiId,
    string: String,
    /// Center of the glyph in document space.
    pub position: Position,
    /// Nominal glyph point size in document units. Always at least 1.
    size: u32,
}

impl Emoji {
    pub(crate) fn new(id: EmojiId, string: String, position: Position, size: u32) -> Self {
        Self {
            id,
            string,
            position,
            size: size.max(1),
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> EmojiId {
        self.id
    }

    /// The emoji grapheme.
    #[must_use]
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Glyph point size.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }

    /// Square occupied by the glyph in view space at zoom 1.
    #[must_use]
    pub fn frame(&self, viewport_center: Point) -> Rect {
        let side = f64::from(self.size);
        Rect::centered_at(to_view(self.position, viewport_center), Size::new(side, side))
    }
}
