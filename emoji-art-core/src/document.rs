//! The emoji art document: a background reference and an ordered list of emoji.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ArtError, ArtResult};
use crate::geometry::{grid_to_f64, Point, Position, Rect, Size, Vector};
use crate::{Emoji, EmojiId};

/// A document value.
///
/// Mutating methods take `&mut self` on a plain value; shared views of the
/// document go through [`crate::DocumentStore`], which applies each mutation
/// to a copy and publishes the result as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmojiArt {
    /// Background image reference. Never fetched by the document.
    background: Option<Url>,
    /// Emoji in paint order; later entries draw on top.
    emojis: Vec<Emoji>,
    /// Last id handed out.
    #[serde(default)]
    next_id: u64,
    /// Natural size of the background image, once reported by a loader.
    #[serde(skip)]
    background_size: Option<Size>,
}

impl EmojiArt {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new emoji and return its id.
    ///
    /// Sizes below 1 are clamped to 1.
    pub fn add_emoji(&mut self, content: impl Into<String>, at: Position, size: i32) -> EmojiId {
        self.next_id += 1;
        let id = EmojiId::from_raw(self.next_id);
        let size = size.max(1).unsigned_abs();
        self.emojis.push(Emoji::new(id, content.into(), at, size));
        id
    }

    /// Remove an emoji. Returns the removed emoji, or `None` if it was absent.
    pub fn remove_emoji(&mut self, id: EmojiId) -> Option<Emoji> {
        let index = self.index_of(id)?;
        Some(self.emojis.remove(index))
    }

    /// Move an emoji by a document-space displacement.
    ///
    /// Returns `false` if the id is absent.
    pub fn move_emoji(&mut self, id: EmojiId, by: Vector) -> bool {
        self.replace(id, |emoji| {
            let mut moved = emoji.clone();
            moved.position += by;
            moved
        })
    }

    /// Scale an emoji's size by `factor`, rounding to the nearest unit and
    /// never going below 1.
    ///
    /// Returns `Ok(false)` if the id is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::InvalidArgument`] if `factor` is not a positive
    /// finite number. The document is left unchanged.
    pub fn resize_emoji(&mut self, id: EmojiId, factor: f64) -> ArtResult<bool> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ArtError::invalid_factor(factor));
        }
        Ok(self.replace(id, |emoji| {
            let mut resized = emoji.clone();
            resized.set_size(scaled_size(emoji.size(), factor));
            resized
        }))
    }

    /// Replace the background reference. Clears any recorded natural size.
    pub fn set_background(&mut self, reference: Option<Url>) {
        self.background = reference;
        self.background_size = None;
    }

    /// Record the background's natural size as reported by an image loader.
    pub fn set_background_size(&mut self, size: Option<Size>) {
        self.background_size = size;
    }

    /// Background reference.
    #[must_use]
    pub fn background(&self) -> Option<&Url> {
        self.background.as_ref()
    }

    /// Natural size of the background image, if known.
    #[must_use]
    pub fn background_size(&self) -> Option<Size> {
        self.background_size
    }

    /// All emoji in paint order.
    #[must_use]
    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    /// Look up an emoji by id.
    #[must_use]
    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|e| e.id() == id)
    }

    /// Whether an emoji with this id exists.
    #[must_use]
    pub fn contains(&self, id: EmojiId) -> bool {
        self.index_of(id).is_some()
    }

    /// Number of emoji.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    /// Whether the document has no emoji.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    /// Smallest document-space rectangle (y up) enclosing every emoji
    /// position and, when its size is known, the background centered on the
    /// origin. Glyph extents are not included.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let emojis = Rect::enclosing(
            self.emojis
                .iter()
                .map(|e| Point::new(grid_to_f64(e.position.x), grid_to_f64(e.position.y))),
        );
        let background = self
            .background_size
            .map(|size| Rect::centered_at(Point::default(), size));
        match (emojis, background) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ArtResult<String> {
        serde_json::to_string(self).map_err(ArtError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// The id counter is raised past the largest stored id so new emoji never
    /// reuse one.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicate ids.
    pub fn from_json(json: &str) -> ArtResult<Self> {
        let mut art: Self = serde_json::from_str(json)?;
        let mut ids: Vec<EmojiId> = art.emojis.iter().map(Emoji::id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(ArtError::InvalidArgument(format!(
                "duplicate emoji id {}",
                pair[0]
            )));
        }
        if let Some(max) = ids.last() {
            art.next_id = art.next_id.max(max.get());
        }
        for emoji in &mut art.emojis {
            let size = emoji.size();
            emoji.set_size(size);
        }
        Ok(art)
    }

    fn index_of(&self, id: EmojiId) -> Option<usize> {
        self.emojis.iter().position(|e| e.id() == id)
    }

    /// Copy-modify-replace the emoji with this id.
    fn replace(&mut self, id: EmojiId, f: impl FnOnce(&Emoji) -> Emoji) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::trace!("No emoji with id {id}");
            return false;
        };
        let updated = f(&self.emojis[index]);
        debug_assert_eq!(updated.id(), id);
        self.emojis[index] = updated;
        true
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_size(size: u32, factor: f64) -> u32 {
    let scaled = (f64::from(size) * factor).round();
    scaled.clamp(1.0, f64::from(u32::MAX)) as u32
}
