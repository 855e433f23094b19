//! The set of selected emoji.

use std::collections::BTreeSet;

use crate::{EmojiArt, EmojiId};

/// Selected emoji ids.
///
/// Kept in id order so that commits touching every selected emoji apply in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EmojiId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the id if unselected, unselect it otherwise.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: EmojiId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Select an id.
    pub fn insert(&mut self, id: EmojiId) {
        self.ids.insert(id);
    }

    /// Unselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop an id that was removed from the document.
    pub fn on_remove(&mut self, id: EmojiId) {
        self.ids.remove(&id);
    }

    /// Drop every id the document no longer contains.
    pub fn retain_present(&mut self, art: &EmojiArt) {
        self.ids.retain(|id| art.contains(*id));
    }

    /// Whether the id is selected.
    #[must_use]
    pub fn contains(&self, id: EmojiId) -> bool {
        self.ids.contains(&id)
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EmojiId> + '_ {
        self.ids.iter().copied()
    }
}
