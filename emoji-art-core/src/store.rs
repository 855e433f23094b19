//! Observable document storage.
//!
//! [`DocumentStore`] owns the current [`EmojiArt`] snapshot. Every mutation is
//! applied to a copy and the copy replaces the snapshot in one step, so
//! subscribers only ever observe whole documents. Optionally the document is
//! written to a JSON file after each change that alters its saved form.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use url::Url;

use crate::error::{ArtError, ArtResult};
use crate::geometry::{Position, Size, Vector};
use crate::{Emoji, EmojiArt, EmojiId};

/// Capacity of the change-event channel. Slow subscribers lag rather than
/// block edits.
const EVENT_CAPACITY: usize = 256;

/// A change applied to the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DocumentEvent {
    /// An emoji was appended.
    EmojiAdded(EmojiId),
    /// An emoji was removed.
    EmojiRemoved(EmojiId),
    /// An emoji moved.
    EmojiMoved {
        /// The emoji.
        id: EmojiId,
        /// Its new position.
        position: Position,
    },
    /// An emoji changed size.
    EmojiResized {
        /// The emoji.
        id: EmojiId,
        /// Its new size.
        size: u32,
    },
    /// The background reference changed.
    BackgroundChanged(Option<Url>),
    /// The background's natural size became known (or was cleared).
    BackgroundSized(Option<Size>),
    /// The whole document was replaced.
    Replaced,
}

impl DocumentEvent {
    /// Whether the change shows up in the saved JSON. The background's
    /// natural size is runtime-only.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Self::BackgroundSized(_))
    }
}

/// Holds the current document and notifies subscribers of changes.
///
/// # Example
///
/// ```
/// use emoji_art_core::{DocumentStore, Position};
///
/// let store = DocumentStore::new();
/// let snapshots = store.subscribe();
///
/// let id = store.add_emoji("👻", Position::new(-200, 150), 200);
/// assert!(snapshots.borrow().emoji(id).is_some());
/// ```
#[derive(Debug)]
pub struct DocumentStore {
    current: watch::Sender<EmojiArt>,
    events: broadcast::Sender<DocumentEvent>,
    /// Optional file the document is saved to after each change.
    path: Option<PathBuf>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create a store holding an empty document, without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_document(EmojiArt::new())
    }

    /// Create a store holding `art`, without persistence.
    #[must_use]
    pub fn from_document(art: EmojiArt) -> Self {
        let (current, _) = watch::channel(art);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current,
            events,
            path: None,
        }
    }

    /// Open a document file, starting empty if it does not exist yet. Every
    /// later change is saved back to the same file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> ArtResult<Self> {
        let path = path.into();
        let art = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let art = EmojiArt::from_json(&contents)?;
            tracing::debug!("Loaded {} emoji from {}", art.len(), path.display());
            art
        } else {
            tracing::debug!("No document at {}, starting empty", path.display());
            EmojiArt::new()
        };
        let mut store = Self::from_document(art);
        store.path = Some(path);
        Ok(store)
    }

    /// File the document is saved to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Receive every new document snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EmojiArt> {
        self.current.subscribe()
    }

    /// Receive individual change events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    /// A copy of the current document.
    #[must_use]
    pub fn snapshot(&self) -> EmojiArt {
        self.current.borrow().clone()
    }

    /// Read the current document without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&EmojiArt) -> R) -> R {
        f(&self.current.borrow())
    }

    /// Add an emoji. See [`EmojiArt::add_emoji`].
    pub fn add_emoji(&self, content: impl Into<String>, at: Position, size: i32) -> EmojiId {
        let content = content.into();
        let mut next = self.snapshot();
        let id = next.add_emoji(content, at, size);
        self.publish(next, vec![DocumentEvent::EmojiAdded(id)]);
        id
    }

    /// Remove an emoji. Absent ids are ignored.
    pub fn remove_emoji(&self, id: EmojiId) -> Option<Emoji> {
        let mut next = self.snapshot();
        let removed = next.remove_emoji(id)?;
        self.publish(next, vec![DocumentEvent::EmojiRemoved(id)]);
        Some(removed)
    }

    /// Move an emoji. Absent ids are ignored.
    pub fn move_emoji(&self, id: EmojiId, by: Vector) {
        let mut next = self.snapshot();
        if !next.move_emoji(id, by) {
            return;
        }
        let position = next.emoji(id).map_or(Position::ZERO, |e| e.position);
        self.publish(next, vec![DocumentEvent::EmojiMoved { id, position }]);
    }

    /// Move several emoji by the same displacement as one change: subscribers
    /// see a single new snapshot and the file is written once. Absent ids are
    /// ignored. Returns how many emoji moved.
    pub fn move_emojis(&self, ids: impl IntoIterator<Item = EmojiId>, by: Vector) -> usize {
        let mut next = self.snapshot();
        let mut events = Vec::new();
        for id in ids {
            if next.move_emoji(id, by) {
                let position = next.emoji(id).map_or(Position::ZERO, |e| e.position);
                events.push(DocumentEvent::EmojiMoved { id, position });
            }
        }
        let moved = events.len();
        if moved > 0 {
            self.publish(next, events);
        }
        moved
    }

    /// Resize an emoji. Absent ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArtError::InvalidArgument`] for a non-positive
    /// factor; the document is not touched.
    pub fn resize_emoji(&self, id: EmojiId, factor: f64) -> ArtResult<()> {
        let mut next = self.snapshot();
        if next.resize_emoji(id, factor)? {
            let size = next.emoji(id).map_or(1, Emoji::size);
            self.publish(next, vec![DocumentEvent::EmojiResized { id, size }]);
        }
        Ok(())
    }

    /// Resize several emoji by the same factor as one change, like
    /// [`DocumentStore::move_emojis`]. Returns how many emoji were resized.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArtError::InvalidArgument`] for a non-positive
    /// factor; the document is not touched.
    pub fn resize_emojis(
        &self,
        ids: impl IntoIterator<Item = EmojiId>,
        factor: f64,
    ) -> ArtResult<usize> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ArtError::invalid_factor(factor));
        }
        let mut next = self.snapshot();
        let mut events = Vec::new();
        for id in ids {
            if next.resize_emoji(id, factor)? {
                let size = next.emoji(id).map_or(1, Emoji::size);
                events.push(DocumentEvent::EmojiResized { id, size });
            }
        }
        let resized = events.len();
        if resized > 0 {
            self.publish(next, events);
        }
        Ok(resized)
    }

    /// Replace the background reference.
    pub fn set_background(&self, reference: Option<Url>) {
        let mut next = self.snapshot();
        next.set_background(reference.clone());
        self.publish(next, vec![DocumentEvent::BackgroundChanged(reference)]);
    }

    /// Record the background's natural size. Subscribers are notified but
    /// the file is not rewritten, since the size is not saved.
    pub fn set_background_size(&self, size: Option<Size>) {
        let mut next = self.snapshot();
        next.set_background_size(size);
        self.publish(next, vec![DocumentEvent::BackgroundSized(size)]);
    }

    /// Replace the whole document.
    pub fn replace(&self, art: EmojiArt) {
        self.publish(art, vec![DocumentEvent::Replaced]);
    }

    /// Write the document to its file now.
    ///
    /// No-op if the store has no file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> ArtResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = self.read(EmojiArt::to_json)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn publish(&self, next: EmojiArt, events: Vec<DocumentEvent>) {
        self.current.send_replace(next);
        let persist = events.iter().any(DocumentEvent::is_persistent);
        for event in events {
            tracing::trace!("Document changed: {event:?}");
            // no subscribers is fine
            let _ = self.events.send(event);
        }
        if !persist {
            return;
        }
        if let Err(e) = self.save() {
            if let Some(path) = &self.path {
                tracing::warn!("Failed to save document to {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_see_whole_snapshots() {
        let store = DocumentStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().expect("open channel"));

        let id = store.add_emoji("🐰", Position::new(1, 2), 30);
        assert!(rx.has_changed().expect("open channel"));
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.emoji(id).map(|e| e.position), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_events_in_order() {
        let store = DocumentStore::new();
        let mut events = store.events();

        let id = store.add_emoji("🦊", Position::ZERO, 10);
        store.move_emoji(id, Vector::new(5, 5));
        store.resize_emoji(id, 2.0).expect("resize");
        store.remove_emoji(id);

        assert_eq!(events.try_recv().ok(), Some(DocumentEvent::EmojiAdded(id)));
        assert_eq!(
            events.try_recv().ok(),
            Some(DocumentEvent::EmojiMoved {
                id,
                position: Position::new(5, 5)
            })
        );
        assert_eq!(
            events.try_recv().ok(),
            Some(DocumentEvent::EmojiResized { id, size: 20 })
        );
        assert_eq!(events.try_recv().ok(), Some(DocumentEvent::EmojiRemoved(id)));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_noops_publish_nothing() {
        let store = DocumentStore::new();
        let mut rx = store.subscribe();
        let missing = EmojiId::from_raw(4);
        store.move_emoji(missing, Vector::new(1, 1));
        store.resize_emoji(missing, 2.0).expect("resize");
        assert!(store.remove_emoji(missing).is_none());
        assert!(!rx.has_changed().expect("open channel"));
    }

    #[test]
    fn test_failed_resize_leaves_snapshot() {
        let store = DocumentStore::new();
        let id = store.add_emoji("🍂", Position::ZERO, 50);
        let mut rx = store.subscribe();
        let result = store.resize_emoji(id, -1.0);
        assert!(matches!(result, Err(ArtError::InvalidArgument(_))));
        assert!(!rx.has_changed().expect("open channel"));
        assert_eq!(store.read(|art| art.emoji(id).map(Emoji::size)), Some(50));
    }

    #[test]
    fn test_autosave_and_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("art.json");

        let store = DocumentStore::open(&path).expect("open");
        assert!(store.read(EmojiArt::is_empty));
        let id = store.add_emoji("🪴", Position::new(-3, 4), 64);
        store.set_background(Url::parse("https://example.com/garden.png").ok());
        assert!(path.exists(), "document should be saved on change");

        let reopened = DocumentStore::open(&path).expect("reopen");
        let art = reopened.snapshot();
        assert_eq!(art.emoji(id).map(Emoji::size), Some(64));
        assert_eq!(
            art.background().map(Url::as_str),
            Some("https://example.com/garden.png")
        );
        assert_eq!(reopened.add_emoji("🍃", Position::ZERO, 1).get(), 2);
    }

    #[test]
    fn test_background_size_is_not_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sized.json");

        let store = DocumentStore::open(&path).expect("open");
        let mut events = store.events();
        store.set_background_size(Some(Size::new(640.0, 480.0)));

        assert!(!path.exists(), "natural size alone should not write the file");
        assert_eq!(
            events.try_recv().ok(),
            Some(DocumentEvent::BackgroundSized(Some(Size::new(640.0, 480.0))))
        );
        assert!(store.read(EmojiArt::background_size).is_some());
    }

    #[test]
    fn test_batched_move_is_one_snapshot() {
        let store = DocumentStore::new();
        let a = store.add_emoji("🚗", Position::new(0, 0), 40);
        let b = store.add_emoji("🚕", Position::new(10, -10), 40);
        let mut rx = store.subscribe();
        rx.mark_unchanged();
        let mut events = store.events();

        let moved = store.move_emojis([a, b, EmojiId::from_raw(99)], Vector::new(3, 4));
        assert_eq!(moved, 2);

        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.emoji(a).map(|e| e.position), Some(Position::new(3, 4)));
        assert_eq!(seen.emoji(b).map(|e| e.position), Some(Position::new(13, -6)));
        assert!(!rx.has_changed().expect("open channel"));

        assert!(matches!(events.try_recv(), Ok(DocumentEvent::EmojiMoved { id, .. }) if id == a));
        assert!(matches!(events.try_recv(), Ok(DocumentEvent::EmojiMoved { id, .. }) if id == b));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_batched_resize_with_bad_factor_changes_nothing() {
        let store = DocumentStore::new();
        let a = store.add_emoji("🌲", Position::ZERO, 50);
        let b = store.add_emoji("🌳", Position::ZERO, 20);
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        let result = store.resize_emojis([a, b], 0.0);
        assert!(matches!(result, Err(ArtError::InvalidArgument(_))));
        assert!(!rx.has_changed().expect("open channel"));

        assert_eq!(store.resize_emojis([a, b], 2.0).expect("resize"), 2);
        let sizes = store.read(|art| (art.emoji(a).map(Emoji::size), art.emoji(b).map(Emoji::size)));
        assert_eq!(sizes, (Some(100), Some(40)));
    }

    #[test]
    fn test_open_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            DocumentStore::open(&path),
            Err(ArtError::Serialization(_))
        ));
    }
}
