//! The editor: one document plus everything a host UI needs to drive it.
//!
//! The host forwards recognized gestures to [`Editor::handle_gesture`] and
//! drops to [`Editor::drop_payloads`], draws what [`Editor::placements`]
//! returns, and runs background loads for the tickets the editor hands out.
//! All mutation happens through `&mut self` on the thread that owns the
//! editor; load results are delivered back with [`Editor::background_loaded`].

use serde::Serialize;
use url::Url;

use crate::background::{BackgroundStatus, BackgroundTracker, LoadCompletion, LoadTicket};
use crate::config::EditorConfig;
use crate::drop::{resolve, DropIntent, DropOutcome, DropPayload};
use crate::error::{ArtError, ArtResult};
use crate::geometry::{grid_to_f64, round_to_grid, Offset, Point, Position, Rect, Size, Vector};
use crate::gesture::{DragKind, Gesture, GestureState, InFlightDrag};
use crate::{DocumentStore, Emoji, EmojiArt, EmojiId, Selection, Viewport};

/// Zoom and pan the canvas is currently drawn with, including any gesture in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasTransform {
    /// Effective zoom.
    pub zoom: f64,
    /// Effective pan in view pixels.
    pub pan: Offset,
}

/// How to draw one emoji.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// The emoji.
    pub id: EmojiId,
    /// Its grapheme.
    pub string: String,
    /// Where to center the glyph, in view pixels.
    pub center: Point,
    /// Glyph point size on screen.
    pub font_size: f64,
    /// Whether the emoji is selected.
    pub selected: bool,
    /// Selection border width, 0 when unselected.
    pub border_width: f64,
}

/// Document editor.
#[derive(Debug)]
pub struct Editor {
    store: DocumentStore,
    selection: Selection,
    viewport: Viewport,
    gesture: GestureState,
    background: BackgroundTracker,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(DocumentStore::new(), config)
    }

    /// Create an editor over an existing store. If the document already has
    /// a background, its load is pending right away (see
    /// [`Editor::pending_load`]).
    #[must_use]
    pub fn with_store(store: DocumentStore, config: EditorConfig) -> Self {
        let mut background = BackgroundTracker::new();
        background.begin(store.read(|art| art.background().cloned()));
        Self {
            store,
            selection: Selection::new(),
            viewport: Viewport::new(),
            gesture: GestureState::new(),
            background,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The document store, for subscribing to changes.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// A copy of the current document.
    #[must_use]
    pub fn document(&self) -> EmojiArt {
        self.store.snapshot()
    }

    /// All emoji in paint order.
    #[must_use]
    pub fn emojis(&self) -> Vec<Emoji> {
        self.store.read(|art| art.emojis().to_vec())
    }

    /// Look up one emoji.
    #[must_use]
    pub fn emoji(&self, id: EmojiId) -> Option<Emoji> {
        self.store.read(|art| art.emoji(id).cloned())
    }

    /// Background reference.
    #[must_use]
    pub fn background(&self) -> Option<Url> {
        self.store.read(|art| art.background().cloned())
    }

    /// State of the background load.
    #[must_use]
    pub fn background_status(&self) -> &BackgroundStatus {
        self.background.status()
    }

    /// The load the host should run, if one is awaited.
    #[must_use]
    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.background.pending()
    }

    /// Document bounding box, see [`EmojiArt::bounding_box`].
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        self.store.read(EmojiArt::bounding_box)
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Persistent viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// In-flight gesture state.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The host resized the canvas area.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.config.canvas_size = size;
    }

    fn viewport_center(&self) -> Point {
        self.config.canvas_size.center()
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Add an emoji. Sizes below 1 are clamped to 1.
    pub fn add_emoji(&mut self, content: impl Into<String>, at: Position, size: i32) -> EmojiId {
        let id = self.store.add_emoji(content, at, size);
        tracing::debug!("Added emoji {id} at {at:?}");
        id
    }

    /// Remove an emoji and unselect it. Absent ids are ignored.
    pub fn remove_emoji(&mut self, id: EmojiId) {
        if self.store.remove_emoji(id).is_some() {
            tracing::debug!("Removed emoji {id}");
        }
        self.selection.on_remove(id);
    }

    /// Move an emoji by a document displacement. Absent ids are ignored.
    pub fn move_emoji(&mut self, id: EmojiId, by: Vector) {
        self.store.move_emoji(id, by);
    }

    /// Scale an emoji. Absent ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::InvalidArgument`] if `factor <= 0`.
    pub fn resize_emoji(&mut self, id: EmojiId, factor: f64) -> ArtResult<()> {
        self.store.resize_emoji(id, factor)
    }

    /// Replace the background. Returns the load the host should run.
    pub fn set_background(&mut self, reference: Option<Url>) -> Option<LoadTicket> {
        match &reference {
            Some(url) => tracing::info!("Background set to {url}"),
            None => tracing::info!("Background cleared"),
        }
        self.store.set_background(reference.clone());
        self.background.begin(reference)
    }

    /// Swap in a whole document, for example one reloaded from disk. Ids of
    /// the old document mean nothing in the new one, so the selection is
    /// cleared; the viewport and any gesture in flight reset, and the
    /// background load starts over.
    pub fn replace_document(&mut self, art: EmojiArt) -> Option<LoadTicket> {
        let background = art.background().cloned();
        self.store.replace(art);
        self.selection.clear();
        self.viewport.reset();
        self.gesture.cancel();
        self.background.begin(background)
    }

    /// Toggle one emoji's selection.
    pub fn toggle_selection(&mut self, id: EmojiId) {
        self.selection.toggle(id);
    }

    /// Unselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove every selected emoji. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids: Vec<EmojiId> = self.selection.iter().collect();
        let mut removed = 0;
        for id in ids {
            if self.store.remove_emoji(id).is_some() {
                removed += 1;
            }
            self.selection.on_remove(id);
        }
        tracing::debug!("Deleted {removed} selected emoji");
        removed
    }

    /// Frame the whole document in the canvas. Returns whether the viewport
    /// changed; an empty or degenerate document leaves it alone.
    pub fn zoom_to_fit(&mut self) -> bool {
        match self.bounding_box() {
            Some(bbox) => self
                .viewport
                .zoom_to_fit(bbox.flipped_y(), self.config.canvas_size),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Apply a recognized gesture.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::InvalidArgument`] when a pinch ends with a
    /// non-positive scale. In-flight state is reset regardless and nothing is
    /// committed.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> ArtResult<()> {
        match gesture {
            Gesture::Tap { target: Some(id) } => self.toggle_selection(id),
            Gesture::Tap { target: None } => self.clear_selection(),
            Gesture::DoubleTap => {
                self.zoom_to_fit();
            }
            Gesture::PinchChanged { scale } => self.gesture.update_pinch(scale),
            Gesture::PinchEnded { scale } => {
                self.gesture.end_pinch();
                self.commit_pinch(scale)?;
            }
            Gesture::DragChanged {
                origin,
                translation,
            } => self.gesture.update_drag(origin, translation, &self.selection),
            Gesture::DragEnded {
                origin,
                translation,
            } => {
                let drag = self.gesture.end_drag(origin, translation, &self.selection);
                self.commit_drag(drag);
            }
            Gesture::Cancelled => self.gesture.cancel(),
        }
        Ok(())
    }

    fn commit_pinch(&mut self, scale: f64) -> ArtResult<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ArtError::invalid_factor(scale));
        }
        if self.selection.is_empty() {
            self.viewport.scale_zoom(scale)?;
            tracing::debug!("Pinch zoomed canvas to {}", self.viewport.zoom());
            return Ok(());
        }
        let resized = self.store.resize_emojis(self.selection.iter(), scale)?;
        tracing::debug!("Pinch resized {resized} emoji by {scale}");
        Ok(())
    }

    fn commit_drag(&mut self, drag: InFlightDrag) {
        match drag.kind {
            DragKind::Canvas => {
                self.viewport.pan_by(drag.translation);
                tracing::debug!("Panned canvas to {:?}", self.viewport.pan());
            }
            DragKind::Selection => {
                let delta = self.viewport.document_delta(drag.translation);
                let moved = self.store.move_emojis(self.selection.iter(), delta);
                tracing::debug!("Moved {moved} selected emoji by {delta:?}");
            }
            DragKind::Single(id) => {
                let delta = self.viewport.document_delta(drag.translation);
                self.store.move_emoji(id, delta);
                tracing::debug!("Moved emoji {id} by {delta:?}");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Drops and background loads
    // -----------------------------------------------------------------------

    /// Handle a drop at a view location. The first acceptable item is used:
    /// a URL becomes the background, text becomes an emoji sized to match the
    /// palette on screen.
    pub fn drop_payloads(&mut self, payloads: &[DropPayload], location: Point) -> DropOutcome {
        match resolve(payloads) {
            Ok(DropIntent::Background(url)) => {
                self.set_background(Some(url.clone()));
                DropOutcome::BackgroundSet(url)
            }
            Ok(DropIntent::Emoji(content)) => {
                let at = self.viewport.to_document(location, self.viewport_center());
                let size = round_to_grid(self.config.palette_emoji_size / self.viewport.zoom());
                DropOutcome::EmojiAdded(self.add_emoji(content, at, size))
            }
            Err(reason) => {
                tracing::debug!("Drop refused: {reason}");
                DropOutcome::Refused(reason)
            }
        }
    }

    /// Apply a finished background load. Stale results are ignored and
    /// `false` is returned. The first time a background's size becomes known
    /// the canvas zooms to fit it.
    pub fn background_loaded(&mut self, completion: LoadCompletion) -> bool {
        let reference = completion.ticket.reference.clone();
        if self.background() != Some(reference) {
            tracing::debug!("Discarding load of a background no longer in the document");
            return false;
        }
        if !self.background.complete(completion) {
            return false;
        }
        match self.background.status() {
            BackgroundStatus::Ready { size, .. } => {
                let size = *size;
                self.store.set_background_size(Some(size));
                self.viewport
                    .zoom_to_fit(Rect::centered_at(Point::default(), size), self.config.canvas_size);
            }
            BackgroundStatus::Failed { reason, .. } => {
                tracing::warn!("Background failed to load: {reason}");
            }
            BackgroundStatus::Empty | BackgroundStatus::Loading(_) => {}
        }
        true
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Canvas zoom and pan including any pinch or pan in flight.
    #[must_use]
    pub fn canvas_transform(&self) -> CanvasTransform {
        CanvasTransform {
            zoom: self.viewport.zoom() * self.gesture.canvas_scale(&self.selection),
            pan: self.viewport.pan() + self.gesture.canvas_pan(),
        }
    }

    /// Where and how big to draw each emoji, in paint order.
    #[must_use]
    pub fn placements(&self) -> Vec<Placement> {
        let transform = self.canvas_transform();
        let center = self.viewport_center();
        self.store.read(|art| {
            art.emojis()
                .iter()
                .map(|emoji| {
                    let id = emoji.id();
                    let selected = self.selection.contains(id);
                    let scale = self.gesture.emoji_scale(id, &self.selection);
                    let size = f64::from(emoji.size());
                    Placement {
                        id,
                        string: emoji.string().to_string(),
                        center: project(emoji.position, center, transform)
                            + self.gesture.emoji_offset(id, &self.selection),
                        font_size: size * transform.zoom * scale,
                        selected,
                        border_width: if selected {
                            self.config.selection_border_width / scale
                        } else {
                            0.0
                        },
                    }
                })
                .collect()
        })
    }

    /// Topmost emoji whose glyph covers the view point.
    #[must_use]
    pub fn emoji_at(&self, point: Point) -> Option<EmojiId> {
        self.placements()
            .into_iter()
            .rev()
            .find(|p| {
                Rect::centered_at(p.center, Size::new(p.font_size, p.font_size)).contains(point)
            })
            .map(|p| p.id)
    }
}

fn project(position: Position, center: Point, transform: CanvasTransform) -> Point {
    Point::new(
        center.x + grid_to_f64(position.x) * transform.zoom + transform.pan.width,
        center.y - grid_to_f64(position.y) * transform.zoom + transform.pan.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{ImageInfo, LoadOutcome};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    fn editor_with_two() -> (Editor, EmojiId, EmojiId) {
        let mut editor = Editor::new(EditorConfig::with_canvas_size(800.0, 600.0));
        let ghost = editor.add_emoji("👻", Position::new(-200, 150), 200);
        let fire = editor.add_emoji("🔥", Position::new(100, -240), 150);
        (editor, ghost, fire)
    }

    fn drag_end(origin: Option<EmojiId>, dx: f64, dy: f64) -> Gesture {
        Gesture::DragEnded {
            origin,
            translation: Offset::new(dx, dy),
        }
    }

    #[test]
    fn test_selection_drag_moves_with_y_inverted() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.handle_gesture(Gesture::Tap { target: Some(fire) }).expect("tap");

        editor.handle_gesture(drag_end(Some(fire), 10.0, -10.0)).expect("drag");

        assert_eq!(editor.emoji(fire).map(|e| e.position), Some(Position::new(110, -230)));
        assert_eq!(editor.emoji(ghost).map(|e| e.position), Some(Position::new(-200, 150)));
    }

    #[test]
    fn test_drag_unselected_moves_only_it() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.toggle_selection(fire);

        editor
            .handle_gesture(Gesture::DragChanged {
                origin: Some(ghost),
                translation: Offset::new(3.0, 3.0),
            })
            .expect("drag");
        editor.handle_gesture(drag_end(Some(ghost), 20.0, 40.0)).expect("drag");

        assert_eq!(editor.emoji(ghost).map(|e| e.position), Some(Position::new(-180, 110)));
        assert_eq!(editor.emoji(fire).map(|e| e.position), Some(Position::new(100, -240)));
        assert!(editor.selection().contains(fire));
        assert!(!editor.selection().contains(ghost));
    }

    #[test]
    fn test_drag_respects_zoom() {
        let (mut editor, _, fire) = editor_with_two();
        editor.handle_gesture(Gesture::PinchEnded { scale: 2.0 }).expect("pinch");
        editor.toggle_selection(fire);
        editor.handle_gesture(drag_end(Some(fire), 10.0, 10.0)).expect("drag");
        assert_eq!(editor.emoji(fire).map(|e| e.position), Some(Position::new(105, -245)));
    }

    #[test]
    fn test_background_drag_pans() {
        let (mut editor, _, _) = editor_with_two();
        editor
            .handle_gesture(Gesture::DragChanged {
                origin: None,
                translation: Offset::new(5.0, 5.0),
            })
            .expect("drag");
        assert_eq!(editor.canvas_transform().pan, Offset::new(5.0, 5.0));
        assert_eq!(editor.viewport().pan(), Offset::ZERO);

        editor.handle_gesture(drag_end(None, 30.0, -12.0)).expect("drag");
        assert_eq!(editor.viewport().pan(), Offset::new(30.0, -12.0));
        assert_eq!(editor.gesture().drag(), None);
    }

    #[test]
    fn test_pinch_without_selection_zooms_canvas() {
        let (mut editor, ghost, _) = editor_with_two();
        editor.handle_gesture(Gesture::PinchChanged { scale: 1.3 }).expect("pinch");
        assert!(approx(editor.canvas_transform().zoom, 1.3));
        assert!(approx(editor.viewport().zoom(), 1.0));
        // nothing committed mid-gesture
        assert_eq!(editor.emoji(ghost).map(|e| e.size()), Some(200));

        editor.handle_gesture(Gesture::PinchEnded { scale: 1.5 }).expect("pinch");
        assert!(approx(editor.viewport().zoom(), 1.5));
        assert!(approx(editor.gesture().pinch_scale(), 1.0));
        assert_eq!(editor.emoji(ghost).map(|e| e.size()), Some(200));
    }

    #[test]
    fn test_pinch_with_selection_resizes_selected() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.toggle_selection(fire);
        editor.handle_gesture(Gesture::PinchChanged { scale: 1.5 }).expect("pinch");
        let fire_placement = editor
            .placements()
            .into_iter()
            .find(|p| p.id == fire)
            .expect("placement");
        assert!(approx(fire_placement.font_size, 225.0));
        assert!(approx(fire_placement.border_width, 5.0 / 1.5));

        editor.handle_gesture(Gesture::PinchEnded { scale: 1.5 }).expect("pinch");
        assert_eq!(editor.emoji(fire).map(|e| e.size()), Some(225));
        assert_eq!(editor.emoji(ghost).map(|e| e.size()), Some(200));
        assert!(approx(editor.viewport().zoom(), 1.0));
    }

    #[test]
    fn test_gesture_over_selection_updates_every_selected_emoji() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.toggle_selection(ghost);
        editor.toggle_selection(fire);
        let mut snapshots = editor.store().subscribe();
        let mut events = editor.store().events();

        editor.handle_gesture(Gesture::PinchEnded { scale: 0.5 }).expect("pinch");
        assert!(snapshots.has_changed().expect("open channel"));
        let seen = snapshots.borrow_and_update().clone();
        assert_eq!(seen.emoji(ghost).map(|e| e.size()), Some(100));
        assert_eq!(seen.emoji(fire).map(|e| e.size()), Some(75));

        editor.handle_gesture(drag_end(Some(fire), 10.0, 10.0)).expect("drag");
        let seen = snapshots.borrow_and_update().clone();
        assert_eq!(seen.emoji(ghost).map(|e| e.position), Some(Position::new(-190, 140)));
        assert_eq!(seen.emoji(fire).map(|e| e.position), Some(Position::new(110, -250)));

        let received: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert_eq!(received.len(), 4);
    }

    #[test]
    fn test_pinch_with_bad_scale_fails_and_resets() {
        let (mut editor, _, fire) = editor_with_two();
        editor.toggle_selection(fire);
        editor.handle_gesture(Gesture::PinchChanged { scale: 0.5 }).expect("pinch");
        let result = editor.handle_gesture(Gesture::PinchEnded { scale: 0.0 });
        assert!(matches!(result, Err(ArtError::InvalidArgument(_))));
        assert_eq!(editor.emoji(fire).map(|e| e.size()), Some(150));
        assert!(!editor.gesture().is_active());
    }

    #[test]
    fn test_taps_toggle_and_clear() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.handle_gesture(Gesture::Tap { target: Some(ghost) }).expect("tap");
        editor.handle_gesture(Gesture::Tap { target: Some(fire) }).expect("tap");
        editor.handle_gesture(Gesture::Tap { target: Some(ghost) }).expect("tap");
        assert_eq!(editor.selection().iter().collect::<Vec<_>>(), vec![fire]);
        editor.handle_gesture(Gesture::Tap { target: None }).expect("tap");
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_remove_prunes_selection() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.toggle_selection(ghost);
        editor.toggle_selection(fire);
        editor.remove_emoji(ghost);
        assert!(!editor.selection().contains(ghost));
        assert_eq!(editor.delete_selection(), 1);
        assert!(editor.emojis().is_empty());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_gesture_end_after_removal_is_noop() {
        let (mut editor, ghost, _) = editor_with_two();
        editor
            .handle_gesture(Gesture::DragChanged {
                origin: Some(ghost),
                translation: Offset::new(1.0, 1.0),
            })
            .expect("drag");
        editor.remove_emoji(ghost);
        editor.handle_gesture(drag_end(Some(ghost), 9.0, 9.0)).expect("drag");
        assert!(editor.emoji(ghost).is_none());
        assert_eq!(editor.emojis().len(), 1);
    }

    #[test]
    fn test_double_tap_fits_document() {
        let (mut editor, _, _) = editor_with_two();
        editor.handle_gesture(Gesture::DoubleTap).expect("double tap");
        // box is 300 x 390 in an 800 x 600 canvas
        let zoom = editor.viewport().zoom();
        assert!(approx(zoom, 600.0 / 390.0));

        let placements = editor.placements();
        let xs: Vec<f64> = placements.iter().map(|p| p.center.x).collect();
        let ys: Vec<f64> = placements.iter().map(|p| p.center.y).collect();
        assert!(approx((xs[0] + xs[1]) / 2.0, 400.0));
        assert!(approx((ys[0] + ys[1]) / 2.0, 300.0));
        assert!(approx(ys.iter().copied().fold(f64::MIN, f64::max), 600.0));
    }

    #[test]
    fn test_double_tap_on_empty_document_is_noop() {
        let mut editor = Editor::default();
        editor.handle_gesture(Gesture::DoubleTap).expect("double tap");
        assert_eq!(editor.viewport(), &Viewport::new());
    }

    #[test]
    fn test_drop_text_adds_emoji_under_cursor() {
        let mut editor = Editor::new(EditorConfig::with_canvas_size(400.0, 400.0));
        editor.handle_gesture(Gesture::PinchEnded { scale: 2.0 }).expect("pinch");

        let outcome = editor.drop_payloads(
            &[DropPayload::Text("🐸".into())],
            Point::new(300.0, 100.0),
        );
        let DropOutcome::EmojiAdded(id) = outcome else {
            panic!("expected emoji, got {outcome:?}");
        };
        let emoji = editor.emoji(id).expect("emoji");
        assert_eq!(emoji.string(), "🐸");
        assert_eq!(emoji.position, Position::new(50, 50));
        assert_eq!(emoji.size(), 40);
    }

    #[test]
    fn test_drop_refusal_reported() {
        let mut editor = Editor::default();
        let outcome = editor.drop_payloads(&[DropPayload::Data(vec![1])], Point::default());
        assert!(matches!(outcome, DropOutcome::Refused(_)));
        assert!(editor.emojis().is_empty());
    }

    #[test]
    fn test_background_load_fits_once_and_ignores_stale() {
        let mut editor = Editor::new(EditorConfig::with_canvas_size(400.0, 300.0));
        let first = editor
            .set_background(Url::parse("https://example.com/one.png").ok())
            .expect("ticket");
        let second = editor
            .drop_payloads(
                &[DropPayload::from_text("https://example.com/two.png")],
                Point::default(),
            );
        assert!(matches!(second, DropOutcome::BackgroundSet(_)));
        let ticket = editor.pending_load().expect("pending");

        let loaded = |ticket: LoadTicket, w: f64, h: f64| LoadCompletion {
            ticket,
            outcome: LoadOutcome::Image(ImageInfo {
                natural_size: Size::new(w, h),
            }),
        };
        assert!(!editor.background_loaded(loaded(first, 10.0, 10.0)));
        assert!(editor.document().background_size().is_none());

        assert!(editor.background_loaded(loaded(ticket.clone(), 800.0, 300.0)));
        assert!(approx(editor.viewport().zoom(), 0.5));
        assert_eq!(editor.document().background_size(), Some(Size::new(800.0, 300.0)));

        // the same result again does not refit
        editor.handle_gesture(Gesture::PinchEnded { scale: 3.0 }).expect("pinch");
        assert!(!editor.background_loaded(loaded(ticket, 800.0, 300.0)));
        assert!(approx(editor.viewport().zoom(), 1.5));
    }

    #[test]
    fn test_replace_document_resets_view_state() {
        let (mut editor, ghost, fire) = editor_with_two();
        editor.handle_gesture(Gesture::PinchEnded { scale: 2.0 }).expect("pinch");
        editor.toggle_selection(ghost);
        editor.toggle_selection(fire);

        let mut art = EmojiArt::new();
        art.add_emoji("🐝", Position::ZERO, 30);
        art.set_background(Url::parse("https://example.com/hive.png").ok());
        let ticket = editor.replace_document(art).expect("ticket");

        assert_eq!(ticket.reference.as_str(), "https://example.com/hive.png");
        // the new document's 🐝 reuses the ghost's id but must not be selected
        assert!(editor.emoji(ghost).is_some());
        assert!(editor.selection().is_empty());
        assert!(!editor.selection().contains(fire));
        assert_eq!(editor.viewport(), &Viewport::new());
        assert_eq!(editor.emojis().len(), 1);
    }

    #[test]
    fn test_emoji_at_prefers_topmost() {
        let mut editor = Editor::new(EditorConfig::with_canvas_size(200.0, 200.0));
        let below = editor.add_emoji("🐚", Position::ZERO, 40);
        let above = editor.add_emoji("🪨", Position::new(10, 0), 40);
        assert_eq!(editor.emoji_at(Point::new(105.0, 100.0)), Some(above));
        assert_eq!(editor.emoji_at(Point::new(85.0, 100.0)), Some(below));
        assert_eq!(editor.emoji_at(Point::new(10.0, 10.0)), None);
    }
}
