//! Input gestures and the transient state of a gesture in flight.
//!
//! Gesture recognition itself happens in the host UI. The editor receives the
//! recognized [`Gesture`]s; while one is in flight only [`GestureState`]
//! changes, and the document or viewport is touched once, when it ends.

use serde::{Deserialize, Serialize};

use crate::geometry::Offset;
use crate::{EmojiId, Selection};

/// Recognized gestures delivered by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", content = "data")]
pub enum Gesture {
    /// Single tap on an emoji, or on the background when `target` is `None`.
    Tap {
        /// Emoji under the tap.
        target: Option<EmojiId>,
    },

    /// Double tap anywhere: zoom to fit the document.
    DoubleTap,

    /// Pinch in progress.
    PinchChanged {
        /// Scale relative to the start of the pinch (1.0 = no change).
        scale: f64,
    },

    /// Pinch finished.
    PinchEnded {
        /// Final scale relative to the start of the pinch.
        scale: f64,
    },

    /// Drag in progress.
    DragChanged {
        /// Emoji the drag started on, `None` for the background.
        origin: Option<EmojiId>,
        /// View-space translation since the drag started.
        translation: Offset,
    },

    /// Drag finished.
    DragEnded {
        /// Emoji the drag started on, `None` for the background.
        origin: Option<EmojiId>,
        /// Final view-space translation.
        translation: Offset,
    },

    /// The host abandoned the gesture; discard in-flight state.
    Cancelled,
}

/// What a drag moves, decided by where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum DragKind {
    /// Started on the background: pans the canvas.
    Canvas,
    /// Started on a selected emoji: moves the whole selection.
    Selection,
    /// Started on an unselected emoji: moves only that emoji.
    Single(EmojiId),
}

impl DragKind {
    /// Classify a drag by the emoji it started on.
    #[must_use]
    pub fn classify(origin: Option<EmojiId>, selection: &Selection) -> Self {
        match origin {
            None => Self::Canvas,
            Some(id) if selection.contains(id) => Self::Selection,
            Some(id) => Self::Single(id),
        }
    }
}

/// A drag in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InFlightDrag {
    /// What the drag moves. Fixed by the first event of the gesture.
    pub kind: DragKind,
    /// Current view-space translation.
    pub translation: Offset,
}

/// Ephemeral per-gesture state. Never persisted; merged into the document or
/// viewport only when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pinch_scale: f64,
    drag: Option<InFlightDrag>,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            pinch_scale: 1.0,
            drag: None,
        }
    }
}

impl GestureState {
    /// Create an idle gesture state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current in-flight pinch scale (1.0 when idle).
    #[must_use]
    pub fn pinch_scale(&self) -> f64 {
        self.pinch_scale
    }

    /// Current in-flight drag.
    #[must_use]
    pub fn drag(&self) -> Option<InFlightDrag> {
        self.drag
    }

    /// Whether any gesture is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.drag.is_some() || (self.pinch_scale - 1.0).abs() > f64::EPSILON
    }

    /// Track the pinch scale.
    pub fn update_pinch(&mut self, scale: f64) {
        self.pinch_scale = scale;
    }

    /// Reset the pinch scale to 1.
    pub fn end_pinch(&mut self) {
        self.pinch_scale = 1.0;
    }

    /// Track a drag. The first call of a gesture classifies it; later calls
    /// only update the translation.
    pub fn update_drag(&mut self, origin: Option<EmojiId>, translation: Offset, selection: &Selection) {
        let kind = self
            .drag
            .map_or_else(|| DragKind::classify(origin, selection), |drag| drag.kind);
        self.drag = Some(InFlightDrag { kind, translation });
    }

    /// Finish the drag, returning what it moves. A drag that ends without any
    /// change events is classified now.
    pub fn end_drag(&mut self, origin: Option<EmojiId>, translation: Offset, selection: &Selection) -> InFlightDrag {
        let kind = self
            .drag
            .take()
            .map_or_else(|| DragKind::classify(origin, selection), |drag| drag.kind);
        InFlightDrag { kind, translation }
    }

    /// Drop everything in flight.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Scale to draw the whole canvas with: the pinch applies to the canvas
    /// only when nothing is selected.
    #[must_use]
    pub fn canvas_scale(&self, selection: &Selection) -> f64 {
        if selection.is_empty() {
            self.pinch_scale
        } else {
            1.0
        }
    }

    /// Pan to add to the persistent pan while the canvas is being dragged.
    #[must_use]
    pub fn canvas_pan(&self) -> Offset {
        match self.drag {
            Some(InFlightDrag {
                kind: DragKind::Canvas,
                translation,
            }) => translation,
            _ => Offset::ZERO,
        }
    }

    /// Extra scale for one emoji: selected emoji follow the pinch.
    #[must_use]
    pub fn emoji_scale(&self, id: EmojiId, selection: &Selection) -> f64 {
        if selection.contains(id) {
            self.pinch_scale
        } else {
            1.0
        }
    }

    /// Extra view offset for one emoji while it is being dragged.
    #[must_use]
    pub fn emoji_offset(&self, id: EmojiId, selection: &Selection) -> Offset {
        match self.drag {
            Some(InFlightDrag {
                kind: DragKind::Selection,
                translation,
            }) if selection.contains(id) => translation,
            Some(InFlightDrag {
                kind: DragKind::Single(dragged),
                translation,
            }) if dragged == id => translation,
            _ => Offset::ZERO,
        }
    }
}
