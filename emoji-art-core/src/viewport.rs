//! Persistent pan and zoom of the whole canvas.

use serde::{Deserialize, Serialize};

use crate::error::{ArtError, ArtResult};
use crate::geometry::{
    clamp_zoom, grid_to_f64, round_to_grid, to_document, Offset, Point, Position, Rect, Size,
    Vector,
};

/// Canvas pan/zoom. Changed when a gesture ends or by [`Viewport::zoom_to_fit`],
/// never while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan: Offset,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Offset::ZERO,
        }
    }
}

impl Viewport {
    /// Identity viewport: zoom 1, no pan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom (1.0 = 100%).
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan in view pixels.
    #[must_use]
    pub fn pan(&self) -> Offset {
        self.pan
    }

    /// Multiply the zoom by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::InvalidArgument`] if `factor` is not a positive
    /// finite number.
    pub fn scale_zoom(&mut self, factor: f64) -> ArtResult<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ArtError::invalid_factor(factor));
        }
        self.zoom = clamp_zoom(self.zoom * factor);
        Ok(())
    }

    /// Add a view-space translation to the pan.
    pub fn pan_by(&mut self, translation: Offset) {
        self.pan += translation;
    }

    /// Back to zoom 1 and no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Frame `target` inside a viewport of `available` size.
    ///
    /// `target` is in view-relative space: origin at the viewport center, y
    /// down. Degenerate sizes are skipped; they show up transiently during
    /// layout. Returns whether the viewport changed.
    pub fn zoom_to_fit(&mut self, target: Rect, available: Size) -> bool {
        if target.is_empty() || !available.is_positive() {
            tracing::trace!("Skipping zoom to fit: target {target:?}, available {available:?}");
            return false;
        }
        let zoom = (available.width / target.size.width).min(available.height / target.size.height);
        let center = target.center();
        self.zoom = clamp_zoom(zoom);
        self.pan = Offset::new(-center.x * self.zoom, -center.y * self.zoom);
        tracing::debug!("Zoomed to fit: zoom {}, pan {:?}", self.zoom, self.pan);
        true
    }

    /// Convert a view-space drag translation into a document displacement.
    #[must_use]
    pub fn document_delta(&self, translation: Offset) -> Vector {
        let zoom = clamp_zoom(self.zoom);
        Vector::new(
            round_to_grid(translation.width / zoom),
            round_to_grid(-translation.height / zoom),
        )
    }

    /// Map a view point to the document position under it.
    #[must_use]
    pub fn to_document(&self, view_point: Point, viewport_center: Point) -> Position {
        to_document(view_point, viewport_center, self.pan, self.zoom)
    }

    /// Where a document position is drawn, with zoom and pan applied.
    #[must_use]
    pub fn project(&self, position: Position, viewport_center: Point) -> Point {
        Point::new(
            viewport_center.x + grid_to_f64(position.x) * self.zoom + self.pan.width,
            viewport_center.y - grid_to_f64(position.y) * self.zoom + self.pan.height,
        )
    }
}
