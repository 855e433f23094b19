//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// Point size of emoji in the palette. Dropped emoji get this size divided by
/// the current zoom, so they land on screen at the size they were dragged at.
pub const PALETTE_EMOJI_SIZE: f64 = 80.0;

/// Width of the border drawn around selected emoji.
pub const SELECTION_BORDER_WIDTH: f64 = 5.0;

/// Editor settings supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size of the area the canvas is drawn into.
    pub canvas_size: Size,
    /// Palette glyph size, see [`PALETTE_EMOJI_SIZE`].
    pub palette_emoji_size: f64,
    /// Selection border width at zoom 1.
    pub selection_border_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            palette_emoji_size: PALETTE_EMOJI_SIZE,
            selection_border_width: SELECTION_BORDER_WIDTH,
        }
    }
}

impl EditorConfig {
    /// Default settings for a canvas of the given size.
    #[must_use]
    pub fn with_canvas_size(width: f64, height: f64) -> Self {
        Self {
            canvas_size: Size::new(width, height),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"palette_emoji_size": 40.0}"#).expect("parse");
        assert!((config.palette_emoji_size - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.canvas_size, Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }
}
