//! # Emoji Art Core
//!
//! Document model and interaction core for a drag-and-drop emoji sticker
//! canvas. Rendering and gesture recognition live in the host; this crate
//! owns the data and the rules for changing it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  DocumentStore    │  Gesture state          │
//! │  - EmojiArt       │  - in-flight pinch/drag │
//! │  - change events  │  - commit on gesture end│
//! ├─────────────────────────────────────────────┤
//! │  Selection        │  Viewport               │
//! │  - selected ids   │  - pan / zoom           │
//! │                   │  - zoom to fit          │
//! ├─────────────────────────────────────────────┤
//! │  Geometry: document space <-> view space    │
//! └─────────────────────────────────────────────┘
//!         ▲ load tickets / completions
//!         ▼
//!   ImageLoader (off the editing thread)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod config;
pub mod document;
pub mod drop;
pub mod editor;
pub mod emoji;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod palette;
pub mod selection;
pub mod store;
pub mod viewport;

pub use background::{
    spawn_load, BackgroundStatus, BackgroundTracker, ImageInfo, ImageLoadError, ImageLoader,
    LoadCompletion, LoadOutcome, LoadTicket, NetImageLoader,
};
pub use config::EditorConfig;
pub use document::EmojiArt;
pub use drop::{DropOutcome, DropPayload};
pub use editor::{CanvasTransform, Editor, Placement};
pub use emoji::{Emoji, EmojiId};
pub use error::{ArtError, ArtResult};
pub use geometry::{Offset, Point, Position, Rect, Size, Vector};
pub use gesture::{DragKind, Gesture, GestureState};
pub use palette::Palette;
pub use selection::Selection;
pub use store::{DocumentEvent, DocumentStore};
pub use viewport::Viewport;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
