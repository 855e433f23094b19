//! Running commands against an editor.

use std::sync::Arc;

use anyhow::Context;
use emoji_art_core::{
    spawn_load, BackgroundStatus, CanvasTransform, DropOutcome, DropPayload, Editor, EmojiArt,
    EmojiId, ImageLoader, Palette, Placement, Point, Position, Vector,
};
use serde::Serialize;
use tokio::sync::mpsc;
use url::Url;

use crate::Command;

/// What a command did, printed as JSON.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Report {
    /// The whole document and how it is drawn.
    Document {
        /// The document.
        document: EmojiArt,
        /// Draw list in paint order.
        placements: Vec<Placement>,
    },
    /// An emoji was added.
    Added {
        /// Its id.
        id: EmojiId,
    },
    /// An emoji was removed, or was not there.
    Removed {
        /// The id asked for.
        id: EmojiId,
        /// Whether the document had it.
        existed: bool,
    },
    /// Where an emoji is after a move.
    Moved {
        /// The id asked for.
        id: EmojiId,
        /// New position, absent if the emoji does not exist.
        position: Option<Position>,
    },
    /// An emoji's size after a resize.
    Resized {
        /// The id asked for.
        id: EmojiId,
        /// New size, absent if the emoji does not exist.
        size: Option<u32>,
    },
    /// What a drop did.
    Dropped {
        /// Drop outcome.
        outcome: DropOutcome,
    },
    /// The background and its load state.
    Background {
        /// Current reference.
        reference: Option<Url>,
        /// Load state.
        status: BackgroundStatus,
    },
    /// The transform that frames the document.
    Fit {
        /// Whether there was anything to frame.
        changed: bool,
        /// Resulting zoom and pan.
        transform: CanvasTransform,
    },
    /// The built-in palettes.
    Palettes {
        /// Palettes in display order.
        palettes: Vec<Palette>,
    },
}

/// Run one command against the editor. Background images are fetched with
/// `loader` when the command needs their size.
///
/// # Errors
///
/// Returns an error if the command's arguments are rejected by the editor.
pub async fn execute(
    editor: &mut Editor,
    command: Command,
    loader: Arc<dyn ImageLoader>,
) -> anyhow::Result<Report> {
    let report = match command {
        Command::New => {
            editor.replace_document(EmojiArt::new());
            document_report(editor)
        }
        Command::Show => document_report(editor),
        Command::Add { emoji, x, y, size } => Report::Added {
            id: editor.add_emoji(emoji, Position::new(x, y), size),
        },
        Command::Remove { id } => {
            let id = EmojiId::from_raw(id);
            let existed = editor.emoji(id).is_some();
            editor.remove_emoji(id);
            Report::Removed { id, existed }
        }
        Command::Move { id, dx, dy } => {
            let id = EmojiId::from_raw(id);
            editor.move_emoji(id, Vector::new(dx, dy));
            Report::Moved {
                id,
                position: editor.emoji(id).map(|e| e.position),
            }
        }
        Command::Resize { id, factor } => {
            let id = EmojiId::from_raw(id);
            editor
                .resize_emoji(id, factor)
                .with_context(|| format!("Failed to resize emoji {id}"))?;
            Report::Resized {
                id,
                size: editor.emoji(id).map(|e| e.size()),
            }
        }
        Command::Drop {
            payload,
            at_x,
            at_y,
        } => {
            let center = editor.config().canvas_size.center();
            let location = Point::new(at_x.unwrap_or(center.x), at_y.unwrap_or(center.y));
            let outcome = editor.drop_payloads(&[DropPayload::from_text(&payload)], location);
            Report::Dropped { outcome }
        }
        Command::Background { url, no_fetch } => {
            editor.set_background(url);
            if !no_fetch {
                load_background(editor, loader).await?;
            }
            Report::Background {
                reference: editor.background(),
                status: editor.background_status().clone(),
            }
        }
        Command::Fit { fetch } => {
            if fetch {
                load_background(editor, loader).await?;
            }
            let changed = editor.zoom_to_fit();
            Report::Fit {
                changed,
                transform: editor.canvas_transform(),
            }
        }
        Command::Palettes => Report::Palettes {
            palettes: Palette::builtin(),
        },
    };
    Ok(report)
}

/// Run the editor's pending background load, if any, and apply the result.
/// Returns whether a result was applied.
///
/// # Errors
///
/// Returns an error if the load task dies without reporting back.
pub async fn load_background(
    editor: &mut Editor,
    loader: Arc<dyn ImageLoader>,
) -> anyhow::Result<bool> {
    let Some(ticket) = editor.pending_load() else {
        return Ok(false);
    };
    tracing::debug!("Loading background {}", ticket.reference);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = spawn_load(loader, ticket, tx);
    let completion = rx
        .recv()
        .await
        .context("Background load ended without a result")?;
    task.await.context("Background load task failed")?;
    Ok(editor.background_loaded(completion))
}

fn document_report(editor: &Editor) -> Report {
    Report::Document {
        document: editor.document(),
        placements: editor.placements(),
    }
}
