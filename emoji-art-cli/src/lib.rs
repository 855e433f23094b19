//! # Emoji Art CLI
//!
//! Command-line host for Emoji Art documents.
//!
//! Every command opens the document file, applies one editor intent, saves
//! and prints the result as JSON.
//!
//! ## Usage
//!
//! ```bash
//! emoji-art --document art.json add 👻 --x -200 --y 150 --size 200
//! emoji-art --document art.json background https://example.com/beach.jpg
//! emoji-art --document art.json fit
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Document path and canvas size
//! - `commands` - Runs a `Command` against an `Editor` and reports the result

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;

pub use commands::{execute, load_background, Report};

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use emoji_art_core::{config, EditorConfig};
use url::Url;

/// Command-line arguments for emoji-art.
#[derive(Debug, Clone, Parser)]
#[command(name = "emoji-art")]
#[command(about = "Edit Emoji Art documents from the command line")]
#[command(version)]
pub struct CliArgs {
    /// Document file, created on first save
    #[arg(long, env = "EMOJI_ART_DOCUMENT", default_value = "emoji-art.json")]
    pub document: PathBuf,

    /// Canvas width in pixels
    #[arg(long, env = "EMOJI_ART_WIDTH", default_value_t = config::DEFAULT_WIDTH)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, env = "EMOJI_ART_HEIGHT", default_value_t = config::DEFAULT_HEIGHT)]
    pub height: f64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Editing commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start an empty document, replacing any existing one
    New,
    /// Print the document and how it would be drawn
    Show,
    /// Add an emoji at a document position
    Add {
        /// The emoji
        emoji: String,
        /// Horizontal position, positive to the right
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        /// Vertical position, positive upwards
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        /// Point size
        #[arg(long, default_value_t = 80)]
        size: i32,
    },
    /// Remove an emoji
    Remove {
        /// Emoji id
        id: u64,
    },
    /// Move an emoji by a document offset
    Move {
        /// Emoji id
        id: u64,
        /// Horizontal offset
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dx: i32,
        /// Vertical offset, positive upwards
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dy: i32,
    },
    /// Scale an emoji
    Resize {
        /// Emoji id
        id: u64,
        /// Scale factor, must be positive
        factor: f64,
    },
    /// Drop text or a URL onto the canvas at a view location
    Drop {
        /// Dropped text; an http(s) URL sets the background
        payload: String,
        /// View x in pixels, from the left edge
        #[arg(long)]
        at_x: Option<f64>,
        /// View y in pixels, from the top edge
        #[arg(long)]
        at_y: Option<f64>,
    },
    /// Set or clear the background image
    Background {
        /// Image URL (http, https or file); omit to clear
        url: Option<Url>,
        /// Store the reference without fetching the image
        #[arg(long)]
        no_fetch: bool,
    },
    /// Report the zoom and pan that frame the whole document
    Fit {
        /// Fetch the background first so its size counts
        #[arg(long)]
        fetch: bool,
    },
    /// List the built-in palettes
    Palettes,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Document file.
    pub document: PathBuf,
    /// Editor settings.
    pub editor: EditorConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: PathBuf::from("emoji-art.json"),
            editor: EditorConfig::default(),
        }
    }
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            document: args.document.clone(),
            editor: EditorConfig::with_canvas_size(args.width, args.height),
        }
    }
}
