//! # Emoji Art
//!
//! Command-line editor for Emoji Art documents.

use std::sync::Arc;

use clap::Parser;
use emoji_art_cli::{execute, CliArgs, CliConfig};
use emoji_art_core::{DocumentStore, Editor, ImageLoader, NetImageLoader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emoji_art=info,emoji_art_cli=info,emoji_art_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = CliConfig::from(&args);

    tracing::debug!(
        "Canvas {}x{}, document {}",
        config.editor.canvas_size.width,
        config.editor.canvas_size.height,
        config.document.display()
    );

    let store = DocumentStore::open(&config.document)?;
    let mut editor = Editor::with_store(store, config.editor);
    let loader: Arc<dyn ImageLoader> = Arc::new(NetImageLoader::new());

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(execute(&mut editor, args.command, loader))?;

    // Autosave can fail quietly; make the final write loud
    editor.store().save()?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
