//! Background image loading.
//!
//! The document only stores a background [`Url`]. Resolving it to an image is
//! the job of an [`ImageLoader`], which runs off the editing thread. Results
//! come back as [`LoadCompletion`]s and are checked against the
//! [`BackgroundTracker`]; a completion for a reference that has since been
//! replaced is stale and discarded.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::geometry::Size;

/// Errors from resolving a background reference.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The URL scheme has no loader.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a recognizable image.
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoding task panicked or was cancelled.
    #[error("Decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What a loader learned about an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Natural size in pixels.
    pub natural_size: Size,
}

/// Resolves background references to images.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Load the image behind `reference`.
    async fn load(&self, reference: &Url) -> Result<ImageInfo, ImageLoadError>;
}

/// Loads `http`, `https` and `file` references.
#[derive(Debug, Clone, Default)]
pub struct NetImageLoader {
    client: reqwest::Client,
}

impl NetImageLoader {
    /// Create a loader with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, reference: &Url) -> Result<Vec<u8>, ImageLoadError> {
        match reference.scheme() {
            "http" | "https" => {
                let response = self.client.get(reference.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ImageLoadError::Status(status.as_u16()));
                }
                Ok(response.bytes().await?.to_vec())
            }
            "file" => {
                let path = reference
                    .to_file_path()
                    .map_err(|()| ImageLoadError::UnsupportedScheme(reference.to_string()))?;
                Ok(tokio::fs::read(path).await?)
            }
            other => Err(ImageLoadError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[async_trait]
impl ImageLoader for NetImageLoader {
    async fn load(&self, reference: &Url) -> Result<ImageInfo, ImageLoadError> {
        let bytes = self.fetch(reference).await?;
        tracing::debug!("Fetched {} bytes for {reference}", bytes.len());
        let natural_size = tokio::task::spawn_blocking(move || image_dimensions(&bytes)).await??;
        Ok(ImageInfo { natural_size })
    }
}

/// Read an encoded image's dimensions from its header.
///
/// # Errors
///
/// Returns an error if the format cannot be recognized or the header is
/// malformed.
pub fn image_dimensions(bytes: &[u8]) -> Result<Size, ImageLoadError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Size::new(f64::from(width), f64::from(height)))
}

/// Identifies one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// The reference being loaded.
    pub reference: Url,
    /// Bumped every time the background changes.
    pub generation: u64,
}

/// Result of a load request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The image was resolved.
    Image(ImageInfo),
    /// The image could not be resolved. The reason is for display only.
    Failure(String),
}

/// A finished load, delivered back to the editing thread.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    /// The request this answers.
    pub ticket: LoadTicket,
    /// What happened.
    pub outcome: LoadOutcome,
}

/// State of the current background.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum BackgroundStatus {
    /// No background.
    #[default]
    Empty,
    /// Waiting on the loader.
    Loading(Url),
    /// Loaded; the natural size is known.
    Ready {
        /// The reference.
        reference: Url,
        /// Natural size in pixels.
        size: Size,
    },
    /// The loader failed.
    Failed {
        /// The reference.
        reference: Url,
        /// Loader's reason.
        reason: String,
    },
}

/// Tracks which load is current.
#[derive(Debug, Clone, Default)]
pub struct BackgroundTracker {
    generation: u64,
    status: BackgroundStatus,
}

impl BackgroundTracker {
    /// Create a tracker with no background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &BackgroundStatus {
        &self.status
    }

    /// Switch to a new reference. Any load still in flight becomes stale.
    /// Returns the ticket for loading the new reference.
    pub fn begin(&mut self, reference: Option<Url>) -> Option<LoadTicket> {
        self.generation += 1;
        match reference {
            Some(reference) => {
                self.status = BackgroundStatus::Loading(reference.clone());
                Some(LoadTicket {
                    reference,
                    generation: self.generation,
                })
            }
            None => {
                self.status = BackgroundStatus::Empty;
                None
            }
        }
    }

    /// The ticket for the load currently awaited, if any.
    #[must_use]
    pub fn pending(&self) -> Option<LoadTicket> {
        match &self.status {
            BackgroundStatus::Loading(reference) => Some(LoadTicket {
                reference: reference.clone(),
                generation: self.generation,
            }),
            _ => None,
        }
    }

    /// Whether the completion answers the current request.
    #[must_use]
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && matches!(&self.status, BackgroundStatus::Loading(r) if *r == ticket.reference)
    }

    /// Apply a completion. Returns `false` if it was stale and ignored.
    pub fn complete(&mut self, completion: LoadCompletion) -> bool {
        if !self.is_current(&completion.ticket) {
            tracing::debug!(
                "Discarding stale load of {} (generation {}, current {})",
                completion.ticket.reference,
                completion.ticket.generation,
                self.generation
            );
            return false;
        }
        let reference = completion.ticket.reference;
        self.status = match completion.outcome {
            LoadOutcome::Image(info) => BackgroundStatus::Ready {
                reference,
                size: info.natural_size,
            },
            LoadOutcome::Failure(reason) => {
                tracing::debug!("Background {reference} failed to load: {reason}");
                BackgroundStatus::Failed { reference, reason }
            }
        };
        true
    }
}

/// Run a load on the tokio runtime and send the completion back over
/// `sender`. The receiving side owns the editor and applies it with
/// [`crate::Editor::background_loaded`].
pub fn spawn_load(
    loader: Arc<dyn ImageLoader>,
    ticket: LoadTicket,
    sender: mpsc::UnboundedSender<LoadCompletion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match loader.load(&ticket.reference).await {
            Ok(info) => LoadOutcome::Image(info),
            Err(e) => LoadOutcome::Failure(e.to_string()),
        };
        if sender.send(LoadCompletion { ticket, outcome }).is_err() {
            tracing::debug!("Editor went away before the background loaded");
        }
    })
}
