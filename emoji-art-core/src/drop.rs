//! Drag-and-drop and paste payloads.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::EmojiId;

/// One item of a heterogeneous drop payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DropPayload {
    /// A URL, used as the background reference.
    Url(Url),
    /// Text, used as an emoji (or as a URL when it looks like one).
    Text(String),
    /// Raw bytes. Not accepted.
    Data(Vec<u8>),
}

impl DropPayload {
    /// Build a payload from dropped text, recognizing web URLs.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.starts_with("http") {
            if let Ok(url) = Url::parse(trimmed) {
                return Self::Url(url);
            }
        }
        Self::Text(text.to_string())
    }
}

/// What an accepted drop asks the editor to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    /// Set the background.
    Background(Url),
    /// Add an emoji with this content at the drop location.
    Emoji(String),
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum DropOutcome {
    /// The background was replaced.
    BackgroundSet(Url),
    /// An emoji was added.
    EmojiAdded(EmojiId),
    /// Nothing acceptable was in the payload.
    Refused(String),
}

impl DropOutcome {
    /// Whether the drop was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Refused(_))
    }
}

/// Pick the first acceptable item.
///
/// # Errors
///
/// Returns the reason when no item is acceptable.
pub fn resolve(payloads: &[DropPayload]) -> Result<DropIntent, String> {
    let mut refused = Vec::new();
    for payload in payloads {
        match payload {
            DropPayload::Url(url) => return Ok(DropIntent::Background(url.clone())),
            DropPayload::Text(text) if !text.trim().is_empty() => {
                return Ok(DropIntent::Emoji(text.trim().to_string()));
            }
            DropPayload::Text(_) => refused.push("empty text".to_string()),
            DropPayload::Data(bytes) => refused.push(format!("{} bytes of raw data", bytes.len())),
        }
    }
    if refused.is_empty() {
        Err("empty payload".to_string())
    } else {
        Err(format!("no usable item: {}", refused.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_acceptable_item_wins() {
        let url = Url::parse("https://example.com/bg.png").expect("url");
        let payloads = vec![
            DropPayload::Data(vec![1, 2, 3]),
            DropPayload::Text("🔥".into()),
            DropPayload::Url(url),
        ];
        assert_eq!(resolve(&payloads), Ok(DropIntent::Emoji("🔥".into())));
    }

    #[test]
    fn test_refusal_reports_reason() {
        let reason = resolve(&[DropPayload::Data(vec![0; 4]), DropPayload::Text("  ".into())])
            .expect_err("refused");
        assert!(reason.contains("4 bytes"));
        assert!(reason.contains("empty text"));
        assert_eq!(resolve(&[]), Err("empty payload".to_string()));
    }

    #[test]
    fn test_from_text_recognizes_urls() {
        assert!(matches!(
            DropPayload::from_text(" https://example.com/x.jpg\n"),
            DropPayload::Url(_)
        ));
        assert_eq!(DropPayload::from_text("👻"), DropPayload::Text("👻".into()));
        assert_eq!(
            DropPayload::from_text("httpish"),
            DropPayload::Text("httpish".into())
        );
    }
}
