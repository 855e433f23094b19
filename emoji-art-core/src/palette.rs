//! Emoji palettes: the drag sources offered next to the canvas.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A named set of emoji, each appearing once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Display name.
    pub name: String,
    emojis: String,
}

impl Palette {
    /// Create a palette. Repeated emoji are dropped, keeping the first
    /// occurrence.
    #[must_use]
    pub fn new(name: impl Into<String>, emojis: &str) -> Self {
        Self {
            name: name.into(),
            emojis: uniqued(emojis),
        }
    }

    /// The palettes available out of the box.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new("Faces", "😀😃😄😁😆😅😂🤣🥹😊😇🙂🙃😉😌😍🥰😘"),
            Self::new("Clothes", "🩴🩱🩲🩳👙👚👛👜👗👘🥻👠👡👢"),
            Self::new("Animals", "🐶🐱🐭🐹🐰🦊🐻🐼🐨🐯🦁🐮🐷🐸🐵"),
            Self::new("Plants", "🪴🎋🍃🍂🍁🍄🍄‍🟫🐚🪨🌵🌲🌳🌴🌱🌿"),
            Self::new("Vehicles", "🛺🚨🚔🚍🚘🚖🛞🚡🚠🚗🚕🚙🚌🚎🏎️"),
        ]
    }

    /// Each emoji as its own string, in palette order.
    #[must_use]
    pub fn emojis(&self) -> Vec<String> {
        clusters(&self.emojis).map(str::to_string).collect()
    }

    /// The palette's emoji concatenated.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.emojis
    }

    /// Number of emoji.
    #[must_use]
    pub fn len(&self) -> usize {
        clusters(&self.emojis).count()
    }

    /// Whether the palette has no emoji.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }
}

/// Remove repeated emoji, keeping first occurrences in order.
#[must_use]
pub fn uniqued(emojis: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for cluster in clusters(emojis) {
        if !seen.contains(&cluster) {
            seen.push(cluster);
        }
    }
    seen.concat()
}

/// Split a string into extended grapheme clusters, so flags, keycaps and
/// joined sequences each come out whole.
fn clusters(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}
