use serde::{Deserialize, Serialize};

/// Maps a marker found in a file name to the label shown on the loading screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelRule {
    pub marker: String,
    pub label: String,
}

impl LabelRule {
    pub fn new(marker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            label: label.into(),
        }
    }
}

pub const FALLBACK_LABEL: &str = "user interface";

pub fn default_rules() -> Vec<LabelRule> {
    vec![
        LabelRule::new("canvaskit", "framework"),
        LabelRule::new("rust", "algorithms"),
    ]
}

#[derive(Debug, Clone)]
pub struct Labeler {
    rules: Vec<LabelRule>,
    fallback: String,
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new(default_rules(), FALLBACK_LABEL)
    }
}

impl Labeler {
    pub fn new(rules: Vec<LabelRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Classify a URL by its last path segment; the first matching rule wins.
    pub fn label(&self, url: &str) -> &str {
        let filename = url.rsplit('/').next().unwrap_or(url);
        self.rules
            .iter()
            .find(|rule| filename.contains(rule.marker.as_str()))
            .map(|rule| rule.label.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}
