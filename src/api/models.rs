use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::utils::label::{default_rules, LabelRule, FALLBACK_LABEL};

/// How a single attempt talks to the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Revalidating GET whose body is read chunk by chunk. Any failure is final.
    Streaming,
    /// Plain GET judged on completion; only 200 and 206 count as success.
    Buffered,
}

/// One entry of the ordered download list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetEntry {
    pub url: String,
}

impl AssetEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Configuration for a load sequence
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Relative asset URLs are resolved against this
    pub base_url: String,
    /// Downloaded strictly in this order
    pub assets: Vec<AssetEntry>,
    /// Transports tried for each asset, in order
    pub attempts: Vec<TransportKind>,
    /// Append a `retry=<timestamp>` parameter to every attempt after the first
    pub cache_bust: bool,
    pub labels: Vec<LabelRule>,
    pub fallback_label: String,
    pub staging_dir: PathBuf,
    /// Entry point handed control once every asset is staged
    pub bootstrap: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8123/".to_string(),
            assets: vec![
                AssetEntry::new("https://www.gstatic.com/flutter-canvaskit/a8bfdfc394deaed5c57bd45a64ac4294dc976a72/canvaskit.wasm"),
                AssetEntry::new("pkg/rust_lib_ui_bg.wasm"),
                AssetEntry::new("main.dart.js"),
            ],
            attempts: vec![TransportKind::Buffered, TransportKind::Streaming],
            cache_bust: true,
            labels: default_rules(),
            fallback_label: FALLBACK_LABEL.to_string(),
            staging_dir: PathBuf::from("staged"),
            bootstrap: "flutter_bootstrap.js".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Absolute URLs of every asset, in download order
    pub fn resolve_assets(&self) -> Result<Vec<String>, AppError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("base_url {:?}: {}", self.base_url, e)))?;

        self.assets
            .iter()
            .map(|entry| {
                base.join(&entry.url)
                    .map(String::from)
                    .map_err(|e| AppError::Config(format!("asset {:?}: {}", entry.url, e)))
            })
            .collect()
    }
}
