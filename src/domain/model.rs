use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Fetching,
    Loaded,
    Failed,
}

/// One status write towards the loading screen. Every update replaces the
/// previous one; nothing is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub label: String,
    pub loaded: u64,
    pub total: Option<u64>,
    pub phase: DownloadPhase,
    pub message: String,
}

/// Book-keeping for a single transport attempt of one URL.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    pub label: String,
    pub expected_total: Option<u64>,
    pub loaded: u64,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            expected_total: None,
            loaded: 0,
        }
    }

    pub fn record_chunk(&mut self, len: u64) {
        self.loaded = self.loaded.saturating_add(len);
    }

    pub fn update(&self, phase: DownloadPhase, message: String) -> ProgressUpdate {
        ProgressUpdate {
            label: self.label.clone(),
            loaded: self.loaded,
            total: self.expected_total,
            phase,
            message,
        }
    }
}

/// A downloaded payload ready for the bootstrap step.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub url: String,
    pub payload: Bytes,
}
