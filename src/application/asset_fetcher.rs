use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use super::progress::ProgressSink;
use crate::{
    api::{AssetSource, TransportError, TransportEvent, TransportKind},
    domain::{AppError, DownloadPhase, DownloadTask, FetchError},
    utils::{format_bytes, get_timestamp, percent, with_retry_param, Labeler},
};

/// Hard ceiling on transport attempts per asset, whatever the configuration says.
pub const MAX_ATTEMPTS: usize = 3;

/// Ordered transports tried for one asset.
///
/// A failed streaming attempt always ends the download. A failed buffered
/// attempt moves on to the next entry if there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: Vec<TransportKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: vec![TransportKind::Buffered, TransportKind::Streaming],
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: Vec<TransportKind>) -> Result<Self, AppError> {
        if attempts.is_empty() {
            return Err(AppError::Config(
                "at least one transport attempt is required".to_string(),
            ));
        }
        if attempts.len() > MAX_ATTEMPTS {
            return Err(AppError::Config(format!(
                "at most {} transport attempts are allowed, got {}",
                MAX_ATTEMPTS,
                attempts.len()
            )));
        }
        Ok(Self { attempts })
    }

    pub fn streaming_only() -> Self {
        Self {
            attempts: vec![TransportKind::Streaming],
        }
    }

    pub fn attempts(&self) -> &[TransportKind] {
        &self.attempts
    }
}

/// Downloads one asset at a time, narrating progress into the sink it was
/// built with.
pub struct AssetFetcher {
    source: Arc<dyn AssetSource>,
    sink: Arc<dyn ProgressSink>,
    labeler: Labeler,
    policy: RetryPolicy,
    cache_bust: bool,
}

impl AssetFetcher {
    pub fn new(source: Arc<dyn AssetSource>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            source,
            sink,
            labeler: Labeler::default(),
            policy: RetryPolicy::default(),
            cache_bust: true,
        }
    }

    pub fn with_labeler(mut self, labeler: Labeler) -> Self {
        self.labeler = labeler;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache_bust(mut self, enabled: bool) -> Self {
        self.cache_bust = enabled;
        self
    }

    pub fn sink(&self) -> &dyn ProgressSink {
        self.sink.as_ref()
    }

    /// Fetch the full payload of `url`.
    ///
    /// Every terminal failure has already been written to the sink when this
    /// returns, and its message is the text the sink shows.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let label = self.labeler.label(url).to_string();
        let attempts = self.policy.attempts();

        for (index, &kind) in attempts.iter().enumerate() {
            let request_url = if index > 0 && self.cache_bust {
                with_retry_param(url, get_timestamp()).unwrap_or_else(|e| {
                    warn!(%url, error = %e, "cannot add retry parameter");
                    url.to_string()
                })
            } else {
                url.to_string()
            };

            let mut task = DownloadTask::new(url, label.clone());
            let err = match self.attempt(kind, &request_url, &mut task).await {
                Ok(payload) => return Ok(payload),
                Err(err) => err,
            };

            if kind == TransportKind::Buffered && index + 1 < attempts.len() {
                warn!(%url, error = %err, next = ?attempts[index + 1], "buffered download failed, escalating");
                continue;
            }

            let message = format!("Fetching {}: {}", label, err);
            error!(%url, ?kind, "{}", message);
            self.sink
                .progress(&task.update(DownloadPhase::Failed, message.clone()));
            return Err(FetchError::new(url, message));
        }

        Err(FetchError::new(
            url,
            format!("Fetching {}: no transport configured", label),
        ))
    }

    async fn attempt(
        &self,
        kind: TransportKind,
        request_url: &str,
        task: &mut DownloadTask,
    ) -> Result<Bytes, TransportError> {
        let mut events = self.source.open(kind, request_url);

        while let Some(event) = events.next().await {
            match event {
                TransportEvent::Opened { total } => {
                    task.expected_total = total;
                    let size = match total {
                        Some(total) => format_bytes(total).unwrap_or_default(),
                        None => "unknown size".to_string(),
                    };
                    let message = format!("Fetching {}: {} (please wait)", task.label, size);
                    info!(url = %request_url, ?kind, "{}", message);
                    self.sink
                        .progress(&task.update(DownloadPhase::Fetching, message));
                }
                TransportEvent::Received { len } => {
                    task.record_chunk(len);
                    self.report_chunk(kind, task);
                }
                TransportEvent::Completed(payload) => {
                    let message = format!("Fetched {} bytes", task.loaded);
                    info!(url = %task.url, "{}", message);
                    self.sink.progress(&task.update(DownloadPhase::Loaded, message));
                    return Ok(payload);
                }
                TransportEvent::Failed(err) => return Err(err),
            }
        }

        Err(TransportError::Interrupted)
    }

    fn report_chunk(&self, kind: TransportKind, task: &DownloadTask) {
        let loaded = format_bytes(task.loaded).unwrap_or_default();
        let message = match (kind, percent(task.loaded, task.expected_total)) {
            (TransportKind::Streaming, Some(p)) => {
                format!("Fetch {}: {} [{}]", task.label, loaded, p)
            }
            (TransportKind::Streaming, None) => format!("Fetch {}: {}", task.label, loaded),
            (TransportKind::Buffered, Some(p)) => {
                format!("Load {}: {} [{}]", task.label, loaded, p)
            }
            (TransportKind::Buffered, None) => {
                debug!(url = %task.url, "Downloaded {} bytes (total size unknown)", task.loaded);
                return;
            }
        };
        debug!(url = %task.url, "{}", message);
        self.sink
            .progress(&task.update(DownloadPhase::Fetching, message));
    }
}
