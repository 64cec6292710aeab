use tracing::{debug, info};

use super::asset_fetcher::AssetFetcher;
use crate::domain::{FetchError, LoadedAsset};

pub const STARTING_APP: &str = "starting app...";

/// Runs the fixed download list for one page load.
///
/// Later assets may depend on earlier ones, so each download finishes before
/// the next begins and the first failure ends the whole sequence.
pub struct Orchestrator {
    fetcher: AssetFetcher,
    urls: Vec<String>,
}

impl Orchestrator {
    pub fn new(fetcher: AssetFetcher, urls: Vec<String>) -> Self {
        Self { fetcher, urls }
    }

    /// Download everything, then hand the payloads to `on_ready`.
    ///
    /// `on_ready` runs at most once and only after every asset arrived. The
    /// fetcher, and with it the progress sink, is dropped when this returns.
    pub async fn run<F>(self, on_ready: F) -> Result<(), FetchError>
    where
        F: FnOnce(Vec<LoadedAsset>) + Send,
    {
        let mut loaded = Vec::with_capacity(self.urls.len());

        for url in self.urls {
            match self.fetcher.fetch(&url).await {
                Ok(payload) => loaded.push(LoadedAsset { url, payload }),
                Err(e) => {
                    debug!(url = %e.url, "load sequence aborted");
                    return Err(e);
                }
            }
        }

        self.fetcher.sink().show(STARTING_APP);
        info!(assets = loaded.len(), "start app");
        on_ready(loaded);
        Ok(())
    }
}
