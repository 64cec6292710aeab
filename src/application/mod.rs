pub mod asset_fetcher;
pub mod orchestrator;
pub mod progress;
pub mod staging;

#[cfg(test)]
pub(crate) mod testing;

pub use asset_fetcher::{AssetFetcher, RetryPolicy};
pub use orchestrator::Orchestrator;
pub use progress::ProgressSink;
pub use staging::stage_assets;
