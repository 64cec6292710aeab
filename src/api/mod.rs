pub mod client;
pub mod models;

pub use client::{AssetSource, HttpSource, TransportError, TransportEvent};
pub use models::{AssetEntry, LoaderConfig, TransportKind};
