pub mod error;
pub mod model;

pub use error::{AppError, FetchError};
pub use model::{DownloadPhase, DownloadTask, LoadedAsset, ProgressUpdate};
