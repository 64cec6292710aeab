use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::{
    domain::{AppError, LoadedAsset},
    utils::{file_name_from_url, sanitize_filename},
};

/// Write every payload into `dir` and return the path of the bootstrap entry
/// point that is supposed to pick them up.
pub async fn stage_assets(
    dir: &Path,
    assets: &[LoadedAsset],
    entry: &str,
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;

    for asset in assets {
        let name = file_name_from_url(&asset.url)
            .map(|name| sanitize_filename(&name))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Io(format!("No file name in asset URL: {}", asset.url)))?;
        let path = dir.join(&name);

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create file: {}", e)))?;
        file.write_all(&asset.payload)
            .await
            .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))?;

        info!(path = %path.display(), bytes = asset.payload.len(), "staged asset");
    }

    Ok(dir.join(entry))
}
