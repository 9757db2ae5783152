//! Saving generated thumbnails to disk.

use crate::{Error, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for the 0-based `index`-th thumbnail.
pub fn thumbnail_file_name(index: usize) -> String {
    format!("thumbnail-{}.png", index + 1)
}

/// Fetch each URL into `dir` as `thumbnail-<n>.png`, creating `dir` if needed.
pub async fn download_thumbnails(
    client: &Client,
    urls: &[String],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut saved = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let response = client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to download {}: {}", url, e);
            e
        })?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Download of {} failed (status {})",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        let path = dir.join(thumbnail_file_name(index));
        tokio::fs::write(&path, &bytes).await?;
        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        saved.push(path);
    }

    Ok(saved)
}
