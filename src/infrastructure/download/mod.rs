use crate::domain::synthesis::DownloadedAsset;
use crate::error::{AppError, AppResult};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use uuid::Uuid;

/// Bytes written to disk per block while streaming a result file
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Streams synthesized media files to local storage.
///
/// The body goes to a hidden `.part` sibling first and is renamed over the destination only
/// once fully flushed, so a failed transfer never leaves a truncated file under the final name.
pub struct MediaDownloader {
    http_client: reqwest::Client,
}

impl MediaDownloader {
    pub fn new(connect_timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Download `url` into `destination_dir`, overwriting any file with the same name
    pub async fn download(&self, url: &str, destination_dir: &Path) -> AppResult<DownloadedAsset> {
        let file_name = file_name_from_url(url)?;

        tokio::fs::create_dir_all(destination_dir).await.map_err(|e| {
            AppError::Transfer(format!(
                "Failed to create directory {}: {}",
                destination_dir.display(),
                e
            ))
        })?;

        let local_path = destination_dir.join(&file_name);
        let partial_path = destination_dir.join(format!(".{}.{}.part", file_name, Uuid::new_v4()));

        tracing::info!(
            path = %local_path.display(),
            "Downloading synthesized video"
        );

        let bytes = match self.stream_to_file(url, &partial_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                discard_partial(&partial_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial_path, &local_path).await {
            discard_partial(&partial_path).await;
            return Err(AppError::Transfer(format!(
                "Failed to move download into {}: {}",
                local_path.display(),
                e
            )));
        }

        tracing::info!(
            path = %local_path.display(),
            bytes = bytes,
            "Video downloaded"
        );

        Ok(DownloadedAsset {
            source_url: url.to_string(),
            local_path,
        })
    }

    async fn stream_to_file(&self, url: &str, path: &Path) -> AppResult<u64> {
        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Transfer(format!("Download request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transfer(format!(
                "Download returned status {}",
                status.as_u16()
            )));
        }

        let file = File::create(path)
            .await
            .map_err(|e| AppError::Transfer(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Transfer(format!("Download interrupted: {}", e)))?
        {
            for block in chunk.chunks(DOWNLOAD_CHUNK_SIZE) {
                writer
                    .write_all(block)
                    .await
                    .map_err(|e| AppError::Transfer(format!("Failed to write {}: {}", path.display(), e)))?;
            }
            written += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| AppError::Transfer(format!("Failed to flush {}: {}", path.display(), e)))?;
        writer
            .into_inner()
            .sync_all()
            .await
            .map_err(|e| AppError::Transfer(format!("Failed to sync {}: {}", path.display(), e)))?;

        Ok(written)
    }
}

async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial download");
        }
    }
}

/// Last path segment of the URL, percent-decoded, without the query string
pub fn file_name_from_url(url: &str) -> AppResult<String> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| AppError::Transfer(format!("Invalid result URL '{}': {}", url, e)))?;

    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AppError::Transfer(format!("Result URL '{}' has no file name", url)))?;

    let name = urlencoding::decode(segment)
        .map_err(|e| AppError::Transfer(format!("Result URL '{}' has an invalid file name: {}", url, e)))?
        .into_owned();

    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(AppError::Transfer(format!(
            "Result URL '{}' has an unusable file name",
            url
        )));
    }

    Ok(name)
}
