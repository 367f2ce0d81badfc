use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Fixed pause after every download attempt. This is deliberate rate
/// limiting toward the host; keep it even if the loop is reworked.
pub const DOWNLOAD_PACING: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download each URL into `dest` as `<index><ext>`, 1-based.
///
/// Items are fetched strictly in sequence with [`DOWNLOAD_PACING`] after
/// every attempt, successful or not. Failed items are logged and skipped;
/// the index always reflects the original position, so the surviving files
/// sort back into acquisition order by filename alone.
pub async fn download_images(
    client: &Client,
    urls: &[String],
    dest: &Path,
) -> Result<Vec<PathBuf>, DownloadError> {
    tokio::fs::create_dir_all(dest).await?;

    let mut downloaded = Vec::new();
    for (idx, url) in urls.iter().enumerate() {
        if let Some(path) = download_one(client, url, idx + 1, dest).await {
            downloaded.push(path);
        }
        tokio::time::sleep(DOWNLOAD_PACING).await;
    }

    Ok(downloaded)
}

async fn download_one(client: &Client, url: &str, index: usize, dest: &Path) -> Option<PathBuf> {
    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(url, error = %e, "image request failed");
            return None;
        }
    };

    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(url, status = status.as_u16(), "image request rejected");
        return None;
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ext = extension_for(content_type.as_deref(), url);

    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(url, error = %e, "image body read failed");
            return None;
        }
    };

    let path = dest.join(format!("{index}{ext}"));
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => Some(path),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "image write failed");
            None
        }
    }
}

/// Pick a file extension from the declared content type, falling back to
/// the URL text, defaulting to `.jpg`.
fn extension_for(content_type: Option<&str>, url: &str) -> &'static str {
    if let Some(content_type) = content_type {
        if content_type.contains("image/jpeg") || content_type.contains("image/jpg") {
            return ".jpg";
        }
        if content_type.contains("image/png") {
            return ".png";
        }
        if content_type.contains("image/gif") {
            return ".gif";
        }
    }

    let lower = url.to_lowercase();
    if lower.contains(".png") {
        ".png"
    } else if lower.contains(".gif") {
        ".gif"
    } else {
        ".jpg"
    }
}
