use std::path::{Path, PathBuf};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::JSON_API_CONTENT_TYPE;
use crate::error::FetchError;
use crate::fetch::FetchLimits;

/// Identity of a downloaded configuration bundle.
///
/// The fingerprint depends only on the bytes received, so two runs that
/// fetched the same configuration version log the same digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// Where the archive was written.
    pub path: PathBuf,

    /// Number of bytes received.
    pub size_bytes: u64,

    /// Hex-encoded SHA-256 of the archive bytes.
    pub sha256: String,
}

/// Download the bundle at `url` into `dest`, authenticating with `token`.
///
/// The body is streamed to disk and hashed on the way through. A non-2xx
/// status, a transport failure, the deadline expiring or the body growing
/// past `limits.max_archive_bytes` all fail the download.
pub async fn download_archive(
    client: &Client,
    url: &str,
    token: &str,
    dest: &Path,
    limits: &FetchLimits,
) -> Result<ArchiveInfo, FetchError> {
    let mut response = client
        .get(url)
        .bearer_auth(token)
        .header(CONTENT_TYPE, JSON_API_CONTENT_TYPE)
        .timeout(limits.timeout)
        .send()
        .await
        .map_err(|e| FetchError::from_transport(e, limits.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    if response
        .content_length()
        .is_some_and(|len| len > limits.max_archive_bytes)
    {
        return Err(FetchError::TooLarge {
            limit: limits.max_archive_bytes,
        });
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| FetchError::io(dest, e))?;

    let mut hasher = Sha256::new();
    let mut size_bytes: u64 = 0;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::from_transport(e, limits.timeout))?
    {
        size_bytes += chunk.len() as u64;
        if size_bytes > limits.max_archive_bytes {
            return Err(FetchError::TooLarge {
                limit: limits.max_archive_bytes,
            });
        }
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(dest, e))?;
    }

    file.flush().await.map_err(|e| FetchError::io(dest, e))?;

    Ok(ArchiveInfo {
        path: dest.to_path_buf(),
        size_bytes,
        sha256: hex::encode(hasher.finalize()),
    })
}
