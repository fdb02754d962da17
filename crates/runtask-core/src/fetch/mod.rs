pub mod download;
pub mod extract;

use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::error::{FetchError, PipelineError};
use crate::workspace::RunWorkspace;

pub use download::{ArchiveInfo, download_archive};
pub use extract::{ExtractSummary, extract_tar_gz};

/// Bounds applied to a single bundle download.
#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    pub timeout: Duration,
    pub max_archive_bytes: u64,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_archive_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Download a run's configuration bundle and unpack it into its workspace.
pub async fn fetch_configuration(
    client: &Client,
    url: &str,
    token: &str,
    workspace: &RunWorkspace,
    limits: &FetchLimits,
) -> Result<(ArchiveInfo, ExtractSummary), PipelineError> {
    workspace
        .ensure()
        .await
        .map_err(|e| FetchError::io(workspace.dir(), e))?;

    let archive = download_archive(client, url, token, &workspace.archive_path(), limits).await?;
    info!(
        archive = %archive.path.display(),
        size_bytes = archive.size_bytes,
        sha256 = %archive.sha256,
        "download ok"
    );

    let archive_path = archive.path.clone();
    let dest = workspace.dir().to_path_buf();
    let summary =
        tokio::task::spawn_blocking(move || extract_tar_gz(&archive_path, &dest)).await??;
    info!(
        directories = summary.directories,
        files = summary.files,
        bytes = summary.bytes,
        "extraction ok"
    );

    Ok((archive, summary))
}
