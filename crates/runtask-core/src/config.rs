//! Service configuration.
//!
//! Values are collected by the binary (flags with environment fallbacks) and
//! validated once at startup.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::FetchLimits;
use crate::graph::Toolchain;
use crate::workspace::WorkspaceRoot;

pub const DEFAULT_WORK_ROOT: &str = "/app";
pub const DEFAULT_PATTERN_FILE_NAME: &str = "patternsFile.txt";
pub const DEFAULT_CONFIG_SUBDIR: &str = "tf/demo_server";
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Used for the public base URL when no override is set.
pub const PUBLIC_IP_ENDPOINT: &str = "https://ipv4.icanhazip.com";
pub const FALLBACK_BASE_URL: &str = "http://localhost";
const PUBLIC_IP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum PublicIpError {
    #[error("public IP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("public IP service answered with status {0}")]
    Status(u16),

    #[error("public IP service returned {0:?}")]
    Unexpected(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("config subdirectory {0:?} must be a relative path without '..'")]
    ConfigSubdir(PathBuf),

    #[error("base URL {0:?} must start with http:// or https://")]
    BaseUrl(String),
}

/// Everything the pipeline and the HTTP front door need at runtime.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent of all per-run workspaces.
    pub work_root: PathBuf,

    /// Location of the configuration to scan/render inside a bundle.
    pub config_subdir: PathBuf,

    /// Newline-delimited regex list, re-read for every job.
    pub pattern_file: PathBuf,

    /// Public base URL used to build graph links in verdicts.
    pub base_url: String,

    pub queue_capacity: usize,
    pub max_body_bytes: usize,
    pub fetch: FetchLimits,
    pub callback_timeout: Duration,
    pub toolchain: Toolchain,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_root: PathBuf::from(DEFAULT_WORK_ROOT),
            config_subdir: PathBuf::from(DEFAULT_CONFIG_SUBDIR),
            pattern_file: Path::new(DEFAULT_WORK_ROOT).join(DEFAULT_PATTERN_FILE_NAME),
            base_url: FALLBACK_BASE_URL.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            fetch: FetchLimits::default(),
            callback_timeout: Duration::from_secs(30),
            toolchain: Toolchain::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        let subdir_ok = self
            .config_subdir
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !subdir_ok || self.config_subdir.as_os_str().is_empty() {
            return Err(ConfigError::ConfigSubdir(self.config_subdir.clone()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.base_url.clone()));
        }
        Ok(())
    }

    pub fn workspaces(&self) -> WorkspaceRoot {
        WorkspaceRoot::new(&self.work_root, &self.config_subdir)
    }
}

/// Pick the public base URL: the override if set, else `http://<public ip>`,
/// else `http://localhost`. Trailing slashes are dropped.
pub async fn resolve_base_url(client: &Client, base_url: Option<&str>) -> String {
    resolve_base_url_with(client, base_url, PUBLIC_IP_ENDPOINT).await
}

pub async fn resolve_base_url_with(
    client: &Client,
    base_url: Option<&str>,
    ip_endpoint: &str,
) -> String {
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }

    match public_ip(client, ip_endpoint).await {
        Ok(ip) => {
            info!(%ip, "discovered public IP");
            format!("http://{ip}")
        }
        Err(err) => {
            warn!(error = %err, "failed to get public IP, using localhost as fallback");
            FALLBACK_BASE_URL.to_string()
        }
    }
}

async fn public_ip(client: &Client, endpoint: &str) -> Result<String, PublicIpError> {
    let response = client
        .get(endpoint)
        .timeout(PUBLIC_IP_TIMEOUT)
        .send()
        .await
        .map_err(|e| PublicIpError::Transport(e.without_url()))?;
    if !response.status().is_success() {
        return Err(PublicIpError::Status(response.status().as_u16()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| PublicIpError::Transport(e.without_url()))?;
    let ip = body.trim();
    if ip.is_empty() || !ip.chars().all(|c| c.is_ascii_hexdigit() || c == '.' || c == ':') {
        return Err(PublicIpError::Unexpected(ip.to_string()));
    }
    Ok(ip.to_string())
}
