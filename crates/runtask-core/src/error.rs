//! Error taxonomy for the run-task pipeline.
//!
//! Synchronous errors (`RequestError`, `InvalidRunId`) become HTTP statuses at
//! ingress. Everything else happens on the worker and ends up as a log line:
//!
//! - `FetchError` and `ScanError` abandon the job (no verdict is sent)
//! - `RenderError` is logged and the pipeline continues
//! - `DeliveryError` ends the job after the single delivery attempt

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("HMAC key rejected")]
    InvalidKey,
}

/// Reasons a caller-supplied run identifier is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRunId {
    #[error("run_id is empty")]
    Empty,

    #[error("run_id exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("run_id contains disallowed character {0:?}")]
    DisallowedChar(char),
}

/// Inbound payload could not be turned into a job.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    RunId(#[from] InvalidRunId),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("download timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed with status code: {status}")]
    Status { status: u16 },

    #[error("archive exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive entry {path:?} escapes the workspace root")]
    UnsafeEntryPath { path: String },

    #[error("archive entry {path:?} would overwrite a workspace file")]
    ReservedEntryPath { path: String },

    #[error("unsupported file type: {kind} in {path}")]
    UnsupportedEntry { path: String, kind: String },
}

impl FetchError {
    /// Classify a transport error, separating deadline expiry from the rest.
    pub fn from_transport(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(deadline)
        } else {
            Self::Http(err.without_url())
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("configuration directory not found: {}", .0.display())]
    MissingConfigDir(PathBuf),

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("i/o error while driving {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read pattern file {}: {source}", .path.display())]
    PatternFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to encode verdict: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("callback request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status code: {status}")]
    Status { status: u16, body: String },
}

/// Fatal job errors: any of these moves a job to `Abandoned`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
