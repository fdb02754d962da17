//! Per-run workspace layout.
//!
//! Every job gets `<root>/<run_id>/` holding the downloaded bundle, its
//! extracted tree and, when rendering succeeds, the graph image. Workspaces
//! are created lazily and never cleaned up here.

use std::io;
use std::path::{Path, PathBuf};

use crate::model::RunId;

pub const ARCHIVE_FILE_NAME: &str = "config.tar.gz";
pub const GRAPH_FILE_NAME: &str = "graph.png";

/// Root directory under which per-run workspaces live.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    root: PathBuf,
    config_subdir: PathBuf,
}

impl WorkspaceRoot {
    /// `config_subdir` is the relative path inside an extracted bundle that
    /// holds the configuration to scan and render (e.g. `tf/demo_server`).
    pub fn new(root: impl Into<PathBuf>, config_subdir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_subdir: config_subdir.into(),
        }
    }

    /// Resolve the workspace of one run.
    ///
    /// `RunId` only admits `[A-Za-z0-9_-]`, so the join always yields a
    /// direct child of the root.
    pub fn for_run(&self, run_id: &RunId) -> RunWorkspace {
        RunWorkspace {
            dir: self.root.join(run_id.as_str()),
            config_subdir: self.config_subdir.clone(),
        }
    }
}

/// Paths belonging to one run.
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    dir: PathBuf,
    config_subdir: PathBuf,
}

impl RunWorkspace {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn archive_path(&self) -> PathBuf {
        self.dir.join(ARCHIVE_FILE_NAME)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.join(&self.config_subdir)
    }

    pub fn graph_path(&self) -> PathBuf {
        self.dir.join(GRAPH_FILE_NAME)
    }

    /// Create the workspace directory if it does not exist yet.
    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Remove the graph left by an earlier run of the same id, if any.
    pub async fn clear_graph(&self) -> io::Result<()> {
        match tokio::fs::remove_file(self.graph_path()).await {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
