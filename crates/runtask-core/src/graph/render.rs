//! Dependency graph rendering through external tools.
//!
//! `terraform init` and `terraform graph` run inside the configuration
//! directory, and the DOT they print is piped into `dot -Tpng`. Each tool
//! is handed its directory through `current_dir`; the process-wide working
//! directory is never touched, so every path handed to a tool must be
//! absolute or relative to that directory.

use std::io;
use std::path::{self, Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::RenderError;

/// Longest stderr excerpt kept in a `ToolFailed` error.
const STDERR_EXCERPT_CHARS: usize = 2048;

/// External tools used for rendering and the deadline applied to each.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub terraform: PathBuf,
    pub dot: PathBuf,
    pub step_timeout: Duration,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            terraform: PathBuf::from("terraform"),
            dot: PathBuf::from("dot"),
            step_timeout: Duration::from_secs(300),
        }
    }
}

impl Toolchain {
    /// Anchor tool paths such as `./bin/terraform` to the current directory.
    ///
    /// Bare names are left alone and looked up on `PATH`.
    pub fn resolved(self) -> io::Result<Self> {
        Ok(Self {
            terraform: anchor_tool(self.terraform)?,
            dot: anchor_tool(self.dot)?,
            step_timeout: self.step_timeout,
        })
    }

    /// Render the configuration in `config_dir` to a PNG at `output`.
    pub async fn render(&self, config_dir: &Path, output: &Path) -> Result<(), RenderError> {
        if !config_dir.is_dir() {
            return Err(RenderError::MissingConfigDir(config_dir.to_path_buf()));
        }
        let output = path::absolute(output).map_err(|source| RenderError::Io {
            tool: self.dot.display().to_string(),
            source,
        })?;

        let mut init = Command::new(&self.terraform);
        init.args(["init", "-input=false"]);
        self.run(init, config_dir, None).await?;

        let mut graph = Command::new(&self.terraform);
        graph.arg("graph");
        let dot_source = self.run(graph, config_dir, None).await?.stdout;
        debug!(bytes = dot_source.len(), "graph description captured");

        let mut dot = Command::new(&self.dot);
        dot.arg("-Tpng").arg("-o").arg(&output);
        self.run(dot, config_dir, Some(&dot_source)).await?;

        Ok(())
    }

    /// Run one step in `dir`, feeding `stdin` if given, and require success.
    async fn run(
        &self,
        mut command: Command,
        dir: &Path,
        stdin: Option<&[u8]>,
    ) -> Result<Output, RenderError> {
        let tool = describe(&command);
        command
            .current_dir(dir)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| RenderError::Spawn {
            tool: tool.clone(),
            source,
        })?;

        let step = async {
            if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(input).await?;
                // Close stdin so the tool sees EOF.
                drop(pipe);
            }
            child.wait_with_output().await
        };

        let output = match timeout(self.step_timeout, step).await {
            Ok(result) => result.map_err(|source| RenderError::Io {
                tool: tool.clone(),
                source,
            })?,
            Err(_) => {
                return Err(RenderError::Timeout {
                    tool,
                    timeout: self.step_timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::ToolFailed {
                tool,
                status: output.status.to_string(),
                stderr: stderr.trim().chars().take(STDERR_EXCERPT_CHARS).collect(),
            });
        }

        Ok(output)
    }
}

fn anchor_tool(tool: PathBuf) -> io::Result<PathBuf> {
    if tool.components().count() > 1 && tool.is_relative() {
        path::absolute(tool)
    } else {
        Ok(tool)
    }
}

/// `program arg0 arg1`, for error messages.
fn describe(command: &Command) -> String {
    let std = command.as_std();
    let mut parts = vec![std.get_program().to_string_lossy().into_owned()];
    parts.extend(std.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}
