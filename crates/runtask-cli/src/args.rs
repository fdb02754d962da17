use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "runtask",
    version,
    about = "Pre-plan run task: scans configuration bundles for forbidden patterns"
)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "RUNTASK_BIND", default_value = "0.0.0.0:80")]
    pub bind: SocketAddr,

    /// Shared secret for X-TFC-Task-Signature; unset disables verification
    #[arg(long, env = "HMAC_KEY", hide_env_values = true)]
    pub hmac_key: Option<String>,

    /// Public base URL for graph links (default: discovered public IP)
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Parent directory of per-run workspaces
    #[arg(long, env = "RUNTASK_WORK_ROOT", default_value = "/app")]
    pub work_root: PathBuf,

    /// Newline-delimited regex file [default: <work-root>/patternsFile.txt]
    #[arg(long, env = "RUNTASK_PATTERN_FILE")]
    pub pattern_file: Option<PathBuf>,

    /// Directory inside the bundle that is scanned and rendered
    #[arg(long, env = "RUNTASK_CONFIG_SUBDIR", default_value = "tf/demo_server")]
    pub config_subdir: PathBuf,

    /// Jobs that may wait for the worker
    #[arg(long, env = "RUNTASK_QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,

    /// Largest accepted webhook body
    #[arg(long, env = "RUNTASK_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Largest accepted configuration bundle
    #[arg(long, env = "RUNTASK_MAX_ARCHIVE_BYTES", default_value_t = 256 * 1024 * 1024)]
    pub max_archive_bytes: u64,

    #[arg(long, env = "RUNTASK_DOWNLOAD_TIMEOUT_SECS", default_value_t = 120)]
    pub download_timeout_secs: u64,

    #[arg(long, env = "RUNTASK_CALLBACK_TIMEOUT_SECS", default_value_t = 30)]
    pub callback_timeout_secs: u64,

    /// Deadline for each terraform/dot invocation
    #[arg(long, env = "RUNTASK_TOOL_TIMEOUT_SECS", default_value_t = 300)]
    pub tool_timeout_secs: u64,

    #[arg(long, env = "RUNTASK_TERRAFORM_BIN", default_value = "terraform")]
    pub terraform_bin: PathBuf,

    #[arg(long, env = "RUNTASK_DOT_BIN", default_value = "dot")]
    pub dot_bin: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, env = "RUNTASK_LOG_JSON")]
    pub log_json: bool,
}
