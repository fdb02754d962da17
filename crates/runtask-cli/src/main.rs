use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use runtask_core::auth::SignatureVerifier;
use runtask_core::config::{DEFAULT_PATTERN_FILE_NAME, resolve_base_url};
use runtask_core::fetch::FetchLimits;
use runtask_core::graph::Toolchain;
use runtask_core::pipeline::job_queue;
use runtask_core::{AppState, PipelineConfig, TOOL_NAME, Worker, build_router};

mod args;

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn pipeline_config(args: &args::Args, base_url: String) -> PipelineConfig {
    let pattern_file = args
        .pattern_file
        .clone()
        .unwrap_or_else(|| args.work_root.join(DEFAULT_PATTERN_FILE_NAME));

    PipelineConfig {
        work_root: args.work_root.clone(),
        config_subdir: args.config_subdir.clone(),
        pattern_file,
        base_url,
        queue_capacity: args.queue_capacity,
        max_body_bytes: args.max_body_bytes,
        fetch: FetchLimits {
            timeout: Duration::from_secs(args.download_timeout_secs),
            max_archive_bytes: args.max_archive_bytes,
        },
        callback_timeout: Duration::from_secs(args.callback_timeout_secs),
        toolchain: Toolchain {
            terraform: args.terraform_bin.clone(),
            dot: args.dot_bin.clone(),
            step_timeout: Duration::from_secs(args.tool_timeout_secs),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();
    init_tracing(args.log_json);

    let client = Client::builder()
        .user_agent(format!("{TOOL_NAME}/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    // Checked before the public IP lookup so bad flags fail fast.
    pipeline_config(&args, "http://localhost".to_string())
        .validate()
        .context("invalid configuration")?;

    let base_url = resolve_base_url(&client, args.base_url.as_deref()).await;
    let mut config = pipeline_config(&args, base_url);
    config.validate().context("invalid configuration")?;

    tokio::fs::create_dir_all(&config.work_root)
        .await
        .with_context(|| format!("failed to create {}", config.work_root.display()))?;
    // Tools run inside each run's config directory, so nothing they see may be
    // relative to ours.
    config.work_root = std::path::absolute(&config.work_root)
        .with_context(|| format!("failed to resolve {}", config.work_root.display()))?;
    config.toolchain = config
        .toolchain
        .resolved()
        .context("failed to resolve tool paths")?;

    let verifier =
        SignatureVerifier::new(args.hmac_key.as_deref()).context("invalid HMAC key")?;
    let (queue, jobs) = job_queue(config.queue_capacity);
    let state = AppState::new(
        verifier,
        queue,
        config.workspaces(),
        config.max_body_bytes,
    );
    let app = build_router(state);

    info!(
        base_url = %config.base_url,
        work_root = %config.work_root.display(),
        pattern_file = %config.pattern_file.display(),
        queue_capacity = config.queue_capacity,
        "starting run task service"
    );
    let worker = Worker::new(client, config).spawn(jobs);

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!("listening on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")?;

    info!("server stopped, finishing queued jobs");
    tokio::select! {
        result = worker => {
            if let Err(err) = result {
                warn!(error = %err, "worker task failed");
            }
        }
        _ = wait_for_shutdown_signal() => warn!("second signal, abandoning queued jobs"),
    }
    Ok(())
}
