use std::sync::Arc;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::fetch::fetch_configuration;
use crate::pipeline::job::{Job, JobOutcome, JobState, StateTracker};
use crate::pipeline::queue::JobReceiver;
use crate::report::deliver_verdict;
use crate::report::model::{Verdict, VerdictStatus, graph_url};
use crate::rules::{MatchCounts, load_patterns, scan_tree};
use crate::workspace::{RunWorkspace, WorkspaceRoot};

/// Processes jobs one at a time, in the order they were accepted.
#[derive(Debug, Clone)]
pub struct Worker {
    client: Client,
    config: Arc<PipelineConfig>,
    workspaces: WorkspaceRoot,
}

impl Worker {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        let workspaces = config.workspaces();
        Self {
            client,
            config: Arc::new(config),
            workspaces,
        }
    }

    pub fn spawn(self, jobs: JobReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(jobs))
    }

    /// Drain the queue until every sender is gone.
    ///
    /// Each job runs in its own task so that a panic ends only that job; the
    /// loop still waits for it before taking the next one.
    pub async fn run(self, mut jobs: JobReceiver) {
        while let Some(job) = jobs.next().await {
            let span = info_span!("job", run_id = %job.run_id, seq = job.seq);
            let worker = self.clone();
            let handle = tokio::spawn(async move { worker.process(job).await }.instrument(span));

            if let Err(err) = handle.await {
                error!(error = %err, "job task failed");
            }
        }
        info!("job queue closed, worker exiting");
    }

    /// Run one job through download, render, scan and report.
    pub async fn process(&self, job: Job) -> JobOutcome {
        let mut state = StateTracker::new();
        let workspace = self.workspaces.for_run(&job.run_id);
        let request = &job.request;

        state.advance(JobState::Downloading);
        if let Err(error) = fetch_configuration(
            &self.client,
            &request.configuration_version_download_url,
            &request.access_token,
            &workspace,
            &self.config.fetch,
        )
        .await
        {
            error!(error = %error, "error downloading configuration");
            return self.abandon(&mut state, error);
        }

        state.advance(JobState::GraphRendering);
        if let Err(err) = workspace.clear_graph().await {
            warn!(error = %err, "failed to remove previous graph");
        }
        match self
            .config
            .toolchain
            .render(&workspace.config_dir(), &workspace.graph_path())
            .await
        {
            Ok(()) => info!(graph = %workspace.graph_path().display(), "graph rendered"),
            Err(err) => warn!(error = %err, "error generating graph"),
        }

        state.advance(JobState::Scanning);
        let counts = match self.scan(&workspace).await {
            Ok(counts) => counts,
            Err(error) => {
                error!(error = %error, "error scanning configuration");
                return self.abandon(&mut state, error);
            }
        };

        state.advance(JobState::Reporting);
        let verdict = Verdict::from_counts(&counts, graph_url(&self.config.base_url, &job.run_id));
        match verdict.status {
            VerdictStatus::Passed => info!("no configured patterns found"),
            VerdictStatus::Failed => warn!(report = %verdict.message, "configured patterns found"),
        }

        let delivery = deliver_verdict(
            &self.client,
            &request.task_result_callback_url,
            &request.access_token,
            &verdict.to_task_result(),
            self.config.callback_timeout,
        )
        .await;
        match &delivery {
            Ok(()) => info!(status = %verdict.status, "verdict delivered"),
            Err(err) => error!(error = %err, "error sending verdict"),
        }

        state.advance(JobState::Done);
        JobOutcome::Done { verdict, delivery }
    }

    async fn scan(&self, workspace: &RunWorkspace) -> Result<MatchCounts, PipelineError> {
        let pattern_file = self.config.pattern_file.clone();
        let root = workspace.config_dir();

        let counts = tokio::task::spawn_blocking(move || {
            let patterns = load_patterns(&pattern_file)?;
            scan_tree(&root, &patterns)
        })
        .await??;
        Ok(counts)
    }

    fn abandon(&self, state: &mut StateTracker, error: PipelineError) -> JobOutcome {
        let stage = state.state();
        state.advance(JobState::Abandoned);
        JobOutcome::Abandoned { stage, error }
    }
}
