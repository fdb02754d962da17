use std::fmt;

use tracing::info;

use crate::error::{DeliveryError, PipelineError};
use crate::model::{RunId, RunTaskRequest};
use crate::report::model::Verdict;

/// An authenticated webhook waiting for (or undergoing) processing.
#[derive(Debug, Clone)]
pub struct Job {
    /// Assigned at enqueue time, increasing.
    pub seq: u64,
    pub run_id: RunId,
    pub request: RunTaskRequest,
}

/// Lifecycle of a job.
///
/// `Queued → Downloading → GraphRendering → Scanning → Reporting → Done`,
/// with `Downloading` and `Scanning` allowed to fall through to `Abandoned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Downloading,
    GraphRendering,
    Scanning,
    Reporting,
    Done,
    Abandoned,
}

impl JobState {
    pub fn can_advance_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Queued, Downloading)
                | (Downloading, GraphRendering)
                | (Downloading, Abandoned)
                | (GraphRendering, Scanning)
                | (Scanning, Reporting)
                | (Scanning, Abandoned)
                | (Reporting, Done)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobState::Queued => "queued",
            JobState::Downloading => "downloading",
            JobState::GraphRendering => "graph_rendering",
            JobState::Scanning => "scanning",
            JobState::Reporting => "reporting",
            JobState::Done => "done",
            JobState::Abandoned => "abandoned",
        })
    }
}

/// Logs every transition and guards the state machine in debug builds.
#[derive(Debug)]
pub(crate) struct StateTracker {
    state: JobState,
}

impl StateTracker {
    pub(crate) fn new() -> Self {
        Self {
            state: JobState::Queued,
        }
    }

    pub(crate) fn state(&self) -> JobState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal job transition {} -> {}",
            self.state,
            next
        );
        info!(from = %self.state, to = %next, "job state");
        self.state = next;
    }
}

/// How a job ended.
#[derive(Debug)]
pub enum JobOutcome {
    /// A verdict was built and one delivery attempt was made.
    Done {
        verdict: Verdict,
        delivery: Result<(), DeliveryError>,
    },

    /// A fatal error stopped the job before any verdict was sent.
    Abandoned {
        stage: JobState,
        error: PipelineError,
    },
}

impl JobOutcome {
    pub fn state(&self) -> JobState {
        match self {
            JobOutcome::Done { .. } => JobState::Done,
            JobOutcome::Abandoned { .. } => JobState::Abandoned,
        }
    }
}
