//! Bounded FIFO between the HTTP front door and the worker.
//!
//! When the queue is full, `enqueue` waits for room instead of dropping the
//! job; the webhook request is held open meanwhile. Once the receiver is
//! gone, `enqueue` fails with `QueueClosed`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::model::{RunId, RunTaskRequest};
use crate::pipeline::job::Job;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("job queue is closed")]
pub struct QueueClosed;

/// Sending half, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
    next_seq: Arc<AtomicU64>,
}

/// Receiving half, owned by the single worker.
#[derive(Debug)]
pub struct JobReceiver {
    rx: mpsc::Receiver<Job>,
}

/// Create a queue holding at most `capacity` pending jobs.
///
/// # Panics
///
/// Panics if `capacity` is zero; `PipelineConfig::validate` rejects that.
pub fn job_queue(capacity: usize) -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        JobQueue {
            tx,
            next_seq: Arc::new(AtomicU64::new(1)),
        },
        JobReceiver { rx },
    )
}

impl JobQueue {
    /// Queue a job, waiting while the queue is full. Returns its sequence number.
    pub async fn enqueue(&self, run_id: RunId, request: RunTaskRequest) -> Result<u64, QueueClosed> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.tx
            .send(Job {
                seq,
                run_id,
                request,
            })
            .await
            .map_err(|_| QueueClosed)?;
        Ok(seq)
    }
}

impl JobReceiver {
    /// Next job in acceptance order; `None` once every sender is dropped.
    pub async fn next(&mut self) -> Option<Job> {
        self.rx.recv().await
    }

    pub fn try_next(&mut self) -> Option<Job> {
        self.rx.try_recv().ok()
    }
}
