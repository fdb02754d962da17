//! Job queue and the single worker that drains it.

pub mod job;
pub mod queue;
pub mod worker;

pub use job::{Job, JobOutcome, JobState};
pub use queue::{JobQueue, JobReceiver, QueueClosed, job_queue};
pub use worker::Worker;
