pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod util;
pub mod workspace;

pub const TOOL_NAME: &str = "runtask";

/// JSON:API resource type of the verdict document sent to the callback.
pub const TASK_RESULT_TYPE: &str = "task-results";

/// Media type used for both the bundle download and the verdict callback.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Header carrying the hex HMAC of the raw webhook body.
pub const SIGNATURE_HEADER: &str = "x-tfc-task-signature";

pub use config::PipelineConfig;
pub use http::{AppState, build_router};
pub use model::{RunId, RunTaskRequest};
pub use pipeline::{Job, JobOutcome, JobQueue, Worker};
pub use report::model::{Verdict, VerdictStatus};
