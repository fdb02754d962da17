pub mod request;
pub mod run_id;

pub use request::RunTaskRequest;
pub use run_id::RunId;
