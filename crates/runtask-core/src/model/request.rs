use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::model::run_id::RunId;

/// Pre-plan run task webhook payload.
///
/// Only the run id, access token, callback URL and download URL drive the
/// pipeline. The remaining fields are carried through for logging and may be
/// `null` on the wire. Missing fields default; unknown fields are ignored.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunTaskRequest {
    pub payload_version: i64,
    pub access_token: String,
    pub stage: Option<String>,
    pub is_speculative: bool,
    pub task_result_id: Option<String>,
    pub task_result_enforcement_level: Option<String>,
    pub task_result_callback_url: String,
    pub run_app_url: Option<String>,
    pub run_id: String,
    pub run_message: Option<String>,
    pub run_created_at: Option<String>,
    pub run_created_by: Option<String>,
    pub workspace_id: Option<String>,
    pub workspace_name: Option<String>,
    pub workspace_app_url: Option<String>,
    pub organization_name: Option<String>,
    pub vcs_repo_url: Option<String>,
    pub vcs_branch: Option<String>,
    pub vcs_pull_request_url: Option<String>,
    pub vcs_commit_url: Option<String>,
    pub configuration_version_id: Option<String>,
    pub configuration_version_download_url: String,
    pub workspace_working_directory: Option<String>,
}

impl RunTaskRequest {
    /// Decode a raw webhook body and validate its run identifier.
    pub fn from_slice(body: &[u8]) -> Result<(RunId, Self), RequestError> {
        let request: Self = serde_json::from_slice(body)?;
        let run_id = RunId::parse(&request.run_id)?;
        Ok((run_id, request))
    }
}

impl std::fmt::Debug for RunTaskRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunTaskRequest")
            .field("run_id", &self.run_id)
            .field("stage", &self.stage)
            .field("is_speculative", &self.is_speculative)
            .field("organization_name", &self.organization_name)
            .field("workspace_name", &self.workspace_name)
            .field("configuration_version_id", &self.configuration_version_id)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
