use serde::{Deserialize, Serialize};

use crate::TASK_RESULT_TYPE;
use crate::model::RunId;
use crate::report::render::{PASSED_MESSAGE, render_violations};
use crate::rules::MatchCounts;

/// Outcome of the policy scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Passed,
    Failed,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            VerdictStatus::Passed => "passed",
            VerdictStatus::Failed => "failed",
        })
    }
}

/// The single result produced by a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub message: String,
    /// Where the run's rendered graph is served.
    pub url: String,
}

impl Verdict {
    /// Decide the verdict from scan counts.
    ///
    /// Any pattern with a positive count fails the run; otherwise it passes.
    pub fn from_counts(counts: &MatchCounts, url: String) -> Self {
        match render_violations(counts) {
            Some(message) => Self {
                status: VerdictStatus::Failed,
                message,
                url,
            },
            None => Self {
                status: VerdictStatus::Passed,
                message: PASSED_MESSAGE.to_string(),
                url,
            },
        }
    }

    /// Wrap the verdict in the callback's JSON:API envelope.
    pub fn to_task_result(&self) -> TaskResult {
        TaskResult {
            data: TaskResultData {
                kind: TASK_RESULT_TYPE.to_string(),
                attributes: TaskResultAttributes {
                    status: self.status,
                    message: self.message.clone(),
                    url: self.url.clone(),
                },
            },
        }
    }
}

/// `<base_url>/runs/<run_id>`, the graph resource linked from a verdict.
pub fn graph_url(base_url: &str, run_id: &RunId) -> String {
    format!("{}/runs/{}", base_url.trim_end_matches('/'), run_id)
}

/// Callback body: `{"data":{"type":"task-results","attributes":{...}}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResult {
    pub data: TaskResultData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResultData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: TaskResultAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResultAttributes {
    pub status: VerdictStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> String {
        "http://203.0.113.7/runs/run-abc".to_string()
    }

    #[test]
    fn any_positive_count_fails() {
        let counts = MatchCounts::from([
            ("AKIA[0-9A-Z]{16}".to_string(), 1),
            ("password".to_string(), 0),
        ]);

        let verdict = Verdict::from_counts(&counts, url());

        assert_eq!(verdict.status, VerdictStatus::Failed);
        assert!(verdict.message.contains("AKIA[0-9A-Z]{16}"));
        assert!(verdict.message.contains("Matches: 1"));
        assert!(!verdict.message.contains("password"));
    }

    #[test]
    fn all_zero_or_empty_passes() {
        let zero = MatchCounts::from([("x".to_string(), 0)]);

        for counts in [MatchCounts::new(), zero] {
            let verdict = Verdict::from_counts(&counts, url());
            assert_eq!(verdict.status, VerdictStatus::Passed);
            assert_eq!(verdict.message, "Configured patterns not found");
        }
    }

    #[test]
    fn task_result_matches_callback_document_shape() {
        let verdict = Verdict {
            status: VerdictStatus::Failed,
            message: "Pattern: secret, Matches: 2\n".into(),
            url: url(),
        };

        let value = serde_json::to_value(verdict.to_task_result()).unwrap();

        assert_eq!(
            value,
            json!({
                "data": {
                    "type": "task-results",
                    "attributes": {
                        "status": "failed",
                        "message": "Pattern: secret, Matches: 2\n",
                        "url": "http://203.0.113.7/runs/run-abc"
                    }
                }
            })
        );
    }

    #[test]
    fn empty_message_and_url_are_omitted() {
        let verdict = Verdict {
            status: VerdictStatus::Passed,
            message: String::new(),
            url: String::new(),
        };

        let value = serde_json::to_value(verdict.to_task_result()).unwrap();

        assert_eq!(value["data"]["attributes"], json!({"status": "passed"}));
    }

    #[test]
    fn graph_url_joins_base_and_run_id() {
        let run_id = RunId::parse("run-abc").unwrap();

        assert_eq!(
            graph_url("http://203.0.113.7", &run_id),
            "http://203.0.113.7/runs/run-abc"
        );
        assert_eq!(
            graph_url("https://runtask.example.com/", &run_id),
            "https://runtask.example.com/runs/run-abc"
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&VerdictStatus::Passed).unwrap(),
            "\"passed\""
        );
        assert_eq!(VerdictStatus::Failed.to_string(), "failed");
    }
}
