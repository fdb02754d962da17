use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::warn;

use crate::JSON_API_CONTENT_TYPE;
use crate::error::DeliveryError;
use crate::report::model::TaskResult;

/// `PATCH` the task result to the run's callback URL.
///
/// One attempt only. A non-2xx response is logged with its body and
/// returned as `DeliveryError::Status`.
pub async fn deliver_verdict(
    client: &Client,
    callback_url: &str,
    token: &str,
    result: &TaskResult,
    deadline: Duration,
) -> Result<(), DeliveryError> {
    let body = serde_json::to_vec(result)?;

    let response = client
        .patch(callback_url)
        .bearer_auth(token)
        .header(CONTENT_TYPE, JSON_API_CONTENT_TYPE)
        .timeout(deadline)
        .body(body)
        .send()
        .await
        .map_err(|e| DeliveryError::Transport(e.without_url()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "callback rejected task result");
    Err(DeliveryError::Status {
        status: status.as_u16(),
        body,
    })
}
