use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{info, warn};

use crate::SIGNATURE_HEADER;
use crate::http::AppState;
use crate::model::RunTaskRequest;

pub const ACCEPTED_BODY: &str = "200 OK";

/// Authenticate, parse and enqueue a run-task webhook.
///
/// The signature is checked against the raw body before any parsing. A full
/// queue holds the request open until the worker frees a slot.
pub async fn accept_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !state.verifier.verify(&body, signature) {
        warn!(body_bytes = body.len(), "rejected webhook with invalid signature");
        return (StatusCode::UNAUTHORIZED, "Invalid signature".to_string());
    }

    let (run_id, request) = match RunTaskRequest::from_slice(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(error = %err, "rejected malformed webhook");
            return (StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match state.queue.enqueue(run_id.clone(), request).await {
        Ok(seq) => {
            info!(%run_id, seq, "webhook queued");
            (StatusCode::OK, ACCEPTED_BODY.to_string())
        }
        Err(err) => {
            warn!(%run_id, error = %err, "webhook dropped");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}
