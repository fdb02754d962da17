//! HTTP front door: webhook ingress, graph egress and a health check.

pub mod egress;
pub mod ingress;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::auth::SignatureVerifier;
use crate::pipeline::JobQueue;
use crate::workspace::WorkspaceRoot;

/// Shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub verifier: Arc<SignatureVerifier>,
    pub queue: JobQueue,
    pub workspaces: WorkspaceRoot,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        verifier: SignatureVerifier,
        queue: JobQueue,
        workspaces: WorkspaceRoot,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            queue,
            workspaces,
            max_body_bytes,
        }
    }
}

/// `POST /` accepts webhooks, `GET /runs/:run_id` serves graphs.
///
/// Other methods on a known path get 405 from the method router.
pub fn build_router(state: AppState) -> Router {
    let limit = state.max_body_bytes;
    Router::new()
        .route("/", post(ingress::accept_webhook))
        .route("/runs/:run_id", get(egress::serve_graph))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
