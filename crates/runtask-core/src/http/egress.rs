use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::http::AppState;
use crate::model::RunId;

/// Serve `<work_root>/<run_id>/graph.png`, or 404 when there is none.
///
/// Run ids outside the safe alphabet are answered like unknown runs so the
/// path never reaches the filesystem.
pub async fn serve_graph(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    let Ok(run_id) = RunId::parse(&run_id) else {
        return not_found();
    };

    let path = state.workspaces.for_run(&run_id).graph_path();
    match tokio::fs::read(&path).await {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(err) => {
            debug!(%run_id, error = %err, "graph not available");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
