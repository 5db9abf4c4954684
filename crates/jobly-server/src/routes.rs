use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{jobs, probes};
use crate::state::AppState;

/// The complete route table.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/jobs/:id",
            get(jobs::get).patch(jobs::update).delete(jobs::remove),
        )
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
