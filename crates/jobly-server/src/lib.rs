//! # jobly-server
//!
//! HTTP API over the [`jobly`] job model.
//!
//! | Method & Path | Access |
//! |---|---|
//! | `GET /jobs` | public |
//! | `GET /jobs/:id` | public |
//! | `POST /jobs` | admin |
//! | `PATCH /jobs/:id` | admin |
//! | `DELETE /jobs/:id` | admin |
//! | `GET /healthz`, `GET /livez` | public |
//!
//! Admin routes expect `Authorization: Bearer <token>`; mint one with
//! `jobly token --username <name> --admin`.

pub mod auth;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod input;
pub mod routes;
pub mod server;
pub mod state;
pub mod validate;

pub use error::{ApiError, ApiResult};
pub use routes::build_routes;
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jobly=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
