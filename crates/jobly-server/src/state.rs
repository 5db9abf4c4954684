use deadpool_postgres::Pool;
use std::sync::Arc;

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub secret: Arc<str>,
}

impl AppState {
    pub fn new(pool: Pool, secret: impl Into<Arc<str>>) -> Self {
        Self {
            pool,
            secret: secret.into(),
        }
    }
}
