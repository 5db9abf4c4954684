use axum::extract::State;
use jobly::GenericClient;

use crate::{error::ApiResult, state::AppState};

pub async fn livez() -> ApiResult<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> ApiResult<()> {
    let conn = state.pool.get().await?;
    conn.execute("SELECT 1", &[]).await?;
    tracing::debug!("service is healthy");
    Ok(())
}
