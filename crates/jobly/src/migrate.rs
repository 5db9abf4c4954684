//! Embedded SQL migrations via [`refinery`].
//!
//! Migration files live in this crate's `migrations/` directory and are
//! compiled into the binary.
//!
//! ```ignore
//! let pool = jobly::create_pool(&database_url, 4)?;
//! let report = jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::ModelResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Apply all pending migrations on `client`.
pub async fn run(client: &mut tokio_postgres::Client) -> ModelResult<Report> {
    let report = embedded::migrations::runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(report)
}

/// Pool variant of [`run`].
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> ModelResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
