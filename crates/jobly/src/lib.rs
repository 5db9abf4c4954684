//! # jobly
//!
//! Data access for job postings on PostgreSQL.
//!
//! ## Features
//!
//! - **Partial updates**: [`partial_update::compile_partial_update`] turns an
//!   ordered field/value map into a `SET` fragment plus its bound values
//! - **Search**: [`job::search_query`] composes the filtered job listing query
//!   without hand-tracking placeholder indices
//! - **Job model**: create / find_all / get / update / remove, each failing
//!   with [`ModelError::NotFound`] when the target row is missing
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ```ignore
//! use jobly::{Job, JobFilter, JobPatch};
//!
//! let pool = jobly::create_pool(&database_url, 16)?;
//! let conn = pool.get().await?;
//!
//! let jobs = Job::find_all(&conn, &JobFilter { has_equity: Some(true), ..Default::default() }).await?;
//! let job = Job::update(&conn, jobs[0].id, JobPatch { salary: Some(Some(500)), ..Default::default() }).await?;
//! ```

pub mod client;
pub mod company;
pub mod error;
pub mod job;
pub mod partial_update;
pub mod query;
pub mod row;
pub mod sql;

pub use client::GenericClient;
pub use company::Company;
pub use error::{ModelError, ModelResult};
pub use job::{Job, JobDetail, JobFilter, JobListing, JobPatch, NewJob, search_query};
pub use partial_update::{ColumnMap, FieldMap, FieldValue, PartialUpdate, compile_partial_update};
pub use query::query;
pub use row::{FromRow, RowExt};
pub use sql::{Sql, sql};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{DEFAULT_POOL_SIZE, create_pool};

#[cfg(feature = "migrate")]
pub mod migrate;
