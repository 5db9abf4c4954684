//! Read-only access to companies.

use crate::client::GenericClient;
use crate::error::ModelResult;
use crate::query::query;
use crate::row::{FromRow, RowExt};
use serde::Serialize;
use tokio_postgres::Row;

/// A company that owns job postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

impl Company {
    /// Fetch a company by its handle.
    pub async fn get_by_handle(
        conn: &impl GenericClient,
        handle: &str,
    ) -> ModelResult<Option<Company>> {
        query(
            "SELECT handle, name, description, num_employees, logo_url \
             FROM companies WHERE handle = $1",
        )
        .bind(handle.to_string())
        .fetch_opt_as(conn)
        .await
    }
}
