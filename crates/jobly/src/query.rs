//! Lightweight query runner for hand-written SQL

use crate::client::GenericClient;
use crate::error::ModelResult;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Executes hand-written SQL that already contains `$1, $2, ...` placeholders.
///
/// Values are bound in placeholder order.
///
/// # Example
///
/// ```ignore
/// use jobly::query;
///
/// let company: Option<Company> = query("SELECT * FROM companies WHERE handle = $1")
///     .bind(handle.to_string())
///     .fetch_opt_as(&conn)
///     .await?;
/// ```
pub struct Query {
    sql: String,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
    }
}

impl Query {
    /// Bind a parameter to the query
    pub fn bind<T: ToSql + Sync + Send + 'static>(mut self, value: T) -> Self {
        self.params.push(Box::new(value));
        self
    }

    /// Bind every value of an iterator, in order
    pub fn bind_all<T, I>(mut self, values: I) -> Self
    where
        T: ToSql + Sync + Send + 'static,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.params.push(Box::new(value));
        }
        self
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        tracing::debug!(target: "jobly::sql", sql = %self.sql, params = self.params.len(), "executing");
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    /// Execute the query and return exactly one row
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> ModelResult<Row> {
        let params = self.params_ref();
        conn.query_one(&self.sql, &params).await
    }

    /// Execute the query and return exactly one row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> ModelResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> ModelResult<Option<Row>> {
        let params = self.params_ref();
        conn.query_opt(&self.sql, &params).await
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> ModelResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }
}
