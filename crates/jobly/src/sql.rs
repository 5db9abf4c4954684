//! SQL-first dynamic builder.
//!
//! `Sql` is used whenever a statement is *composed* at runtime: every bound
//! value appends its own placeholder, so `$n` indices and the parameter list
//! cannot drift apart.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql;
//!
//! let mut q = sql("SELECT id, title FROM jobs");
//! let mut predicates = Vec::new();
//! if let Some(min) = min_salary {
//!     let mut p = Sql::empty();
//!     p.push("salary >= ").push_bind(min);
//!     predicates.push(p);
//! }
//! q.push_where_and(predicates).push(" ORDER BY title");
//!
//! let jobs: Vec<Job> = q.fetch_all_as(&conn).await?;
//! ```

use crate::client::GenericClient;
use crate::error::ModelResult;
use crate::row::FromRow;
use std::fmt::Write;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug)]
enum SqlPart {
    Raw(String),
    Param,
}

/// A parameter-safe dynamic SQL builder.
///
/// `Sql` stores SQL pieces and parameters separately and generates `$1, $2, ...`
/// placeholders in the final SQL string, one per bound parameter.
pub struct Sql {
    parts: Vec<SqlPart>,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Raw(initial_sql.into())],
            params: Vec::new(),
        }
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.parts.push(SqlPart::Param);
        self.params.push(Box::new(value));
        self
    }

    /// Append another `Sql` fragment, consuming it.
    ///
    /// The fragment's placeholders are renumbered to follow the ones already
    /// present in `self`.
    pub fn push_sql(&mut self, mut other: Sql) -> &mut Self {
        self.parts.append(&mut other.parts);
        self.params.append(&mut other.params);
        self
    }

    /// Append fragments joined by `AND`.
    ///
    /// If `predicates` is empty, this is a no-op.
    pub fn push_and(&mut self, predicates: Vec<Sql>) -> &mut Self {
        for (i, predicate) in predicates.into_iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            self.push_sql(predicate);
        }
        self
    }

    /// Append a `WHERE ...` clause composed of fragments joined by `AND`.
    ///
    /// If `predicates` is empty, this is a no-op: no dangling `WHERE` is emitted.
    pub fn push_where_and(&mut self, predicates: Vec<Sql>) -> &mut Self {
        if predicates.is_empty() {
            return self;
        }
        self.push(" WHERE ");
        self.push_and(predicates)
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Number of bound parameters.
    pub fn params_len(&self) -> usize {
        self.params.len()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    fn trace(&self, sql: &str) {
        tracing::debug!(target: "jobly::sql", sql, params = self.params.len(), "executing");
    }

    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> ModelResult<Vec<Row>> {
        let sql = self.to_sql();
        self.trace(&sql);
        let params = self.params_ref();
        conn.query(&sql, &params).await
    }

    /// Execute the built SQL and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> ModelResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(column: &str, value: i32) -> Sql {
        let mut p = Sql::empty();
        p.push(column).push(" = ").push_bind(value);
        p
    }

    #[test]
    fn builds_placeholders_in_order() {
        let mut q = sql("SELECT * FROM jobs WHERE a = ");
        q.push_bind(1).push(" AND b = ").push_bind("x");

        assert_eq!(q.to_sql(), "SELECT * FROM jobs WHERE a = $1 AND b = $2");
        assert_eq!(q.params_len(), 2);
    }

    #[test]
    fn can_compose_fragments() {
        let mut w = Sql::empty();
        w.push(" WHERE id = ").push_bind(42);

        let mut q = sql("SELECT * FROM jobs");
        q.push_sql(w);

        assert_eq!(q.to_sql(), "SELECT * FROM jobs WHERE id = $1");
        assert_eq!(q.params_len(), 1);
    }

    #[test]
    fn composed_fragments_are_renumbered() {
        let mut q = sql("UPDATE jobs SET salary = ");
        q.push_bind(10);
        q.push_sql(predicate(" WHERE id", 3));

        assert_eq!(q.to_sql(), "UPDATE jobs SET salary = $1 WHERE id = $2");
        assert_eq!(q.params_len(), 2);
    }

    #[test]
    fn where_and_joins_with_spaces() {
        let mut q = sql("SELECT * FROM jobs");
        q.push_where_and(vec![predicate("a", 1), predicate("b", 2)]);

        assert_eq!(q.to_sql(), "SELECT * FROM jobs WHERE a = $1 AND b = $2");
        assert_eq!(q.params_len(), 2);
    }

    #[test]
    fn where_and_without_predicates_is_noop() {
        let mut q = sql("SELECT * FROM jobs");
        q.push_where_and(Vec::new()).push(" ORDER BY title");

        assert_eq!(q.to_sql(), "SELECT * FROM jobs ORDER BY title");
        assert_eq!(q.params_len(), 0);
    }

    #[test]
    fn raw_only_fragments_do_not_consume_indices() {
        let mut raw = Sql::empty();
        raw.push("equity > 0");

        let mut q = sql("SELECT * FROM jobs");
        q.push_where_and(vec![predicate("a", 1), raw, predicate("b", 2)]);

        assert_eq!(
            q.to_sql(),
            "SELECT * FROM jobs WHERE a = $1 AND equity > 0 AND b = $2"
        );
        assert_eq!(q.params_len(), 2);
    }
}
