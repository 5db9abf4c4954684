//! Job postings: model types, search query composition and CRUD operations.

use crate::client::GenericClient;
use crate::company::Company;
use crate::error::{ModelError, ModelResult};
use crate::partial_update::{ColumnMap, FieldMap, compile_partial_update};
use crate::query::query;
use crate::row::{FromRow, RowExt};
use crate::sql::{Sql, sql};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_postgres::Row;

/// API field name to `jobs` column.
pub const JOB_COLUMN_MAP: ColumnMap<'static> = ColumnMap::new(&[("companyHandle", "company_handle")]);

const JOB_RETURNING: &str = "id, title, salary, equity, company_handle";

const SEARCH_SELECT: &str = "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, \
     c.name AS company_name \
     FROM jobs AS j \
     LEFT JOIN companies AS c ON c.handle = j.company_handle";

/// A job row as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job row enriched with the owning company's name, as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            company_name: row.try_get_column("company_name")?,
        })
    }
}

/// A job with its company embedded in place of the handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl JobDetail {
    fn new(job: Job, company: Company) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        }
    }
}

/// Data for a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Changes to an existing job.
///
/// `None` leaves a field untouched; `Some(None)` clears a nullable field.
/// The owning company cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.salary.is_none() && self.equity.is_none()
    }

    /// Fields to update, in column order.
    pub fn into_fields(self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(title) = self.title {
            fields.set("title", title);
        }
        if let Some(salary) = self.salary {
            fields.set("salary", salary);
        }
        if let Some(equity) = self.equity {
            fields.set("equity", equity);
        }
        fields
    }
}

/// Optional search criteria for [`Job::find_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
    pub title: Option<String>,
}

/// Escape `LIKE` wildcards so `title` matches as a literal substring.
fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Compose the job search `SELECT` for `filter`.
///
/// Predicates are ANDed in the order min salary, equity, title. `WHERE` is
/// only emitted when at least one predicate applies. Rows are ordered by title.
pub fn search_query(filter: &JobFilter) -> Sql {
    let mut predicates = Vec::new();

    if let Some(min_salary) = filter.min_salary {
        let mut p = Sql::empty();
        p.push("j.salary >= ").push_bind(min_salary);
        predicates.push(p);
    }

    if filter.has_equity == Some(true) {
        let mut p = Sql::empty();
        p.push("j.equity > 0");
        predicates.push(p);
    }

    if let Some(title) = &filter.title {
        let mut p = Sql::empty();
        p.push("j.title ILIKE ").push_bind(like_contains(title));
        predicates.push(p);
    }

    let mut q = sql(SEARCH_SELECT);
    q.push_where_and(predicates).push(" ORDER BY j.title");
    q
}

impl Job {
    /// Insert a new job.
    ///
    /// An unknown company handle fails with [`ModelError::ForeignKeyViolation`].
    pub async fn create(conn: &impl GenericClient, new_job: NewJob) -> ModelResult<Job> {
        let job: Job = query(format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {JOB_RETURNING}"
        ))
        .bind(new_job.title)
        .bind(new_job.salary)
        .bind(new_job.equity)
        .bind(new_job.company_handle)
        .fetch_one_as(conn)
        .await?;

        tracing::info!(job_id = job.id, company = %job.company_handle, "created job");
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &JobFilter,
    ) -> ModelResult<Vec<JobListing>> {
        search_query(filter).fetch_all_as(conn).await
    }

    /// A single job with its company embedded.
    pub async fn get(conn: &impl GenericClient, id: i32) -> ModelResult<JobDetail> {
        let job: Job = query(format!("SELECT {JOB_RETURNING} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| {
                tracing::debug!(job_id = id, "job not found");
                ModelError::not_found(format!("No job: {id}"))
            })?;

        let company = Company::get_by_handle(conn, &job.company_handle)
            .await?
            .ok_or_else(|| ModelError::not_found(format!("No company: {}", job.company_handle)))?;

        Ok(JobDetail::new(job, company))
    }

    /// Apply `patch` to the job and return the updated row.
    ///
    /// Fails with [`ModelError::BadRequest`] for an empty patch (nothing is
    /// sent to storage) and [`ModelError::NotFound`] if no row has `id`.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: JobPatch) -> ModelResult<Job> {
        let update = compile_partial_update(patch.into_fields(), &JOB_COLUMN_MAP)?;
        let id_placeholder = update.next_placeholder();

        let job: Option<Job> = query(format!(
            "UPDATE jobs SET {} WHERE id = ${id_placeholder} RETURNING {JOB_RETURNING}",
            update.set_clause
        ))
        .bind_all(update.values)
        .bind(id)
        .fetch_opt_as(conn)
        .await?;

        match job {
            Some(job) => {
                tracing::info!(job_id = id, "updated job");
                Ok(job)
            }
            None => {
                tracing::debug!(job_id = id, "job not found");
                Err(ModelError::not_found(format!("No job: {id}")))
            }
        }
    }

    /// Delete the job with `id`.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> ModelResult<()> {
        let deleted = query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_opt(conn)
            .await?;

        if deleted.is_none() {
            tracing::debug!(job_id = id, "job not found");
            return Err(ModelError::not_found(format!("No job: {id}")));
        }

        tracing::info!(job_id = id, "removed job");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial_update::FieldValue;
    use serde_json::json;
    use std::str::FromStr;

    fn params_debug(q: &Sql) -> Vec<String> {
        q.params_ref().iter().map(|p| format!("{p:?}")).collect()
    }

    #[test]
    fn search_without_criteria_has_no_where() {
        let q = search_query(&JobFilter::default());

        assert_eq!(q.to_sql(), format!("{SEARCH_SELECT} ORDER BY j.title"));
        assert_eq!(q.params_len(), 0);
    }

    #[test]
    fn search_min_salary_and_equity() {
        let filter = JobFilter {
            min_salary: Some(100),
            has_equity: Some(true),
            ..Default::default()
        };
        let q = search_query(&filter);

        assert_eq!(
            q.to_sql(),
            format!("{SEARCH_SELECT} WHERE j.salary >= $1 AND j.equity > 0 ORDER BY j.title")
        );
        assert_eq!(params_debug(&q), vec!["100"]);
    }

    #[test]
    fn search_equity_then_title_numbers_title_first() {
        let filter = JobFilter {
            has_equity: Some(true),
            title: Some("ob1".into()),
            ..Default::default()
        };
        let q = search_query(&filter);

        assert_eq!(
            q.to_sql(),
            format!("{SEARCH_SELECT} WHERE j.equity > 0 AND j.title ILIKE $1 ORDER BY j.title")
        );
        assert_eq!(params_debug(&q), vec![r#""%ob1%""#]);
    }

    #[test]
    fn search_all_criteria() {
        let filter = JobFilter {
            min_salary: Some(250),
            has_equity: Some(true),
            title: Some("eng".into()),
        };
        let q = search_query(&filter);

        assert_eq!(
            q.to_sql(),
            format!(
                "{SEARCH_SELECT} WHERE j.salary >= $1 AND j.equity > 0 AND j.title ILIKE $2 \
                 ORDER BY j.title"
            )
        );
        assert_eq!(params_debug(&q), vec!["250", r#""%eng%""#]);
    }

    #[test]
    fn has_equity_false_adds_nothing() {
        let filter = JobFilter {
            has_equity: Some(false),
            ..Default::default()
        };
        let q = search_query(&filter);

        assert!(!q.to_sql().contains("WHERE"));
        assert_eq!(q.params_len(), 0);
    }

    #[test]
    fn value_count_tracks_binding_criteria() {
        for min_salary in [None, Some(1)] {
            for has_equity in [None, Some(false), Some(true)] {
                for title in [None, Some("x".to_string())] {
                    let expected = min_salary.is_some() as usize + title.is_some() as usize;
                    let q = search_query(&JobFilter {
                        min_salary,
                        has_equity,
                        title,
                    });

                    assert_eq!(q.params_len(), expected);
                    assert_eq!(q.to_sql().matches('$').count(), expected);
                }
            }
        }
    }

    #[test]
    fn title_wildcards_match_literally() {
        assert_eq!(like_contains("50%_off"), r"%50\%\_off%");
        assert_eq!(like_contains(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn patch_fields_follow_column_order() {
        let patch = JobPatch {
            equity: Some(None),
            title: Some("New".into()),
            salary: Some(Some(500)),
        };

        let fields: Vec<_> = patch.into_fields().into_iter().collect();

        assert_eq!(
            fields,
            vec![
                ("title".to_string(), FieldValue::Text("New".into())),
                ("salary".to_string(), FieldValue::Int(500)),
                ("equity".to_string(), FieldValue::Null),
            ]
        );
    }

    #[test]
    fn empty_patch_has_no_fields() {
        let patch = JobPatch::default();
        assert!(patch.is_empty());
        assert!(patch.into_fields().is_empty());
    }

    #[test]
    fn salary_only_patch_compiles_to_single_assignment() {
        let patch = JobPatch {
            salary: Some(Some(500)),
            ..Default::default()
        };

        let update = compile_partial_update(patch.into_fields(), &JOB_COLUMN_MAP).unwrap();
        assert_eq!(update.set_clause, r#""salary"=$1"#);
        assert_eq!(update.next_placeholder(), 2);
    }

    #[test]
    fn company_handle_translates_to_column() {
        assert_eq!(JOB_COLUMN_MAP.resolve("companyHandle"), "company_handle");
        assert_eq!(JOB_COLUMN_MAP.resolve("title"), "title");
    }

    #[test]
    fn job_serializes_with_camel_case_handle() {
        let job = Job {
            id: 1,
            title: "J1".into(),
            salary: Some(100),
            equity: Some(Decimal::from_str("0.1").unwrap()),
            company_handle: "c1".into(),
        };

        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({"id": 1, "title": "J1", "salary": 100, "equity": "0.1", "companyHandle": "c1"})
        );
    }

    #[test]
    fn job_detail_nests_company_instead_of_handle() {
        let job = Job {
            id: 7,
            title: "J7".into(),
            salary: None,
            equity: None,
            company_handle: "c1".into(),
        };
        let company = Company {
            handle: "c1".into(),
            name: "C1".into(),
            description: "Desc1".into(),
            num_employees: Some(1),
            logo_url: Some("http://c1.img".into()),
        };

        let value = serde_json::to_value(JobDetail::new(job, company)).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "J7",
                "salary": null,
                "equity": null,
                "company": {
                    "handle": "c1",
                    "name": "C1",
                    "description": "Desc1",
                    "numEmployees": 1,
                    "logoUrl": "http://c1.img"
                }
            })
        );
        assert!(value.get("companyHandle").is_none());
    }
}
