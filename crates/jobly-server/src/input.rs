//! Request payloads for the job routes and their conversion into model types.
//!
//! Every payload rejects unknown keys at deserialization time; value rules
//! are checked by the `try_into_*` conversions, which report every offending
//! field at once.

use crate::validate::{ValidationCode, ValidationError, ValidationErrors};
use jobly::{JobFilter, JobPatch, NewJob};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

const MAX_HANDLE_LEN: usize = 25;

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}

fn required<T>(errs: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errs.push(ValidationError::new(field, ValidationCode::Required, "is required"));
    }
    value
}

/// Parse an equity string into a decimal in `[0, 1]`.
fn parse_equity(errs: &mut ValidationErrors, raw: &str) -> Option<Decimal> {
    let Ok(equity) = Decimal::from_str(raw.trim()) else {
        errs.push(ValidationError::new(
            "equity",
            ValidationCode::Decimal,
            "must be a decimal string",
        ));
        return None;
    };
    if equity < Decimal::ZERO || equity > Decimal::ONE {
        errs.push(ValidationError::new(
            "equity",
            ValidationCode::Range,
            "must be between 0 and 1",
        ));
        return None;
    }
    Some(equity)
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NewJobInput {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: Option<String>,
}

impl NewJobInput {
    pub fn validate(&self) -> ValidationErrors {
        self.clone().try_into_new_job().err().unwrap_or_default()
    }

    pub fn try_into_new_job(self) -> Result<NewJob, ValidationErrors> {
        let mut errs = ValidationErrors::default();

        let title = required(&mut errs, "title", self.title);
        if let Some(title) = &title {
            errs.check_len("title", title, 1, None);
        }
        if let Some(salary) = self.salary {
            errs.check_non_negative("salary", salary);
        }
        let equity = self
            .equity
            .as_deref()
            .and_then(|raw| parse_equity(&mut errs, raw));
        let company_handle = required(&mut errs, "companyHandle", self.company_handle);
        if let Some(handle) = &company_handle {
            errs.check_len("companyHandle", handle, 1, Some(MAX_HANDLE_LEN));
        }

        match (title, company_handle) {
            (Some(title), Some(company_handle)) => errs.into_result(NewJob {
                title,
                salary: self.salary,
                equity,
                company_handle,
            }),
            _ => Err(errs),
        }
    }
}

/// Body of `PATCH /jobs/:id`.
///
/// `salary` and `equity` accept `null` to clear the stored value.
/// `companyHandle` is accepted by the parser only so it can be reported as
/// immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JobPatchInput {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub equity: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub company_handle: Option<serde_json::Value>,
}

impl JobPatchInput {
    pub fn validate(&self) -> ValidationErrors {
        self.clone().try_into_patch().err().unwrap_or_default()
    }

    pub fn try_into_patch(self) -> Result<JobPatch, ValidationErrors> {
        let mut errs = ValidationErrors::default();

        if self.company_handle.is_some() {
            errs.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Immutable,
                "cannot be changed",
            ));
        }

        let title = match self.title {
            Some(Some(title)) => {
                errs.check_len("title", &title, 1, None);
                Some(title)
            }
            Some(None) => {
                errs.push(ValidationError::new("title", ValidationCode::Required, "cannot be null"));
                None
            }
            None => None,
        };

        if let Some(Some(salary)) = self.salary {
            errs.check_non_negative("salary", salary);
        }

        let equity = match self.equity {
            Some(Some(raw)) => parse_equity(&mut errs, &raw).map(Some),
            Some(None) => Some(None),
            None => None,
        };

        errs.into_result(JobPatch {
            title,
            salary: self.salary,
            equity,
        })
    }
}

/// Query string of `GET /jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JobSearchQuery {
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
    pub title: Option<String>,
}

impl JobSearchQuery {
    pub fn try_into_filter(self) -> Result<JobFilter, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if let Some(min_salary) = self.min_salary {
            errs.check_non_negative("minSalary", min_salary);
        }
        if let Some(title) = &self.title {
            errs.check_len("title", title, 1, None);
        }
        errs.into_result(JobFilter {
            min_salary: self.min_salary,
            has_equity: self.has_equity,
            title: self.title,
        })
    }
}
