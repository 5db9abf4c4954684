//! Partial-update compilation: field/value pairs to a `SET` fragment.
//!
//! ```ignore
//! use jobly::partial_update::{ColumnMap, FieldMap, compile_partial_update};
//!
//! let mut fields = FieldMap::new();
//! fields.set("title", "New").set("salary", 100);
//!
//! let update = compile_partial_update(fields, &ColumnMap::EMPTY)?;
//! assert_eq!(update.set_clause, r#""title"=$1, "salary"=$2"#);
//! ```

use crate::error::{ModelError, ModelResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::Write;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A value assigned to a column by a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
    Numeric(Decimal),
    Null,
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Numeric(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// Each variant delegates to the checked conversion of its inner type, so a
// text value bound to an integer column is still rejected client-side.
impl ToSql for FieldValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Text(v) => v.to_sql_checked(ty, out),
            Self::Int(v) => v.to_sql_checked(ty, out),
            Self::Numeric(v) => v.to_sql_checked(ty, out),
            Self::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Insertion-ordered mapping of field names to new values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`. An existing entry keeps its position.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Static translation from API-facing field names to storage columns.
///
/// Fields without an entry map to themselves.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnMap<'a> {
    /// A map that translates nothing.
    pub const EMPTY: ColumnMap<'static> = ColumnMap { entries: &[] };

    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    /// Storage column for `field`.
    pub fn resolve<'s>(&'s self, field: &'s str) -> &'s str {
        self.entries
            .iter()
            .find(|(from, _)| *from == field)
            .map_or(field, |(_, to)| *to)
    }
}

/// A compiled `SET` fragment and the values for its placeholders.
///
/// `values[i]` is bound to `$<i+1>` in `set_clause`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub set_clause: String,
    pub values: Vec<FieldValue>,
}

impl PartialUpdate {
    /// Index of the first placeholder after the `SET` values.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Compile `fields` into `"col1"=$1, "col2"=$2, ...` plus the ordered values.
///
/// Column names come from `columns` (falling back to the field name) and are
/// quoted as identifiers; values are never interpolated. Callers decide which
/// fields are allowed to reach this function.
///
/// Returns [`ModelError::BadRequest`] if `fields` is empty.
pub fn compile_partial_update(
    fields: FieldMap,
    columns: &ColumnMap<'_>,
) -> ModelResult<PartialUpdate> {
    if fields.is_empty() {
        return Err(ModelError::bad_request("No data"));
    }

    let mut set_clause = String::new();
    let mut values = Vec::with_capacity(fields.len());

    for (field, value) in fields {
        if !values.is_empty() {
            set_clause.push_str(", ");
        }
        values.push(value);
        let column = columns.resolve(&field).replace('"', "\"\"");
        let _ = write!(set_clause, "\"{}\"=${}", column, values.len());
    }

    Ok(PartialUpdate { set_clause, values })
}
