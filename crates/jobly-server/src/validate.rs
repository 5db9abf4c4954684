//! Changeset-style validation error types.

use serde::Serialize;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Len,
    Range,
    Decimal,
    Immutable,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Len => "len",
            Self::Range => "range",
            Self::Decimal => "decimal",
            Self::Immutable => "immutable",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Record a `len` error unless `value` has at least `min` characters
    /// and, when given, at most `max`.
    pub fn check_len(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) {
        let len = value.chars().count();
        if len < min || max.is_some_and(|max| len > max) {
            let message = match max {
                Some(max) => format!("must be between {min} and {max} characters"),
                None => format!("must be at least {min} characters"),
            };
            self.push(ValidationError::new(field, ValidationCode::Len, message));
        }
    }

    /// Record a `range` error if `value` is negative.
    pub fn check_non_negative(&mut self, field: &str, value: i32) {
        if value < 0 {
            self.push(ValidationError::new(
                field,
                ValidationCode::Range,
                "must be greater than or equal to 0",
            ));
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", err.field, err.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_checks_min_and_optional_max() {
        let mut errs = ValidationErrors::default();
        errs.check_len("title", "", 1, None);
        errs.check_len("companyHandle", &"x".repeat(26), 1, Some(25));
        errs.check_len("ok", "fine", 1, Some(25));

        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.code == ValidationCode::Len));
        assert_eq!(errs.items[1].message, "must be between 1 and 25 characters");
    }

    #[test]
    fn negative_numbers_are_out_of_range() {
        let mut errs = ValidationErrors::default();
        errs.check_non_negative("salary", 0);
        assert!(errs.is_empty());

        errs.check_non_negative("salary", -1);
        assert_eq!(errs.items[0].code.as_str(), "range");
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let mut errs = ValidationErrors::default();
        errs.push(ValidationError::new("companyHandle", ValidationCode::Immutable, "cannot be changed"));

        let value = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "field": "companyHandle",
                "code": "immutable",
                "message": "cannot be changed"
            }])
        );
        assert_eq!(errs.to_string(), "companyHandle cannot be changed");
    }

    #[test]
    fn into_result_passes_value_through_when_clean() {
        assert_eq!(ValidationErrors::default().into_result(5), Ok(5));

        let mut errs = ValidationErrors::default();
        errs.push(ValidationError::new("x", ValidationCode::Required, "is required"));
        assert!(errs.into_result(5).is_err());
    }
}
