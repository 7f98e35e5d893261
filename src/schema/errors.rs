//! Schema error types
//!
//! Error codes:
//! - MISSING_FIELD: a required field is absent on insert
//! - TYPE_MISMATCH: a value does not match its declared type
//! - INVALID_FIELD: an update targets an undeclared (or protected) field

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Required field absent
    MissingField,
    /// Declared type not matched
    TypeMismatch,
    /// Field not declared in schema
    InvalidField,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MissingField => "MISSING_FIELD",
            SchemaErrorCode::TypeMismatch => "TYPE_MISMATCH",
            SchemaErrorCode::InvalidField => "INVALID_FIELD",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Offending field
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value type or condition found
    pub actual: String,
}

impl ValidationDetails {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn undeclared_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "declared schema field".into(),
            actual: "undeclared field".into(),
        }
    }

    pub fn protected_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "updatable field".into(),
            actual: "engine-assigned field".into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with table context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    table: String,
    details: ValidationDetails,
}

impl SchemaError {
    /// Required field absent
    pub fn missing_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MissingField,
            table: table.into(),
            details: ValidationDetails::missing_field(field),
        }
    }

    /// Value type does not match the declaration
    pub fn type_mismatch(table: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::TypeMismatch,
            table: table.into(),
            details,
        }
    }

    /// Field may not be written through an update
    pub fn invalid_field(table: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::InvalidField,
            table: table.into(),
            details,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the table being written
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the offending field name
    pub fn field(&self) -> &str {
        &self.details.field
    }

    /// Returns validation details
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }

    /// Consumes the error, returning table and details
    pub fn into_parts(self) -> (SchemaErrorCode, String, ValidationDetails) {
        (self.code, self.table, self.details)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on table '{}': {}", self.code, self.table, self.details)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::MissingField.code(), "MISSING_FIELD");
        assert_eq!(SchemaErrorCode::TypeMismatch.code(), "TYPE_MISMATCH");
        assert_eq!(SchemaErrorCode::InvalidField.code(), "INVALID_FIELD");
    }

    #[test]
    fn test_display_includes_context() {
        let err = SchemaError::type_mismatch(
            "users",
            ValidationDetails::type_mismatch("age", "number", "string"),
        );
        let display = err.to_string();
        assert!(display.contains("TYPE_MISMATCH"));
        assert!(display.contains("users"));
        assert!(display.contains("age"));
        assert!(display.contains("number"));
    }
}
