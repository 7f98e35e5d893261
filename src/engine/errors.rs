//! Engine error type
//!
//! Every failure of a public database operation is a `DbError`. Validation
//! errors are raised before the catalog is touched; `Persistence` is raised
//! after an in-memory mutation whose save failed.

use thiserror::Error;

use crate::schema::{SchemaError, SchemaErrorCode};
use crate::storage::StorageError;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Table {0} already exists")]
    DuplicateTable(String),

    #[error("Required field {field} missing in table {table}")]
    MissingField { table: String, field: String },

    #[error("Invalid type for {field} in table {table}: expected {expected}, got {actual}")]
    TypeMismatch {
        table: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid field {field} for table {table}")]
    InvalidField { table: String, field: String },

    #[error("Record {id} not found in table {table}")]
    RecordNotFound { table: String, id: u64 },

    #[error("No ids left to assign in table {0}")]
    IdsExhausted(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DbError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DbError::TableNotFound(_) => "TABLE_NOT_FOUND",
            DbError::DuplicateTable(_) => "DUPLICATE_TABLE",
            DbError::MissingField { .. } => "MISSING_FIELD",
            DbError::TypeMismatch { .. } => "TYPE_MISMATCH",
            DbError::InvalidField { .. } => "INVALID_FIELD",
            DbError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            DbError::IdsExhausted(_) => "IDS_EXHAUSTED",
            DbError::Persistence(_) => "PERSISTENCE_FAILED",
            DbError::Config(_) => "CONFIG_INVALID",
            DbError::LockPoisoned => "LOCK_POISONED",
        }
    }

    /// True for faults raised before any state was touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DbError::TableNotFound(_)
                | DbError::DuplicateTable(_)
                | DbError::MissingField { .. }
                | DbError::TypeMismatch { .. }
                | DbError::InvalidField { .. }
                | DbError::RecordNotFound { .. }
                | DbError::IdsExhausted(_)
        )
    }

    /// True if the in-memory catalog may be ahead of the backing file
    pub fn is_persistence(&self) -> bool {
        matches!(self, DbError::Persistence(_))
    }
}

impl From<SchemaError> for DbError {
    fn from(err: SchemaError) -> Self {
        let (code, table, details) = err.into_parts();
        match code {
            SchemaErrorCode::MissingField => DbError::MissingField {
                table,
                field: details.field,
            },
            SchemaErrorCode::TypeMismatch => DbError::TypeMismatch {
                table,
                field: details.field,
                expected: details.expected,
                actual: details.actual,
            },
            SchemaErrorCode::InvalidField => DbError::InvalidField {
                table,
                field: details.field,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationDetails;

    #[test]
    fn test_schema_errors_map_to_db_errors() {
        let err: DbError = SchemaError::missing_field("users", "name").into();
        assert!(matches!(err, DbError::MissingField { ref field, .. } if field == "name"));
        assert_eq!(err.code(), "MISSING_FIELD");

        let err: DbError = SchemaError::type_mismatch(
            "users",
            ValidationDetails::type_mismatch("age", "number", "string"),
        )
        .into();
        assert_eq!(err.code(), "TYPE_MISMATCH");
        assert!(err.to_string().contains("expected number, got string"));

        let err: DbError =
            SchemaError::invalid_field("users", ValidationDetails::undeclared_field("email"))
                .into();
        assert_eq!(err.code(), "INVALID_FIELD");
    }

    #[test]
    fn test_classification() {
        assert!(DbError::TableNotFound("t".into()).is_validation());
        assert!(!DbError::LockPoisoned.is_validation());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: DbError = StorageError::write_failed("Failed to write", io).into();
        assert!(err.is_persistence());
        assert_eq!(err.code(), "PERSISTENCE_FAILED");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DbError::DuplicateTable("users".into()).to_string(),
            "Table users already exists"
        );
        assert_eq!(
            DbError::RecordNotFound {
                table: "users".into(),
                id: 7
            }
            .to_string(),
            "Record 7 not found in table users"
        );
    }
}
