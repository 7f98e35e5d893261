//! Storage error types
//!
//! Error codes:
//! - STORAGE_READ_FAILED: backing file exists but could not be read
//! - STORAGE_MALFORMED_DOCUMENT: backing file is not a valid catalog document
//! - STORAGE_WRITE_FAILED: catalog could not be encoded or written

use std::fmt;
use std::io;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Backing file read failed
    StorageReadFailed,
    /// Backing file content could not be decoded
    StorageMalformedDocument,
    /// Catalog write failed
    StorageWriteFailed,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageReadFailed => "STORAGE_READ_FAILED",
            StorageErrorCode::StorageMalformedDocument => "STORAGE_MALFORMED_DOCUMENT",
            StorageErrorCode::StorageWriteFailed => "STORAGE_WRITE_FAILED",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with path context and optional I/O source
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::StorageMalformedDocument,
            message: message.into(),
            details: Some(reason.into()),
            source: None,
        }
    }

    /// Create a write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a write failed error without I/O source
    pub fn write_failed_no_source(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::StorageWriteFailed,
            message: message.into(),
            details: Some(reason.into()),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns true for faults decoding an existing document
    pub fn is_malformed(&self) -> bool {
        self.code == StorageErrorCode::StorageMalformedDocument
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_codes() {
        assert_eq!(StorageErrorCode::StorageReadFailed.code(), "STORAGE_READ_FAILED");
        assert_eq!(
            StorageErrorCode::StorageMalformedDocument.code(),
            "STORAGE_MALFORMED_DOCUMENT"
        );
        assert_eq!(StorageErrorCode::StorageWriteFailed.code(), "STORAGE_WRITE_FAILED");
    }

    #[test]
    fn test_io_source_is_exposed() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::write_failed("Failed to write db.json", io);

        assert!(err.source().is_some());
        let display = err.to_string();
        assert!(display.contains("STORAGE_WRITE_FAILED"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_malformed_carries_reason() {
        let err = StorageError::malformed("Invalid catalog document", "expected value at line 1");
        assert!(err.is_malformed());
        assert_eq!(err.details(), Some("expected value at line 1"));
    }
}
