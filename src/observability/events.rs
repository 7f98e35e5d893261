//! Observable events emitted by the engine and the persistence layer.

use std::fmt;

use super::logger::Severity;

/// Observable events in tabledb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Engine initialization begins
    DbOpen,
    /// Persisted catalog loaded
    CatalogLoaded,
    /// No backing file; starting empty
    CatalogMissing,
    /// Backing file exists but could not be read; starting empty
    CatalogUnreadable,
    /// Backing file could not be decoded; starting empty
    CatalogMalformed,
    /// Fresh empty catalog persisted during init
    CatalogInitialized,

    // Persistence
    /// Full catalog written
    CatalogSaved,
    /// Full catalog write failed
    CatalogSaveFailed,

    // Mutations
    /// Table created
    TableCreated,
    /// Record inserted
    RecordInserted,
    /// Record updated
    RecordUpdated,
    /// Record deleted
    RecordDeleted,
    /// Mutation rejected before touching the catalog
    WriteRejected,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DbOpen => "DB_OPEN",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CatalogMissing => "CATALOG_MISSING",
            Event::CatalogUnreadable => "CATALOG_UNREADABLE",
            Event::CatalogMalformed => "CATALOG_MALFORMED",
            Event::CatalogInitialized => "CATALOG_INITIALIZED",
            Event::CatalogSaved => "CATALOG_SAVED",
            Event::CatalogSaveFailed => "CATALOG_SAVE_FAILED",
            Event::TableCreated => "TABLE_CREATED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::WriteRejected => "WRITE_REJECTED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CatalogUnreadable | Event::CatalogMalformed => Severity::Warn,
            Event::CatalogSaveFailed => Severity::Error,
            Event::CatalogSaved
            | Event::RecordInserted
            | Event::RecordUpdated
            | Event::RecordDeleted
            | Event::WriteRejected => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::DbOpen,
            Event::CatalogLoaded,
            Event::CatalogMissing,
            Event::CatalogUnreadable,
            Event::CatalogMalformed,
            Event::CatalogInitialized,
            Event::CatalogSaved,
            Event::CatalogSaveFailed,
            Event::TableCreated,
            Event::RecordInserted,
            Event::RecordUpdated,
            Event::RecordDeleted,
            Event::WriteRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_load_faults_are_warnings() {
        assert_eq!(Event::CatalogUnreadable.severity(), Severity::Warn);
        assert_eq!(Event::CatalogMalformed.severity(), Severity::Warn);
        assert_eq!(Event::CatalogMissing.severity(), Severity::Info);
        assert_eq!(Event::CatalogSaveFailed.severity(), Severity::Error);
    }
}
