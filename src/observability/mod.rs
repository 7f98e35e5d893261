//! Observability subsystem for tabledb
//!
//! Structured JSON-lines logging of lifecycle, persistence and mutation events.
//! Observability is read-only: it never changes the outcome of an operation.
//!
//! ```ignore
//! use tabledb::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TableCreated, &[("table", "users")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        // Never panics, whatever the threshold
        log_event_with_fields(Event::TableCreated, &[("table", "users")]);
        log_event_with_fields(Event::CatalogSaveFailed, &[]);
    }
}
