//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events with fixed severities
//! - Scopes for multi-step operations
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails or alters the operation being logged
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use yangtree::observability::{Logger, Severity, Event, log_event_with_fields};
//!
//! Logger::set_threshold(Severity::Trace);
//! log_event_with_fields(Event::TreeCreated, &[("module", "ENTITY-STATE-MIB")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

#[cfg(test)]
pub(crate) use logger::capture;

/// Log a lifecycle event with fields, at the event's own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::logger::capture::lines_of;
    use super::*;

    #[test]
    fn test_event_logged_at_its_severity() {
        let lines = lines_of(|| {
            log_event_with_fields(Event::SchemaRegistered, &[("module", "M"), ("revision", "2020-01-01")]);
            log_event_with_fields(Event::EntryAdded, &[("list", "entStateEntry")]);
        });

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "SCHEMA_REGISTERED");
        assert_eq!(lines[0]["severity"], "INFO");
        assert_eq!(lines[0]["revision"], "2020-01-01");
        assert_eq!(lines[1]["event"], "ENTRY_ADDED");
        assert_eq!(lines[1]["severity"], "TRACE");
    }
}
