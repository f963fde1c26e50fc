//! Observable events
//!
//! Events are explicit and typed. Each carries a fixed severity, so call
//! sites never pick one.

use std::fmt;

use super::logger::Severity;

/// Observable events of the registry, trees and CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// CLI configuration loaded
    ConfigLoaded,

    // Schema registry
    /// Descriptor compiled and registered
    SchemaRegistered,
    /// Descriptor rejected by compilation or immutability
    SchemaRejected,

    // Data trees
    /// Tree instantiated for a module
    TreeCreated,
    /// List entry appended
    EntryAdded,
    /// List entry and its subtree removed
    EntryRemoved,
    /// Leaf assignment rejected
    LeafRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaRejected => "SCHEMA_REJECTED",

            Event::TreeCreated => "TREE_CREATED",
            Event::EntryAdded => "ENTRY_ADDED",
            Event::EntryRemoved => "ENTRY_REMOVED",
            Event::LeafRejected => "LEAF_REJECTED",
        }
    }

    /// Severity the event is logged at
    ///
    /// Tree events fire once per caller operation and stay at TRACE.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SchemaRegistered => Severity::Info,
            Event::SchemaRejected => Severity::Warn,
            Event::TreeCreated | Event::EntryAdded | Event::EntryRemoved | Event::LeafRejected => {
                Severity::Trace
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
