//! Schema subsystem for yangtree
//!
//! Module descriptors (YANG modules, SNMP MIBs) are data, not code. They are
//! loaded from JSON, validated and compiled once, then shared read-only by
//! every data tree built from them.
//!
//! # Design Principles
//!
//! - Descriptors are validated in full before registration
//! - Registered modules are immutable
//! - Lookup goes through an explicit `SchemaRegistry`, never global state
//! - Compilation is deterministic

mod constraint;
mod errors;
mod loader;
mod model;
mod types;
mod validator;

pub(crate) use constraint::parse_scaled;

pub use constraint::{Interval, Pattern, RangeSet};
pub use errors::{DefinitionDetails, SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaRegistry;
pub use model::{LeafSpec, NodeRole, Schema, SchemaNode};
pub use types::{EnumDef, LeafDef, LeafKind, ModuleDef, NodeDef};
