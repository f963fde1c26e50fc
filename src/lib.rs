//! yangtree - a schema-driven entity tree for YANG and SNMP MIB data models
//!
//! One generic node type, driven by schema descriptors held in an explicit
//! registry, stands in for the per-module generated binding classes:
//!
//! - `schema`: descriptors, compilation and the module registry
//! - `tree`: the data tree (containers, keyed list entries, typed leaves)
//! - `observability`: structured JSON logging
//! - `cli`: the `yangtree` command line front end

pub mod cli;
pub mod observability;
pub mod schema;
pub mod tree;
