//! Compiled schema: the immutable, validated form of a module descriptor
//!
//! Every data tree node points at the `SchemaNode` describing it. Schema
//! nodes are shared through `Arc`, so any number of trees can be built from
//! one registered module.

use std::sync::Arc;

use super::constraint::{Pattern, RangeSet};
use super::errors::SchemaResult;
use super::types::{EnumDef, LeafKind, ModuleDef};
use super::validator;

/// Role of a schema node, fixed when the schema is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Singleton node holding leaves and children
    Container,
    /// One row of a list, addressed by its key leaves
    ListEntry,
}

/// A compiled leaf: declared type plus parsed constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSpec {
    pub(crate) name: String,
    pub(crate) kind: LeafKind,
    pub(crate) range: Option<RangeSet>,
    pub(crate) length: Option<RangeSet>,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) enums: Vec<EnumDef>,
    pub(crate) bits: Vec<String>,
    pub(crate) fraction_digits: u8,
}

impl LeafSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    pub fn range(&self) -> Option<&RangeSet> {
        self.range.as_ref()
    }

    pub fn length(&self) -> Option<&RangeSet> {
        self.length.as_ref()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    pub fn bits(&self) -> &[String] {
        &self.bits
    }

    /// Fraction digits (0 for everything but decimal64)
    pub fn fraction_digits(&self) -> u8 {
        self.fraction_digits
    }
}

/// A compiled container or list-entry schema node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    pub(crate) name: String,
    pub(crate) role: NodeRole,
    pub(crate) presence: bool,
    pub(crate) config: bool,
    pub(crate) leaves: Vec<LeafSpec>,
    pub(crate) keys: Vec<usize>,
    pub(crate) containers: Vec<Arc<SchemaNode>>,
    pub(crate) lists: Vec<Arc<SchemaNode>>,
}

impl SchemaNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn is_presence(&self) -> bool {
        self.presence
    }

    /// Effective config flag; false for anything below a state node
    pub fn is_config(&self) -> bool {
        self.config
    }

    pub fn leaves(&self) -> &[LeafSpec] {
        &self.leaves
    }

    pub fn leaf(&self, index: usize) -> &LeafSpec {
        &self.leaves[index]
    }

    pub fn leaf_index(&self, name: &str) -> Option<usize> {
        self.leaves.iter().position(|l| l.name == name)
    }

    /// Indexes into `leaves()` of the key leaves, in key order
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(move |&k| self.leaves[k].name.as_str())
    }

    pub fn containers(&self) -> &[Arc<SchemaNode>] {
        &self.containers
    }

    pub fn container_index(&self, name: &str) -> Option<usize> {
        self.containers.iter().position(|c| c.name == name)
    }

    /// Entry schemas of the child lists
    pub fn lists(&self) -> &[Arc<SchemaNode>] {
        &self.lists
    }

    pub fn list_index(&self, name: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.name == name)
    }

    /// Number of schema nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self
            .containers
            .iter()
            .chain(self.lists.iter())
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Segment with key placeholders, e.g. `entStateEntry[entPhysicalIndex]`
    fn outline_segment(&self) -> String {
        let mut segment = self.name.clone();
        for key in self.key_names() {
            segment.push('[');
            segment.push_str(key);
            segment.push(']');
        }
        segment
    }

    fn collect_outline(&self, prefix: &str, out: &mut Vec<String>) {
        for child in self.containers.iter().chain(self.lists.iter()) {
            let path = format!("{}/{}", prefix, child.outline_segment());
            out.push(path.clone());
            child.collect_outline(&path, out);
        }
    }
}

/// A compiled, validated module schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub(crate) module: String,
    pub(crate) prefix: String,
    pub(crate) revision: String,
    pub(crate) description: Option<String>,
    pub(crate) root: Arc<SchemaNode>,
}

impl Schema {
    /// Validates a descriptor and compiles it
    pub fn compile(def: &ModuleDef) -> SchemaResult<Self> {
        validator::compile_module(def)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.root
    }

    /// Namespace-qualified top-level segment, e.g.
    /// `Cisco-IOS-XR-sysadmin-entity-state-mib:ENTITY-STATE-MIB`
    pub fn root_segment(&self) -> String {
        format!("{}:{}", self.module, self.root.name)
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Path of every schema node, depth first in declaration order, with key
    /// leaves shown as placeholders
    pub fn schema_paths(&self) -> Vec<String> {
        let root = self.root_segment();
        let mut out = vec![root.clone()];
        self.root.collect_outline(&root, &mut out);
        out
    }
}
