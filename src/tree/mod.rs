//! Schema entity tree
//!
//! A `DataTree` is one instance of a module's data: a root container, the
//! containers the schema declares (created eagerly, always present), list
//! entries created and removed by the caller, and typed leaves on all of
//! them. Nodes are addressed by [`NodeId`] handles.
//!
//! # Invariants
//!
//! - Every node except the root has exactly one owner, recorded as its parent
//! - Container children are fixed by the schema; list entries vary 0..N
//! - Leaf values are checked against their declared type and constraints on
//!   every assignment; a rejected assignment changes nothing
//! - A list entry is addressable only once all of its key leaves are set
//!
//! The tree performs no I/O and no locking. A host sharing a tree across
//! threads serializes access itself.

mod arena;
mod errors;
mod ids;
mod path;
mod validate;
mod value;

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Schema, SchemaNode};

use arena::{Arena, Node};

pub use crate::schema::NodeRole;
pub use errors::{TreeError, TreeErrorCode, TreeResult};
pub use ids::NodeId;
pub use value::{Decimal64, LeafValue, ParseDecimalError};

/// In-memory data tree for one module
#[derive(Debug, Clone)]
pub struct DataTree {
    schema: Arc<Schema>,
    arena: Arena,
    root: NodeId,
}

impl DataTree {
    /// Creates a tree holding the module's root container and every
    /// container below it, all without data.
    pub fn new(schema: Arc<Schema>) -> Self {
        let mut arena = Arena::new();
        let root = build_node(&mut arena, Arc::clone(schema.root()), None);

        let nodes = arena.len().to_string();
        log_event_with_fields(
            Event::TreeCreated,
            &[("module", schema.module()), ("nodes", nodes.as_str())],
        );

        Self {
            schema,
            arena,
            root,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// True while `id` refers to a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some()
    }

    fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.arena.get(id).ok_or_else(|| TreeError::stale_handle(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.arena
            .get_mut(id)
            .ok_or_else(|| TreeError::stale_handle(id))
    }

    /// Schema name of the node
    pub fn name(&self, id: NodeId) -> TreeResult<&str> {
        Ok(self.node(id)?.schema.name())
    }

    pub fn role(&self, id: NodeId) -> TreeResult<NodeRole> {
        Ok(self.node(id)?.schema.role())
    }

    /// The owning node; `None` for the root
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn schema_node(&self, id: NodeId) -> TreeResult<&Arc<SchemaNode>> {
        Ok(&self.node(id)?.schema)
    }

    /// Key leaf names in declaration order; empty for containers
    pub fn key_names(&self, id: NodeId) -> TreeResult<Vec<&str>> {
        Ok(self.node(id)?.schema.key_names().collect())
    }

    pub fn is_presence(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.schema.is_presence())
    }

    /// Whether the node holds configuration (as opposed to operational state)
    pub fn is_config(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.schema.is_config())
    }

    /// Handle of the named child container
    pub fn container(&self, id: NodeId, name: &str) -> TreeResult<NodeId> {
        let node = self.node(id)?;
        node.schema
            .container_index(name)
            .map(|index| node.containers[index])
            .ok_or_else(|| TreeError::unknown_child(node.schema.name(), name))
    }

    /// Entries of the named list, in insertion order
    pub fn entries(&self, id: NodeId, list_name: &str) -> TreeResult<&[NodeId]> {
        let (owner, index) = self.resolve_list(id, list_name)?;
        Ok(&self.node(owner)?.lists[index])
    }

    /// Child containers, then list entries, in schema declaration order
    pub fn children(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let node = self.node(id)?;
        Ok(node
            .containers
            .iter()
            .chain(node.lists.iter().flatten())
            .copied()
            .collect())
    }

    /// Every leaf with its current value, in declaration order
    pub fn leaves(
        &self,
        id: NodeId,
    ) -> TreeResult<impl Iterator<Item = (&str, Option<&LeafValue>)> + '_> {
        let node = self.node(id)?;
        Ok(node
            .schema
            .leaves()
            .iter()
            .zip(node.leaves.iter())
            .map(|(spec, value)| (spec.name(), value.as_ref())))
    }

    /// Assigns a leaf after checking it against the declared type and
    /// constraints. On error the previous value is kept.
    pub fn set_leaf(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<LeafValue>,
    ) -> TreeResult<()> {
        let schema = Arc::clone(&self.node(id)?.schema);
        let index = schema
            .leaf_index(name)
            .ok_or_else(|| TreeError::unknown_leaf(schema.name(), name))?;

        let admitted = value::admit(schema.name(), schema.leaf(index), value.into())
            .map_err(|e| {
                log_event_with_fields(
                    Event::LeafRejected,
                    &[
                        ("code", e.code().code()),
                        ("leaf", name),
                        ("node", schema.name()),
                    ],
                );
                e
            })?;

        self.node_mut(id)?.leaves[index] = Some(admitted);
        Ok(())
    }

    /// Current value of a leaf; `None` when unset
    pub fn get_leaf(&self, id: NodeId, name: &str) -> TreeResult<Option<&LeafValue>> {
        let node = self.node(id)?;
        let index = node
            .schema
            .leaf_index(name)
            .ok_or_else(|| TreeError::unknown_leaf(node.schema.name(), name))?;
        Ok(node.leaves[index].as_ref())
    }

    /// Clears a leaf, returning its previous value
    pub fn unset_leaf(&mut self, id: NodeId, name: &str) -> TreeResult<Option<LeafValue>> {
        let node = self.node_mut(id)?;
        let index = node
            .schema
            .leaf_index(name)
            .ok_or_else(|| TreeError::unknown_leaf(node.schema.name(), name))?;
        Ok(node.leaves[index].take())
    }

    /// True if the node is a presence container, has a leaf set, or has a
    /// descendant that does. Stale handles have no data.
    pub fn has_data(&self, id: NodeId) -> bool {
        let Some(node) = self.arena.get(id) else {
            return false;
        };

        node.schema.is_presence()
            || node.leaves.iter().any(Option::is_some)
            || node.containers.iter().any(|&child| self.has_data(child))
            || node
                .lists
                .iter()
                .flatten()
                .any(|&entry| self.has_data(entry))
    }

    /// Appends a new entry with all leaves unset to the named list.
    ///
    /// `list_name` names a list of `id`, or a child container of `id` that
    /// declares exactly one list (a MIB table and its row list).
    pub fn add_entry(&mut self, id: NodeId, list_name: &str) -> TreeResult<NodeId> {
        let (owner, index) = self.resolve_list(id, list_name)?;
        let entry_schema = Arc::clone(&self.node(owner)?.schema.lists()[index]);

        let entry = build_node(&mut self.arena, Arc::clone(&entry_schema), Some(owner));
        self.node_mut(owner)?.lists[index].push(entry);

        log_event_with_fields(
            Event::EntryAdded,
            &[("list", entry_schema.name()), ("node", list_name)],
        );
        Ok(entry)
    }

    /// Removes `entry` (matched by identity) and its whole subtree.
    ///
    /// Returns false, changing nothing, if the entry is not in the list.
    pub fn remove_entry(&mut self, id: NodeId, list_name: &str, entry: NodeId) -> TreeResult<bool> {
        let (owner, index) = self.resolve_list(id, list_name)?;
        let rows = &mut self.node_mut(owner)?.lists[index];

        let Some(position) = rows.iter().position(|&row| row == entry) else {
            return Ok(false);
        };
        rows.remove(position);
        self.free_subtree(entry);

        log_event_with_fields(Event::EntryRemoved, &[("node", list_name)]);
        Ok(true)
    }

    /// First entry whose key leaves equal `keys`, given in key declaration
    /// order. Keys are checked and normalized the way assignments are.
    pub fn find_entry(
        &self,
        id: NodeId,
        list_name: &str,
        keys: &[LeafValue],
    ) -> TreeResult<Option<NodeId>> {
        let (owner, index) = self.resolve_list(id, list_name)?;
        let node = self.node(owner)?;
        let entry_schema = &node.schema.lists()[index];

        if keys.len() != entry_schema.keys().len() {
            return Err(TreeError::validation(
                entry_schema.name(),
                format!(
                    "'{}' is keyed by {} leaves, {} values given",
                    entry_schema.name(),
                    entry_schema.keys().len(),
                    keys.len()
                ),
            ));
        }

        let wanted = entry_schema
            .keys()
            .iter()
            .zip(keys)
            .map(|(&k, v)| value::admit(entry_schema.name(), entry_schema.leaf(k), v.clone()))
            .collect::<TreeResult<Vec<_>>>()?;

        for &row in &node.lists[index] {
            let Some(entry) = self.arena.get(row) else {
                continue;
            };
            let matches = entry_schema
                .keys()
                .iter()
                .zip(&wanted)
                .all(|(&k, want)| entry.leaves[k].as_ref() == Some(want));
            if matches {
                return Ok(Some(row));
            }
        }

        Ok(None)
    }

    /// Finds the node owning the named list and the list's index there.
    fn resolve_list(&self, id: NodeId, name: &str) -> TreeResult<(NodeId, usize)> {
        let node = self.node(id)?;

        if let Some(index) = node.schema.list_index(name) {
            return Ok((id, index));
        }

        if let Some(index) = node.schema.container_index(name) {
            if node.schema.containers()[index].lists().len() == 1 {
                return Ok((node.containers[index], 0));
            }
        }

        Err(TreeError::unknown_child(node.schema.name(), name))
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.arena.remove(id) else {
            return;
        };
        for child in node.containers.into_iter().chain(node.lists.into_iter().flatten()) {
            self.free_subtree(child);
        }
    }
}

/// Inserts a node and, recursively, its schema-declared containers.
fn build_node(arena: &mut Arena, schema: Arc<SchemaNode>, parent: Option<NodeId>) -> NodeId {
    let id = arena.insert(Node::new(Arc::clone(&schema), parent));

    let containers: Vec<NodeId> = schema
        .containers()
        .iter()
        .map(|child| build_node(arena, Arc::clone(child), Some(id)))
        .collect();

    if let Some(node) = arena.get_mut(id) {
        node.containers = containers;
    }
    id
}
