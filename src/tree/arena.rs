//! Node storage.
//!
//! Nodes live in slots owned by the tree; parent and child links are
//! handles, so the structure stays a tree without reference cycles.

use std::sync::Arc;

use crate::schema::SchemaNode;

use super::ids::NodeId;
use super::value::LeafValue;

/// One container or list-entry instance.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) schema: Arc<SchemaNode>,
    /// Non-owning link used for path composition.
    pub(crate) parent: Option<NodeId>,
    /// Parallel to `schema.leaves()`; `None` is unset.
    pub(crate) leaves: Vec<Option<LeafValue>>,
    /// Parallel to `schema.containers()`.
    pub(crate) containers: Vec<NodeId>,
    /// Parallel to `schema.lists()`.
    pub(crate) lists: Vec<Vec<NodeId>>,
}

impl Node {
    pub(crate) fn new(schema: Arc<SchemaNode>, parent: Option<NodeId>) -> Self {
        Self {
            leaves: vec![None; schema.leaves().len()],
            containers: Vec::with_capacity(schema.containers().len()),
            lists: vec![Vec::new(); schema.lists().len()],
            schema,
            parent,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Generational slot arena.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Frees the slot; the handle and any copies of it go stale.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }

        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        self.live -= 1;
        Some(node)
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
