//! Node handles.
//!
//! A handle pairs an arena slot index with the slot's generation. Freeing a
//! slot bumps its generation, so handles to removed nodes never alias a node
//! created later in the same slot.

use std::fmt;

/// Handle to a node of a [`DataTree`](super::DataTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}
