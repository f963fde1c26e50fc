//! Whole-tree validation
//!
//! Assignments are checked one at a time, so a tree is always well typed.
//! What a single assignment cannot see is checked here: every list entry
//! has its keys set, and no two entries of a list share a key tuple.

use std::collections::HashSet;

use super::{DataTree, LeafValue, NodeId, TreeError, TreeResult};

impl DataTree {
    /// Validates the subtree rooted at the tree root.
    pub fn validate(&self) -> TreeResult<()> {
        self.validate_node(self.root)
    }

    fn validate_node(&self, id: NodeId) -> TreeResult<()> {
        let node = self.node(id)?;

        for (list_schema, rows) in node.schema.lists().iter().zip(&node.lists) {
            let mut seen: HashSet<Vec<&LeafValue>> = HashSet::with_capacity(rows.len());

            for &row in rows {
                let entry = self.node(row)?;
                let mut tuple = Vec::with_capacity(list_schema.keys().len());
                for &key in list_schema.keys() {
                    let value = entry.leaves[key].as_ref().ok_or_else(|| {
                        TreeError::missing_key(list_schema.name(), list_schema.leaf(key).name())
                    })?;
                    tuple.push(value);
                }

                if !seen.insert(tuple) {
                    return Err(TreeError::validation(
                        list_schema.name(),
                        format!(
                            "Duplicate entry {} in list '{}'",
                            self.segment_path(row)?,
                            list_schema.name()
                        ),
                    ));
                }
            }
        }

        for child in node.containers.iter().chain(node.lists.iter().flatten()) {
            self.validate_node(*child)?;
        }
        Ok(())
    }
}
