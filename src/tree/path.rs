//! Structural paths
//!
//! A node's path is its ancestors' segments joined by `/`, root first:
//!
//! ```text
//! Cisco-IOS-XR-sysadmin-entity-state-mib:ENTITY-STATE-MIB/entStateTable/entStateEntry[entPhysicalIndex='12']
//! ```
//!
//! The root segment is `<module>:<root name>`. A container segment is its
//! name. A list entry segment carries one `[key='value']` predicate per key
//! leaf, in key declaration order. Values are single-quoted, double-quoted
//! when they contain `'`, and written as `concat(...)` when they contain both
//! quote characters.

use crate::schema::NodeRole;

use super::{DataTree, NodeId, TreeError, TreeResult};

impl DataTree {
    /// This node's own segment.
    pub fn segment_path(&self, id: NodeId) -> TreeResult<String> {
        let node = self.node(id)?;

        if node.parent.is_none() {
            return Ok(self.schema.root_segment());
        }

        let mut segment = node.schema.name().to_string();
        if node.schema.role() == NodeRole::ListEntry {
            for &key in node.schema.keys() {
                let name = node.schema.leaf(key).name();
                let value = node.leaves[key]
                    .as_ref()
                    .ok_or_else(|| TreeError::missing_key(node.schema.name(), name))?;
                push_predicate(&mut segment, name, &value.to_string());
            }
        }
        Ok(segment)
    }

    /// Full path from the root to this node.
    ///
    /// Fails with a validation error naming the first unset key met on the
    /// way up.
    pub fn structural_path(&self, id: NodeId) -> TreeResult<String> {
        let mut segments = vec![self.segment_path(id)?];
        let mut cursor = self.node(id)?.parent;

        while let Some(parent) = cursor {
            segments.push(self.segment_path(parent)?);
            cursor = self.node(parent)?.parent;
        }

        segments.reverse();
        Ok(segments.join("/"))
    }
}

/// Values holding a single quote are wrapped in double quotes instead. A
/// value holding both quote characters becomes an XPath `concat(...)` of
/// single-quoted runs and `"'"` literals.
fn push_predicate(segment: &mut String, key: &str, value: &str) {
    segment.push('[');
    segment.push_str(key);
    segment.push('=');

    match (value.contains('\''), value.contains('"')) {
        (false, _) => push_quoted(segment, value, '\''),
        (true, false) => push_quoted(segment, value, '"'),
        (true, true) => {
            let mut parts = Vec::new();
            for (i, run) in value.split('\'').enumerate() {
                if i > 0 {
                    parts.push("\"'\"".to_string());
                }
                if !run.is_empty() {
                    parts.push(format!("'{}'", run));
                }
            }
            segment.push_str("concat(");
            segment.push_str(&parts.join(", "));
            segment.push(')');
        }
    }
    segment.push(']');
}

fn push_quoted(segment: &mut String, value: &str, quote: char) {
    segment.push(quote);
    segment.push_str(value);
    segment.push(quote);
}
