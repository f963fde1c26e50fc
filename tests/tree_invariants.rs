//! Data Tree Invariant Tests
//!
//! - Paths are deterministic and depend only on keys and ancestry
//! - `has_data` tracks leaves, presence and descendants
//! - add / find / remove agree with each other
//! - Rejected assignments change nothing
//! - Unset keys block path computation without side effects

use std::sync::Arc;

use yangtree::schema::{LeafDef, LeafKind, ModuleDef, NodeDef, Schema};
use yangtree::tree::{DataTree, LeafValue, NodeId, TreeErrorCode};

// =============================================================================
// Helper Functions
// =============================================================================

const ROOT: &str = "Cisco-IOS-XR-sysadmin-entity-state-mib:ENTITY-STATE-MIB";

fn entity_state_schema() -> Arc<Schema> {
    let entry = NodeDef::entry("entStateEntry", ["entPhysicalIndex"])
        .with_leaf(LeafDef::new("entPhysicalIndex", LeafKind::Int32).with_range("1..2147483647"))
        .with_leaf(LeafDef::enumeration(
            "entStateAdmin",
            ["notSupported", "locked", "shuttingDown", "unlocked"],
        ))
        .with_leaf(LeafDef::enumeration(
            "entStateOper",
            ["notSupported", "disabled", "enabled", "testing"],
        ))
        .with_leaf(LeafDef::bits("entStateAlarm", ["unknown", "underRepair", "critical", "major"]))
        .with_leaf(LeafDef::new("entStateLastChanged", LeafKind::String).with_length("0..64"));

    let root = NodeDef::container("ENTITY-STATE-MIB")
        .with_container(NodeDef::container("entStateTable").state().with_list(entry));

    let def = ModuleDef::new(
        "Cisco-IOS-XR-sysadmin-entity-state-mib",
        "ENTITY_STATE_MIB",
        "2017-04-12",
        root,
    );
    Arc::new(Schema::compile(&def).unwrap())
}

fn new_tree() -> DataTree {
    DataTree::new(entity_state_schema())
}

fn add_physical(tree: &mut DataTree, index: i32) -> NodeId {
    let root = tree.root();
    let entry = tree.add_entry(root, "entStateTable").unwrap();
    tree.set_leaf(entry, "entPhysicalIndex", index).unwrap();
    entry
}

// =============================================================================
// Worked Example
// =============================================================================

#[test]
fn test_entity_state_table_example() {
    let mut tree = new_tree();
    let root = tree.root();

    let entry = tree.add_entry(root, "entStateTable").unwrap();
    tree.set_leaf(entry, "entPhysicalIndex", 12).unwrap();
    tree.set_leaf(entry, "entStateAdmin", "unlocked").unwrap();

    assert_eq!(
        tree.structural_path(entry).unwrap(),
        format!("{}/entStateTable/entStateEntry[entPhysicalIndex='12']", ROOT)
    );
    assert!(tree.has_data(entry));
    assert_eq!(
        tree.get_leaf(entry, "entStateAdmin").unwrap(),
        Some(&LeafValue::enumeration("unlocked"))
    );

    assert_eq!(
        tree.find_entry(root, "entStateTable", &[LeafValue::from(12)]).unwrap(),
        Some(entry)
    );
    assert_eq!(
        tree.find_entry(root, "entStateTable", &[LeafValue::from(99)]).unwrap(),
        None
    );
}

// =============================================================================
// Path Determinism
// =============================================================================

/// Non-key leaf assignment order never affects the path.
#[test]
fn test_path_independent_of_non_key_order() {
    let mut a = new_tree();
    let ea = add_physical(&mut a, 7);
    a.set_leaf(ea, "entStateAdmin", "locked").unwrap();
    a.set_leaf(ea, "entStateOper", "enabled").unwrap();
    a.set_leaf(ea, "entStateAlarm", LeafValue::bits(["major", "critical"])).unwrap();

    let mut b = new_tree();
    let eb = add_physical(&mut b, 7);
    b.set_leaf(eb, "entStateAlarm", LeafValue::bits(["critical", "major"])).unwrap();
    b.set_leaf(eb, "entStateOper", "enabled").unwrap();
    b.set_leaf(eb, "entStateAdmin", "locked").unwrap();

    let path = a.structural_path(ea).unwrap();
    assert_eq!(path, b.structural_path(eb).unwrap());
    for _ in 0..10 {
        assert_eq!(a.structural_path(ea).unwrap(), path);
    }

    // bits are normalized to declaration order
    assert_eq!(
        a.get_leaf(ea, "entStateAlarm").unwrap(),
        b.get_leaf(eb, "entStateAlarm").unwrap()
    );
}

#[test]
fn test_container_paths() {
    let tree = new_tree();
    let root = tree.root();
    let table = tree.container(root, "entStateTable").unwrap();

    assert_eq!(tree.structural_path(root).unwrap(), ROOT);
    assert_eq!(
        tree.structural_path(table).unwrap(),
        format!("{}/entStateTable", ROOT)
    );
}

// =============================================================================
// has_data
// =============================================================================

#[test]
fn test_has_data_lifecycle() {
    let mut tree = new_tree();
    let root = tree.root();
    assert!(!tree.has_data(root));

    let entry = tree.add_entry(root, "entStateTable").unwrap();
    assert!(!tree.has_data(entry));
    assert!(!tree.has_data(root));

    tree.set_leaf(entry, "entStateOper", "enabled").unwrap();
    assert!(tree.has_data(entry));
    assert!(tree.has_data(root));

    tree.unset_leaf(entry, "entStateOper").unwrap();
    assert!(!tree.has_data(entry));
    assert!(!tree.has_data(root));
}

// =============================================================================
// add / find / remove
// =============================================================================

#[test]
fn test_add_find_remove_agree() {
    let mut tree = new_tree();
    let root = tree.root();
    let keep = add_physical(&mut tree, 1);
    let entry = add_physical(&mut tree, 2);

    let key = [LeafValue::from(2)];
    assert_eq!(tree.find_entry(root, "entStateTable", &key).unwrap(), Some(entry));

    assert!(tree.remove_entry(root, "entStateTable", entry).unwrap());
    assert_eq!(tree.find_entry(root, "entStateTable", &key).unwrap(), None);
    assert_eq!(tree.entries(root, "entStateTable").unwrap(), &[keep]);
}

#[test]
fn test_find_rejects_out_of_range_key() {
    let tree = new_tree();
    let err = tree
        .find_entry(tree.root(), "entStateTable", &[LeafValue::from(0)])
        .unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);
}

#[test]
fn test_entries_keep_insertion_order() {
    let mut tree = new_tree();
    let ids: Vec<NodeId> = [30, 10, 20].iter().map(|&i| add_physical(&mut tree, i)).collect();
    assert_eq!(tree.entries(tree.root(), "entStateTable").unwrap(), ids.as_slice());
}

// =============================================================================
// Constraint Enforcement
// =============================================================================

#[test]
fn test_out_of_range_leaves_value_unchanged() {
    let mut tree = new_tree();
    let root = tree.root();
    let entry = tree.add_entry(root, "entStateTable").unwrap();

    // unset stays unset
    let err = tree
        .set_leaf(entry, "entPhysicalIndex", 3_000_000_000u32)
        .unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);
    assert_eq!(tree.get_leaf(entry, "entPhysicalIndex").unwrap(), None);

    // set stays at its previous value
    tree.set_leaf(entry, "entPhysicalIndex", 5).unwrap();
    let err = tree
        .set_leaf(entry, "entPhysicalIndex", 3_000_000_000i64)
        .unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);
    assert_eq!(
        tree.get_leaf(entry, "entPhysicalIndex").unwrap(),
        Some(&LeafValue::Integer(5))
    );
}

#[test]
fn test_type_and_member_checks() {
    let mut tree = new_tree();
    let entry = add_physical(&mut tree, 3);

    let err = tree.set_leaf(entry, "entPhysicalIndex", "three").unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtTypeMismatch);

    let err = tree.set_leaf(entry, "entStateAdmin", "broken").unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);

    let err = tree
        .set_leaf(entry, "entStateAlarm", LeafValue::bits(["minor"]))
        .unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);

    let err = tree
        .set_leaf(entry, "entStateLastChanged", "x".repeat(65))
        .unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);
}

// =============================================================================
// Unset Keys
// =============================================================================

#[test]
fn test_unset_key_blocks_path_without_mutation() {
    let mut tree = new_tree();
    let root = tree.root();
    let entry = tree.add_entry(root, "entStateTable").unwrap();
    tree.set_leaf(entry, "entStateOper", "testing").unwrap();
    let before = tree.clone();

    let err = tree.structural_path(entry).unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtValidationFailed);
    assert_eq!(err.leaf(), Some("entPhysicalIndex"));

    assert_eq!(tree.node_count(), before.node_count());
    let after: Vec<_> = tree.leaves(entry).unwrap().map(|(n, v)| (n, v.cloned())).collect();
    let was: Vec<_> = before.leaves(entry).unwrap().map(|(n, v)| (n, v.cloned())).collect();
    assert_eq!(after, was);

    assert_eq!(tree.validate().unwrap_err().code(), TreeErrorCode::YtValidationFailed);
}

// =============================================================================
// Config / State
// =============================================================================

#[test]
fn test_state_flag_inherited_by_entries() {
    let mut tree = new_tree();
    let root = tree.root();
    let entry = add_physical(&mut tree, 4);

    assert!(tree.is_config(root).unwrap());
    assert!(!tree.is_config(entry).unwrap());
}
