//! Schema Registry Tests
//!
//! - Descriptors load from a directory in name order
//! - Invalid descriptors are rejected before any tree can use them
//! - Registered revisions are immutable
//! - Trees built from the registry follow the compiled schema

use std::fs;

use serde_json::json;
use tempfile::TempDir;
use yangtree::schema::{LeafDef, LeafKind, ModuleDef, NodeDef, SchemaErrorCode, SchemaRegistry};
use yangtree::tree::{LeafValue, TreeErrorCode};

// =============================================================================
// Helper Functions
// =============================================================================

fn hsrp_descriptor() -> serde_json::Value {
    json!({
        "module": "CISCO-HSRP-EXT-MIB",
        "prefix": "cisco-hsrp-ext",
        "revision": "2010-09-02",
        "description": "Extensions to the HSRP protocol",
        "root": {
            "name": "CISCO-HSRP-EXT-MIB",
            "containers": [
                {
                    "name": "cHsrpExtIfTrackedTable",
                    "lists": [{
                        "name": "cHsrpExtIfTrackedEntry",
                        "keys": ["ifIndex", "cHsrpGrpNumber", "cHsrpExtIfTracked"],
                        "leaves": [
                            { "name": "ifIndex", "type": "int32", "range": "1..2147483647" },
                            { "name": "cHsrpGrpNumber", "type": "uint32", "range": "0..255" },
                            { "name": "cHsrpExtIfTracked", "type": "int32", "range": "1..2147483647" },
                            { "name": "cHsrpExtIfTrackedPriority", "type": "uint32", "range": "0..255" },
                            { "name": "cHsrpExtIfTrackedRowStatus", "type": "enumeration",
                              "enums": [
                                  { "name": "active", "value": 1 },
                                  { "name": "notInService", "value": 2 },
                                  { "name": "notReady", "value": 3 },
                                  { "name": "createAndGo", "value": 4 },
                                  { "name": "createAndWait", "value": 5 },
                                  { "name": "destroy", "value": 6 }
                              ] }
                        ]
                    }]
                },
                {
                    "name": "cHsrpExtIfTable",
                    "lists": [{
                        "name": "cHsrpExtIfEntry",
                        "keys": ["ifIndex"],
                        "leaves": [
                            { "name": "ifIndex", "type": "int32", "range": "1..2147483647" },
                            { "name": "cHsrpExtIfUseBIA", "type": "boolean" }
                        ]
                    }]
                }
            ]
        }
    })
}

fn write_descriptor(dir: &TempDir, file: &str, value: &serde_json::Value) {
    fs::write(dir.path().join(file), value.to_string()).unwrap();
}

fn loaded_registry() -> (TempDir, SchemaRegistry) {
    let tmp = TempDir::new().unwrap();
    write_descriptor(&tmp, "hsrp.json", &hsrp_descriptor());

    let mut registry = SchemaRegistry::new(tmp.path());
    assert_eq!(registry.load_all().unwrap(), 1);
    (tmp, registry)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_from_directory() {
    let (_tmp, registry) = loaded_registry();

    assert!(registry.exists("CISCO-HSRP-EXT-MIB"));
    let schema = registry.get("CISCO-HSRP-EXT-MIB").unwrap();
    assert_eq!(schema.revision(), "2010-09-02");
    assert_eq!(schema.description(), Some("Extensions to the HSRP protocol"));
    assert_eq!(schema.node_count(), 5);
}

#[test]
fn test_non_json_files_ignored() {
    let tmp = TempDir::new().unwrap();
    write_descriptor(&tmp, "hsrp.json", &hsrp_descriptor());
    fs::write(tmp.path().join("README.txt"), "not a descriptor").unwrap();

    let mut registry = SchemaRegistry::new(tmp.path());
    assert_eq!(registry.load_all().unwrap(), 1);
}

#[test]
fn test_malformed_descriptor_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ \"module\": ").unwrap();

    let mut registry = SchemaRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtSchemaMalformed);
    assert!(err.is_fatal());
}

/// A failed load registers nothing, and the same registry loads cleanly
/// once the bad descriptor is fixed.
#[test]
fn test_failed_load_leaves_registry_empty() {
    let tmp = TempDir::new().unwrap();
    write_descriptor(&tmp, "a-hsrp.json", &hsrp_descriptor());
    fs::write(tmp.path().join("b-if.json"), "{ \"module\": ").unwrap();

    let mut registry = SchemaRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtSchemaMalformed);
    assert!(registry.is_empty());
    assert!(!registry.exists("CISCO-HSRP-EXT-MIB"));

    let if_mib = json!({
        "module": "IF-MIB",
        "prefix": "if-mib",
        "revision": "2000-06-14",
        "root": { "name": "IF-MIB" }
    });
    write_descriptor(&tmp, "b-if.json", &if_mib);

    assert_eq!(registry.load_all().unwrap(), 2);
    assert!(registry.exists("CISCO-HSRP-EXT-MIB"));
    assert!(registry.exists("IF-MIB"));
}

#[test]
fn test_duplicate_module_across_files_rejected() {
    let tmp = TempDir::new().unwrap();
    write_descriptor(&tmp, "hsrp-1.json", &hsrp_descriptor());
    write_descriptor(&tmp, "hsrp-2.json", &hsrp_descriptor());

    let mut registry = SchemaRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtSchemaImmutable);
    assert!(registry.is_empty());
}

#[test]
fn test_undeclared_key_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut descriptor = hsrp_descriptor();
    descriptor["root"]["containers"][1]["lists"][0]["keys"] = json!(["ifDescr"]);
    write_descriptor(&tmp, "hsrp.json", &descriptor);

    let mut registry = SchemaRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtSchemaInvalid);
    assert!(registry.is_empty());
}

#[test]
fn test_invalid_range_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut descriptor = hsrp_descriptor();
    descriptor["root"]["containers"][0]["lists"][0]["leaves"][1]["range"] = json!("0..300x");
    write_descriptor(&tmp, "hsrp.json", &descriptor);

    let mut registry = SchemaRegistry::new(tmp.path());
    assert_eq!(
        registry.load_all().unwrap_err().code(),
        SchemaErrorCode::YtSchemaInvalid
    );
}

// =============================================================================
// Immutability
// =============================================================================

#[test]
fn test_registered_revision_is_immutable() {
    let (_tmp, mut registry) = loaded_registry();

    let def = ModuleDef::new(
        "CISCO-HSRP-EXT-MIB",
        "cisco-hsrp-ext",
        "2010-09-02",
        NodeDef::container("CISCO-HSRP-EXT-MIB"),
    );
    let err = registry.register(&def).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtSchemaImmutable);

    // the loaded schema is untouched
    assert_eq!(registry.get("CISCO-HSRP-EXT-MIB").unwrap().node_count(), 5);
}

#[test]
fn test_save_then_reload() {
    let tmp = TempDir::new().unwrap();
    let entry = NodeDef::entry("ifEntry", ["ifIndex"])
        .with_leaf(LeafDef::new("ifIndex", LeafKind::Int32).with_range("1..2147483647"))
        .with_leaf(LeafDef::new("ifDescr", LeafKind::String).with_length("0..255"));
    let def = ModuleDef::new(
        "IF-MIB",
        "if-mib",
        "2000-06-14",
        NodeDef::container("IF-MIB").with_container(NodeDef::container("ifTable").with_list(entry)),
    );

    let mut registry = SchemaRegistry::new(tmp.path());
    let path = registry.save(&def).unwrap();
    assert!(path.ends_with("IF-MIB@2000-06-14.json"));

    registry.register(&def).unwrap();
    let mut reloaded = SchemaRegistry::new(tmp.path());
    reloaded.load_all().unwrap();
    assert_eq!(
        reloaded.get("IF-MIB").unwrap(),
        registry.get("IF-MIB").unwrap()
    );
}

// =============================================================================
// Trees From The Registry
// =============================================================================

#[test]
fn test_instantiate_compound_key_table() {
    let (_tmp, registry) = loaded_registry();
    let mut tree = registry.instantiate("CISCO-HSRP-EXT-MIB").unwrap();
    let root = tree.root();

    let entry = tree.add_entry(root, "cHsrpExtIfTrackedTable").unwrap();
    tree.set_leaf(entry, "ifIndex", 3).unwrap();
    tree.set_leaf(entry, "cHsrpGrpNumber", 1u32).unwrap();
    tree.set_leaf(entry, "cHsrpExtIfTracked", 7).unwrap();
    tree.set_leaf(entry, "cHsrpExtIfTrackedRowStatus", "createAndGo").unwrap();

    assert_eq!(
        tree.structural_path(entry).unwrap(),
        "CISCO-HSRP-EXT-MIB:CISCO-HSRP-EXT-MIB/cHsrpExtIfTrackedTable/\
         cHsrpExtIfTrackedEntry[ifIndex='3'][cHsrpGrpNumber='1'][cHsrpExtIfTracked='7']"
    );

    let keys = [LeafValue::from(3), LeafValue::from(1u32), LeafValue::from(7)];
    assert_eq!(
        tree.find_entry(root, "cHsrpExtIfTrackedTable", &keys).unwrap(),
        Some(entry)
    );

    let err = tree.set_leaf(entry, "cHsrpExtIfTrackedPriority", 256u32).unwrap_err();
    assert_eq!(err.code(), TreeErrorCode::YtRangeViolation);
}

#[test]
fn test_instantiate_unknown_module() {
    let (_tmp, registry) = loaded_registry();
    let err = registry.instantiate("IF-MIB").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::YtUnknownModule);
}

#[test]
fn test_trees_are_independent() {
    let (_tmp, registry) = loaded_registry();
    let mut a = registry.instantiate("CISCO-HSRP-EXT-MIB").unwrap();
    let b = registry.instantiate("CISCO-HSRP-EXT-MIB").unwrap();

    let root = a.root();
    let entry = a.add_entry(root, "cHsrpExtIfTable").unwrap();
    a.set_leaf(entry, "cHsrpExtIfUseBIA", true).unwrap();

    assert!(a.has_data(a.root()));
    assert!(!b.has_data(b.root()));
}
