//! Descriptor validation and compilation
//!
//! Structural rules enforced before a module can be registered:
//! - Names are non-empty identifiers, unique among a node's children
//! - Containers declare no keys; list entries declare at least one
//! - Every key names a declared, non-`empty` leaf, at most once
//! - Constraints only appear on leaf types they apply to
//! - Ranges parse, ascend, and fit the builtin value space
//! - Patterns compile
//! - Enumerations and bits are non-empty and free of duplicates
//! - decimal64 declares 1..=18 fraction digits
//!
//! Compilation is deterministic and never mutates the descriptor.

use std::collections::HashSet;
use std::sync::Arc;

use super::constraint::{Interval, Pattern, RangeSet};
use super::errors::{DefinitionDetails, SchemaError, SchemaResult};
use super::model::{LeafSpec, NodeRole, Schema, SchemaNode};
use super::types::{LeafDef, LeafKind, ModuleDef, NodeDef};

const STRING_LENGTH_BOUNDS: Interval = Interval {
    min: 0,
    max: u64::MAX as i128,
};

const DECIMAL64_BOUNDS: Interval = Interval {
    min: i64::MIN as i128,
    max: i64::MAX as i128,
};

/// Validates a module descriptor and compiles it into a [`Schema`].
pub(super) fn compile_module(def: &ModuleDef) -> SchemaResult<Schema> {
    if !is_identifier(&def.module) {
        return Err(invalid(
            &def.module,
            "<module>",
            "module name to be an identifier",
            format!("'{}'", def.module),
        ));
    }

    let root = compile_node(
        &def.module,
        &def.root,
        NodeRole::Container,
        true,
        &def.root.name,
    )?;

    Ok(Schema {
        module: def.module.clone(),
        prefix: def.prefix.clone(),
        revision: def.revision.clone(),
        description: def.description.clone(),
        root: Arc::new(root),
    })
}

fn compile_node(
    module: &str,
    def: &NodeDef,
    role: NodeRole,
    parent_config: bool,
    location: &str,
) -> SchemaResult<SchemaNode> {
    if !is_identifier(&def.name) {
        return Err(invalid(
            module,
            location,
            "node name to be an identifier",
            format!("'{}'", def.name),
        ));
    }

    match role {
        NodeRole::Container if !def.keys.is_empty() => {
            return Err(invalid(module, location, "no keys on a container", "keys declared"));
        }
        NodeRole::ListEntry if def.keys.is_empty() => {
            return Err(invalid(module, location, "at least one key on a list entry", "no keys"));
        }
        NodeRole::ListEntry if def.presence => {
            return Err(invalid(module, location, "presence only on containers", "presence on a list entry"));
        }
        _ => {}
    }

    let mut seen = HashSet::new();
    let child_names = def
        .leaves
        .iter()
        .map(|l| l.name.as_str())
        .chain(def.containers.iter().map(|c| c.name.as_str()))
        .chain(def.lists.iter().map(|l| l.name.as_str()));
    for name in child_names {
        if !seen.insert(name) {
            return Err(SchemaError::invalid(
                module,
                DefinitionDetails::duplicate_name(location, name),
            ));
        }
    }

    let leaves = def
        .leaves
        .iter()
        .map(|leaf| compile_leaf(module, leaf, location))
        .collect::<SchemaResult<Vec<_>>>()?;

    let mut keys = Vec::with_capacity(def.keys.len());
    for key in &def.keys {
        let index = leaves
            .iter()
            .position(|l| &l.name == key)
            .ok_or_else(|| SchemaError::invalid(module, DefinitionDetails::undeclared_key(location, key)))?;
        if keys.contains(&index) {
            return Err(SchemaError::invalid(
                module,
                DefinitionDetails::duplicate_name(location, key),
            ));
        }
        if leaves[index].kind == LeafKind::Empty {
            return Err(invalid(module, location, "a key leaf with a value", format!("empty-typed key '{}'", key)));
        }
        keys.push(index);
    }

    let config = parent_config && def.config;

    let containers = def
        .containers
        .iter()
        .map(|c| {
            let at = format!("{}/{}", location, c.name);
            compile_node(module, c, NodeRole::Container, config, &at).map(Arc::new)
        })
        .collect::<SchemaResult<Vec<_>>>()?;

    let lists = def
        .lists
        .iter()
        .map(|l| {
            let at = format!("{}/{}", location, l.name);
            compile_node(module, l, NodeRole::ListEntry, config, &at).map(Arc::new)
        })
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(SchemaNode {
        name: def.name.clone(),
        role,
        presence: def.presence,
        config,
        leaves,
        keys,
        containers,
        lists,
    })
}

fn compile_leaf(module: &str, def: &LeafDef, location: &str) -> SchemaResult<LeafSpec> {
    let at = format!("{}.{}", location, def.name);

    if !is_identifier(&def.name) {
        return Err(invalid(module, &at, "leaf name to be an identifier", format!("'{}'", def.name)));
    }

    let kind = def.kind;
    let type_name = kind.type_name();
    let reject = |what: &str| invalid(module, &at, format!("no {} on a {} leaf", what, type_name), format!("{} declared", what));

    let is_decimal = kind == LeafKind::Decimal64;
    if def.range.is_some() && !(kind.is_integer() || is_decimal) {
        return Err(reject("range"));
    }
    if def.length.is_some() && kind != LeafKind::String {
        return Err(reject("length"));
    }
    if def.pattern.is_some() && kind != LeafKind::String {
        return Err(reject("pattern"));
    }
    if !def.enums.is_empty() && kind != LeafKind::Enumeration {
        return Err(reject("enums"));
    }
    if !def.bits.is_empty() && kind != LeafKind::Bits {
        return Err(reject("bits"));
    }
    if def.fraction_digits.is_some() && !is_decimal {
        return Err(reject("fraction_digits"));
    }

    let fraction_digits = match (is_decimal, def.fraction_digits) {
        (true, Some(fd)) if (1..=18).contains(&fd) => fd,
        (true, other) => {
            return Err(invalid(
                module,
                &at,
                "fraction_digits in 1..=18",
                format!("{:?}", other),
            ))
        }
        (false, _) => 0,
    };

    let bounds = match kind.integer_bounds() {
        Some((min, max)) => Some(Interval { min, max }),
        None if is_decimal => Some(DECIMAL64_BOUNDS),
        None => None,
    };

    let range = match (&def.range, bounds) {
        (Some(text), Some(bounds)) => Some(
            RangeSet::parse(text, fraction_digits, bounds)
                .map_err(|e| invalid(module, &at, "a valid range", e))?,
        ),
        _ => None,
    };

    let length = match &def.length {
        Some(text) => Some(
            RangeSet::parse(text, 0, STRING_LENGTH_BOUNDS)
                .map_err(|e| invalid(module, &at, "a valid length", e))?,
        ),
        None => None,
    };

    let pattern = match &def.pattern {
        Some(source) => {
            Some(Pattern::compile(source).map_err(|e| invalid(module, &at, "a valid pattern", e))?)
        }
        None => None,
    };

    if kind == LeafKind::Enumeration {
        if def.enums.is_empty() {
            return Err(invalid(module, &at, "at least one enum member", "none"));
        }
        let mut names = HashSet::new();
        let mut values = HashSet::new();
        for member in &def.enums {
            if member.name.is_empty() || !names.insert(member.name.as_str()) {
                return Err(invalid(module, &at, "unique, non-empty enum names", format!("'{}'", member.name)));
            }
            if !values.insert(member.value) {
                return Err(invalid(module, &at, "unique enum values", format!("value {} repeated", member.value)));
            }
        }
    }

    if kind == LeafKind::Bits {
        if def.bits.is_empty() {
            return Err(invalid(module, &at, "at least one bit", "none"));
        }
        let mut names = HashSet::new();
        for bit in &def.bits {
            if !is_identifier(bit) || !names.insert(bit.as_str()) {
                return Err(invalid(module, &at, "unique bit identifiers", format!("'{}'", bit)));
            }
        }
    }

    Ok(LeafSpec {
        name: def.name.clone(),
        kind,
        range,
        length,
        pattern,
        enums: def.enums.clone(),
        bits: def.bits.clone(),
        fraction_digits,
    })
}

fn invalid(
    module: &str,
    location: &str,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> SchemaError {
    SchemaError::invalid(module, DefinitionDetails::new(location, expected, actual))
}

/// YANG identifier: a letter or underscore, then letters, digits, `_`, `-`, `.`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
