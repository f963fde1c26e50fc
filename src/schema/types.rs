//! Schema descriptor definitions
//!
//! Descriptors are the serialized (JSON) form of a YANG module or SNMP MIB
//! as produced by a schema generator. They carry no behavior; a descriptor
//! is compiled into a [`Schema`](super::Schema) before any tree is built
//! from it.
//!
//! Supported leaf types:
//! - int8 / int16 / int32 / int64, uint8 / uint16 / uint32 / uint64
//! - string (optional length and pattern)
//! - boolean
//! - enumeration (declared symbols)
//! - bits (declared bit names)
//! - decimal64 (fixed fraction digits)
//! - empty

use serde::{Deserialize, Serialize};

/// Builtin leaf types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Boolean,
    Enumeration,
    Bits,
    Decimal64,
    Empty,
}

impl LeafKind {
    /// Returns the YANG type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            LeafKind::Int8 => "int8",
            LeafKind::Int16 => "int16",
            LeafKind::Int32 => "int32",
            LeafKind::Int64 => "int64",
            LeafKind::Uint8 => "uint8",
            LeafKind::Uint16 => "uint16",
            LeafKind::Uint32 => "uint32",
            LeafKind::Uint64 => "uint64",
            LeafKind::String => "string",
            LeafKind::Boolean => "boolean",
            LeafKind::Enumeration => "enumeration",
            LeafKind::Bits => "bits",
            LeafKind::Decimal64 => "decimal64",
            LeafKind::Empty => "empty",
        }
    }

    /// True for the eight integer types
    pub fn is_integer(&self) -> bool {
        self.integer_bounds().is_some()
    }

    /// Value space of an integer type as `(min, max)`
    pub fn integer_bounds(&self) -> Option<(i128, i128)> {
        match self {
            LeafKind::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            LeafKind::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            LeafKind::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            LeafKind::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            LeafKind::Uint8 => Some((0, u8::MAX as i128)),
            LeafKind::Uint16 => Some((0, u16::MAX as i128)),
            LeafKind::Uint32 => Some((0, u32::MAX as i128)),
            LeafKind::Uint64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// True for the unsigned integer types
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            LeafKind::Uint8 | LeafKind::Uint16 | LeafKind::Uint32 | LeafKind::Uint64
        )
    }
}

/// A declared enumeration member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Symbol as it appears on the wire (e.g. "unlocked")
    pub name: String,
    /// Assigned integer value
    pub value: i64,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Leaf definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafDef {
    /// Schema name of the leaf (e.g. "entPhysicalIndex")
    pub name: String,
    /// Builtin type
    #[serde(rename = "type")]
    pub kind: LeafKind,
    /// YANG range expression for integer and decimal64 leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// YANG length expression for string leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Regular expression a string leaf must match in full
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Enumeration members, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDef>,
    /// Bit names, in position order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bits: Vec<String>,
    /// Fraction digits of a decimal64 leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<u8>,
}

impl LeafDef {
    /// Create a leaf of the given type with no constraints
    pub fn new(name: impl Into<String>, kind: LeafKind) -> Self {
        Self {
            name: name.into(),
            kind,
            range: None,
            length: None,
            pattern: None,
            enums: Vec::new(),
            bits: Vec::new(),
            fraction_digits: None,
        }
    }

    /// Attach a range expression
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Attach a length expression
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Attach a pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Create an enumeration leaf; members are numbered from 1 in order
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut leaf = Self::new(name, LeafKind::Enumeration);
        leaf.enums = symbols
            .into_iter()
            .zip(1..)
            .map(|(symbol, value)| EnumDef::new(symbol, value))
            .collect();
        leaf
    }

    /// Create a bits leaf
    pub fn bits<S: Into<String>>(
        name: impl Into<String>,
        bits: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut leaf = Self::new(name, LeafKind::Bits);
        leaf.bits = bits.into_iter().map(Into::into).collect();
        leaf
    }

    /// Create a decimal64 leaf
    pub fn decimal64(name: impl Into<String>, fraction_digits: u8) -> Self {
        let mut leaf = Self::new(name, LeafKind::Decimal64);
        leaf.fraction_digits = Some(fraction_digits);
        leaf
    }
}

fn default_config() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Container or list-entry definition
///
/// A node with a non-empty `keys` list describes the entries of a list; the
/// list itself is named by the entry (`entStateEntry`) and lives in the
/// parent's `lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Schema name (e.g. "entStateTable")
    pub name: String,
    /// Presence container: retained and reported as data even when empty
    #[serde(default, skip_serializing_if = "is_false")]
    pub presence: bool,
    /// Configuration (true) or operational state (false) data
    #[serde(default = "default_config", skip_serializing_if = "is_true")]
    pub config: bool,
    /// Key leaf names in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Leaves in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaves: Vec<LeafDef>,
    /// Singleton child containers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<NodeDef>,
    /// Child lists, each given by its entry definition
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lists: Vec<NodeDef>,
}

impl NodeDef {
    /// Create an empty container definition
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presence: false,
            config: true,
            keys: Vec::new(),
            leaves: Vec::new(),
            containers: Vec::new(),
            lists: Vec::new(),
        }
    }

    /// Create a list-entry definition keyed by `keys`
    pub fn entry<S: Into<String>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut node = Self::container(name);
        node.keys = keys.into_iter().map(Into::into).collect();
        node
    }

    pub fn with_leaf(mut self, leaf: LeafDef) -> Self {
        self.leaves.push(leaf);
        self
    }

    pub fn with_container(mut self, container: NodeDef) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_list(mut self, entry: NodeDef) -> Self {
        self.lists.push(entry);
        self
    }

    pub fn with_presence(mut self) -> Self {
        self.presence = true;
        self
    }

    /// Mark as operational (non-configuration) data
    pub fn state(mut self) -> Self {
        self.config = false;
        self
    }
}

/// Complete module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Module name, used as the namespace qualifier of the root path segment
    pub module: String,
    /// Module prefix
    pub prefix: String,
    /// Module revision date
    pub revision: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level container
    pub root: NodeDef,
}

impl ModuleDef {
    pub fn new(
        module: impl Into<String>,
        prefix: impl Into<String>,
        revision: impl Into<String>,
        root: NodeDef,
    ) -> Self {
        Self {
            module: module.into(),
            prefix: prefix.into(),
            revision: revision.into(),
            description: None,
            root,
        }
    }
}
