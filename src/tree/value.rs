//! Leaf values and assignment checking.
//!
//! Every value entering the tree passes through [`admit`], which checks it
//! against the leaf's declared type and constraints and returns the
//! canonical form that is stored (and compared by `find_entry`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::schema::{parse_scaled, LeafKind, LeafSpec};

use super::errors::{TreeError, TreeResult};

/// Fixed-point decimal: `digits / 10^fraction_digits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal64 {
    digits: i64,
    fraction_digits: u8,
}

/// Malformed decimal64 literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal64 literal '{0}'")]
pub struct ParseDecimalError(String);

impl Decimal64 {
    /// Largest number of fraction digits decimal64 allows
    pub const MAX_FRACTION_DIGITS: u8 = 18;

    /// Returns `None` if `fraction_digits` exceeds 18.
    pub fn new(digits: i64, fraction_digits: u8) -> Option<Self> {
        (fraction_digits <= Self::MAX_FRACTION_DIGITS).then_some(Self {
            digits,
            fraction_digits,
        })
    }

    pub fn digits(&self) -> i64 {
        self.digits
    }

    pub fn fraction_digits(&self) -> u8 {
        self.fraction_digits
    }

    /// Re-expresses the value with `fraction_digits` digits. Fails if that
    /// would lose precision or overflow.
    pub fn rescale(&self, fraction_digits: u8) -> Option<Self> {
        if fraction_digits > Self::MAX_FRACTION_DIGITS {
            return None;
        }

        let digits = if fraction_digits >= self.fraction_digits {
            let factor = 10i64.checked_pow((fraction_digits - self.fraction_digits) as u32)?;
            self.digits.checked_mul(factor)?
        } else {
            let factor = 10i64.checked_pow((self.fraction_digits - fraction_digits) as u32)?;
            if self.digits % factor != 0 {
                return None;
            }
            self.digits / factor
        };

        Some(Self {
            digits,
            fraction_digits,
        })
    }
}

impl FromStr for Decimal64 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let fraction_digits = text.split_once('.').map_or(0, |(_, frac)| frac.len());
        let err = || ParseDecimalError(s.to_string());

        let fraction_digits = u8::try_from(fraction_digits)
            .ok()
            .filter(|fd| *fd <= Self::MAX_FRACTION_DIGITS)
            .ok_or_else(err)?;
        let scaled = parse_scaled(text, fraction_digits).ok_or_else(err)?;
        let digits = i64::try_from(scaled).map_err(|_| err())?;

        Ok(Self {
            digits,
            fraction_digits,
        })
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.digits as i128;
        let sign = if value < 0 { "-" } else { "" };
        let magnitude = value.unsigned_abs();

        if self.fraction_digits == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }

        let factor = 10u128.pow(self.fraction_digits as u32);
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / factor,
            magnitude % factor,
            width = self.fraction_digits as usize
        )
    }
}

/// Current value of a leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeafValue {
    /// Signed integer types
    Integer(i64),
    /// Unsigned integer types
    Unsigned(u64),
    String(String),
    Boolean(bool),
    /// Enumeration symbol
    Enum(String),
    /// Set bit names, in declaration order once stored
    Bits(Vec<String>),
    Decimal(Decimal64),
    /// Value of an `empty` leaf
    Empty,
}

impl LeafValue {
    /// Enumeration symbol value
    pub fn enumeration(symbol: impl Into<String>) -> Self {
        LeafValue::Enum(symbol.into())
    }

    /// Bits value from the names of the set bits
    pub fn bits<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        LeafValue::Bits(names.into_iter().map(Into::into).collect())
    }

    /// Kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            LeafValue::Integer(_) => "integer",
            LeafValue::Unsigned(_) => "unsigned integer",
            LeafValue::String(_) => "string",
            LeafValue::Boolean(_) => "boolean",
            LeafValue::Enum(_) => "enumeration symbol",
            LeafValue::Bits(_) => "bits",
            LeafValue::Decimal(_) => "decimal64",
            LeafValue::Empty => "empty",
        }
    }
}

/// Canonical text, as used in key predicates
impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Integer(v) => write!(f, "{}", v),
            LeafValue::Unsigned(v) => write!(f, "{}", v),
            LeafValue::String(s) | LeafValue::Enum(s) => f.write_str(s),
            LeafValue::Boolean(b) => write!(f, "{}", b),
            LeafValue::Bits(names) => f.write_str(&names.join(" ")),
            LeafValue::Decimal(d) => write!(f, "{}", d),
            LeafValue::Empty => Ok(()),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for LeafValue {
                fn from(v: $t) -> Self {
                    LeafValue::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(Integer, i64, i8, i16, i32, i64);
impl_from_int!(Unsigned, u64, u8, u16, u32, u64);

impl From<bool> for LeafValue {
    fn from(v: bool) -> Self {
        LeafValue::Boolean(v)
    }
}

impl From<&str> for LeafValue {
    fn from(v: &str) -> Self {
        LeafValue::String(v.to_string())
    }
}

impl From<String> for LeafValue {
    fn from(v: String) -> Self {
        LeafValue::String(v)
    }
}

impl From<Decimal64> for LeafValue {
    fn from(v: Decimal64) -> Self {
        LeafValue::Decimal(v)
    }
}

/// Checks `value` against the leaf declared by `spec` on node `node`.
///
/// Integers of either signedness are accepted by every integer type and
/// range-checked against it. A string is accepted for an enumeration when it
/// names a declared member. Integers are accepted for decimal64.
pub(crate) fn admit(node: &str, spec: &LeafSpec, value: LeafValue) -> TreeResult<LeafValue> {
    let leaf = spec.name();
    let kind = spec.kind();
    let mismatch = |value: &LeafValue| {
        TreeError::type_mismatch(node, leaf, kind.type_name(), value.kind_name())
    };

    if let Some((min, max)) = kind.integer_bounds() {
        let n = match value {
            LeafValue::Integer(v) => v as i128,
            LeafValue::Unsigned(v) => v as i128,
            other => return Err(mismatch(&other)),
        };
        if n < min || n > max {
            return Err(TreeError::range_violation(
                node,
                leaf,
                format!("{} is outside the {} value space", n, kind.type_name()),
            ));
        }
        if let Some(range) = spec.range() {
            if !range.contains(n) {
                return Err(TreeError::range_violation(
                    node,
                    leaf,
                    format!("{} is outside range {}", n, range),
                ));
            }
        }
        return Ok(if kind.is_unsigned() {
            LeafValue::Unsigned(n as u64)
        } else {
            LeafValue::Integer(n as i64)
        });
    }

    match (kind, value) {
        (LeafKind::String, LeafValue::String(s)) => {
            if let Some(length) = spec.length() {
                let len = s.chars().count() as i128;
                if !length.contains(len) {
                    return Err(TreeError::range_violation(
                        node,
                        leaf,
                        format!("length {} is outside {}", len, length),
                    ));
                }
            }
            if let Some(pattern) = spec.pattern() {
                if !pattern.is_match(&s) {
                    return Err(TreeError::pattern_mismatch(node, leaf, &s, pattern.as_str()));
                }
            }
            Ok(LeafValue::String(s))
        }
        (LeafKind::Boolean, LeafValue::Boolean(b)) => Ok(LeafValue::Boolean(b)),
        (LeafKind::Enumeration, LeafValue::Enum(symbol) | LeafValue::String(symbol)) => {
            if spec.enums().iter().any(|member| member.name == symbol) {
                Ok(LeafValue::Enum(symbol))
            } else {
                Err(TreeError::range_violation(
                    node,
                    leaf,
                    format!("'{}' is not a member of the enumeration", symbol),
                ))
            }
        }
        (LeafKind::Bits, LeafValue::Bits(names)) => {
            if let Some(unknown) = names.iter().find(|n| !spec.bits().contains(*n)) {
                return Err(TreeError::range_violation(
                    node,
                    leaf,
                    format!("'{}' is not a declared bit", unknown),
                ));
            }
            let ordered = spec
                .bits()
                .iter()
                .filter(|bit| names.contains(*bit))
                .cloned()
                .collect();
            Ok(LeafValue::Bits(ordered))
        }
        (LeafKind::Decimal64, value) => {
            let decimal = match value {
                LeafValue::Decimal(d) => d,
                LeafValue::Integer(i) => Decimal64 {
                    digits: i,
                    fraction_digits: 0,
                },
                LeafValue::Unsigned(u) => Decimal64 {
                    digits: i64::try_from(u).map_err(|_| {
                        TreeError::range_violation(node, leaf, format!("{} overflows decimal64", u))
                    })?,
                    fraction_digits: 0,
                },
                other => return Err(mismatch(&other)),
            };
            let scaled = decimal.rescale(spec.fraction_digits()).ok_or_else(|| {
                TreeError::range_violation(
                    node,
                    leaf,
                    format!(
                        "{} does not fit {} fraction digits",
                        decimal,
                        spec.fraction_digits()
                    ),
                )
            })?;
            if let Some(range) = spec.range() {
                if !range.contains(scaled.digits as i128) {
                    return Err(TreeError::range_violation(
                        node,
                        leaf,
                        format!("{} is outside range {}", scaled, range),
                    ));
                }
            }
            Ok(LeafValue::Decimal(scaled))
        }
        (LeafKind::Empty, LeafValue::Empty) => Ok(LeafValue::Empty),
        (_, other) => Err(mismatch(&other)),
    }
}
