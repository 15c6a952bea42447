//! Scalar values crossing the bridge
//!
//! Only a closed set of kinds can cross: booleans, machine-word integers,
//! long integers, strings and doubles. Each runtime supplies a
//! [`ScalarCodec`] that maps its own values onto [`Scalar`].

use crate::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in the host's native representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Bool(bool),
    Int(i32),
    Long(i64),
    Str(String),
    Float(f64),
}

impl Scalar {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Bool(_) => ValueKind::Bool,
            Scalar::Int(_) => ValueKind::Int,
            Scalar::Long(_) => ValueKind::Long,
            Scalar::Str(_) => ValueKind::Str,
            Scalar::Float(_) => ValueKind::Float,
        }
    }

    /// Integer view of `Int` and `Long`; other kinds yield `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(i64::from(*value)),
            Scalar::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Long(value) => write!(f, "{value}"),
            Scalar::Str(value) => f.write_str(value),
            Scalar::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Long(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// Discriminant of a foreign value as seen by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Long,
    Str,
    Float,
    Unsupported,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Long => "long integer",
            ValueKind::Str => "string",
            ValueKind::Float => "float",
            ValueKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order in which kind predicates are tried when classifying a foreign value.
///
/// Booleans come first: some runtimes report a boolean as an integer too, and
/// the first matching predicate wins.
pub const PROBE_ORDER: [ValueKind; 5] = [
    ValueKind::Bool,
    ValueKind::Int,
    ValueKind::Long,
    ValueKind::Float,
    ValueKind::Str,
];

/// Conversion between [`Scalar`] and one runtime's value representation.
pub trait ScalarCodec {
    /// Owned handle to a value of the foreign runtime.
    type Foreign;

    /// Kind predicate. Several kinds may answer `true` for the same value;
    /// [`classify`] settles it through [`PROBE_ORDER`].
    fn probe(&self, value: &Self::Foreign, kind: ValueKind) -> bool;

    /// Foreign type name, used in "unsupported value kind" errors.
    fn describe(&self, value: &Self::Foreign) -> String;

    fn to_foreign(&self, value: &Scalar) -> Result<Self::Foreign, BridgeError>;

    /// Reads a value whose kind has already been established by [`classify`].
    fn extract(&self, value: &Self::Foreign, kind: ValueKind) -> Result<Scalar, BridgeError>;

    fn from_foreign(&self, value: &Self::Foreign) -> Result<Scalar, BridgeError> {
        match classify(self, value) {
            ValueKind::Unsupported => Err(BridgeError::unsupported(self.describe(value))),
            kind => self.extract(value, kind),
        }
    }
}

/// Returns the first kind in [`PROBE_ORDER`] whose predicate accepts `value`.
pub fn classify<C: ScalarCodec + ?Sized>(codec: &C, value: &C::Foreign) -> ValueKind {
    PROBE_ORDER
        .iter()
        .copied()
        .find(|&kind| codec.probe(value, kind))
        .unwrap_or(ValueKind::Unsupported)
}
