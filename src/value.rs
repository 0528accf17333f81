//! Scalar parameter values.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A single parameter value held by a parameter set.
///
/// Parameters are scalar: booleans, integers, floats or strings. Values
/// serialize as plain YAML scalars, so `1`, `1.0`, `true` and `a` read back
/// as `Int`, `Float`, `Bool` and `Str` respectively.
///
/// A float `NaN` marks a parameter that a set has no value for (a column
/// introduced by another schema). `NaN` never compares equal, so padded sets
/// never alias real ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A string value.
    Str(String),
}

impl Value {
    /// The padding value for a parameter a set has no value for.
    pub const MISSING: Self = Self::Float(f64::NAN);

    /// Returns `true` if this is the padding value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Float(v) if v.is_nan())
    }

    /// Returns the value as `f64` for numeric variants.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// Canonical text used for set content hashing.
    ///
    /// Integers and floats never share a representation (`1` vs `1.0`), and
    /// strings are quoted so `"1"` differs from `1`.
    #[must_use]
    pub fn canonical_repr(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format!("{v:?}"),
            Self::Str(v) => format!("{v:?}"),
        }
    }

    /// Converts a YAML scalar into a value.
    ///
    /// Returns `None` for nulls, sequences, mappings, tagged values and
    /// integers outside the `i64` range.
    #[must_use]
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Bool(v) => Some(Self::Bool(*v)),
            serde_yaml::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Some(Self::Int(v))
                } else if n.is_f64() {
                    n.as_f64().map(Self::Float)
                } else {
                    None
                }
            }
            serde_yaml::Value::String(s) => Some(Self::Str(s.clone())),
            serde_yaml::Value::Null
            | serde_yaml::Value::Sequence(_)
            | serde_yaml::Value::Mapping(_)
            | serde_yaml::Value::Tagged(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}
