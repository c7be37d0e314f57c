//! Scalar leaf values and numeric deltas.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// An owned leaf value read from a scalar member or collection element.
///
/// Scalars have a total order and a hash so they can key a keyed collection
/// and be sorted into a deterministic snapshot. Floats are ordered with
/// `total_cmp`, so `NaN == NaN` and `-0.0 != 0.0`. Values of different
/// variants are never equal, `Int(5)` and `UInt(5)` included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Int(_) => 1,
            Scalar::UInt(_) => 2,
            Scalar::Float(_) => 3,
            Scalar::Char(_) => 4,
            Scalar::Str(_) => 5,
            Scalar::Timestamp(_) => 6,
        }
    }

    /// Short label of the scalar's variant, used in error and summary text
    pub fn type_label(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::UInt(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::Char(_) => "char",
            Scalar::Str(_) => "string",
            Scalar::Timestamp(_) => "timestamp",
        }
    }

    /// True for the integer and float variants
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::UInt(_) | Scalar::Float(_))
    }

    /// Integer value widened to `i128`, if this is an integer variant
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Scalar::Int(v) => Some(i128::from(*v)),
            Scalar::UInt(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Numeric value as `f64`, if this is a numeric variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::UInt(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::UInt(a), Scalar::UInt(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            (Scalar::Char(a), Scalar::Char(b)) => a.cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Scalar::Bool(v) => v.hash(state),
            Scalar::Int(v) => v.hash(state),
            Scalar::UInt(v) => v.hash(state),
            Scalar::Float(v) => v.to_bits().hash(state),
            Scalar::Char(v) => v.hash(state),
            Scalar::Str(v) => v.hash(state),
            Scalar::Timestamp(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::UInt(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Char(v) => write!(f, "'{}'", v),
            Scalar::Str(v) => write!(f, "\"{}\"", v),
            Scalar::Timestamp(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

macro_rules! scalar_from {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Scalar {
                fn from(value: $source) -> Self {
                    Scalar::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

scalar_from!(Int, i64: i8, i16, i32, i64);
scalar_from!(UInt, u64: u8, u16, u32, u64);
scalar_from!(Float, f64: f32, f64);

macro_rules! scalar_from_ref {
    ($($source:ty),+) => {
        $(
            impl From<&$source> for Scalar {
                fn from(value: &$source) -> Self {
                    Scalar::from(*value)
                }
            }
        )+
    };
}

scalar_from_ref!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

impl From<isize> for Scalar {
    fn from(value: isize) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::UInt(value as u64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Scalar::Char(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Str(value.clone())
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Timestamp(value)
    }
}

/// Signed difference `right - left` between two numeric scalars.
///
/// Integer operands keep full precision in `i128`; a float on either side
/// turns the delta into a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delta {
    Integer(i128),
    Float(f64),
}

impl Delta {
    pub fn as_f64(&self) -> f64 {
        match self {
            Delta::Integer(v) => *v as f64,
            Delta::Float(v) => *v,
        }
    }
}

impl std::fmt::Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delta::Integer(v) => write!(f, "{:+}", v),
            Delta::Float(v) => write!(f, "{:+}", v),
        }
    }
}
