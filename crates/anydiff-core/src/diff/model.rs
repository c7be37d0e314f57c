//! Difference records.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! A [`Difference`] owns everything it reports; nothing points back into the
//! compared graphs.

use crate::path::CanonicalPath;
use crate::value::{Delta, Scalar};
use serde::{Deserialize, Serialize};

/// Why two values at the same path disagree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DifferenceKind {
    /// Both sides present, values differ
    Changed,
    /// One side absent, the other present
    NullMismatch,
    /// Positional collections of different length
    CountMismatch,
    /// Element or entry present only on the left
    Missing,
    /// Element or entry present only on the right
    Extra,
    /// Both sides present but of different object types or shapes
    TypeMismatch,
}

impl DifferenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            DifferenceKind::Changed => "changed",
            DifferenceKind::NullMismatch => "null mismatch",
            DifferenceKind::CountMismatch => "count mismatch",
            DifferenceKind::Missing => "missing",
            DifferenceKind::Extra => "extra",
            DifferenceKind::TypeMismatch => "type mismatch",
        }
    }
}

/// Owned snapshot of one side of a difference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DiffValue {
    Absent,
    Scalar(Scalar),
    Object { type_name: String },
    Collection { len: usize },
}

impl DiffValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DiffValue::Absent)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            DiffValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiffValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffValue::Absent => write!(f, "null"),
            DiffValue::Scalar(value) => write!(f, "{}", value),
            DiffValue::Object { type_name } => write!(f, "{{{}}}", type_name),
            DiffValue::Collection { len } => write!(f, "[{} items]", len),
        }
    }
}

/// One reported discrepancy between the two graphs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difference {
    /// Canonical path of the member that differs
    pub path: CanonicalPath,
    pub kind: DifferenceKind,
    pub left: DiffValue,
    pub right: DiffValue,
    /// `right - left` when both sides are numeric scalars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
    /// Position in a positional collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_index: Option<usize>,
    /// Entry key in a keyed collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Scalar>,
}

impl Difference {
    pub fn new(path: CanonicalPath, kind: DifferenceKind, left: DiffValue, right: DiffValue) -> Self {
        Self {
            path,
            kind,
            left,
            right,
            delta: None,
            array_index: None,
            key: None,
        }
    }

    pub fn with_delta(mut self, delta: Option<Delta>) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn with_key(mut self, key: Scalar) -> Self {
        self.key = Some(key);
        self
    }

    /// The difference's canonical path rendered as `.A.B`
    pub fn property(&self) -> String {
        self.path.to_string()
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(index) = self.array_index {
            write!(f, "[{}]", index)?;
        }
        if let Some(key) = &self.key {
            write!(f, "[{}]", key)?;
        }
        write!(f, ": {} → {}", self.left, self.right)?;
        if let Some(delta) = &self.delta {
            write!(f, " (delta {})", delta)?;
        }
        if self.kind != DifferenceKind::Changed {
            write!(f, " [{}]", self.kind.label())?;
        }
        Ok(())
    }
}
