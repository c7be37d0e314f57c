//! Untyped comparison of dynamically shaped values.
//!
//! [`DynValue`] covers containers with no descriptor: maps keyed by scalar,
//! records with named members, plain lists. Records are compared over the
//! union of their member names, so raw dotted paths such as `._buckets` can
//! exclude implementation-private members.

#![allow(clippy::result_large_err)]

use crate::diff::engine::finish;
use crate::diff::equality::numeric_delta;
use crate::diff::matcher::{self, ElementComparer};
use crate::diff::model::{DiffValue, Difference, DifferenceKind};
use crate::errors::{DiffError, ExError, Result};
use crate::log_op_start;
use crate::path::{CanonicalPath, PathFilter, Scope};
use crate::policy::ComparisonPolicy;
use crate::value::Scalar;
use anydiff_core_types::RunId;
use std::collections::BTreeMap;
use std::time::Instant;

/// A dynamically shaped value
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    Null,
    Scalar(Scalar),
    List(Vec<DynValue>),
    /// Entries sorted by key, keys unique
    Map(Vec<(Scalar, DynValue)>),
    /// Named members in insertion order
    Record(Vec<(String, DynValue)>),
}

impl DynValue {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        DynValue::Scalar(value.into())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = DynValue>,
    {
        DynValue::List(items.into_iter().collect())
    }

    /// Map from scalar keys; a repeated key keeps its last value
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, DynValue)>,
        K: Into<Scalar>,
    {
        let sorted: BTreeMap<Scalar, DynValue> =
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        DynValue::Map(sorted.into_iter().collect())
    }

    pub fn record<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, DynValue)>,
        S: Into<String>,
    {
        DynValue::Record(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Member of a record by name
    pub fn get(&self, name: &str) -> Option<&DynValue> {
        match self {
            DynValue::Record(members) => member(members, name),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            DynValue::Null => "null",
            DynValue::Scalar(_) => "scalar",
            DynValue::List(_) => "list",
            DynValue::Map(_) => "map",
            DynValue::Record(_) => "record",
        }
    }

    fn collection_len(&self) -> Option<usize> {
        match self {
            DynValue::List(items) => Some(items.len()),
            DynValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    fn snapshot(&self) -> DiffValue {
        match self {
            DynValue::Null => DiffValue::Absent,
            DynValue::Scalar(s) => DiffValue::Scalar(s.clone()),
            DynValue::List(_) | DynValue::Map(_) => DiffValue::Collection {
                len: self.collection_len().unwrap_or(0),
            },
            DynValue::Record(_) => DiffValue::Object {
                type_name: "record".to_string(),
            },
        }
    }
}

fn member<'v>(members: &'v [(String, DynValue)], name: &str) -> Option<&'v DynValue> {
    members.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

impl From<Scalar> for DynValue {
    fn from(value: Scalar) -> Self {
        DynValue::Scalar(value)
    }
}

impl From<serde_json::Value> for DynValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => DynValue::Null,
            Json::Bool(b) => DynValue::Scalar(Scalar::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DynValue::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    DynValue::Scalar(Scalar::UInt(u))
                } else {
                    DynValue::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => DynValue::Scalar(Scalar::Str(s)),
            Json::Array(items) => DynValue::List(items.into_iter().map(DynValue::from).collect()),
            Json::Object(members) => DynValue::Record(
                members
                    .into_iter()
                    .map(|(name, v)| (name, DynValue::from(v)))
                    .collect(),
            ),
        }
    }
}

struct DynDiffer<'c> {
    policy: ComparisonPolicy,
    filter: &'c PathFilter,
}

impl DynDiffer<'_> {
    fn compare_records(
        &mut self,
        left: &[(String, DynValue)],
        right: &[(String, DynValue)],
        path: &CanonicalPath,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        let mut names: Vec<&str> = left.iter().map(|(n, _)| n.as_str()).collect();
        for (name, _) in right {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }

        let null = DynValue::Null;
        for name in names {
            let member_path = path.child(name);
            let Some(scope) = self.filter.classify(&member_path) else {
                continue;
            };
            let l = member(left, name).unwrap_or(&null);
            let r = member(right, name).unwrap_or(&null);
            self.compare_values(l, r, &member_path, scope, out)?;
        }
        Ok(())
    }

    fn compare_values(
        &mut self,
        left: &DynValue,
        right: &DynValue,
        path: &CanonicalPath,
        scope: Scope,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        let report = scope == Scope::Report;
        match (left, right) {
            (DynValue::Null, DynValue::Null) => {}
            (DynValue::Null, other) | (other, DynValue::Null) => {
                let absorbed =
                    self.policy.treats_empty_as_null() && other.collection_len() == Some(0);
                if report && !absorbed {
                    out.push(Difference::new(
                        path.clone(),
                        DifferenceKind::NullMismatch,
                        left.snapshot(),
                        right.snapshot(),
                    ));
                }
            }
            (DynValue::Scalar(l), DynValue::Scalar(r)) => {
                if report && l != r {
                    out.push(
                        Difference::new(
                            path.clone(),
                            DifferenceKind::Changed,
                            left.snapshot(),
                            right.snapshot(),
                        )
                        .with_delta(numeric_delta(l, r)),
                    );
                }
            }
            (DynValue::Record(l), DynValue::Record(r)) => self.compare_records(l, r, path, out)?,
            (DynValue::List(l), DynValue::List(r)) => {
                if self.policy.allows_out_of_order() {
                    matcher::compare_unordered(self, l, r, path, scope, out)?;
                } else {
                    matcher::compare_positional(self, l, r, path, scope, out)?;
                }
            }
            (DynValue::Map(l), DynValue::Map(r)) => {
                matcher::compare_keyed(self, l, r, path, scope, out)?;
            }
            _ => {
                if report {
                    out.push(Difference::new(
                        path.clone(),
                        DifferenceKind::TypeMismatch,
                        left.snapshot(),
                        right.snapshot(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ElementComparer<DynValue> for DynDiffer<'_> {
    fn compare(
        &mut self,
        left: &DynValue,
        right: &DynValue,
        path: &CanonicalPath,
        scope: Scope,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        self.compare_values(left, right, path, scope, out)
    }

    fn is_atomic(&self, left: &DynValue, right: &DynValue) -> bool {
        !matches!(
            (left, right),
            (DynValue::Record(_), DynValue::Record(_))
                | (DynValue::List(_), DynValue::List(_))
                | (DynValue::Map(_), DynValue::Map(_))
        )
    }

    fn snapshot(&self, element: &DynValue) -> DiffValue {
        element.snapshot()
    }
}

fn run_dynamic(
    left: &DynValue,
    right: &DynValue,
    policy: ComparisonPolicy,
    paths: &[&str],
) -> Result<Vec<Difference>> {
    let paths = paths
        .iter()
        .map(|raw| CanonicalPath::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    if std::mem::discriminant(left) != std::mem::discriminant(right) {
        return Err(DiffError::RootTypeMismatch {
            left: left.shape().to_string(),
            right: right.shape().to_string(),
        });
    }

    let filter = PathFilter::from_policy(policy, paths);
    let mut differ = DynDiffer {
        policy,
        filter: &filter,
    };
    let mut out = Vec::new();
    let root = CanonicalPath::root();
    match (left, right) {
        (DynValue::Record(l), DynValue::Record(r)) => {
            differ.compare_records(l, r, &root, &mut out)?;
        }
        _ => {
            if let Some(scope) = filter.classify(&root) {
                differ.compare_values(left, right, &root, scope, &mut out)?;
            }
        }
    }
    Ok(out)
}

/// Compare two dynamically shaped values.
///
/// `paths` are raw dotted paths (`._keys`) excluded from the comparison, or
/// the only members compared when `policy` carries `INCLUDE_LIST`.
///
/// # Errors
///
/// - `InvalidPath` if a raw path is malformed
/// - `RootTypeMismatch` if the two roots have different shapes
///
/// # Example
///
/// ```
/// use anydiff_core::{compute_dynamic_diff, ComparisonPolicy, DynValue};
///
/// let left = DynValue::map([(1, DynValue::scalar("Test")), (3, DynValue::scalar("Test"))]);
/// let right = DynValue::map([(1, DynValue::scalar("Test")), (2, DynValue::scalar("Test"))]);
/// let diffs = compute_dynamic_diff(&left, &right, ComparisonPolicy::ALL, &["._keys"]).unwrap();
/// assert_eq!(diffs.len(), 2);
/// ```
pub fn compute_dynamic_diff(
    left: &DynValue,
    right: &DynValue,
    policy: ComparisonPolicy,
    paths: &[&str],
) -> std::result::Result<Vec<Difference>, ExError> {
    let start = Instant::now();
    let run_id = RunId::new();
    log_op_start!(
        "compute_dynamic_diff",
        run = run_id,
        root = left.shape(),
        selectors = paths.len()
    );

    let result = run_dynamic(left, right, policy, paths);
    finish("compute_dynamic_diff", result, start, &run_id, left.shape())
}
