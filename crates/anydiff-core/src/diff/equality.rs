//! Equality resolution: scalar equality, numeric deltas and the custom
//! equality override.

use crate::diff::engine::Differ;
use crate::errors::{DiffError, ExError, Result};
use crate::path::{CanonicalPath, PathFilter};
use crate::policy::{ComparisonPolicy, DiffConfig};
use crate::value::{Delta, ObjectRef, Scalar, Value};
use anydiff_core_types::RunId;

/// `right - left` for two numeric scalars.
///
/// Integers stay exact; a float on either side yields a float delta.
/// Non-numeric operands have no delta at all (not zero).
pub fn numeric_delta(left: &Scalar, right: &Scalar) -> Option<Delta> {
    if let (Some(l), Some(r)) = (left.as_i128(), right.as_i128()) {
        return Some(Delta::Integer(r - l));
    }
    if left.is_numeric() && right.is_numeric() {
        let (l, r) = (left.as_f64()?, right.as_f64()?);
        return Some(Delta::Float(r - l));
    }
    None
}

/// Built-in scalar equality: same variant and same value
pub fn scalars_equal(left: &Scalar, right: &Scalar) -> bool {
    left == right
}

/// Ask the left object's custom equality capability about `right`.
///
/// `None` when the override does not apply: the policy does not allow it,
/// the types differ, or the type exposes no capability.
pub(crate) fn overridden_equality(
    policy: ComparisonPolicy,
    left: &ObjectRef<'_>,
    right: &ObjectRef<'_>,
    path: &CanonicalPath,
) -> Result<Option<bool>> {
    if !policy.allows_equals_override() || left.type_id() != right.type_id() {
        return Ok(None);
    }
    let Some(capability) = left.custom_equality() else {
        return Ok(None);
    };
    capability
        .equals(right.instance())
        .map(Some)
        .map_err(|source| DiffError::EqualityOverride {
            type_name: left.type_name().to_string(),
            path: path.to_string(),
            source,
        })
}

/// Decide whether two values are equal under `policy`.
///
/// Objects without an applicable override are compared member by member, so
/// this is true exactly when a comparison of the two values would report
/// nothing.
///
/// # Errors
///
/// `EqualityOverrideFailed` when a custom equality capability fails, or
/// `DescriptorMismatch` when an accessor contradicts its declared kind.
pub fn are_equal(
    left: &Value<'_>,
    right: &Value<'_>,
    policy: ComparisonPolicy,
) -> std::result::Result<bool, ExError> {
    let config = DiffConfig::new(policy);
    let filter = PathFilter::default();
    let run_id = RunId::new();
    let mut differ = Differ::new(&config, &filter, &run_id);
    differ
        .values_equal(left, right, &CanonicalPath::root())
        .map_err(|err| ExError::from(err).with_op("are_equal"))
}
