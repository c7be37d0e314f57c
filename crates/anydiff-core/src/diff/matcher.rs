//! Collection matching.
//!
//! The matcher is generic over the element representation so the typed
//! engine and the dynamic engine share one implementation of positional,
//! order-independent and keyed matching. Element comparison itself is
//! delegated back to the caller through [`ElementComparer`].

use crate::diff::model::{DiffValue, Difference, DifferenceKind};
use crate::errors::Result;
use crate::path::{CanonicalPath, Scope};
use crate::value::Scalar;
use std::cmp::Ordering;

/// Element-level comparison supplied by an engine
pub(crate) trait ElementComparer<E> {
    /// Compare two elements that live under `path`, appending differences
    fn compare(
        &mut self,
        left: &E,
        right: &E,
        path: &CanonicalPath,
        scope: Scope,
        out: &mut Vec<Difference>,
    ) -> Result<()>;

    /// True when the pair is judged as a whole (scalars, nulls, mismatched
    /// shapes, overridden equality) rather than member by member
    fn is_atomic(&self, left: &E, right: &E) -> bool;

    fn snapshot(&self, element: &E) -> DiffValue;
}

/// Two elements are equivalent when comparing them reports nothing
pub(crate) fn equivalent<E, C>(
    comparer: &mut C,
    left: &E,
    right: &E,
    path: &CanonicalPath,
    scope: Scope,
) -> Result<bool>
where
    C: ElementComparer<E> + ?Sized,
{
    let mut probe = Vec::new();
    comparer.compare(left, right, path, scope, &mut probe)?;
    Ok(probe.is_empty())
}

/// Index-for-index comparison.
///
/// A length difference is reported once, ahead of the elementwise
/// differences over the common prefix.
pub(crate) fn compare_positional<E, C>(
    comparer: &mut C,
    left: &[E],
    right: &[E],
    path: &CanonicalPath,
    scope: Scope,
    out: &mut Vec<Difference>,
) -> Result<()>
where
    C: ElementComparer<E> + ?Sized,
{
    if scope == Scope::Report && left.len() != right.len() {
        out.push(Difference::new(
            path.clone(),
            DifferenceKind::CountMismatch,
            DiffValue::Collection { len: left.len() },
            DiffValue::Collection { len: right.len() },
        ));
    }

    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        let mut nested = Vec::new();
        comparer.compare(l, r, path, scope, &mut nested)?;
        out.extend(nested.into_iter().map(|diff| {
            if diff.array_index.is_none() {
                diff.with_index(index)
            } else {
                diff
            }
        }));
    }
    Ok(())
}

/// Multiset comparison.
///
/// Each left element consumes the first equivalent, not yet consumed right
/// element. Unmatched left elements are reported as `Missing`, unconsumed
/// right elements as `Extra`; the two are never paired. With ambiguous
/// duplicates the pairing is best effort.
pub(crate) fn compare_unordered<E, C>(
    comparer: &mut C,
    left: &[E],
    right: &[E],
    path: &CanonicalPath,
    scope: Scope,
    out: &mut Vec<Difference>,
) -> Result<()>
where
    C: ElementComparer<E> + ?Sized,
{
    let mut consumed = vec![false; right.len()];
    let mut unmatched_left = Vec::new();

    for (li, l) in left.iter().enumerate() {
        let mut matched = false;
        for (ri, r) in right.iter().enumerate() {
            if consumed[ri] {
                continue;
            }
            if equivalent(comparer, l, r, path, scope)? {
                consumed[ri] = true;
                matched = true;
                break;
            }
        }
        if !matched {
            unmatched_left.push(li);
        }
    }

    let unmatched_right: Vec<usize> = consumed
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(ri, _)| ri)
        .collect();

    match scope {
        Scope::Report => {
            for li in unmatched_left {
                out.push(Difference::new(
                    path.clone(),
                    DifferenceKind::Missing,
                    comparer.snapshot(&left[li]),
                    DiffValue::Absent,
                ));
            }
            for ri in unmatched_right {
                out.push(Difference::new(
                    path.clone(),
                    DifferenceKind::Extra,
                    DiffValue::Absent,
                    comparer.snapshot(&right[ri]),
                ));
            }
        }
        // Only descendants are reported: pair leftovers in order so their
        // included members still get compared.
        Scope::Traverse => {
            for (li, ri) in unmatched_left.into_iter().zip(unmatched_right) {
                comparer.compare(&left[li], &right[ri], path, scope, out)?;
            }
        }
    }
    Ok(())
}

fn sorted_by_key<E>(entries: &[(Scalar, E)]) -> Vec<&(Scalar, E)> {
    let mut sorted: Vec<&(Scalar, E)> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
}

/// Key-matched comparison of keyed collections.
///
/// Entries are walked in key order. A key on one side only is `Missing` or
/// `Extra`. A shared key whose values are judged as a whole and differ is a
/// replaced entry, reported as `Missing` plus `Extra`. A shared key whose
/// values are compared member by member reports the nested differences,
/// tagged with the key.
pub(crate) fn compare_keyed<E, C>(
    comparer: &mut C,
    left: &[(Scalar, E)],
    right: &[(Scalar, E)],
    path: &CanonicalPath,
    scope: Scope,
    out: &mut Vec<Difference>,
) -> Result<()>
where
    C: ElementComparer<E> + ?Sized,
{
    let left = sorted_by_key(left);
    let right = sorted_by_key(right);
    let report = scope == Scope::Report;
    let (mut li, mut ri) = (0, 0);

    while li < left.len() || ri < right.len() {
        let order = match (left.get(li), right.get(ri)) {
            (Some(l), Some(r)) => l.0.cmp(&r.0),
            (Some(_), None) => Ordering::Less,
            (None, _) => Ordering::Greater,
        };

        match order {
            Ordering::Less => {
                let (key, value) = left[li];
                if report {
                    out.push(
                        Difference::new(
                            path.clone(),
                            DifferenceKind::Missing,
                            comparer.snapshot(value),
                            DiffValue::Absent,
                        )
                        .with_key(key.clone()),
                    );
                }
                li += 1;
            }
            Ordering::Greater => {
                let (key, value) = right[ri];
                if report {
                    out.push(
                        Difference::new(
                            path.clone(),
                            DifferenceKind::Extra,
                            DiffValue::Absent,
                            comparer.snapshot(value),
                        )
                        .with_key(key.clone()),
                    );
                }
                ri += 1;
            }
            Ordering::Equal => {
                let (key, l) = left[li];
                let (_, r) = right[ri];
                if report && comparer.is_atomic(l, r) {
                    if !equivalent(comparer, l, r, path, scope)? {
                        out.push(
                            Difference::new(
                                path.clone(),
                                DifferenceKind::Missing,
                                comparer.snapshot(l),
                                DiffValue::Absent,
                            )
                            .with_key(key.clone()),
                        );
                        out.push(
                            Difference::new(
                                path.clone(),
                                DifferenceKind::Extra,
                                DiffValue::Absent,
                                comparer.snapshot(r),
                            )
                            .with_key(key.clone()),
                        );
                    }
                } else {
                    let mut nested = Vec::new();
                    comparer.compare(l, r, path, scope, &mut nested)?;
                    out.extend(nested.into_iter().map(|diff| {
                        if diff.key.is_none() {
                            diff.with_key(key.clone())
                        } else {
                            diff
                        }
                    }));
                }
                li += 1;
                ri += 1;
            }
        }
    }
    Ok(())
}
