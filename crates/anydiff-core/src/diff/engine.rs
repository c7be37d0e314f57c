//! Object graph differ and the typed entry points.
//!
//! [`compute_diff`] walks the members of the root type's descriptor in
//! declaration order, recursing into nested objects and handing collections
//! to the matcher. Every difference it reports is labelled with the
//! canonical path of the member it was found at.

#![allow(clippy::result_large_err)]

use crate::descriptor::{descriptor_of, Diffable, Member, TypeDescriptor};
use crate::diff::equality::{numeric_delta, overridden_equality, scalars_equal};
use crate::diff::matcher::{self, ElementComparer};
use crate::diff::model::{DiffValue, Difference, DifferenceKind};
use crate::errors::{DiffError, ExError, Result};
use crate::path::{compile_all, CanonicalPath, PathFilter, Scope, Selector};
use crate::policy::{ComparisonPolicy, DiffConfig};
use crate::value::{ObjectIdentity, ObjectRef, Value};
use crate::{log_op_end, log_op_error, log_op_start};
use anydiff_core_types::RunId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// State of one comparison run: configuration, filter and the stack of
/// left-hand objects currently being compared.
pub(crate) struct Differ<'c> {
    config: &'c DiffConfig,
    filter: &'c PathFilter,
    run_id: &'c RunId,
    active: HashSet<ObjectIdentity>,
    depth: usize,
}

impl<'c> Differ<'c> {
    pub(crate) fn new(config: &'c DiffConfig, filter: &'c PathFilter, run_id: &'c RunId) -> Self {
        Self {
            config,
            filter,
            run_id,
            active: HashSet::new(),
            depth: 0,
        }
    }

    fn policy(&self) -> ComparisonPolicy {
        self.config.policy
    }

    /// True when comparing the two values reports nothing
    pub(crate) fn values_equal(
        &mut self,
        left: &Value<'_>,
        right: &Value<'_>,
        path: &CanonicalPath,
    ) -> Result<bool> {
        matcher::equivalent(self, left, right, path, Scope::Report)
    }

    /// Member-by-member comparison of two objects of the same type.
    ///
    /// A left object already on the active stack is a cycle and is treated
    /// as equal. Descending past a configured `max_depth` fails the run.
    pub(crate) fn compare_objects(
        &mut self,
        left: &ObjectRef<'_>,
        right: &ObjectRef<'_>,
        path: &CanonicalPath,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        let identity = left.identity();
        if self.active.contains(&identity) {
            tracing::debug!(
                component = module_path!(),
                run_id = self.run_id.as_str(),
                path = %path,
                type_name = left.type_name(),
                "cycle detected, revisit skipped"
            );
            return Ok(());
        }
        if let Some(max_depth) = self.config.max_depth {
            if self.depth > max_depth {
                return Err(DiffError::DepthExceeded {
                    path: path.to_string(),
                    max_depth,
                });
            }
        }

        self.active.insert(identity);
        self.depth += 1;
        let result = self.compare_members(left, right, path, out);
        self.depth -= 1;
        self.active.remove(&identity);
        result
    }

    fn compare_members(
        &mut self,
        left: &ObjectRef<'_>,
        right: &ObjectRef<'_>,
        path: &CanonicalPath,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        let descriptor = Arc::clone(left.descriptor());
        for member in descriptor.members() {
            let member_path = path.child(member.name());
            let Some(scope) = self.filter.classify(&member_path) else {
                continue;
            };

            let l = member.read(left.instance());
            let r = member.read(right.instance());
            check_kind(&descriptor, member, &l)?;
            check_kind(&descriptor, member, &r)?;

            self.compare_values(&l, &r, &member_path, scope, out)?;
        }
        Ok(())
    }

    /// Compare two values found at `path`, dispatching on their shape
    fn compare_values(
        &mut self,
        left: &Value<'_>,
        right: &Value<'_>,
        path: &CanonicalPath,
        scope: Scope,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        let report = scope == Scope::Report;
        match (left, right) {
            (Value::Null, Value::Null) => {}

            (Value::Null, other) | (other, Value::Null) => {
                let absorbed =
                    self.policy().treats_empty_as_null() && other.collection_len() == Some(0);
                if report && !absorbed {
                    out.push(Difference::new(
                        path.clone(),
                        DifferenceKind::NullMismatch,
                        left.snapshot(),
                        right.snapshot(),
                    ));
                }
            }

            (Value::Scalar(l), Value::Scalar(r)) => {
                if report && !scalars_equal(l, r) {
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

            (Value::Object(l), Value::Object(r)) => {
                if l.type_id() != r.type_id() {
                    if report {
                        out.push(Difference::new(
                            path.clone(),
                            DifferenceKind::TypeMismatch,
                            left.snapshot(),
                            right.snapshot(),
                        ));
                    }
                    return Ok(());
                }
                // Below a traverse-only member only descendants count, so the
                // override is not consulted there.
                let verdict = if report {
                    overridden_equality(self.policy(), l, r, path)?
                } else {
                    None
                };
                match verdict {
                    Some(equal) => {
                        if report && !equal {
                            out.push(Difference::new(
                                path.clone(),
                                DifferenceKind::Changed,
                                left.snapshot(),
                                right.snapshot(),
                            ));
                        }
                    }
                    None => self.compare_objects(l, r, path, out)?,
                }
            }

            (Value::Sequence(l), Value::Sequence(r)) => {
                if self.policy().allows_out_of_order() {
                    matcher::compare_unordered(self, l, r, path, scope, out)?;
                } else {
                    matcher::compare_positional(self, l, r, path, scope, out)?;
                }
            }

            (Value::Set(l), Value::Set(r)) => {
                matcher::compare_unordered(self, l, r, path, scope, out)?;
            }

            (Value::Keyed(l), Value::Keyed(r)) => {
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

impl<'v> ElementComparer<Value<'v>> for Differ<'_> {
    fn compare(
        &mut self,
        left: &Value<'v>,
        right: &Value<'v>,
        path: &CanonicalPath,
        scope: Scope,
        out: &mut Vec<Difference>,
    ) -> Result<()> {
        self.compare_values(left, right, path, scope, out)
    }

    fn is_atomic(&self, left: &Value<'v>, right: &Value<'v>) -> bool {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => {
                l.type_id() != r.type_id()
                    || (self.policy().allows_equals_override() && l.custom_equality().is_some())
            }
            (Value::Sequence(_), Value::Sequence(_))
            | (Value::Set(_), Value::Set(_))
            | (Value::Keyed(_), Value::Keyed(_)) => false,
            _ => true,
        }
    }

    fn snapshot(&self, element: &Value<'v>) -> DiffValue {
        element.snapshot()
    }
}

fn check_kind(descriptor: &TypeDescriptor, member: &Member, value: &Value<'_>) -> Result<()> {
    if member.kind().accepts(value) {
        return Ok(());
    }
    Err(DiffError::DescriptorMismatch {
        type_name: descriptor.type_name().to_string(),
        member: member.name().to_string(),
        expected: member.kind().to_string(),
        found: value.shape().to_string(),
    })
}

/// Run a comparison between two type-erased roots of the same type
fn run(
    left: &ObjectRef<'_>,
    right: &ObjectRef<'_>,
    config: &DiffConfig,
    paths: Vec<CanonicalPath>,
    run_id: &RunId,
) -> Result<Vec<Difference>> {
    if left.type_id() != right.type_id() {
        return Err(DiffError::RootTypeMismatch {
            left: left.type_name().to_string(),
            right: right.type_name().to_string(),
        });
    }

    let filter = PathFilter::from_policy(config.policy, paths);
    let mut differ = Differ::new(config, &filter, run_id);
    let mut out = Vec::new();
    differ.compare_objects(left, right, &CanonicalPath::root(), &mut out)?;
    Ok(out)
}

/// Log the outcome of an entry point and convert its error
pub(crate) fn finish(
    op: &'static str,
    result: Result<Vec<Difference>>,
    start: Instant,
    run_id: &RunId,
    root_type: &str,
) -> std::result::Result<Vec<Difference>, ExError> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(diffs) => {
            log_op_end!(
                op,
                diffs = diffs,
                duration_ms = duration_ms,
                run_id = run_id.as_str(),
                root_type = root_type
            );
            Ok(diffs)
        }
        Err(err) => {
            let ex = ExError::from(err).with_op(op);
            log_op_error!(
                op,
                ex.clone(),
                duration_ms = duration_ms,
                run_id = run_id.as_str(),
                root_type = root_type
            );
            Err(ex)
        }
    }
}

/// Compute the differences between two instances of `T`.
///
/// `selectors` are excluded from the comparison, or are the only members
/// compared when `policy` carries `INCLUDE_LIST`.
///
/// # Errors
///
/// - `InvalidSelector` if a selector does not compile against `T`
/// - `DescriptorMismatch` if an accessor contradicts its declared member kind
/// - `DepthExceeded` if nesting goes past a configured `max_depth`
/// - `EqualityOverrideFailed` if a custom equality capability fails
///
/// # Example
///
/// ```
/// use anydiff_core::{compute_diff, ComparisonPolicy, Diffable, TypeDescriptor, Value};
///
/// struct Account {
///     balance: i64,
/// }
///
/// impl Diffable for Account {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Account")
///             .scalar("Balance", |a| Value::from(a.balance))
///             .build()
///     }
/// }
///
/// let diffs = compute_diff(
///     &Account { balance: 10 },
///     &Account { balance: 25 },
///     ComparisonPolicy::ALL,
///     &[],
/// )
/// .unwrap();
/// assert_eq!(diffs.len(), 1);
/// assert_eq!(diffs[0].property(), ".Balance");
/// ```
pub fn compute_diff<T: Diffable>(
    left: &T,
    right: &T,
    policy: ComparisonPolicy,
    selectors: &[Selector<T>],
) -> std::result::Result<Vec<Difference>, ExError> {
    compute_diff_with(left, right, &DiffConfig::new(policy), selectors)
}

/// [`compute_diff`] with an explicit [`DiffConfig`].
///
/// # Errors
///
/// Same as [`compute_diff`].
pub fn compute_diff_with<T: Diffable>(
    left: &T,
    right: &T,
    config: &DiffConfig,
    selectors: &[Selector<T>],
) -> std::result::Result<Vec<Difference>, ExError> {
    let start = Instant::now();
    let run_id = RunId::new();
    let root = descriptor_of::<T>();
    log_op_start!(
        "compute_diff",
        run = run_id,
        root = root.type_name(),
        selectors = selectors.len()
    );

    let result = compile_all(selectors).and_then(|paths| {
        run(
            &ObjectRef::new(left),
            &ObjectRef::new(right),
            config,
            paths,
            &run_id,
        )
    });
    finish("compute_diff", result, start, &run_id, root.type_name())
}

/// Compare two type-erased roots.
///
/// # Errors
///
/// `RootTypeMismatch` when the roots are instances of different types, plus
/// everything [`compute_diff`] can return.
pub fn compute_object_diff(
    left: &ObjectRef<'_>,
    right: &ObjectRef<'_>,
    config: &DiffConfig,
    paths: &[CanonicalPath],
) -> std::result::Result<Vec<Difference>, ExError> {
    let start = Instant::now();
    let run_id = RunId::new();
    log_op_start!(
        "compute_object_diff",
        run = run_id,
        root = left.type_name(),
        selectors = paths.len()
    );

    let result = run(left, right, config, paths.to_vec(), &run_id);
    finish(
        "compute_object_diff",
        result,
        start,
        &run_id,
        left.type_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    struct Inner {
        value: i32,
    }

    struct Outer {
        name: String,
        inner: Option<Inner>,
        scores: Vec<i32>,
    }

    impl Diffable for Inner {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Inner")
                .scalar("Value", |i| Value::from(i.value))
                .build()
        }
    }

    impl Diffable for Outer {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Outer")
                .scalar("Name", |o| Value::from(&o.name))
                .object::<Inner, _>("Inner", |o| Value::optional_object(o.inner.as_ref()))
                .sequence("Scores", |o| Value::scalars(&o.scores))
                .build()
        }
    }

    fn outer(name: &str, inner: Option<i32>, scores: Vec<i32>) -> Outer {
        Outer {
            name: name.to_string(),
            inner: inner.map(|value| Inner { value }),
            scores,
        }
    }

    #[test]
    fn test_identical_objects_have_no_differences() {
        let a = outer("a", Some(1), vec![1, 2]);
        let diffs = compute_diff(&a, &a, ComparisonPolicy::ALL, &[]).unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_members_reported_in_declaration_order() {
        let a = outer("a", Some(1), vec![1, 2]);
        let b = outer("b", Some(4), vec![1, 3]);
        let diffs = compute_diff(&a, &b, ComparisonPolicy::ALL, &[]).unwrap();
        let paths: Vec<String> = diffs.iter().map(Difference::property).collect();
        assert_eq!(paths, vec![".Name", ".Inner.Value", ".Scores"]);
        assert_eq!(diffs[2].array_index, Some(1));
    }

    #[test]
    fn test_null_nested_object_is_one_difference() {
        let a = outer("a", None, vec![]);
        let b = outer("a", Some(1), vec![]);
        let diffs = compute_diff(&a, &b, ComparisonPolicy::ALL, &[]).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::NullMismatch);
        assert_eq!(diffs[0].delta, None);
        assert_eq!(
            diffs[0].right,
            DiffValue::Object {
                type_name: "Inner".to_string()
            }
        );
    }

    #[test]
    fn test_object_roots_of_different_types_are_rejected() {
        let a = outer("a", None, vec![]);
        let b = Inner { value: 1 };
        let err = compute_object_diff(
            &ObjectRef::new(&a),
            &ObjectRef::new(&b),
            &DiffConfig::default(),
            &[],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::RootTypeMismatch);
        assert_eq!(err.op(), Some("compute_object_diff"));
    }

    #[test]
    fn test_invalid_selector_fails_whole_call() {
        let a = outer("a", None, vec![]);
        let selectors = [Selector::<Outer>::root().member("Nope")];
        let err = compute_diff(&a, &a, ComparisonPolicy::ALL, &selectors).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidSelector);
        assert_eq!(err.op(), Some("compute_diff"));
    }
}
