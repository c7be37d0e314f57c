//! AnyDiff Core - structural diffing of in-memory object graphs
//!
//! This crate compares two instances of the same type member by member and
//! reports every difference with the canonical path where it was found,
//! including:
//! - Type descriptors built once per type and cached process-wide
//! - Positional, out-of-order, keyed and set-like collection matching
//! - Member filtering by exclusion or inclusion lists of typed selectors
//! - Opt-in semantic equality overrides per type
//! - Comparison of schemaless records (`DynValue`, JSON documents)
//! - Markdown summaries of difference lists

pub mod descriptor;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod path;
pub mod policy;
pub mod value;

// Re-export commonly used types
pub use descriptor::{descriptor_of, CustomEquality, Diffable, MemberKind, TypeDescriptor};
pub use diff::{
    are_equal, compute_diff, compute_diff_with, compute_dynamic_diff, compute_object_diff,
    render_human_summary, DiffValue, Difference, DifferenceKind, DynValue,
};
pub use errors::{DiffError, EqualityError, ExError, ExErrorKind};
pub use path::{CanonicalPath, Selector};
pub use policy::{ComparisonPolicy, DiffConfig};
pub use value::{Delta, ObjectRef, Scalar, Value};
