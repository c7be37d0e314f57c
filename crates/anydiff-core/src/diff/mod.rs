//! Structural diff engine.
//!
//! Compares two object graphs member by member and produces a flat,
//! deterministic list of [`Difference`]s.
//!
//! ## Entry points
//!
//! ```ignore
//! use anydiff_core::diff::{compute_diff, render_human_summary};
//!
//! let diffs = compute_diff(&before, &after, ComparisonPolicy::ALL, &[])?;
//! println!("{}", render_human_summary(&diffs));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: members are visited in descriptor order, keyed entries in
//!   key order; repeated calls on unchanged input give identical output.
//! - **Termination**: a left-hand object already being compared is skipped.
//!   An optional `max_depth` turns excessive nesting into an error.
//! - **All or nothing**: a call either returns the complete list or fails.

pub mod dynamic;
pub mod engine;
pub mod equality;
pub mod human_summary;
pub(crate) mod matcher;
pub mod model;

pub use dynamic::{compute_dynamic_diff, DynValue};
pub use engine::{compute_diff, compute_diff_with, compute_object_diff};
pub use equality::{are_equal, numeric_delta};
pub use human_summary::render_human_summary;
pub use model::{DiffValue, Difference, DifferenceKind};
