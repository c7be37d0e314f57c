//! Canonical paths, selectors and path filtering.

pub mod canonical;
pub mod selector;

pub use canonical::{CanonicalPath, FilterMode, PathFilter, Scope};
pub use selector::{compile_all, ProjectionStyle, Selector, Step};
