//! Core types shared across the anydiff facilities
//!
//! This crate provides foundational types used by the diff engine's
//! error and logging facilities:
//!
//! - **Correlation types**: RunId, identifying one diff invocation in logs
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
