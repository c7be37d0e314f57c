//! Structured logging facility for the diff engine
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) used by
//!   every public entry point, each event carrying the invocation's `run_id`
//! - Test capture mode for asserting on emitted events
//!
//! # Usage
//!
//! ```rust
//! use anydiff_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
