//! Boundary logging macros
//!
//! Every public entry point logs exactly one start event and exactly one end
//! or end_error event. Field keys follow `anydiff_core_types::schema`.

/// Log the start of an operation
///
/// The `run = .., root = .., selectors = ..` form is the one diff entry points
/// use: it records the run id, the root type name and how many paths filter
/// the comparison.
///
/// # Example
///
/// ```
/// # use anydiff_core::log_op_start;
/// use anydiff_core_types::RunId;
///
/// log_op_start!("compute_diff");
/// log_op_start!("compute_diff", root_type = "Order");
///
/// let run_id = RunId::new();
/// let paths = [".Lines"];
/// log_op_start!("compute_diff", run = run_id, root = "Order", selectors = paths.len());
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, run = $run_id:expr, root = $root:expr, selectors = $count:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_START,
            run_id = $run_id.as_str(),
            root_type = $root,
            selector_count = $count as u64,
        );
    };
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// With `diffs = ..` the event carries `diff_count` taken from the returned
/// difference list.
///
/// # Example
///
/// ```
/// # use anydiff_core::log_op_end;
/// log_op_end!("compute_diff", duration_ms = 3, diff_count = 2);
///
/// let diffs: Vec<anydiff_core::Difference> = Vec::new();
/// log_op_end!("compute_diff", diffs = diffs, duration_ms = 1, root_type = "Order");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, diffs = $diffs:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            diff_count = $diffs.len() as u64,
            $($field)*
        );
    };
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation failure with its stable error kind and code
///
/// # Example
///
/// ```
/// # use anydiff_core::log_op_error;
/// use anydiff_core::errors::DiffError;
///
/// let err = DiffError::InvalidPath {
///     path: "keys".to_string(),
///     reason: "path must start with '.'".to_string(),
/// };
/// log_op_error!("compute_dynamic_diff", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = anydiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
