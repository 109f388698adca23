//! Operation-boundary logging macros.
//!
//! Engine commands wrap their work in `log_op_start!` and then exactly one of
//! `log_op_end!` or `log_op_error!`, so every operation leaves a
//! `start` → `end` / `end_error` pair keyed by `op`.
//!
//! The macros reach `tracing` and the schema constants through
//! `$crate::__private`, so callers need no extra dependencies to expand
//! them.

/// Shared expansion: one event at `$level` with the standard boundary fields
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)+)?) => {
        $crate::__private::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::$event
            $(, $($field)+)?
        )
    };
}

/// Operation started
///
/// ```
/// # use stepvc_core::log_op_start;
/// log_op_start!("commit");
/// log_op_start!("commit", project_id = "p1", branch_id = "branch:1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)+)?)
    };
}

/// Operation finished; `duration_ms` is required
///
/// ```
/// # use stepvc_core::log_op_end;
/// log_op_end!("merge_branches", duration_ms = 12);
/// log_op_end!("cleanup", duration_ms = 3, commits_removed = 5);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)+)?)
    };
}

/// Operation failed
///
/// `$err` is anything convertible into `ExError`. The event carries the
/// error's kind, stable code and message, plus the entity it concerns when
/// known.
///
/// ```
/// # use stepvc_core::{log_op_error, errors::VcsError};
/// let err = VcsError::BranchNotFound { branch: "main".to_string() };
/// log_op_error!("commit", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            err.entity_id = ex_err.entity_id().unwrap_or_default()
            $(, $($field)+)?
        )
    }};
}
