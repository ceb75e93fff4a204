//! Operation boundary macros
//!
//! Every dispatched command logs one start event and exactly one of an end or
//! end_error event. All three expand through `__kdev_op_event!` so the
//! `component`/`op`/`event` triple is always present and always first.

#[doc(hidden)]
#[macro_export]
macro_rules! __kdev_op_event {
    ($level:ident, $op:expr, $event:ident; $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::kdev_core_types::schema::$event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use kdev_core::log_op_start;
/// log_op_start!("deploy_component");
/// log_op_start!("deploy_component", namespace = "development");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__kdev_op_event!(info, $op, EVENT_START; $($($field)*)?)
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use kdev_core::log_op_end;
/// log_op_end!("create_namespace", duration_ms = 12);
/// log_op_end!("compose", duration_ms = 40, plan = "dev environment");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__kdev_op_event!(
            info, $op, EVENT_END;
            duration_ms = $duration, $($($field)*)?
        )
    };
}

/// Log a failed operation with its stable error code
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use kdev_core::{log_op_error, errors::KdevError};
/// let err = KdevError::UnknownComponent { key: "kafkaa".to_string() };
/// log_op_error!("render", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__kdev_op_event!(
            error, $op, EVENT_END_ERROR;
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            message = ex_err.message(),
            $($($field)*)?
        )
    }};
}
