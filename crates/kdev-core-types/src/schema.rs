//! Canonical field keys and event names for structured logging

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Composition summary
pub const FIELD_STEP_COUNT: &str = "step_count";
pub const FIELD_FAILED_COUNT: &str = "failed_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
