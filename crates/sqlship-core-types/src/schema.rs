//! Canonical schema constants for structured logging
//!
//! These constants keep field names identical across the store, transfer
//! and engine crates so log consumers can rely on them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Transfer fields
pub const FIELD_URL: &str = "url";
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_MAX_ATTEMPTS: &str = "max_attempts";
pub const FIELD_DELAY_MS: &str = "delay_ms";

// Store fields
pub const FIELD_PATH: &str = "path";
pub const FIELD_ROWS: &str = "rows";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_are_distinct() {
        assert_ne!(FIELD_ERR_KIND, FIELD_ERR_CODE);
    }
}
