//! Names shared by the logging macros, the test capture and log consumers
//!
//! Every engine operation emits a `start` event and then exactly one of
//! `end` or `end_error`, all tagged with the operation name under `op`.

/// Operation began
pub const EVENT_START: &str = "start";
/// Operation returned `Ok`
pub const EVENT_END: &str = "end";
/// Operation returned `Err`; the event carries `err.kind` and `err.code`
pub const EVENT_END_ERROR: &str = "end_error";

/// Boundary events in emission order
pub const LIFECYCLE_EVENTS: [&str; 3] = [EVENT_START, EVENT_END, EVENT_END_ERROR];

/// Field keys that appear on every boundary event
pub const BOUNDARY_FIELDS: [&str; 3] = ["component", "op", "event"];

/// Field keys that only `end_error` carries
pub const ERROR_FIELDS: [&str; 4] = ["err.kind", "err.code", "err.message", "err.entity_id"];

/// Entity keys commands attach when they know them
pub mod entity {
    pub const PROJECT: &str = "project_id";
    pub const BRANCH: &str = "branch_id";
    pub const COMMIT: &str = "commit_id";
    pub const MERGE_REQUEST: &str = "merge_request_id";
    pub const STASH: &str = "stash_id";
}

/// True for `end` and `end_error`
pub fn is_terminal_event(event: &str) -> bool {
    event == EVENT_END || event == EVENT_END_ERROR
}

/// True for any of the three boundary events
pub fn is_lifecycle_event(event: &str) -> bool {
    LIFECYCLE_EVENTS.contains(&event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(!is_terminal_event(EVENT_START));
        assert!(is_terminal_event(EVENT_END));
        assert!(is_terminal_event(EVENT_END_ERROR));
        assert!(!is_terminal_event("commit"));
    }

    #[test]
    fn test_lifecycle_events_unique() {
        let mut names = LIFECYCLE_EVENTS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LIFECYCLE_EVENTS.len());
        assert!(is_lifecycle_event("end_error"));
        assert!(!is_lifecycle_event("merge"));
    }

    #[test]
    fn test_error_fields_do_not_overlap_boundary_fields() {
        for key in ERROR_FIELDS {
            assert!(key.starts_with("err."));
            assert!(!BOUNDARY_FIELDS.contains(&key));
        }
    }
}
