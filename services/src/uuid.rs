use uuid::Uuid;

/// Fresh opaque session key (UUID v4, hyphenated).
///
/// Sessions have no stored attributes; the key only correlates chat turns.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh identifier for a persisted chat turn.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
