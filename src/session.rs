use uuid::Uuid;

/// Generate the per-run session identifier.
///
/// Every invocation gets a fresh token, so repeated runs against a shared
/// queue cannot observe each other's messages. The token rides on every
/// message the run sends and scopes what the receivers accept.
pub fn generate_session_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("test-{}", &token[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        assert!(id.starts_with("test-"));
        assert_eq!(id.len(), "test-".len() + 8);
        assert!(id["test-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_ids_are_unique_per_generation() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
