//! Vendor client adapters.
//!
//! Both modules follow the same sequence against the configured queue:
//! preflight the transport, open a client, open a sender and a
//! session-scoped receiver, then send / receive / verify / acknowledge N
//! times. The vendor crates own everything protocol-shaped.

pub mod amqp_async;
pub mod amqp_sync;

/// A delivery belongs to this run when its body carries the run's session
/// token. Deliveries from other runs are returned to the queue untouched.
pub(crate) fn belongs_to_session(body: &str, session_id: &str) -> bool {
    body.contains(session_id)
}

/// Pause between requeue and the next receive attempt, so a foreign
/// delivery bouncing back to this consumer does not spin the wait loop.
pub(crate) const REDELIVERY_BACKOFF_MS: u64 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ownership_by_body_token() {
        assert!(belongs_to_session("sync-test-ab12cd34", "test-ab12cd34"));
        assert!(belongs_to_session("async-test-ab12cd34-3", "test-ab12cd34"));
        assert!(!belongs_to_session("sync-test-99999999", "test-ab12cd34"));
        assert!(!belongs_to_session("", "test-ab12cd34"));
    }
}
