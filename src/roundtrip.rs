use colored::Colorize;
use thiserror::Error;

/// Per-iteration verification failures.
///
/// These are the functional failures of a round trip, as opposed to the
/// transport errors the vendor clients raise. Their display strings are the
/// rationale a failed test prints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundTripError {
    #[error("no message received for '{body}'")]
    NoMessage { body: String },
    #[error("body mismatch: sent '{sent}', got '{received}'")]
    BodyMismatch { sent: String, received: String },
}

/// Body for iteration `index` of `total`.
///
/// The session token is always embedded so concurrent runs against a shared
/// queue stay isolated; the index suffix only appears in multi-message runs.
pub fn message_body(prefix: &str, session_id: &str, index: usize, total: usize) -> String {
    if total == 1 {
        format!("{prefix}-{session_id}")
    } else {
        format!("{prefix}-{session_id}-{index}")
    }
}

/// Check one delivery against the body that was sent.
pub fn verify_delivery(sent: &str, received: Option<&str>) -> Result<(), RoundTripError> {
    match received {
        None => Err(RoundTripError::NoMessage {
            body: sent.to_owned(),
        }),
        Some(received) if received != sent => Err(RoundTripError::BodyMismatch {
            sent: sent.to_owned(),
            received: received.to_owned(),
        }),
        Some(_) => Ok(()),
    }
}

/// Outcome of one test path.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub name: &'static str,
    pub passed: bool,
    /// Printed cause on failure; `None` on a pass.
    pub rationale: Option<String>,
}

impl TestOutcome {
    pub fn pass(name: &'static str) -> Self {
        Self {
            name,
            passed: true,
            rationale: None,
        }
    }

    pub fn fail(name: &'static str, rationale: String) -> Self {
        Self {
            name,
            passed: false,
            rationale: Some(rationale),
        }
    }
}

/// The error-containment boundary of a test path.
///
/// Nothing escapes a test function: a failure is printed with its full
/// cause chain and folded into the outcome, and only the final verdict
/// logic looks at it again.
pub fn contain(name: &'static str, result: anyhow::Result<()>) -> TestOutcome {
    match result {
        Ok(()) => {
            println!("{}\n", "RESULT: PASS".green());
            TestOutcome::pass(name)
        }
        Err(err) => {
            println!("{} - {:#}\n", "RESULT: FAIL".red(), err);
            // Full chain for triage, stderr so automation can split it off.
            eprintln!("{:?}", err);
            TestOutcome::fail(name, format!("{err:#}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_message_body_single_message_form() {
        assert_eq!(message_body("sync", "test-ab12cd34", 0, 1), "sync-test-ab12cd34");
        assert_eq!(
            message_body("async", "test-ab12cd34", 0, 1),
            "async-test-ab12cd34"
        );
    }

    #[test]
    fn test_message_body_multi_message_form() {
        assert_eq!(message_body("sync", "test-ab12cd34", 2, 5), "sync-test-ab12cd34-2");
    }

    #[test]
    fn test_verify_delivery_accepts_exact_match() {
        assert_eq!(verify_delivery("sync-test-1234", Some("sync-test-1234")), Ok(()));
    }

    #[test]
    fn test_verify_delivery_reports_absence() {
        let err = verify_delivery("sync-test-1234", None).unwrap_err();
        assert_eq!(err.to_string(), "no message received for 'sync-test-1234'");
    }

    #[test]
    fn test_verify_delivery_reports_mismatch() {
        let err = verify_delivery("sync-a", Some("sync-b")).unwrap_err();
        assert_eq!(err.to_string(), "body mismatch: sent 'sync-a', got 'sync-b'");
    }

    #[test]
    fn test_contain_converts_errors_to_failed_outcomes() {
        let outcome = contain("sync", Err(anyhow!("boom")));
        assert!(!outcome.passed);
        assert_eq!(outcome.rationale.as_deref(), Some("boom"));

        let outcome = contain("sync", Ok(()));
        assert!(outcome.passed);
        assert!(outcome.rationale.is_none());
    }
}
