//! # Verdict Classification
//!
//! The final stage of a run: fold the two test outcomes into a three-way
//! verdict, print the summary table, and hand `main` an exit code that
//! automation can branch on.

use colored::Colorize;

use crate::roundtrip::TestOutcome;

/// Three-way classification of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Both paths passed; the defect did not show up.
    NotReproduced,
    /// The baseline passed and the async path failed: the reported defect.
    BugConfirmed,
    /// The baseline itself failed; the comparison is invalid.
    InfraFailure,
}

impl Verdict {
    /// Classify two outcomes.
    ///
    /// A sync failure dominates regardless of the async outcome: a broken
    /// baseline points at the environment or credentials, not the bug.
    pub fn classify(sync_passed: bool, async_passed: bool) -> Self {
        match (sync_passed, async_passed) {
            (false, _) => Verdict::InfraFailure,
            (true, false) => Verdict::BugConfirmed,
            (true, true) => Verdict::NotReproduced,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::NotReproduced => 0,
            Verdict::BugConfirmed => 1,
            Verdict::InfraFailure => 2,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::NotReproduced => "bug not reproduced: sync and async round trips both passed",
            Verdict::BugConfirmed => "bug confirmed: sync passed, async failed",
            Verdict::InfraFailure => "environment/credential problem: the sync baseline failed",
        }
    }
}

/// Print the summary table and the verdict line, returning the verdict.
pub fn report(sync: &TestOutcome, async_outcome: &TestOutcome) -> Verdict {
    let widths = [6, 6, 48];

    println!("SUMMARY");
    print_table_separator(&widths);
    print_table_row(&["Test", "Result", "Detail"], &widths);
    print_table_separator(&widths);
    for outcome in [sync, async_outcome] {
        let result = if outcome.passed { "PASS" } else { "FAIL" };
        let detail = outcome.rationale.as_deref().unwrap_or("-");
        print_table_row(&[outcome.name, result, detail], &widths);
    }
    print_table_separator(&widths);
    println!();

    let verdict = Verdict::classify(sync.passed, async_outcome.passed);
    let line = format!(
        "VERDICT: {} (exit {})",
        verdict.describe(),
        verdict.exit_code()
    );
    match verdict {
        Verdict::NotReproduced => println!("{}", line.green()),
        Verdict::BugConfirmed => println!("{}", line.red()),
        Verdict::InfraFailure => println!("{}", line.yellow()),
    }
    verdict
}

fn print_table_row(columns: &[&str], widths: &[usize]) {
    print!("|");
    for (i, column) in columns.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(10);
        print!(" {:width$} |", column, width = width);
    }
    println!();
}

fn print_table_separator(widths: &[usize]) {
    print!("+");
    for &width in widths {
        print!("{}", "-".repeat(width + 2));
        print!("+");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_matrix() {
        assert_eq!(Verdict::classify(true, true), Verdict::NotReproduced);
        assert_eq!(Verdict::classify(true, false), Verdict::BugConfirmed);
        assert_eq!(Verdict::classify(false, true), Verdict::InfraFailure);
        assert_eq!(Verdict::classify(false, false), Verdict::InfraFailure);
    }

    /// A failing baseline must never classify as "bug confirmed", even when
    /// the async path failed too.
    #[test]
    fn test_sync_failure_takes_priority() {
        assert_eq!(Verdict::classify(false, false).exit_code(), 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Verdict::NotReproduced.exit_code(), 0);
        assert_eq!(Verdict::BugConfirmed.exit_code(), 1);
        assert_eq!(Verdict::InfraFailure.exit_code(), 2);
    }

    #[test]
    fn test_classification_is_stable_across_calls() {
        let first = Verdict::classify(true, true);
        let second = Verdict::classify(true, true);
        assert_eq!(first, second);
        assert_eq!(first.exit_code(), 0);
    }

    #[test]
    fn test_report_returns_the_classification() {
        let sync = TestOutcome::pass("sync");
        let async_outcome = TestOutcome::fail("async", "socket-option setup failed".to_owned());
        assert_eq!(report(&sync, &async_outcome), Verdict::BugConfirmed);
    }
}
