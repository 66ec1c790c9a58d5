//! `go test -v` dialect.
//!
//! ```text
//! === RUN   TestAdd
//! --- PASS: TestAdd (0.00s)
//! === RUN   TestDiv
//! --- FAIL: TestDiv (0.01s)
//! FAIL
//! FAIL	example.com/calc	0.012s
//! ```
//!
//! Counters come from unindented `--- PASS|FAIL|SKIP:` lines; indented lines
//! are subtests and are already reflected in their parent's result. Duration
//! is the sum of the per-package `ok` / `FAIL` lines.

use std::sync::LazyLock;

use regex::Regex;

use super::{add, seconds_to_millis, Dialect};
use crate::types::{CaseStatus, Counts, DurationMs, TestCase};

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^--- (PASS|FAIL|SKIP): (\S+) \(([0-9.]+)s\)").expect("go result regex")
});
static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:ok|FAIL)[ \t]+\S+[ \t]+([0-9.]+)s").expect("go package regex")
});

fn status(word: &str) -> CaseStatus {
    match word {
        "PASS" => CaseStatus::Passed,
        "FAIL" => CaseStatus::Failed,
        _ => CaseStatus::Skipped,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoTest;

impl Dialect for GoTest {
    fn name(&self) -> &'static str {
        "go"
    }

    fn detect(&self, text: &str) -> bool {
        RESULT_RE.is_match(text)
    }

    fn extract(&self, text: &str) -> Counts {
        let mut counts = Counts::default();
        for caps in RESULT_RE.captures_iter(text) {
            let slot = match status(&caps[1]) {
                CaseStatus::Passed => &mut counts.passed,
                CaseStatus::Skipped => &mut counts.skipped,
                _ => &mut counts.failed,
            };
            add(slot, Some(1));
        }
        for caps in PACKAGE_RE.captures_iter(text) {
            add(&mut counts.duration_ms, seconds_to_millis("package time", &caps[1]));
        }
        counts.with_derived_total()
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        RESULT_RE
            .captures_iter(text)
            .map(|caps| {
                let mut case = TestCase::new(&caps[2], status(&caps[1]));
                case.duration = seconds_to_millis("test time", &caps[3]).map(DurationMs);
                case
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use pretty_assertions::assert_eq;

    const VERBOSE: &str = "\
=== RUN   TestAdd
--- PASS: TestAdd (0.00s)
=== RUN   TestTable
=== RUN   TestTable/zero
    --- PASS: TestTable/zero (0.00s)
--- PASS: TestTable (0.00s)
=== RUN   TestSkip
    calc_test.go:30: needs network
--- SKIP: TestSkip (0.00s)
=== RUN   TestDiv
    calc_test.go:12: got 1, want 2
--- FAIL: TestDiv (0.01s)
FAIL
FAIL\texample.com/calc\t0.012s
ok  \texample.com/calc/internal\t0.300s
";

    #[test]
    fn counts_top_level_results() {
        let record = GoTest.normalize(VERBOSE);
        assert_eq!(record.passed(), 2);
        assert_eq!(record.failed(), 1);
        assert_eq!(record.skipped(), 1);
        assert_eq!(record.total(), 4);
        assert_eq!(record.duration(), Some(DurationMs(312)));
        assert_eq!(record.status(), Status::Failed);
    }

    #[test]
    fn single_failure_with_package_line() {
        let record = GoTest.normalize("--- FAIL: TestB (0.01s)\nFAIL\texample.com/pkg\t0.012s\n");
        assert_eq!(record.failed(), 1);
        assert_eq!(record.total(), 1);
        assert_eq!(record.duration(), Some(DurationMs(12)));
        assert_eq!(record.status(), Status::Failed);
    }

    #[test]
    fn package_summary_alone_is_not_detected() {
        assert!(!GoTest.detect("ok  \texample.com/calc\t0.012s\n"));
    }

    #[test]
    fn cases_carry_durations() {
        let cases = GoTest.cases(VERBOSE);
        assert_eq!(cases.len(), 4);
        assert_eq!(cases[3].name, "TestDiv");
        assert_eq!(cases[3].status, CaseStatus::Failed);
        assert_eq!(cases[3].duration, Some(DurationMs(10)));
    }
}
