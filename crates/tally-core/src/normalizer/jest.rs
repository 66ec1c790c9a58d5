//! Jest / vitest console summary.
//!
//! ```text
//! Test Suites: 1 failed, 3 passed, 4 total
//! Tests:       1 failed, 1 skipped, 54 passed, 56 total
//! Snapshots:   0 total
//! Time:        0.312 s
//! ```
//!
//! The counters on the `Tests:` line may appear in any order and any of them
//! may be missing. `todo` counts as skipped.

use std::sync::LazyLock;

use regex::Regex;

use super::{add, parse_count, seconds_to_millis, Dialect};
use crate::types::{CaseStatus, Counts, TestCase};

static TESTS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Tests:[ \t]+(.*\d+ total.*)$").expect("jest tests regex"));
static COUNTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) (passed|failed|skipped|todo|total)\b").expect("jest counter regex")
});
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Time:[ \t]+([0-9.]+)[ \t]*(ms|s)\b").expect("jest time regex"));
static SUITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(PASS|FAIL)[ \t]+(\S+)").expect("jest suite regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct JestText;

impl Dialect for JestText {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn detect(&self, text: &str) -> bool {
        TESTS_LINE_RE.is_match(text)
    }

    fn extract(&self, text: &str) -> Counts {
        let mut counts = Counts::default();
        let Some(line) = TESTS_LINE_RE.captures(text) else {
            return counts;
        };
        for caps in COUNTER_RE.captures_iter(&line[1]) {
            let label = &caps[2];
            let value = parse_count(label, &caps[1]);
            let slot = match label {
                "passed" => &mut counts.passed,
                "failed" => &mut counts.failed,
                "total" => &mut counts.total,
                _ => &mut counts.skipped,
            };
            add(slot, value);
        }
        counts.duration_ms = TIME_RE.captures(text).and_then(|caps| match &caps[2] {
            "ms" => parse_count("time", caps[1].split('.').next().unwrap_or("")),
            _ => seconds_to_millis("time", &caps[1]),
        });
        counts
    }

    /// One case per test file, from the `PASS` / `FAIL` suite headers.
    fn cases(&self, text: &str) -> Vec<TestCase> {
        SUITE_RE
            .captures_iter(text)
            .map(|caps| {
                let status = if &caps[1] == "PASS" {
                    CaseStatus::Passed
                } else {
                    CaseStatus::Failed
                };
                TestCase::new(&caps[2], status)
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
    use crate::types::{DurationMs, Status};
    use pretty_assertions::assert_eq;

    const RUN: &str = "\
PASS src/sum.test.js
FAIL src/div.test.js
  ● div › by zero

Test Suites: 1 failed, 1 passed, 2 total
Tests:       1 failed, 1 skipped, 1 todo, 54 passed, 57 total
Snapshots:   0 total
Time:        0.312 s
Ran all test suites.
";

    #[test]
    fn counters_in_any_order() {
        let record = JestText.normalize(RUN);
        assert_eq!(record.passed(), 54);
        assert_eq!(record.failed(), 1);
        assert_eq!(record.skipped(), 2);
        assert_eq!(record.total(), 57);
        assert_eq!(record.duration(), Some(DurationMs(312)));
        assert_eq!(record.status(), Status::Failed);
    }

    #[test]
    fn suite_line_is_not_the_tests_line() {
        // Only `Tests:` is read; `Test Suites:` counts files.
        let record = JestText.normalize("Test Suites: 2 passed, 2 total\nTests: 9 passed, 9 total\n");
        assert_eq!(record.passed(), 9);
        assert!(!JestText.detect("Test Suites: 2 passed, 2 total\n"));
    }

    #[test]
    fn time_in_milliseconds_and_estimates() {
        let record = JestText.normalize("Tests: 1 passed, 1 total\nTime: 845 ms\n");
        assert_eq!(record.duration(), Some(DurationMs(845)));
        let record = JestText.normalize("Tests: 1 passed, 1 total\nTime:        2.5 s, estimated 3 s\n");
        assert_eq!(record.duration(), Some(DurationMs(2500)));
    }

    #[test]
    fn suites_become_cases() {
        let cases = JestText.cases(RUN);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "src/sum.test.js");
        assert_eq!(cases[1].status, CaseStatus::Failed);
    }
}
