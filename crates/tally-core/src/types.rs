//! Core types for tally-core.
//!
//! This module defines the data shared by every layer: the [`RawOutput`] a
//! feed hands to the normalizer, the partial [`Counts`] a dialect extracts,
//! the immutable [`SummaryRecord`] with its derived [`Status`], and the
//! per-test [`TestCase`] rows some dialects can list.

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// RawOutput
// ---------------------------------------------------------------------------

/// Text produced by a test runner, as received from a feed.
///
/// No structure is assumed beyond line-oriented text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    text: String,
}

impl RawOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build from raw bytes, replacing invalid UTF-8 with U+FFFD.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<String> for RawOutput {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RawOutput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Overall outcome of a test run, derived from the pass/fail counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Failed,
    Passed,
    Unknown,
}

impl Status {
    /// Failures dominate; a run with neither passes nor failures is unknown,
    /// even when tests were skipped.
    pub fn derive(passed: u64, failed: u64) -> Self {
        if failed > 0 {
            Status::Failed
        } else if passed > 0 {
            Status::Passed
        } else {
            Status::Unknown
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Failed => write!(f, "failed"),
            Status::Passed => write!(f, "passed"),
            Status::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// DurationMs
// ---------------------------------------------------------------------------

/// A wall-clock duration in whole milliseconds. Displays as `312ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationMs(pub u64);

impl DurationMs {
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Human-friendly form for summaries: `312ms`, `3.12s`, `2m 5.0s`.
    pub fn human(self) -> String {
        let ms = self.0;
        if ms < 1_000 {
            format!("{ms}ms")
        } else if ms < 60_000 {
            format!("{:.2}s", ms as f64 / 1000.0)
        } else {
            format!("{}m {:.1}s", ms / 60_000, (ms % 60_000) as f64 / 1000.0)
        }
    }
}

impl std::fmt::Display for DurationMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl Serialize for DurationMs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// The partial result a dialect extracts. `None` means the field was not
/// found in the output.
///
/// `errors` is the subset of `failed` that crashed rather than asserted;
/// dialects that report errors separately add them into `failed` as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub passed: Option<u64>,
    pub failed: Option<u64>,
    pub skipped: Option<u64>,
    pub errors: Option<u64>,
    pub total: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl Counts {
    /// Fill a missing `total` with `passed + failed + skipped`, for formats
    /// that only report per-test lines.
    pub fn with_derived_total(mut self) -> Self {
        if self.total.is_none() {
            self.total = [self.passed, self.failed, self.skipped]
                .into_iter()
                .flatten()
                .reduce(u64::saturating_add);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// TestCase
// ---------------------------------------------------------------------------

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Error,
    Skipped,
}

impl CaseStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, CaseStatus::Failed | CaseStatus::Error)
    }
}

/// One test listed by the runner. Only used for the details sections of a
/// summary; counters always come from [`Counts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationMs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, status: CaseStatus) -> Self {
        Self {
            name: name.into(),
            classname: None,
            status,
            duration: None,
            message: None,
        }
    }

    /// `classname::name` when a class is known.
    pub fn display_name(&self) -> String {
        match &self.classname {
            Some(class) if !class.is_empty() => format!("{class}::{}", self.name),
            _ => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SummaryRecord
// ---------------------------------------------------------------------------

/// The normalised result of one test run.
///
/// `total` is read independently of the other counters and is never
/// cross-checked against `passed + failed + skipped`. `errors` is
/// informational and already included in `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    passed: u64,
    failed: u64,
    skipped: u64,
    errors: u64,
    total: u64,
    duration: Option<DurationMs>,
    status: Status,
}

impl SummaryRecord {
    /// Merge extracted counts with defaults and derive the status.
    pub fn from_counts(counts: Counts) -> Self {
        let passed = counts.passed.unwrap_or(0);
        let failed = counts.failed.unwrap_or(0);
        Self {
            passed,
            failed,
            skipped: counts.skipped.unwrap_or(0),
            errors: counts.errors.unwrap_or(0),
            total: counts.total.unwrap_or(0),
            duration: counts.duration_ms.map(DurationMs),
            status: Status::derive(passed, failed),
        }
    }

    /// The record for output that could not be interpreted at all.
    pub fn unknown() -> Self {
        Self::from_counts(Counts::default())
    }

    pub fn passed(&self) -> u64 {
        self.passed
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Percentage of `total` that passed; 0 when nothing ran.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn duration(&self) -> Option<DurationMs> {
        self.duration
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_failures_dominate() {
        assert_eq!(Status::derive(54, 1), Status::Failed);
        assert_eq!(Status::derive(0, 3), Status::Failed);
        assert_eq!(Status::derive(7, 0), Status::Passed);
        assert_eq!(Status::derive(0, 0), Status::Unknown);
    }

    #[test]
    fn all_skipped_is_unknown() {
        let record = SummaryRecord::from_counts(Counts {
            skipped: Some(4),
            total: Some(4),
            ..Counts::default()
        });
        assert_eq!(record.status(), Status::Unknown);
        assert_eq!(record.skipped(), 4);
    }

    #[test]
    fn unknown_record_has_no_duration() {
        let record = SummaryRecord::unknown();
        assert_eq!(record.total(), 0);
        assert_eq!(record.duration(), None);
        assert_eq!(record.status(), Status::Unknown);
    }

    #[test]
    fn duration_displays_with_ms_suffix() {
        assert_eq!(DurationMs(312).to_string(), "312ms");
        assert_eq!(DurationMs(0).to_string(), "0ms");
    }

    #[test]
    fn record_serializes_duration_as_string_or_null() {
        let with = SummaryRecord::from_counts(Counts {
            passed: Some(2),
            total: Some(2),
            duration_ms: Some(40),
            ..Counts::default()
        });
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["duration"], "40ms");
        assert_eq!(json["status"], "passed");

        let without = serde_json::to_value(SummaryRecord::unknown()).unwrap();
        assert!(without["duration"].is_null());
        assert_eq!(without["status"], "unknown");
    }

    #[test]
    fn human_duration_scales_units() {
        assert_eq!(DurationMs(312).human(), "312ms");
        assert_eq!(DurationMs(3_120).human(), "3.12s");
        assert_eq!(DurationMs(125_000).human(), "2m 5.0s");
    }

    #[test]
    fn pass_rate_is_zero_without_tests() {
        assert_eq!(SummaryRecord::unknown().pass_rate(), 0.0);
        let record = SummaryRecord::from_counts(Counts {
            passed: Some(54),
            total: Some(56),
            ..Counts::default()
        });
        assert!((record.pass_rate() - 96.428).abs() < 0.01);
    }

    #[test]
    fn derived_total_only_fills_gaps() {
        let counts = Counts {
            passed: Some(3),
            failed: Some(1),
            ..Counts::default()
        };
        assert_eq!(counts.with_derived_total().total, Some(4));
        let counts = Counts {
            total: Some(9),
            ..counts
        };
        assert_eq!(counts.with_derived_total().total, Some(9));
        assert_eq!(Counts::default().with_derived_total().total, None);
    }

    #[test]
    fn display_name_includes_class() {
        let mut case = TestCase::new("adds", CaseStatus::Passed);
        assert_eq!(case.display_name(), "adds");
        case.classname = Some("math".to_string());
        assert_eq!(case.display_name(), "math::adds");
    }

    #[test]
    fn raw_output_from_invalid_utf8_is_lossy() {
        let raw = RawOutput::from_bytes(b"# tests 1\n\xff\xfe# pass 1\n");
        assert!(raw.as_str().contains('\u{FFFD}'));
        assert_eq!(raw.lines().count(), 2);
    }
}
