//! JUnit XML dialect.
//!
//! Only the first `<testsuites>` or `<testsuite>` opening tag that carries a
//! `tests` attribute is read; nested suites are not walked. `failures` and
//! `errors` both count as failed (errors are also reported on their own),
//! and `passed` is whatever remains of `tests` after failures and skips.
//!
//! Every `<testcase>` element becomes a case; a `<failure>`, `<error>` or
//! `<skipped>` child decides its status and supplies the message.

use std::sync::LazyLock;

use regex::Regex;

use super::{parse_count, seconds_to_millis, Dialect};
use crate::types::{CaseStatus, Counts, DurationMs, TestCase};

static SUITE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<testsuites?\b([^>]*)>").expect("junit suite tag regex"));
static TESTS_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("tests"));
static FAILURES_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("failures"));
static ERRORS_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("errors"));
static SKIPPED_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("skipped"));
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("time"));
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("name"));
static CLASSNAME_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("classname"));
static MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("message"));
static CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<testcase\b([^>]*?)(?:/>|>(.*?)</testcase>)").expect("junit testcase regex")
});
static OUTCOME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(failure|error|skipped)\b([^>]*)").expect("junit outcome regex"));

fn attr_regex(name: &str) -> Regex {
    Regex::new(&format!(r#"(?:^|\s){name}\s*=\s*["']([^"']*)["']"#)).expect("junit attribute regex")
}

fn attr<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    re.captures(attrs).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn count(re: &Regex, label: &str, attrs: &str) -> Option<u64> {
    let value = attr(re, attrs)?.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_count(label, value)
}

/// Undo the five predefined XML entities.
fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn testcase(attrs: &str, body: &str) -> TestCase {
    let name = attr(&NAME_RE, attrs).map(unescape).unwrap_or_default();
    let mut case = TestCase::new(name, CaseStatus::Passed);
    case.classname = attr(&CLASSNAME_RE, attrs).map(unescape);
    case.duration = attr(&TIME_RE, attrs)
        .and_then(|t| seconds_to_millis("time", t))
        .map(DurationMs);
    if let Some(outcome) = OUTCOME_RE.captures(body) {
        case.status = match &outcome[1] {
            "failure" => CaseStatus::Failed,
            "error" => CaseStatus::Error,
            _ => CaseStatus::Skipped,
        };
        case.message = attr(&MESSAGE_RE, &outcome[2]).map(unescape);
    }
    case
}

/// Attribute text of the first suite tag with a numeric `tests` attribute.
fn first_suite(text: &str) -> Option<&str> {
    SUITE_TAG_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|attrs| count(&TESTS_RE, "tests", attrs).is_some())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Junit;

impl Dialect for Junit {
    fn name(&self) -> &'static str {
        "junit"
    }

    fn detect(&self, text: &str) -> bool {
        first_suite(text).is_some()
    }

    fn extract(&self, text: &str) -> Counts {
        let Some(attrs) = first_suite(text) else {
            return Counts::default();
        };

        let total = count(&TESTS_RE, "tests", attrs);
        let failures = count(&FAILURES_RE, "failures", attrs);
        let errors = count(&ERRORS_RE, "errors", attrs);
        let skipped = count(&SKIPPED_RE, "skipped", attrs);

        let failed = match (failures, errors) {
            (None, None) => None,
            (f, e) => Some(f.unwrap_or(0).saturating_add(e.unwrap_or(0))),
        };
        let passed = total.map(|t| {
            t.saturating_sub(failed.unwrap_or(0))
                .saturating_sub(skipped.unwrap_or(0))
        });

        Counts {
            passed,
            failed,
            skipped,
            errors,
            total,
            duration_ms: attr(&TIME_RE, attrs).and_then(|t| seconds_to_millis("time", t)),
        }
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        CASE_RE
            .captures_iter(text)
            .map(|caps| {
                let body = caps.get(2).map_or("", |m| m.as_str());
                testcase(&caps[1], body)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
