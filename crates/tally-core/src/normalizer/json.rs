//! JSON report dialects: mocha `--reporter json`, jest `--json`, and
//! pytest-json-report.
//!
//! A report may be preceded by unrelated log lines, some of which may be JSON
//! themselves (structured logging). Every line that opens with `{` is a
//! candidate; the first one that parses as a complete object of the wanted
//! shape is the report, and parsing stops after that one value.

use serde_json::Value;

use super::{float_seconds_to_millis, Dialect};
use crate::types::{CaseStatus, Counts, DurationMs, TestCase};

/// Mocha nests its counters under `stats`; jest keeps them at the top level;
/// pytest puts them under `summary` with `error` counted separately.
enum Shape<'a> {
    Mocha(&'a Value),
    Jest(&'a Value),
    Pytest(&'a Value),
}

/// Byte offsets where a JSON object could start: the beginning of the text
/// and every line that opens with `{`.
fn candidates(text: &str) -> impl Iterator<Item = usize> + '_ {
    let head = text.starts_with('{').then_some(0);
    head.into_iter()
        .chain(text.match_indices("\n{").map(|(idx, _)| idx + 1))
}

/// The first candidate object for which `accept` finds a known shape.
fn parse_report<T>(text: &str, accept: impl Fn(&Value) -> Option<T>) -> Option<(Value, T)> {
    candidates(text).find_map(|start| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next()? {
            Ok(value) if value.is_object() => {
                let found = accept(&value)?;
                Some((value, found))
            }
            _ => None,
        }
    })
}

fn shape(report: &Value) -> Option<Shape<'_>> {
    if let Some(stats) = report.get("stats").filter(|s| s.get("tests").is_some_and(Value::is_u64)) {
        return Some(Shape::Mocha(stats));
    }
    if report.get("numTotalTests").is_some_and(Value::is_u64) {
        return Some(Shape::Jest(report));
    }
    if let Some(summary) = report
        .get("summary")
        .filter(|s| s.get("total").is_some_and(Value::is_u64))
    {
        return Some(Shape::Pytest(summary));
    }
    None
}

fn is_mocha_or_jest(report: &Value) -> Option<()> {
    matches!(shape(report)?, Shape::Mocha(_) | Shape::Jest(_)).then_some(())
}

fn is_pytest(report: &Value) -> Option<()> {
    matches!(shape(report)?, Shape::Pytest(_)).then_some(())
}

fn num(obj: &Value, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

fn sum(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
    }
}

fn string(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn millis(obj: &Value, key: &str) -> Option<DurationMs> {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| DurationMs(ms.round() as u64))
}

fn seconds(obj: &Value, key: &str) -> Option<u64> {
    obj.get(key)
        .and_then(Value::as_f64)
        .and_then(|secs| float_seconds_to_millis(key, secs))
}

fn array<'a>(obj: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

// ---------------------------------------------------------------------------
// mocha / jest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl Dialect for JsonReport {
    fn name(&self) -> &'static str {
        "json"
    }

    fn detect(&self, text: &str) -> bool {
        parse_report(text, is_mocha_or_jest).is_some()
    }

    fn extract(&self, text: &str) -> Counts {
        let Some((report, ())) = parse_report(text, is_mocha_or_jest) else {
            return Counts::default();
        };
        match shape(&report) {
            Some(Shape::Mocha(stats)) => Counts {
                passed: num(stats, "passes"),
                failed: num(stats, "failures"),
                skipped: num(stats, "pending"),
                total: num(stats, "tests"),
                duration_ms: millis(stats, "duration").map(DurationMs::as_millis),
                ..Counts::default()
            },
            Some(Shape::Jest(report)) => Counts {
                passed: num(report, "numPassedTests"),
                failed: num(report, "numFailedTests"),
                skipped: sum(num(report, "numPendingTests"), num(report, "numTodoTests")),
                total: num(report, "numTotalTests"),
                ..Counts::default()
            },
            _ => Counts::default(),
        }
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        let Some((report, ())) = parse_report(text, is_mocha_or_jest) else {
            return Vec::new();
        };
        match shape(&report) {
            Some(Shape::Mocha(_)) => mocha_cases(&report),
            Some(Shape::Jest(_)) => jest_cases(&report),
            _ => Vec::new(),
        }
    }
}

/// Mocha lists tests again under `passes`, `failures` and `pending`.
fn mocha_cases(report: &Value) -> Vec<TestCase> {
    let lists = [
        ("passes", CaseStatus::Passed),
        ("failures", CaseStatus::Failed),
        ("pending", CaseStatus::Skipped),
    ];
    lists
        .into_iter()
        .flat_map(|(key, status)| array(report, key).map(move |test| (test, status)))
        .map(|(test, status)| {
            let name = string(test, "fullTitle")
                .or_else(|| string(test, "title"))
                .unwrap_or_default();
            let mut case = TestCase::new(name, status);
            case.duration = millis(test, "duration");
            case.message = test.get("err").and_then(|err| string(err, "message"));
            case
        })
        .collect()
}

fn jest_cases(report: &Value) -> Vec<TestCase> {
    array(report, "testResults")
        .flat_map(|suite| {
            let file = string(suite, "name");
            array(suite, "assertionResults").map(move |test| (file.clone(), test))
        })
        .map(|(file, test)| {
            let status = match test.get("status").and_then(Value::as_str) {
                Some("passed") => CaseStatus::Passed,
                Some("failed") => CaseStatus::Failed,
                _ => CaseStatus::Skipped,
            };
            let name = string(test, "fullName")
                .or_else(|| string(test, "title"))
                .unwrap_or_default();
            let mut case = TestCase::new(name, status);
            case.classname = file;
            case.duration = millis(test, "duration");
            case.message = array(test, "failureMessages")
                .filter_map(Value::as_str)
                .next()
                .map(str::to_string);
            case
        })
        .collect()
}

// ---------------------------------------------------------------------------
// pytest-json-report
// ---------------------------------------------------------------------------

/// `pytest --json-report`. Counters come from `summary`; `error` counts as
/// failed and is also reported as errors. `duration` is in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PytestJson;

impl Dialect for PytestJson {
    fn name(&self) -> &'static str {
        "pytest-json"
    }

    fn detect(&self, text: &str) -> bool {
        parse_report(text, is_pytest).is_some()
    }

    fn extract(&self, text: &str) -> Counts {
        let Some((report, ())) = parse_report(text, is_pytest) else {
            return Counts::default();
        };
        let Some(Shape::Pytest(summary)) = shape(&report) else {
            return Counts::default();
        };
        let errors = num(summary, "error");
        Counts {
            passed: num(summary, "passed"),
            failed: sum(num(summary, "failed"), errors),
            skipped: num(summary, "skipped"),
            errors,
            total: num(summary, "total"),
            duration_ms: seconds(&report, "duration"),
        }
    }

    fn cases(&self, text: &str) -> Vec<TestCase> {
        let Some((report, ())) = parse_report(text, is_pytest) else {
            return Vec::new();
        };
        array(&report, "tests")
            .map(|test| {
                let status = match test.get("outcome").and_then(Value::as_str) {
                    Some("passed" | "xpassed") => CaseStatus::Passed,
                    Some("failed") => CaseStatus::Failed,
                    Some("error") => CaseStatus::Error,
                    _ => CaseStatus::Skipped,
                };
                let mut case = TestCase::new(string(test, "nodeid").unwrap_or_default(), status);
                let call = test.get("call");
                case.duration = seconds(test, "duration")
                    .or_else(|| call.and_then(|c| seconds(c, "duration")))
                    .map(DurationMs);
                case.message = call.and_then(|c| string(c, "longrepr"));
                case
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
