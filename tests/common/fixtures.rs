//! Static test-output corpora used across harnesses.
//!
//! Every corpus describes the same mixed run (56 tests, 54 passed, 1 failed,
//! 1 skipped, 312 ms) in a different dialect, so harnesses can check that
//! dialects agree.

use std::sync::LazyLock;

/// node:test TAP output, mixed result.
pub const TAP_MIXED: &str = "\
TAP version 13
# Subtest: math
ok 1 - adds
not ok 2 - subtracts
  ---
  duration_ms: 0.41
  failureType: 'testCodeFailure'
  ...
ok 3 - divides # SKIP not on this platform
1..56
# tests 56
# suites 4
# pass 54
# fail 1
# cancelled 0
# skipped 1
# todo 0
# duration_ms 312
";

/// node:test TAP output, every test passing.
pub const TAP_ALL_PASS: &str = "\
TAP version 13
ok 1 - adds
1..56
# tests 56
# pass 56
# fail 0
# cancelled 0
# skipped 0
# todo 0
# duration_ms 312
";

/// cargo test output across two binaries, summing to the mixed run.
pub const LIBTEST_MIXED: &str = "\
     Running unittests src/lib.rs (target/debug/deps/app-1f2e3d)

running 40 tests
test math::adds ... ok
test math::subtracts ... FAILED

test result: FAILED. 38 passed; 1 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.200s

     Running tests/api.rs (target/debug/deps/api-4a5b6c)

running 16 tests

test result: ok. 16 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.112s
";

/// JUnit XML, mixed run.
pub const JUNIT_MIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="suite" tests="56" failures="1" errors="0" skipped="1" time="0.312">
  <testsuite name="math" tests="56" failures="1" errors="0" skipped="1" time="0.312">
    <testcase name="adds" classname="math" time="0.001"/>
    <testcase name="subtracts" classname="math" time="0.001">
      <failure message="expected 1"/>
    </testcase>
  </testsuite>
</testsuites>
"#;

/// mocha `--reporter json`, mixed run.
pub const MOCHA_JSON_MIXED: &str = r#"{
  "stats": {
    "suites": 4,
    "tests": 56,
    "passes": 54,
    "pending": 1,
    "failures": 1,
    "start": "2024-01-15T10:00:00.000Z",
    "end": "2024-01-15T10:00:00.312Z",
    "duration": 312
  },
  "tests": [],
  "failures": [],
  "passes": []
}
"#;

/// pytest-json-report, mixed run. `duration` is in seconds.
pub const PYTEST_JSON_MIXED: &str = r#"{
  "created": 1705312800.0,
  "duration": 0.312,
  "exitcode": 1,
  "root": "/work",
  "summary": {"passed": 54, "failed": 1, "skipped": 1, "total": 56, "collected": 56},
  "tests": [
    {"nodeid": "tests/test_math.py::test_adds", "outcome": "passed", "call": {"duration": 0.001}},
    {"nodeid": "tests/test_math.py::test_subtracts", "outcome": "failed",
     "call": {"duration": 0.002, "longrepr": "assert 2 == 1"}}
  ]
}
"#;

/// jest console summary, mixed run.
pub const JEST_TEXT_MIXED: &str = "\
PASS src/add.test.js
FAIL src/subtract.test.js
  ● subtract › handles negatives

    expect(received).toBe(expected)

Test Suites: 1 failed, 3 passed, 4 total
Tests:       1 failed, 1 skipped, 54 passed, 56 total
Snapshots:   0 total
Time:        0.312 s
Ran all test suites.
";

/// `go test -v`, mixed run: 54 passing tests, one failure, one skip.
pub static GO_MIXED: LazyLock<String> = LazyLock::new(|| {
    let mut out = String::new();
    for i in 0..54 {
        out.push_str(&format!("=== RUN   TestPass{i:02}\n--- PASS: TestPass{i:02} (0.00s)\n"));
    }
    out.push_str(
        "=== RUN   TestDiv\n    calc_test.go:12: got 1, want 2\n--- FAIL: TestDiv (0.01s)\n\
         === RUN   TestNet\n    net_test.go:9: needs network\n--- SKIP: TestNet (0.00s)\n\
         FAIL\nFAIL\texample.com/calc\t0.312s\n",
    );
    out
});

/// Output no dialect understands.
pub const UNRECOGNISED: &[&str] = &[
    "",
    "\n\n",
    "Compiling app v0.1.0\nerror[E0425]: cannot find value `x` in this scope\n",
    "# pass 10\n# fail 0\n",
    "  # tests 3\n  # pass 3\n",
    "{\"level\":\"info\",\"msg\":\"listening\"}\n",
];

/// A TAP trailer with the given counters, in node:test's order.
pub fn tap_trailer(tests: u64, pass: u64, fail: u64, skipped: u64, duration_ms: Option<u64>) -> String {
    let mut out = format!(
        "# tests {tests}\n# pass {pass}\n# fail {fail}\n# cancelled 0\n# skipped {skipped}\n# todo 0\n"
    );
    if let Some(ms) = duration_ms {
        out.push_str(&format!("# duration_ms {ms}\n"));
    }
    out
}
