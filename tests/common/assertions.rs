//! Domain-specific assertion macros for tally harnesses.
//!
//! These add context to failures so it is clear which field of the summary
//! disagreed and what input produced it.

/// Assert a record's status, printing the whole record on failure.
///
/// ```rust
/// assert_status!(record, Status::Failed);
/// ```
#[macro_export]
macro_rules! assert_status {
    ($record:expr, $status:expr) => {{
        let record: &tally_core::SummaryRecord = &$record;
        let expected: tally_core::Status = $status;
        if record.status() != expected {
            panic!(
                "assert_status! failed:\n  expected: {:?}\n  actual:   {:?}\n  record:   {:?}",
                expected,
                record.status(),
                record
            );
        }
    }};
}

/// Assert that a record is the "could not interpret" record: all counters
/// zero, no duration, status unknown.
#[macro_export]
macro_rules! assert_uninterpreted {
    ($record:expr, $input:expr) => {{
        let record: &tally_core::SummaryRecord = &$record;
        if *record != tally_core::SummaryRecord::unknown() {
            panic!(
                "assert_uninterpreted! failed:\n  record: {:?}\n  input:  {:?}",
                record, $input
            );
        }
    }};
}
