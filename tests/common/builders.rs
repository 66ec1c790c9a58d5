//! Test builders — ergonomic constructors for expected [`SummaryRecord`]s.

use tally_core::{Counts, SummaryRecord};

/// Fluent builder for expected records. Fields left unset are absent, exactly
/// as if the normalizer had not found them.
#[derive(Default)]
pub struct RecordBuilder {
    counts: Counts,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passed(mut self, n: u64) -> Self {
        self.counts.passed = Some(n);
        self
    }

    pub fn failed(mut self, n: u64) -> Self {
        self.counts.failed = Some(n);
        self
    }

    pub fn skipped(mut self, n: u64) -> Self {
        self.counts.skipped = Some(n);
        self
    }

    /// Errors are a subset of failures; set `failed` to include them.
    pub fn errors(mut self, n: u64) -> Self {
        self.counts.errors = Some(n);
        self
    }

    pub fn total(mut self, n: u64) -> Self {
        self.counts.total = Some(n);
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.counts.duration_ms = Some(ms);
        self
    }

    pub fn build(self) -> SummaryRecord {
        SummaryRecord::from_counts(self.counts)
    }
}

/// The mixed run every `*_MIXED` fixture describes.
pub fn mixed_record() -> SummaryRecord {
    RecordBuilder::new()
        .passed(54)
        .failed(1)
        .skipped(1)
        .total(56)
        .duration_ms(312)
        .build()
}
