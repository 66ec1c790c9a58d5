//! Error type for tally-core.
//!
//! Normalization is infallible; these errors only arise from configuration
//! that names something tally does not know about.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown dialect {name:?} (expected \"auto\" or one of: {known})")]
    UnknownDialect { name: String, known: String },

    #[error("unknown output format {0:?} (expected markdown, outputs, json or text)")]
    UnknownFormat(String),
}
