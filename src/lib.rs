//! tally — normalise test-runner output for CI pipelines.
//!
//! The binary is a thin shell over this library so integration tests can
//! drive a whole invocation without spawning a process.
//!
//! ```text
//! Feed / counts ──► Registry::normalize ──► render ──► stdout, outputs file,
//!                                             │         step summary
//!                                             └──► gate ──► exit code
//! ```

pub mod app;
pub mod cli;

pub use app::execute;
pub use cli::{Cli, Command};
