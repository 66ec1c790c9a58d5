//! Configuration types for tally.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults, a
//! `tally.toml` file, and `TALLY_*` environment variables (sections separated
//! by `__`, e.g. `TALLY_GATE__ALLOW_UNKNOWN=true`). [`Config::defaults`]
//! returns the embedded defaults without touching the filesystem or the
//! environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::render::Format;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[normalizer]
dialect          = "auto"
generic_fallback = false

[render]
format       = "markdown"
title        = "Test results"
badge        = true
show_details = false
show_passed  = false
max_lines    = 100

[gate]
max_failed    = 0
allow_unknown = false
"#;

/// File consulted when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

const ENV_PREFIX: &str = "TALLY";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// `[normalizer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    /// `auto` tries every built-in dialect; any other value pins one.
    #[serde(default = "default_dialect")]
    pub dialect: String,
    /// With `auto`, fall back to loose `N passed` phrases when nothing else
    /// matches.
    #[serde(default)]
    pub generic_fallback: bool,
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_format")]
    pub format: Format,
    #[serde(default = "default_title")]
    pub title: String,
    /// Show the status line under the title.
    #[serde(default = "default_true")]
    pub badge: bool,
    /// List failed tests and include the raw output.
    #[serde(default)]
    pub show_details: bool,
    #[serde(default)]
    pub show_passed: bool,
    /// Raw output lines shown with `show_details`; 0 shows everything.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

/// `[gate]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Largest number of failed tests that still passes the gate.
    #[serde(default)]
    pub max_failed: u64,
    /// Let an uninterpretable run pass instead of reporting it inconclusive.
    #[serde(default)]
    pub allow_unknown: bool,
}

fn default_dialect() -> String { "auto".to_string() }
fn default_format() -> Format { Format::Markdown }
fn default_title() -> String { "Test results".to_string() }
fn default_true() -> bool { true }
fn default_max_lines() -> usize { 100 }

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            generic_fallback: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            title: default_title(),
            badge: true,
            show_details: false,
            show_passed: false,
            max_lines: default_max_lines(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_failed: 0,
            allow_unknown: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration. An explicit `path` must exist; without one,
    /// `./tally.toml` is used if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE).as_path()).required(false),
        };

        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        tracing::debug!(?cfg, "configuration loaded");
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
