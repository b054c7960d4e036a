//! Environment overrides for the binary.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `FLIP_RUNNER_AIR_ACTION` | `doubleJump`, `gravitySwitch` | `gravitySwitch` |
//! | `FLIP_RUNNER_GROUND` | `centerLine`, `walls` | `centerLine` |
//! | `FLIP_RUNNER_TAP_WINDOW_MS` | integer | `300` |
//! | `FLIP_RUNNER_LOG_FILE` | path | `logs/flip-runner.log` |

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::core::SimConfig;
use crate::logging::DEFAULT_LOG_FILE;
use crate::types::{AirActionKind, GroundMode, DOUBLE_TAP_WINDOW_MS};

pub const ENV_AIR_ACTION: &str = "FLIP_RUNNER_AIR_ACTION";
pub const ENV_GROUND: &str = "FLIP_RUNNER_GROUND";
pub const ENV_TAP_WINDOW_MS: &str = "FLIP_RUNNER_TAP_WINDOW_MS";
pub const ENV_LOG_FILE: &str = "FLIP_RUNNER_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sim: SimConfig,
    pub tap_window_ms: u64,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(v) = lookup(ENV_AIR_ACTION) {
            let kind = parse_air_action(&v).with_context(|| format!("reading {}", ENV_AIR_ACTION))?;
            settings.sim = settings.sim.with_air_action(kind);
        }
        if let Some(v) = lookup(ENV_GROUND) {
            let mode = parse_ground_mode(&v).with_context(|| format!("reading {}", ENV_GROUND))?;
            settings.sim = settings.sim.with_ground_mode(mode);
        }
        if let Some(v) = lookup(ENV_TAP_WINDOW_MS) {
            settings.tap_window_ms = v
                .trim()
                .parse::<u64>()
                .with_context(|| {
                    format!("reading {}: not an integer: {:?}", ENV_TAP_WINDOW_MS, v)
                })?;
        }
        if let Some(v) = lookup(ENV_LOG_FILE) {
            settings.log_file = PathBuf::from(v);
        }
        Ok(settings)
    }
}

pub fn parse_air_action(s: &str) -> Result<AirActionKind> {
    AirActionKind::from_str(s.trim()).ok_or_else(|| anyhow!("unknown air action: {}", s))
}

pub fn parse_ground_mode(s: &str) -> Result<GroundMode> {
    GroundMode::from_str(s.trim()).ok_or_else(|| anyhow!("unknown ground mode: {}", s))
}
