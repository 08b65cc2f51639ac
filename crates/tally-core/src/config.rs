//! Behavior configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/tally/config/behavior.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Missing keys in an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/behavior.toml");

/// Thresholds used by the analytics and behavior engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    /// Months in the trailing income/expense trend
    pub trailing_months: u32,
    /// Minimum age before an expense can be evaluated for regret
    pub eligibility_min_hours: i64,
    /// Age after which an unevaluated expense is no longer offered
    pub eligibility_max_hours: i64,
    /// Streak length the end-of-month letter must exceed to celebrate
    pub celebration_streak_days: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            trailing_months: 6,
            eligibility_min_hours: 24,
            eligibility_max_hours: 48,
            celebration_streak_days: 10,
        }
    }
}

impl BehaviorConfig {
    /// Load from an explicit path or the default override location
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(default_config_path);

        let content = match path {
            Some(ref path) if path.exists() => {
                debug!(path = %path.display(), "Loading behavior config override");
                fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }

    pub fn eligibility_min(&self) -> Duration {
        Duration::hours(self.eligibility_min_hours)
    }

    pub fn eligibility_max(&self) -> Duration {
        Duration::hours(self.eligibility_max_hours)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("behavior.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analytics: Option<RawAnalytics>,
    regret: Option<RawRegret>,
    letter: Option<RawLetter>,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    trailing_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawRegret {
    eligibility_min_hours: Option<i64>,
    eligibility_max_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawLetter {
    celebration_streak_days: Option<u32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<BehaviorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = BehaviorConfig::default();

    if let Some(analytics) = raw.analytics {
        if let Some(months) = analytics.trailing_months {
            config.trailing_months = months;
        }
    }

    if let Some(regret) = raw.regret {
        if let Some(min) = regret.eligibility_min_hours {
            config.eligibility_min_hours = min;
        }
        if let Some(max) = regret.eligibility_max_hours {
            config.eligibility_max_hours = max;
        }
    }

    if let Some(letter) = raw.letter {
        if let Some(days) = letter.celebration_streak_days {
            config.celebration_streak_days = days;
        }
    }

    if config.trailing_months == 0 {
        return Err(Error::Config("trailing_months must be at least 1".to_string()));
    }
    if config.eligibility_min_hours < 0
        || config.eligibility_max_hours <= config.eligibility_min_hours
    {
        return Err(Error::Config(format!(
            "Invalid regret eligibility window: {}h to {}h",
            config.eligibility_min_hours, config.eligibility_max_hours
        )));
    }

    Ok(config)
}
