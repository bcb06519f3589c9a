//! Configuration loading for rategate.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.rategate/config.toml`)
//! 3. User config (`~/.rategate/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The engine runs with the stock policy
//! (threshold 5, 7 days, 3 asks per year) when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{FailOpen, RateGateError, Result};

/// Main configuration struct for rategate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Eligibility thresholds.
    pub policy: PolicyConfig,
    /// Happiness counter behavior.
    pub happiness: HappinessConfig,
    /// Ask flow behavior.
    pub ask: AskConfig,
    /// Version gate behavior.
    pub version: VersionConfig,
}

/// Eligibility thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Happiness must be a non-zero multiple of this value.
    pub happiness_threshold: u32,
    /// Days that must pass after first launch before asking.
    pub days_after_first_launch: u32,
    /// Maximum recorded asks per calendar year.
    pub max_asks_per_year: u32,
}

/// Minimum valid happiness threshold (it is used as a divisor).
pub const MIN_HAPPINESS_THRESHOLD: u32 = 1;

impl PolicyConfig {
    /// Check if a happiness threshold is valid (must be >= 1).
    pub fn is_valid_happiness_threshold(value: u32) -> bool {
        value >= MIN_HAPPINESS_THRESHOLD
    }

    /// Threshold coerced to a usable divisor.
    ///
    /// A zero threshold from a hand-edited file or a programmatic config
    /// behaves as 1.
    pub fn effective_happiness_threshold(&self) -> u32 {
        self.happiness_threshold.max(MIN_HAPPINESS_THRESHOLD)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            happiness_threshold: 5,
            days_after_first_launch: 7,
            max_asks_per_year: 3,
        }
    }
}

/// Happiness counter behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HappinessConfig {
    /// Never decrement below zero.
    pub floor_at_zero: bool,
}

impl Default for HappinessConfig {
    fn default() -> Self {
        Self {
            floor_at_zero: true,
        }
    }
}

/// What happens when a happiness increment makes the user eligible.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AskTrigger {
    /// Only update eligibility; the host calls `ask_for_review` itself.
    #[default]
    Explicit,
    /// Ask immediately from `increment_happiness` when eligible.
    OnThreshold,
}

/// Valid values for the ask trigger field.
pub const VALID_TRIGGERS: &[&str] = &["explicit", "on_threshold"];

impl FromStr for AskTrigger {
    type Err = RateGateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "explicit" => Ok(AskTrigger::Explicit),
            "on_threshold" => Ok(AskTrigger::OnThreshold),
            other => Err(RateGateError::config(format!(
                "unknown ask trigger '{}', expected one of {:?}",
                other, VALID_TRIGGERS
            ))),
        }
    }
}

impl fmt::Display for AskTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskTrigger::Explicit => write!(f, "explicit"),
            AskTrigger::OnThreshold => write!(f, "on_threshold"),
        }
    }
}

/// Ask flow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AskConfig {
    /// Whether eligible increments ask on their own.
    pub trigger: AskTrigger,
    /// Shell command the CLI runs when a prompt is requested.
    pub prompt_command: Option<String>,
}

/// Version gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VersionConfig {
    /// Compare `release (build)` instead of the release string alone.
    pub include_build: bool,
}

/// Settings read from one config file.
///
/// Only keys present in the file are `Some`, so a higher layer can set a
/// value back to its default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct ConfigLayer {
    policy: PolicyLayer,
    happiness: HappinessLayer,
    ask: AskLayer,
    version: VersionLayer,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct PolicyLayer {
    happiness_threshold: Option<u32>,
    days_after_first_launch: Option<u32>,
    max_asks_per_year: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct HappinessLayer {
    floor_at_zero: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct AskLayer {
    trigger: Option<AskTrigger>,
    prompt_command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct VersionLayer {
    include_build: Option<bool>,
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.rategate/config.toml` in cwd)
    /// 3. User config (`~/.rategate/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `<rategate_home>/config.toml`.
    fn load_user_config() -> Option<ConfigLayer> {
        let path = rategate_home()?.join("config.toml");
        Self::load_optional(&path)
    }

    /// Load project config from `.rategate/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<ConfigLayer> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// Load a config file if it exists, warning (not failing) when it is broken.
    fn load_optional(path: &Path) -> Option<ConfigLayer> {
        if !path.exists() {
            return None;
        }
        Self::load_layer(path)
            .map(Some)
            .fail_open_with(&format!("loading {}", path.display()), None)
    }

    /// Read the keys set in one config file.
    fn load_layer(path: &Path) -> Result<ConfigLayer> {
        let content = fs::read_to_string(path).map_err(|e| RateGateError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| RateGateError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // RATEGATE_HAPPINESS_THRESHOLD
        if let Ok(val) = env::var("RATEGATE_HAPPINESS_THRESHOLD") {
            match val.parse::<u32>() {
                Ok(n) if PolicyConfig::is_valid_happiness_threshold(n) => {
                    self.policy.happiness_threshold = n;
                }
                Ok(n) => tracing::warn!(
                    "Invalid RATEGATE_HAPPINESS_THRESHOLD value '{}'. Must be >= {}. Using '{}'.",
                    n,
                    MIN_HAPPINESS_THRESHOLD,
                    self.policy.happiness_threshold
                ),
                Err(_) => tracing::warn!(
                    "Invalid RATEGATE_HAPPINESS_THRESHOLD value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val,
                    self.policy.happiness_threshold
                ),
            }
        }

        // RATEGATE_DAYS_AFTER_FIRST_LAUNCH
        if let Ok(val) = env::var("RATEGATE_DAYS_AFTER_FIRST_LAUNCH") {
            match val.parse::<u32>() {
                Ok(n) => self.policy.days_after_first_launch = n,
                Err(_) => tracing::warn!(
                    "Invalid RATEGATE_DAYS_AFTER_FIRST_LAUNCH value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val,
                    self.policy.days_after_first_launch
                ),
            }
        }

        // RATEGATE_MAX_ASKS_PER_YEAR
        if let Ok(val) = env::var("RATEGATE_MAX_ASKS_PER_YEAR") {
            match val.parse::<u32>() {
                Ok(n) => self.policy.max_asks_per_year = n,
                Err(_) => tracing::warn!(
                    "Invalid RATEGATE_MAX_ASKS_PER_YEAR value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val,
                    self.policy.max_asks_per_year
                ),
            }
        }

        // RATEGATE_FLOOR_AT_ZERO
        if let Ok(val) = env::var("RATEGATE_FLOOR_AT_ZERO") {
            match parse_bool(&val) {
                Some(floor) => self.happiness.floor_at_zero = floor,
                None => tracing::warn!(
                    "Invalid RATEGATE_FLOOR_AT_ZERO value '{}'. \
                    Expected true, false, 1 or 0. Using '{}'.",
                    val,
                    self.happiness.floor_at_zero
                ),
            }
        }

        // RATEGATE_ASK_TRIGGER
        if let Ok(val) = env::var("RATEGATE_ASK_TRIGGER") {
            match val.parse::<AskTrigger>() {
                Ok(trigger) => self.ask.trigger = trigger,
                Err(_) => tracing::warn!(
                    "Invalid RATEGATE_ASK_TRIGGER value '{}'. Valid values: {:?}. Using '{}'.",
                    val,
                    VALID_TRIGGERS,
                    self.ask.trigger
                ),
            }
        }

        // RATEGATE_PROMPT_COMMAND
        if let Ok(val) = env::var("RATEGATE_PROMPT_COMMAND") {
            self.ask.prompt_command = if val.trim().is_empty() {
                None
            } else {
                Some(val)
            };
        }
    }

    /// Apply the keys a config layer sets, field by field.
    fn merge(mut self, layer: ConfigLayer) -> Self {
        if let Some(value) = layer.policy.happiness_threshold {
            self.policy.happiness_threshold = value;
        }
        if let Some(value) = layer.policy.days_after_first_launch {
            self.policy.days_after_first_launch = value;
        }
        if let Some(value) = layer.policy.max_asks_per_year {
            self.policy.max_asks_per_year = value;
        }

        if let Some(value) = layer.happiness.floor_at_zero {
            self.happiness.floor_at_zero = value;
        }

        if let Some(value) = layer.ask.trigger {
            self.ask.trigger = value;
        }
        // An empty command in a higher layer clears a lower one
        if let Some(command) = layer.ask.prompt_command {
            self.ask.prompt_command = if command.trim().is_empty() {
                None
            } else {
                Some(command)
            };
        }

        if let Some(value) = layer.version.include_build {
            self.version.include_build = value;
        }

        self
    }
}

/// Parse a boolean environment value.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Get the rategate home directory.
///
/// Checks `RATEGATE_HOME` first, then falls back to `~/.rategate`.
/// An empty `RATEGATE_HOME` is ignored.
pub fn rategate_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("RATEGATE_HOME") {
        if home.is_empty() {
            tracing::warn!("RATEGATE_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("RATEGATE_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(".rategate"))
}

/// Default path of the persisted counter state.
///
/// Returns `<rategate_home>/state.json`.
pub fn state_path() -> Option<PathBuf> {
    rategate_home().map(|h| h.join("state.json"))
}

/// Project config file path for a working directory.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(".rategate").join("config.toml")
}
