//! Trigger configuration loading from file and environment variables.
//!
//! Start-up only. [`load_config`] reads the file and the environment; the
//! rest of this module is pure, and the marking path only reads the
//! validated [`TriggerConfig`] it was built with.

use crate::clock::{SystemClock, TickUnit};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalatorConfig {
    /// Escalation parameters.
    #[serde(default)]
    pub trigger: TriggerConfig,

    /// Clock settings.
    #[serde(default)]
    pub clock: ClockConfig,
}

/// Parameters of an escalation trigger.
///
/// All intervals are in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Marks a streak needs before it may escalate.
    #[serde(default = "default_event_count_threshold")]
    pub event_count_threshold: u32,

    /// Minimum span between the first mark of a streak and the escalating mark.
    #[serde(default = "default_min_interval")]
    pub min_interval: u64,

    /// Largest gap between consecutive marks that keeps a streak alive.
    #[serde(default = "default_max_interval")]
    pub max_interval: u64,
}

/// Clock configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Tick unit of the system clock.
    #[serde(default)]
    pub unit: TickUnit,
}

fn default_event_count_threshold() -> u32 {
    3
}

fn default_min_interval() -> u64 {
    30
}

fn default_max_interval() -> u64 {
    60
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            event_count_threshold: default_event_count_threshold(),
            min_interval: default_min_interval(),
            max_interval: default_max_interval(),
        }
    }
}

impl TriggerConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the threshold is zero or `max_interval` is
    /// less than `min_interval`.
    pub fn new(
        event_count_threshold: u32,
        min_interval: u64,
        max_interval: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            event_count_threshold,
            min_interval,
            max_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroThreshold` or `ConfigError::IntervalOrder`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_count_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.max_interval < self.min_interval {
            return Err(ConfigError::IntervalOrder {
                min: self.min_interval,
                max: self.max_interval,
            });
        }
        Ok(())
    }

    /// Parses and validates a TOML document holding the trigger table's keys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document does not parse or fails validation.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

impl From<&ClockConfig> for SystemClock {
    fn from(config: &ClockConfig) -> Self {
        SystemClock::new(config.unit)
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ESCALATOR_THRESHOLD` overrides `trigger.event_count_threshold`
/// - `ESCALATOR_MIN_INTERVAL` overrides `trigger.min_interval`
/// - `ESCALATOR_MAX_INTERVAL` overrides `trigger.max_interval`
/// - `ESCALATOR_TICK_UNIT` overrides `clock.unit` ("seconds" or "millis")
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, if
/// an override cannot be parsed, or if the resulting configuration is invalid.
pub fn load_config(path: Option<&str>) -> Result<EscalatorConfig, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                EscalatorConfig::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => EscalatorConfig::default(),
    };

    let config = apply_overrides(config, |var| std::env::var(var).ok())?;
    config.trigger.validate()?;
    Ok(config)
}

/// Applies overrides looked up through `lookup` (normally the process
/// environment).
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnv` if a present override cannot be parsed.
pub fn apply_overrides<F>(
    mut config: EscalatorConfig,
    lookup: F,
) -> Result<EscalatorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("ESCALATOR_THRESHOLD") {
        config.trigger.event_count_threshold = parse_override("ESCALATOR_THRESHOLD", value)?;
    }
    if let Some(value) = lookup("ESCALATOR_MIN_INTERVAL") {
        config.trigger.min_interval = parse_override("ESCALATOR_MIN_INTERVAL", value)?;
    }
    if let Some(value) = lookup("ESCALATOR_MAX_INTERVAL") {
        config.trigger.max_interval = parse_override("ESCALATOR_MAX_INTERVAL", value)?;
    }
    if let Some(value) = lookup("ESCALATOR_TICK_UNIT") {
        config.clock.unit = parse_override("ESCALATOR_TICK_UNIT", value)?;
    }
    Ok(config)
}

fn parse_override<T: std::str::FromStr>(
    var: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(ConfigError::InvalidEnv { var, value }),
    }
}
