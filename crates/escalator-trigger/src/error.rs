//! Error types for trigger configuration.

/// Errors raised while building or loading a trigger configuration.
///
/// Marking events never fails; every error here surfaces at construction
/// time so a misconfigured trigger is rejected before it sees any events.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The event count threshold must be at least 1.
    #[error("event count threshold must be at least 1")]
    ZeroThreshold,

    /// The maximum interval is shorter than the minimum interval.
    #[error("max interval ({max}) must not be less than min interval ({min})")]
    IntervalOrder {
        /// Configured minimum interval, in ticks.
        min: u64,
        /// Configured maximum interval, in ticks.
        max: u64,
    },

    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override held a value that could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Name of the environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}
