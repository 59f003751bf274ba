//! Shared types for the escalator workspace.
//!
//! This crate provides the vocabulary exchanged between a logging subsystem
//! and the escalation trigger: the [`LoggingLevel`] severity enumeration and
//! the [`EventArg`] value type used for event arguments.
//!
//! The trigger itself treats levels as opaque tokens, so callers with their
//! own severity type can use it instead of [`LoggingLevel`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod arg;
pub use arg::{ErrorArg, EventArg};

/// Severity levels a logging subsystem reports events at.
///
/// Ordered from least to most severe, so `LoggingLevel::Warn < LoggingLevel::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoggingLevel {
    /// Fine-grained diagnostic output.
    Trace,
    /// Diagnostic output useful during development.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected that the system recovered from.
    Warn,
    /// A failure that needs attention.
    Error,
}

impl LoggingLevel {
    /// All levels, least severe first.
    pub const ALL: [LoggingLevel; 5] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Returns the canonical upper-case label for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoggingLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown logging level string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown logging level: {0}")]
pub struct ParseLevelError(pub String);
