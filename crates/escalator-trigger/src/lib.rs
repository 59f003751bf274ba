//! Time-windowed escalation trigger.
//!
//! A logging subsystem calls [`EscalationTrigger::mark_and_trigger`] every
//! time a loggable event occurs. The trigger groups occurrences into streaks
//! by a derived key and answers `true` once a streak has recurred often
//! enough, for long enough, without going quiet in between. What escalation
//! means (a louder level, a page, an alert channel) is up to the caller.
//!
//! # Parameters
//!
//! | Parameter | Meaning |
//! |-----------|---------|
//! | `event_count_threshold` | marks a streak needs before it may escalate |
//! | `min_interval` | ticks between the first mark and the escalating mark |
//! | `max_interval` | largest gap between consecutive marks before the streak restarts |
//!
//! # Configuration
//!
//! [`load_config`] is the only function in this crate that touches the
//! filesystem or the process environment. It is meant to run once at
//! start-up; [`apply_overrides`] and [`TriggerConfig::from_toml_str`] are
//! the I/O-free halves of it. Once built, a trigger reads nothing but its
//! [`Clock`], and [`EscalationTrigger::mark_and_trigger`] performs no I/O
//! beyond `tracing` events.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use escalator_trigger::{EscalationTrigger, ManualClock};
//! use escalator_types::{EventArg, LoggingLevel};
//!
//! let clock = Arc::new(ManualClock::new(0));
//! let trigger: EscalationTrigger = EscalationTrigger::with_params(clock.clone(), 3, 30, 60)?;
//! let args = [EventArg::from("connection refused")];
//!
//! assert!(!trigger.mark_and_trigger(&LoggingLevel::Warn, &args));
//! clock.advance(30);
//! assert!(!trigger.mark_and_trigger(&LoggingLevel::Warn, &args));
//! clock.advance(30);
//! assert!(trigger.mark_and_trigger(&LoggingLevel::Warn, &args));
//! # Ok::<(), escalator_trigger::ConfigError>(())
//! ```

mod clock;
mod config;
mod error;
mod key;
mod trigger;

pub use clock::{Clock, ManualClock, SystemClock, TickUnit};
pub use config::{apply_overrides, load_config, ClockConfig, EscalatorConfig, TriggerConfig};
pub use error::ConfigError;
pub use key::{DefaultKeyBuilder, EventKeyBuilder, KeyFilter, PerLevelKeyBuilder};
pub use trigger::{EscalationTrigger, EventRecord};
