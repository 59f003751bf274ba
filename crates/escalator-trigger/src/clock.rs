//! Time sources for the trigger.
//!
//! The trigger only ever asks for "now" as an integer tick count. The unit is
//! up to the caller, as long as the configured intervals use the same one.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time in ticks.
pub trait Clock: Send + Sync {
    /// Returns the current time in ticks.
    fn now(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now(&self) -> u64 {
        self()
    }
}

/// Unit of a [`SystemClock`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickUnit {
    /// One tick per second.
    #[default]
    Seconds,
    /// One tick per millisecond.
    Millis,
}

impl std::str::FromStr for TickUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" | "secs" | "s" => Ok(Self::Seconds),
            "millis" | "ms" => Ok(Self::Millis),
            _ => Err(format!("unknown tick unit: {s}")),
        }
    }
}

/// Wall clock reporting ticks since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    unit: TickUnit,
}

impl SystemClock {
    /// Creates a system clock ticking in `unit`.
    pub fn new(unit: TickUnit) -> Self {
        Self { unit }
    }

    /// Returns the tick unit of this clock.
    pub fn unit(&self) -> TickUnit {
        self.unit
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A system clock set before the epoch reads as tick 0.
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        match self.unit {
            TickUnit::Seconds => since_epoch.as_secs(),
            TickUnit::Millis => u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// A clock that only moves when told to.
///
/// Useful for tests and for callers that already track their own notion of
/// time (e.g. a replayed event log).
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    pub fn new(start: u64) -> Self {
        Self {
            ticks: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward by `ticks`.
    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute reading.
    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}
