//! The time-windowed escalation trigger.

use crate::clock::{Clock, SystemClock};
use crate::config::{EscalatorConfig, TriggerConfig};
use crate::error::ConfigError;
use crate::key::{DefaultKeyBuilder, EventKeyBuilder, KeyFilter};
use escalator_types::{EventArg, LoggingLevel};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Streak bookkeeping for one event key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    /// Marks recorded since the streak started, including the first.
    pub count: u32,
    /// Tick of the mark that started the streak.
    pub first_mark_time: u64,
    /// Tick of the most recent mark.
    pub last_mark_time: u64,
}

impl EventRecord {
    fn started_at(now: u64) -> Self {
        Self {
            count: 1,
            first_mark_time: now,
            last_mark_time: now,
        }
    }
}

/// Decides when a recurring event should be escalated.
///
/// Every call to [`mark_and_trigger`](Self::mark_and_trigger) records one
/// occurrence of an event. Occurrences are grouped into streaks by key. A
/// streak escalates once it holds at least `event_count_threshold` marks
/// spanning at least `min_interval` ticks, provided no two consecutive marks
/// were more than `max_interval` ticks apart. Escalating ends the streak.
///
/// `L` is the level token. It is only used to derive keys, so any type the
/// key builder understands will do.
pub struct EscalationTrigger<L: ?Sized = LoggingLevel> {
    config: TriggerConfig,
    clock: Arc<dyn Clock>,
    key_builder: Box<dyn EventKeyBuilder<L>>,
    key_filter: Option<KeyFilter>,
    state: Mutex<HashMap<String, EventRecord>>,
}

impl<L: fmt::Display + ?Sized + 'static> EscalationTrigger<L> {
    /// Creates a trigger using the default key builder and no key filter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` is invalid.
    pub fn new(clock: Arc<dyn Clock>, config: TriggerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            key_builder: Box::new(DefaultKeyBuilder),
            key_filter: None,
            state: Mutex::new(HashMap::new()),
        })
    }

    /// Creates a trigger from raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the threshold is zero or `max_interval` is
    /// less than `min_interval`.
    pub fn with_params(
        clock: Arc<dyn Clock>,
        event_count_threshold: u32,
        min_interval: u64,
        max_interval: u64,
    ) -> Result<Self, ConfigError> {
        let config = TriggerConfig::new(event_count_threshold, min_interval, max_interval)?;
        Self::new(clock, config)
    }

    /// Creates a trigger driven by the system clock described in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the trigger section is invalid.
    pub fn from_config(config: &EscalatorConfig) -> Result<Self, ConfigError> {
        let clock = SystemClock::from(&config.clock);
        Self::new(Arc::new(clock), config.trigger)
    }
}

impl<L: ?Sized> EscalationTrigger<L> {
    /// Replaces the key derivation strategy.
    pub fn with_key_builder<B>(mut self, key_builder: B) -> Self
    where
        B: EventKeyBuilder<L> + 'static,
    {
        self.key_builder = Box::new(key_builder);
        self
    }

    /// Restricts key derivation to the arguments accepted by `filter`.
    pub fn with_key_filter(mut self, filter: KeyFilter) -> Self {
        self.key_filter = Some(filter);
        self
    }

    /// Returns the trigger parameters.
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Derives the streak key for an event.
    pub fn event_key(&self, level: &L, args: &[EventArg]) -> String {
        let selected = match &self.key_filter {
            Some(filter) => filter.select(args),
            None => args.iter().collect(),
        };
        self.key_builder.build_key(level, &selected)
    }

    /// Records one occurrence of an event and reports whether to escalate it.
    pub fn mark_and_trigger(&self, level: &L, args: &[EventArg]) -> bool {
        let key = self.event_key(level, args);
        let mut state = self.lock_state();
        let now = self.clock.now();

        let mut entry = match state.entry(key) {
            Entry::Vacant(vacant) => {
                tracing::trace!(key = %vacant.key(), now, "streak started");
                vacant.insert(EventRecord::started_at(now));
                return false;
            }
            Entry::Occupied(occupied) => occupied,
        };

        let record = entry.get_mut();
        let gap = now.saturating_sub(record.last_mark_time);
        if gap > self.config.max_interval {
            let missed = record.count;
            *record = EventRecord::started_at(now);
            tracing::debug!(
                key = %entry.key(),
                gap,
                count = missed,
                "gap exceeded max interval, streak restarted"
            );
            return false;
        }

        record.count = record.count.saturating_add(1);
        record.last_mark_time = now;
        let count = record.count;
        let elapsed = now.saturating_sub(record.first_mark_time);

        if count >= self.config.event_count_threshold && elapsed >= self.config.min_interval {
            let (key, _) = entry.remove_entry();
            tracing::debug!(key = %key, count, elapsed, "escalating event");
            return true;
        }

        tracing::trace!(key = %entry.key(), count, elapsed, "streak continued");
        false
    }

    /// Returns the current streak for `key`, if one is in progress.
    pub fn streak(&self, key: &str) -> Option<EventRecord> {
        self.lock_state().get(key).copied()
    }

    /// Number of keys with a streak in progress.
    pub fn tracked_keys(&self) -> usize {
        self.lock_state().len()
    }

    fn lock_state(&self) -> MutexGuard<'_, HashMap<String, EventRecord>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // The map only holds counters; a stale streak is harmless.
                tracing::error!("escalation trigger lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        }
    }
}

impl<L: ?Sized> fmt::Debug for EscalationTrigger<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalationTrigger")
            .field("config", &self.config)
            .field("key_filter", &self.key_filter)
            .field("tracked_keys", &self.tracked_keys())
            .finish_non_exhaustive()
    }
}
