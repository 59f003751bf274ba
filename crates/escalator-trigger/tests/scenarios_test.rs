use std::sync::Arc;

use escalator_trigger::{EscalationTrigger, KeyFilter, ManualClock};
use escalator_types::{EventArg, LoggingLevel};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Drives a trigger through `(advance, expected)` steps for one event.
fn run_steps(
    trigger: &EscalationTrigger,
    clock: &ManualClock,
    args: &[EventArg],
    steps: &[(u64, bool)],
) {
    for (i, (advance, expected)) in steps.iter().enumerate() {
        clock.advance(*advance);
        let escalated = trigger.mark_and_trigger(&LoggingLevel::Error, args);
        assert_eq!(
            escalated, *expected,
            "step {i} at t={} should return {expected}",
            escalator_trigger::Clock::now(clock)
        );
    }
}

#[test]
fn steady_recurrence_escalates_on_third_mark() {
    init_tracing();
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 3, 30, 60).unwrap();
    let args = [EventArg::from("db timeout")];

    run_steps(&trigger, &clock, &args, &[(0, false), (30, false), (30, true)]);
}

#[test]
fn uneven_gaps_within_max_interval_still_escalate() {
    init_tracing();
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 3, 30, 60).unwrap();
    let args = [EventArg::from("db timeout")];

    // Third mark: count 3, elapsed 70. The fourth opens a new streak.
    run_steps(
        &trigger,
        &clock,
        &args,
        &[(0, false), (30, false), (40, true), (30, false)],
    );
}

#[test]
fn a_seventy_tick_gap_restarts_the_streak() {
    init_tracing();
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 3, 30, 60).unwrap();
    let args = [EventArg::from("db timeout")];

    run_steps(
        &trigger,
        &clock,
        &args,
        &[(0, false), (30, false), (70, false), (30, false), (30, true)],
    );
}

#[test]
fn higher_threshold_waits_for_fourth_mark() {
    init_tracing();
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 4, 30, 60).unwrap();
    let args = [EventArg::from("db timeout")];

    run_steps(
        &trigger,
        &clock,
        &args,
        &[(0, false), (30, false), (30, false), (10, true)],
    );
}

#[test]
fn constant_key_merges_different_payloads() {
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 2, 0, 60)
        .unwrap()
        .with_key_builder(|_: &LoggingLevel, _: &[&EventArg]| "same-key".to_string());

    assert!(!trigger.mark_and_trigger(&LoggingLevel::Debug, &[EventArg::from("event")]));
    assert!(trigger.mark_and_trigger(&LoggingLevel::Debug, &[EventArg::from(42)]));
}

#[test]
fn error_filter_groups_calls_by_error_type() {
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 2, 0, 60)
        .unwrap()
        .with_key_filter(KeyFilter::errors_only());

    assert!(!trigger.mark_and_trigger(
        &LoggingLevel::Warn,
        &[
            EventArg::from("a"),
            EventArg::from(1),
            EventArg::from(std::io::Error::other("connection refused")),
        ]
    ));
    // Same error type, different message and surrounding arguments.
    assert!(trigger.mark_and_trigger(
        &LoggingLevel::Warn,
        &[
            EventArg::from("b"),
            EventArg::from(std::io::Error::other("connection reset")),
        ]
    ));
    assert_eq!(trigger.tracked_keys(), 0);
}

#[test]
fn error_filter_separates_error_types() {
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 2, 0, 60)
        .unwrap()
        .with_key_filter(KeyFilter::errors_only());

    assert!(!trigger.mark_and_trigger(
        &LoggingLevel::Warn,
        &[EventArg::from(std::io::Error::other("connection refused"))]
    ));
    assert!(!trigger.mark_and_trigger(
        &LoggingLevel::Warn,
        &[EventArg::error(&std::fmt::Error)]
    ));
    assert_eq!(trigger.tracked_keys(), 2);
}

#[test]
fn marking_one_key_never_advances_another() {
    let clock = Arc::new(ManualClock::new(0));
    let trigger = EscalationTrigger::<LoggingLevel>::with_params(clock.clone(), 2, 0, 60).unwrap();
    let a = [EventArg::from("a")];
    let b = [EventArg::from("b")];

    assert!(!trigger.mark_and_trigger(&LoggingLevel::Info, &a));
    for _ in 0..10 {
        assert!(!trigger.mark_and_trigger(&LoggingLevel::Info, &b));
        assert!(trigger.mark_and_trigger(&LoggingLevel::Info, &b));
    }
    let key_a = trigger.event_key(&LoggingLevel::Info, &a);
    assert_eq!(trigger.streak(&key_a).map(|r| r.count), Some(1));
    assert!(trigger.mark_and_trigger(&LoggingLevel::Info, &a));
}

#[test]
fn system_clock_trigger_from_defaults() {
    let config = escalator_trigger::EscalatorConfig::default();
    let trigger: EscalationTrigger = EscalationTrigger::from_config(&config).unwrap();

    // Marks within one call burst never span the 30 second min interval.
    for _ in 0..5 {
        assert!(!trigger.mark_and_trigger(&LoggingLevel::Error, &[EventArg::from("burst")]));
    }
}
