//! Event key derivation.
//!
//! Two marks belong to the same streak exactly when they derive the same
//! key. The [`KeyFilter`] picks which arguments are considered; the
//! [`EventKeyBuilder`] turns the level and the picked arguments into a key.

use escalator_types::EventArg;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Predicate selecting which event arguments take part in key derivation.
#[derive(Clone)]
pub struct KeyFilter(Arc<dyn Fn(&EventArg) -> bool + Send + Sync>);

impl KeyFilter {
    /// Wraps a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&EventArg) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// A filter keeping only error arguments.
    pub fn errors_only() -> Self {
        Self::new(EventArg::is_error)
    }

    /// Returns `true` if `arg` participates in key derivation.
    pub fn accepts(&self, arg: &EventArg) -> bool {
        (self.0)(arg)
    }

    /// Returns the accepted arguments, in their original order.
    pub fn select<'a>(&self, args: &'a [EventArg]) -> Vec<&'a EventArg> {
        args.iter().filter(|arg| self.accepts(arg)).collect()
    }
}

impl fmt::Debug for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyFilter(..)")
    }
}

/// Strategy deriving a streak key from a level and the selected arguments.
///
/// Implement this (or pass a closure) to change grouping granularity, e.g.
/// to fold every event of a level into a single streak.
pub trait EventKeyBuilder<L: ?Sized>: Send + Sync {
    /// Builds the key for one mark.
    fn build_key(&self, level: &L, args: &[&EventArg]) -> String;
}

impl<L, F> EventKeyBuilder<L> for F
where
    L: ?Sized,
    F: Fn(&L, &[&EventArg]) -> String + Send + Sync,
{
    fn build_key(&self, level: &L, args: &[&EventArg]) -> String {
        self(level, args)
    }
}

/// Keys on the level label plus every selected argument.
///
/// Plain values contribute their debug form, so `Text("7")` and `Int(7)`
/// stay apart. Errors contribute their type name only: two failures of the
/// same type with different messages share a streak.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyBuilder;

impl<L: fmt::Display + ?Sized> EventKeyBuilder<L> for DefaultKeyBuilder {
    fn build_key(&self, level: &L, args: &[&EventArg]) -> String {
        let mut key = format!("{level}:");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            // Writing into a String cannot fail.
            let _ = match arg {
                EventArg::Error(err) => write!(key, "Error({})", err.type_name),
                other => write!(key, "{other:?}"),
            };
        }
        key
    }
}

/// Keys on the level alone, ignoring every argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerLevelKeyBuilder;

impl<L: fmt::Display + ?Sized> EventKeyBuilder<L> for PerLevelKeyBuilder {
    fn build_key(&self, level: &L, _args: &[&EventArg]) -> String {
        level.to_string()
    }
}
