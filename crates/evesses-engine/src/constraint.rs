//! Constraint tracker — per-turn usage bookkeeping.
//!
//! A plain map from opaque string key to an attempt counter. The
//! Request phase checks *and* consumes a slot for every declarative
//! constraint on an effect, so a later negation or failed resolution
//! does not refund the usage. The host clears the tracker explicitly,
//! typically at turn end.

use evesses_effect::EffectError;
use std::collections::HashMap;

/// Usage counters keyed by opaque constraint keys.
///
/// # Example
///
/// ```
/// use evesses_engine::ConstraintTracker;
///
/// let mut tracker = ConstraintTracker::new();
///
/// assert!(tracker.check_once_per_turn("pot").is_ok());
/// tracker.mark_used("pot");
/// assert!(tracker.check_once_per_turn("pot").is_err());
///
/// tracker.clear(); // turn end
/// assert!(tracker.check_once_per_turn("pot").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintTracker {
    counters: HashMap<String, u32>,
}

impl ConstraintTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
        }
    }

    /// Fails iff `key` is already present.
    pub fn check_once_per_turn(&self, key: &str) -> Result<(), EffectError> {
        if self.counters.contains_key(key) {
            Err(EffectError::ConstraintViolated(key.to_string()))
        } else {
            Ok(())
        }
    }

    /// Marks `key` as used. Idempotent.
    pub fn mark_used(&mut self, key: impl Into<String>) {
        self.counters.entry(key.into()).or_insert(1);
    }

    /// Fails iff `key` has already been used `max` or more times.
    pub fn check_times_per_turn(&self, key: &str, max: u32) -> Result<(), EffectError> {
        if self.usage(key) >= max {
            Err(EffectError::ConstraintViolated(key.to_string()))
        } else {
            Ok(())
        }
    }

    /// Adds one use of `key`.
    pub fn increment_usage(&mut self, key: impl Into<String>) {
        *self.counters.entry(key.into()).or_insert(0) += 1;
    }

    /// Current usage count of `key` (zero if absent).
    #[must_use]
    pub fn usage(&self, key: &str) -> u32 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Drops all counters. Idempotent; typically called at turn end.
    pub fn clear(&mut self) {
        self.counters.clear();
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
