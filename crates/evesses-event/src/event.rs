//! Timing events — the immutable records of "something happened".
//!
//! A [`TimingEvent`] is produced by an action during Resolution and
//! becomes history during Commit, when the engine stamps it with a
//! monotonic timestamp and a snapshot of the open temporal scopes.
//! Triggers match events by `(timing, layer)` plus an optional filter
//! over the event's data.
//!
//! # Lifecycle
//!
//! ```text
//! action ──► TimingEvent::new("destroyed", 2)      (timestamp 0, no scopes)
//!                 │
//!                 ▼  Commit
//!          timestamp assigned, scope stack snapshotted,
//!          appended to history, matched against triggers
//! ```

use crate::ScopeFrame;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_layer() -> i32 {
    1
}

/// An immutable record of something that happened during resolution.
///
/// The `data` map is opaque to the engine; hosts use it to carry the
/// concrete payload (which card, how much damage, …). `timestamp` and
/// `scope_stack` are meaningful only once the event is committed.
///
/// # Example
///
/// ```
/// use evesses_event::TimingEvent;
/// use serde_json::json;
///
/// let event = TimingEvent::new("destroyed", 2)
///     .with_data("card", json!("Mystic Tomato"))
///     .with_data("by_battle", json!(true));
///
/// assert!(event.matches("destroyed", 2));
/// assert_eq!(event.data("card"), Some(&json!("Mystic Tomato")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEvent {
    /// Timing name (e.g. `"destroyed"`, `"drawn"`).
    pub timing: String,

    /// Matching layer. Triggers match on exact `(timing, layer)`.
    #[serde(default = "default_layer")]
    pub layer: i32,

    /// Opaque host payload.
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Monotonic engine timestamp, assigned at Commit.
    #[serde(default)]
    pub timestamp: u64,

    /// Snapshot of the open temporal scopes at Commit time.
    #[serde(default)]
    pub scope_stack: Vec<ScopeFrame>,
}

impl TimingEvent {
    /// Creates an uncommitted event with an empty data map.
    #[must_use]
    pub fn new(timing: impl Into<String>, layer: i32) -> Self {
        Self {
            timing: timing.into(),
            layer,
            data: Map::new(),
            timestamp: 0,
            scope_stack: Vec::new(),
        }
    }

    /// Adds a data entry, chainable.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Looks up a data entry.
    #[must_use]
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns `true` if this event has the given timing name and layer.
    #[must_use]
    pub fn matches(&self, timing: &str, layer: i32) -> bool {
        self.timing == timing && self.layer == layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_event_is_uncommitted() {
        let event = TimingEvent::new("drawn", 2);
        assert_eq!(event.timestamp, 0);
        assert!(event.scope_stack.is_empty());
        assert!(event.data.is_empty());
    }

    #[test]
    fn matches_timing_and_layer() {
        let event = TimingEvent::new("drawn", 2);
        assert!(event.matches("drawn", 2));
        assert!(!event.matches("drawn", 1));
        assert!(!event.matches("destroyed", 2));
    }

    #[test]
    fn with_data_chains() {
        let event = TimingEvent::new("lp_gained", 2)
            .with_data("amount", json!(500))
            .with_data("player", json!("opponent"));

        assert_eq!(event.data("amount"), Some(&json!(500)));
        assert_eq!(event.data("player"), Some(&json!("opponent")));
        assert_eq!(event.data("missing"), None);
    }

    #[test]
    fn serde_defaults_for_engine_fields() {
        // A host-supplied event map may omit engine-assigned fields.
        let event: TimingEvent = serde_json::from_value(json!({
            "timing": "summoned",
        }))
        .unwrap();

        assert_eq!(event.timing, "summoned");
        assert_eq!(event.layer, 1);
        assert_eq!(event.timestamp, 0);
        assert!(event.scope_stack.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let event = TimingEvent::new("destroyed", 2).with_data("card", json!("token"));
        let json = serde_json::to_string(&event).unwrap();
        let restored: TimingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
