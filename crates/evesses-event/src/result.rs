//! Action results — the canonical payload an action hands back.
//!
//! Every action resolves to an [`ActionResult`]: a `succeeded` flag
//! ("did something observable") plus the timing events it wants
//! committed. The flag drives compound-step conditionals ("if you
//! do…"); the events drive trigger matching.
//!
//! Statically-typed hosts construct results directly via
//! [`some`](ActionResult::some) / [`none`](ActionResult::none) and
//! friends. Dynamically-bound hosts (scripting bridges) can hand the
//! engine any JSON value and let [`from_raw`](ActionResult::from_raw)
//! normalize it.

use crate::TimingEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical return payload from an action.
///
/// # Example
///
/// ```
/// use evesses_event::{ActionResult, TimingEvent};
///
/// // Did something, one event to commit.
/// let result = ActionResult::some_with(TimingEvent::new("drawn", 2));
/// assert!(result.succeeded);
/// assert_eq!(result.events.len(), 1);
///
/// // Resolved to nothing (an empty draw, a fizzled target).
/// let nothing = ActionResult::none();
/// assert!(!nothing.succeeded);
/// assert!(nothing.events.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// `true` if the action did something observable.
    pub succeeded: bool,

    /// Timing events to commit, in emission order.
    #[serde(default)]
    pub events: Vec<TimingEvent>,
}

impl ActionResult {
    /// Succeeded with no events.
    #[must_use]
    pub fn some() -> Self {
        Self {
            succeeded: true,
            events: Vec::new(),
        }
    }

    /// Succeeded with a single event.
    #[must_use]
    pub fn some_with(event: TimingEvent) -> Self {
        Self {
            succeeded: true,
            events: vec![event],
        }
    }

    /// Succeeded with the given events.
    #[must_use]
    pub fn with_events(events: Vec<TimingEvent>) -> Self {
        Self {
            succeeded: true,
            events,
        }
    }

    /// Did nothing: not succeeded, no events.
    #[must_use]
    pub fn none() -> Self {
        Self {
            succeeded: false,
            events: Vec::new(),
        }
    }

    /// Normalizes a raw JSON value into an `ActionResult`.
    ///
    /// This is the dynamic-binding boundary. Statically-typed actions
    /// should construct results directly; bridges that receive
    /// whatever a script returned map it through this table:
    ///
    /// | Raw value | Result |
    /// |-----------|--------|
    /// | result-shaped map (has `succeeded`) | kept as-is |
    /// | event-shaped map (has `timing`) | succeeded, that event |
    /// | array of event-shaped maps | succeeded, those events |
    /// | `null` | did nothing |
    /// | boolean | that flag, no events |
    /// | number `0` | did nothing |
    /// | anything else | opaque positive signal: succeeded, no events |
    ///
    /// # Example
    ///
    /// ```
    /// use evesses_event::ActionResult;
    /// use serde_json::json;
    ///
    /// assert!(!ActionResult::from_raw(json!(null)).succeeded);
    /// assert!(!ActionResult::from_raw(json!(0)).succeeded);
    /// assert!(ActionResult::from_raw(json!(3)).succeeded);
    ///
    /// let from_event = ActionResult::from_raw(json!({"timing": "drawn", "layer": 2}));
    /// assert_eq!(from_event.events[0].timing, "drawn");
    /// ```
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        match raw {
            Value::Null => Self::none(),
            Value::Bool(flag) => Self {
                succeeded: flag,
                events: Vec::new(),
            },
            Value::Number(number) => {
                if number.as_i64() == Some(0) || number.as_f64() == Some(0.0) {
                    Self::none()
                } else {
                    Self::some()
                }
            }
            Value::Object(map) => {
                if map.contains_key("succeeded") {
                    serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| Self::some())
                } else if map.contains_key("timing") {
                    match serde_json::from_value::<TimingEvent>(Value::Object(map)) {
                        Ok(event) => Self::some_with(event),
                        Err(_) => Self::some(),
                    }
                } else {
                    Self::some()
                }
            }
            Value::Array(items) => {
                match serde_json::from_value::<Vec<TimingEvent>>(Value::Array(items)) {
                    Ok(events) => Self::with_events(events),
                    Err(_) => Self::some(),
                }
            }
            Value::String(_) => Self::some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors() {
        assert!(ActionResult::some().succeeded);
        assert!(ActionResult::some().events.is_empty());

        let single = ActionResult::some_with(TimingEvent::new("drawn", 2));
        assert!(single.succeeded);
        assert_eq!(single.events.len(), 1);

        let many = ActionResult::with_events(vec![
            TimingEvent::new("drawn", 2),
            TimingEvent::new("drawn", 2),
        ]);
        assert_eq!(many.events.len(), 2);

        assert!(!ActionResult::none().succeeded);
    }

    // ── from_raw normalization ───────────────────────────────

    #[test]
    fn raw_null_is_none() {
        assert_eq!(ActionResult::from_raw(json!(null)), ActionResult::none());
    }

    #[test]
    fn raw_bool_is_flag() {
        assert!(ActionResult::from_raw(json!(true)).succeeded);
        assert!(!ActionResult::from_raw(json!(false)).succeeded);
    }

    #[test]
    fn raw_zero_is_none() {
        assert!(!ActionResult::from_raw(json!(0)).succeeded);
        assert!(!ActionResult::from_raw(json!(0.0)).succeeded);
        assert!(ActionResult::from_raw(json!(7)).succeeded);
    }

    #[test]
    fn raw_event_map() {
        let result = ActionResult::from_raw(json!({"timing": "destroyed", "layer": 2}));
        assert!(result.succeeded);
        assert_eq!(result.events.len(), 1);
        assert!(result.events[0].matches("destroyed", 2));
    }

    #[test]
    fn raw_event_array() {
        let result = ActionResult::from_raw(json!([
            {"timing": "destroyed", "layer": 2},
            {"timing": "sent_to_grave", "layer": 2},
        ]));
        assert!(result.succeeded);
        assert_eq!(result.events.len(), 2);
    }

    #[test]
    fn raw_result_map_kept() {
        let result = ActionResult::from_raw(json!({
            "succeeded": false,
            "events": [{"timing": "drawn"}],
        }));
        assert!(!result.succeeded);
        assert_eq!(result.events.len(), 1);
    }

    #[test]
    fn raw_opaque_values_are_positive() {
        assert!(ActionResult::from_raw(json!("done")).succeeded);
        assert!(ActionResult::from_raw(json!({"anything": 1})).succeeded);
    }

    #[test]
    fn raw_malformed_array_is_opaque_positive() {
        let result = ActionResult::from_raw(json!([1, 2, 3]));
        assert!(result.succeeded);
        assert!(result.events.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let result = ActionResult::some_with(TimingEvent::new("drawn", 2));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(serde_json::from_str::<ActionResult>(&json).unwrap(), result);
    }
}
