//! Event vocabulary for the Evesses effect-resolution engine.
//!
//! This crate defines what flows *out* of resolving effects:
//!
//! - [`TimingEvent`] — an immutable record of something that happened,
//!   stamped at Commit with a monotonic timestamp and a snapshot of
//!   the open temporal scopes.
//! - [`ActionResult`] — the canonical payload an action returns: a
//!   "did something" flag plus the events to commit.
//! - [`ScopeFrame`] / [`ScopeStack`] — hierarchical temporal labels
//!   (turn → phase → step) the host opens and closes around its flow.
//!
//! # Data Flow
//!
//! ```text
//! action ──► ActionResult { succeeded, events }
//!                               │ Commit
//!                               ▼
//!            history: [TimingEvent { timestamp, scope_stack, … }]
//!                               │
//!                               ▼
//!            trigger matching on (timing, layer) + filter
//! ```
//!
//! # Example
//!
//! ```
//! use evesses_event::{ActionResult, ScopeStack, TimingEvent};
//! use serde_json::json;
//!
//! let mut scopes = ScopeStack::new();
//! scopes.push("turn", 1);
//!
//! let event = TimingEvent::new("destroyed", 2).with_data("card", json!("token"));
//! let result = ActionResult::some_with(event);
//! assert!(result.succeeded);
//! ```

mod event;
mod result;
mod scope;

pub use event::TimingEvent;
pub use result::ActionResult;
pub use scope::{ScopeFrame, ScopeStack};
