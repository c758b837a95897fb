//! Effect and trigger records for the Evesses engine.
//!
//! This crate defines what the engine *executes*:
//!
//! - [`Effect`] — tags, constraints, cost + probe, target selector,
//!   primary action, compound steps, optional lifetime; built with
//!   [`EffectBuilder`].
//! - [`Trigger`] — a passive `(timing, layer)` listener embedding the
//!   effect it Requests when it fires.
//! - [`Constraint`] / [`CompoundKind`] — the tagged sums driving
//!   Request-phase gating and Resolution-phase step conditionals.
//! - [`EffectError`] — the closed error taxonomy of the pipeline.
//! - [`LifetimeHandle`] — the expiry capability registrations bind to.
//!
//! # Callback Model
//!
//! All behavior is host closures over an opaque context type `C`:
//!
//! ```text
//! constraint : (&mut C)          → Ok | Err
//! cost/probe : (&mut C)          → Ok | Err
//! target     : (&mut C)          → Ok(Value) | Err
//! action     : (&mut C, &Value)  → Ok(ActionResult) | Err
//! filter     : (&TimingEvent)    → bool
//! ```
//!
//! Callbacks never see the engine itself, which is what makes
//! reentrancy into the chain structurally impossible.
//!
//! # Example
//!
//! ```
//! use evesses_effect::{EffectBuilder, EffectError};
//! use evesses_event::{ActionResult, TimingEvent};
//!
//! struct Duel {
//!     lp: i32,
//! }
//!
//! let pot = EffectBuilder::<Duel>::new()
//!     .tag("spell")
//!     .once_per_turn()
//!     .cost(|duel| {
//!         if duel.lp <= 1000 {
//!             return Err(EffectError::CostCannotBePaid("lp too low".into()));
//!         }
//!         duel.lp -= 1000;
//!         Ok(())
//!     })
//!     .action(|_duel, _targets| {
//!         Ok(ActionResult::some_with(TimingEvent::new("drawn", 2)))
//!     })
//!     .build();
//!
//! assert!(pot.has_tag("spell"));
//! ```

mod builder;
mod callback;
mod compound;
mod constraint;
mod effect;
mod error;
mod lifetime;
mod trigger;

pub use builder::EffectBuilder;
pub use callback::{ActionFn, ConstraintFn, CostFn, FilterFn, TargetFn};
pub use compound::{CompoundKind, CompoundStep, StepState};
pub use constraint::Constraint;
pub use effect::Effect;
pub use error::EffectError;
pub use lifetime::{LifetimeHandle, SharedLifetime, Unsubscribe};
pub use trigger::Trigger;

// Re-export from the event and types crates for convenience
pub use evesses_event::{ActionResult, TimingEvent};
pub use evesses_types::{EffectId, TriggerId};

/// Test utilities for the effect layer.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for lifetime-driven expiry.
    pub use crate::lifetime::testing::ManualLifetime;
}
