//! Callback signatures for host-supplied behavior.
//!
//! Effects, triggers, and floodgates are callback-bearing records. All
//! callbacks are `Rc<dyn Fn…>`: the engine is single-threaded, and the
//! reference counting lets chain entries, embedded trigger effects,
//! and replace floodgates share one allocation.
//!
//! Mutating callbacks receive `&mut C`; anything that only observes
//! receives `&C` or just the event. No callback ever sees the engine
//! itself — that is what makes reentrancy structurally impossible.

use crate::EffectError;
use evesses_event::{ActionResult, TimingEvent};
use serde_json::Value;
use std::rc::Rc;

/// Primary or compound action: `(ctx, targets) → ActionResult`.
///
/// Targets are whatever the effect's target selector produced
/// (`Value::Null` when the effect has none).
pub type ActionFn<C> = Rc<dyn Fn(&mut C, &Value) -> Result<ActionResult, EffectError>>;

/// Cost payment (mutating) or cost probe (contractually non-mutating).
pub type CostFn<C> = Rc<dyn Fn(&mut C) -> Result<(), EffectError>>;

/// Target selector: `(ctx) → targets`.
pub type TargetFn<C> = Rc<dyn Fn(&mut C) -> Result<Value, EffectError>>;

/// Custom activation constraint: `(ctx) → Ok | Err`.
pub type ConstraintFn<C> = Rc<dyn Fn(&mut C) -> Result<(), EffectError>>;

/// Trigger filter over a timing event.
pub type FilterFn = Rc<dyn Fn(&TimingEvent) -> bool>;
