//! Evesses — an effect-resolution engine for chain-based turn games.
//!
//! Player or rule-triggered effects are Requested onto a last-in
//! first-out chain, Resolved through a floodgate interceptor pipeline,
//! and Committed as timing events that are matched against registered
//! triggers — which Request their own effects back onto the chain
//! until the system is quiescent.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         SDK Layer                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-types     : IDs, ErrorCode                          │
//! │  evesses-event     : TimingEvent, ActionResult, scopes       │
//! │  evesses-effect    : Effect, Trigger, builders, errors       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-floodgate : continuous interceptors + registry      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-engine    : pipeline + chain loop     ◄── HERE      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate re-exports the whole public surface; hosts normally
//! depend on `evesses-engine` alone.
//!
//! # The Engine Is the Referee, the Host Is the Game
//!
//! The engine stores no game state. Everything concrete — cards, life
//! points, zones — lives in the host's context type `C`, which every
//! callback receives. The engine owns only its bookkeeping: the chain
//! stack, the registries, the timing history.
//!
//! # Example: a Two-Step Chain
//!
//! ```
//! use evesses_engine::{direct_effect, Engine};
//! use evesses_event::{ActionResult, TimingEvent};
//!
//! struct Duel {
//!     hand: u32,
//! }
//!
//! let mut engine: Engine<Duel> = Engine::new();
//! let mut duel = Duel { hand: 5 };
//!
//! // Whenever something is destroyed, its controller draws.
//! engine
//!     .on_timing("destroyed", 2)
//!     .action(|duel, _targets| {
//!         duel.hand += 1;
//!         Ok(ActionResult::some_with(TimingEvent::new("drawn", 2)))
//!     })
//!     .build();
//!
//! let wipe = direct_effect::<Duel>()
//!     .tag("spell")
//!     .action(|_duel, _targets| {
//!         Ok(ActionResult::some_with(TimingEvent::new("destroyed", 2)))
//!     })
//!     .build();
//!
//! engine.activate_effect(&wipe, &mut duel).unwrap();
//! engine.resolve_chain(&mut duel).unwrap();
//!
//! let timings: Vec<_> = engine
//!     .timing_history()
//!     .into_iter()
//!     .map(|event| event.timing)
//!     .collect();
//! assert_eq!(timings, vec!["destroyed".to_string(), "drawn".to_string()]);
//! assert_eq!(duel.hand, 6);
//! ```

mod builder;
mod constraint;
mod engine;
mod error;

pub use builder::{BuildError, FloodgateBuilder, TriggerBuilder};
pub use constraint::ConstraintTracker;
pub use engine::{
    Engine, DEFAULT_MAX_CHAIN_ITERATIONS, EFFECT_NEGATED_LAYER, EFFECT_NEGATED_TIMING,
};
pub use error::ChainError;

// Re-export the SDK and interceptor layers so hosts can depend on
// this crate alone.
pub use evesses_effect::{
    ActionFn, CompoundKind, CompoundStep, Constraint, ConstraintFn, CostFn, Effect, EffectBuilder,
    EffectError, FilterFn, LifetimeHandle, SharedLifetime, StepState, TargetFn, Trigger,
    Unsubscribe,
};
pub use evesses_event::{ActionResult, ScopeFrame, ScopeStack, TimingEvent};
pub use evesses_floodgate::{
    Execution, ExecutionPatch, Floodgate, FloodgateKind, FloodgateRegistry, ForbidFn, GatePhase,
    ModifyFn, ReplaceFn,
};
pub use evesses_types::{assert_error_codes, EffectId, ErrorCode, FloodgateId, TriggerId};

/// Starts building a directly-activated effect.
///
/// Pure value construction — nothing registers; hand the built effect
/// to [`Engine::activate_effect`] when the player plays it.
///
/// # Example
///
/// ```
/// use evesses_engine::direct_effect;
/// use evesses_event::ActionResult;
///
/// let effect = direct_effect::<()>()
///     .tag("spell")
///     .action(|_ctx, _targets| Ok(ActionResult::some()))
///     .build();
/// assert!(effect.has_tag("spell"));
/// ```
#[must_use]
pub fn direct_effect<C>() -> EffectBuilder<C> {
    EffectBuilder::new()
}
