//! The Evesses engine — three-phase pipeline plus the chain loop.
//!
//! # Execution Model
//!
//! Every effect runs through three sequential phases:
//!
//! ```text
//! Request     constraints → forbid gates → cost probe → cost → targets → push
//! Resolution  replace gates → action → modify gates → compound steps
//! Commit      stamp scope snapshot + timestamp → history → trigger matching
//! ```
//!
//! # Chain Loop
//!
//! ```text
//! while chain stack or pending responses non-empty:
//!     drain the chain stack LIFO, resolving each entry
//!       (events committed along the way queue matching triggers)
//!     take the pending batch, SEGOC-sort it,
//!       Request each trigger's effect back onto the stack
//! ```
//!
//! Termination is guaranteed by the iteration cap (default 1000);
//! exceeding it is the engine-level fatal
//! [`ChainError::InfiniteLoopDetected`].
//!
//! # Reentrancy
//!
//! Callbacks receive `&mut C` (or less) and never the engine, so they
//! cannot Request or resolve from inside a phase; all engine entry
//! points take `&mut self` and the borrow checker enforces the
//! discipline.

use crate::builder::{FloodgateBuilder, TriggerBuilder};
use crate::constraint::ConstraintTracker;
use crate::error::ChainError;
use evesses_effect::{
    ActionFn, Constraint, Effect, EffectError, SharedLifetime, StepState, Trigger, Unsubscribe,
};
use evesses_event::{ActionResult, ScopeFrame, ScopeStack, TimingEvent};
use evesses_floodgate::{Execution, Floodgate, FloodgateKind, FloodgateRegistry, GatePhase};
use evesses_types::{FloodgateId, TriggerId};
use serde_json::{json, Value};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Timing name of the synthetic event committed when an effect is
/// negated during Resolution.
pub const EFFECT_NEGATED_TIMING: &str = "effect_negated";

/// Layer of the synthetic negation event.
pub const EFFECT_NEGATED_LAYER: i32 = 2;

/// Default iteration cap for the chain loop.
pub const DEFAULT_MAX_CHAIN_ITERATIONS: u32 = 1000;

type SegocSorter<C> = Box<dyn Fn(Vec<Trigger<C>>) -> Vec<Trigger<C>>>;
type OptionalGate<C> = Box<dyn Fn(&Trigger<C>) -> bool>;

struct RegisteredTrigger<C> {
    trigger: Trigger<C>,
    /// Tombstone set by the trigger's lifetime subscription; swept
    /// before the next Request phase.
    expired: Rc<Cell<bool>>,
    subscriptions: Vec<Unsubscribe>,
}

/// A Requested-but-unresolved effect on the chain stack.
struct ChainEntry<C> {
    effect: Effect<C>,
    targets: Value,
}

/// The effect-resolution engine.
///
/// Owns the five registries (triggers, floodgates, constraint tracker,
/// scope stack, timing history) plus the chain stack and the
/// pending-response queue. Strictly single-threaded and synchronous;
/// every callback runs inline on the calling thread.
///
/// # Example
///
/// ```
/// use evesses_engine::{direct_effect, Engine};
/// use evesses_event::{ActionResult, TimingEvent};
///
/// let mut engine: Engine<()> = Engine::new();
/// let mut ctx = ();
///
/// let effect = direct_effect::<()>()
///     .action(|_ctx, _targets| {
///         Ok(ActionResult::some_with(TimingEvent::new("drawn", 2)))
///     })
///     .build();
///
/// engine.activate_effect(&effect, &mut ctx).unwrap();
/// engine.resolve_chain(&mut ctx).unwrap();
///
/// let history = engine.timing_history();
/// assert_eq!(history.len(), 1);
/// assert_eq!(history[0].timing, "drawn");
/// assert_eq!(history[0].timestamp, 0);
/// ```
pub struct Engine<C> {
    triggers: Vec<RegisteredTrigger<C>>,
    floodgates: FloodgateRegistry<C>,
    tracker: ConstraintTracker,
    scopes: ScopeStack,
    history: Vec<TimingEvent>,
    chain: Vec<ChainEntry<C>>,
    pending: Vec<Trigger<C>>,
    next_timestamp: u64,
    max_iterations: u32,
    segoc: SegocSorter<C>,
    optional_gate: OptionalGate<C>,
}

impl<C> Engine<C> {
    /// Creates an engine with no registrations, an identity SEGOC
    /// sorter, and an auto-accepting optional-trigger gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            triggers: Vec::new(),
            floodgates: FloodgateRegistry::new(),
            tracker: ConstraintTracker::new(),
            scopes: ScopeStack::new(),
            history: Vec::new(),
            chain: Vec::new(),
            pending: Vec::new(),
            next_timestamp: 0,
            max_iterations: DEFAULT_MAX_CHAIN_ITERATIONS,
            segoc: Box::new(|batch| batch),
            optional_gate: Box::new(|_| true),
        }
    }

    // ── Registration surface ─────────────────────────────────

    /// Starts a trigger builder listening on `(timing, layer)`.
    ///
    /// The trigger registers when the builder's `build()` is called.
    pub fn on_timing(&mut self, timing: impl Into<String>, layer: i32) -> TriggerBuilder<'_, C> {
        TriggerBuilder::new(self, timing.into(), layer)
    }

    /// Starts a floodgate builder.
    ///
    /// The gate registers when the builder's `build()` succeeds.
    pub fn floodgate(&mut self) -> FloodgateBuilder<'_, C> {
        FloodgateBuilder::new(self)
    }

    pub(crate) fn register_trigger(&mut self, trigger: &Trigger<C>) {
        let expired = Rc::new(Cell::new(false));
        let mut subscriptions = Vec::new();
        if let Some(handle) = trigger.lifetime() {
            let flag = Rc::clone(&expired);
            subscriptions.push(handle.subscribe_expiry(Box::new(move || flag.set(true))));
        }

        debug!(trigger = %trigger.id(), timing = trigger.timing(), "trigger registered");
        self.triggers.push(RegisteredTrigger {
            trigger: trigger.clone(),
            expired,
            subscriptions,
        });
    }

    pub(crate) fn register_floodgate(
        &mut self,
        gate: &Floodgate<C>,
        lifetime: Option<&SharedLifetime>,
    ) {
        let expired = Rc::new(Cell::new(false));
        let mut subscriptions = Vec::new();
        if let Some(handle) = lifetime {
            let flag = Rc::clone(&expired);
            subscriptions.push(handle.subscribe_expiry(Box::new(move || flag.set(true))));
        }

        self.floodgates
            .register_with_expiry(gate.clone(), expired, subscriptions);
    }

    /// Unregisters a trigger by ID, cancelling its lifetime
    /// subscriptions. Returns `true` if found and removed.
    pub fn unregister_trigger(&mut self, id: TriggerId) -> bool {
        let Some(position) = self
            .triggers
            .iter()
            .position(|entry| entry.trigger.id() == id)
        else {
            return false;
        };

        let entry = self.triggers.remove(position);
        for subscription in entry.subscriptions {
            subscription.cancel();
        }
        debug!(trigger = %id, "trigger unregistered");
        true
    }

    /// Unregisters a floodgate by ID. Returns `true` if found.
    pub fn unregister_floodgate(&mut self, id: FloodgateId) -> bool {
        self.floodgates.unregister(id)
    }

    /// Enables or disables a floodgate without unregistering it.
    /// Returns `true` if the gate was found.
    pub fn set_floodgate_enabled(&mut self, id: FloodgateId, enabled: bool) -> bool {
        self.floodgates.set_enabled(id, enabled)
    }

    /// Number of unexpired registered triggers.
    #[must_use]
    pub fn active_trigger_count(&self) -> usize {
        self.triggers
            .iter()
            .filter(|entry| !entry.expired.get())
            .count()
    }

    /// Number of registered floodgates (including disabled ones).
    #[must_use]
    pub fn active_floodgate_count(&self) -> usize {
        self.floodgates.len()
    }

    // ── Temporal scopes ──────────────────────────────────────

    /// Opens a temporal scope (e.g. `timing("turn", 1)`).
    pub fn timing(&mut self, scope: impl Into<String>, layer: i32) {
        self.scopes.push(scope, layer);
    }

    /// Closes the topmost scope with the given name.
    pub fn end_timing(&mut self, scope: &str) -> Option<ScopeFrame> {
        self.scopes.pop(scope)
    }

    /// The currently open scopes.
    #[must_use]
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    // ── Configuration ────────────────────────────────────────

    /// Replaces the SEGOC sorter.
    ///
    /// The sorter sees each pending-response batch exactly once per
    /// loop iteration and determines the Request order within that
    /// batch. Default is identity (registration-match order).
    pub fn set_segoc_sorter(
        &mut self,
        sorter: impl Fn(Vec<Trigger<C>>) -> Vec<Trigger<C>> + 'static,
    ) {
        self.segoc = Box::new(sorter);
    }

    /// Tunes the chain-loop iteration cap (default 1000).
    pub fn set_max_chain_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations;
    }

    /// Replaces the optional-trigger gate.
    ///
    /// Called for each optional trigger before its effect is
    /// Requested; returning `false` declines the activation. Default
    /// accepts everything.
    pub fn set_optional_trigger_gate(&mut self, gate: impl Fn(&Trigger<C>) -> bool + 'static) {
        self.optional_gate = Box::new(gate);
    }

    // ── Constraint tracker ───────────────────────────────────

    /// Drops all per-turn usage counters. Idempotent; typically
    /// called by the host at turn end.
    pub fn clear_constraint_tracker(&mut self) {
        self.tracker.clear();
    }

    /// Read access to the usage counters.
    #[must_use]
    pub fn constraint_tracker(&self) -> &ConstraintTracker {
        &self.tracker
    }

    /// Write access to the usage counters, for host-driven
    /// bookkeeping outside the declarative constraints.
    pub fn constraint_tracker_mut(&mut self) -> &mut ConstraintTracker {
        &mut self.tracker
    }

    // ── History ──────────────────────────────────────────────

    /// The committed timing history, in commit order.
    #[must_use]
    pub fn history(&self) -> &[TimingEvent] {
        &self.history
    }

    /// A snapshot copy of the committed timing history.
    #[must_use]
    pub fn timing_history(&self) -> Vec<TimingEvent> {
        self.history.clone()
    }

    /// Number of Requested-but-unresolved chain entries.
    #[must_use]
    pub fn chain_depth(&self) -> usize {
        self.chain.len()
    }

    /// Number of triggers queued but not yet re-Requested.
    #[must_use]
    pub fn pending_response_count(&self) -> usize {
        self.pending.len()
    }

    // ── Request phase ────────────────────────────────────────

    /// Runs the Request phase for an effect: constraints, forbid
    /// floodgates, cost probe, cost payment, target selection, then a
    /// push onto the chain stack.
    ///
    /// # Errors
    ///
    /// The first failing step's error, verbatim. On error nothing is
    /// pushed, but constraint slots stay consumed and a partially
    /// mutating cost is *not* rolled back — costs must fail before
    /// mutating or mutate atomically.
    pub fn activate_effect(&mut self, effect: &Effect<C>, ctx: &mut C) -> Result<(), EffectError> {
        self.request_phase(effect, ctx)
    }

    fn request_phase(&mut self, effect: &Effect<C>, ctx: &mut C) -> Result<(), EffectError> {
        // Lifetime contract: expired registrations are gone before
        // any Request phase runs.
        self.sweep_expired();

        for constraint in effect.constraints() {
            match constraint {
                Constraint::OncePerTurn(key) => {
                    self.tracker.check_once_per_turn(key)?;
                    self.tracker.mark_used(key.clone());
                }
                Constraint::TimesPerTurn { key, max } => {
                    self.tracker.check_times_per_turn(key, *max)?;
                    self.tracker.increment_usage(key.clone());
                }
                Constraint::Custom(check) => check(ctx)?,
            }
        }

        for gate in self.floodgates.iter_phase(GatePhase::Request) {
            if let FloodgateKind::Forbid(forbids) = gate.kind() {
                if forbids(ctx, effect) {
                    return Err(EffectError::ActionForbidden {
                        reason: gate
                            .reason()
                            .unwrap_or("activation forbidden")
                            .to_string(),
                        floodgate: gate.id(),
                    });
                }
            }
        }

        if let Some(probe) = effect.cost_checker() {
            probe(ctx)?;
        }

        // Paid from here on, refunded never.
        if let Some(cost) = effect.cost() {
            cost(ctx)?;
        }

        let targets = match effect.target() {
            Some(select) => select(ctx)?,
            None => Value::Null,
        };

        debug!(effect = %effect.id(), "chain push");
        self.chain.push(ChainEntry {
            effect: effect.clone(),
            targets,
        });
        Ok(())
    }

    // ── Resolution phase ─────────────────────────────────────

    fn resolution_phase(&mut self, entry: ChainEntry<C>, ctx: &mut C) -> Result<(), EffectError> {
        debug!(effect = %entry.effect.id(), "resolving chain entry");

        let main = match self.execute_with_floodgates(entry.effect.action(), &entry.targets, ctx) {
            Ok(result) => result,
            Err(EffectError::EffectNegated(reason)) => {
                // Resolved to nothing; the negation itself is an event.
                let marker = negation_marker(&entry.effect, None, &reason);
                self.commit(vec![marker]);
                return Ok(());
            }
            // ActivationNegated (absorbed by the loop) and everything
            // else propagate without committing.
            Err(err) => return Err(err),
        };

        let mut events = main.events;
        let mut prev = StepState::completed(main.succeeded);

        for (index, step) in entry.effect.compound_steps().iter().enumerate() {
            if !step.kind().should_execute(prev) {
                continue;
            }

            match self.execute_with_floodgates(step.action(), &entry.targets, ctx) {
                Ok(result) => {
                    prev = StepState::completed(result.succeeded);
                    events.extend(result.events);
                }
                Err(EffectError::EffectNegated(reason)) => {
                    events.push(negation_marker(&entry.effect, Some(index), &reason));
                    prev = StepState::after_error();
                }
                Err(err) => {
                    // A failed step never aborts the enclosing effect.
                    debug!(
                        effect = %entry.effect.id(),
                        step = index,
                        error = %err,
                        "compound step failed"
                    );
                    prev = StepState::after_error();
                }
            }
        }

        self.commit(events);
        Ok(())
    }

    /// Executes an action through the Resolution-phase floodgates:
    /// chained Replace substitution, the action itself, then the
    /// Modify pass over each emitted event.
    fn execute_with_floodgates(
        &self,
        action: &ActionFn<C>,
        targets: &Value,
        ctx: &mut C,
    ) -> Result<ActionResult, EffectError> {
        let mut current = Execution {
            action: Rc::clone(action),
            targets: targets.clone(),
        };

        for gate in self.floodgates.iter_phase(GatePhase::Resolution) {
            if let FloodgateKind::Replace(substitute) = gate.kind() {
                if let Some(patch) = substitute(ctx, &current) {
                    debug!(floodgate = %gate.id(), "execution replaced");
                    if let Some(action) = patch.action {
                        current.action = action;
                    }
                    if let Some(targets) = patch.targets {
                        current.targets = targets;
                    }
                }
            }
        }

        let mut result = (current.action)(ctx, &current.targets)?;

        for gate in self.floodgates.iter_phase(GatePhase::Resolution) {
            if let FloodgateKind::Modify(transform) = gate.kind() {
                for event in result.events.iter_mut() {
                    if let Some(replacement) = transform(ctx, event) {
                        *event = replacement;
                    }
                }
            }
        }

        Ok(result)
    }

    // ── Commit phase ─────────────────────────────────────────

    /// Commits events: scope snapshot, monotonic timestamp, history
    /// append, trigger matching. Infallible.
    fn commit(&mut self, events: Vec<TimingEvent>) {
        for mut event in events {
            event.scope_stack = self.scopes.snapshot();
            event.timestamp = self.next_timestamp;
            self.next_timestamp += 1;

            debug!(timing = %event.timing, timestamp = event.timestamp, "timing event committed");
            self.history.push(event.clone());

            // Match in registration order; the SEGOC sorter decides
            // the Request order later.
            for registered in &self.triggers {
                if registered.expired.get() {
                    continue;
                }
                let trigger = &registered.trigger;
                if !trigger.matches(&event) {
                    continue;
                }
                if self.pending.iter().any(|queued| queued.id() == trigger.id()) {
                    continue;
                }
                debug!(trigger = %trigger.id(), timing = %event.timing, "trigger queued");
                self.pending.push(trigger.clone());
            }
        }
    }

    // ── Chain loop ───────────────────────────────────────────

    /// Drains the chain stack and the pending-response queue to
    /// quiescence.
    ///
    /// # Errors
    ///
    /// [`ChainError::InfiniteLoopDetected`] once the iteration cap is
    /// exceeded, or the first non-absorbed Resolution error.
    pub fn resolve_chain(&mut self, ctx: &mut C) -> Result<(), ChainError> {
        let mut iterations: u32 = 0;

        while !self.chain.is_empty() || !self.pending.is_empty() {
            iterations += 1;
            if iterations > self.max_iterations {
                warn!(iterations, "chain iteration cap exceeded");
                return Err(ChainError::InfiniteLoopDetected { iterations });
            }

            while let Some(entry) = self.chain.pop() {
                match self.resolution_phase(entry, ctx) {
                    Ok(()) => {}
                    Err(EffectError::ActivationNegated(reason)) => {
                        // The effect never happened; the chain goes on.
                        debug!(reason = %reason, "activation negated");
                    }
                    Err(err) => return Err(ChainError::Effect(err)),
                }
            }

            if self.pending.is_empty() {
                continue;
            }

            let batch = std::mem::take(&mut self.pending);
            let batch = (self.segoc)(batch);

            for trigger in batch {
                if trigger.is_optional() && !(self.optional_gate)(&trigger) {
                    debug!(trigger = %trigger.id(), "optional trigger declined");
                    continue;
                }
                if let Err(err) = self.request_phase(trigger.effect(), ctx) {
                    // Routine in normal play: the trigger just cannot
                    // activate right now. Skip it, keep the batch going.
                    debug!(trigger = %trigger.id(), error = %err, "trigger request failed");
                }
            }
        }

        Ok(())
    }

    // ── Lifetimes ────────────────────────────────────────────

    fn sweep_expired(&mut self) {
        self.triggers.retain(|entry| !entry.expired.get());
        self.floodgates.sweep_expired();
    }
}

impl<C> Default for Engine<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn negation_marker<C>(
    effect: &Effect<C>,
    compound_index: Option<usize>,
    reason: &str,
) -> TimingEvent {
    let mut marker = TimingEvent::new(EFFECT_NEGATED_TIMING, EFFECT_NEGATED_LAYER)
        .with_data("effect", json!(effect.id().to_string()))
        .with_data("reason", json!(reason));
    if let Some(index) = compound_index {
        marker = marker.with_data("compound_index", json!(index));
    }
    marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct_effect;
    use evesses_event::ActionResult;
    use serde_json::json;

    #[derive(Default)]
    struct Duel {
        lp: i32,
        paid: u32,
    }

    fn emit(timing: &'static str) -> Effect<Duel> {
        direct_effect::<Duel>()
            .action(move |_, _| Ok(ActionResult::some_with(TimingEvent::new(timing, 2))))
            .build()
    }

    // ── Request phase ────────────────────────────────────────

    #[test]
    fn request_pushes_chain_entry() {
        let mut engine = Engine::new();
        let mut duel = Duel::default();

        engine.activate_effect(&emit("drawn"), &mut duel).unwrap();
        assert_eq!(engine.chain_depth(), 1);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn request_failure_leaves_no_chain_residue() {
        let mut engine = Engine::new();
        let mut duel = Duel::default();

        let effect = direct_effect::<Duel>()
            .constraint(|_| Err(EffectError::Host("nope".into())))
            .build();

        assert!(engine.activate_effect(&effect, &mut duel).is_err());
        assert_eq!(engine.chain_depth(), 0);
    }

    #[test]
    fn cost_is_paid_during_request_and_not_refunded() {
        let mut engine = Engine::new();
        let mut duel = Duel { lp: 8000, paid: 0 };

        let effect = direct_effect::<Duel>()
            .cost(|duel| {
                duel.lp -= 1000;
                duel.paid += 1;
                Ok(())
            })
            .action(|_, _| Err(EffectError::EffectNegated("countered".into())))
            .build();

        engine.activate_effect(&effect, &mut duel).unwrap();
        assert_eq!(duel.paid, 1);

        engine.resolve_chain(&mut duel).unwrap();
        // Negated, but the cost stays paid exactly once.
        assert_eq!(duel.paid, 1);
        assert_eq!(duel.lp, 7000);
    }

    #[test]
    fn cost_probe_runs_before_payment() {
        let mut engine = Engine::new();
        let mut duel = Duel { lp: 300, paid: 0 };

        let effect = direct_effect::<Duel>()
            .cost_checker(|duel| {
                if duel.lp < 500 {
                    Err(EffectError::CostCannotBePaid("lp too low".into()))
                } else {
                    Ok(())
                }
            })
            .cost(|duel| {
                duel.lp -= 500;
                Ok(())
            })
            .build();

        let err = engine.activate_effect(&effect, &mut duel).unwrap_err();
        assert!(matches!(err, EffectError::CostCannotBePaid(_)));
        // Probe failed before the cost mutated anything.
        assert_eq!(duel.lp, 300);
    }

    #[test]
    fn targets_are_stored_with_the_entry() {
        let mut engine = Engine::new();
        let mut duel = Duel::default();

        let effect = direct_effect::<Duel>()
            .target(|_| Ok(json!(["left_monster"])))
            .action(|_, targets| {
                assert_eq!(targets, &json!(["left_monster"]));
                Ok(ActionResult::some())
            })
            .build();

        engine.activate_effect(&effect, &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();
    }

    // ── Commit phase ─────────────────────────────────────────

    #[test]
    fn commit_stamps_scope_snapshot() {
        let mut engine = Engine::new();
        let mut duel = Duel::default();

        engine.timing("turn", 1);
        engine.timing("main_phase", 2);

        engine.activate_effect(&emit("summoned"), &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        engine.end_timing("main_phase");

        let event = &engine.history()[0];
        let names: Vec<_> = event
            .scope_stack
            .iter()
            .map(|frame| frame.name.as_str())
            .collect();
        // The snapshot is from commit time, unaffected by the later close.
        assert_eq!(names, vec!["turn", "main_phase"]);
    }

    #[test]
    fn trigger_queued_once_per_batch() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        engine
            .on_timing("destroyed", 2)
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("salvaged", 2))))
            .build();

        // One effect, two "destroyed" events: the trigger queues once.
        let effect = direct_effect::<Duel>()
            .action(|_, _| {
                Ok(ActionResult::with_events(vec![
                    TimingEvent::new("destroyed", 2),
                    TimingEvent::new("destroyed", 2),
                ]))
            })
            .build();

        engine.activate_effect(&effect, &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        let salvages = engine
            .history()
            .iter()
            .filter(|event| event.timing == "salvaged")
            .count();
        assert_eq!(salvages, 1);
    }

    // ── Floodgate passes ─────────────────────────────────────

    #[test]
    fn modify_gate_rewrites_events() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        engine
            .floodgate()
            .modify(|_, event| {
                if event.timing == "lp_gained" {
                    Some(TimingEvent::new("lp_gain_prevented", 2))
                } else {
                    None
                }
            })
            .build()
            .unwrap();

        engine.activate_effect(&emit("lp_gained"), &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        assert_eq!(engine.history()[0].timing, "lp_gain_prevented");
    }

    #[test]
    fn replace_gates_chain_in_layer_order() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        // Layer 2: swap targets. Layer 1 ran first and already swapped
        // the action, so the layer-2 gate must see the new targets slot.
        engine
            .floodgate()
            .layer(1)
            .replace(|_, _| {
                let replacement: ActionFn<Duel> = Rc::new(|_, targets| {
                    Ok(ActionResult::some_with(
                        TimingEvent::new("redirected", 2).with_data("at", targets.clone()),
                    ))
                });
                Some(evesses_floodgate::ExecutionPatch::keep().with_action(replacement))
            })
            .build()
            .unwrap();

        engine
            .floodgate()
            .layer(2)
            .replace(|_, _| {
                Some(evesses_floodgate::ExecutionPatch::keep().with_targets(json!("the_wall")))
            })
            .build()
            .unwrap();

        let effect = direct_effect::<Duel>()
            .target(|_| Ok(json!("the_attacker")))
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("attacked", 2))))
            .build();

        engine.activate_effect(&effect, &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        let event = &engine.history()[0];
        assert_eq!(event.timing, "redirected");
        assert_eq!(event.data("at"), Some(&json!("the_wall")));
    }

    #[test]
    fn forbid_in_resolution_phase_never_fires() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        // Inert combination: dispatch filters on (phase, kind).
        engine
            .floodgate()
            .phase(GatePhase::Resolution)
            .forbid(|_, _| true)
            .build()
            .unwrap();

        assert!(engine.activate_effect(&emit("drawn"), &mut duel).is_ok());
        engine.resolve_chain(&mut duel).unwrap();
        assert_eq!(engine.history().len(), 1);
    }

    // ── Optional triggers ────────────────────────────────────

    #[test]
    fn optional_trigger_gate_declines() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        engine
            .on_timing("destroyed", 2)
            .optional()
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("revived", 2))))
            .build();

        engine.set_optional_trigger_gate(|_| false);

        engine.activate_effect(&emit("destroyed"), &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        assert!(engine.history().iter().all(|event| event.timing != "revived"));
    }

    #[test]
    fn optional_trigger_default_accepts() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        engine
            .on_timing("destroyed", 2)
            .optional()
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("revived", 2))))
            .build();

        engine.activate_effect(&emit("destroyed"), &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        assert!(engine.history().iter().any(|event| event.timing == "revived"));
    }

    // ── Failed trigger requests ──────────────────────────────

    #[test]
    fn failed_trigger_request_is_skipped() {
        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();

        engine
            .on_timing("destroyed", 2)
            .once_per_turn()
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("salvaged", 2))))
            .build();

        // Two separate chains: the second firing violates once-per-turn
        // and is skipped without failing resolve_chain.
        for _ in 0..2 {
            engine.activate_effect(&emit("destroyed"), &mut duel).unwrap();
            engine.resolve_chain(&mut duel).unwrap();
        }

        let salvages = engine
            .history()
            .iter()
            .filter(|event| event.timing == "salvaged")
            .count();
        assert_eq!(salvages, 1);
    }

    // ── Lifetime sweep ───────────────────────────────────────

    #[test]
    fn expired_trigger_gone_by_next_request() {
        use evesses_effect::testing::ManualLifetime;

        let mut engine: Engine<Duel> = Engine::new();
        let mut duel = Duel::default();
        let lifetime = ManualLifetime::new();

        engine
            .on_timing("destroyed", 2)
            .action(|_, _| Ok(ActionResult::some_with(TimingEvent::new("salvaged", 2))))
            .bind_lifetime(lifetime.handle())
            .build();
        assert_eq!(engine.active_trigger_count(), 1);

        lifetime.expire();
        assert_eq!(engine.active_trigger_count(), 0);

        engine.activate_effect(&emit("destroyed"), &mut duel).unwrap();
        engine.resolve_chain(&mut duel).unwrap();

        assert!(engine.history().iter().all(|event| event.timing != "salvaged"));
    }
}
