//! Registering builders — triggers and floodgates.
//!
//! Unlike `EffectBuilder` (a pure value builder), these two borrow the
//! engine and register their product as a side effect of `build()`.
//! That is the whole point: a trigger or floodgate only means anything
//! while it sits in an active registry.

use crate::engine::Engine;
use evesses_effect::{
    ActionResult, Effect, EffectBuilder, EffectError, FilterFn, SharedLifetime, Trigger,
};
use evesses_event::TimingEvent;
use evesses_floodgate::{
    Execution, ExecutionPatch, Floodgate, FloodgateKind, GatePhase,
};
use evesses_types::{ErrorCode, FloodgateId, TriggerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

/// Error from a registering builder.
///
/// | Error | Code |
/// |-------|------|
/// | [`MissingKind`](BuildError::MissingKind) | `BUILD_MISSING_KIND` |
/// | [`ConflictingKind`](BuildError::ConflictingKind) | `BUILD_CONFLICTING_KIND` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum BuildError {
    /// A floodgate needs exactly one of forbid, modify, or replace.
    #[error("floodgate needs exactly one of forbid, modify, or replace")]
    MissingKind,

    /// More than one of forbid, modify, replace was supplied.
    #[error("floodgate was given more than one of forbid, modify, replace")]
    ConflictingKind,
}

impl ErrorCode for BuildError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingKind => "BUILD_MISSING_KIND",
            Self::ConflictingKind => "BUILD_CONFLICTING_KIND",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Builder for triggers; registers into the engine on `build()`.
///
/// Obtained from [`Engine::on_timing`]. The embedded effect is built
/// alongside: `action`, `and_then`, and `once_per_turn` configure the
/// effect the trigger Requests when it fires.
pub struct TriggerBuilder<'e, C> {
    engine: &'e mut Engine<C>,
    id: TriggerId,
    timing: String,
    layer: i32,
    filter: Option<FilterFn>,
    optional: bool,
    effect: EffectBuilder<C>,
    lifetime: Option<SharedLifetime>,
}

impl<'e, C> TriggerBuilder<'e, C> {
    pub(crate) fn new(engine: &'e mut Engine<C>, timing: String, layer: i32) -> Self {
        Self {
            engine,
            id: TriggerId::new(),
            timing,
            layer,
            filter: None,
            optional: false,
            effect: EffectBuilder::new(),
            lifetime: None,
        }
    }

    /// Narrows matching beyond `(timing, layer)`.
    #[must_use]
    pub fn filter(mut self, filter: impl Fn(&TimingEvent) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    /// Makes activation player-gated (through the optional-trigger
    /// gate) instead of mandatory.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Makes activation mandatory (the default).
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Limits the trigger to one firing attempt per turn, keyed by
    /// the trigger's ID.
    #[must_use]
    pub fn once_per_turn(mut self) -> Self {
        let key = self.id.to_string();
        self.effect = self.effect.once_per_turn_keyed(key);
        self
    }

    /// Sets the action of the Requested effect.
    #[must_use]
    pub fn action(
        mut self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.effect = self.effect.action(act);
        self
    }

    /// Appends an `and_then` step to the Requested effect.
    #[must_use]
    pub fn and_then(
        mut self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.effect = self.effect.and_then(act);
        self
    }

    /// Binds a lifetime handle; the registration expires with it.
    #[must_use]
    pub fn bind_lifetime(mut self, lifetime: SharedLifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Builds the trigger, registers it, and returns the handle.
    pub fn build(self) -> Trigger<C> {
        let trigger = Trigger::new(
            self.id,
            self.timing,
            self.layer,
            self.filter,
            self.optional,
            self.effect.build(),
            self.lifetime,
        );
        self.engine.register_trigger(&trigger);
        trigger
    }
}

/// Builder for floodgates; registers into the engine on `build()`.
///
/// Obtained from [`Engine::floodgate`]. Exactly one of
/// [`forbid`](Self::forbid), [`modify`](Self::modify),
/// [`replace`](Self::replace) must be supplied; the phase defaults to
/// the kind's natural phase and rarely needs setting.
pub struct FloodgateBuilder<'e, C> {
    engine: &'e mut Engine<C>,
    id: FloodgateId,
    phase: Option<GatePhase>,
    layer: i32,
    kind: Option<FloodgateKind<C>>,
    conflicting: bool,
    reason: Option<String>,
    lifetime: Option<SharedLifetime>,
}

impl<'e, C> FloodgateBuilder<'e, C> {
    pub(crate) fn new(engine: &'e mut Engine<C>) -> Self {
        Self {
            engine,
            id: FloodgateId::new(),
            phase: None,
            layer: 1,
            kind: None,
            conflicting: false,
            reason: None,
            lifetime: None,
        }
    }

    /// Overrides the phase. Defaults to the kind's natural phase.
    #[must_use]
    pub fn phase(mut self, phase: GatePhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Sets the precedence layer (lower applies first; default 1).
    #[must_use]
    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    fn set_kind(mut self, kind: FloodgateKind<C>) -> Self {
        if self.kind.is_some() {
            self.conflicting = true;
        } else {
            self.kind = Some(kind);
        }
        self
    }

    /// Makes this a forbid gate: `true` fails matching activations.
    #[must_use]
    pub fn forbid(self, predicate: impl Fn(&C, &Effect<C>) -> bool + 'static) -> Self {
        self.set_kind(FloodgateKind::Forbid(Rc::new(predicate)))
    }

    /// Makes this a modify gate: transforms committed-to-be events.
    #[must_use]
    pub fn modify(
        self,
        transform: impl Fn(&C, &TimingEvent) -> Option<TimingEvent> + 'static,
    ) -> Self {
        self.set_kind(FloodgateKind::Modify(Rc::new(transform)))
    }

    /// Makes this a replace gate: substitutes action and/or targets.
    #[must_use]
    pub fn replace(
        self,
        substitute: impl Fn(&C, &Execution<C>) -> Option<ExecutionPatch<C>> + 'static,
    ) -> Self {
        self.set_kind(FloodgateKind::Replace(Rc::new(substitute)))
    }

    /// Human-readable reason surfaced in `ActionForbidden`.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Binds a lifetime handle; the registration expires with it.
    #[must_use]
    pub fn bind_lifetime(mut self, lifetime: SharedLifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Builds the floodgate, registers it, and returns the handle.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingKind`] when no contract was supplied,
    /// [`BuildError::ConflictingKind`] when more than one was.
    pub fn build(self) -> Result<Floodgate<C>, BuildError> {
        if self.conflicting {
            return Err(BuildError::ConflictingKind);
        }
        let Some(kind) = self.kind else {
            return Err(BuildError::MissingKind);
        };

        let phase = self.phase.unwrap_or_else(|| kind.natural_phase());
        if phase != kind.natural_phase() {
            // Legal but inert: dispatch filters on (phase, kind) pairs.
            warn!(
                floodgate = %self.id,
                kind = kind.name(),
                %phase,
                "floodgate registered in a phase its kind never fires in"
            );
        }

        let gate = Floodgate::new(self.id, phase, self.layer, kind, self.reason);
        self.engine
            .register_floodgate(&gate, self.lifetime.as_ref());
        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evesses_types::assert_error_codes;

    #[test]
    fn build_error_codes() {
        assert_error_codes(
            &[BuildError::MissingKind, BuildError::ConflictingKind],
            "BUILD",
        );
        assert!(!BuildError::MissingKind.is_recoverable());
    }

    #[test]
    fn floodgate_requires_a_kind() {
        let mut engine: Engine<()> = Engine::new();
        let result = engine.floodgate().layer(1).build();
        assert_eq!(result.unwrap_err(), BuildError::MissingKind);
        assert_eq!(engine.active_floodgate_count(), 0);
    }

    #[test]
    fn floodgate_rejects_two_kinds() {
        let mut engine: Engine<()> = Engine::new();
        let result = engine
            .floodgate()
            .forbid(|_, _| true)
            .modify(|_, _| None)
            .build();
        assert_eq!(result.unwrap_err(), BuildError::ConflictingKind);
        assert_eq!(engine.active_floodgate_count(), 0);
    }

    #[test]
    fn phase_defaults_to_natural() {
        let mut engine: Engine<()> = Engine::new();

        let forbid = engine.floodgate().forbid(|_, _| false).build().unwrap();
        assert!(forbid.phase().is_request());

        let modify = engine.floodgate().modify(|_, _| None).build().unwrap();
        assert!(modify.phase().is_resolution());

        let replace = engine.floodgate().replace(|_, _| None).build().unwrap();
        assert!(replace.phase().is_resolution());
    }

    #[test]
    fn trigger_builder_registers() {
        let mut engine: Engine<()> = Engine::new();
        let trigger = engine
            .on_timing("destroyed", 2)
            .action(|_, _| Ok(ActionResult::some()))
            .build();

        assert_eq!(engine.active_trigger_count(), 1);
        assert_eq!(trigger.timing(), "destroyed");
        assert_eq!(trigger.layer(), 2);
        assert!(!trigger.is_optional());
    }

    #[test]
    fn trigger_optional_and_mandatory() {
        let mut engine: Engine<()> = Engine::new();
        let optional = engine.on_timing("drawn", 2).optional().build();
        assert!(optional.is_optional());

        let mandatory = engine.on_timing("drawn", 2).optional().mandatory().build();
        assert!(!mandatory.is_optional());
    }
}
