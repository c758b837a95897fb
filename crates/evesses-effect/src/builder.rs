//! Fluent construction of effects.
//!
//! [`EffectBuilder`] is a pure value builder: it produces an
//! [`Effect`] and registers nothing. (Triggers and floodgates, which
//! *do* register on build, get their builders from the engine.)

use crate::callback::{ActionFn, CostFn, TargetFn};
use crate::compound::{CompoundKind, CompoundStep};
use crate::constraint::Constraint;
use crate::effect::{Effect, EffectInner};
use crate::lifetime::SharedLifetime;
use crate::EffectError;
use evesses_event::ActionResult;
use evesses_types::EffectId;
use serde_json::Value;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Builder for [`Effect`]s.
///
/// Every method takes and returns the builder; `build()` finalizes.
/// Unset parts fall back to the defaults documented on [`Effect`].
///
/// # Example
///
/// ```
/// use evesses_effect::EffectBuilder;
/// use evesses_event::{ActionResult, TimingEvent};
///
/// struct Game {
///     lp: i32,
/// }
///
/// let effect = EffectBuilder::<Game>::new()
///     .tag("spell")
///     .once_per_turn()
///     .cost(|game| {
///         game.lp -= 500;
///         Ok(())
///     })
///     .action(|_game, _targets| {
///         Ok(ActionResult::some_with(TimingEvent::new("drawn", 2)))
///     })
///     .build();
///
/// assert!(effect.has_tag("spell"));
/// ```
pub struct EffectBuilder<C> {
    id: EffectId,
    tags: BTreeSet<String>,
    constraints: Vec<Constraint<C>>,
    cost: Option<CostFn<C>>,
    cost_checker: Option<CostFn<C>>,
    target: Option<TargetFn<C>>,
    action: Option<ActionFn<C>>,
    steps: Vec<CompoundStep<C>>,
    lifetime: Option<SharedLifetime>,
}

impl<C> EffectBuilder<C> {
    /// Starts a new builder with a fresh [`EffectId`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EffectId::new(),
            tags: BTreeSet::new(),
            constraints: Vec::new(),
            cost: None,
            cost_checker: None,
            target: None,
            action: None,
            steps: Vec::new(),
            lifetime: None,
        }
    }

    /// Adds a tag. Tags are what forbid floodgates typically match on.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds a custom activation constraint.
    #[must_use]
    pub fn constraint(
        mut self,
        check: impl Fn(&mut C) -> Result<(), EffectError> + 'static,
    ) -> Self {
        self.constraints.push(Constraint::custom(check));
        self
    }

    /// Limits activation to once per turn, keyed by this effect's ID.
    #[must_use]
    pub fn once_per_turn(self) -> Self {
        let key = self.id.to_string();
        self.once_per_turn_keyed(key)
    }

    /// Limits activation to once per turn under an explicit key.
    ///
    /// Share a key across effects to make them compete for one slot
    /// ("you can only activate one 'Harpie' effect per turn").
    #[must_use]
    pub fn once_per_turn_keyed(mut self, key: impl Into<String>) -> Self {
        self.constraints.push(Constraint::once_per_turn(key));
        self
    }

    /// Limits activation to `max` attempts per turn, keyed by this
    /// effect's ID.
    #[must_use]
    pub fn times_per_turn(self, max: u32) -> Self {
        let key = self.id.to_string();
        self.times_per_turn_keyed(max, key)
    }

    /// Limits activation to `max` attempts per turn under an explicit
    /// key.
    #[must_use]
    pub fn times_per_turn_keyed(mut self, max: u32, key: impl Into<String>) -> Self {
        self.constraints.push(Constraint::times_per_turn(key, max));
        self
    }

    /// Sets the mutating cost.
    ///
    /// Costs are paid during Request and are never refunded, even if
    /// the effect is later negated. Make the cost fail before mutating
    /// or mutate atomically.
    #[must_use]
    pub fn cost(mut self, pay: impl Fn(&mut C) -> Result<(), EffectError> + 'static) -> Self {
        self.cost = Some(Rc::new(pay));
        self
    }

    /// Sets the non-mutating cost probe.
    ///
    /// Runs just before the cost is paid; unset means the probe is a
    /// no-op.
    #[must_use]
    pub fn cost_checker(
        mut self,
        probe: impl Fn(&mut C) -> Result<(), EffectError> + 'static,
    ) -> Self {
        self.cost_checker = Some(Rc::new(probe));
        self
    }

    /// Sets the target selector.
    ///
    /// The selected value is stored with the chain entry and handed to
    /// the action (and every compound step) at Resolution.
    #[must_use]
    pub fn target(
        mut self,
        select: impl Fn(&mut C) -> Result<Value, EffectError> + 'static,
    ) -> Self {
        self.target = Some(Rc::new(select));
        self
    }

    /// Sets the primary action.
    #[must_use]
    pub fn action(
        mut self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.action = Some(Rc::new(act));
        self
    }

    fn step(
        mut self,
        kind: CompoundKind,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.steps.push(CompoundStep::new(kind, Rc::new(act)));
        self
    }

    /// Appends a step that always runs.
    #[must_use]
    pub fn and_also(
        self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.step(CompoundKind::And, act)
    }

    /// Appends a step that runs unless the prior step errored.
    #[must_use]
    pub fn and_then(
        self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.step(CompoundKind::AndThen, act)
    }

    /// Appends a step that runs only if the prior step did something.
    #[must_use]
    pub fn and_if_you_do(
        self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.step(CompoundKind::AndIfYouDo, act)
    }

    /// Like [`and_if_you_do`](Self::and_if_you_do); distinct tag only.
    #[must_use]
    pub fn and_then_if_you_do(
        self,
        act: impl Fn(&mut C, &Value) -> Result<ActionResult, EffectError> + 'static,
    ) -> Self {
        self.step(CompoundKind::AndThenIfYouDo, act)
    }

    /// Binds a lifetime handle.
    ///
    /// When the effect is embedded in a trigger with no lifetime of
    /// its own, the registration expires with this handle instead.
    #[must_use]
    pub fn bind_lifetime(mut self, lifetime: SharedLifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Finalizes the effect.
    #[must_use]
    pub fn build(self) -> Effect<C> {
        let action = self
            .action
            .unwrap_or_else(|| Rc::new(|_: &mut C, _: &Value| Ok(ActionResult::none())));

        Effect {
            inner: Rc::new(EffectInner {
                id: self.id,
                tags: self.tags,
                constraints: self.constraints,
                cost: self.cost,
                cost_checker: self.cost_checker,
                target: self.target,
                action,
                steps: self.steps,
                lifetime: self.lifetime,
            }),
        }
    }
}

impl<C> Default for EffectBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
