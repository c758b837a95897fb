//! The effect record — a bundle of host callbacks plus metadata.
//!
//! An [`Effect`] is what a player (or a trigger) activates: tags,
//! activation constraints, a cost and its non-mutating probe, a target
//! selector, a primary action, and any compound follow-up steps.
//!
//! Effects are cheap handles (`Clone` bumps a refcount). The chain
//! stack, the pending-response queue, and embedded trigger effects all
//! share the same allocation, which is what lets a trigger's effect be
//! Requested again every time it fires.

use crate::callback::{ActionFn, CostFn, TargetFn};
use crate::compound::CompoundStep;
use crate::constraint::Constraint;
use crate::lifetime::SharedLifetime;
use evesses_types::EffectId;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// A playable effect: callbacks plus metadata, behind a shared handle.
///
/// Build one with `EffectBuilder` (or the engine's `direct_effect()`
/// convenience). Field semantics:
///
/// | Part | Runs in | Default |
/// |------|---------|---------|
/// | constraints | Request, in order | none |
/// | cost probe | Request (non-mutating) | no-op |
/// | cost | Request (mutating, non-refundable) | no-op |
/// | target selector | Request | `Value::Null` |
/// | action | Resolution | does nothing (`ActionResult::none()`) |
/// | compound steps | Resolution, after the action | none |
pub struct Effect<C> {
    pub(crate) inner: Rc<EffectInner<C>>,
}

pub(crate) struct EffectInner<C> {
    pub(crate) id: EffectId,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) constraints: Vec<Constraint<C>>,
    pub(crate) cost: Option<CostFn<C>>,
    pub(crate) cost_checker: Option<CostFn<C>>,
    pub(crate) target: Option<TargetFn<C>>,
    pub(crate) action: ActionFn<C>,
    pub(crate) steps: Vec<CompoundStep<C>>,
    pub(crate) lifetime: Option<SharedLifetime>,
}

impl<C> Effect<C> {
    /// The effect's identity.
    #[must_use]
    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    /// The effect's tags, in sorted order.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.inner.tags
    }

    /// Returns `true` if the effect carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.inner.tags.contains(tag)
    }

    /// Activation constraints, in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint<C>] {
        &self.inner.constraints
    }

    /// The mutating cost, if any.
    #[must_use]
    pub fn cost(&self) -> Option<&CostFn<C>> {
        self.inner.cost.as_ref()
    }

    /// The non-mutating cost probe, if any.
    #[must_use]
    pub fn cost_checker(&self) -> Option<&CostFn<C>> {
        self.inner.cost_checker.as_ref()
    }

    /// The target selector, if any.
    #[must_use]
    pub fn target(&self) -> Option<&TargetFn<C>> {
        self.inner.target.as_ref()
    }

    /// The primary action.
    #[must_use]
    pub fn action(&self) -> &ActionFn<C> {
        &self.inner.action
    }

    /// Compound follow-up steps, in declaration order.
    #[must_use]
    pub fn compound_steps(&self) -> &[CompoundStep<C>] {
        &self.inner.steps
    }

    /// The bound lifetime handle, if any.
    #[must_use]
    pub fn lifetime(&self) -> Option<&SharedLifetime> {
        self.inner.lifetime.as_ref()
    }
}

impl<C> Clone for Effect<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for Effect<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.inner.id)
            .field("tags", &self.inner.tags)
            .field("constraints", &self.inner.constraints.len())
            .field("steps", &self.inner.steps.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::EffectBuilder;
    use evesses_event::ActionResult;

    #[test]
    fn handles_share_one_allocation() {
        let effect: crate::Effect<()> = EffectBuilder::new().tag("spell").build();
        let clone = effect.clone();
        assert_eq!(effect.id(), clone.id());
    }

    #[test]
    fn tags_are_sorted_and_deduped() {
        let effect: crate::Effect<()> = EffectBuilder::new()
            .tag("spell")
            .tag("counter")
            .tag("spell")
            .build();

        let tags: Vec<_> = effect.tags().iter().cloned().collect();
        assert_eq!(tags, vec!["counter".to_string(), "spell".to_string()]);
        assert!(effect.has_tag("spell"));
        assert!(!effect.has_tag("trap"));
    }

    #[test]
    fn default_action_does_nothing() {
        let effect: crate::Effect<()> = EffectBuilder::new().build();
        let result = (effect.action())(&mut (), &serde_json::Value::Null).unwrap();
        assert_eq!(result, ActionResult::none());
    }

    #[test]
    fn debug_shows_identity() {
        let effect: crate::Effect<()> = EffectBuilder::new().tag("spell").build();
        let debug = format!("{effect:?}");
        assert!(debug.contains("Effect"));
        assert!(debug.contains("spell"));
    }
}
