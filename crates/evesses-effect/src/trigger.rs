//! Triggers — passive rules that answer timing events with effects.
//!
//! A trigger names a `(timing, layer)` pair, optionally filters the
//! event's data, and embeds the [`Effect`] to Request when it fires.
//! Mandatory triggers fire unconditionally; optional ones are gated
//! through the host's optional-trigger callback.

use crate::callback::FilterFn;
use crate::effect::Effect;
use crate::lifetime::SharedLifetime;
use evesses_event::TimingEvent;
use evesses_types::TriggerId;
use std::fmt;
use std::rc::Rc;

/// A registered timing response, behind a shared handle.
///
/// Usually built through the engine's `on_timing` builder, which
/// registers it on `build()`. Matching is exact on `(timing, layer)`
/// plus the optional filter.
pub struct Trigger<C> {
    inner: Rc<TriggerInner<C>>,
}

struct TriggerInner<C> {
    id: TriggerId,
    timing: String,
    layer: i32,
    filter: Option<FilterFn>,
    optional: bool,
    effect: Effect<C>,
    lifetime: Option<SharedLifetime>,
}

impl<C> Trigger<C> {
    /// Assembles a trigger from its parts.
    ///
    /// Hosts normally go through the engine's `on_timing` builder;
    /// this constructor exists for that builder and for tests.
    #[must_use]
    pub fn new(
        id: TriggerId,
        timing: impl Into<String>,
        layer: i32,
        filter: Option<FilterFn>,
        optional: bool,
        effect: Effect<C>,
        lifetime: Option<SharedLifetime>,
    ) -> Self {
        Self {
            inner: Rc::new(TriggerInner {
                id,
                timing: timing.into(),
                layer,
                filter,
                optional,
                effect,
                lifetime,
            }),
        }
    }

    /// The trigger's identity.
    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.inner.id
    }

    /// The timing name this trigger listens for.
    #[must_use]
    pub fn timing(&self) -> &str {
        &self.inner.timing
    }

    /// The layer this trigger listens on.
    #[must_use]
    pub fn layer(&self) -> i32 {
        self.inner.layer
    }

    /// `true` if activation is player-gated rather than mandatory.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.inner.optional
    }

    /// The effect Requested when this trigger fires.
    #[must_use]
    pub fn effect(&self) -> &Effect<C> {
        &self.inner.effect
    }

    /// The bound lifetime handle, if any.
    ///
    /// Falls back to the embedded effect's lifetime when the trigger
    /// itself has none bound.
    #[must_use]
    pub fn lifetime(&self) -> Option<&SharedLifetime> {
        self.inner
            .lifetime
            .as_ref()
            .or_else(|| self.inner.effect.lifetime())
    }

    /// Returns `true` if this trigger responds to the given event.
    #[must_use]
    pub fn matches(&self, event: &TimingEvent) -> bool {
        if !event.matches(&self.inner.timing, self.inner.layer) {
            return false;
        }
        match &self.inner.filter {
            Some(filter) => filter(event),
            None => true,
        }
    }
}

impl<C> Clone for Trigger<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for Trigger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.inner.id)
            .field("timing", &self.inner.timing)
            .field("layer", &self.inner.layer)
            .field("optional", &self.inner.optional)
            .finish_non_exhaustive()
    }
}
