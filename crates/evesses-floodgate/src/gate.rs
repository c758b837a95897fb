//! Floodgates — continuous interceptors over activations and actions.
//!
//! A floodgate sits in the active list and is consulted on *every*
//! matching pipeline pass until it is unregistered or expires. Exactly
//! one contract per gate:
//!
//! | Kind | Phase | Contract |
//! |------|-------|----------|
//! | `Forbid` | Request | `(ctx, effect) → bool`; `true` fails the activation |
//! | `Modify` | Resolution | `(ctx, event) → Option<event>`; `None` leaves it unchanged |
//! | `Replace` | Resolution | `(ctx, execution) → Option<patch>`; substitutes action and/or targets |
//!
//! Replace gates chain: each one sees the execution as patched by the
//! gates before it in `(layer, insertion)` order.

use crate::GatePhase;
use evesses_effect::{ActionFn, Effect};
use evesses_event::TimingEvent;
use evesses_types::FloodgateId;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Forbid predicate: `true` means the activation fails.
pub type ForbidFn<C> = Rc<dyn Fn(&C, &Effect<C>) -> bool>;

/// Event transformer: `None` leaves the event unchanged.
pub type ModifyFn<C> = Rc<dyn Fn(&C, &TimingEvent) -> Option<TimingEvent>>;

/// Execution substituter: `None` leaves action and targets unchanged.
pub type ReplaceFn<C> = Rc<dyn Fn(&C, &Execution<C>) -> Option<ExecutionPatch<C>>>;

/// The action/targets pair a Replace gate gets to substitute.
pub struct Execution<C> {
    /// The action about to run (possibly already replaced upstream).
    pub action: ActionFn<C>,
    /// The targets it will run against.
    pub targets: Value,
}

impl<C> Clone for Execution<C> {
    fn clone(&self) -> Self {
        Self {
            action: Rc::clone(&self.action),
            targets: self.targets.clone(),
        }
    }
}

/// A Replace gate's substitution. Unset fields keep the current value.
pub struct ExecutionPatch<C> {
    /// Replacement action, if any.
    pub action: Option<ActionFn<C>>,
    /// Replacement targets, if any.
    pub targets: Option<Value>,
}

impl<C> ExecutionPatch<C> {
    /// A patch that changes nothing.
    #[must_use]
    pub fn keep() -> Self {
        Self {
            action: None,
            targets: None,
        }
    }

    /// Substitutes the action.
    #[must_use]
    pub fn with_action(mut self, action: ActionFn<C>) -> Self {
        self.action = Some(action);
        self
    }

    /// Substitutes the targets.
    #[must_use]
    pub fn with_targets(mut self, targets: Value) -> Self {
        self.targets = Some(targets);
        self
    }
}

impl<C> Default for ExecutionPatch<C> {
    fn default() -> Self {
        Self::keep()
    }
}

/// The gate's single contract.
pub enum FloodgateKind<C> {
    /// Request-phase activation veto.
    Forbid(ForbidFn<C>),
    /// Resolution-phase event transformation.
    Modify(ModifyFn<C>),
    /// Resolution-phase action/target substitution.
    Replace(ReplaceFn<C>),
}

impl<C> FloodgateKind<C> {
    /// Short kind name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Forbid(_) => "forbid",
            Self::Modify(_) => "modify",
            Self::Replace(_) => "replace",
        }
    }

    /// The phase this kind actually fires in.
    #[must_use]
    pub fn natural_phase(&self) -> GatePhase {
        match self {
            Self::Forbid(_) => GatePhase::Request,
            Self::Modify(_) | Self::Replace(_) => GatePhase::Resolution,
        }
    }
}

/// A continuous interceptor, behind a shared handle.
///
/// Usually built through the engine's `floodgate()` builder, which
/// registers it on `build()`.
pub struct Floodgate<C> {
    inner: Rc<FloodgateInner<C>>,
}

struct FloodgateInner<C> {
    id: FloodgateId,
    phase: GatePhase,
    layer: i32,
    kind: FloodgateKind<C>,
    reason: Option<String>,
}

impl<C> Floodgate<C> {
    /// Assembles a floodgate from its parts.
    ///
    /// Hosts normally go through the engine's `floodgate()` builder;
    /// this constructor exists for that builder and for tests.
    #[must_use]
    pub fn new(
        id: FloodgateId,
        phase: GatePhase,
        layer: i32,
        kind: FloodgateKind<C>,
        reason: Option<String>,
    ) -> Self {
        Self {
            inner: Rc::new(FloodgateInner {
                id,
                phase,
                layer,
                kind,
                reason,
            }),
        }
    }

    /// The gate's identity.
    #[must_use]
    pub fn id(&self) -> FloodgateId {
        self.inner.id
    }

    /// The phase this gate is consulted in.
    #[must_use]
    pub fn phase(&self) -> GatePhase {
        self.inner.phase
    }

    /// The gate's precedence layer (lower applies first).
    #[must_use]
    pub fn layer(&self) -> i32 {
        self.inner.layer
    }

    /// The gate's contract.
    #[must_use]
    pub fn kind(&self) -> &FloodgateKind<C> {
        &self.inner.kind
    }

    /// Human-readable reason, surfaced in `ActionForbidden`.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.inner.reason.as_deref()
    }
}

impl<C> Clone for Floodgate<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for Floodgate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Floodgate")
            .field("id", &self.inner.id)
            .field("phase", &self.inner.phase)
            .field("layer", &self.inner.layer)
            .field("kind", &self.inner.kind.name())
            .finish_non_exhaustive()
    }
}
