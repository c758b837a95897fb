//! Floodgates for the Evesses engine — continuous rule interceptors.
//!
//! A floodgate is a standing rule that intercepts the pipeline for as
//! long as it is registered: it can **forbid** activations at Request,
//! or **replace** the action/targets and **modify** the emitted events
//! at Resolution. The name comes from the card-game archetype: a
//! face-up card that continuously warps the rules until it leaves the
//! field.
//!
//! # Application Order
//!
//! ```text
//! Request phase:     walk Forbid gates   ──► first `true` fails the activation
//!
//! Resolution phase:  walk Replace gates  ──► chained action/target substitution
//!                    execute the action
//!                    walk Modify gates   ──► per-event transformation
//! ```
//!
//! All walks are in `(layer asc, insertion asc)` order over the
//! [`FloodgateRegistry`], which maintains that order as its standing
//! invariant.
//!
//! # Example
//!
//! ```
//! use evesses_floodgate::{Floodgate, FloodgateKind, FloodgateRegistry, GatePhase};
//! use evesses_types::FloodgateId;
//! use std::rc::Rc;
//!
//! let mut registry: FloodgateRegistry<()> = FloodgateRegistry::new();
//!
//! // Seal all spell effects while this gate is active.
//! let seal = Floodgate::new(
//!     FloodgateId::new(),
//!     GatePhase::Request,
//!     1,
//!     FloodgateKind::Forbid(Rc::new(|_ctx, effect| effect.has_tag("spell"))),
//!     Some("spells are sealed".into()),
//! );
//! let id = registry.register(seal);
//!
//! assert_eq!(registry.iter_phase(GatePhase::Request).count(), 1);
//! registry.unregister(id);
//! assert!(registry.is_empty());
//! ```

mod gate;
mod phase;
mod registry;

pub use gate::{
    Execution, ExecutionPatch, Floodgate, FloodgateKind, ForbidFn, ModifyFn, ReplaceFn,
};
pub use phase::GatePhase;
pub use registry::FloodgateRegistry;

// Re-export from the types crate for convenience
pub use evesses_types::FloodgateId;
