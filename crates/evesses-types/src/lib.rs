//! Core types for the Evesses effect-resolution engine.
//!
//! This crate provides the foundational identifier types and the
//! error-code contract shared by every layer of the workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         SDK Layer                            │
//! │  (stable surface, safe for hosts to depend on)               │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-types     : IDs, ErrorCode            ◄── HERE      │
//! │  evesses-event     : TimingEvent, ActionResult, scopes       │
//! │  evesses-effect    : Effect, Trigger, builders, errors       │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Interceptor Layer                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-floodgate : Floodgate, ordered registry             │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Runtime Layer                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  evesses-engine    : three-phase pipeline, chain loop        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! All identifiers are UUID-based: globally unique without
//! coordination, serializable, and impossible to confuse across kinds
//! (an [`EffectId`] is not a [`TriggerId`]).
//!
//! # Example
//!
//! ```
//! use evesses_types::{EffectId, FloodgateId, TriggerId};
//!
//! let effect = EffectId::new();
//! let trigger = TriggerId::new();
//! let floodgate = FloodgateId::new();
//!
//! assert!(effect.to_string().starts_with("eff:"));
//! assert!(trigger.to_string().starts_with("trg:"));
//! assert!(floodgate.to_string().starts_with("fg:"));
//! ```

mod error;
mod id;

pub use error::{assert_error_codes, ErrorCode};
pub use id::{EffectId, FloodgateId, TriggerId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_kinds_are_distinct_types() {
        // Compile-time property; the test documents it.
        let effect: EffectId = EffectId::new();
        let trigger: TriggerId = TriggerId::new();
        assert_ne!(effect.uuid(), trigger.uuid());
    }

    #[test]
    fn ids_roundtrip_through_json() {
        let id = EffectId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<EffectId>(&json).unwrap(), id);
    }
}
