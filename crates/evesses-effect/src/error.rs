//! Effect pipeline errors.
//!
//! The closed taxonomy every callback and phase of the pipeline speaks.
//! All variants implement [`ErrorCode`] for unified handling.
//!
//! # Error Code Convention
//!
//! All effect errors use the `EFFECT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ActivationNegated`](EffectError::ActivationNegated) | `EFFECT_ACTIVATION_NEGATED` | No |
//! | [`EffectNegated`](EffectError::EffectNegated) | `EFFECT_NEGATED` | No |
//! | [`ActionForbidden`](EffectError::ActionForbidden) | `EFFECT_ACTION_FORBIDDEN` | No |
//! | [`CostCannotBePaid`](EffectError::CostCannotBePaid) | `EFFECT_COST_UNPAYABLE` | Yes |
//! | [`ConstraintViolated`](EffectError::ConstraintViolated) | `EFFECT_CONSTRAINT_VIOLATED` | Yes |
//! | [`Host`](EffectError::Host) | `EFFECT_HOST` | No |
//!
//! # Negation Is Two Different Things
//!
//! - **Activation negation**: the effect *never happened*. No timing
//!   event is committed; the chain loop absorbs the error per entry.
//! - **Effect negation**: the effect resolved *to nothing*. The engine
//!   commits a synthetic `effect_negated` marker event, which other
//!   triggers can respond to.
//!
//! # Usage
//!
//! ```
//! use evesses_effect::EffectError;
//! use evesses_types::ErrorCode;
//!
//! let err = EffectError::ConstraintViolated("summon_limit".into());
//! assert_eq!(err.code(), "EFFECT_CONSTRAINT_VIOLATED");
//! // Clears at turn end, so a later attempt may succeed.
//! assert!(err.is_recoverable());
//! ```

use evesses_types::{ErrorCode, FloodgateId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error surfaced by the three-phase effect pipeline or its callbacks.
///
/// # Variants
///
/// | Variant | Phase | Commit side effect |
/// |---------|-------|--------------------|
/// | `ActivationNegated` | Resolution | none — effect never happened |
/// | `EffectNegated` | Resolution | synthetic `effect_negated` event |
/// | `ActionForbidden` | Request | none |
/// | `CostCannotBePaid` | Request | none (cost may have partially mutated the host) |
/// | `ConstraintViolated` | Request | none (the attempt still consumed its usage slot) |
/// | `Host` | any | none |
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum EffectError {
    /// The activation itself was negated: the effect never happened.
    ///
    /// No timing event is committed. The chain loop absorbs this
    /// per entry and keeps draining.
    #[error("activation negated: {0}")]
    ActivationNegated(String),

    /// The effect resolved to nothing.
    ///
    /// The engine commits a synthetic `effect_negated` marker event
    /// carrying the reason, so triggers can respond to the negation
    /// itself.
    #[error("effect negated: {0}")]
    EffectNegated(String),

    /// A Request-phase forbid floodgate blocked the activation.
    ///
    /// Carries the forbidding floodgate's ID so the host can report
    /// *which* continuous interceptor is sealing the effect.
    #[error("action forbidden by {floodgate}: {reason}")]
    ActionForbidden {
        /// Human-readable reason supplied by the floodgate.
        reason: String,
        /// The floodgate whose predicate fired.
        floodgate: FloodgateId,
    },

    /// The cost probe or payment failed.
    ///
    /// The engine never rolls back a partially-paid cost; hosts must
    /// make costs fail before mutating or mutate atomically.
    #[error("cost cannot be paid: {0}")]
    CostCannotBePaid(String),

    /// A constraint rejected the Request.
    ///
    /// Carries the constraint key. Usage slots are consumed by the
    /// *attempt*, not by successful resolution.
    #[error("constraint violated: {0}")]
    ConstraintViolated(String),

    /// Generic host-side failure from any callback.
    #[error("host error: {0}")]
    Host(String),
}

impl ErrorCode for EffectError {
    fn code(&self) -> &'static str {
        match self {
            Self::ActivationNegated(_) => "EFFECT_ACTIVATION_NEGATED",
            Self::EffectNegated(_) => "EFFECT_NEGATED",
            Self::ActionForbidden { .. } => "EFFECT_ACTION_FORBIDDEN",
            Self::CostCannotBePaid(_) => "EFFECT_COST_UNPAYABLE",
            Self::ConstraintViolated(_) => "EFFECT_CONSTRAINT_VIOLATED",
            Self::Host(_) => "EFFECT_HOST",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Negations and forbids are final for this attempt.
            Self::ActivationNegated(_) | Self::EffectNegated(_) | Self::ActionForbidden { .. } => {
                false
            }
            // Costs may become payable, constraints clear at turn end.
            Self::CostCannotBePaid(_) | Self::ConstraintViolated(_) => true,
            Self::Host(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evesses_types::assert_error_codes;

    fn all_variants() -> Vec<EffectError> {
        vec![
            EffectError::ActivationNegated("x".into()),
            EffectError::EffectNegated("x".into()),
            EffectError::ActionForbidden {
                reason: "x".into(),
                floodgate: FloodgateId::new(),
            },
            EffectError::CostCannotBePaid("x".into()),
            EffectError::ConstraintViolated("x".into()),
            EffectError::Host("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EFFECT");
    }

    #[test]
    fn forbidden_carries_floodgate() {
        let floodgate = FloodgateId::new();
        let err = EffectError::ActionForbidden {
            reason: "spells are sealed".into(),
            floodgate,
        };
        assert!(err.to_string().contains("spells are sealed"));
        assert!(err.to_string().contains(&floodgate.to_string()));
    }

    #[test]
    fn recoverability_split() {
        assert!(EffectError::ConstraintViolated("k".into()).is_recoverable());
        assert!(EffectError::CostCannotBePaid("no lp".into()).is_recoverable());
        assert!(!EffectError::ActivationNegated("countered".into()).is_recoverable());
        assert!(!EffectError::EffectNegated("countered".into()).is_recoverable());
        assert!(!EffectError::Host("boom".into()).is_recoverable());
    }

    #[test]
    fn serde_roundtrip() {
        let err = EffectError::ConstraintViolated("once".into());
        let json = serde_json::to_string(&err).unwrap();
        let restored: EffectError = serde_json::from_str(&json).unwrap();
        assert!(matches!(restored, EffectError::ConstraintViolated(key) if key == "once"));
    }
}
