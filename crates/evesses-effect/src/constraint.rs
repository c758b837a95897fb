//! Activation constraints.
//!
//! Constraints run first in the Request phase, in declaration order;
//! the first failure stops the Request. The usage-bounded variants
//! (`OncePerTurn`, `TimesPerTurn`) are data interpreted by the engine
//! against its constraint tracker — checking *and* consuming a slot on
//! every attempt, so a later negation does not refund the usage.
//! `Custom` constraints are host closures over the context.

use crate::callback::ConstraintFn;
use crate::EffectError;
use std::rc::Rc;

/// One activation constraint on an effect.
pub enum Constraint<C> {
    /// At most one attempt per turn for this key.
    OncePerTurn(String),
    /// At most `max` attempts per turn for this key.
    TimesPerTurn {
        /// Constraint-tracker key.
        key: String,
        /// Maximum attempts before the constraint rejects.
        max: u32,
    },
    /// Host-defined predicate over the context.
    Custom(ConstraintFn<C>),
}

impl<C> Constraint<C> {
    /// Builds a once-per-turn constraint for `key`.
    #[must_use]
    pub fn once_per_turn(key: impl Into<String>) -> Self {
        Self::OncePerTurn(key.into())
    }

    /// Builds an at-most-`max`-per-turn constraint for `key`.
    #[must_use]
    pub fn times_per_turn(key: impl Into<String>, max: u32) -> Self {
        Self::TimesPerTurn {
            key: key.into(),
            max,
        }
    }

    /// Wraps a host predicate.
    #[must_use]
    pub fn custom(check: impl Fn(&mut C) -> Result<(), EffectError> + 'static) -> Self {
        Self::Custom(Rc::new(check))
    }

    /// Short name of the constraint kind, for logging.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::OncePerTurn(_) => "once_per_turn",
            Self::TimesPerTurn { .. } => "times_per_turn",
            Self::Custom(_) => "custom",
        }
    }
}
