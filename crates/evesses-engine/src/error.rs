//! Chain-level errors.
//!
//! Errors surfaced by `resolve_chain`, distinct from the per-effect
//! taxonomy: an [`InfiniteLoopDetected`](ChainError::InfiniteLoopDetected)
//! is an engine-level fatal, not a game outcome.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`InfiniteLoopDetected`](ChainError::InfiniteLoopDetected) | `CHAIN_INFINITE_LOOP` | No |
//! | [`Effect`](ChainError::Effect) | `CHAIN_EFFECT_FAILED` | delegates |

use evesses_effect::EffectError;
use evesses_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by the chain/trigger loop.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ChainError {
    /// The loop exceeded its iteration cap.
    ///
    /// Engine-level fatal: some trigger/effect combination re-arms
    /// itself forever. The cap is tunable via
    /// `set_max_chain_iterations` (default 1000).
    #[error("chain failed to settle after {iterations} iterations")]
    InfiniteLoopDetected {
        /// Iterations performed when the cap tripped (cap + 1).
        iterations: u32,
    },

    /// A Resolution-phase error that the loop does not absorb.
    ///
    /// Activation negation is absorbed per entry and effect negation
    /// commits a marker; anything else stops the drain and lands here.
    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::InfiniteLoopDetected { .. } => "CHAIN_INFINITE_LOOP",
            Self::Effect(_) => "CHAIN_EFFECT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::InfiniteLoopDetected { .. } => false,
            Self::Effect(inner) => inner.is_recoverable(),
        }
    }
}
