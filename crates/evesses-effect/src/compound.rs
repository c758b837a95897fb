//! Compound steps — secondary actions conditional on prior outcome.
//!
//! An effect can chain follow-up actions after its main action
//! ("destroy a monster, and if you do, draw a card"). Each step
//! declares *when* it runs relative to the previous step's outcome.

use crate::callback::ActionFn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a compound step conditions on the previous step's outcome.
///
/// | Kind | Runs when |
/// |------|-----------|
/// | `And` | always |
/// | `AndThen` | previous step did not error |
/// | `AndIfYouDo` | previous step succeeded (did something) |
/// | `AndThenIfYouDo` | previous step succeeded (did something) |
///
/// `AndIfYouDo` and `AndThenIfYouDo` resolve identically; the tag
/// distinction is kept for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundKind {
    /// Always executes, irrespective of the prior step.
    And,
    /// Executes iff the prior step did not error.
    AndThen,
    /// Executes iff the prior step did something observable.
    AndIfYouDo,
    /// Same execution rule as `AndIfYouDo`; distinct tag for reporting.
    AndThenIfYouDo,
}

impl CompoundKind {
    /// Decides whether a step of this kind runs after `prev`.
    #[must_use]
    pub fn should_execute(self, prev: StepState) -> bool {
        match self {
            Self::And => true,
            Self::AndThen => !prev.errored,
            Self::AndIfYouDo | Self::AndThenIfYouDo => prev.succeeded,
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::And => "and",
            Self::AndThen => "and_then",
            Self::AndIfYouDo => "and_if_you_do",
            Self::AndThenIfYouDo => "and_then_if_you_do",
        };
        f.write_str(name)
    }
}

/// Outcome of the previous step, as seen by the next step's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepState {
    /// The previous step returned an error.
    pub errored: bool,
    /// The previous step reported "did something observable".
    pub succeeded: bool,
}

impl StepState {
    /// State after a step that completed with the given success flag.
    #[must_use]
    pub fn completed(succeeded: bool) -> Self {
        Self {
            errored: false,
            succeeded,
        }
    }

    /// State after a step that errored.
    #[must_use]
    pub fn after_error() -> Self {
        Self {
            errored: true,
            succeeded: false,
        }
    }
}

/// A secondary action attached to an effect.
pub struct CompoundStep<C> {
    kind: CompoundKind,
    action: ActionFn<C>,
}

impl<C> CompoundStep<C> {
    /// Creates a step of the given kind.
    #[must_use]
    pub fn new(kind: CompoundKind, action: ActionFn<C>) -> Self {
        Self { kind, action }
    }

    /// The step's conditioning kind.
    #[must_use]
    pub fn kind(&self) -> CompoundKind {
        self.kind
    }

    /// The step's action.
    #[must_use]
    pub fn action(&self) -> &ActionFn<C> {
        &self.action
    }
}
