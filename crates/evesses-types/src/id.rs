//! Identifier types for Evesses.
//!
//! All identifiers are UUID v4 newtypes. Effects, triggers, and
//! floodgates each get a distinct ID type so that a trigger handle can
//! never be passed where a floodgate handle is expected, and so that
//! registries can key unregistration without holding the record itself.
//!
//! # Why No `Default`?
//!
//! None of these types implement `Default`. A "default" identifier
//! would be a fresh random UUID, which silently mints a *new* identity
//! where the caller almost certainly wanted an *existing* one. Call
//! [`EffectId::new`] (etc.) explicitly instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for an effect.
///
/// Assigned when the effect is first built. Also used as the implicit
/// constraint-tracker key for unkeyed once-per-turn bookkeeping.
///
/// # Example
///
/// ```
/// use evesses_types::EffectId;
///
/// let id = EffectId::new();
/// let other = EffectId::new();
/// assert_ne!(id, other);
/// assert!(id.to_string().starts_with("eff:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    /// Creates a new random effect ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eff:{}", self.0)
    }
}

/// Identifier for a registered trigger.
///
/// Returned by trigger registration and accepted by unregistration.
///
/// # Example
///
/// ```
/// use evesses_types::TriggerId;
///
/// let id = TriggerId::new();
/// assert!(id.to_string().starts_with("trg:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    /// Creates a new random trigger ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trg:{}", self.0)
    }
}

/// Identifier for a registered floodgate.
///
/// Carried inside `ActionForbidden` errors so the host can tell *which*
/// continuous interceptor blocked an activation.
///
/// # Example
///
/// ```
/// use evesses_types::FloodgateId;
///
/// let id = FloodgateId::new();
/// assert!(id.to_string().starts_with("fg:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloodgateId(pub Uuid);

impl FloodgateId {
    /// Creates a new random floodgate ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for FloodgateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fg:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_id_uniqueness() {
        assert_ne!(EffectId::new(), EffectId::new());
    }

    #[test]
    fn trigger_id_uniqueness() {
        assert_ne!(TriggerId::new(), TriggerId::new());
    }

    #[test]
    fn floodgate_id_uniqueness() {
        assert_ne!(FloodgateId::new(), FloodgateId::new());
    }

    #[test]
    fn display_prefixes() {
        assert!(EffectId::new().to_string().starts_with("eff:"));
        assert!(TriggerId::new().to_string().starts_with("trg:"));
        assert!(FloodgateId::new().to_string().starts_with("fg:"));
    }

    #[test]
    fn display_contains_uuid() {
        let id = TriggerId::new();
        assert!(id.to_string().contains(&id.uuid().to_string()));
    }

    #[test]
    fn serde_roundtrip() {
        let id = FloodgateId::new();
        let json = serde_json::to_string(&id).unwrap();
        let restored: FloodgateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
