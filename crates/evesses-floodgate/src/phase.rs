//! Floodgate phases — when in the pipeline a gate applies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline phase a floodgate applies in.
///
/// | Phase | Gate kinds that fire |
/// |-------|----------------------|
/// | `Request` | `Forbid` |
/// | `Resolution` | `Replace`, `Modify` |
///
/// A gate registered for a phase its kind never fires in is legal but
/// inert; the builder warns about such combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatePhase {
    /// Scanned while an activation is being Requested.
    Request,
    /// Applied while a chain entry is Resolving.
    Resolution,
}

impl GatePhase {
    /// Returns `true` for the Request phase.
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request)
    }

    /// Returns `true` for the Resolution phase.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution)
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Resolution => "resolution",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(GatePhase::Request.is_request());
        assert!(!GatePhase::Request.is_resolution());
        assert!(GatePhase::Resolution.is_resolution());
    }

    #[test]
    fn display() {
        assert_eq!(GatePhase::Request.to_string(), "request");
        assert_eq!(GatePhase::Resolution.to_string(), "resolution");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&GatePhase::Resolution).unwrap();
        let restored: GatePhase = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, GatePhase::Resolution);
    }
}
