//! Unified error interface for Evesses.
//!
//! Every public error enum in the workspace implements [`ErrorCode`],
//! which gives the host two things a `Display` string cannot:
//!
//! - **Machine-readable codes** for programmatic handling
//! - **Recoverability info** for retry / re-attempt decisions
//!
//! # Code Format
//!
//! Codes are UPPER_SNAKE_CASE, prefixed by domain, and stable once
//! published:
//!
//! | Domain | Prefix | Example |
//! |--------|--------|---------|
//! | Effect pipeline | `EFFECT_` | `EFFECT_CONSTRAINT_VIOLATED` |
//! | Chain loop | `CHAIN_` | `CHAIN_INFINITE_LOOP` |
//! | Builders | `BUILD_` | `BUILD_MISSING_KIND` |
//!
//! Each error enum pins its whole taxonomy in one test with
//! [`assert_error_codes`], which also catches two variants silently
//! sharing a code.
//!
//! # Recoverability
//!
//! An error is recoverable when a later attempt of the *same* request
//! may succeed without a code change — for example a once-per-turn
//! violation clears at turn end, while a negated activation is final.
//!
//! # Example
//!
//! ```
//! use evesses_types::{assert_error_codes, ErrorCode};
//!
//! #[derive(Debug)]
//! enum GameError {
//!     NoTarget,
//!     DeckEmpty,
//! }
//!
//! impl ErrorCode for GameError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NoTarget => "GAME_NO_TARGET",
//!             Self::DeckEmpty => "GAME_DECK_EMPTY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::DeckEmpty)
//!     }
//! }
//!
//! // The host's own taxonomy plays by the same rules as the engine's.
//! assert_error_codes(&[GameError::NoTarget, GameError::DeckEmpty], "GAME");
//! ```

use std::collections::BTreeMap;

/// Unified error code interface for Evesses errors.
///
/// Implement this for every error type the engine or its hosts can
/// surface. Codes are part of the API contract: once a code ships it
/// must not change.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// UPPER_SNAKE_CASE, domain-prefixed (`EFFECT_`, `CHAIN_`, …),
    /// stable across versions.
    fn code(&self) -> &'static str;

    /// Returns whether a later attempt may succeed.
    ///
    /// `true` for transient conditions (a constraint that clears at
    /// turn end, a cost that becomes payable), `false` for final
    /// outcomes (negation, forbidden activation, caller bugs).
    fn is_recoverable(&self) -> bool;
}

/// Checks a whole error taxonomy against the code conventions.
///
/// Pass one value per enum variant and the bare domain name
/// (`"EFFECT"`, `"CHAIN"`, `"BUILD"`, or the host's own). For each
/// code this verifies the `<DOMAIN>_` prefix, that something follows
/// it, and that every `_`-separated segment is non-empty uppercase
/// ASCII or digits (which rules out leading, trailing, and doubled
/// underscores). It also fails when two variants map to the same
/// code, since that makes them indistinguishable to the host.
///
/// # Panics
///
/// Panics listing *every* violation found, so a taxonomy test reports
/// all bad codes in one run. Intended for use in tests.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], domain: &str) {
    let prefix = format!("{domain}_");
    let mut violations = Vec::new();
    let mut uses_per_code: BTreeMap<&str, u32> = BTreeMap::new();

    for err in errors {
        let code = err.code();
        if let Err(why) = check_code(code, &prefix) {
            violations.push(format!("{code:?} {why}"));
        }
        *uses_per_code.entry(code).or_insert(0) += 1;
    }

    for (code, uses) in uses_per_code {
        if uses > 1 {
            violations.push(format!("{code:?} is shared by {uses} variants"));
        }
    }

    assert!(
        violations.is_empty(),
        "error codes break the {prefix}* convention: {}",
        violations.join("; ")
    );
}

/// Validates one code against the `<DOMAIN>_` convention.
fn check_code(code: &str, prefix: &str) -> Result<(), &'static str> {
    let Some(rest) = code.strip_prefix(prefix) else {
        return Err("is missing the domain prefix");
    };
    if rest.is_empty() {
        return Err("has nothing after the domain prefix");
    }

    for segment in code.split('_') {
        if segment.is_empty() {
            return Err("has a leading, trailing, or doubled underscore");
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err("has a segment that is not uppercase ASCII or digits");
        }
    }

    Ok(())
}
