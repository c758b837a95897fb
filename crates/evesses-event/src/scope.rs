//! Temporal scopes — hierarchical labels for "when" an event happened.
//!
//! The host opens and closes scopes (turn, phase, step, …) around its
//! game flow; the engine snapshots the current stack into every
//! committed timing event. Layers are purely informational to the
//! host; the engine imposes no nesting rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of temporal nesting: a scope name and its layer.
///
/// # Example
///
/// ```
/// use evesses_event::ScopeFrame;
///
/// let frame = ScopeFrame::new("battle_phase", 2);
/// assert_eq!(frame.name, "battle_phase");
/// assert_eq!(frame.layer, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFrame {
    /// Scope label (e.g. `"turn"`, `"draw_phase"`).
    pub name: String,
    /// Informational nesting layer.
    pub layer: i32,
}

impl ScopeFrame {
    /// Creates a new frame.
    #[must_use]
    pub fn new(name: impl Into<String>, layer: i32) -> Self {
        Self {
            name: name.into(),
            layer,
        }
    }
}

impl fmt::Display for ScopeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.layer)
    }
}

/// Ordered stack of open temporal scopes.
///
/// Scopes close by *name*: [`pop`](Self::pop) removes the topmost
/// frame whose name matches, which tolerates hosts that interleave
/// closes out of strict nesting order.
///
/// # Example
///
/// ```
/// use evesses_event::ScopeStack;
///
/// let mut scopes = ScopeStack::new();
/// scopes.push("turn", 1);
/// scopes.push("main_phase", 2);
/// assert_eq!(scopes.depth(), 2);
///
/// let closed = scopes.pop("turn").unwrap();
/// assert_eq!(closed.name, "turn");
/// assert_eq!(scopes.depth(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Opens a scope on top of the stack.
    pub fn push(&mut self, name: impl Into<String>, layer: i32) {
        self.frames.push(ScopeFrame::new(name, layer));
    }

    /// Closes the topmost scope with the given name.
    ///
    /// Returns the removed frame, or `None` if no open scope matches.
    pub fn pop(&mut self, name: &str) -> Option<ScopeFrame> {
        let index = self.frames.iter().rposition(|frame| frame.name == name)?;
        Some(self.frames.remove(index))
    }

    /// Returns a deep copy of the current frames, bottom-up.
    ///
    /// This is what the engine stamps into committed timing events;
    /// later scope changes never alter an already-committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ScopeFrame> {
        self.frames.clone()
    }

    /// Number of currently open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no scopes are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the open frames, bottom-up.
    #[must_use]
    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }
}
