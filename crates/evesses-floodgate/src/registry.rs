//! Floodgate registry — the ordered active list.
//!
//! Gates apply in `(layer asc, insertion asc)` order, and the list is
//! kept sorted at all times: registration inserts at the position that
//! preserves the order (stable FIFO within a layer), so dispatch is a
//! plain in-order walk.

use crate::{Floodgate, GatePhase};
use evesses_effect::Unsubscribe;
use evesses_types::FloodgateId;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

struct RegisteredGate<C> {
    gate: Floodgate<C>,
    insertion_index: u64,
    enabled: bool,
    /// Tombstone set by the gate's lifetime subscription; swept before
    /// the next Request phase.
    expired: Rc<Cell<bool>>,
    subscriptions: Vec<Unsubscribe>,
}

/// Ordered registry of active floodgates.
///
/// # Ordering Invariant
///
/// For any two entries `f` before `g`: `f.layer < g.layer`, or
/// `f.layer == g.layer` and `f` was registered first.
pub struct FloodgateRegistry<C> {
    entries: Vec<RegisteredGate<C>>,
    insertion_counter: u64,
}

impl<C> FloodgateRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            insertion_counter: 0,
        }
    }

    /// Registers a gate with no lifetime attached.
    pub fn register(&mut self, gate: Floodgate<C>) -> FloodgateId {
        self.register_with_expiry(gate, Rc::new(Cell::new(false)), Vec::new())
    }

    /// Registers a gate with an expiry tombstone and the subscriptions
    /// that feed it.
    ///
    /// The caller (the engine) wires the gate's lifetime handle to set
    /// `expired`; the registry drops the entry on the next
    /// [`sweep_expired`](Self::sweep_expired).
    pub fn register_with_expiry(
        &mut self,
        gate: Floodgate<C>,
        expired: Rc<Cell<bool>>,
        subscriptions: Vec<Unsubscribe>,
    ) -> FloodgateId {
        let id = gate.id();
        let layer = gate.layer();
        let insertion_index = self.insertion_counter;
        self.insertion_counter += 1;

        // Insert in (layer, insertion) order: stable FIFO within a layer.
        let position = self
            .entries
            .iter()
            .position(|entry| entry.gate.layer() > layer)
            .unwrap_or(self.entries.len());

        debug!(floodgate = %id, layer, kind = gate.kind().name(), "floodgate registered");

        self.entries.insert(
            position,
            RegisteredGate {
                gate,
                insertion_index,
                enabled: true,
                expired,
                subscriptions,
            },
        );

        id
    }

    /// Unregisters a gate by ID, cancelling its lifetime
    /// subscriptions. Returns `true` if found and removed.
    pub fn unregister(&mut self, id: FloodgateId) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.gate.id() == id) else {
            return false;
        };

        let entry = self.entries.remove(position);
        for subscription in entry.subscriptions {
            subscription.cancel();
        }
        debug!(floodgate = %id, "floodgate unregistered");
        true
    }

    /// Enables or disables a gate. Disabled gates stay registered but
    /// are skipped by dispatch. Returns `true` if the gate was found.
    pub fn set_enabled(&mut self, id: FloodgateId, enabled: bool) -> bool {
        for entry in &mut self.entries {
            if entry.gate.id() == id {
                entry.enabled = enabled;
                return true;
            }
        }
        false
    }

    /// Drops entries whose lifetime tombstone has been set.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.expired.get());
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "expired floodgates swept");
        }
        removed
    }

    /// Number of registered gates (including disabled ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no gates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks the live (enabled, unexpired) gates in order.
    pub fn iter(&self) -> impl Iterator<Item = &Floodgate<C>> {
        self.entries
            .iter()
            .filter(|entry| entry.enabled && !entry.expired.get())
            .map(|entry| &entry.gate)
    }

    /// Walks the live gates of one phase in order.
    pub fn iter_phase(&self, phase: GatePhase) -> impl Iterator<Item = &Floodgate<C>> {
        self.iter().filter(move |gate| gate.phase() == phase)
    }

    /// Checks the ordering invariant; used by tests.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            let (first, second) = (&pair[0], &pair[1]);
            first.gate.layer() < second.gate.layer()
                || (first.gate.layer() == second.gate.layer()
                    && first.insertion_index < second.insertion_index)
        })
    }
}

impl<C> Default for FloodgateRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FloodgateKind;

    fn gate(layer: i32) -> Floodgate<()> {
        Floodgate::new(
            FloodgateId::new(),
            GatePhase::Request,
            layer,
            FloodgateKind::Forbid(Rc::new(|_, _| false)),
            None,
        )
    }

    fn modify_gate(layer: i32) -> Floodgate<()> {
        Floodgate::new(
            FloodgateId::new(),
            GatePhase::Resolution,
            layer,
            FloodgateKind::Modify(Rc::new(|_, _| None)),
            None,
        )
    }

    // ── Ordering ─────────────────────────────────────────────

    #[test]
    fn sorted_by_layer_then_insertion() {
        let mut registry = FloodgateRegistry::new();
        let late_low = gate(1);
        let late_low_id = late_low.id();

        registry.register(gate(5));
        registry.register(gate(2));
        registry.register(late_low);
        registry.register(gate(2));

        assert!(registry.is_sorted());
        let layers: Vec<_> = registry.iter().map(Floodgate::layer).collect();
        assert_eq!(layers, vec![1, 2, 2, 5]);
        assert_eq!(registry.iter().next().unwrap().id(), late_low_id);
    }

    #[test]
    fn same_layer_is_fifo() {
        let mut registry = FloodgateRegistry::new();
        let first = gate(3);
        let second = gate(3);
        let (first_id, second_id) = (first.id(), second.id());

        registry.register(first);
        registry.register(second);

        let ids: Vec<_> = registry.iter().map(Floodgate::id).collect();
        assert_eq!(ids, vec![first_id, second_id]);
    }

    // ── Phase filtering ──────────────────────────────────────

    #[test]
    fn iter_phase_filters() {
        let mut registry = FloodgateRegistry::new();
        registry.register(gate(1));
        registry.register(modify_gate(1));
        registry.register(gate(2));

        assert_eq!(registry.iter_phase(GatePhase::Request).count(), 2);
        assert_eq!(registry.iter_phase(GatePhase::Resolution).count(), 1);
    }

    // ── Enable / disable ─────────────────────────────────────

    #[test]
    fn disabled_gates_are_skipped() {
        let mut registry = FloodgateRegistry::new();
        let id = registry.register(gate(1));

        assert!(registry.set_enabled(id, false));
        assert_eq!(registry.iter().count(), 0);
        assert_eq!(registry.len(), 1); // still registered

        assert!(registry.set_enabled(id, true));
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn set_enabled_unknown_id() {
        let mut registry: FloodgateRegistry<()> = FloodgateRegistry::new();
        assert!(!registry.set_enabled(FloodgateId::new(), false));
    }

    // ── Unregister ───────────────────────────────────────────

    #[test]
    fn unregister_by_id() {
        let mut registry = FloodgateRegistry::new();
        let id = registry.register(gate(1));
        registry.register(gate(2));

        assert!(registry.unregister(id));
        assert_eq!(registry.len(), 1);
        assert!(!registry.unregister(id)); // already gone
    }

    // ── Expiry ───────────────────────────────────────────────

    #[test]
    fn sweep_removes_tombstoned() {
        let mut registry = FloodgateRegistry::new();
        let tombstone = Rc::new(Cell::new(false));
        registry.register_with_expiry(gate(1), Rc::clone(&tombstone), Vec::new());
        registry.register(gate(2));

        assert_eq!(registry.sweep_expired(), 0);

        tombstone.set(true);
        assert_eq!(registry.iter().count(), 1); // already invisible
        assert_eq!(registry.sweep_expired(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry() {
        let registry: FloodgateRegistry<()> = FloodgateRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.is_sorted());
        assert_eq!(registry.iter().count(), 0);
    }
}
