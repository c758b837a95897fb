//! Lifetime handles — how registrations outlive their owners.
//!
//! A trigger or floodgate usually belongs to some game-world object (a
//! card on the field, a continuous trap). When that object goes away,
//! its registrations must go away too. The engine does not know what
//! "goes away" means for the host; it consumes a single capability:
//!
//! ```text
//! host object ──► LifetimeHandle::subscribe_expiry(callback)
//!                         │ object leaves play / host destroyed
//!                         ▼
//!                  callback fires once
//!                         ▼
//!    registry entry tombstoned, swept at the next Request phase
//! ```
//!
//! Expiry callbacks must not re-enter the engine; the engine's own
//! subscription only flips a shared flag, and the registries sweep
//! flagged entries before the next Request phase begins.

use std::rc::Rc;

/// Capability offered by host values that can expire.
///
/// Implementations fire each subscribed callback at most once, at the
/// moment the underlying host object's lifetime ends (leaves play, is
/// destroyed with its owner, …).
pub trait LifetimeHandle {
    /// Subscribes a one-shot expiry callback.
    ///
    /// Returns an [`Unsubscribe`] token; cancelling it detaches the
    /// callback without expiring anything. Dropping the token keeps
    /// the subscription alive.
    fn subscribe_expiry(&self, on_expiry: Box<dyn FnOnce()>) -> Unsubscribe;
}

/// Shared, cheaply clonable lifetime handle.
pub type SharedLifetime = Rc<dyn LifetimeHandle>;

/// Token returned by [`LifetimeHandle::subscribe_expiry`].
///
/// Call [`cancel`](Self::cancel) to detach the subscription early
/// (e.g. when the registration is removed explicitly). Dropping the
/// token without cancelling leaves the subscription in place.
pub struct Unsubscribe {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Unsubscribe {
    /// Creates a token that runs `cancel` when cancelled.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a token that detaches nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Detaches the subscription.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Test utilities for lifetime handling.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// A hand-fired [`LifetimeHandle`] for tests.
    ///
    /// Clones share state: subscribing through any clone and calling
    /// [`expire`](Self::expire) on another fires the callback.
    ///
    /// # Example
    ///
    /// ```
    /// use evesses_effect::testing::ManualLifetime;
    /// use evesses_effect::LifetimeHandle;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let lifetime = ManualLifetime::new();
    /// let fired = Rc::new(Cell::new(false));
    /// let flag = Rc::clone(&fired);
    /// lifetime.subscribe_expiry(Box::new(move || flag.set(true)));
    ///
    /// lifetime.expire();
    /// assert!(fired.get());
    /// ```
    #[derive(Clone, Default)]
    pub struct ManualLifetime {
        slots: Rc<RefCell<Vec<Option<Box<dyn FnOnce()>>>>>,
    }

    impl ManualLifetime {
        /// Creates a fresh, unexpired lifetime.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns this lifetime as a [`SharedLifetime`].
        #[must_use]
        pub fn handle(&self) -> SharedLifetime {
            Rc::new(self.clone())
        }

        /// Fires all live subscriptions, once each.
        pub fn expire(&self) {
            let callbacks: Vec<_> = self
                .slots
                .borrow_mut()
                .iter_mut()
                .map(Option::take)
                .collect();
            for callback in callbacks.into_iter().flatten() {
                callback();
            }
        }

        /// Number of live (unfired, uncancelled) subscriptions.
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.slots
                .borrow()
                .iter()
                .filter(|slot| slot.is_some())
                .count()
        }
    }

    impl LifetimeHandle for ManualLifetime {
        fn subscribe_expiry(&self, on_expiry: Box<dyn FnOnce()>) -> Unsubscribe {
            let mut slots = self.slots.borrow_mut();
            let index = slots.len();
            slots.push(Some(on_expiry));

            let slots = Rc::clone(&self.slots);
            Unsubscribe::new(move || {
                if let Some(slot) = slots.borrow_mut().get_mut(index) {
                    *slot = None;
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualLifetime;
    use super::*;
    use std::cell::Cell;

    #[test]
    fn expiry_fires_subscription() {
        let lifetime = ManualLifetime::new();
        let fired = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&fired);
        lifetime.subscribe_expiry(Box::new(move || counter.set(counter.get() + 1)));

        lifetime.expire();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn expiry_is_one_shot() {
        let lifetime = ManualLifetime::new();
        let fired = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&fired);
        lifetime.subscribe_expiry(Box::new(move || counter.set(counter.get() + 1)));

        lifetime.expire();
        lifetime.expire();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancel_detaches_subscription() {
        let lifetime = ManualLifetime::new();
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        let token = lifetime.subscribe_expiry(Box::new(move || flag.set(true)));
        assert_eq!(lifetime.subscriber_count(), 1);

        token.cancel();
        assert_eq!(lifetime.subscriber_count(), 0);

        lifetime.expire();
        assert!(!fired.get());
    }

    #[test]
    fn dropping_token_keeps_subscription() {
        let lifetime = ManualLifetime::new();
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        drop(lifetime.subscribe_expiry(Box::new(move || flag.set(true))));

        lifetime.expire();
        assert!(fired.get());
    }

    #[test]
    fn clones_share_state() {
        let lifetime = ManualLifetime::new();
        let clone = lifetime.clone();
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        clone.subscribe_expiry(Box::new(move || flag.set(true)));

        lifetime.expire();
        assert!(fired.get());
    }

    #[test]
    fn noop_token_cancels_nothing() {
        // Just must not panic.
        Unsubscribe::noop().cancel();
    }
}
