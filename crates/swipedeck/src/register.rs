//! The active-index register.
//!
//! A single counter naming the front-most card. It is written only by the
//! swipe controls, from whichever thread a card reports settling on, and only
//! through compare-and-step transitions. Every mutation is published through
//! [`changed`](ActiveIndexRegister::changed) while the register lock is still
//! held, so observers see transitions in the order they happened.

use parking_lot::Mutex;
use swipedeck_core::Signal;

use crate::logging::targets;

/// Shared counter of the active deck position.
pub struct ActiveIndexRegister {
    value: Mutex<usize>,
    changed: Signal<usize>,
}

impl Default for ActiveIndexRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveIndexRegister {
    /// A register starting at 0.
    pub fn new() -> Self {
        Self {
            value: Mutex::new(0),
            changed: Signal::new(),
        }
    }

    /// The current value.
    ///
    /// Must not be called from a [`changed`](Self::changed) slot, which runs
    /// with the register locked; slots receive the new value as argument.
    pub fn get(&self) -> usize {
        *self.value.lock()
    }

    /// Emitted with the new value after every mutation.
    ///
    /// Slots run synchronously on the mutating thread, in mutation order.
    pub fn changed(&self) -> &Signal<usize> {
        &self.changed
    }

    /// Step forward, provided the register still reads `expected`.
    pub(crate) fn advance_from(&self, expected: usize) -> Option<usize> {
        let mut value = self.value.lock();
        if *value != expected {
            tracing::trace!(
                target: targets::REGISTER,
                current = *value,
                expected,
                "advance skipped, register moved"
            );
            return None;
        }
        *value += 1;
        let next = *value;
        tracing::debug!(target: targets::REGISTER, from = expected, to = next, "advance");
        self.changed.emit(next);
        Some(next)
    }

    /// Step back, provided the register still reads `expected`. Never goes
    /// below zero.
    pub(crate) fn retreat_from(&self, expected: usize) -> Option<usize> {
        let mut value = self.value.lock();
        if *value != expected || *value == 0 {
            tracing::trace!(
                target: targets::REGISTER,
                current = *value,
                expected,
                "retreat skipped"
            );
            return None;
        }
        *value -= 1;
        let next = *value;
        tracing::debug!(target: targets::REGISTER, from = expected, to = next, "retreat");
        self.changed.emit(next);
        Some(next)
    }

    /// Lower the value to at most `max`. Used when the deck shrinks.
    pub(crate) fn clamp_to(&self, max: usize) -> Option<usize> {
        let mut value = self.value.lock();
        if *value <= max {
            return None;
        }
        let from = *value;
        *value = max;
        tracing::debug!(target: targets::REGISTER, from, to = max, "clamp");
        self.changed.emit(max);
        Some(max)
    }
}

impl std::fmt::Debug for ActiveIndexRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveIndexRegister")
            .field("value", &*self.value.lock())
            .field("observers", &self.changed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(ActiveIndexRegister: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_advance_and_retreat() {
        let register = ActiveIndexRegister::new();
        assert_eq!(register.get(), 0);

        assert_eq!(register.advance_from(0), Some(1));
        assert_eq!(register.advance_from(0), None);
        assert_eq!(register.get(), 1);

        assert_eq!(register.retreat_from(1), Some(0));
        assert_eq!(register.retreat_from(0), None);
        assert_eq!(register.get(), 0);
    }

    #[test]
    fn test_clamp() {
        let register = ActiveIndexRegister::new();
        register.advance_from(0);
        register.advance_from(1);
        assert_eq!(register.clamp_to(5), None);
        assert_eq!(register.clamp_to(1), Some(1));
        assert_eq!(register.get(), 1);
    }

    #[test]
    fn test_changed_reports_every_mutation_in_order() {
        let register = ActiveIndexRegister::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        register.changed().connect(move |&value| seen_clone.lock().push(value));

        register.advance_from(0);
        register.advance_from(1);
        register.retreat_from(2);
        register.retreat_from(2);

        assert_eq!(*seen.lock(), vec![1, 2, 1]);
    }

    #[test]
    fn test_concurrent_advances_from_same_value() {
        let register = Arc::new(ActiveIndexRegister::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let register = register.clone();
                std::thread::spawn(move || register.advance_from(0).is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(register.get(), 1);
    }
}
