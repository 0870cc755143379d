//! Cross-thread event bridge.
//!
//! Watches the active-index register on whichever thread mutates it and
//! marshals the derived host events onto the host thread. Two reactions are
//! re-evaluated on every mutation:
//!
//! - **index change**: fires when the value differs from the last one observed,
//!   then updates the host-visible snapshot;
//! - **exhaustion**: fires `swiped_all` on the false-to-true edge of
//!   `active >= len` for non-looping decks.
//!
//! Reactions run inside the register's change notification, so they see
//! mutations one at a time and in order. Host delivery goes through the
//! [`Dispatcher`] FIFO, which preserves that order on the host side.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use swipedeck_core::{ConnectionId, Dispatcher, Property, ReadOnlyProperty, Signal};

use crate::events::SwiperEvents;
use crate::logging::targets;
use crate::register::ActiveIndexRegister;

#[derive(Debug)]
struct Reactions {
    last_observed: usize,
    exhausted: bool,
}

struct BridgeState {
    reactions: Mutex<Reactions>,
    deck_len: AtomicUsize,
    looping: bool,
    dispatcher: Dispatcher,
    events: Arc<SwiperEvents>,
    snapshot: Arc<Property<usize>>,
    rendered: Arc<Signal<usize>>,
}

impl BridgeState {
    fn observe(&self, value: usize) {
        let mut reactions = self.reactions.lock();

        if value != reactions.last_observed {
            reactions.last_observed = value;
            self.post_index_change(value);
        }

        self.evaluate_exhaustion(&mut reactions, value);
    }

    fn evaluate_exhaustion(&self, reactions: &mut Reactions, value: usize) {
        let exhausted = !self.looping && value >= self.deck_len.load(Ordering::SeqCst);
        if exhausted && !reactions.exhausted {
            tracing::debug!(target: targets::BRIDGE, active = value, "deck exhausted");
            let events = self.events.clone();
            self.post("swiped_all", move || events.swiped_all.emit(()));
        }
        reactions.exhausted = exhausted;
    }

    fn post_index_change(&self, value: usize) {
        tracing::debug!(target: targets::BRIDGE, active = value, "index changed");
        let events = self.events.clone();
        let snapshot = self.snapshot.clone();
        let rendered = self.rendered.clone();
        self.post("index_changed", move || {
            events.index_changed.emit(value);
            snapshot.set(value);
            rendered.emit(value);
        });
    }

    fn post<F>(&self, event: &'static str, deliver: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(error) = self.dispatcher.post(deliver) {
            tracing::warn!(target: targets::BRIDGE, event, %error, "host event dropped");
        }
    }
}

/// Observer of the active-index register that feeds host events.
pub(crate) struct EventBridge {
    state: Arc<BridgeState>,
    register: Arc<ActiveIndexRegister>,
    connection: ConnectionId,
}

impl EventBridge {
    /// Attach to `register`. An empty non-looping deck is reported exhausted
    /// immediately.
    pub(crate) fn attach(
        register: Arc<ActiveIndexRegister>,
        deck_len: usize,
        looping: bool,
        dispatcher: Dispatcher,
        events: Arc<SwiperEvents>,
    ) -> Self {
        let initial = register.get();
        let state = Arc::new(BridgeState {
            reactions: Mutex::new(Reactions {
                last_observed: initial,
                exhausted: false,
            }),
            deck_len: AtomicUsize::new(deck_len),
            looping,
            dispatcher,
            events,
            snapshot: Arc::new(Property::new(initial)),
            rendered: Arc::new(Signal::new()),
        });

        {
            let mut reactions = state.reactions.lock();
            state.evaluate_exhaustion(&mut reactions, initial);
        }

        let observer = state.clone();
        let connection = register.changed().connect(move |&value| observer.observe(value));

        Self {
            state,
            register,
            connection,
        }
    }

    /// The host-visible index, updated on the host thread after each
    /// `index_changed` emission.
    pub(crate) fn snapshot(&self) -> ReadOnlyProperty<usize> {
        ReadOnlyProperty::new(self.state.snapshot.clone())
    }

    /// Emitted on the host thread after the snapshot moves. Drives window
    /// reconciliation.
    pub(crate) fn rendered(&self) -> &Signal<usize> {
        &self.state.rendered
    }

    /// Record a new deck length, clamp a non-looping register to it, and
    /// re-evaluate exhaustion.
    ///
    /// The length is stored before the clamp so the clamp's own notification
    /// is judged against the new length. An exhausted deck that shrinks stays
    /// exhausted without a second `swiped_all`.
    pub(crate) fn resize(&self, len: usize) {
        self.state.deck_len.store(len, Ordering::SeqCst);
        if !self.state.looping {
            self.register.clamp_to(len);
        }

        let mut reactions = self.state.reactions.lock();
        let value = reactions.last_observed;
        self.state.evaluate_exhaustion(&mut reactions, value);
    }

    /// Whether the exhaustion predicate currently holds.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.state.reactions.lock().exhausted
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.register.changed().disconnect(self.connection);
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("reactions", &*self.state.reactions.lock())
            .field("deck_len", &self.state.deck_len.load(Ordering::SeqCst))
            .field("looping", &self.state.looping)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipedeck_core::HostQueue;

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Index(usize),
        All,
    }

    fn recorder(events: &SwiperEvents) -> Arc<Mutex<Vec<Seen>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let index_seen = seen.clone();
        events
            .index_changed
            .connect(move |&index| index_seen.lock().push(Seen::Index(index)));
        let all_seen = seen.clone();
        events.swiped_all.connect(move |_| all_seen.lock().push(Seen::All));
        seen
    }

    fn setup(len: usize, looping: bool) -> (HostQueue, Arc<ActiveIndexRegister>, EventBridge, Arc<Mutex<Vec<Seen>>>) {
        let host = HostQueue::new();
        let register = Arc::new(ActiveIndexRegister::new());
        let events = Arc::new(SwiperEvents::new());
        let seen = recorder(&events);
        let bridge = EventBridge::attach(register.clone(), len, looping, host.dispatcher(), events);
        (host, register, bridge, seen)
    }

    #[test]
    fn test_index_changes_are_delivered_on_host() {
        let (host, register, bridge, seen) = setup(3, false);

        register.advance_from(0);
        assert!(seen.lock().is_empty());
        assert_eq!(bridge.snapshot().get(), 0);

        host.process_pending();
        assert_eq!(*seen.lock(), vec![Seen::Index(1)]);
        assert_eq!(bridge.snapshot().get(), 1);
    }

    #[test]
    fn test_exhaustion_fires_once_per_traversal() {
        let (host, register, bridge, seen) = setup(2, false);

        register.advance_from(0);
        register.advance_from(1);
        assert!(bridge.is_exhausted());
        register.retreat_from(2);
        assert!(!bridge.is_exhausted());
        register.advance_from(1);
        host.process_pending();

        assert_eq!(
            *seen.lock(),
            vec![
                Seen::Index(1),
                Seen::Index(2),
                Seen::All,
                Seen::Index(1),
                Seen::Index(2),
                Seen::All,
            ]
        );
    }

    #[test]
    fn test_empty_deck_is_exhausted_at_attach() {
        let (host, _register, bridge, seen) = setup(0, false);
        assert!(bridge.is_exhausted());
        host.process_pending();
        assert_eq!(*seen.lock(), vec![Seen::All]);
    }

    #[test]
    fn test_looping_never_exhausts() {
        let (host, register, bridge, seen) = setup(1, true);
        register.advance_from(0);
        register.advance_from(1);
        host.process_pending();
        assert!(!bridge.is_exhausted());
        assert_eq!(*seen.lock(), vec![Seen::Index(1), Seen::Index(2)]);
    }

    #[test]
    fn test_deck_len_change_reevaluates_edge() {
        let (host, register, bridge, seen) = setup(3, false);
        register.advance_from(0);
        register.advance_from(1);
        bridge.resize(2);
        bridge.resize(2);
        host.process_pending();
        assert_eq!(*seen.lock(), vec![Seen::Index(1), Seen::Index(2), Seen::All]);

        bridge.resize(10);
        assert!(!bridge.is_exhausted());
    }

    #[test]
    fn test_shrinking_exhausted_deck_stays_quiet() {
        let (host, register, bridge, seen) = setup(3, false);
        for from in 0..3 {
            register.advance_from(from);
        }
        host.process_pending();
        seen.lock().clear();

        bridge.resize(2);
        host.process_pending();

        assert_eq!(register.get(), 2);
        assert!(bridge.is_exhausted());
        assert_eq!(*seen.lock(), vec![Seen::Index(2)]);
    }

    #[test]
    fn test_shrinking_below_active_fires_after_index() {
        let (host, register, bridge, seen) = setup(5, false);
        for from in 0..3 {
            register.advance_from(from);
        }
        host.process_pending();
        seen.lock().clear();

        bridge.resize(2);
        host.process_pending();

        assert_eq!(*seen.lock(), vec![Seen::Index(2), Seen::All]);
    }

    #[test]
    fn test_closed_host_drops_events() {
        let (host, register, _bridge, seen) = setup(1, false);
        drop(host);
        register.advance_from(0);
        assert!(seen.lock().is_empty());
    }
}
