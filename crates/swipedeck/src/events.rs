//! Host-facing deck events.

use swipedeck_core::{Signal, SignalEmitter};

use crate::direction::SwipeDirection;

/// Signals the deck emits on the host thread.
///
/// Every signal here is emitted from [`HostQueue`](swipedeck_core::HostQueue)
/// processing, never from an animation thread, so slots may touch host state
/// directly.
///
/// ```
/// use swipedeck::SwiperEvents;
///
/// let events = SwiperEvents::new();
/// events.swiped_right.connect(|&index| println!("liked item {index}"));
/// events.swiped_all.connect(|_| println!("no more cards"));
/// ```
#[derive(Debug, Default)]
pub struct SwiperEvents {
    /// Signal emitted with the item index after a card leaves to the left.
    pub swiped_left: Signal<usize>,

    /// Signal emitted with the item index after a card leaves to the right.
    pub swiped_right: Signal<usize>,

    /// Signal emitted with the item index after a card leaves to the top.
    pub swiped_top: Signal<usize>,

    /// Signal emitted with the item index after a card leaves to the bottom.
    pub swiped_bottom: Signal<usize>,

    /// Signal emitted once when a non-looping deck runs out of cards.
    pub swiped_all: Signal<()>,

    /// Signal emitted with the active index whenever it takes a new value.
    pub index_changed: Signal<usize>,

    /// Signal emitted when a pan gesture begins on the active card.
    pub swipe_started: Signal<()>,

    /// Signal emitted while a pan gesture moves.
    pub swipe_active: Signal<()>,

    /// Signal emitted when a pan gesture is released.
    pub swipe_ended: Signal<()>,

    /// Signal emitted with the item index when a card is tapped.
    pub pressed: Signal<usize>,
}

impl SwiperEvents {
    /// Create a set of unconnected signals.
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-direction swipe signal.
    pub fn swiped(&self, direction: SwipeDirection) -> &Signal<usize> {
        match direction {
            SwipeDirection::Left => &self.swiped_left,
            SwipeDirection::Right => &self.swiped_right,
            SwipeDirection::Top => &self.swiped_top,
            SwipeDirection::Bottom => &self.swiped_bottom,
        }
    }

    fn emitters(&self) -> [&dyn SignalEmitter; 10] {
        [
            &self.swiped_left,
            &self.swiped_right,
            &self.swiped_top,
            &self.swiped_bottom,
            &self.swiped_all,
            &self.index_changed,
            &self.swipe_started,
            &self.swipe_active,
            &self.swipe_ended,
            &self.pressed,
        ]
    }

    /// Total number of connected slots across every signal.
    pub fn connection_count(&self) -> usize {
        self.emitters().iter().map(|signal| signal.connection_count()).sum()
    }

    /// Disconnect every slot from every signal.
    pub fn disconnect_all(&self) {
        for signal in self.emitters() {
            signal.disconnect_all();
        }
    }

    /// Block or unblock every signal at once.
    pub fn set_blocked(&self, blocked: bool) {
        for signal in self.emitters() {
            signal.set_blocked(blocked);
        }
    }
}

static_assertions::assert_impl_all!(SwiperEvents: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_swiped_selects_direction_signal() {
        let events = SwiperEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for direction in SwipeDirection::ALL {
            let seen = seen.clone();
            events
                .swiped(direction)
                .connect(move |&index| seen.lock().push((direction, index)));
        }

        events.swiped(SwipeDirection::Top).emit(2);
        events.swiped_left.emit(5);

        assert_eq!(
            *seen.lock(),
            vec![(SwipeDirection::Top, 2), (SwipeDirection::Left, 5)]
        );
    }

    #[test]
    fn test_bulk_block_and_disconnect() {
        let events = SwiperEvents::new();
        let hits = Arc::new(Mutex::new(0));
        let hits_clone = hits.clone();
        events.pressed.connect(move |_| *hits_clone.lock() += 1);
        events.swiped_all.connect(|_| {});
        assert_eq!(events.connection_count(), 2);

        events.set_blocked(true);
        events.pressed.emit(0);
        events.set_blocked(false);
        events.pressed.emit(0);
        assert_eq!(*hits.lock(), 1);

        events.disconnect_all();
        assert_eq!(events.connection_count(), 0);
    }
}
