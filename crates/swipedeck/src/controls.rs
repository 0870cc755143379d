//! Swipe control facade.
//!
//! The imperative operations of the deck. Each one validates the requested
//! transition against configuration and current state, commands the card at
//! the relevant position, and returns immediately. The active index only moves
//! later, when the card reports that its animation settled.
//!
//! Invalid transitions are silent no-ops: the operation returns `false` and
//! logs the reason at `trace` level under the `swipedeck::controls` target.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use swipedeck_core::Dispatcher;

use crate::card::{CardHandle, CardReport, MountTicket};
use crate::config::SwiperConfig;
use crate::direction::SwipeDirection;
use crate::events::SwiperEvents;
use crate::logging::targets;
use crate::register::ActiveIndexRegister;
use crate::registry::CardRegistry;

/// How many recorded swipes are kept for undo.
///
/// Positions in a looping deck grow without bound, so the oldest records are
/// dropped once the history is full. `swipe_back` can walk back at most this
/// many cards.
pub const UNDO_DEPTH: usize = 64;

/// A command-driven animation that has not settled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Exiting { position: usize, direction: SwipeDirection },
    Returning { position: usize },
}

impl Transition {
    fn position(self) -> usize {
        match self {
            Self::Exiting { position, .. } | Self::Returning { position } => position,
        }
    }
}

/// State shared by the controls, the cards' reporters and the swiper.
///
/// Lock order: `in_flight`, then `registry`, then `gone`, then the register.
pub(crate) struct ControlState {
    pub(crate) config: Arc<SwiperConfig>,
    pub(crate) register: Arc<ActiveIndexRegister>,
    pub(crate) registry: RwLock<CardRegistry>,
    pub(crate) deck_len: AtomicUsize,
    /// Positions that left the deck, with the direction they left in.
    pub(crate) gone: Mutex<BTreeMap<usize, SwipeDirection>>,
    in_flight: Mutex<Option<Transition>>,
    dispatcher: Dispatcher,
    events: Arc<SwiperEvents>,
}

impl ControlState {
    pub(crate) fn new(
        config: Arc<SwiperConfig>,
        deck_len: usize,
        dispatcher: Dispatcher,
        events: Arc<SwiperEvents>,
    ) -> Self {
        Self {
            config,
            register: Arc::new(ActiveIndexRegister::new()),
            registry: RwLock::new(CardRegistry::new()),
            deck_len: AtomicUsize::new(deck_len),
            gone: Mutex::new(BTreeMap::new()),
            in_flight: Mutex::new(None),
            dispatcher,
            events,
        }
    }

    pub(crate) fn deck_len(&self) -> usize {
        self.deck_len.load(Ordering::SeqCst)
    }

    /// The deck item shown at `position`.
    pub(crate) fn item_index(&self, position: usize) -> usize {
        let len = self.deck_len();
        if self.config.looping && len > 0 {
            position % len
        } else {
            position
        }
    }

    fn handle_at(&self, position: usize) -> Option<Arc<dyn CardHandle>> {
        self.registry.read().get(position)
    }

    /// Forget any in-flight transition touching `position`. Its card is being
    /// replaced and will never report.
    pub(crate) fn cancel_transition_at(&self, position: usize) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.is_some_and(|transition| transition.position() == position) {
            tracing::debug!(target: targets::CONTROLS, position, "in-flight transition cancelled by remount");
            *in_flight = None;
        }
    }

    fn swipe(&self, direction: SwipeDirection) -> bool {
        if !self.config.is_enabled(direction) {
            tracing::trace!(target: targets::CONTROLS, %direction, "swipe ignored: direction disabled");
            return false;
        }

        let handle = {
            let mut in_flight = self.in_flight.lock();
            if let Some(transition) = *in_flight {
                tracing::trace!(target: targets::CONTROLS, ?transition, "swipe ignored: transition in flight");
                return false;
            }
            let active = self.register.get();
            if !self.config.looping && active >= self.deck_len() {
                tracing::trace!(target: targets::CONTROLS, active, "swipe ignored: deck exhausted");
                return false;
            }
            let Some(handle) = self.handle_at(active) else {
                tracing::trace!(target: targets::CONTROLS, active, "swipe ignored: no card mounted");
                return false;
            };
            *in_flight = Some(Transition::Exiting {
                position: active,
                direction,
            });
            tracing::debug!(target: targets::CONTROLS, active, %direction, "swipe commanded");
            handle
        };

        handle.swipe(direction, &self.config.direction(direction).spring);
        true
    }

    fn swipe_back(&self) -> bool {
        let handle = {
            let mut in_flight = self.in_flight.lock();
            if let Some(transition) = *in_flight {
                tracing::trace!(target: targets::CONTROLS, ?transition, "swipe back ignored: transition in flight");
                return false;
            }
            let active = self.register.get();
            if active == 0 {
                tracing::trace!(target: targets::CONTROLS, "swipe back ignored: nothing to undo");
                return false;
            }
            let position = active - 1;
            if !self.gone.lock().contains_key(&position) {
                tracing::trace!(target: targets::CONTROLS, position, "swipe back ignored: no swipe recorded");
                return false;
            }
            let Some(handle) = self.handle_at(position) else {
                tracing::trace!(target: targets::CONTROLS, position, "swipe back ignored: no card mounted");
                return false;
            };
            *in_flight = Some(Transition::Returning { position });
            tracing::debug!(target: targets::CONTROLS, position, "swipe back commanded");
            handle
        };

        handle.swipe_back(&self.config.swipe_back_x_spring, &self.config.swipe_back_y_spring);
        true
    }

    fn flip_card(&self) -> bool {
        let active = self.register.get();
        let Some(handle) = self.handle_at(active) else {
            tracing::trace!(target: targets::CONTROLS, active, "flip ignored: no card mounted");
            return false;
        };
        handle.flip(self.config.flip_duration());
        true
    }

    /// Entry point for every card report.
    pub(crate) fn on_card_report(&self, position: usize, ticket: MountTicket, report: CardReport) {
        if self.registry.read().ticket(position) != Some(ticket) {
            tracing::trace!(
                target: targets::CONTROLS,
                position,
                ?report,
                "stale card report ignored"
            );
            return;
        }

        match report {
            CardReport::Swiped(direction) => self.on_swiped(position, direction),
            CardReport::Returned => self.on_returned(position),
            CardReport::SwipeStarted => self.on_gesture(position, report),
            CardReport::SwipeActive => self.on_gesture(position, report),
            CardReport::SwipeEnded => self.on_gesture(position, report),
            CardReport::Pressed => {
                let item = self.item_index(position);
                let events = self.events.clone();
                self.post("pressed", move || events.pressed.emit(item));
            }
        }
    }

    fn on_swiped(&self, position: usize, direction: SwipeDirection) {
        let mut in_flight = self.in_flight.lock();
        let active = self.register.get();
        if active != position {
            tracing::trace!(target: targets::CONTROLS, position, active, "swipe report from inactive card ignored");
            return;
        }
        if !self.config.looping && active >= self.deck_len() {
            tracing::trace!(target: targets::CONTROLS, position, "swipe report past the deck ignored");
            return;
        }
        match *in_flight {
            Some(Transition::Returning { .. }) => {
                tracing::trace!(target: targets::CONTROLS, position, "swipe report ignored: card returning");
                return;
            }
            Some(Transition::Exiting { direction: commanded, .. }) if commanded != direction => {
                tracing::debug!(
                    target: targets::CONTROLS,
                    position,
                    %commanded,
                    %direction,
                    "card settled in a different direction than commanded"
                );
            }
            _ => {}
        }
        *in_flight = None;
        {
            let mut gone = self.gone.lock();
            gone.insert(position, direction);
            while gone.len() > UNDO_DEPTH {
                gone.pop_first();
            }
        }

        let item = self.item_index(position);
        let events = self.events.clone();
        self.post("swiped", move || events.swiped(direction).emit(item));
        self.register.advance_from(position);
    }

    fn on_returned(&self, position: usize) {
        let mut in_flight = self.in_flight.lock();
        let active = self.register.get();
        if active != position + 1 {
            tracing::trace!(target: targets::CONTROLS, position, active, "return report out of place ignored");
            return;
        }
        if self.gone.lock().remove(&position).is_none() {
            tracing::trace!(target: targets::CONTROLS, position, "return report for a card still in the deck ignored");
            return;
        }
        if in_flight.is_some_and(|transition| transition.position() == position) {
            *in_flight = None;
        }
        self.register.retreat_from(active);
    }

    fn on_gesture(&self, position: usize, report: CardReport) {
        let active = self.register.get();
        if active != position {
            tracing::trace!(target: targets::CONTROLS, position, active, ?report, "gesture report from inactive card ignored");
            return;
        }
        let events = self.events.clone();
        match report {
            CardReport::SwipeStarted => self.post("swipe_started", move || events.swipe_started.emit(())),
            CardReport::SwipeActive => self.post("swipe_active", move || events.swipe_active.emit(())),
            CardReport::SwipeEnded => self.post("swipe_ended", move || events.swipe_ended.emit(())),
            _ => {}
        }
    }

    fn post<F>(&self, event: &'static str, deliver: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(error) = self.dispatcher.post(deliver) {
            tracing::warn!(target: targets::CONTROLS, event, %error, "host event dropped");
        }
    }

    fn in_flight(&self) -> Option<Transition> {
        *self.in_flight.lock()
    }
}

/// The imperative swipe operations.
///
/// Cheap to clone and safe to call from any thread. Every operation returns
/// `true` if a card was commanded and `false` if it was a no-op.
#[derive(Clone)]
pub struct SwipeControls {
    state: Arc<ControlState>,
}

impl SwipeControls {
    pub(crate) fn new(state: Arc<ControlState>) -> Self {
        Self { state }
    }

    /// Swipe the active card to the left.
    pub fn swipe_left(&self) -> bool {
        self.state.swipe(SwipeDirection::Left)
    }

    /// Swipe the active card to the right.
    pub fn swipe_right(&self) -> bool {
        self.state.swipe(SwipeDirection::Right)
    }

    /// Swipe the active card to the top.
    pub fn swipe_top(&self) -> bool {
        self.state.swipe(SwipeDirection::Top)
    }

    /// Swipe the active card to the bottom.
    pub fn swipe_bottom(&self) -> bool {
        self.state.swipe(SwipeDirection::Bottom)
    }

    /// Swipe the active card in `direction`.
    ///
    /// No-op if the direction is disabled, no card is mounted at the active
    /// index, the deck is exhausted, or another command is still animating.
    pub fn swipe(&self, direction: SwipeDirection) -> bool {
        self.state.swipe(direction)
    }

    /// Bring the previously swiped card back.
    ///
    /// No-op at index 0, when the previous card has no recorded swipe, or
    /// while another command is still animating. At most [`UNDO_DEPTH`]
    /// swipes can be undone in a row.
    pub fn swipe_back(&self) -> bool {
        self.state.swipe_back()
    }

    /// Flip the active card using the configured flip duration.
    pub fn flip_card(&self) -> bool {
        self.state.flip_card()
    }

    /// The live active index, as last written by a settled card.
    pub fn active_index(&self) -> usize {
        self.state.register.get()
    }

    /// The active-index register.
    pub fn register(&self) -> &ActiveIndexRegister {
        &self.state.register
    }

    /// The deck configuration.
    pub fn config(&self) -> &SwiperConfig {
        &self.state.config
    }

    /// The handle mounted at `position`.
    pub fn handle_at(&self, position: usize) -> Option<Arc<dyn CardHandle>> {
        self.state.handle_at(position)
    }

    /// Mounted positions, ascending.
    pub fn mounted_positions(&self) -> Vec<usize> {
        self.state.registry.read().positions()
    }

    /// Whether a command-driven animation has yet to settle.
    pub fn is_animating(&self) -> bool {
        self.state.in_flight().is_some()
    }
}

impl std::fmt::Debug for SwipeControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeControls")
            .field("active_index", &self.state.register.get())
            .field("deck_len", &self.state.deck_len())
            .field("in_flight", &self.state.in_flight())
            .finish()
    }
}

static_assertions::assert_impl_all!(SwipeControls: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardKey, CardReporter};
    use crate::config::{ScreenSize, SpringConfig};
    use crate::registry::MountedCard;
    use std::time::Duration;
    use swipedeck_core::HostQueue;

    #[derive(Default)]
    struct Commands {
        log: Mutex<Vec<String>>,
    }

    struct LoggingCard {
        commands: Arc<Commands>,
    }

    impl CardHandle for LoggingCard {
        fn swipe(&self, direction: SwipeDirection, _spring: &SpringConfig) {
            self.commands.log.lock().push(format!("swipe {direction}"));
        }
        fn swipe_back(&self, _x: &SpringConfig, _y: &SpringConfig) {
            self.commands.log.lock().push("back".to_string());
        }
        fn flip(&self, duration: Duration) {
            self.commands.log.lock().push(format!("flip {}", duration.as_millis()));
        }
        fn is_settled(&self) -> bool {
            true
        }
    }

    struct Fixture {
        host: HostQueue,
        state: Arc<ControlState>,
        controls: SwipeControls,
        commands: Arc<Commands>,
    }

    impl Fixture {
        fn new(config: SwiperConfig, len: usize) -> Self {
            let host = HostQueue::new();
            let state = Arc::new(ControlState::new(
                Arc::new(config),
                len,
                host.dispatcher(),
                Arc::new(SwiperEvents::new()),
            ));
            let commands = Arc::new(Commands::default());
            Self {
                host,
                controls: SwipeControls::new(state.clone()),
                state,
                commands,
            }
        }

        fn mount(&self, position: usize) -> CardReporter {
            let ticket = MountTicket::next();
            self.state.registry.write().insert(
                position,
                MountedCard {
                    key: CardKey::Index(position),
                    ticket,
                    handle: Arc::new(LoggingCard {
                        commands: self.commands.clone(),
                    }),
                },
            );
            CardReporter::new(position, ticket, Arc::downgrade(&self.state))
        }

        fn log(&self) -> Vec<String> {
            self.commands.log.lock().clone()
        }
    }

    fn config() -> SwiperConfig {
        SwiperConfig::for_screen(ScreenSize::default())
    }

    #[test]
    fn test_swipe_commands_active_card() {
        let fixture = Fixture::new(config(), 3);
        let reporter = fixture.mount(0);

        assert!(fixture.controls.swipe_right());
        assert!(fixture.controls.is_animating());
        assert_eq!(fixture.log(), vec!["swipe right"]);
        assert_eq!(fixture.controls.active_index(), 0);

        reporter.swiped(SwipeDirection::Right);
        assert_eq!(fixture.controls.active_index(), 1);
        assert!(!fixture.controls.is_animating());
        fixture.host.process_pending();
    }

    #[test]
    fn test_disabled_direction_is_noop() {
        let config = SwiperConfig::builder(ScreenSize::default())
            .disable(SwipeDirection::Left)
            .build();
        let fixture = Fixture::new(config, 3);
        fixture.mount(0);

        assert!(!fixture.controls.swipe_left());
        assert!(fixture.log().is_empty());
    }

    #[test]
    fn test_missing_handle_is_noop() {
        let fixture = Fixture::new(config(), 3);
        assert!(!fixture.controls.swipe_top());
        assert!(!fixture.controls.flip_card());
    }

    #[test]
    fn test_second_command_while_exiting_is_noop() {
        let fixture = Fixture::new(config(), 3);
        fixture.mount(0);
        assert!(fixture.controls.swipe_left());
        assert!(!fixture.controls.swipe_right());
        assert!(!fixture.controls.swipe_back());
        assert_eq!(fixture.log(), vec!["swipe left"]);
    }

    #[test]
    fn test_swipe_back_requires_recorded_swipe() {
        let fixture = Fixture::new(config(), 3);
        assert!(!fixture.controls.swipe_back());

        let first = fixture.mount(0);
        fixture.mount(1);
        fixture.controls.swipe_bottom();
        first.swiped(SwipeDirection::Bottom);

        assert!(fixture.controls.swipe_back());
        first.returned();
        assert_eq!(fixture.controls.active_index(), 0);
        assert_eq!(fixture.log(), vec!["swipe bottom", "back"]);
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let config = SwiperConfig::builder(ScreenSize::default()).looping(true).build();
        let fixture = Fixture::new(config, 2);

        for position in 0..UNDO_DEPTH + 10 {
            fixture.mount(position).swiped(SwipeDirection::Right);
        }

        let gone = fixture.state.gone.lock().clone();
        assert_eq!(gone.len(), UNDO_DEPTH);
        assert_eq!(gone.keys().next(), Some(&10));
        assert_eq!(fixture.state.register.get(), UNDO_DEPTH + 10);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let fixture = Fixture::new(config(), 3);
        let old = fixture.mount(0);
        fixture.mount(0);

        old.swiped(SwipeDirection::Left);
        assert_eq!(fixture.controls.active_index(), 0);
    }

    #[test]
    fn test_flip_uses_configured_duration() {
        let config = SwiperConfig::builder(ScreenSize::default())
            .flip_duration(Duration::from_millis(250))
            .build();
        let fixture = Fixture::new(config, 1);
        fixture.mount(0);
        assert!(fixture.controls.flip_card());
        assert_eq!(fixture.log(), vec!["flip 250"]);
        assert_eq!(fixture.controls.active_index(), 0);
    }

    #[test]
    fn test_gesture_reports_only_from_active_card() {
        let fixture = Fixture::new(config(), 3);
        let started = Arc::new(AtomicUsize::new(0));
        let started_clone = started.clone();
        fixture
            .state
            .events
            .swipe_started
            .connect(move |_| {
                started_clone.fetch_add(1, Ordering::SeqCst);
            });

        let active = fixture.mount(0);
        let behind = fixture.mount(1);
        active.swipe_started();
        behind.swipe_started();
        fixture.host.process_pending();

        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
