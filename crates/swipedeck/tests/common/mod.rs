//! Shared fixtures: a card that animates only when told to settle, a factory
//! that keeps every card it mounts, and a recorder for host events.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use swipedeck::{
    CardFactory, CardHandle, CardMount, CardReporter, SpringConfig, SwipeDirection, SwiperEvents,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Swipe(SwipeDirection),
    SwipeBack,
    Flip(Duration),
}

/// A card whose animations complete when the test calls [`MockCard::settle`].
pub struct MockCard {
    pub mount: CardMount,
    reporter: CardReporter,
    commands: Mutex<Vec<Command>>,
    pending: Mutex<Option<Command>>,
}

impl MockCard {
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub fn reporter(&self) -> &CardReporter {
        &self.reporter
    }

    /// Finish the pending animation and report it. Returns false if nothing
    /// was animating.
    pub fn settle(&self) -> bool {
        let pending = self.pending.lock().take();
        match pending {
            Some(Command::Swipe(direction)) => self.reporter.swiped(direction),
            Some(Command::SwipeBack) => self.reporter.returned(),
            Some(Command::Flip(_)) | None => return false,
        }
        true
    }

    fn record(&self, command: Command, animates: bool) {
        self.commands.lock().push(command);
        if animates {
            *self.pending.lock() = Some(command);
        }
    }
}

impl CardHandle for MockCard {
    fn swipe(&self, direction: SwipeDirection, _spring: &SpringConfig) {
        self.record(Command::Swipe(direction), true);
    }

    fn swipe_back(&self, _spring_x: &SpringConfig, _spring_y: &SpringConfig) {
        self.record(Command::SwipeBack, true);
    }

    fn flip(&self, duration: Duration) {
        self.record(Command::Flip(duration), false);
    }

    fn is_settled(&self) -> bool {
        self.pending.lock().is_none()
    }
}

#[derive(Default)]
struct FactoryLog {
    live: BTreeMap<usize, Arc<MockCard>>,
    mounts: Vec<CardMount>,
    unmounts: Vec<usize>,
}

/// Factory that hands out [`MockCard`]s and remembers them.
#[derive(Clone, Default)]
pub struct MockFactory {
    log: Arc<Mutex<FactoryLog>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The card most recently mounted at `position`.
    pub fn card(&self, position: usize) -> Arc<MockCard> {
        self.log
            .lock()
            .live
            .get(&position)
            .cloned()
            .unwrap_or_else(|| panic!("no card mounted at position {position}"))
    }

    pub fn mounts(&self) -> Vec<CardMount> {
        self.log.lock().mounts.clone()
    }

    pub fn mount_count(&self) -> usize {
        self.log.lock().mounts.len()
    }

    pub fn unmounts(&self) -> Vec<usize> {
        self.log.lock().unmounts.clone()
    }
}

impl<T> CardFactory<T> for MockFactory {
    fn mount(&self, _item: &T, mount: &CardMount, reporter: CardReporter) -> Arc<dyn CardHandle> {
        let card = Arc::new(MockCard {
            mount: mount.clone(),
            reporter,
            commands: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
        });
        let mut log = self.log.lock();
        log.live.insert(mount.position, card.clone());
        log.mounts.push(mount.clone());
        card
    }

    fn unmount(&self, position: usize) {
        let mut log = self.log.lock();
        log.unmounts.push(position);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Swiped(SwipeDirection, usize),
    All,
    Index(usize),
    Started,
    Active,
    Ended,
    Pressed(usize),
}

/// Records every host event in delivery order.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn attach(events: &SwiperEvents) -> Self {
        let recorder = Self::default();

        for direction in SwipeDirection::ALL {
            let log = recorder.events.clone();
            events
                .swiped(direction)
                .connect(move |&index| log.lock().push(Event::Swiped(direction, index)));
        }
        let log = recorder.events.clone();
        events.swiped_all.connect(move |_| log.lock().push(Event::All));
        let log = recorder.events.clone();
        events
            .index_changed
            .connect(move |&index| log.lock().push(Event::Index(index)));
        let log = recorder.events.clone();
        events.swipe_started.connect(move |_| log.lock().push(Event::Started));
        let log = recorder.events.clone();
        events.swipe_active.connect(move |_| log.lock().push(Event::Active));
        let log = recorder.events.clone();
        events.swipe_ended.connect(move |_| log.lock().push(Event::Ended));
        let log = recorder.events.clone();
        events
            .pressed
            .connect(move |&index| log.lock().push(Event::Pressed(index)));

        recorder
    }

    /// Take everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}
