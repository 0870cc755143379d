//! The card capability interface.
//!
//! The controls never know how a card animates. They command a mounted card
//! through [`CardHandle`], and the card answers through the [`CardReporter`]
//! it was given at mount time once an animation settles. Cards are produced
//! by a [`CardFactory`], which plays the role of the render function.
//!
//! # Implementing a card
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//! use swipedeck::{CardHandle, CardMount, CardReporter, SpringConfig, SwipeDirection};
//!
//! /// A card that settles instantly.
//! struct InstantCard {
//!     reporter: CardReporter,
//!     flipped: AtomicBool,
//! }
//!
//! impl CardHandle for InstantCard {
//!     fn swipe(&self, direction: SwipeDirection, _spring: &SpringConfig) {
//!         self.reporter.swiped(direction);
//!     }
//!
//!     fn swipe_back(&self, _x: &SpringConfig, _y: &SpringConfig) {
//!         self.reporter.returned();
//!     }
//!
//!     fn flip(&self, _duration: Duration) {
//!         self.flipped.fetch_xor(true, Ordering::SeqCst);
//!     }
//!
//!     fn is_settled(&self) -> bool {
//!         true
//!     }
//! }
//!
//! fn mount(_item: &String, _mount: &CardMount, reporter: CardReporter) -> Arc<dyn CardHandle> {
//!     Arc::new(InstantCard { reporter, flipped: AtomicBool::new(false) })
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::config::{SpringConfig, SwiperConfig};
use crate::controls::ControlState;
use crate::direction::SwipeDirection;
use crate::logging::targets;

/// Command interface for a single mounted card.
///
/// Commands return immediately; completion is reported asynchronously through
/// the card's [`CardReporter`].
pub trait CardHandle: Send + Sync {
    /// Animate off-screen in `direction`, then report
    /// [`CardReporter::swiped`].
    fn swipe(&self, direction: SwipeDirection, spring: &SpringConfig);

    /// Animate back to rest from the exit position, then report
    /// [`CardReporter::returned`].
    fn swipe_back(&self, spring_x: &SpringConfig, spring_y: &SpringConfig);

    /// Toggle between front and back content.
    fn flip(&self, duration: Duration);

    /// Whether the card is at rest (no animation in flight).
    fn is_settled(&self) -> bool;

    /// Shorthand for `swipe(SwipeDirection::Left, spring)`.
    fn swipe_left(&self, spring: &SpringConfig) {
        self.swipe(SwipeDirection::Left, spring);
    }

    /// Shorthand for `swipe(SwipeDirection::Right, spring)`.
    fn swipe_right(&self, spring: &SpringConfig) {
        self.swipe(SwipeDirection::Right, spring);
    }

    /// Shorthand for `swipe(SwipeDirection::Top, spring)`.
    fn swipe_top(&self, spring: &SpringConfig) {
        self.swipe(SwipeDirection::Top, spring);
    }

    /// Shorthand for `swipe(SwipeDirection::Bottom, spring)`.
    fn swipe_bottom(&self, spring: &SpringConfig) {
        self.swipe(SwipeDirection::Bottom, spring);
    }
}

/// Identity of a deck item, used to decide whether a mounted card survives a
/// deck replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CardKey {
    /// Positional identity (the default).
    Index(usize),
    /// Caller-supplied identity.
    Named(String),
}

impl From<usize> for CardKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<String> for CardKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<&str> for CardKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

/// Where a freshly mounted card starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPlacement {
    /// At rest in the deck.
    Resting,
    /// Already swiped away in the given direction (kept mounted for undo).
    OffScreen(SwipeDirection),
}

/// Identifies one mount of one card. A remount gets a new ticket, which
/// invalidates reports from the previous mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountTicket(u64);

static NEXT_MOUNT_TICKET: AtomicU64 = AtomicU64::new(1);

impl MountTicket {
    pub(crate) fn next() -> Self {
        Self(NEXT_MOUNT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this ticket.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Everything a card needs to know when it is mounted.
#[derive(Debug, Clone)]
pub struct CardMount {
    /// Position in the traversal. Equals the item index unless looping.
    pub position: usize,
    /// Index of the item in the deck.
    pub item_index: usize,
    /// The item's key.
    pub key: CardKey,
    /// Initial placement.
    pub placement: CardPlacement,
    /// How many items ahead the card should prepare.
    pub prerender_items: usize,
    /// Deck configuration, forwarded unmodified.
    pub config: Arc<SwiperConfig>,
}

/// Something a card tells the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardReport {
    /// The exit animation settled off-screen.
    Swiped(SwipeDirection),
    /// The swipe-back animation settled at rest.
    Returned,
    /// A pan gesture began.
    SwipeStarted,
    /// A pan gesture moved.
    SwipeActive,
    /// A pan gesture was released.
    SwipeEnded,
    /// The card was tapped.
    Pressed,
}

/// The channel a mounted card reports through.
///
/// Cloneable and `Send + Sync`; call it from the animation thread. Reports
/// from a card that has since been unmounted or remounted are ignored.
#[derive(Clone)]
pub struct CardReporter {
    position: usize,
    ticket: MountTicket,
    controls: Weak<ControlState>,
}

impl CardReporter {
    pub(crate) fn new(position: usize, ticket: MountTicket, controls: Weak<ControlState>) -> Self {
        Self {
            position,
            ticket,
            controls,
        }
    }

    /// The position of the reporting card.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The mount this reporter belongs to.
    pub fn ticket(&self) -> MountTicket {
        self.ticket
    }

    /// Deliver a report.
    pub fn report(&self, report: CardReport) {
        match self.controls.upgrade() {
            Some(controls) => controls.on_card_report(self.position, self.ticket, report),
            None => {
                tracing::trace!(
                    target: targets::CONTROLS,
                    position = self.position,
                    ?report,
                    "controls dropped, ignoring card report"
                );
            }
        }
    }

    /// The exit animation in `direction` has settled.
    pub fn swiped(&self, direction: SwipeDirection) {
        self.report(CardReport::Swiped(direction));
    }

    /// The swipe-back animation has settled at rest.
    pub fn returned(&self) {
        self.report(CardReport::Returned);
    }

    /// A pan gesture began.
    pub fn swipe_started(&self) {
        self.report(CardReport::SwipeStarted);
    }

    /// A pan gesture moved.
    pub fn swipe_active(&self) {
        self.report(CardReport::SwipeActive);
    }

    /// A pan gesture was released.
    pub fn swipe_ended(&self) {
        self.report(CardReport::SwipeEnded);
    }

    /// The card was tapped.
    pub fn pressed(&self) {
        self.report(CardReport::Pressed);
    }
}

impl fmt::Debug for CardReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardReporter")
            .field("position", &self.position)
            .field("ticket", &self.ticket)
            .finish()
    }
}

/// Produces a card for a deck item.
///
/// Closures of the shape `Fn(&T, &CardMount, CardReporter) -> Arc<dyn CardHandle>`
/// implement this trait.
pub trait CardFactory<T>: Send + Sync {
    /// Create the card for `item`.
    fn mount(&self, item: &T, mount: &CardMount, reporter: CardReporter) -> Arc<dyn CardHandle>;

    /// Called after the card at `position` leaves the mounted set.
    fn unmount(&self, _position: usize) {}
}

impl<T, F> CardFactory<T> for F
where
    F: Fn(&T, &CardMount, CardReporter) -> Arc<dyn CardHandle> + Send + Sync,
{
    fn mount(&self, item: &T, mount: &CardMount, reporter: CardReporter) -> Arc<dyn CardHandle> {
        self(item, mount, reporter)
    }
}

static_assertions::assert_impl_all!(CardReporter: Send, Sync, Clone);
