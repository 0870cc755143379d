//! A swipeable card deck.
//!
//! swipedeck is the control layer of a "Tinder-style" stack of cards: it
//! tracks which card is in front, exposes imperative swipe, undo and flip
//! operations, decides which cards are mounted, and turns card animations
//! settling on an animation thread into ordered events on the host thread.
//! How cards look and animate is left to the [`CardHandle`] implementation.
//!
//! # Threads
//!
//! Cards report from whatever thread drives their animation. Host events are
//! queued on a [`HostQueue`](swipedeck_core::HostQueue) and only fire when the
//! host thread drains it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use swipedeck::{CardHandle, CardMount, CardReporter, SpringConfig, SwipeDirection, Swiper};
//! use swipedeck_core::HostQueue;
//!
//! // A card that settles as soon as it is commanded.
//! struct Instant(CardReporter);
//!
//! impl CardHandle for Instant {
//!     fn swipe(&self, direction: SwipeDirection, _: &SpringConfig) {
//!         self.0.swiped(direction);
//!     }
//!     fn swipe_back(&self, _: &SpringConfig, _: &SpringConfig) {
//!         self.0.returned();
//!     }
//!     fn flip(&self, _: Duration) {}
//!     fn is_settled(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let host = HostQueue::new();
//! let swiper = Swiper::new(
//!     vec!["a", "b", "c"],
//!     |_: &&str, _: &CardMount, reporter: CardReporter| -> Arc<dyn CardHandle> {
//!         Arc::new(Instant(reporter))
//!     },
//!     &host,
//! );
//! swiper.events().swiped_right.connect(|&index| println!("liked {index}"));
//!
//! let handle = swiper.handle();
//! handle.swipe_right();
//! host.process_pending();
//! assert_eq!(handle.active_index(), 1);
//! ```

mod bridge;
pub mod card;
pub mod config;
mod controls;
pub mod direction;
mod error;
pub mod events;
pub mod logging;
pub mod register;
pub mod registry;
pub mod release;
mod swiper;
pub mod window;

pub use card::{CardFactory, CardHandle, CardKey, CardMount, CardPlacement, CardReport, CardReporter, MountTicket};
pub use config::{
    DirectionConfig, DirectionMap, RangeMap, ScreenSize, SpringConfig, SwiperConfig, SwiperConfigBuilder,
    DEFAULT_FLIP_DURATION_MS,
};
pub use controls::{SwipeControls, UNDO_DEPTH};
pub use direction::{Axis, GestureAxis, SwipeDirection};
pub use error::{Error, Result};
pub use events::SwiperEvents;
pub use register::ActiveIndexRegister;
pub use registry::CardRegistry;
pub use release::{resolve_release, ReleaseOutcome, DEFAULT_VELOCITY_THRESHOLD};
pub use swiper::{KeyFn, Swiper, SwiperBuilder, SwiperHandle};
pub use window::{Slot, VirtualWindow, WINDOW_SIZE};
