//! Core plumbing for swipedeck.
//!
//! This crate carries the pieces of the deck that know nothing about cards:
//!
//! - **Signal/Slot System**: type-safe observer lists
//! - **Host Dispatch**: a mailbox that moves work onto the host-observable thread
//! - **Properties**: change-detecting cells for host-visible snapshots
//! - **Thread Affinity**: checks that host-only work runs on the host thread
//!
//! # Cross-Thread Example
//!
//! ```
//! use swipedeck_core::{HostQueue, Signal};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let host = HostQueue::new();
//! let settled = Arc::new(Signal::<usize>::new());
//! let last = Arc::new(AtomicUsize::new(0));
//!
//! let last_clone = last.clone();
//! settled.connect(move |&index| last_clone.store(index, Ordering::SeqCst));
//!
//! // The animation thread posts; the signal fires when the host drains.
//! let dispatcher = host.dispatcher();
//! let settled_clone = settled.clone();
//! std::thread::spawn(move || {
//!     dispatcher.post(move || settled_clone.emit(4)).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(last.load(Ordering::SeqCst), 0);
//! host.process_pending();
//! assert_eq!(last.load(Ordering::SeqCst), 4);
//! ```

pub mod dispatch;
mod error;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;

pub use dispatch::{Dispatcher, HostQueue};
pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionId, Signal, SignalEmitter};
pub use thread_check::ThreadAffinity;
