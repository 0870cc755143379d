//! Host-thread dispatch for cross-thread event delivery.
//!
//! The host thread owns a [`HostQueue`]. Any other thread (typically the
//! animation thread, where cards settle) holds a cloneable [`Dispatcher`] and
//! posts closures to it over a `crossbeam-channel`. The host drains the queue
//! with [`HostQueue::process_pending`] at its own scheduling points, so every
//! posted closure runs on the host thread, in posting order.
//!
//! ```
//! use swipedeck_core::dispatch::HostQueue;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let queue = HostQueue::new();
//! let dispatcher = queue.dispatcher();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_clone = hits.clone();
//! std::thread::spawn(move || {
//!     dispatcher
//!         .post(move || {
//!             hits_clone.fetch_add(1, Ordering::SeqCst);
//!         })
//!         .unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(queue.process_pending(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::{CoreError, Result};
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// A type-erased closure waiting to run on the host thread.
type QueuedInvocation = Box<dyn FnOnce() + Send>;

/// The sending side of a [`HostQueue`].
///
/// Cheap to clone and `Send + Sync`; hand one to every thread that needs to
/// reach the host.
#[derive(Clone)]
pub struct Dispatcher {
    sender: Sender<QueuedInvocation>,
}

impl Dispatcher {
    /// Post a closure to run on the host thread.
    ///
    /// Fails with [`CoreError::QueueClosed`] once the host queue is dropped.
    pub fn post<F>(&self, invoke: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Box::new(invoke))
            .map_err(|_| CoreError::QueueClosed)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.sender.len())
            .finish()
    }
}

/// The host thread's mailbox.
///
/// Created on, and drained from, the host thread. Draining from any other
/// thread trips a thread affinity check.
pub struct HostQueue {
    sender: Sender<QueuedInvocation>,
    receiver: Receiver<QueuedInvocation>,
    affinity: ThreadAffinity,
}

impl Default for HostQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl HostQueue {
    /// Create a queue bound to the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Create a dispatcher that posts into this queue.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            sender: self.sender.clone(),
        }
    }

    /// The host thread this queue is bound to.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Number of invocations waiting to run.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every invocation currently queued, including any posted while
    /// draining. Returns the number executed.
    pub fn process_pending(&self) -> usize {
        self.affinity.assert_same_thread("HostQueue::process_pending");
        let mut count = 0;
        while let Ok(invoke) = self.receiver.try_recv() {
            invoke();
            count += 1;
        }
        if count > 0 {
            tracing::trace!(target: targets::DISPATCH, count, "processed host invocations");
        }
        count
    }
}

impl std::fmt::Debug for HostQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostQueue")
            .field("host", &self.affinity.thread_id())
            .field("pending", &self.pending_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(Dispatcher: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_post_and_process() {
        let queue = HostQueue::new();
        let executed = Arc::new(AtomicBool::new(false));

        let executed_clone = executed.clone();
        queue
            .dispatcher()
            .post(move || executed_clone.store(true, Ordering::SeqCst))
            .unwrap();

        assert_eq!(queue.pending_count(), 1);
        assert!(!executed.load(Ordering::SeqCst));

        assert_eq!(queue.process_pending(), 1);
        assert!(executed.load(Ordering::SeqCst));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_preserves_posting_order() {
        let queue = HostQueue::new();
        let dispatcher = queue.dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen_clone = seen.clone();
            dispatcher.post(move || seen_clone.lock().push(i)).unwrap();
        }

        queue.process_pending();
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_runs_on_host_thread() {
        let queue = HostQueue::new();
        let dispatcher = queue.dispatcher();
        let ran_on = Arc::new(Mutex::new(None));

        let ran_on_clone = ran_on.clone();
        std::thread::spawn(move || {
            dispatcher
                .post(move || *ran_on_clone.lock() = Some(std::thread::current().id()))
                .unwrap();
        })
        .join()
        .unwrap();

        queue.process_pending();
        assert_eq!(*ran_on.lock(), Some(std::thread::current().id()));
    }

    #[test]
    fn test_post_after_queue_dropped() {
        let queue = HostQueue::new();
        let dispatcher = queue.dispatcher();
        drop(queue);

        assert_eq!(dispatcher.post(|| {}), Err(CoreError::QueueClosed));
    }

    #[test]
    fn test_process_from_wrong_thread_panics() {
        crate::thread_check::set_thread_checks_enabled(true);
        let queue = Arc::new(HostQueue::new());

        let queue_clone = queue.clone();
        let result = std::thread::spawn(move || {
            queue_clone.process_pending();
        })
        .join();

        assert!(result.is_err());
    }
}
