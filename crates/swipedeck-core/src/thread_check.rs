//! Thread affinity checks for the host-observable thread.
//!
//! A deck lives across two scheduling domains: the animation thread, where
//! cards settle and report back, and the host thread, which owns callbacks
//! and host-visible state. [`ThreadAffinity`] records the thread a piece of
//! state belongs to so that host-only operations can verify where they run.
//!
//! ```
//! use swipedeck_core::thread_check::ThreadAffinity;
//!
//! let host = ThreadAffinity::current();
//! assert!(host.is_same_thread());
//!
//! let seen_from_animation = std::thread::spawn(move || host.is_same_thread())
//!     .join()
//!     .unwrap();
//! assert!(!seen_from_animation);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable runtime affinity checks.
///
/// Checks are enabled in debug builds and disabled in release builds unless
/// overridden here.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if runtime thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Records the thread on which a value was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panic unless called from the bound thread.
    ///
    /// Honors [`set_thread_checks_enabled`].
    ///
    /// # Panics
    ///
    /// Panics when checks are enabled and the caller is on another thread.
    pub fn assert_same_thread(&self, operation: &str) {
        if are_thread_checks_enabled() && !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread(operation);
        #[cfg(not(debug_assertions))]
        let _ = operation;
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            THREAD AFFINITY VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            {operation} must run on the host thread.\n\
            \n\
            Host thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Host callbacks and host-visible state belong to the thread that\n\
            created the HostQueue. Post work to it through a Dispatcher.\n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread("test");
    }

    #[test]
    fn test_affinity_different_thread() {
        let affinity = ThreadAffinity::current();
        let seen = Arc::new(AtomicBool::new(true));

        let seen_clone = seen.clone();
        std::thread::spawn(move || {
            seen_clone.store(affinity.is_same_thread(), Ordering::SeqCst);
        })
        .join()
        .unwrap();

        assert!(!seen.load(Ordering::SeqCst));
    }

    #[test]
    fn test_affinity_panics_on_wrong_thread() {
        set_thread_checks_enabled(true);
        let affinity = ThreadAffinity::current();

        let result = std::thread::spawn(move || {
            affinity.assert_same_thread("process_pending");
        })
        .join();

        assert!(result.is_err(), "expected an affinity violation panic");
    }

    #[test]
    fn test_affinity_is_copy_and_comparable() {
        let a = ThreadAffinity::current();
        let b = a;
        assert_eq!(a, b);
        assert_eq!(a.thread_id(), std::thread::current().id());
    }
}
