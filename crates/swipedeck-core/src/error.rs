//! Error types for swipedeck core plumbing.

/// Errors raised by the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The host queue has been dropped and can no longer accept invocations.
    #[error("host queue is closed")]
    QueueClosed,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
