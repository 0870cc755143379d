//! Error types for swipedeck.
//!
//! Deck operations never fail: invalid transitions are silent no-ops. Errors
//! only arise at the configuration boundary.

/// Result type alias for swipedeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration document could not be parsed.
    #[error("invalid swiper configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize swiper configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
