//! Log targets for the deck.
//!
//! Filter on these to follow a single concern, for example
//! `RUST_LOG=swipedeck::controls=trace` to see why a swipe was ignored.

/// Target names for log filtering.
pub mod targets {
    /// Swipe commands, card reports and their no-op reasons.
    pub const CONTROLS: &str = "swipedeck::controls";
    /// Host event marshaling.
    pub const BRIDGE: &str = "swipedeck::bridge";
    /// Virtualization window reconciliation.
    pub const WINDOW: &str = "swipedeck::window";
    /// Active-index transitions.
    pub const REGISTER: &str = "swipedeck::register";
}
