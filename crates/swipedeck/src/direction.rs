//! Swipe directions and gesture axes.

use serde::{Deserialize, Serialize};

/// One of the four directions a card can leave the deck in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Off the left edge.
    Left,
    /// Off the right edge.
    Right,
    /// Off the top edge.
    Top,
    /// Off the bottom edge.
    Bottom,
}

impl SwipeDirection {
    /// All directions, in declaration order.
    pub const ALL: [SwipeDirection; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// The axis this direction moves along.
    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Sign of the translation along [`axis`](Self::axis): negative for left
    /// and top, positive for right and bottom.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left | Self::Top => -1.0,
            Self::Right | Self::Bottom => 1.0,
        }
    }

    /// The direction pointing the other way along the same axis.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Pick the direction along `axis` matching the sign of `delta`.
    pub fn from_axis_delta(axis: Axis, delta: f32) -> Self {
        match (axis, delta < 0.0) {
            (Axis::Horizontal, true) => Self::Left,
            (Axis::Horizontal, false) => Self::Right,
            (Axis::Vertical, true) => Self::Top,
            (Axis::Vertical, false) => Self::Bottom,
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// A screen axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

/// Which axes a card's pan gesture may move along.
///
/// Only gestures are restricted; imperative swipes in any enabled direction
/// are still honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureAxis {
    /// Single-axis: horizontal drags only.
    Horizontal,
    /// Full 2D gesture.
    #[default]
    Both,
}

impl GestureAxis {
    /// Whether a gesture along `axis` is allowed.
    pub fn allows(self, axis: Axis) -> bool {
        match self {
            Self::Horizontal => axis == Axis::Horizontal,
            Self::Both => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_and_sign() {
        assert_eq!(SwipeDirection::Left.axis(), Axis::Horizontal);
        assert_eq!(SwipeDirection::Bottom.axis(), Axis::Vertical);
        assert_eq!(SwipeDirection::Top.sign(), -1.0);
        assert_eq!(SwipeDirection::Right.sign(), 1.0);
    }

    #[test]
    fn test_from_axis_delta() {
        assert_eq!(SwipeDirection::from_axis_delta(Axis::Horizontal, -3.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_axis_delta(Axis::Vertical, 4.0), SwipeDirection::Bottom);
        for direction in SwipeDirection::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn test_gesture_axis() {
        assert!(GestureAxis::Both.allows(Axis::Vertical));
        assert!(GestureAxis::Horizontal.allows(Axis::Horizontal));
        assert!(!GestureAxis::Horizontal.allows(Axis::Vertical));
    }
}
