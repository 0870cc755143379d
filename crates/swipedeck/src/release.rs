//! Gesture release resolution.
//!
//! Helper for card implementations: given where a dragged card was released
//! and how fast it was moving, decide whether it commits to a swipe or
//! springs back to rest.

use crate::config::SwiperConfig;
use crate::direction::{Axis, SwipeDirection};
use crate::logging::targets;

/// Release velocity (points per second) that commits a swipe when the
/// configuration does not override it.
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 800.0;

/// What a released card should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Animate off-screen in the direction, then report `swiped`.
    Commit(SwipeDirection),
    /// Spring back to rest. Nothing is reported.
    Return,
}

/// Decide the outcome of releasing a card dragged by `translation` while
/// moving at `velocity`.
///
/// A direction commits when the drag crossed the outer point of its
/// translate range, or when the velocity along it exceeds the velocity
/// threshold. Axes not allowed by the gesture axis and disabled directions
/// never commit. If both axes qualify, the one further past its threshold
/// wins.
pub fn resolve_release(translation: (f32, f32), velocity: (f32, f32), config: &SwiperConfig) -> ReleaseOutcome {
    let velocity_threshold = config
        .velocity_threshold
        .unwrap_or(DEFAULT_VELOCITY_THRESHOLD)
        .abs();

    let candidates = [
        (Axis::Horizontal, translation.0, velocity.0, &config.translate_x_range),
        (Axis::Vertical, translation.1, velocity.1, &config.translate_y_range),
    ];

    let mut best: Option<(SwipeDirection, f32)> = None;
    for (axis, displacement, speed, range) in candidates {
        if !config.gesture_axis.allows(axis) {
            continue;
        }

        let toward = if displacement != 0.0 { displacement } else { speed };
        if toward == 0.0 {
            continue;
        }
        let direction = SwipeDirection::from_axis_delta(axis, toward);
        if !config.is_enabled(direction) {
            continue;
        }

        let score = displacement_ratio(direction, displacement, range)
            .max(velocity_ratio(direction, speed, velocity_threshold));
        if score < 1.0 {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((direction, score));
        }
    }

    match best {
        Some((direction, score)) => {
            tracing::trace!(target: targets::CONTROLS, %direction, score, "release commits");
            ReleaseOutcome::Commit(direction)
        }
        None => ReleaseOutcome::Return,
    }
}

/// How far past the commit point the drag is (1.0 = exactly at it).
fn displacement_ratio(direction: SwipeDirection, displacement: f32, range: &[f32]) -> f32 {
    let edge = if direction.sign() < 0.0 { range.first() } else { range.last() };
    match edge {
        Some(&edge) if edge != 0.0 && edge.signum() == direction.sign() => displacement / edge,
        _ => 0.0,
    }
}

fn velocity_ratio(direction: SwipeDirection, speed: f32, threshold: f32) -> f32 {
    if threshold == 0.0 {
        return 0.0;
    }
    speed * direction.sign() / threshold
}
