//! Deck configuration.
//!
//! [`SwiperConfig`] gathers every tunable of a deck in one place. Defaults that
//! depend on the screen (translation thresholds, rotation and overlay ranges)
//! are computed once from a [`ScreenSize`] when the config is built, and the
//! finished config is shared with every mounted card unchanged.
//!
//! ```
//! use swipedeck::{ScreenSize, SwipeDirection, SwiperConfig};
//! use std::time::Duration;
//!
//! let config = SwiperConfig::builder(ScreenSize::new(300.0, 600.0))
//!     .disable(SwipeDirection::Bottom)
//!     .velocity_threshold(1200.0)
//!     .flip_duration(Duration::from_millis(300))
//!     .build();
//!
//! assert!(!config.direction(SwipeDirection::Bottom).enabled);
//! assert_eq!(config.translate_x_range, vec![-100.0, 0.0, 100.0]);
//! ```
//!
//! Configs can also be loaded from TOML. Missing keys fall back to the
//! screen-derived defaults:
//!
//! ```
//! use swipedeck::{ScreenSize, SwipeDirection, SwiperConfig};
//!
//! let config = SwiperConfig::from_toml_str(
//!     r#"
//!     looping = true
//!
//!     [directions.top]
//!     enabled = false
//!     "#,
//!     ScreenSize::default(),
//! )
//! .unwrap();
//!
//! assert!(config.looping);
//! assert!(!config.direction(SwipeDirection::Top).enabled);
//! ```

use std::f32::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::direction::{GestureAxis, SwipeDirection};
use crate::error::Result;

/// Default flip animation length in milliseconds.
pub const DEFAULT_FLIP_DURATION_MS: u64 = 500;

/// Logical screen dimensions used to derive default ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl ScreenSize {
    /// Create a screen size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenSize {
    /// A 390x844 reference phone screen.
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

/// Spring parameters for a card's exit or return animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Damping coefficient.
    pub damping: f32,
    /// Spring stiffness.
    pub stiffness: f32,
    /// Mass of the animated object.
    pub mass: f32,
    /// Clamp the spring so it never overshoots its target.
    pub overshoot_clamping: bool,
    /// Displacement below which the spring is considered at rest.
    pub rest_displacement_threshold: f32,
    /// Speed below which the spring is considered at rest.
    pub rest_speed_threshold: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 20.0,
            stiffness: 50.0,
            mass: 1.0,
            overshoot_clamping: true,
            rest_displacement_threshold: 0.0001,
            rest_speed_threshold: 0.0001,
        }
    }
}

/// A piecewise-linear mapping from an input range to an output range.
///
/// Used for two- and three-point ranges (translation to rotation, translation
/// to overlay opacity). Values are consumed as given; monotonicity is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeMap {
    /// Input breakpoints.
    pub input: Vec<f32>,
    /// Output values at each breakpoint.
    pub output: Vec<f32>,
}

impl RangeMap {
    /// A two-point range.
    pub fn two(input: [f32; 2], output: [f32; 2]) -> Self {
        Self {
            input: input.to_vec(),
            output: output.to_vec(),
        }
    }

    /// A three-point range.
    pub fn three(input: [f32; 3], output: [f32; 3]) -> Self {
        Self {
            input: input.to_vec(),
            output: output.to_vec(),
        }
    }

    /// Map `value` through the range, clamping at both ends.
    ///
    /// Breakpoints may run in either direction (`[0, -w/3]` is a valid input
    /// range for a leftward overlay).
    pub fn interpolate(&self, value: f32) -> f32 {
        let points = self.input.len().min(self.output.len());
        match points {
            0 => 0.0,
            1 => self.output[0],
            _ => {
                let descending = self.input[points - 1] < self.input[0];
                let position = if descending { -value } else { value };
                let at = |i: usize| if descending { -self.input[i] } else { self.input[i] };

                if position <= at(0) {
                    return self.output[0];
                }
                for i in 1..points {
                    let (lo, hi) = (at(i - 1), at(i));
                    if position <= hi {
                        let span = hi - lo;
                        if span == 0.0 {
                            return self.output[i];
                        }
                        let t = (position - lo) / span;
                        return self.output[i - 1] + t * (self.output[i] - self.output[i - 1]);
                    }
                }
                self.output[points - 1]
            }
        }
    }
}

/// Settings for one swipe direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Whether cards may leave the deck in this direction.
    pub enabled: bool,
    /// Translation to overlay-label opacity.
    pub overlay_opacity: RangeMap,
    /// Spring used when the card exits in this direction.
    pub spring: SpringConfig,
}

impl DirectionConfig {
    fn with_overlay(input_edge: f32) -> Self {
        Self {
            enabled: true,
            overlay_opacity: RangeMap::two([0.0, input_edge], [0.0, 1.0]),
            spring: SpringConfig::default(),
        }
    }
}

/// Per-direction settings for all four directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionMap {
    /// Leftward swipes.
    pub left: DirectionConfig,
    /// Rightward swipes.
    pub right: DirectionConfig,
    /// Upward swipes.
    pub top: DirectionConfig,
    /// Downward swipes.
    pub bottom: DirectionConfig,
}

impl DirectionMap {
    /// Defaults derived from the screen: overlays reach full opacity a third of
    /// the way across the screen.
    pub fn for_screen(screen: ScreenSize) -> Self {
        Self {
            left: DirectionConfig::with_overlay(-(screen.width / 3.0)),
            right: DirectionConfig::with_overlay(screen.width / 3.0),
            top: DirectionConfig::with_overlay(-(screen.height / 3.0)),
            bottom: DirectionConfig::with_overlay(screen.height / 3.0),
        }
    }

    /// Settings for `direction`.
    pub fn get(&self, direction: SwipeDirection) -> &DirectionConfig {
        match direction {
            SwipeDirection::Left => &self.left,
            SwipeDirection::Right => &self.right,
            SwipeDirection::Top => &self.top,
            SwipeDirection::Bottom => &self.bottom,
        }
    }

    /// Mutable settings for `direction`.
    pub fn get_mut(&mut self, direction: SwipeDirection) -> &mut DirectionConfig {
        match direction {
            SwipeDirection::Left => &mut self.left,
            SwipeDirection::Right => &mut self.right,
            SwipeDirection::Top => &mut self.top,
            SwipeDirection::Bottom => &mut self.bottom,
        }
    }
}

/// Every tunable of a deck.
///
/// Built once (see [`SwiperConfig::builder`]) and shared read-only with the
/// controls and every mounted card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwiperConfig {
    /// Per-direction enable flags, overlay ranges and exit springs.
    pub directions: DirectionMap,
    /// Horizontal translation range; the outer points are the left and right
    /// displacement thresholds.
    pub translate_x_range: Vec<f32>,
    /// Vertical translation range; the outer points are the top and bottom
    /// displacement thresholds.
    pub translate_y_range: Vec<f32>,
    /// Horizontal translation to card rotation in radians.
    pub rotation: RangeMap,
    /// Spring used on the x axis when a card animates back in.
    pub swipe_back_x_spring: SpringConfig,
    /// Spring used on the y axis when a card animates back in.
    pub swipe_back_y_spring: SpringConfig,
    /// Release velocity that commits a swipe regardless of displacement.
    /// `None` means [`DEFAULT_VELOCITY_THRESHOLD`](crate::DEFAULT_VELOCITY_THRESHOLD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_threshold: Option<f32>,
    /// Wrap past the last card instead of exhausting the deck.
    pub looping: bool,
    /// Flip animation length in milliseconds.
    pub flip_duration_ms: u64,
    /// Axes a pan gesture may move along.
    pub gesture_axis: GestureAxis,
    /// How many items ahead each card should prepare. `None` means the deck
    /// length minus one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerender_items: Option<usize>,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self::for_screen(ScreenSize::default())
    }
}

impl SwiperConfig {
    /// Defaults derived from `screen`.
    pub fn for_screen(screen: ScreenSize) -> Self {
        let third_w = screen.width / 3.0;
        let third_h = screen.height / 3.0;
        Self {
            directions: DirectionMap::for_screen(screen),
            translate_x_range: vec![-third_w, 0.0, third_w],
            translate_y_range: vec![-third_h, 0.0, third_h],
            rotation: RangeMap::three([-third_w, 0.0, third_w], [-PI / 20.0, 0.0, PI / 20.0]),
            swipe_back_x_spring: SpringConfig::default(),
            swipe_back_y_spring: SpringConfig::default(),
            velocity_threshold: None,
            looping: false,
            flip_duration_ms: DEFAULT_FLIP_DURATION_MS,
            gesture_axis: GestureAxis::default(),
            prerender_items: None,
        }
    }

    /// Start a builder seeded with the defaults for `screen`.
    pub fn builder(screen: ScreenSize) -> SwiperConfigBuilder {
        SwiperConfigBuilder {
            config: Self::for_screen(screen),
        }
    }

    /// Settings for `direction`.
    pub fn direction(&self, direction: SwipeDirection) -> &DirectionConfig {
        self.directions.get(direction)
    }

    /// Whether `direction` is enabled.
    pub fn is_enabled(&self, direction: SwipeDirection) -> bool {
        self.directions.get(direction).enabled
    }

    /// The flip animation length.
    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    /// The prerender hint for a deck of `deck_len` items.
    pub fn prerender_items_for(&self, deck_len: usize) -> usize {
        self.prerender_items
            .unwrap_or_else(|| deck_len.saturating_sub(1))
    }

    /// Parse a TOML document, filling missing keys from the defaults for
    /// `screen`.
    pub fn from_toml_str(source: &str, screen: ScreenSize) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        let mut config = Self::for_screen(screen);
        file.apply(&mut config);
        Ok(config)
    }

    /// Serialize the full config to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Builder for [`SwiperConfig`].
#[derive(Debug, Clone)]
pub struct SwiperConfigBuilder {
    config: SwiperConfig,
}

impl SwiperConfigBuilder {
    /// Disable swiping in `direction`.
    pub fn disable(mut self, direction: SwipeDirection) -> Self {
        self.config.directions.get_mut(direction).enabled = false;
        self
    }

    /// Enable swiping in `direction`.
    pub fn enable(mut self, direction: SwipeDirection) -> Self {
        self.config.directions.get_mut(direction).enabled = true;
        self
    }

    /// Set the exit spring for `direction`.
    pub fn spring(mut self, direction: SwipeDirection, spring: SpringConfig) -> Self {
        self.config.directions.get_mut(direction).spring = spring;
        self
    }

    /// Set the overlay-label opacity range for `direction`.
    pub fn overlay_opacity(mut self, direction: SwipeDirection, range: RangeMap) -> Self {
        self.config.directions.get_mut(direction).overlay_opacity = range;
        self
    }

    /// Set the swipe-back springs for each axis.
    pub fn swipe_back_springs(mut self, x: SpringConfig, y: SpringConfig) -> Self {
        self.config.swipe_back_x_spring = x;
        self.config.swipe_back_y_spring = y;
        self
    }

    /// Set the horizontal translation range.
    pub fn translate_x_range(mut self, range: Vec<f32>) -> Self {
        self.config.translate_x_range = range;
        self
    }

    /// Set the vertical translation range.
    pub fn translate_y_range(mut self, range: Vec<f32>) -> Self {
        self.config.translate_y_range = range;
        self
    }

    /// Set the translation-to-rotation range.
    pub fn rotation(mut self, range: RangeMap) -> Self {
        self.config.rotation = range;
        self
    }

    /// Override the commit-by-velocity threshold.
    pub fn velocity_threshold(mut self, threshold: f32) -> Self {
        self.config.velocity_threshold = Some(threshold);
        self
    }

    /// Enable or disable looping.
    pub fn looping(mut self, looping: bool) -> Self {
        self.config.looping = looping;
        self
    }

    /// Set the flip animation length.
    pub fn flip_duration(mut self, duration: Duration) -> Self {
        self.config.flip_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Restrict pan gestures to an axis selection.
    pub fn gesture_axis(mut self, axis: GestureAxis) -> Self {
        self.config.gesture_axis = axis;
        self
    }

    /// Set the prerender hint forwarded to every card.
    pub fn prerender_items(mut self, items: usize) -> Self {
        self.config.prerender_items = Some(items);
        self
    }

    /// Finish building.
    pub fn build(self) -> SwiperConfig {
        self.config
    }
}

/// On-disk form: every key optional, applied over screen defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    directions: DirectionMapFile,
    translate_x_range: Option<Vec<f32>>,
    translate_y_range: Option<Vec<f32>>,
    rotation: Option<RangeMap>,
    swipe_back_x_spring: Option<SpringConfig>,
    swipe_back_y_spring: Option<SpringConfig>,
    velocity_threshold: Option<f32>,
    looping: Option<bool>,
    flip_duration_ms: Option<u64>,
    gesture_axis: Option<GestureAxis>,
    prerender_items: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DirectionMapFile {
    left: DirectionFile,
    right: DirectionFile,
    top: DirectionFile,
    bottom: DirectionFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DirectionFile {
    enabled: Option<bool>,
    overlay_opacity: Option<RangeMap>,
    spring: Option<SpringConfig>,
}

impl DirectionFile {
    fn apply(self, target: &mut DirectionConfig) {
        if let Some(enabled) = self.enabled {
            target.enabled = enabled;
        }
        if let Some(range) = self.overlay_opacity {
            target.overlay_opacity = range;
        }
        if let Some(spring) = self.spring {
            target.spring = spring;
        }
    }
}

impl ConfigFile {
    fn apply(self, config: &mut SwiperConfig) {
        self.directions.left.apply(&mut config.directions.left);
        self.directions.right.apply(&mut config.directions.right);
        self.directions.top.apply(&mut config.directions.top);
        self.directions.bottom.apply(&mut config.directions.bottom);

        if let Some(range) = self.translate_x_range {
            config.translate_x_range = range;
        }
        if let Some(range) = self.translate_y_range {
            config.translate_y_range = range;
        }
        if let Some(range) = self.rotation {
            config.rotation = range;
        }
        if let Some(spring) = self.swipe_back_x_spring {
            config.swipe_back_x_spring = spring;
        }
        if let Some(spring) = self.swipe_back_y_spring {
            config.swipe_back_y_spring = spring;
        }
        if self.velocity_threshold.is_some() {
            config.velocity_threshold = self.velocity_threshold;
        }
        if let Some(looping) = self.looping {
            config.looping = looping;
        }
        if let Some(ms) = self.flip_duration_ms {
            config.flip_duration_ms = ms;
        }
        if let Some(axis) = self.gesture_axis {
            config.gesture_axis = axis;
        }
        if self.prerender_items.is_some() {
            config.prerender_items = self.prerender_items;
        }
    }
}
