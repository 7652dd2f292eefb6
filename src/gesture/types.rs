//! Value types flowing through the gesture pipeline

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized frame coordinates, `[0, 1]` on both axes with `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One tracked hand position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Position,
    /// Monotonic seconds
    pub timestamp: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, timestamp: f64) -> Self {
        Self {
            position: Position::new(x, y),
            timestamp,
        }
    }
}

/// What the detector sees for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionInput {
    /// A hand was tracked in this frame
    Sample(Sample),
    /// No hand in this frame; the timestamp still advances cooldown
    NoHand { timestamp: f64 },
}

impl MotionInput {
    pub fn timestamp(&self) -> f64 {
        match self {
            MotionInput::Sample(s) => s.timestamp,
            MotionInput::NoHand { timestamp } => *timestamp,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    /// Reels-style feeds (default)
    #[default]
    Vertical,
}

impl Axis {
    /// Signed movement along this axis.
    pub fn along(&self, from: &Position, to: &Position) -> f64 {
        match self {
            Axis::Horizontal => to.x - from.x,
            Axis::Vertical => to.y - from.y,
        }
    }

    /// Signed movement across this axis.
    pub fn across(&self, from: &Position, to: &Position) -> f64 {
        match self {
            Axis::Horizontal => to.y - from.y,
            Axis::Vertical => to.x - from.x,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Swipe direction along the configured axis.
///
/// `Forward` is an increasing coordinate: downward on the vertical axis,
/// rightward on the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// A completed swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeEvent {
    pub direction: Direction,
    /// Absolute displacement along the axis, normalized units
    pub magnitude: f64,
    pub started_at: f64,
    pub completed_at: f64,
}

impl SwipeEvent {
    pub fn duration(&self) -> f64 {
        self.completed_at - self.started_at
    }
}

/// Validated detector thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    min_displacement: f64,
    max_duration: f64,
    cooldown: f64,
    axis: Axis,
    max_off_axis_ratio: Option<f64>,
}

impl GestureConfig {
    pub fn new(
        min_displacement: f64,
        max_duration: f64,
        cooldown: f64,
        axis: Axis,
    ) -> Result<Self, ConfigError> {
        let min_displacement = positive("min_displacement", min_displacement)?;
        if min_displacement > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "min_displacement",
                value: min_displacement,
                min: 0.0,
                max: 1.0,
            });
        }

        Ok(Self {
            min_displacement,
            max_duration: positive("max_duration", max_duration)?,
            cooldown: positive("cooldown", cooldown)?,
            axis,
            max_off_axis_ratio: None,
        })
    }

    /// Reject completions whose cross-axis movement exceeds `ratio` times the
    /// on-axis movement. `None` disables the check.
    pub fn with_max_off_axis_ratio(mut self, ratio: Option<f64>) -> Result<Self, ConfigError> {
        self.max_off_axis_ratio = ratio
            .map(|r| positive("max_off_axis_ratio", r))
            .transpose()?;
        Ok(self)
    }

    pub fn min_displacement(&self) -> f64 {
        self.min_displacement
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn max_off_axis_ratio(&self) -> Option<f64> {
        self.max_off_axis_ratio
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_displacement: 0.15,
            max_duration: 0.6,
            cooldown: 0.8,
            axis: Axis::Vertical,
            max_off_axis_ratio: None,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
