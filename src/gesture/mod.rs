//! Hand motion to swipe recognition
//!
//! Turns per-frame hand detections into discrete swipes along one axis.
//!
//! # Flow
//!
//! - **Sampler**: picks one hand per frame (or reports a gap)
//! - **Detector**: anchors a candidate window, fires once the hand has moved
//!   `min_displacement` along the axis within `max_duration`, then enforces a
//!   cooldown before the next candidate may start
//!
//! Coordinates are normalized frame positions with `y` growing downward, so a
//! downward (or rightward) motion is [`Direction::Forward`].

mod detector;
mod sampler;
mod types;

pub use detector::{DetectorState, SwipeDetector};
pub use sampler::{MotionSampler, SelectionPolicy};
pub use types::{Axis, Direction, GestureConfig, MotionInput, Position, Sample, SwipeEvent};
