//! # handswipe
//!
//! Hands-free scrolling for short-video feeds. An external hand tracker streams
//! landmark positions; each deliberate swipe becomes one key press.
//!
//! ## Flow
//!
//! | Stage | Module | Holds state |
//! |---|---|---|
//! | Landmark source | [`source`] | reader thread only |
//! | Motion sampler | [`gesture::MotionSampler`] | previous hand (for `nearest`) |
//! | Swipe detector | [`gesture::SwipeDetector`] | candidate window, cooldown |
//! | Action mapper | [`action::ActionMapper`] | none |
//! | Key emitter | [`keys`] | OS handle |
//!
//! ## Swipe → Action mapping
//!
//! | Swipe | Direction | Natural | Inverted |
//! |---|---|---|---|
//! | Down (vertical axis) | Forward | Next | Previous |
//! | Up (vertical axis) | Backward | Previous | Next |
//! | Right (horizontal axis) | Forward | Next | Previous |
//! | Left (horizontal axis) | Backward | Previous | Next |
//!
//! ## Feature flags
//!
//! * (default): key presses are logged only (dry run).
//! * `keys`: real keyboard events through enigo.

pub mod action;
pub mod config;
pub mod error;
pub mod gesture;
pub mod keys;
pub mod pipeline;
pub mod source;

pub use error::{ConfigError, EmitterError};
