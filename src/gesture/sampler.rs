//! Motion sampler: reduces a frame's hand detections to a single tracked point

use super::types::{MotionInput, Position, Sample};
use crate::error::ConfigError;
use crate::source::{Detection, Frame};
use serde::{Deserialize, Serialize};

/// How to pick one hand when a frame contains several.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Highest confidence, ties go to the earliest detection
    #[default]
    HighestConfidence,
    /// First detection in input order
    First,
    /// Closest to the previously selected position
    Nearest,
}

pub struct MotionSampler {
    policy: SelectionPolicy,
    min_confidence: f64,
    /// Only used by `Nearest`; cleared on gaps
    last_position: Option<Position>,
}

impl MotionSampler {
    /// `min_confidence` must lie in `[0, 1]`.
    pub fn new(policy: SelectionPolicy, min_confidence: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ConfigError::OutOfRange {
                field: "min_confidence",
                value: min_confidence,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self {
            policy,
            min_confidence,
            last_position: None,
        })
    }

    /// Turn a frame into detector input.
    pub fn sample(&mut self, frame: &Frame) -> MotionInput {
        let mut candidates = frame
            .detections
            .iter()
            .filter(|d| d.confidence >= self.min_confidence && d.position.is_finite());

        let chosen = match self.policy {
            SelectionPolicy::HighestConfidence => highest_confidence(candidates),
            SelectionPolicy::First => candidates.next(),
            SelectionPolicy::Nearest => match self.last_position {
                Some(last) => nearest(candidates, &last),
                None => highest_confidence(candidates),
            },
        };

        match chosen {
            Some(detection) => {
                self.last_position = Some(detection.position);
                MotionInput::Sample(Sample {
                    position: detection.position,
                    timestamp: frame.timestamp,
                })
            }
            None => {
                self.last_position = None;
                MotionInput::NoHand {
                    timestamp: frame.timestamp,
                }
            }
        }
    }
}

fn highest_confidence<'a>(candidates: impl Iterator<Item = &'a Detection>) -> Option<&'a Detection> {
    // Strict comparison keeps the first of equal scores
    candidates.fold(None, |best: Option<&'a Detection>, d| match best {
        Some(b) if d.confidence <= b.confidence => Some(b),
        _ => Some(d),
    })
}

fn nearest<'a>(
    candidates: impl Iterator<Item = &'a Detection>,
    last: &Position,
) -> Option<&'a Detection> {
    candidates.fold(None, |best: Option<(&'a Detection, f64)>, d| {
        let dist = d.position.distance(last);
        match best {
            Some((b, best_dist)) if dist >= best_dist => Some((b, best_dist)),
            _ => Some((d, dist)),
        }
    })
    .map(|(d, _)| d)
}
