//! Swipe detector state machine
//!
//! Displacement is measured from the start of the current window (the anchor),
//! never frame to frame, so tremor that nets out under the threshold never
//! fires. Windows older than `max_duration` restart at the current sample, a
//! tracking gap drops the candidate, and every emitted swipe opens a cooldown.
//!
//! ```text
//!            sample                      |delta| >= min
//!   Idle ─────────────────▶ Tracking ─────────────────────▶ Cooldown
//!    ▲ ▲                     │    ▲ \ window expired:          │
//!    │ └──── no hand ────────┘    └─/ re-anchor                │
//!    └────────────────── cooldown elapsed ─────────────────────┘
//! ```

use super::types::{Direction, GestureConfig, MotionInput, Sample, SwipeEvent};
use tracing::{debug, trace};

/// Detector phase and the data it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorState {
    /// No candidate in progress
    Idle,
    /// Candidate window started at `anchor`
    Tracking { anchor: Sample },
    /// A swipe was just emitted; input is ignored until it expires
    Cooldown,
}

pub struct SwipeDetector {
    config: GestureConfig,
    state: DetectorState,
    last_event_at: Option<f64>,
}

impl SwipeDetector {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: DetectorState::Idle,
            last_event_at: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Start of the current candidate window, if any.
    pub fn anchor(&self) -> Option<Sample> {
        match self.state {
            DetectorState::Tracking { anchor } => Some(anchor),
            _ => None,
        }
    }

    pub fn last_event_at(&self) -> Option<f64> {
        self.last_event_at
    }

    /// Feed one frame's input. Returns the swipe it completed, if any.
    #[hotpath::measure]
    pub fn process(&mut self, input: MotionInput) -> Option<SwipeEvent> {
        let now = input.timestamp();

        match (self.state, input) {
            (DetectorState::Cooldown, _) => {
                if self.cooling_down(now) {
                    return None;
                }
                trace!(now, "cooldown elapsed");
                self.state = DetectorState::Idle;
                self.idle(input)
            }
            (DetectorState::Idle, _) => self.idle(input),
            (DetectorState::Tracking { .. }, MotionInput::NoHand { .. }) => {
                // A gesture cannot span a gap in tracking
                trace!(now, "hand lost, candidate dropped");
                self.state = DetectorState::Idle;
                None
            }
            (DetectorState::Tracking { anchor }, MotionInput::Sample(sample)) => {
                self.track(anchor, sample)
            }
        }
    }

    fn idle(&mut self, input: MotionInput) -> Option<SwipeEvent> {
        if let MotionInput::Sample(sample) = input {
            if self.cooling_down(sample.timestamp) {
                self.state = DetectorState::Cooldown;
            } else {
                trace!(
                    x = sample.position.x,
                    y = sample.position.y,
                    now = sample.timestamp,
                    "candidate started"
                );
                self.state = DetectorState::Tracking { anchor: sample };
            }
        }
        None
    }

    fn track(&mut self, anchor: Sample, sample: Sample) -> Option<SwipeEvent> {
        let elapsed = sample.timestamp - anchor.timestamp;
        if elapsed > self.config.max_duration() || elapsed < 0.0 {
            trace!(elapsed, "window expired, re-anchoring");
            self.state = DetectorState::Tracking { anchor: sample };
            return None;
        }

        let axis = self.config.axis();
        let delta = axis.along(&anchor.position, &sample.position);
        if delta.abs() < self.config.min_displacement() {
            return None;
        }

        if let Some(ratio) = self.config.max_off_axis_ratio() {
            let off_axis = axis.across(&anchor.position, &sample.position);
            if off_axis.abs() > ratio * delta.abs() {
                trace!(delta, off_axis, "movement too diagonal");
                return None;
            }
        }

        let event = SwipeEvent {
            direction: if delta > 0.0 {
                Direction::Forward
            } else {
                Direction::Backward
            },
            magnitude: delta.abs(),
            started_at: anchor.timestamp,
            completed_at: sample.timestamp,
        };
        debug!(
            direction = %event.direction,
            magnitude = event.magnitude,
            duration = event.duration(),
            "swipe"
        );

        self.last_event_at = Some(sample.timestamp);
        self.state = DetectorState::Cooldown;
        Some(event)
    }

    fn cooling_down(&self, now: f64) -> bool {
        self.last_event_at
            .is_some_and(|at| now - at < self.config.cooldown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::types::Axis;

    fn vertical() -> GestureConfig {
        GestureConfig::new(0.15, 0.6, 0.8, Axis::Vertical).unwrap()
    }

    fn at(y: f64, t: f64) -> MotionInput {
        MotionInput::Sample(Sample::new(0.5, y, t))
    }

    fn gap(t: f64) -> MotionInput {
        MotionInput::NoHand { timestamp: t }
    }

    fn run(detector: &mut SwipeDetector, inputs: &[MotionInput]) -> Vec<SwipeEvent> {
        inputs.iter().filter_map(|i| detector.process(*i)).collect()
    }

    #[test]
    fn test_idle_ignores_gaps() {
        let mut detector = SwipeDetector::new(vertical());
        let events = run(&mut detector, &[gap(0.0), gap(0.1), gap(5.0)]);
        assert!(events.is_empty());
        assert_eq!(detector.state(), DetectorState::Idle);
    }

    #[test]
    fn test_first_sample_anchors() {
        let mut detector = SwipeDetector::new(vertical());
        assert_eq!(detector.process(at(0.4, 1.0)), None);
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.4, 1.0)));
    }

    #[test]
    fn test_forward_swipe() {
        let mut detector = SwipeDetector::new(vertical());
        let events = run(&mut detector, &[at(0.5, 0.0), at(0.5, 0.1), at(0.66, 0.3)]);
        assert_eq!(events.len(), 1);
        let event = events[0];
        assert_eq!(event.direction, Direction::Forward);
        assert!((event.magnitude - 0.16).abs() < 1e-9);
        assert_eq!(event.started_at, 0.0);
        assert_eq!(event.completed_at, 0.3);
        assert_eq!(detector.state(), DetectorState::Cooldown);
        assert_eq!(detector.last_event_at(), Some(0.3));
    }

    #[test]
    fn test_backward_swipe() {
        let mut detector = SwipeDetector::new(vertical());
        let events = run(&mut detector, &[at(0.6, 0.0), at(0.3, 0.2)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::Backward);
    }

    #[test]
    fn test_exact_threshold_counts() {
        let config = GestureConfig::new(0.25, 0.6, 0.8, Axis::Vertical).unwrap();
        let mut detector = SwipeDetector::new(config);
        let events = run(&mut detector, &[at(0.25, 0.0), at(0.5, 0.1)]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_jitter_does_not_fire() {
        let mut detector = SwipeDetector::new(vertical());
        let jitter = [
            at(0.50, 0.00),
            at(0.58, 0.05),
            at(0.44, 0.10),
            at(0.60, 0.15),
            at(0.42, 0.20),
            at(0.55, 0.25),
        ];
        assert!(run(&mut detector, &jitter).is_empty());
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn test_slow_drift_re_anchors() {
        let mut detector = SwipeDetector::new(vertical());
        // 0.2 of travel but spread over 1.2s
        let drift = [at(0.3, 0.0), at(0.4, 0.5), at(0.5, 1.2)];
        assert!(run(&mut detector, &drift).is_empty());
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.5, 1.2)));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut detector = SwipeDetector::new(vertical());
        let events = run(&mut detector, &[at(0.3, 0.0), at(0.5, 0.6)]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_gap_drops_candidate() {
        let mut detector = SwipeDetector::new(vertical());
        let events = run(&mut detector, &[at(0.3, 0.0), at(0.4, 0.1), gap(0.15), at(0.5, 0.2)]);
        assert!(events.is_empty());
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.5, 0.2)));
    }

    #[test]
    fn test_cooldown_discards_then_expires() {
        let mut detector = SwipeDetector::new(vertical());
        run(&mut detector, &[at(0.3, 0.0), at(0.5, 0.2)]);
        assert_eq!(detector.state(), DetectorState::Cooldown);

        // Inside cooldown: discarded, gaps included
        assert_eq!(detector.process(at(0.9, 0.5)), None);
        assert_eq!(detector.process(gap(0.6)), None);
        assert_eq!(detector.state(), DetectorState::Cooldown);

        // Expiry and a new candidate in the same step
        assert_eq!(detector.process(at(0.2, 1.1)), None);
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.2, 1.1)));
    }

    #[test]
    fn test_gap_ends_cooldown_once_elapsed() {
        let mut detector = SwipeDetector::new(vertical());
        run(&mut detector, &[at(0.3, 0.0), at(0.5, 0.2)]);
        assert_eq!(detector.process(gap(1.1)), None);
        assert_eq!(detector.state(), DetectorState::Idle);
    }

    #[test]
    fn test_horizontal_axis_ignores_vertical_motion() {
        let config = GestureConfig::new(0.15, 0.6, 0.8, Axis::Horizontal).unwrap();
        let mut detector = SwipeDetector::new(config);
        let vertical_motion = [
            MotionInput::Sample(Sample::new(0.5, 0.1, 0.0)),
            MotionInput::Sample(Sample::new(0.5, 0.9, 0.2)),
        ];
        assert!(run(&mut detector, &vertical_motion).is_empty());

        let events = run(
            &mut detector,
            &[MotionInput::Sample(Sample::new(0.2, 0.9, 0.3))],
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::Backward);
    }

    #[test]
    fn test_off_axis_rejection() {
        let config = vertical().with_max_off_axis_ratio(Some(1.0)).unwrap();
        let mut detector = SwipeDetector::new(config);
        let diagonal = [
            MotionInput::Sample(Sample::new(0.2, 0.3, 0.0)),
            MotionInput::Sample(Sample::new(0.5, 0.5, 0.2)),
        ];
        assert!(run(&mut detector, &diagonal).is_empty());
        // Same anchor keeps tracking; a steeper path completes
        let events = run(
            &mut detector,
            &[MotionInput::Sample(Sample::new(0.3, 0.6, 0.3))],
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_timestamps_going_backwards_restart_window() {
        let mut detector = SwipeDetector::new(vertical());
        assert!(run(&mut detector, &[at(0.3, 5.0), at(0.6, 4.0)]).is_empty());
        assert_eq!(detector.anchor(), Some(Sample::new(0.5, 0.6, 4.0)));
    }
}
