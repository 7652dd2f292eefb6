//! Per-frame driver: source -> sampler -> detector -> mapper

use crate::action::{ActionMapper, Dispatch};
use crate::gesture::{Direction, MotionInput, MotionSampler, SwipeDetector, SwipeEvent};
use crate::keys::KeyEmitter;
use crate::source::{Frame, FramePoll, LandmarkSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait on a quiet source before checking the quit flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Session counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: usize,
    pub frames_with_hand: usize,
    /// Transitions from a tracked hand to no hand
    pub hand_lost: usize,
    pub swipes_forward: usize,
    pub swipes_backward: usize,
    pub emit_failures: usize,
    pub skipped_input: usize,
}

impl PipelineStats {
    pub fn swipes(&self) -> usize {
        self.swipes_forward + self.swipes_backward
    }

    pub fn summary(&self) -> String {
        if self.frames == 0 {
            return "No frames received.\n".to_string();
        }

        let coverage = self.frames_with_hand as f64 / self.frames as f64 * 100.0;
        let mut out = format!(
            "Frames: {} ({:.0}% with a hand, {} tracking gaps)\n",
            self.frames, coverage, self.hand_lost
        );
        out.push_str(&format!(
            "Swipes: {} (forward={} backward={})\n",
            self.swipes(),
            self.swipes_forward,
            self.swipes_backward
        ));
        if self.emit_failures > 0 {
            out.push_str(&format!("Undelivered key presses: {}\n", self.emit_failures));
        }
        if self.skipped_input > 0 {
            out.push_str(&format!("Skipped input lines: {}\n", self.skipped_input));
        }
        out
    }
}

/// Why [`Pipeline::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The quit flag was cleared
    Quit,
    /// The landmark source ran out
    SourceClosed,
}

/// Owns the whole per-frame chain. There is exactly one detector per pipeline.
pub struct Pipeline<E> {
    sampler: MotionSampler,
    detector: SwipeDetector,
    mapper: ActionMapper<E>,
    stats: PipelineStats,
    hand_present: bool,
}

impl<E: KeyEmitter> Pipeline<E> {
    pub fn new(sampler: MotionSampler, detector: SwipeDetector, mapper: ActionMapper<E>) -> Self {
        Self {
            sampler,
            detector,
            mapper,
            stats: PipelineStats::default(),
            hand_present: false,
        }
    }

    pub fn detector(&self) -> &SwipeDetector {
        &self.detector
    }

    pub fn mapper(&self) -> &ActionMapper<E> {
        &self.mapper
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Process one frame synchronously, dispatching any completed swipe.
    pub fn step(&mut self, frame: &Frame) -> Option<(SwipeEvent, Dispatch)> {
        self.stats.frames += 1;

        let input = self.sampler.sample(frame);
        match input {
            MotionInput::Sample(_) => {
                self.stats.frames_with_hand += 1;
                self.hand_present = true;
            }
            MotionInput::NoHand { timestamp } => {
                if self.hand_present {
                    self.stats.hand_lost += 1;
                    debug!(timestamp, "hand left the frame");
                }
                self.hand_present = false;
            }
        }

        let event = self.detector.process(input)?;
        match event.direction {
            Direction::Forward => self.stats.swipes_forward += 1,
            Direction::Backward => self.stats.swipes_backward += 1,
        }

        let dispatch = self.mapper.dispatch(&event);
        if !dispatch.delivered {
            self.stats.emit_failures += 1;
        }
        Some((event, dispatch))
    }

    /// Drive frames from `source` until it closes or `running` is cleared.
    pub fn run<S: LandmarkSource>(&mut self, source: &mut S, running: &AtomicBool) -> StopReason {
        let reason = loop {
            if !running.load(Ordering::SeqCst) {
                break StopReason::Quit;
            }
            match source.poll_frame(POLL_INTERVAL) {
                FramePoll::Frame(frame) => {
                    self.step(&frame);
                }
                FramePoll::Idle => continue,
                FramePoll::Closed => break StopReason::SourceClosed,
            }
        };

        self.stats.skipped_input = source.skipped();
        info!(?reason, frames = self.stats.frames, "pipeline stopped");
        reason
    }
}
