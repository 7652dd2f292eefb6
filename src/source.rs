//! Landmark sources: where per-frame hand detections come from
//!
//! The hand-tracking model runs outside this process. Its output arrives as
//! newline-delimited JSON, one object per processed camera frame:
//!
//! ```json
//! {"t": 0.033, "hands": [{"x": 0.51, "y": 0.42, "confidence": 0.93}]}
//! {"t": 0.066, "hands": [{"landmarks": [[0.5, 0.6, 0.0], ...], "confidence": 0.9}]}
//! {"t": 0.100, "hands": []}
//! ```
//!
//! `t` is optional; frames without it are stamped on arrival.

use crate::gesture::Position;
use flume::{Receiver, RecvTimeoutError};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// MediaPipe index fingertip
pub const DEFAULT_LANDMARK_INDEX: usize = 8;

const FRAME_QUEUE: usize = 64;

/// One hand found in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub position: Position,
    pub confidence: f64,
}

impl Detection {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            position: Position::new(x, y),
            confidence,
        }
    }
}

/// Everything the tracker reported for one camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonic seconds
    pub timestamp: f64,
    pub detections: Vec<Detection>,
}

impl Frame {
    pub fn new(timestamp: f64, detections: Vec<Detection>) -> Self {
        Self {
            timestamp,
            detections,
        }
    }

    pub fn empty(timestamp: f64) -> Self {
        Self::new(timestamp, Vec::new())
    }
}

pub enum FramePoll {
    Frame(Frame),
    /// Nothing arrived within the timeout
    Idle,
    /// The source is exhausted
    Closed,
}

pub trait LandmarkSource {
    /// Wait up to `timeout` for the next frame.
    fn poll_frame(&mut self, timeout: Duration) -> FramePoll;

    /// Input records that could not be understood so far.
    fn skipped(&self) -> usize {
        0
    }
}

/// Frames queued up front; used for replays and tests.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Frame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl LandmarkSource for ScriptedSource {
    fn poll_frame(&mut self, _timeout: Duration) -> FramePoll {
        match self.frames.pop_front() {
            Some(frame) => FramePoll::Frame(frame),
            None => FramePoll::Closed,
        }
    }
}

// ============================================================================
// JSON lines
// ============================================================================

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default, alias = "timestamp")]
    t: Option<f64>,
    #[serde(default)]
    hands: Vec<HandRecord>,
}

#[derive(Debug, Deserialize)]
struct HandRecord {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default = "default_confidence")]
    confidence: f64,
    /// Full hand skeleton, `[x, y]` or `[x, y, z]` per point
    #[serde(default)]
    landmarks: Vec<Vec<f64>>,
}

fn default_confidence() -> f64 {
    1.0
}

/// Converts JSON lines into frames.
pub struct FrameParser {
    landmark_index: usize,
    started: Instant,
}

impl FrameParser {
    pub fn new(landmark_index: usize) -> Self {
        Self {
            landmark_index,
            started: Instant::now(),
        }
    }

    /// `Ok(None)` for blank lines.
    pub fn parse(&self, line: &str) -> Result<Option<Frame>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let record: FrameRecord = serde_json::from_str(line)?;
        let timestamp = record
            .t
            .unwrap_or_else(|| self.started.elapsed().as_secs_f64());

        let detections = record
            .hands
            .iter()
            .filter_map(|hand| self.detection(hand))
            .collect();

        Ok(Some(Frame::new(timestamp, detections)))
    }

    fn detection(&self, hand: &HandRecord) -> Option<Detection> {
        let position = if hand.landmarks.is_empty() {
            Position::new(hand.x?, hand.y?)
        } else {
            match hand.landmarks.get(self.landmark_index) {
                Some(point) if point.len() >= 2 => Position::new(point[0], point[1]),
                _ => {
                    debug!(
                        index = self.landmark_index,
                        points = hand.landmarks.len(),
                        "hand has no usable reference landmark"
                    );
                    return None;
                }
            }
        };
        Some(Detection {
            position,
            confidence: hand.confidence,
        })
    }
}

/// Frames read from a JSON-lines stream on a background thread.
pub struct JsonLinesSource {
    rx: Receiver<Frame>,
    skipped: Arc<AtomicUsize>,
}

impl JsonLinesSource {
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, landmark_index: usize) -> Self {
        let (tx, rx) = flume::bounded::<Frame>(FRAME_QUEUE);
        let skipped = Arc::new(AtomicUsize::new(0));
        let skipped_reader = Arc::clone(&skipped);
        let parser = FrameParser::new(landmark_index);

        thread::spawn(move || {
            for (number, line) in reader.lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("landmark input read failed: {}", e);
                        break;
                    }
                };
                match parser.parse(&line) {
                    Ok(Some(frame)) => {
                        if tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        skipped_reader.fetch_add(1, Ordering::Relaxed);
                        warn!("skipping malformed frame on line {}: {}", number + 1, e);
                    }
                }
            }
            debug!("landmark input closed");
        });

        Self { rx, skipped }
    }

    pub fn stdin(landmark_index: usize) -> Self {
        Self::spawn(BufReader::new(io::stdin()), landmark_index)
    }

    pub fn open(path: &Path, landmark_index: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::spawn(BufReader::new(file), landmark_index))
    }
}

impl LandmarkSource for JsonLinesSource {
    fn poll_frame(&mut self, timeout: Duration) -> FramePoll {
        match self.rx.recv_timeout(timeout) {
            Ok(frame) => FramePoll::Frame(frame),
            Err(RecvTimeoutError::Timeout) => FramePoll::Idle,
            Err(RecvTimeoutError::Disconnected) => FramePoll::Closed,
        }
    }

    fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}
