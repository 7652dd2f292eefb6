//! Swipe to feed-action mapping

use crate::gesture::{Direction, SwipeEvent};
use crate::keys::{KeyEmitter, KeyScheme};
use std::fmt;
use tracing::{info, warn};

/// Logical feed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move to the next item (scroll down)
    Next,
    /// Move to the previous item (scroll up)
    Previous,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Next => write!(f, "NEXT"),
            Action::Previous => write!(f, "PREVIOUS"),
        }
    }
}

/// Which action a forward swipe triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Forward (down/right) is next
    #[default]
    Natural,
    /// Forward (down/right) is previous
    Inverted,
}

impl Polarity {
    pub fn from_invert(invert: bool) -> Self {
        if invert {
            Polarity::Inverted
        } else {
            Polarity::Natural
        }
    }

    pub fn action(&self, direction: Direction) -> Action {
        match (self, direction) {
            (Polarity::Natural, Direction::Forward) | (Polarity::Inverted, Direction::Backward) => {
                Action::Next
            }
            (Polarity::Natural, Direction::Backward) | (Polarity::Inverted, Direction::Forward) => {
                Action::Previous
            }
        }
    }
}

/// Outcome of dispatching one swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub action: Action,
    pub delivered: bool,
}

/// Turns swipes into key presses, one press per swipe.
pub struct ActionMapper<E> {
    polarity: Polarity,
    scheme: KeyScheme,
    emitter: E,
}

impl<E: KeyEmitter> ActionMapper<E> {
    pub fn new(polarity: Polarity, scheme: KeyScheme, emitter: E) -> Self {
        Self {
            polarity,
            scheme,
            emitter,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Send the key for `action` directly, bypassing gesture mapping.
    pub fn send(&mut self, action: Action) -> Dispatch {
        let chord = self.scheme.chord(action);
        let delivered = match self.emitter.send(action, chord) {
            Ok(()) => true,
            Err(e) => {
                // Nothing is owed: the next swipe gets a fresh attempt
                warn!("{} not delivered: {}", action, e);
                false
            }
        };
        Dispatch { action, delivered }
    }

    pub fn dispatch(&mut self, event: &SwipeEvent) -> Dispatch {
        let action = self.polarity.action(event.direction);
        info!(
            "{} swipe ({:.2} in {:.2}s) -> {}",
            event.direction,
            event.magnitude,
            event.duration(),
            action
        );
        self.send(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmitterError;
    use crate::keys::KeyChord;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(Action, String)>,
        fail: bool,
    }

    impl KeyEmitter for Recorder {
        fn send(&mut self, action: Action, chord: KeyChord) -> Result<(), EmitterError> {
            if self.fail {
                return Err(EmitterError::Send("window not focused".into()));
            }
            self.sent.push((action, chord.to_string()));
            Ok(())
        }
    }

    fn swipe(direction: Direction) -> SwipeEvent {
        SwipeEvent {
            direction,
            magnitude: 0.2,
            started_at: 0.0,
            completed_at: 0.2,
        }
    }

    #[test]
    fn test_natural_polarity() {
        assert_eq!(Polarity::Natural.action(Direction::Forward), Action::Next);
        assert_eq!(Polarity::Natural.action(Direction::Backward), Action::Previous);
    }

    #[test]
    fn test_inverted_polarity() {
        assert_eq!(Polarity::from_invert(true), Polarity::Inverted);
        assert_eq!(Polarity::Inverted.action(Direction::Forward), Action::Previous);
        assert_eq!(Polarity::Inverted.action(Direction::Backward), Action::Next);
    }

    #[test]
    fn test_dispatch_sends_once() {
        let mut mapper = ActionMapper::new(Polarity::Natural, KeyScheme::Jk, Recorder::default());
        let result = mapper.dispatch(&swipe(Direction::Forward));
        assert_eq!(
            result,
            Dispatch {
                action: Action::Next,
                delivered: true
            }
        );
        assert_eq!(mapper.emitter().sent, vec![(Action::Next, "j".to_string())]);
    }

    #[test]
    fn test_emitter_failure_is_swallowed() {
        let emitter = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut mapper = ActionMapper::new(Polarity::Natural, KeyScheme::Arrows, emitter);
        let result = mapper.dispatch(&swipe(Direction::Backward));
        assert_eq!(result.action, Action::Previous);
        assert!(!result.delivered);
    }
}
