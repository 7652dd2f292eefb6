//! Synthetic key emission
//!
//! - **Enigo**: real OS key events (requires the `keys` feature)
//! - **Dry run**: logs the chord instead of sending it

use super::scheme::KeyChord;
use crate::action::Action;
use crate::error::EmitterError;
use tracing::info;

/// Anything that can turn an action's key chord into input.
pub trait KeyEmitter {
    fn send(&mut self, action: Action, chord: KeyChord) -> Result<(), EmitterError>;
}

impl<E: KeyEmitter + ?Sized> KeyEmitter for Box<E> {
    fn send(&mut self, action: Action, chord: KeyChord) -> Result<(), EmitterError> {
        (**self).send(action, chord)
    }
}

/// Logs what would have been sent.
#[derive(Debug, Default)]
pub struct DryRunEmitter;

impl KeyEmitter for DryRunEmitter {
    fn send(&mut self, action: Action, chord: KeyChord) -> Result<(), EmitterError> {
        info!("[DRY RUN] would send '{}' for {}", chord, action);
        Ok(())
    }
}

#[cfg(feature = "keys")]
pub use self::enigo_emitter::EnigoEmitter;

#[cfg(feature = "keys")]
mod enigo_emitter {
    use super::KeyEmitter;
    use crate::action::Action;
    use crate::error::EmitterError;
    use crate::keys::scheme::{KeyChord, KeyCode, Modifier};
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};
    use std::thread;
    use std::time::Duration;
    use tracing::debug;

    /// Keyboard output through enigo
    pub struct EnigoEmitter {
        enigo: Enigo,
    }

    impl EnigoEmitter {
        pub fn new() -> Result<Self, EmitterError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| EmitterError::Init(e.to_string()))?;
            Ok(Self { enigo })
        }

        fn key(code: KeyCode) -> Key {
            match code {
                KeyCode::Up => Key::UpArrow,
                KeyCode::Down => Key::DownArrow,
                KeyCode::Space => Key::Space,
                KeyCode::Char(c) => Key::Unicode(c),
            }
        }

        fn modifier(modifier: Modifier) -> Key {
            match modifier {
                Modifier::Shift => Key::Shift,
            }
        }
    }

    impl KeyEmitter for EnigoEmitter {
        fn send(&mut self, action: Action, chord: KeyChord) -> Result<(), EmitterError> {
            debug!("sending '{}' for {}", chord, action);

            for modifier in chord.modifiers {
                self.enigo
                    .key(Self::modifier(*modifier), Direction::Press)
                    .map_err(|e| EmitterError::Send(format!("press modifier: {}", e)))?;
            }

            // Small delay for modifiers to register
            if !chord.modifiers.is_empty() {
                thread::sleep(Duration::from_millis(10));
            }

            let clicked = self
                .enigo
                .key(Self::key(chord.key), Direction::Click)
                .map_err(|e| EmitterError::Send(format!("click {}: {}", chord, e)));

            // Release in reverse order even if the click failed
            for modifier in chord.modifiers.iter().rev() {
                self.enigo
                    .key(Self::modifier(*modifier), Direction::Release)
                    .map_err(|e| EmitterError::Send(format!("release modifier: {}", e)))?;
            }

            clicked
        }
    }
}
