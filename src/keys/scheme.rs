//! Key layouts for feed navigation

use crate::action::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Space,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
}

/// A key with the modifiers held while it is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub modifiers: &'static [Modifier],
}

impl KeyChord {
    const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: &[],
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers {
            match modifier {
                Modifier::Shift => write!(f, "shift+")?,
            }
        }
        match self.key {
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Space => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Which keys a feed listens to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// Down / Up arrows
    #[default]
    Arrows,
    /// S / W
    Wasd,
    /// J / K (YouTube-style)
    Jk,
    /// Space / Shift+Space
    Space,
}

impl KeyScheme {
    pub fn chord(&self, action: Action) -> KeyChord {
        use KeyCode::*;
        match (self, action) {
            (KeyScheme::Arrows, Action::Next) => KeyChord::plain(Down),
            (KeyScheme::Arrows, Action::Previous) => KeyChord::plain(Up),
            (KeyScheme::Wasd, Action::Next) => KeyChord::plain(Char('s')),
            (KeyScheme::Wasd, Action::Previous) => KeyChord::plain(Char('w')),
            (KeyScheme::Jk, Action::Next) => KeyChord::plain(Char('j')),
            (KeyScheme::Jk, Action::Previous) => KeyChord::plain(Char('k')),
            (KeyScheme::Space, Action::Next) => KeyChord::plain(Space),
            (KeyScheme::Space, Action::Previous) => KeyChord {
                key: Space,
                modifiers: &[Modifier::Shift],
            },
        }
    }
}

impl fmt::Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScheme::Arrows => write!(f, "arrows"),
            KeyScheme::Wasd => write!(f, "wasd"),
            KeyScheme::Jk => write!(f, "jk"),
            KeyScheme::Space => write!(f, "space"),
        }
    }
}
