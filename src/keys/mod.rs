//! Key output for feed navigation
//!
//! Maps logical actions onto a key layout and delivers them either as real
//! keyboard events or as dry-run log lines.

mod emitter;
mod scheme;

#[cfg(feature = "keys")]
pub use emitter::EnigoEmitter;
pub use emitter::{DryRunEmitter, KeyEmitter};
pub use scheme::{KeyChord, KeyCode, KeyScheme, Modifier};
