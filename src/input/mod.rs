//! Input handling: key bindings and held-state tracking

pub mod keymap;
pub mod tracker;

pub use keymap::KeyMap;
pub use tracker::KeyTracker;

use crate::channel::protocol::Action;

/// An input transition to relay upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: Action,
    /// true on press, false on release
    pub state: bool,
}
