//! Held-state tracking and key event debounce

use std::collections::HashMap;

use crate::channel::protocol::Action;
use crate::input::{InputEvent, KeyMap};

/// Tracks which actions are currently held
///
/// Keyboards auto-repeat key-down while a button is held; only the first
/// transition per direction is relayed upstream.
pub struct KeyTracker {
    keymap: KeyMap,
    held: HashMap<Action, bool>,
}

impl KeyTracker {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            held: HashMap::new(),
        }
    }

    /// Handle a key press; returns the event to relay, if any
    pub fn key_down(&mut self, code: u16) -> Option<InputEvent> {
        let action = self.keymap.action(code)?;
        let held = self.held.entry(action).or_insert(false);
        if *held {
            return None;
        }
        *held = true;
        Some(InputEvent {
            action,
            state: true,
        })
    }

    /// Handle a key release; returns the event to relay, if any
    pub fn key_up(&mut self, code: u16) -> Option<InputEvent> {
        let action = self.keymap.action(code)?;
        let held = self.held.entry(action).or_insert(false);
        if !*held {
            return None;
        }
        *held = false;
        Some(InputEvent {
            action,
            state: false,
        })
    }

    /// Whether an action is currently held
    pub fn is_held(&self, action: Action) -> bool {
        self.held.get(&action).copied().unwrap_or(false)
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}
