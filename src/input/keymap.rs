//! Key code to action bindings

use std::collections::HashMap;

use crate::channel::protocol::Action;

// Key codes follow the browser client's values
pub const KEY_W: u16 = 87;
pub const KEY_A: u16 = 65;
pub const KEY_S: u16 = 83;
pub const KEY_D: u16 = 68;
pub const KEY_SPACE: u16 = 32;

/// Maps raw key codes to input actions
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<u16, Action>,
}

impl KeyMap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, code: u16, action: Action) {
        self.bindings.insert(code, action);
    }

    /// Look up the action bound to a key code
    pub fn action(&self, code: u16) -> Option<Action> {
        self.bindings.get(&code).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KEY_W, Action::Forward);
        map.bind(KEY_A, Action::Left);
        map.bind(KEY_D, Action::Right);
        map.bind(KEY_S, Action::Brake);
        map.bind(KEY_SPACE, Action::Shoot);
        map
    }
}

/// Translate a key name ("w", "space") to its key code
///
/// Used by the stdin driver; graphical frontends deliver codes directly.
pub fn code_for_name(name: &str) -> Option<u16> {
    match name {
        "space" => Some(KEY_SPACE),
        single if single.len() == 1 => {
            let ch = single.chars().next()?;
            if ch.is_ascii_alphabetic() {
                Some(ch.to_ascii_uppercase() as u16)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_match_browser_client() {
        let map = KeyMap::default();
        assert_eq!(map.action(KEY_W), Some(Action::Forward));
        assert_eq!(map.action(KEY_A), Some(Action::Left));
        assert_eq!(map.action(KEY_D), Some(Action::Right));
        assert_eq!(map.action(KEY_S), Some(Action::Brake));
        assert_eq!(map.action(KEY_SPACE), Some(Action::Shoot));
    }

    #[test]
    fn unbound_code_yields_none() {
        let map = KeyMap::default();
        assert_eq!(map.action(13), None);
    }

    #[test]
    fn key_names_resolve_to_codes() {
        assert_eq!(code_for_name("w"), Some(KEY_W));
        assert_eq!(code_for_name("W"), Some(KEY_W));
        assert_eq!(code_for_name("space"), Some(KEY_SPACE));
        assert_eq!(code_for_name("enter"), None);
        assert_eq!(code_for_name("1"), None);
    }
}
