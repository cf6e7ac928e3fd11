//! Logical keyboard state
//!
//! Host key events (DOM keydown/keyup on the web) write into a `Keyboard`;
//! the simulation only ever reads it through `InputSource`. Clones share the
//! same state, so the event handlers and the simulation each hold one.

use std::cell::Cell;
use std::rc::Rc;

/// Keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
}

impl Key {
    pub const ALL: [Key; 3] = [Key::Left, Key::Right, Key::Fire];

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Spacebar" | "Space" => Some(Key::Fire),
            _ => None,
        }
    }

    /// Map a legacy `keyCode`
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Key::Left),
            39 => Some(Key::Right),
            32 => Some(Key::Fire),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Key::Left => 1,
            Key::Right => 1 << 1,
            Key::Fire => 1 << 2,
        }
    }
}

/// Read-only view of which keys are currently held
pub trait InputSource {
    fn is_held(&self, key: Key) -> bool;
}

/// Shared key state, last write wins
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    held: Rc<Cell<u8>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: Key, down: bool) {
        let bits = self.held.get();
        self.held.set(if down { bits | key.bit() } else { bits & !key.bit() });
    }

    pub fn press(&self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&self, key: Key) {
        self.set(key, false);
    }

    /// Release everything (e.g. when the window loses focus)
    pub fn clear(&self) {
        self.held.set(0);
    }

    /// Apply a host key event by name. Returns true if the key is one we use.
    pub fn handle_key(&self, name: &str, down: bool) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.set(key, down);
                true
            }
            None => false,
        }
    }

    /// Same as `handle_key`, for a legacy numeric key code
    pub fn handle_code(&self, code: u32, down: bool) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.set(key, down);
                true
            }
            None => false,
        }
    }
}

impl InputSource for Keyboard {
    fn is_held(&self, key: Key) -> bool {
        self.held.get() & key.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_name(" "), Some(Key::Fire));
        assert_eq!(Key::from_name("Enter"), None);

        assert_eq!(Key::from_code(37), Some(Key::Left));
        assert_eq!(Key::from_code(39), Some(Key::Right));
        assert_eq!(Key::from_code(32), Some(Key::Fire));
        assert_eq!(Key::from_code(13), None);
    }

    #[test]
    fn test_clones_share_state() {
        let keyboard = Keyboard::new();
        let view = keyboard.clone();

        keyboard.press(Key::Fire);
        keyboard.press(Key::Left);
        assert!(view.is_held(Key::Fire));
        assert!(view.is_held(Key::Left));
        assert!(!view.is_held(Key::Right));

        keyboard.release(Key::Fire);
        assert!(!view.is_held(Key::Fire));
        assert!(view.is_held(Key::Left));

        keyboard.clear();
        assert!(Key::ALL.iter().all(|&k| !view.is_held(k)));
    }

    #[test]
    fn test_handle_key_ignores_unknown() {
        let keyboard = Keyboard::new();
        assert!(keyboard.handle_key("ArrowRight", true));
        assert!(!keyboard.handle_key("q", true));
        assert!(keyboard.is_held(Key::Right));
        assert!(keyboard.handle_key("ArrowRight", false));
        assert!(!keyboard.is_held(Key::Right));
    }

    #[test]
    fn test_handle_code_falls_back_to_legacy_codes() {
        let keyboard = Keyboard::new();
        // Old browsers report an unhelpful key name but a usable code
        assert!(!keyboard.handle_key("Unidentified", true));
        assert!(keyboard.handle_code(32, true));
        assert!(keyboard.is_held(Key::Fire));
        assert!(!keyboard.handle_code(13, true));
        assert!(keyboard.handle_code(32, false));
        assert!(!keyboard.is_held(Key::Fire));
    }
}
