//! Input handling.
//!
//! The simulation only asks "is this key held?". A windowing layer would
//! implement `KeySource` over its keyboard state; the terminal client keeps
//! a `HeldKeys` set driven by console commands.

use std::collections::HashSet;

/// Keys that move the local paddle down.
pub const DOWN_KEYS: [&str; 3] = ["ArrowDown", "s", "j"];
/// Keys that move the local paddle up.
pub const UP_KEYS: [&str; 3] = ["ArrowUp", "w", "k"];
/// Starts a match and restarts after game over.
pub const START_KEY: &str = " ";

/// Held-key query by key name.
pub trait KeySource {
    fn is_key_pressed(&self, key: &str) -> bool;
}

/// Set of currently held keys.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl KeySource for HeldKeys {
    fn is_key_pressed(&self, key: &str) -> bool {
        self.held.contains(key)
    }
}

/// Maps held keys to a paddle speed. Down wins over up.
pub fn paddle_speed(keys: &impl KeySource, max_speed: f64) -> f64 {
    if DOWN_KEYS.iter().any(|k| keys.is_key_pressed(k)) {
        max_speed
    } else if UP_KEYS.iter().any(|k| keys.is_key_pressed(k)) {
        -max_speed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keys_to_signed_speed() {
        let mut keys = HeldKeys::new();
        assert_eq!(paddle_speed(&keys, 10.0), 0.0);

        keys.press("w");
        assert_eq!(paddle_speed(&keys, 10.0), -10.0);

        keys.press("ArrowDown");
        assert_eq!(paddle_speed(&keys, 10.0), 10.0);

        keys.release_all();
        keys.press("j");
        assert_eq!(paddle_speed(&keys, 10.0), 10.0);
        keys.release("j");
        assert!(!keys.is_key_pressed("j"));
    }
}
