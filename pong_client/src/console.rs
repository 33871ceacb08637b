//! Console commands.
//!
//! The terminal client has no keyboard hook, so held keys are driven by
//! typed commands:
//!
//! ```text
//! up | down | stop        hold the paddle key (or release both)
//! press <key>             hold any key by name
//! release <key>           release a key
//! space                   tap space for one frame
//! name <display name>     change and remember the display name
//! status                  show session status
//! quit                    leave and exit
//! ```

use crate::input::{HeldKeys, DOWN_KEYS, START_KEY, UP_KEYS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Stop,
    Press(String),
    Release(String),
    Space,
    Name(String),
    Status,
    Quit,
    Unknown(String),
}

/// Parses one console line. Returns `None` for blank lines.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let cmd = match head {
        "" => return None,
        "up" => Command::Up,
        "down" => Command::Down,
        "stop" => Command::Stop,
        "space" | "start" => Command::Space,
        "press" if !rest.is_empty() => Command::Press(rest.to_string()),
        "release" if !rest.is_empty() => Command::Release(rest.to_string()),
        "name" if !rest.is_empty() => Command::Name(rest.to_string()),
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(cmd)
}

/// Held keys plus keys tapped for a single frame.
#[derive(Debug, Clone, Default)]
pub struct KeyDriver {
    pub keys: HeldKeys,
    taps: Vec<String>,
}

impl KeyDriver {
    /// Applies key commands. Returns false for commands that are not about
    /// keys.
    pub fn apply(&mut self, cmd: &Command) -> bool {
        match cmd {
            Command::Up => {
                self.release_paddle_keys();
                self.keys.press(UP_KEYS[0]);
            }
            Command::Down => {
                self.release_paddle_keys();
                self.keys.press(DOWN_KEYS[0]);
            }
            Command::Stop => self.release_paddle_keys(),
            Command::Press(key) => self.keys.press(key),
            Command::Release(key) => self.keys.release(key),
            Command::Space => {
                self.keys.press(START_KEY);
                self.taps.push(START_KEY.to_string());
            }
            _ => return false,
        }
        true
    }

    /// Releases tapped keys; call after each frame.
    pub fn end_frame(&mut self) {
        for key in self.taps.drain(..) {
            self.keys.release(&key);
        }
    }

    fn release_paddle_keys(&mut self) {
        for key in UP_KEYS.iter().chain(DOWN_KEYS.iter()) {
            self.keys.release(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeySource;

    #[test]
    fn parses_commands() {
        assert_eq!(parse("  "), None);
        assert_eq!(parse("up"), Some(Command::Up));
        assert_eq!(parse("name  Ada Lovelace "), Some(Command::Name("Ada Lovelace".into())));
        assert_eq!(parse("press w"), Some(Command::Press("w".into())));
        assert_eq!(parse("press"), Some(Command::Unknown("press".into())));
        assert_eq!(parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn space_is_tapped_for_one_frame() {
        let mut d = KeyDriver::default();
        assert!(d.apply(&Command::Space));
        assert!(d.keys.is_key_pressed(START_KEY));
        d.end_frame();
        assert!(!d.keys.is_key_pressed(START_KEY));
    }

    #[test]
    fn direction_commands_replace_each_other() {
        let mut d = KeyDriver::default();
        d.apply(&Command::Up);
        d.apply(&Command::Down);
        assert!(!d.keys.is_key_pressed("ArrowUp"));
        assert!(d.keys.is_key_pressed("ArrowDown"));
        d.apply(&Command::Stop);
        assert!(!d.keys.is_key_pressed("ArrowDown"));
        assert!(!d.apply(&Command::Status));
    }
}
