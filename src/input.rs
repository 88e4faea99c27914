//! Keyboard input mapping
//!
//! Key events become game actions through configurable bindings. Held keys
//! repeat through the terminal's own key repeat.
//!
//! A bare Shift press is only reported by terminals that support the kitty
//! keyboard protocol, and only once [`KEYBOARD_ENHANCEMENT`] is pushed.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, ModifierKeyCode,
};
use tracing::warn;

/// Keyboard protocol flags that make modifier keys arrive as key events
pub const KEYBOARD_ENHANCEMENT: KeyboardEnhancementFlags =
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        .union(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        .union(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES);

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Action),
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hold: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub start: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    pub fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings, skipping (and logging) unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    warn!("Ignoring unknown key binding {:?}", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: Self::parse_keys(&keys.move_left),
            move_right: Self::parse_keys(&keys.move_right),
            soft_drop: Self::parse_keys(&keys.soft_drop),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            rotate: Self::parse_keys(&keys.rotate),
            hold: Self::parse_keys(&keys.hold),
            pause: Self::parse_keys(&keys.pause),
            start: Self::parse_keys(&keys.start),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    /// Map a key press to a command. Releases map to nothing
    pub fn command_for(&self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let table = [
            (&self.move_left, Action::MoveLeft),
            (&self.move_right, Action::MoveRight),
            (&self.soft_drop, Action::SoftDrop),
            (&self.hard_drop, Action::HardDrop),
            (&self.rotate, Action::RotateClockwise),
            (&self.hold, Action::Hold),
            (&self.pause, Action::TogglePause),
            (&self.start, Action::Start),
        ];
        if let Some((_, action)) = table.iter().find(|(keys, _)| keys.contains(&code)) {
            return Some(Command::Game(*action));
        }
        self.quit.contains(&code).then_some(Command::Quit)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => {
            KeyCode::Modifier(ModifierKeyCode::LeftShift)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(KeyBindings::parse_key("Left"), Some(KeyCode::Left));
        assert_eq!(KeyBindings::parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(KeyBindings::parse_key("X"), Some(KeyCode::Char('x')));
        assert_eq!(KeyBindings::parse_key("F13"), None);
        assert_eq!(KeyBindings::parse_key(""), None);
    }

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        let cases = [
            (KeyCode::Left, Command::Game(Action::MoveLeft)),
            (KeyCode::Right, Command::Game(Action::MoveRight)),
            (KeyCode::Down, Command::Game(Action::SoftDrop)),
            (KeyCode::Up, Command::Game(Action::RotateClockwise)),
            (KeyCode::Char(' '), Command::Game(Action::HardDrop)),
            (KeyCode::Char('c'), Command::Game(Action::Hold)),
            (KeyCode::Char('Q'), Command::Game(Action::TogglePause)),
            (KeyCode::Enter, Command::Game(Action::Start)),
            (KeyCode::Esc, Command::Quit),
        ];
        for (code, expected) in cases {
            assert_eq!(keys.command_for(press(code)), Some(expected), "{:?}", code);
        }
        assert_eq!(keys.command_for(press(KeyCode::Char('m'))), None);
    }

    #[test]
    fn test_right_shift_holds() {
        let keys = KeyBindings::default();
        let code = KeyCode::Modifier(ModifierKeyCode::RightShift);
        assert_eq!(keys.command_for(press(code)), Some(Command::Game(Action::Hold)));
    }

    #[test]
    fn test_enhanced_shift_press_holds() {
        let keys = KeyBindings::default();
        let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
        // What a kitty-protocol terminal sends for a bare Shift press
        let pressed = KeyEvent::new_with_kind(shift, KeyModifiers::SHIFT, KeyEventKind::Press);
        assert_eq!(keys.command_for(pressed), Some(Command::Game(Action::Hold)));
        let released = KeyEvent::new_with_kind(shift, KeyModifiers::SHIFT, KeyEventKind::Release);
        assert_eq!(keys.command_for(released), None);
        assert!(KEYBOARD_ENHANCEMENT.contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES));
    }

    #[test]
    fn test_release_is_ignored() {
        let keys = KeyBindings::default();
        let key = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(keys.command_for(key), None);
        let repeat = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(keys.command_for(repeat), Some(Command::Game(Action::MoveLeft)));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let keys = KeyBindings::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.command_for(key), Some(Command::Quit));
    }

    #[test]
    fn test_custom_bindings_skip_unknown() {
        let mut settings = Settings::default();
        settings.keys.hard_drop = vec!["w".to_string(), "nonsense".to_string()];
        let keys = KeyBindings::from_settings(&settings);
        assert_eq!(keys.hard_drop, vec![KeyCode::Char('w')]);
        assert_eq!(
            keys.command_for(press(KeyCode::Char('w'))),
            Some(Command::Game(Action::HardDrop))
        );
    }
}
