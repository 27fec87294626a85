//! Mapping from crossterm key events to the crate's key representation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::{Key, KeyPress};

/// Convert a crossterm key event into a [`KeyPress`].
///
/// Release events and keys the form does not react to (arrows, function
/// keys, ...) map to `None`.
pub fn map_key_event(event: &KeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Esc,
        _ => return None,
    };

    let ctrl = event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);

    Some(KeyPress { key, ctrl })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_key_maps_plain() {
        let event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(map_key_event(&event), Some(KeyPress::plain(Key::Char('a'))));
    }

    #[test]
    fn test_ctrl_modifier_detected() {
        let event = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(map_key_event(&event), Some(KeyPress::ctrl(Key::Char('b'))));
    }

    #[test]
    fn test_unhandled_keys_map_to_none() {
        let event = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(map_key_event(&event), None);
    }
}
