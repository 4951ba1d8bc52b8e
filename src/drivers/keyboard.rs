use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::events::{KeyInput, KeyModifiers};

/// Codes for keys without a character. They live in the Unicode private use
/// area so they never collide with `KeyCode::Char` values.
pub mod codes {
    pub const ENTER: u32 = 0xE000;
    pub const ESC: u32 = 0xE001;
    pub const BACKSPACE: u32 = 0xE002;
    pub const TAB: u32 = 0xE003;
    pub const BACK_TAB: u32 = 0xE004;
    pub const LEFT: u32 = 0xE010;
    pub const RIGHT: u32 = 0xE011;
    pub const UP: u32 = 0xE012;
    pub const DOWN: u32 = 0xE013;
    pub const HOME: u32 = 0xE014;
    pub const END: u32 = 0xE015;
    pub const PAGE_UP: u32 = 0xE016;
    pub const PAGE_DOWN: u32 = 0xE017;
    pub const INSERT: u32 = 0xE018;
    pub const DELETE: u32 = 0xE019;
    /// `F1` is `FUNCTION_BASE + 1`.
    pub const FUNCTION_BASE: u32 = 0xE100;
}

pub fn key_code(code: KeyCode) -> Option<u32> {
    let value = match code {
        KeyCode::Char(c) => c as u32,
        KeyCode::Enter => codes::ENTER,
        KeyCode::Esc => codes::ESC,
        KeyCode::Backspace => codes::BACKSPACE,
        KeyCode::Tab => codes::TAB,
        KeyCode::BackTab => codes::BACK_TAB,
        KeyCode::Left => codes::LEFT,
        KeyCode::Right => codes::RIGHT,
        KeyCode::Up => codes::UP,
        KeyCode::Down => codes::DOWN,
        KeyCode::Home => codes::HOME,
        KeyCode::End => codes::END,
        KeyCode::PageUp => codes::PAGE_UP,
        KeyCode::PageDown => codes::PAGE_DOWN,
        KeyCode::Insert => codes::INSERT,
        KeyCode::Delete => codes::DELETE,
        KeyCode::F(n) => codes::FUNCTION_BASE + n as u32,
        _ => return None,
    };
    Some(value)
}

pub fn key_modifiers(mods: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as Ct;
    let mut out = KeyModifiers::empty();
    if mods.contains(Ct::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if mods.contains(Ct::CONTROL) {
        out |= KeyModifiers::CONTROL;
    }
    if mods.contains(Ct::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(Ct::SUPER) {
        out |= KeyModifiers::SUPER;
    }
    out
}

/// Converts a terminal key report into key input plus whether it is a press.
/// Repeats count as presses. Keys without a code are dropped.
pub fn translate_key(key: &KeyEvent) -> Option<(KeyInput, bool)> {
    let code = key_code(key.code)?;
    let pressed = !matches!(key.kind, KeyEventKind::Release);
    Some((KeyInput::new(code, key_modifiers(key.modifiers)), pressed))
}
