use bitflags::bitflags;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::layout::CellScale;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonMask: u8 {
        const LEFT   = 0b0000_0001;
        const RIGHT  = 0b0000_0010;
        const MIDDLE = 0b0000_0100;
    }
}

impl From<MouseButton> for ButtonMask {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => ButtonMask::LEFT,
            MouseButton::Right => ButtonMask::RIGHT,
            MouseButton::Middle => ButtonMask::MIDDLE,
        }
    }
}

/// One pointer report in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
    pub buttons: ButtonMask,
    pub wheel: i32,
}

impl PointerSample {
    pub fn new(x: i32, y: i32, buttons: ButtonMask) -> Self {
        Self {
            x,
            y,
            buttons,
            wheel: 0,
        }
    }

    pub fn with_wheel(mut self, wheel: i32) -> Self {
        self.wheel = wheel;
        self
    }

    pub fn pressed(&self) -> bool {
        !self.buttons.is_empty()
    }
}

/// Turns terminal mouse reports into pixel pointer samples.
///
/// Terminals report per-button transitions; the translator keeps the held
/// button set so every sample carries the full mask.
#[derive(Debug, Clone, Default)]
pub struct MouseTranslator {
    scale: CellScale,
    held: ButtonMask,
}

impl MouseTranslator {
    pub fn new(scale: CellScale) -> Self {
        Self {
            scale,
            held: ButtonMask::empty(),
        }
    }

    pub fn scale(&self) -> CellScale {
        self.scale
    }

    pub fn translate(&mut self, mouse: &MouseEvent) -> PointerSample {
        let mut wheel = 0;
        match mouse.kind {
            MouseEventKind::Down(button) | MouseEventKind::Drag(button) => {
                self.held |= ButtonMask::from(button);
            }
            MouseEventKind::Up(button) => {
                self.held -= ButtonMask::from(button);
            }
            MouseEventKind::ScrollUp => wheel = -1,
            MouseEventKind::ScrollDown => wheel = 1,
            MouseEventKind::Moved | MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => {}
        }
        let (x, y) = self.scale.pointer_from_cell(mouse.column, mouse.row);
        PointerSample {
            x,
            y,
            buttons: self.held,
            wheel,
        }
    }
}
