//! Events delivered to per-window handlers.

use std::fmt;

use bitflags::bitflags;

use crate::drivers::ButtonMask;
use crate::window::WindowHandle;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT   = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT     = 0b0000_0100;
        const SUPER   = 0b0000_1000;
    }
}

/// Pointer payload. Coordinates are relative to the window's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub x: i32,
    pub y: i32,
    pub buttons: ButtonMask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: u32,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn new(code: u32, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Paint,
    Resize { width: u32, height: u32 },
    Move { x: i32, y: i32 },
    Close,
    Minimize,
    Maximize,
    Restore,
    Focus,
    Blur,
    MouseMove(MouseInput),
    MouseDown(MouseInput),
    MouseUp(MouseInput),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Paint => "paint",
            EventKind::Resize { .. } => "resize",
            EventKind::Move { .. } => "move",
            EventKind::Close => "close",
            EventKind::Minimize => "minimize",
            EventKind::Maximize => "maximize",
            EventKind::Restore => "restore",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::MouseMove(_) => "mouse-move",
            EventKind::MouseDown(_) => "mouse-down",
            EventKind::MouseUp(_) => "mouse-up",
            EventKind::KeyDown(_) => "key-down",
            EventKind::KeyUp(_) => "key-up",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: WindowHandle,
    pub kind: EventKind,
}

impl WindowEvent {
    pub fn new(window: WindowHandle, kind: EventKind) -> Self {
        Self { window, kind }
    }
}

/// Receives events for a single window.
///
/// Handlers run synchronously on the input thread; a slow handler stalls all
/// further input processing.
pub trait EventHandler {
    fn handle_event(&mut self, event: &WindowEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&WindowEvent),
{
    fn handle_event(&mut self, event: &WindowEvent) {
        self(event)
    }
}
