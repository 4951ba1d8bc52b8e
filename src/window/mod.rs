pub mod buffer;
pub mod decorator;
pub mod registry;
pub mod z_order;

mod window_manager;

use std::any::Any;
use std::fmt;

use bitflags::bitflags;

use crate::constants::{DEFAULT_BACKGROUND, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::events::EventHandler;
use buffer::PixelBuffer;

pub use decorator::{ClassicDecorator, WindowDecorator, WindowZone};
pub use window_manager::WindowManager;

/// Opaque window identity. Raw value `0` never names a live window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WindowHandle(u32);

impl WindowHandle {
    pub const NONE: WindowHandle = WindowHandle(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed origin with unsigned size, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Half-open containment: `[x, x+width) x [y, y+height)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (px, py) = (x as i64, y as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    pub(crate) fn clamped_to_floor(mut self) -> Self {
        self.width = self.width.max(MIN_WINDOW_WIDTH);
        self.height = self.height.max(MIN_WINDOW_HEIGHT);
        self
    }
}

bitflags! {
    /// Capabilities fixed at creation time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u16 {
        const VISIBLE      = 0b0000_0001;
        const RESIZABLE    = 0b0000_0010;
        const MOVABLE      = 0b0000_0100;
        const MINIMIZABLE  = 0b0000_1000;
        const MAXIMIZABLE  = 0b0001_0000;
        const CLOSABLE     = 0b0010_0000;
        const HAS_BORDER   = 0b0100_0000;
        const HAS_TITLEBAR = 0b1000_0000;

        const DEFAULT = Self::VISIBLE.bits()
            | Self::RESIZABLE.bits()
            | Self::MOVABLE.bits()
            | Self::MINIMIZABLE.bits()
            | Self::MAXIMIZABLE.bits()
            | Self::CLOSABLE.bits()
            | Self::HAS_BORDER.bits()
            | Self::HAS_TITLEBAR.bits();
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

pub struct Window {
    handle: WindowHandle,
    title: String,
    rect: WindowRect,
    flags: WindowFlags,
    state: WindowState,
    background: u32,
    buffer: PixelBuffer,
    handler: Option<Box<dyn EventHandler>>,
    user_data: Option<Box<dyn Any>>,
    // geometry to return to when leaving `Maximized`
    saved_rect: Option<WindowRect>,
    dirty: bool,
}

impl Window {
    fn new(
        handle: WindowHandle,
        title: String,
        rect: WindowRect,
        flags: WindowFlags,
        buffer: PixelBuffer,
    ) -> Self {
        Self {
            handle,
            title,
            rect,
            flags,
            state: WindowState::Normal,
            background: DEFAULT_BACKGROUND,
            buffer,
            handler: None,
            user_data: None,
            saved_rect: None,
            dirty: true,
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn background_color(&self) -> u32 {
        self.background
    }

    /// Backing pixels, sized for the geometry the window was created with.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn user_data(&self) -> Option<&dyn Any> {
        self.user_data.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    /// Eligible for hit-testing and painting.
    pub fn is_paintable(&self) -> bool {
        self.is_visible() && !self.is_minimized()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("title", &self.title)
            .field("rect", &self.rect)
            .field("flags", &self.flags)
            .field("state", &self.state)
            .field("has_handler", &self.handler.is_some())
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = WindowRect::new(10, 10, 50, 50);
        assert!(r.contains(10, 10));
        assert!(r.contains(59, 59));
        assert!(!r.contains(60, 10));
        assert!(!r.contains(10, 60));
        assert!(!r.contains(9, 30));
    }

    #[test]
    fn rect_contains_handles_negative_origin() {
        let r = WindowRect::new(-30, -5, 60, 60);
        assert!(r.contains(-30, -5));
        assert!(r.contains(29, 54));
        assert!(!r.contains(30, 0));
    }

    #[test]
    fn floor_clamps_small_sizes() {
        let r = WindowRect::new(0, 0, 10, 80).clamped_to_floor();
        assert_eq!(r.width, MIN_WINDOW_WIDTH);
        assert_eq!(r.height, 80);
    }

    #[test]
    fn null_handle() {
        assert!(WindowHandle::NONE.is_none());
        assert!(!WindowHandle::from_raw(3).is_none());
        assert_eq!(WindowHandle::default(), WindowHandle::NONE);
    }
}
