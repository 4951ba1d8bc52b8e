//! Shared crate-wide constants.

/// Smallest width a window may have, in pixels. `create`, `resize` and
/// interactive resizing all clamp to this floor.
pub const MIN_WINDOW_WIDTH: u32 = 50;

/// Smallest height a window may have, in pixels.
pub const MIN_WINDOW_HEIGHT: u32 = 50;

/// Height of the titlebar band measured from the top edge of a window.
pub const TITLEBAR_HEIGHT: u32 = 20;

/// Width of each titlebar button slot (close, maximize, minimize), laid out
/// right to left starting at the window's right edge.
pub const TITLEBAR_BUTTON_WIDTH: u32 = 20;

/// Thickness of the resize margin along every edge. Corner zones are
/// `RESIZE_BORDER` x `RESIZE_BORDER` squares.
pub const RESIZE_BORDER: u32 = 5;

/// Bytes per pixel of a window's backing buffer (32-bit ARGB).
pub const BYTES_PER_PIXEL: usize = 4;

/// Default number of window slots in the registry.
pub const DEFAULT_CAPACITY: usize = 64;

/// Default screen size used when maximizing a window.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1024;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 768;

/// Background color of freshly created windows (opaque light gray).
pub const DEFAULT_BACKGROUND: u32 = 0xFFC0_C0C0;
