pub mod console;
pub mod keyboard;
pub mod mouse;
pub mod output_driver;

use std::io;
use std::time::Duration;

use crate::events::KeyInput;

pub use mouse::{ButtonMask, MouseTranslator, PointerSample};
pub use output_driver::OutputDriver;

/// Input in the form the window manager consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskInput {
    Pointer(PointerSample),
    Key { input: KeyInput, pressed: bool },
    /// The output surface changed to `columns` x `rows` cells.
    Resize { columns: u16, rows: u16 },
}

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Next input. `None` when the raw event has no meaning for the desktop
    /// (focus changes, paste, keys without a code).
    fn read(&mut self) -> io::Result<Option<DeskInput>>;

    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Option<DeskInput>> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}
