use std::io;

use ratatui::Frame;
use ratatui::backend::Backend;
use ratatui::layout::{Rect, Size};

use crate::layout::CellScale;
use crate::ui::{DesktopScreen, split_screen};
use crate::window::WindowManager;

pub trait OutputDriver {
    type Backend: Backend;

    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    /// Size of the drawable surface in cells.
    fn size(&self) -> io::Result<Size>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);

    /// Screen size in pixels of the desktop part of the surface.
    fn desktop_pixels(&self, scale: CellScale) -> io::Result<(u32, u32)> {
        let size = self.size()?;
        let (desktop, _) = split_screen(Rect::new(0, 0, size.width, size.height));
        Ok(scale.screen_size(desktop))
    }

    /// Draws the manager's paintable windows and the status bar.
    fn present(&mut self, wm: &WindowManager, scale: CellScale) -> io::Result<()> {
        self.draw(|frame| frame.render_widget(DesktopScreen::new(wm, scale), frame.area()))
    }
}
