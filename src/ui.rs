//! Terminal preview of the desktop.
//!
//! `DesktopView` paints the manager's windows back to front into a ratatui
//! buffer, one terminal cell per `CellScale` block of pixels. Frames are drawn
//! by the manager's decorator so hit-testing and rendering agree on where the
//! titlebar and buttons are.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use crate::layout::CellScale;
use crate::state::Interaction;
use crate::window::WindowManager;

pub struct DesktopView<'a> {
    wm: &'a WindowManager,
    scale: CellScale,
    background: Style,
}

impl<'a> DesktopView<'a> {
    pub fn new(wm: &'a WindowManager, scale: CellScale) -> Self {
        Self {
            wm,
            scale,
            background: Style::default().bg(Color::Rgb(0x00, 0x80, 0x80)),
        }
    }

    pub fn background(mut self, style: Style) -> Self {
        self.background = style;
        self
    }
}

impl Widget for DesktopView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.background);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                }
            }
        }
        let decorator = self.wm.decorator();
        let focused = self.wm.focused();
        for window in self.wm.paint_order() {
            decorator.render_window(
                buf,
                window,
                self.scale,
                area,
                focused == Some(window.handle()),
            );
        }
    }
}

/// Splits a terminal area into the desktop and a one-row status bar.
pub fn split_screen(area: Rect) -> (Rect, Rect) {
    let [desktop, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    (desktop, status)
}

/// Desktop above a status bar, filling the whole terminal.
pub struct DesktopScreen<'a> {
    wm: &'a WindowManager,
    scale: CellScale,
}

impl<'a> DesktopScreen<'a> {
    pub fn new(wm: &'a WindowManager, scale: CellScale) -> Self {
        Self { wm, scale }
    }
}

impl Widget for DesktopScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (desktop, status) = split_screen(area);
        DesktopView::new(self.wm, self.scale).render(desktop, buf);
        Paragraph::new(status_line(self.wm))
            .style(Style::default().bg(Color::Black).fg(Color::Gray))
            .render(status, buf);
    }
}

/// One-line summary of the manager state for the preview's status bar.
pub fn status_line(wm: &WindowManager) -> Line<'static> {
    let focus = match wm.focused().and_then(|h| wm.get(h)) {
        Some(window) => format!("{} ({})", window.title(), window.handle()),
        None => "none".to_string(),
    };
    let gesture = match wm.interaction() {
        Interaction::Idle => "idle".to_string(),
        Interaction::Dragging { window, .. } => format!("dragging {window}"),
        Interaction::Resizing { window, edge } => format!("resizing {window} {edge:?}"),
    };
    Line::from(format!(
        " {}/{} windows | focus: {} | {} | n: new  q: quit",
        wm.len(),
        wm.capacity(),
        focus,
        gesture
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowFlags;

    fn render(wm: &WindowManager, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        DesktopView::new(wm, CellScale::default()).render(area, &mut buf);
        buf
    }

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.cell((x, y)).map(|c| c.symbol()).unwrap_or("")
    }

    #[test]
    fn draws_frame_title_and_buttons() {
        let mut wm = WindowManager::default();
        wm.create("Notes", 16, 20, 160, 100, WindowFlags::DEFAULT)
            .unwrap();
        let buf = render(&wm, 40, 20);
        // 160x100 px at 8x10 px per cell is a 20x10 cell frame at (2, 2)
        assert_eq!(symbol(&buf, 3, 2), "N");
        assert_eq!(symbol(&buf, 7, 2), "s");
        assert_eq!(symbol(&buf, 20, 2), "x");
        assert_eq!(symbol(&buf, 2, 11), "└");
        assert_eq!(symbol(&buf, 21, 11), "┘");
        assert_eq!(symbol(&buf, 2, 5), "│");
        // desktop outside the frame stays blank
        assert_eq!(symbol(&buf, 30, 15), " ");
    }

    #[test]
    fn front_window_paints_over_back_window() {
        let mut wm = WindowManager::default();
        wm.create("Back", 0, 0, 160, 100, WindowFlags::DEFAULT)
            .unwrap();
        wm.create("Front", 8, 10, 160, 100, WindowFlags::DEFAULT)
            .unwrap();
        let buf = render(&wm, 40, 20);
        assert_eq!(symbol(&buf, 2, 1), "F");
        assert_eq!(symbol(&buf, 1, 0), "B");
        let focused_bg = buf.cell((2, 1)).map(|c| c.bg);
        assert_eq!(focused_bg, Some(Color::Blue));
        let back_bg = buf.cell((1, 0)).map(|c| c.bg);
        assert_eq!(back_bg, Some(Color::DarkGray));
    }

    #[test]
    fn screen_reserves_bottom_row_for_status() {
        let mut wm = WindowManager::default();
        wm.create("Pad", 0, 0, 160, 100, WindowFlags::DEFAULT)
            .unwrap();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        DesktopScreen::new(&wm, CellScale::default()).render(area, &mut buf);
        assert_eq!(symbol(&buf, 1, 0), "P");
        assert_eq!(symbol(&buf, 1, 11), "1");
        assert_eq!(buf.cell((1, 11)).map(|c| c.bg), Some(Color::Black));
        assert_eq!(split_screen(area), (Rect::new(0, 0, 60, 11), Rect::new(0, 11, 60, 1)));
    }

    #[test]
    fn minimized_windows_are_not_drawn() {
        let mut wm = WindowManager::default();
        let w = wm
            .create("Gone", 16, 20, 160, 100, WindowFlags::DEFAULT)
            .unwrap();
        wm.minimize(w).unwrap();
        let buf = render(&wm, 40, 20);
        assert_eq!(symbol(&buf, 3, 2), " ");
    }

    #[test]
    fn status_line_reports_focus_and_gesture() {
        let mut wm = WindowManager::default();
        wm.create("Shell", 0, 0, 100, 100, WindowFlags::DEFAULT)
            .unwrap();
        let text = status_line(&wm).to_string();
        assert!(text.contains("1/64 windows"));
        assert!(text.contains("focus: Shell (1)"));
        assert!(text.contains("idle"));
    }
}
