use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Window, WindowFlags, WindowRect};
use crate::constants::{RESIZE_BORDER, TITLEBAR_BUTTON_WIDTH, TITLEBAR_HEIGHT};
use crate::layout::CellScale;
use crate::layout::floating::ResizeEdge;

/// Sub-region of a window with its own input meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowZone {
    CloseButton,
    MaximizeButton,
    MinimizeButton,
    /// Drag handle.
    TitleBar,
    Resize(ResizeEdge),
    Client,
}

/// Window chrome: decides what each pixel of a window means and how the
/// frame is drawn in the terminal preview.
pub trait WindowDecorator: std::fmt::Debug {
    /// Classifies a screen point already known to lie inside `rect`.
    fn zone_at(&self, rect: WindowRect, flags: WindowFlags, x: i32, y: i32) -> WindowZone;

    fn render_window(
        &self,
        buffer: &mut Buffer,
        window: &Window,
        scale: CellScale,
        bounds: Rect,
        focused: bool,
    );
}

/// 20 px titlebar with close/maximize/minimize slots on the right and a 5 px
/// resize margin.
#[derive(Debug, Default)]
pub struct ClassicDecorator;

impl ClassicDecorator {
    fn titlebar_zone(width: i64, flags: WindowFlags, lx: i64) -> Option<WindowZone> {
        let button = TITLEBAR_BUTTON_WIDTH as i64;
        // Slots are fixed: close is always rightmost, maximize next, minimize last.
        let slot = (width - 1 - lx) / button;
        match slot {
            0 if flags.contains(WindowFlags::CLOSABLE) => return Some(WindowZone::CloseButton),
            1 if flags.contains(WindowFlags::MAXIMIZABLE) => {
                return Some(WindowZone::MaximizeButton);
            }
            2 if flags.contains(WindowFlags::MINIMIZABLE) => {
                return Some(WindowZone::MinimizeButton);
            }
            _ => {}
        }
        flags
            .contains(WindowFlags::MOVABLE)
            .then_some(WindowZone::TitleBar)
    }

    fn resize_zone(width: i64, height: i64, lx: i64, ly: i64) -> Option<ResizeEdge> {
        let border = RESIZE_BORDER as i64;
        let left = lx < border;
        let right = lx >= width - border;
        let top = ly < border;
        let bottom = ly >= height - border;
        // Corners first so the edge bands cannot swallow corner pixels.
        let edge = match (left, right, top, bottom) {
            (true, _, true, _) => ResizeEdge::TopLeft,
            (_, true, true, _) => ResizeEdge::TopRight,
            (true, _, _, true) => ResizeEdge::BottomLeft,
            (_, true, _, true) => ResizeEdge::BottomRight,
            (true, _, _, _) => ResizeEdge::Left,
            (_, true, _, _) => ResizeEdge::Right,
            (_, _, true, _) => ResizeEdge::Top,
            (_, _, _, true) => ResizeEdge::Bottom,
            _ => return None,
        };
        Some(edge)
    }
}

impl WindowDecorator for ClassicDecorator {
    fn zone_at(&self, rect: WindowRect, flags: WindowFlags, x: i32, y: i32) -> WindowZone {
        let lx = x as i64 - rect.x as i64;
        let ly = y as i64 - rect.y as i64;
        let width = rect.width as i64;
        let height = rect.height as i64;

        if flags.contains(WindowFlags::HAS_TITLEBAR)
            && ly < TITLEBAR_HEIGHT as i64
            && let Some(zone) = Self::titlebar_zone(width, flags, lx)
        {
            return zone;
        }
        if flags.contains(WindowFlags::RESIZABLE)
            && let Some(edge) = Self::resize_zone(width, height, lx, ly)
        {
            return WindowZone::Resize(edge);
        }
        WindowZone::Client
    }

    fn render_window(
        &self,
        buffer: &mut Buffer,
        window: &Window,
        scale: CellScale,
        bounds: Rect,
        focused: bool,
    ) {
        let rect = window.rect();
        let Some(cells) = scale.to_cells(rect, bounds) else {
            return;
        };
        let flags = window.flags();

        let client_style = Style::default().bg(argb_to_color(window.background_color()));
        let focused_header_style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let normal_header_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let border_style = Style::default().fg(Color::Gray);
        let header_style = if focused {
            focused_header_style
        } else {
            normal_header_style
        };

        let right = cells.x + cells.width - 1;
        let bottom = cells.y + cells.height - 1;
        // Which frame edges survived clipping.
        let cw = scale.cell_width as i64;
        let ch = scale.cell_height as i64;
        let top_visible = rect.y as i64 >= 0 && (rect.y as i64).div_euclid(ch) < bounds.height as i64;
        let left_visible = rect.x as i64 >= 0;
        let right_visible = rect.right() <= bounds.width as i64 * cw;
        let bottom_visible = rect.bottom() <= bounds.height as i64 * ch;

        for y in cells.y..=bottom {
            for x in cells.x..=right {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                    cell.set_style(client_style);
                }
            }
        }

        if flags.contains(WindowFlags::HAS_BORDER) {
            for x in cells.x..=right {
                if top_visible && let Some(cell) = buffer.cell_mut((x, cells.y)) {
                    cell.set_symbol("─").set_style(border_style);
                }
                if bottom_visible && let Some(cell) = buffer.cell_mut((x, bottom)) {
                    cell.set_symbol("─").set_style(border_style);
                }
            }
            for y in cells.y..=bottom {
                if left_visible && let Some(cell) = buffer.cell_mut((cells.x, y)) {
                    cell.set_symbol("│").set_style(border_style);
                }
                if right_visible && let Some(cell) = buffer.cell_mut((right, y)) {
                    cell.set_symbol("│").set_style(border_style);
                }
            }
            let corners = [
                (left_visible && top_visible, cells.x, cells.y, "┌"),
                (right_visible && top_visible, right, cells.y, "┐"),
                (left_visible && bottom_visible, cells.x, bottom, "└"),
                (right_visible && bottom_visible, right, bottom, "┘"),
            ];
            for (visible, x, y, symbol) in corners {
                if visible && let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol).set_style(border_style);
                }
            }
        }

        if flags.contains(WindowFlags::HAS_TITLEBAR) && top_visible {
            let header_y = cells.y;
            for x in cells.x..=right {
                if let Some(cell) = buffer.cell_mut((x, header_y)) {
                    cell.set_symbol(" ");
                    cell.set_style(header_style);
                }
            }
            let title_start = cells.x.saturating_add(1);
            for (idx, ch) in window.title().chars().enumerate() {
                let x = title_start.saturating_add(idx as u16);
                if x >= right {
                    break;
                }
                if let Some(cell) = buffer.cell_mut((x, header_y)) {
                    cell.set_symbol(&ch.to_string());
                }
            }
            if right_visible {
                let buttons = [
                    (WindowFlags::CLOSABLE, 0u32, "x"),
                    (WindowFlags::MAXIMIZABLE, 1, "□"),
                    (WindowFlags::MINIMIZABLE, 2, "_"),
                ];
                for (flag, slot, symbol) in buttons {
                    if !flags.contains(flag) {
                        continue;
                    }
                    // center pixel of the slot, mapped back to a column
                    let px = rect.right() - (slot * TITLEBAR_BUTTON_WIDTH) as i64
                        - (TITLEBAR_BUTTON_WIDTH / 2) as i64;
                    let col = bounds.x as i64 + px.div_euclid(cw);
                    if col >= cells.x as i64
                        && col <= right as i64
                        && let Some(cell) = buffer.cell_mut((col as u16, header_y))
                    {
                        cell.set_symbol(symbol);
                    }
                }
            }
        }
    }
}

fn argb_to_color(argb: u32) -> Color {
    let r = ((argb >> 16) & 0xFF) as u8;
    let g = ((argb >> 8) & 0xFF) as u8;
    let b = (argb & 0xFF) as u8;
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: WindowRect = WindowRect::new(100, 100, 200, 150);

    fn zone(flags: WindowFlags, x: i32, y: i32) -> WindowZone {
        ClassicDecorator.zone_at(RECT, flags, x, y)
    }

    #[test]
    fn titlebar_buttons_right_to_left() {
        let f = WindowFlags::DEFAULT;
        assert_eq!(zone(f, 299, 110), WindowZone::CloseButton);
        assert_eq!(zone(f, 280, 110), WindowZone::CloseButton);
        assert_eq!(zone(f, 279, 110), WindowZone::MaximizeButton);
        assert_eq!(zone(f, 260, 110), WindowZone::MaximizeButton);
        assert_eq!(zone(f, 259, 110), WindowZone::MinimizeButton);
        assert_eq!(zone(f, 240, 110), WindowZone::MinimizeButton);
        assert_eq!(zone(f, 239, 110), WindowZone::TitleBar);
        // the titlebar band wins over the top-left resize corner
        assert_eq!(zone(f, 101, 101), WindowZone::TitleBar);
    }

    #[test]
    fn disabled_buttons_fall_back_to_drag() {
        let f = WindowFlags::DEFAULT - WindowFlags::CLOSABLE - WindowFlags::MAXIMIZABLE;
        assert_eq!(zone(f, 290, 110), WindowZone::TitleBar);
        assert_eq!(zone(f, 270, 110), WindowZone::TitleBar);
        // minimize keeps its slot even with the others gone
        assert_eq!(zone(f, 250, 110), WindowZone::MinimizeButton);
    }

    #[test]
    fn non_movable_titlebar_falls_through_to_resize_then_client() {
        let f = WindowFlags::DEFAULT - WindowFlags::MOVABLE;
        assert_eq!(zone(f, 150, 110), WindowZone::Client);
        assert_eq!(zone(f, 150, 101), WindowZone::Resize(ResizeEdge::Top));
        assert_eq!(zone(f, 100, 100), WindowZone::Resize(ResizeEdge::TopLeft));
    }

    #[test]
    fn corners_win_over_edges() {
        let f = WindowFlags::DEFAULT;
        assert_eq!(
            zone(f, 100, 249),
            WindowZone::Resize(ResizeEdge::BottomLeft)
        );
        assert_eq!(
            zone(f, 104, 245),
            WindowZone::Resize(ResizeEdge::BottomLeft)
        );
        assert_eq!(
            zone(f, 299, 249),
            WindowZone::Resize(ResizeEdge::BottomRight)
        );
        assert_eq!(zone(f, 104, 244), WindowZone::Resize(ResizeEdge::Left));
        assert_eq!(zone(f, 105, 249), WindowZone::Resize(ResizeEdge::Bottom));
        assert_eq!(zone(f, 295, 200), WindowZone::Resize(ResizeEdge::Right));
    }

    #[test]
    fn top_corners_without_titlebar() {
        let f = WindowFlags::DEFAULT - WindowFlags::HAS_TITLEBAR;
        assert_eq!(zone(f, 100, 100), WindowZone::Resize(ResizeEdge::TopLeft));
        assert_eq!(zone(f, 299, 104), WindowZone::Resize(ResizeEdge::TopRight));
        assert_eq!(zone(f, 200, 103), WindowZone::Resize(ResizeEdge::Top));
    }

    #[test]
    fn non_resizable_border_is_client() {
        let f = WindowFlags::DEFAULT - WindowFlags::RESIZABLE;
        assert_eq!(zone(f, 100, 200), WindowZone::Client);
        assert_eq!(zone(f, 200, 200), WindowZone::Client);
    }

    #[test]
    fn argb_drops_alpha() {
        assert_eq!(argb_to_color(0xFF10_2030), Color::Rgb(0x10, 0x20, 0x30));
    }
}
