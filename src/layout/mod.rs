//! Geometry helpers shared by the hit tester, the console driver and the
//! preview renderer.

pub mod floating;

use ratatui::prelude::Rect;

use crate::window::WindowRect;

/// How many screen pixels one terminal cell covers.
///
/// The console driver maps a cell to the pixel at its center; the preview
/// renderer maps a pixel rectangle to every cell whose origin it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub cell_width: u16,
    pub cell_height: u16,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 10,
        }
    }
}

impl CellScale {
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Pixel at the center of a terminal cell.
    pub fn pointer_from_cell(&self, column: u16, row: u16) -> (i32, i32) {
        let cw = self.cell_width as i32;
        let ch = self.cell_height as i32;
        (column as i32 * cw + cw / 2, row as i32 * ch + ch / 2)
    }

    /// Screen size in pixels for a terminal area.
    pub fn screen_size(&self, area: Rect) -> (u32, u32) {
        (
            area.width as u32 * self.cell_width as u32,
            area.height as u32 * self.cell_height as u32,
        )
    }

    /// Cell rectangle covered by `rect`, clipped to `bounds`. `None` when
    /// nothing of it is visible.
    pub fn to_cells(&self, rect: WindowRect, bounds: Rect) -> Option<Rect> {
        let cw = self.cell_width as i64;
        let ch = self.cell_height as i64;
        let left = div_ceil(rect.x as i64, cw);
        let top = div_ceil(rect.y as i64, ch);
        let right = div_ceil(rect.right(), cw);
        let bottom = div_ceil(rect.bottom(), ch);

        let bx0 = bounds.x as i64;
        let by0 = bounds.y as i64;
        let bx1 = bx0 + bounds.width as i64;
        let by1 = by0 + bounds.height as i64;

        let x0 = (bx0 + left).max(bx0);
        let y0 = (by0 + top).max(by0);
        let x1 = (bx0 + right).min(bx1);
        let y1 = (by0 + bottom).min(by1);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

fn div_ceil(value: i64, divisor: i64) -> i64 {
    let q = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        q
    } else {
        q + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_from_cell_uses_cell_center() {
        let scale = CellScale::new(8, 10);
        assert_eq!(scale.pointer_from_cell(0, 0), (4, 5));
        assert_eq!(scale.pointer_from_cell(3, 2), (28, 25));
    }

    #[test]
    fn to_cells_scales_and_clips() {
        let scale = CellScale::new(8, 10);
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 10,
        };
        let r = scale.to_cells(WindowRect::new(16, 20, 80, 50), bounds);
        assert_eq!(
            r,
            Some(Rect {
                x: 2,
                y: 2,
                width: 10,
                height: 5
            })
        );

        // partially offscreen to the left
        let r = scale.to_cells(WindowRect::new(-40, 0, 80, 50), bounds);
        assert_eq!(r.map(|r| (r.x, r.width)), Some((0, 5)));

        // fully offscreen
        assert_eq!(scale.to_cells(WindowRect::new(400, 0, 80, 50), bounds), None);
    }

    #[test]
    fn zero_scale_is_raised_to_one() {
        let scale = CellScale::new(0, 0);
        assert_eq!(scale.cell_width, 1);
        assert_eq!(scale.cell_height, 1);
    }
}
