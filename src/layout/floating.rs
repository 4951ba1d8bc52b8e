use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::window::WindowRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Left,
        ResizeEdge::Right,
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomLeft,
        ResizeEdge::BottomRight,
    ];

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    pub fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }
}

/// Recomputes `rect` with the grabbed `edge` following the pointer.
///
/// Left/top edges move the origin and change the size inversely, right/bottom
/// edges change only the size. A dimension that would shrink below the
/// minimum is clamped and the moving edge stops there; the opposite edge
/// never moves.
pub fn apply_resize_edge(
    rect: WindowRect,
    edge: ResizeEdge,
    pointer_x: i32,
    pointer_y: i32,
) -> WindowRect {
    let (x, width) = resize_axis(
        rect.x,
        rect.width,
        pointer_x,
        MIN_WINDOW_WIDTH,
        edge.moves_left(),
        edge.moves_right(),
    );
    let (y, height) = resize_axis(
        rect.y,
        rect.height,
        pointer_y,
        MIN_WINDOW_HEIGHT,
        edge.moves_top(),
        edge.moves_bottom(),
    );
    WindowRect {
        x,
        y,
        width,
        height,
    }
}

fn resize_axis(
    origin: i32,
    size: u32,
    pointer: i32,
    min: u32,
    moves_start: bool,
    moves_end: bool,
) -> (i32, u32) {
    let min = min as i64;
    let start = origin as i64;
    let end = start + size as i64;
    let pointer = pointer as i64;

    let (start, size) = if moves_start {
        let size = end - pointer;
        if size < min {
            (end - min, min)
        } else {
            (pointer, size)
        }
    } else if moves_end {
        (start, (pointer - start).max(min))
    } else {
        (start, size as i64)
    };

    (saturate_i32(start), size.clamp(0, u32::MAX as i64) as u32)
}

/// Narrows widened coordinate math back to `i32`, saturating at the ends.
pub fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `a - b` for pointer/window coordinates without overflow.
pub fn offset_between(a: i32, b: i32) -> i32 {
    saturate_i32(a as i64 - b as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_left_edge_follows_pointer() {
        let start = WindowRect::new(100, 100, 200, 150);
        let res = apply_resize_edge(start, ResizeEdge::Left, 120, 400);
        assert_eq!(res, WindowRect::new(120, 100, 180, 150));
    }

    #[test]
    fn resize_top_drag_down() {
        let start = WindowRect::new(0, 50, 200, 200);
        let res = apply_resize_edge(start, ResizeEdge::Top, 10, 55);
        assert_eq!(res, WindowRect::new(0, 55, 200, 195));
    }

    #[test]
    fn resize_top_drag_up() {
        let start = WindowRect::new(0, 50, 200, 200);
        let res = apply_resize_edge(start, ResizeEdge::Top, 10, 45);
        assert_eq!(res, WindowRect::new(0, 45, 200, 205));
    }

    #[test]
    fn resize_right_and_bottom_keep_origin() {
        let start = WindowRect::new(10, 20, 100, 100);
        let res = apply_resize_edge(start, ResizeEdge::BottomRight, 160, 220);
        assert_eq!(res, WindowRect::new(10, 20, 150, 200));
    }

    #[test]
    fn left_edge_stops_at_floor() {
        let start = WindowRect::new(100, 100, 200, 150);
        // right edge sits at 300; dragging past 250 would go under the floor
        let res = apply_resize_edge(start, ResizeEdge::Left, 290, 0);
        assert_eq!(res.width, MIN_WINDOW_WIDTH);
        assert_eq!(res.x, 250);
    }

    #[test]
    fn top_left_corner_clamps_both_axes() {
        let start = WindowRect::new(0, 0, 100, 100);
        let res = apply_resize_edge(start, ResizeEdge::TopLeft, 500, 500);
        assert_eq!(res, WindowRect::new(50, 50, 50, 50));
    }

    #[test]
    fn right_edge_dragged_past_left_clamps() {
        let start = WindowRect::new(100, 0, 100, 100);
        let res = apply_resize_edge(start, ResizeEdge::Right, -400, 0);
        assert_eq!(res, WindowRect::new(100, 0, 50, 100));
    }

    #[test]
    fn edges_touch_only_their_axis() {
        let start = WindowRect::new(-8, 10, 300, 120);
        let res = apply_resize_edge(start, ResizeEdge::Right, 400, 999);
        assert_eq!(res.y, start.y);
        assert_eq!(res.height, start.height);
        assert_eq!(res.x, -8);
        assert_eq!(res.width, 408);
    }

    #[test]
    fn coordinate_offsets_saturate() {
        assert_eq!(offset_between(30, 10), 20);
        assert_eq!(offset_between(i32::MIN, 10), i32::MIN);
        assert_eq!(offset_between(i32::MAX, -10), i32::MAX);
        assert_eq!(saturate_i32(-5), -5);
    }

    #[test]
    fn corner_classification() {
        let corners: Vec<_> = ResizeEdge::ALL
            .into_iter()
            .filter(|e| e.is_corner())
            .collect();
        assert_eq!(corners.len(), 4);
        assert!(!ResizeEdge::Left.is_corner());
    }
}
