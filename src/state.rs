use crate::layout::floating::ResizeEdge;
use crate::window::WindowHandle;

/// Pointer interaction in progress. At most one drag or one resize exists at
/// any time, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        window: WindowHandle,
        offset_x: i32,
        offset_y: i32,
    },
    Resizing {
        window: WindowHandle,
        edge: ResizeEdge,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Window the current gesture operates on.
    pub fn target(&self) -> Option<WindowHandle> {
        match *self {
            Interaction::Idle => None,
            Interaction::Dragging { window, .. } | Interaction::Resizing { window, .. } => {
                Some(window)
            }
        }
    }

    pub fn drag_target(&self) -> Option<WindowHandle> {
        match *self {
            Interaction::Dragging { window, .. } => Some(window),
            _ => None,
        }
    }

    pub fn resize_target(&self) -> Option<WindowHandle> {
        match *self {
            Interaction::Resizing { window, .. } => Some(window),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_exclusive() {
        let w = WindowHandle::from_raw(5);
        let drag = Interaction::Dragging {
            window: w,
            offset_x: 3,
            offset_y: 4,
        };
        assert_eq!(drag.drag_target(), Some(w));
        assert_eq!(drag.resize_target(), None);

        let resize = Interaction::Resizing {
            window: w,
            edge: ResizeEdge::Left,
        };
        assert_eq!(resize.resize_target(), Some(w));
        assert_eq!(resize.drag_target(), None);
        assert_eq!(resize.target(), Some(w));

        assert!(Interaction::default().is_idle());
        assert_eq!(Interaction::Idle.target(), None);
    }
}
