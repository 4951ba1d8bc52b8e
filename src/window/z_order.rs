use super::WindowHandle;

/// Front-to-back stacking order. Index 0 is the frontmost window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZOrder {
    order: Vec<WindowHandle>,
}

impl ZOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[WindowHandle] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn front(&self) -> Option<WindowHandle> {
        self.order.first().copied()
    }

    pub fn position(&self, handle: WindowHandle) -> Option<usize> {
        self.order.iter().position(|h| *h == handle)
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.position(handle).is_some()
    }

    pub fn push_front(&mut self, handle: WindowHandle) {
        debug_assert!(!self.contains(handle));
        self.order.insert(0, handle);
    }

    /// Moves `handle` to index 0, shifting everything that was in front of it
    /// back by one. Returns `false` when the handle is unknown or already
    /// frontmost.
    pub fn raise(&mut self, handle: WindowHandle) -> bool {
        match self.position(handle) {
            Some(0) | None => false,
            Some(pos) => {
                self.order[..=pos].rotate_right(1);
                true
            }
        }
    }

    /// Removes `handle`, keeping the relative order of the rest.
    pub fn remove(&mut self, handle: WindowHandle) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Front to back.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = WindowHandle> + '_ {
        self.order.iter().copied()
    }
}
