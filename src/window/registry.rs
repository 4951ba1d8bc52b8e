//! Fixed-capacity slot arena of window records.
//!
//! Slots are reused after a window is destroyed; handles are not. The handle
//! counter only moves forward for the lifetime of the registry.

use std::collections::BTreeMap;

use super::buffer::PixelBuffer;
use super::{Window, WindowFlags, WindowHandle, WindowRect};
use crate::error::WmError;

#[derive(Debug)]
pub struct WindowRegistry {
    slots: Vec<Option<Window>>,
    index: BTreeMap<WindowHandle, usize>,
    capacity: usize,
    next_id: u32,
}

impl WindowRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            index: BTreeMap::new(),
            capacity,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.index.len() >= self.capacity
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.index.contains_key(&handle)
    }

    #[cfg(test)]
    pub(crate) fn with_next_id(capacity: usize, next_id: u32) -> Self {
        Self {
            next_id,
            ..Self::new(capacity)
        }
    }

    /// Stores a new record in the first free slot and returns its handle.
    /// On failure the buffer is handed back so the caller can release it.
    pub(crate) fn insert(
        &mut self,
        title: String,
        rect: WindowRect,
        flags: WindowFlags,
        buffer: PixelBuffer,
    ) -> Result<WindowHandle, (WmError, PixelBuffer)> {
        let exhausted = WmError::CapacityExhausted {
            capacity: self.capacity,
        };
        if self.is_full() {
            return Err((exhausted, buffer));
        }
        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            return Err((exhausted, buffer));
        };
        self.next_id = next_id;
        let handle = WindowHandle::from_raw(id);
        let window = Window::new(handle, title, rect, flags, buffer);

        let slot = match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = Some(window);
                free
            }
            None => {
                self.slots.push(Some(window));
                self.slots.len() - 1
            }
        };
        self.index.insert(handle, slot);
        Ok(handle)
    }

    pub(crate) fn remove(&mut self, handle: WindowHandle) -> Option<Window> {
        let slot = self.index.remove(&handle)?;
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&Window> {
        let slot = *self.index.get(&handle)?;
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        let slot = *self.index.get(&handle)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Live windows in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    pub fn handles(&self) -> Vec<WindowHandle> {
        self.index.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WmResult;
    use crate::window::buffer::{BufferAllocator, HeapAllocator};

    fn insert(reg: &mut WindowRegistry, heap: &mut HeapAllocator) -> WmResult<WindowHandle> {
        let buffer = heap.alloc(16).expect("allocation");
        reg.insert(
            "w".to_string(),
            WindowRect::new(0, 0, 50, 50),
            WindowFlags::DEFAULT,
            buffer,
        )
        .map_err(|(err, _)| err)
    }

    #[test]
    fn handles_are_monotonic_and_never_reused() {
        let mut heap = HeapAllocator::new();
        let mut reg = WindowRegistry::new(2);
        let a = insert(&mut reg, &mut heap).unwrap();
        let b = insert(&mut reg, &mut heap).unwrap();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert!(reg.remove(a).is_some());
        let c = insert(&mut reg, &mut heap).unwrap();
        assert_eq!(c.raw(), 3);
        // slot 0 was recycled for the new record
        assert_eq!(reg.index.get(&c), Some(&0));
    }

    #[test]
    fn full_registry_rejects_insert() {
        let mut heap = HeapAllocator::new();
        let mut reg = WindowRegistry::new(1);
        insert(&mut reg, &mut heap).unwrap();
        assert_eq!(
            insert(&mut reg, &mut heap),
            Err(WmError::CapacityExhausted { capacity: 1 })
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn exhausted_ids_hand_buffer_back() {
        let mut heap = HeapAllocator::new();
        let mut reg = WindowRegistry::with_next_id(4, u32::MAX);
        let buffer = heap.alloc(16).unwrap();
        let (err, returned) = reg
            .insert(
                "w".to_string(),
                WindowRect::new(0, 0, 50, 50),
                WindowFlags::DEFAULT,
                buffer,
            )
            .unwrap_err();
        assert_eq!(err, WmError::CapacityExhausted { capacity: 4 });
        assert_eq!(returned.len(), 16);
        assert!(reg.is_empty());
    }

    #[test]
    fn unknown_handle_lookups_fail() {
        let mut reg = WindowRegistry::new(4);
        assert!(reg.get(WindowHandle::from_raw(9)).is_none());
        assert!(reg.get(WindowHandle::NONE).is_none());
        assert!(reg.remove(WindowHandle::from_raw(9)).is_none());
    }
}
