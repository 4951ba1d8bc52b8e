//! Window backing storage and the allocator that hands it out.

use std::fmt;

/// Zero-initialized pixel storage owned by a single window.
pub struct PixelBuffer {
    bytes: Vec<u8>,
}

impl PixelBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Source of window buffers.
///
/// `alloc` returning `None` makes window creation fail outright; the caller
/// never retries.
pub trait BufferAllocator {
    fn alloc(&mut self, bytes: usize) -> Option<PixelBuffer>;

    fn free(&mut self, buffer: PixelBuffer) {
        drop(buffer);
    }
}

/// Heap-backed allocator with an optional ceiling on outstanding bytes.
#[derive(Debug, Default)]
pub struct HeapAllocator {
    budget: Option<usize>,
    outstanding: usize,
}

impl HeapAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: Some(budget),
            outstanding: 0,
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl BufferAllocator for HeapAllocator {
    fn alloc(&mut self, bytes: usize) -> Option<PixelBuffer> {
        let next = self.outstanding.checked_add(bytes)?;
        if self.budget.is_some_and(|budget| next > budget) {
            return None;
        }
        let mut storage = Vec::new();
        storage.try_reserve_exact(bytes).ok()?;
        storage.resize(bytes, 0);
        self.outstanding = next;
        Some(PixelBuffer { bytes: storage })
    }

    fn free(&mut self, buffer: PixelBuffer) {
        self.outstanding = self.outstanding.saturating_sub(buffer.len());
    }
}
