//! Error types for window manager operations.

use thiserror::Error;

use crate::window::WindowHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmError {
    /// Every registry slot is occupied.
    #[error("window registry is full (capacity {capacity})")]
    CapacityExhausted { capacity: usize },

    /// The buffer allocator refused to back a new window.
    #[error("failed to allocate {bytes} bytes for window buffer")]
    AllocationFailed { bytes: usize },

    /// No live window carries this handle.
    #[error("window not found: {0}")]
    NotFound(WindowHandle),
}

pub type WmResult<T> = Result<T, WmError>;
