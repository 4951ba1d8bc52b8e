use crate::constants::{DEFAULT_CAPACITY, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};

/// Construction-time settings for a [`crate::WindowManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmConfig {
    /// Number of window slots. `create` fails once all are in use.
    pub capacity: usize,
    pub screen_width: u32,
    pub screen_height: u32,
    /// When set, raising a window also sends `Blur` to the window that
    /// previously held focus. Off by default, so only `Focus` is observable.
    pub blur_on_refocus: bool,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            blur_on_refocus: false,
        }
    }
}

impl WmConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_blur_on_refocus(mut self, enabled: bool) -> Self {
        self.blur_on_refocus = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = WmConfig::default()
            .with_capacity(3)
            .with_screen(640, 480)
            .with_blur_on_refocus(true);
        assert_eq!(cfg.capacity, 3);
        assert_eq!((cfg.screen_width, cfg.screen_height), (640, 480));
        assert!(cfg.blur_on_refocus);
        assert!(!WmConfig::default().blur_on_refocus);
    }
}
