use std::any::Any;
use std::sync::Arc;

use super::buffer::{BufferAllocator, HeapAllocator};
use super::decorator::{ClassicDecorator, WindowDecorator, WindowZone};
use super::registry::WindowRegistry;
use super::z_order::ZOrder;
use super::{Window, WindowFlags, WindowHandle, WindowRect, WindowState};
use crate::config::WmConfig;
use crate::constants::BYTES_PER_PIXEL;
use crate::drivers::{ButtonMask, PointerSample};
use crate::error::{WmError, WmResult};
use crate::events::{EventHandler, EventKind, KeyInput, MouseInput, WindowEvent};
use crate::layout::floating::{apply_resize_edge, offset_between};
use crate::state::Interaction;

/// Explicit window manager context.
///
/// Owns the registry, the stacking order, focus and the pointer interaction
/// state. Every mutation goes through `&mut self`, one input sample at a time;
/// hosts with several threads must serialize access themselves.
pub struct WindowManager {
    config: WmConfig,
    registry: WindowRegistry,
    z_order: ZOrder,
    focused: Option<WindowHandle>,
    interaction: Interaction,
    // buttons held in the previous pointer sample, for press/release edges
    last_buttons: ButtonMask,
    // a titlebar button consumed the press; drop samples until release
    swallow_until_release: bool,
    allocator: Box<dyn BufferAllocator>,
    decorator: Arc<dyn WindowDecorator>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WmConfig::default())
    }
}

impl WindowManager {
    pub fn new(config: WmConfig) -> Self {
        Self::with_allocator(config, HeapAllocator::new())
    }

    pub fn with_allocator(config: WmConfig, allocator: impl BufferAllocator + 'static) -> Self {
        Self {
            registry: WindowRegistry::new(config.capacity),
            config,
            z_order: ZOrder::new(),
            focused: None,
            interaction: Interaction::Idle,
            last_buttons: ButtonMask::empty(),
            swallow_until_release: false,
            allocator: Box::new(allocator),
            decorator: Arc::new(ClassicDecorator),
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.config.screen_width = width;
        self.config.screen_height = height;
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        Arc::clone(&self.decorator)
    }

    pub fn set_decorator(&mut self, decorator: Arc<dyn WindowDecorator>) {
        self.decorator = decorator;
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Creates a window at the front of the stack and focuses it.
    ///
    /// Sizes below the 50x50 floor are raised to it. The backing buffer is
    /// sized for the resulting geometry and cleared.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> WmResult<WindowHandle> {
        if self.registry.is_full() {
            tracing::warn!(capacity = self.registry.capacity(), "window registry full");
            return Err(WmError::CapacityExhausted {
                capacity: self.registry.capacity(),
            });
        }
        let rect = WindowRect::new(x, y, width, height).clamped_to_floor();
        let bytes = (rect.width as usize)
            .checked_mul(rect.height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(WmError::AllocationFailed { bytes: usize::MAX })?;
        let Some(mut buffer) = self.allocator.alloc(bytes) else {
            tracing::warn!(bytes, "window buffer allocation failed");
            return Err(WmError::AllocationFailed { bytes });
        };
        buffer.clear();

        let handle = match self.registry.insert(title.into(), rect, flags, buffer) {
            Ok(handle) => handle,
            Err((err, buffer)) => {
                self.allocator.free(buffer);
                return Err(err);
            }
        };
        self.z_order.push_front(handle);
        tracing::debug!(window = %handle, ?rect, ?flags, "created window");
        self.set_focus(handle);
        Ok(handle)
    }

    /// Fires `Close`, releases the buffer and drops the window from the stack.
    /// Focus moves to the new front-most window when the destroyed one held it.
    pub fn destroy(&mut self, handle: WindowHandle) -> WmResult<()> {
        if !self.registry.contains(handle) {
            return Err(WmError::NotFound(handle));
        }
        self.notify(handle, EventKind::Close);
        let Some(window) = self.registry.remove(handle) else {
            return Err(WmError::NotFound(handle));
        };
        let Window { buffer, .. } = window;
        self.allocator.free(buffer);
        self.z_order.remove(handle);
        tracing::debug!(window = %handle, "destroyed window");
        if self.focused == Some(handle) {
            self.focused = None;
            self.elect_focus();
        }
        Ok(())
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&Window> {
        self.registry.get(handle)
    }

    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.registry.get_mut(handle)
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Live windows in registry slot order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.registry.iter()
    }

    fn with_window<T>(
        &mut self,
        handle: WindowHandle,
        f: impl FnOnce(&mut Window) -> T,
    ) -> WmResult<T> {
        self.registry
            .get_mut(handle)
            .map(f)
            .ok_or(WmError::NotFound(handle))
    }

    pub fn move_window(&mut self, handle: WindowHandle, x: i32, y: i32) -> WmResult<()> {
        self.with_window(handle, |window| {
            window.rect.x = x;
            window.rect.y = y;
            window.dirty = true;
        })
    }

    /// Changes the size, clamped to the 50x50 floor. The backing buffer keeps
    /// its creation-time size.
    pub fn resize(&mut self, handle: WindowHandle, width: u32, height: u32) -> WmResult<()> {
        self.with_window(handle, |window| {
            window.rect = WindowRect {
                width,
                height,
                ..window.rect
            }
            .clamped_to_floor();
            window.dirty = true;
        })
    }

    pub fn set_title(&mut self, handle: WindowHandle, title: impl Into<String>) -> WmResult<()> {
        let title = title.into();
        self.with_window(handle, |window| {
            window.title = title;
            window.dirty = true;
        })
    }

    pub fn set_background_color(&mut self, handle: WindowHandle, argb: u32) -> WmResult<()> {
        self.with_window(handle, |window| {
            window.background = argb;
            window.dirty = true;
        })
    }

    /// Installs `handler`, replacing any previous one.
    pub fn set_event_handler(
        &mut self,
        handle: WindowHandle,
        handler: impl EventHandler + 'static,
    ) -> WmResult<()> {
        self.with_window(handle, |window| {
            window.handler = Some(Box::new(handler));
        })
    }

    /// Removes and returns the installed handler, if any.
    pub fn clear_event_handler(
        &mut self,
        handle: WindowHandle,
    ) -> WmResult<Option<Box<dyn EventHandler>>> {
        self.with_window(handle, |window| window.handler.take())
    }

    pub fn set_user_data<T: Any>(&mut self, handle: WindowHandle, data: T) -> WmResult<()> {
        self.with_window(handle, |window| {
            window.user_data = Some(Box::new(data));
        })
    }

    pub fn user_data<T: Any>(&self, handle: WindowHandle) -> Option<&T> {
        self.registry
            .get(handle)?
            .user_data
            .as_deref()?
            .downcast_ref::<T>()
    }

    /// Front to back.
    pub fn z_order(&self) -> &[WindowHandle] {
        self.z_order.as_slice()
    }

    pub fn focused(&self) -> Option<WindowHandle> {
        self.focused
    }

    /// Moves the window to the front of the stack and focuses it. No-op when
    /// it already is the front-most entry. A minimized window is reordered
    /// but does not take focus.
    pub fn bring_to_front(&mut self, handle: WindowHandle) -> WmResult<()> {
        if !self.registry.contains(handle) {
            return Err(WmError::NotFound(handle));
        }
        if self.z_order.as_slice().first() == Some(&handle) {
            return Ok(());
        }
        self.raise(handle);
        Ok(())
    }

    fn raise(&mut self, handle: WindowHandle) {
        let moved = self.z_order.raise(handle);
        if moved {
            tracing::debug!(window = %handle, "raised window");
        }
        let focusable = self
            .registry
            .get(handle)
            .is_some_and(|window| !window.is_minimized());
        if focusable && (moved || self.focused != Some(handle)) {
            self.set_focus(handle);
        }
    }

    fn set_focus(&mut self, handle: WindowHandle) {
        let previous = self.focused.replace(handle);
        if self.config.blur_on_refocus
            && let Some(previous) = previous
            && previous != handle
        {
            self.notify(previous, EventKind::Blur);
        }
        self.notify(handle, EventKind::Focus);
    }

    /// Focuses the front-most visible, non-minimized window, or clears focus.
    fn elect_focus(&mut self) {
        let next = self.z_order.iter().find(|handle| {
            self.registry
                .get(*handle)
                .is_some_and(Window::is_paintable)
        });
        match next {
            Some(handle) => {
                tracing::debug!(window = %handle, "focus re-elected");
                self.focused = Some(handle);
                self.notify(handle, EventKind::Focus);
            }
            None => self.focused = None,
        }
    }

    /// Front-most visible, non-minimized window containing the point.
    pub fn find_topmost_window_at(&self, x: i32, y: i32) -> Option<WindowHandle> {
        self.z_order.iter().find(|handle| {
            self.registry
                .get(*handle)
                .is_some_and(|window| window.is_paintable() && window.rect.contains(x, y))
        })
    }

    /// Zone of `handle` under the point, or `None` when the window is unknown
    /// or the point lies outside it.
    pub fn classify_zone(&self, handle: WindowHandle, x: i32, y: i32) -> Option<WindowZone> {
        let window = self.registry.get(handle)?;
        if !window.rect.contains(x, y) {
            return None;
        }
        Some(self.decorator.zone_at(window.rect, window.flags, x, y))
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<(WindowHandle, WindowZone)> {
        let handle = self.find_topmost_window_at(x, y)?;
        let zone = self.classify_zone(handle, x, y)?;
        Some((handle, zone))
    }

    pub fn minimize(&mut self, handle: WindowHandle) -> WmResult<()> {
        let changed = self.with_window(handle, |window| {
            if window.state == WindowState::Minimized {
                return false;
            }
            window.state = WindowState::Minimized;
            window.dirty = true;
            true
        })?;
        if !changed {
            return Ok(());
        }
        tracing::debug!(window = %handle, "minimized window");
        self.notify(handle, EventKind::Minimize);
        if self.focused == Some(handle) {
            self.focused = None;
            self.elect_focus();
        }
        Ok(())
    }

    /// Switches between `Maximized` and `Normal`. Maximizing remembers the
    /// current geometry and fills the screen; restoring puts it back.
    pub fn toggle_maximize(&mut self, handle: WindowHandle) -> WmResult<WindowState> {
        let screen = WindowRect::new(0, 0, self.config.screen_width, self.config.screen_height)
            .clamped_to_floor();
        let (state, kind) = self.with_window(handle, |window| {
            window.dirty = true;
            if window.state == WindowState::Maximized {
                if let Some(saved) = window.saved_rect.take() {
                    window.rect = saved;
                }
                window.state = WindowState::Normal;
                (WindowState::Normal, EventKind::Restore)
            } else {
                if window.saved_rect.is_none() {
                    window.saved_rect = Some(window.rect);
                }
                window.rect = screen;
                window.state = WindowState::Maximized;
                (WindowState::Maximized, EventKind::Maximize)
            }
        })?;
        tracing::debug!(window = %handle, ?state, "toggled maximize");
        self.notify(handle, kind);
        Ok(state)
    }

    /// Returns a minimized or maximized window to `Normal`, fires `Restore`,
    /// and raises it when it was minimized. No-op for `Normal` windows.
    pub fn restore(&mut self, handle: WindowHandle) -> WmResult<()> {
        let previous = self.with_window(handle, |window| {
            let previous = window.state;
            if previous != WindowState::Normal {
                if let Some(saved) = window.saved_rect.take() {
                    window.rect = saved;
                }
                window.state = WindowState::Normal;
                window.dirty = true;
            }
            previous
        })?;
        if previous == WindowState::Normal {
            return Ok(());
        }
        tracing::debug!(window = %handle, ?previous, "restored window");
        self.notify(handle, EventKind::Restore);
        if previous == WindowState::Minimized {
            self.raise(handle);
        }
        Ok(())
    }

    /// Delivers an event to the window's handler. `Ok(false)` means the window
    /// has no handler and the event was dropped.
    pub fn dispatch(&mut self, handle: WindowHandle, kind: EventKind) -> WmResult<bool> {
        if !self.registry.contains(handle) {
            return Err(WmError::NotFound(handle));
        }
        Ok(self.notify(handle, kind))
    }

    fn notify(&mut self, handle: WindowHandle, kind: EventKind) -> bool {
        let Some(window) = self.registry.get_mut(handle) else {
            return false;
        };
        let Some(handler) = window.handler.as_mut() else {
            tracing::trace!(window = %handle, event = %kind, "no handler, event dropped");
            return false;
        };
        tracing::trace!(window = %handle, event = %kind, "dispatching event");
        handler.handle_event(&WindowEvent::new(handle, kind));
        true
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Feeds one pointer sample through the interaction state machine.
    ///
    /// An active drag or resize consumes the sample first; otherwise the
    /// sample is hit-tested and routed to the window under the pointer.
    pub fn handle_pointer(&mut self, sample: PointerSample) {
        let was_pressed = !self.last_buttons.is_empty();
        self.last_buttons = sample.buttons;

        match self.interaction {
            Interaction::Idle => self.handle_idle_sample(sample, was_pressed),
            Interaction::Dragging {
                window,
                offset_x,
                offset_y,
            } => {
                if !self.is_live_target(window) {
                    tracing::debug!(window = %window, "drag target gone, resetting");
                    self.interaction = Interaction::Idle;
                    return;
                }
                if !sample.pressed() {
                    tracing::debug!(window = %window, "drag finished");
                    self.interaction = Interaction::Idle;
                    return;
                }
                self.drag_to(
                    window,
                    offset_between(sample.x, offset_x),
                    offset_between(sample.y, offset_y),
                );
            }
            Interaction::Resizing { window, edge } => {
                if !self.is_live_target(window) {
                    tracing::debug!(window = %window, "resize target gone, resetting");
                    self.interaction = Interaction::Idle;
                    return;
                }
                if !sample.pressed() {
                    tracing::debug!(window = %window, "resize finished");
                    self.interaction = Interaction::Idle;
                    return;
                }
                let Some(current) = self.registry.get(window).map(Window::rect) else {
                    return;
                };
                let next = apply_resize_edge(current, edge, sample.x, sample.y);
                self.set_rect_interactive(window, current, next);
            }
        }
    }

    fn is_live_target(&self, handle: WindowHandle) -> bool {
        self.registry
            .get(handle)
            .is_some_and(|window| !window.is_minimized())
    }

    fn drag_to(&mut self, handle: WindowHandle, x: i32, y: i32) {
        let Some(current) = self.registry.get(handle).map(Window::rect) else {
            return;
        };
        let next = WindowRect { x, y, ..current };
        self.set_rect_interactive(handle, current, next);
    }

    fn set_rect_interactive(&mut self, handle: WindowHandle, current: WindowRect, next: WindowRect) {
        if current == next {
            return;
        }
        if let Some(window) = self.registry.get_mut(handle) {
            window.rect = next;
            window.dirty = true;
        }
        tracing::trace!(window = %handle, rect = ?next, "interactive geometry update");
        if (current.x, current.y) != (next.x, next.y) {
            self.notify(
                handle,
                EventKind::Move {
                    x: next.x,
                    y: next.y,
                },
            );
        }
        if (current.width, current.height) != (next.width, next.height) {
            self.notify(
                handle,
                EventKind::Resize {
                    width: next.width,
                    height: next.height,
                },
            );
        }
    }

    fn handle_idle_sample(&mut self, sample: PointerSample, was_pressed: bool) {
        let pressed = sample.pressed();
        if self.swallow_until_release && was_pressed {
            if !pressed {
                self.swallow_until_release = false;
            }
            return;
        }
        self.swallow_until_release = false;
        let hit = self.hit_test(sample.x, sample.y);

        if pressed && !was_pressed {
            let Some((window, zone)) = hit else {
                return;
            };
            self.begin_gesture(window, zone, sample);
            return;
        }

        let Some((window, _)) = hit else {
            return;
        };
        let mouse = self.relative_mouse(window, sample);
        if !pressed && was_pressed {
            self.notify(window, EventKind::MouseUp(mouse));
        } else {
            self.notify(window, EventKind::MouseMove(mouse));
        }
    }

    fn begin_gesture(&mut self, window: WindowHandle, zone: WindowZone, sample: PointerSample) {
        tracing::debug!(window = %window, ?zone, x = sample.x, y = sample.y, "button down");
        match zone {
            WindowZone::TitleBar => {
                let Some(rect) = self.registry.get(window).map(Window::rect) else {
                    return;
                };
                self.raise(window);
                self.interaction = Interaction::Dragging {
                    window,
                    offset_x: offset_between(sample.x, rect.x),
                    offset_y: offset_between(sample.y, rect.y),
                };
            }
            WindowZone::Resize(edge) => {
                self.raise(window);
                self.interaction = Interaction::Resizing { window, edge };
            }
            WindowZone::CloseButton => {
                self.swallow_until_release = true;
                if let Err(err) = self.destroy(window) {
                    tracing::warn!(window = %window, %err, "close button on missing window");
                }
            }
            WindowZone::MaximizeButton => {
                self.swallow_until_release = true;
                if let Err(err) = self.toggle_maximize(window) {
                    tracing::warn!(window = %window, %err, "maximize on missing window");
                }
            }
            WindowZone::MinimizeButton => {
                self.swallow_until_release = true;
                if let Err(err) = self.minimize(window) {
                    tracing::warn!(window = %window, %err, "minimize on missing window");
                }
            }
            WindowZone::Client => {
                self.raise(window);
                let mouse = self.relative_mouse(window, sample);
                self.notify(window, EventKind::MouseDown(mouse));
            }
        }
    }

    fn relative_mouse(&self, window: WindowHandle, sample: PointerSample) -> MouseInput {
        let origin = self
            .registry
            .get(window)
            .map(|w| (w.rect.x, w.rect.y))
            .unwrap_or_default();
        MouseInput {
            x: offset_between(sample.x, origin.0),
            y: offset_between(sample.y, origin.1),
            buttons: sample.buttons,
        }
    }

    /// Sends key input to the focused window. Returns whether a handler
    /// received it.
    pub fn handle_key(&mut self, key: KeyInput, pressed: bool) -> bool {
        let Some(focused) = self.focused else {
            return false;
        };
        let kind = if pressed {
            EventKind::KeyDown(key)
        } else {
            EventKind::KeyUp(key)
        };
        self.notify(focused, kind)
    }

    /// Visible, non-minimized windows from back to front.
    pub fn paint_order(&self) -> impl Iterator<Item = &Window> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|handle| self.registry.get(handle))
            .filter(|window| window.is_paintable())
    }

    /// Fires `Paint` at every paintable dirty window, back to front, and
    /// clears their dirty flags. Returns how many windows were painted.
    pub fn flush_paint(&mut self) -> usize {
        let dirty: Vec<WindowHandle> = self
            .paint_order()
            .filter(|window| window.dirty)
            .map(Window::handle)
            .collect();
        for handle in &dirty {
            if let Some(window) = self.registry.get_mut(*handle) {
                window.dirty = false;
            }
            self.notify(*handle, EventKind::Paint);
        }
        dirty.len()
    }

    /// Marks every window dirty, e.g. after the screen was resized.
    pub fn invalidate_all(&mut self) {
        for window in self.registry.iter_mut() {
            window.dirty = true;
        }
    }
}
