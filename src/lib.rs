//! Core of a stacking window manager.
//!
//! The [`window::WindowManager`] owns a fixed-capacity set of windows, keeps
//! them in front-to-back order, routes pointer samples to the right window and
//! zone, and drives interactive drag/resize. Everything runs on the caller's
//! thread, one input sample at a time.

pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod events;
pub mod layout;
pub mod state;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use config::WmConfig;
pub use error::{WmError, WmResult};
pub use events::{EventHandler, EventKind, KeyInput, KeyModifiers, MouseInput, WindowEvent};
pub use state::Interaction;
pub use window::{
    WindowFlags, WindowHandle, WindowManager, WindowRect, WindowState, WindowZone,
};
