use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratatui::layout::Rect;

use desk_wm::constants::DEFAULT_CAPACITY;
use desk_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use desk_wm::drivers::keyboard::codes;
use desk_wm::drivers::{DeskInput, OutputDriver};
use desk_wm::event_loop::{ControlFlow, EventLoop};
use desk_wm::layout::CellScale;
use desk_wm::ui::split_screen;
use desk_wm::{
    KeyInput, KeyModifiers, WindowEvent, WindowFlags, WindowManager, WmConfig, WmError,
    tracing_sub,
};

const PALETTE: [u32; 5] = [
    0xFF20_2840,
    0xFF30_3030,
    0xFF40_2020,
    0xFF20_4020,
    0xFF40_3818,
];

#[derive(Parser, Debug)]
#[command(
    name = "desk-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive terminal preview of the stacking window manager",
    after_help = indoc::indoc! {"
        Controls:
          drag a titlebar to move, drag a border or corner to resize
          titlebar buttons: _ minimize, □ maximize, x close
          n  new window      tab  cycle focus
          r  restore all     q    quit
    "}
)]
struct Cli {
    /// Windows to open on start.
    #[arg(short = 'n', long = "windows", default_value_t = 3)]
    windows: usize,

    /// Maximum number of simultaneous windows.
    #[arg(short = 'c', long = "capacity", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Pixels per terminal column.
    #[arg(long = "cell-width", value_name = "PX", default_value_t = 8)]
    cell_width: u16,

    /// Pixels per terminal row.
    #[arg(long = "cell-height", value_name = "PX", default_value_t = 10)]
    cell_height: u16,

    /// Send Blur to the previously focused window when another is raised.
    #[arg(long = "blur-on-refocus")]
    blur_on_refocus: bool,

    /// Write debug logs to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

struct DemoConfig {
    wm: WmConfig,
    scale: CellScale,
    windows: usize,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if cli.capacity == 0 {
            return Err("capacity must be at least 1".to_string());
        }
        if cli.windows > cli.capacity {
            return Err(format!(
                "cannot open {} windows with capacity {}",
                cli.windows, cli.capacity
            ));
        }
        if !(1..=64).contains(&cli.cell_width) || !(1..=64).contains(&cli.cell_height) {
            return Err("cell size must be between 1 and 64 pixels".to_string());
        }
        Ok(Self {
            wm: WmConfig::default()
                .with_capacity(cli.capacity)
                .with_blur_on_refocus(cli.blur_on_refocus),
            scale: CellScale::new(cli.cell_width, cli.cell_height),
            windows: cli.windows,
        })
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::try_from(&cli)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    if let Some(path) = &cli.log_file {
        tracing_sub::init_with_file(path)?;
    }

    let mut output = ConsoleOutputDriver::new()?;
    let scale = config.scale;
    let (width, height) = output.desktop_pixels(scale)?;
    let mut wm = WindowManager::new(config.wm.with_screen(width, height));
    for _ in 0..config.windows {
        open_demo_window(&mut wm).map_err(io::Error::other)?;
    }

    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(scale), Duration::from_millis(16));

    let result = event_loop.run(|_, input| {
        match input {
            None => {
                wm.flush_paint();
                output.present(&wm, scale)?;
            }
            Some(DeskInput::Pointer(sample)) => wm.handle_pointer(sample),
            Some(DeskInput::Key { input, pressed }) => {
                if pressed && let Some(shortcut) = Shortcut::from_key(input) {
                    return run_shortcut(&mut wm, shortcut);
                }
                wm.handle_key(input, pressed);
            }
            Some(DeskInput::Resize { columns, rows }) => {
                let (desktop, _) = split_screen(Rect::new(0, 0, columns, rows));
                let (width, height) = scale.screen_size(desktop);
                wm.set_screen_size(width, height);
                wm.invalidate_all();
            }
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    result
}

/// Demo keys handled before focused-window routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Quit,
    NewWindow,
    CycleFocus,
    RestoreAll,
}

impl Shortcut {
    fn from_key(key: KeyInput) -> Option<Self> {
        if key.code == codes::TAB {
            return Some(Shortcut::CycleFocus);
        }
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return None;
        }
        if key.code == codes::ESC {
            return Some(Shortcut::Quit);
        }
        match char::from_u32(key.code)? {
            'q' => Some(Shortcut::Quit),
            'n' => Some(Shortcut::NewWindow),
            'r' => Some(Shortcut::RestoreAll),
            _ => None,
        }
    }
}

fn run_shortcut(wm: &mut WindowManager, shortcut: Shortcut) -> io::Result<ControlFlow> {
    match shortcut {
        Shortcut::Quit => return Ok(ControlFlow::Quit),
        Shortcut::NewWindow => {
            if let Err(err) = open_demo_window(wm) {
                tracing::warn!(%err, "could not open window");
            }
        }
        Shortcut::CycleFocus => {
            if let Some(&back) = wm.z_order().last() {
                wm.bring_to_front(back).map_err(io::Error::other)?;
            }
        }
        Shortcut::RestoreAll => {
            let handles: Vec<_> = wm.windows().map(|w| w.handle()).collect();
            for handle in handles {
                wm.restore(handle).map_err(io::Error::other)?;
            }
        }
    }
    Ok(ControlFlow::Continue)
}

fn open_demo_window(wm: &mut WindowManager) -> Result<(), WmError> {
    let n = wm.len();
    let offset = (n as i32 % 8) * 40;
    let handle = wm.create(
        format!("Window {}", n + 1),
        40 + offset,
        30 + offset,
        240,
        160,
        WindowFlags::DEFAULT,
    )?;
    wm.set_background_color(handle, PALETTE[n % PALETTE.len()])?;
    wm.set_event_handler(handle, |event: &WindowEvent| {
        tracing::debug!(window = %event.window, event = %event.kind, "window event");
    })?;
    Ok(())
}
