use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use desk_wm::drivers::{ButtonMask, PointerSample};
use desk_wm::layout::CellScale;
use desk_wm::ui::DesktopView;
use desk_wm::{WindowFlags, WindowHandle, WindowManager, WmConfig};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

#[derive(Parser, Debug)]
#[command(
    name = "wm-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives scripted drag/resize gestures through the window manager and measures throughput"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 10.0
    )]
    duration_seconds: f64,

    /// Target frames per second when drawing to the terminal.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 60.0)]
    target_fps: f64,

    /// Windows stacked on the desktop.
    #[arg(short = 'w', long = "windows", default_value_t = 16)]
    windows: usize,

    /// Pointer samples fed to the manager per frame.
    #[arg(short = 's', long = "samples", default_value_t = 64)]
    samples_per_frame: u32,

    /// Render into an offscreen buffer instead of the terminal.
    #[arg(long = "headless")]
    headless: bool,
}

struct BenchConfig {
    duration: Duration,
    target_fps: f64,
    frame_budget: Duration,
    windows: usize,
    samples_per_frame: u32,
    headless: bool,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if !(1.0..=240.0).contains(&cli.target_fps) {
            return Err("fps must be between 1 and 240".to_string());
        }
        if !(1..=256).contains(&cli.windows) {
            return Err("windows must be between 1 and 256".to_string());
        }
        if cli.samples_per_frame == 0 {
            return Err("samples must be at least 1".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            target_fps: cli.target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / cli.target_fps),
            windows: cli.windows,
            samples_per_frame: cli.samples_per_frame,
            headless: cli.headless,
        })
    }
}

const SCALE: CellScale = CellScale {
    cell_width: 8,
    cell_height: 10,
};

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = if config.headless {
        run_headless(&config)?
    } else {
        run_in_terminal(&config)?
    };
    println!("{}", stats.final_report(&config));
    Ok(())
}

type BenchTerminal = Terminal<CrosstermBackend<Stdout>>;

fn run_in_terminal(config: &BenchConfig) -> io::Result<BenchStats> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let bench_result = run_benchmark(&mut terminal, config);

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;
    bench_result
}

fn build_desktop(config: &BenchConfig, area: Rect) -> io::Result<(WindowManager, Script)> {
    let (width, height) = SCALE.screen_size(area);
    let mut wm = WindowManager::new(
        WmConfig::default()
            .with_capacity(config.windows)
            .with_screen(width, height),
    );
    for i in 0..config.windows {
        let step = (i as i32 % 12) * 24;
        wm.create(
            format!("bench {i}"),
            step,
            step,
            200,
            140,
            WindowFlags::DEFAULT,
        )
        .map_err(io::Error::other)?;
    }
    Ok((wm, Script::new(width.max(1), height.max(1))))
}

fn run_benchmark(terminal: &mut BenchTerminal, config: &BenchConfig) -> io::Result<BenchStats> {
    let size = terminal.size()?;
    let (mut wm, mut script) = build_desktop(config, Rect::new(0, 0, size.width, size.height))?;
    let mut stats = BenchStats::new();
    let mut exit_reason = ExitReason::Completed;

    loop {
        let frame_start = Instant::now();
        stats.samples += script.feed(&mut wm, config.samples_per_frame);
        stats.paint_events += wm.flush_paint() as u64;
        terminal.draw(|frame| draw_frame(frame, &wm, &stats, config))?;
        stats.record_frame(frame_start.elapsed());

        if stats.elapsed() >= config.duration {
            break;
        }
        if poll_for_exit(config.frame_budget.saturating_sub(frame_start.elapsed()))? {
            exit_reason = ExitReason::UserAbort;
            break;
        }
    }

    stats.exit_reason = exit_reason;
    stats.mark_completed();
    Ok(stats)
}

fn run_headless(config: &BenchConfig) -> io::Result<BenchStats> {
    let area = Rect::new(0, 0, 160, 50);
    let (mut wm, mut script) = build_desktop(config, area)?;
    let mut buffer = Buffer::empty(area);
    let mut stats = BenchStats::new();

    while stats.elapsed() < config.duration {
        let frame_start = Instant::now();
        stats.samples += script.feed(&mut wm, config.samples_per_frame);
        stats.paint_events += wm.flush_paint() as u64;
        DesktopView::new(&wm, SCALE).render(area, &mut buffer);
        stats.record_frame(frame_start.elapsed());
    }

    stats.mark_completed();
    Ok(stats)
}

fn draw_frame(frame: &mut Frame, wm: &WindowManager, stats: &BenchStats, config: &BenchConfig) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    frame.render_widget(DesktopView::new(wm, SCALE), area);

    let lines = build_overlay_lines(stats, config);
    let width = lines
        .iter()
        .map(|line| line.len() as u16)
        .max()
        .unwrap_or(0)
        .saturating_add(2)
        .min(area.width);
    let height = (lines.len() as u16).saturating_add(2).min(area.height);
    let overlay = Rect {
        x: area.x,
        y: area.y + area.height - height,
        width,
        height,
    };
    frame.render_widget(
        Paragraph::new(lines.join("\n")).style(Style::default().fg(Color::White).bg(Color::Black)),
        overlay,
    );
}

fn build_overlay_lines(stats: &BenchStats, config: &BenchConfig) -> Vec<String> {
    let elapsed = stats.elapsed().as_secs_f64();
    let samples_per_sec = if elapsed > 0.0 {
        stats.samples as f64 / elapsed
    } else {
        0.0
    };
    vec![
        "== WM Bench ==".to_string(),
        format!(
            "elapsed {:>5.1}/{:>5.1}s | frames {:>7}",
            elapsed,
            config.duration.as_secs_f64(),
            stats.frame_count
        ),
        format!(
            "samples {:>10} | {:>9.0}/s",
            stats.samples, samples_per_sec
        ),
        format!(
            "frame ms avg {:>6.2} | worst {:>5.2}",
            stats.average_frame_ms(),
            stats.slowest_frame_ms()
        ),
        "press q / esc / ctrl+c to stop".to_string(),
    ]
}

/// Scripted pointer gestures: press on the backmost window's titlebar and
/// drag along a loop, then press its bottom-right corner and resize. Whatever
/// window is on top at the press point receives the gesture.
struct Script {
    screen_width: u32,
    screen_height: u32,
    step: u32,
    phase: Phase,
}

#[derive(Clone, Copy)]
enum Phase {
    Drag(WindowHandle),
    Resize(WindowHandle),
    Pick,
}

const GESTURE_STEPS: u32 = 120;

impl Script {
    fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            step: 0,
            phase: Phase::Pick,
        }
    }

    /// Feeds `count` samples and returns how many were delivered.
    fn feed(&mut self, wm: &mut WindowManager, count: u32) -> u64 {
        for _ in 0..count {
            let sample = self.next_sample(wm);
            wm.handle_pointer(sample);
        }
        count as u64
    }

    fn next_sample(&mut self, wm: &WindowManager) -> PointerSample {
        match self.phase {
            Phase::Pick => {
                let Some(&target) = wm.z_order().last() else {
                    return PointerSample::default();
                };
                let Some(rect) = wm.get(target).map(|w| w.rect()) else {
                    return PointerSample::default();
                };
                self.phase = Phase::Drag(target);
                self.step = 0;
                // left third of the titlebar, clear of the buttons
                PointerSample::new(rect.x + 10, rect.y + 8, ButtonMask::LEFT)
            }
            Phase::Drag(target) => {
                self.step += 1;
                if self.step >= GESTURE_STEPS {
                    let Some(rect) = wm.get(target).map(|w| w.rect()) else {
                        self.phase = Phase::Pick;
                        return PointerSample::default();
                    };
                    self.phase = Phase::Resize(target);
                    self.step = 0;
                    let corner_x = rect.x + rect.width as i32 - 1;
                    let corner_y = rect.y + rect.height as i32 - 1;
                    return PointerSample::new(corner_x, corner_y, ButtonMask::empty());
                }
                let (x, y) = self.orbit();
                PointerSample::new(x, y, ButtonMask::LEFT)
            }
            Phase::Resize(target) => {
                self.step += 1;
                if self.step >= GESTURE_STEPS {
                    self.phase = Phase::Pick;
                    return PointerSample::default();
                }
                let Some(rect) = wm.get(target).map(|w| w.rect()) else {
                    self.phase = Phase::Pick;
                    return PointerSample::default();
                };
                if self.step == 1 {
                    let corner_x = rect.x + rect.width as i32 - 1;
                    let corner_y = rect.y + rect.height as i32 - 1;
                    return PointerSample::new(corner_x, corner_y, ButtonMask::LEFT);
                }
                let grow = (self.step % 40) as i32 * 4;
                PointerSample::new(
                    rect.x + 120 + grow,
                    rect.y + 100 + grow,
                    ButtonMask::LEFT,
                )
            }
        }
    }

    fn orbit(&self) -> (i32, i32) {
        let t = self.step as f64 / GESTURE_STEPS as f64 * std::f64::consts::TAU;
        let cx = self.screen_width as f64 / 2.0;
        let cy = self.screen_height as f64 / 2.0;
        let r = cx.min(cy) / 2.0;
        ((cx + r * t.cos()) as i32, (cy + r * t.sin()) as i32)
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    samples: u64,
    paint_events: u64,
    total_frame_time: Duration,
    slowest_frame: Duration,
    exit_reason: ExitReason,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            samples: 0,
            paint_events: 0,
            total_frame_time: Duration::ZERO,
            slowest_frame: Duration::ZERO,
            exit_reason: ExitReason::Completed,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, frame_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.total_frame_time += frame_time;
        if frame_time > self.slowest_frame {
            self.slowest_frame = frame_time;
        }
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_frame_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn slowest_frame_ms(&self) -> f64 {
        self.slowest_frame.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let per_sec = |n: u64| if elapsed > 0.0 { n as f64 / elapsed } else { 0.0 };

        indoc::formatdoc!(
            r#"
            WM bench {status} ({mode}).
            Duration: {elapsed:.2}s (target {target:.2}s)
            Windows: {windows} | Frames: {frames} (~{fps:.1}/s, target {target_fps:.1})
            Pointer samples: {samples} (~{samples_per_sec:.0}/s)
            Paint events: {paints} (~{paints_per_sec:.0}/s)
            Avg frame: {avg:.2} ms | Worst: {worst:.2} ms
            "#,
            status = self.exit_reason.describe(),
            mode = if config.headless { "headless" } else { "terminal" },
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            windows = config.windows,
            frames = self.frame_count,
            fps = per_sec(self.frame_count),
            target_fps = config.target_fps,
            samples = self.samples,
            samples_per_sec = per_sec(self.samples),
            paints = self.paint_events,
            paints_per_sec = per_sec(self.paint_events),
            avg = self.average_frame_ms(),
            worst = self.slowest_frame_ms(),
        )
    }
}

#[derive(Copy, Clone)]
enum ExitReason {
    Completed,
    UserAbort,
}

impl ExitReason {
    fn describe(self) -> &'static str {
        match self {
            ExitReason::Completed => "completed full duration",
            ExitReason::UserAbort => "stopped by user",
        }
    }
}

fn poll_for_exit(wait: Duration) -> io::Result<bool> {
    if !event::poll(wait)? {
        return Ok(false);
    }
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if matches!(
                key.code,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
            ) {
                return Ok(true);
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(false)
}
