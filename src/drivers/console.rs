use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;
use ratatui::{Frame, Terminal};

use super::keyboard::translate_key;
use super::{DeskInput, InputDriver, MouseTranslator, OutputDriver};
use crate::layout::CellScale;

/// Terminal input as pixel pointer samples and key input.
///
/// Mouse reports go through a [`MouseTranslator`], so held buttons carry
/// across per-button terminal reports and cells map to pixels by the
/// driver's scale.
pub struct ConsoleInputDriver {
    event_queue: VecDeque<Event>,
    translator: MouseTranslator,
}

impl ConsoleInputDriver {
    pub fn new(scale: CellScale) -> Self {
        Self {
            event_queue: VecDeque::new(),
            translator: MouseTranslator::new(scale),
        }
    }

    pub fn scale(&self) -> CellScale {
        self.translator.scale()
    }

    /// Queues a terminal event ahead of the terminal, e.g. to replay a
    /// scripted gesture.
    pub fn inject(&mut self, event: Event) {
        self.event_queue.push_back(event);
    }

    fn translate(&mut self, event: Event) -> Option<DeskInput> {
        match event {
            Event::Mouse(mouse) => Some(DeskInput::Pointer(self.translator.translate(&mouse))),
            Event::Key(key) => {
                let (input, pressed) = translate_key(&key)?;
                Some(DeskInput::Key { input, pressed })
            }
            Event::Resize(columns, rows) => Some(DeskInput::Resize { columns, rows }),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {
                tracing::trace!(?event, "ignored terminal event");
                None
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Option<DeskInput>> {
        let event = match self.event_queue.pop_front() {
            Some(event) => event,
            None => crossterm::event::read()?,
        };
        Ok(self.translate(event))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Self {
            terminal: Terminal::new(backend)?,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    type Backend = CrosstermBackend<Stdout>;

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal
            .draw(f)
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ButtonMask;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn read(d: &mut ConsoleInputDriver) -> Option<DeskInput> {
        assert!(d.poll(Duration::from_millis(0)).unwrap());
        d.read().unwrap()
    }

    #[test]
    fn mouse_reports_become_pixel_samples_with_held_buttons() {
        let mut d = ConsoleInputDriver::new(CellScale::new(8, 10));
        d.inject(mouse(MouseEventKind::Down(MouseButton::Left), 2, 3));
        d.inject(mouse(MouseEventKind::Moved, 4, 3));
        d.inject(mouse(MouseEventKind::Up(MouseButton::Left), 4, 3));

        let Some(DeskInput::Pointer(press)) = read(&mut d) else {
            panic!("expected pointer sample");
        };
        assert_eq!((press.x, press.y, press.buttons), (20, 35, ButtonMask::LEFT));
        // a plain move report still carries the held button
        let Some(DeskInput::Pointer(moved)) = read(&mut d) else {
            panic!("expected pointer sample");
        };
        assert_eq!((moved.x, moved.buttons), (36, ButtonMask::LEFT));
        let Some(DeskInput::Pointer(release)) = read(&mut d) else {
            panic!("expected pointer sample");
        };
        assert!(!release.pressed());
    }

    #[test]
    fn keys_and_resizes_are_translated_in_order() {
        let mut d = ConsoleInputDriver::new(CellScale::default());
        d.inject(Event::FocusGained);
        d.inject(Event::Key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::ALT)));
        d.inject(Event::Resize(100, 40));

        assert_eq!(read(&mut d), None);
        match read(&mut d) {
            Some(DeskInput::Key { input, pressed }) => {
                assert_eq!(input.code, 'z' as u32);
                assert_eq!(input.modifiers, crate::events::KeyModifiers::ALT);
                assert!(pressed);
            }
            other => panic!("expected key, got {other:?}"),
        }
        assert_eq!(
            read(&mut d),
            Some(DeskInput::Resize {
                columns: 100,
                rows: 40
            })
        );
    }
}
