use std::io;
use std::time::Duration;

use crate::drivers::{DeskInput, InputDriver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded input pump feeding the window manager.
///
/// The loop is the only caller of `driver.poll()`/`driver.read()`. Every
/// input is handed to the handler in arrival order, which keeps pointer
/// samples serialized the way the interaction state machine expects.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<DeskInput>> {
        if self.driver.poll(self.poll_interval)? {
            self.driver.read()
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs until the handler returns [`ControlFlow::Quit`].
    ///
    /// The handler sees `None` once per iteration before input is read (the
    /// frame tick, used for painting) and `Some(input)` for each input the
    /// driver produced. Raw events the driver drops never reach the handler.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<DeskInput>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drags) before the next frame so painting
                // never lags behind the pointer.
                loop {
                    if let Some(input) = self.driver.read()?
                        && handler(&mut self.driver, Some(input))? == ControlFlow::Quit
                    {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{ButtonMask, PointerSample};
    use crate::events::{KeyInput, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        inputs: VecDeque<Option<DeskInput>>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.inputs.is_empty())
        }

        fn read(&mut self) -> io::Result<Option<DeskInput>> {
            self.inputs
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Option<DeskInput> {
        Some(DeskInput::Key {
            input: KeyInput::new(c as u32, KeyModifiers::empty()),
            pressed: true,
        })
    }

    #[test]
    fn drains_burst_between_ticks_and_stops_on_quit() {
        let driver = Scripted {
            inputs: VecDeque::from(vec![
                key('a'),
                None,
                Some(DeskInput::Pointer(PointerSample::new(1, 2, ButtonMask::LEFT))),
                key('q'),
            ]),
        };
        let mut lp = EventLoop::new(driver, Duration::from_millis(1));
        let mut seen = Vec::new();
        let mut ticks = 0;
        lp.run(|_, input| {
            match input {
                None => ticks += 1,
                Some(DeskInput::Key { input, .. }) if input.code == 'q' as u32 => {
                    return Ok(ControlFlow::Quit);
                }
                Some(other) => seen.push(other),
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[1], DeskInput::Pointer(_)));
        // the dropped raw event is not a tick
        assert_eq!(ticks, 1);
    }
}
