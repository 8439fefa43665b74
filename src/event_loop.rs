use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The host's message pump.
///
/// Owns the input driver and hands every event to a handler closure. The
/// handler is also called with `None` once per poll interval whether or not
/// input arrived; that idle call is where the host commits batched geometry
/// and redraws, so pointer bursts are folded into one commit per frame.
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

    /// Run until the handler returns [`ControlFlow::Quit`].
    ///
    /// The handler receives `None` at the top of every iteration and
    /// `Some(event)` for each queued input event. Queued events are drained
    /// for at most one poll interval before the next idle call, so a flood of
    /// motion events cannot hold back the frame commit.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        while handler(&mut self.driver, None)? == ControlFlow::Continue {
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            let deadline = Instant::now() + self.poll_interval;
            loop {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if Instant::now() >= deadline || !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("no event"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn drains_burst_between_idle_calls() {
        let driver = Scripted(VecDeque::from(vec![key('a'), key('b'), key('q')]));
        let mut event_loop = EventLoop::new(driver, Duration::from_secs(5));
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                seen.push(event.clone());
                Ok(match event {
                    Some(Event::Key(k)) if k.code == KeyCode::Char('q') => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(seen, vec![None, Some(key('a')), Some(key('b')), Some(key('q'))]);
    }

    #[test]
    fn expired_frame_budget_interleaves_idle_calls() {
        let driver = Scripted(VecDeque::from(vec![key('a'), key('b'), key('q')]));
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                seen.push(event.clone());
                Ok(match event {
                    Some(Event::Key(k)) if k.code == KeyCode::Char('q') => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![None, Some(key('a')), None, Some(key('b')), None, Some(key('q'))]
        );
    }

    #[test]
    fn idle_calls_repeat_without_input() {
        let mut event_loop = EventLoop::new(Scripted(VecDeque::new()), Duration::from_millis(1));
        let mut idle = 0;
        event_loop
            .run(|_, event| {
                assert!(event.is_none());
                idle += 1;
                Ok(if idle == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(idle, 3);
    }
}
