use std::io;
use std::time::{Duration, Instant};

use crate::drivers::InputDriver;
use crate::drivers::console::ConsoleOutputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::host::TerminalHost;

/// Poll interval of the host loop. One batched geometry commit lands per
/// interval at most.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drive `host` until a quit key, drawing after every idle pass.
///
/// The output driver is entered on start and left on return, including when
/// the loop fails.
pub fn run_terminal_host<D: InputDriver>(
    host: &mut TerminalHost,
    output: &mut ConsoleOutputDriver,
    driver: &mut D,
    poll_interval: Duration,
) -> io::Result<()> {
    output.enter()?;
    let size = output.size()?;
    host.resize(size.width, size.height);

    let mut event_loop = EventLoop::new(driver, poll_interval);
    let result = event_loop.run(|_, event| match event {
        Some(event) => host
            .handle_event(&event, Instant::now())
            .map_err(io::Error::other),
        None => {
            host.tick();
            output.draw(|frame| host.draw(frame))?;
            Ok(ControlFlow::Continue)
        }
    });

    let exit = output.exit();
    result.and(exit)
}
