use std::io;
use std::path::PathBuf;

use clap::Parser;
use indoc::indoc;

use page_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use page_wm::host::TerminalHost;
use page_wm::runner::{FRAME_INTERVAL, run_terminal_host};
use page_wm::tracing_sub;
use page_wm::window::ManagerOptions;
use page_wm::window::interaction::CommitPolicy;

const AFTER_HELP: &str = indoc! {"
    Keys:
      n        open a window
      tab      focus the next window
      m / x    minimize / toggle maximize the focused window
      f / esc  toggle / leave fullscreen
      w        close the focused window
      q        quit

    Drag a title bar to move a window, drag its border to resize it, and
    double-click the title bar to maximize.
"};

#[derive(Parser, Debug)]
#[command(
    name = "page-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating window manager demo in the terminal",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Windows to open on start.
    #[arg(short = 'w', long = "windows", value_name = "N", default_value_t = 3)]
    windows: u8,

    /// Commit every pointer sample instead of once per frame.
    #[arg(long = "immediate")]
    immediate: bool,

    /// Append debug logs to this file. Logs are discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref())?;

    let options = ManagerOptions {
        commit_policy: if cli.immediate {
            CommitPolicy::Immediate
        } else {
            CommitPolicy::Batched
        },
        ..ManagerOptions::default()
    };
    let mut output = ConsoleOutputDriver::new()?;
    let size = output.size()?;
    let mut host = TerminalHost::new(size.width, size.height, options);
    for _ in 0..cli.windows {
        host.spawn_demo_window();
    }

    let mut driver = ConsoleInputDriver::new();
    run_terminal_host(&mut host, &mut output, &mut driver, FRAME_INTERVAL)
}
