use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use page_wm::window::config::{Length, WindowConfig};
use page_wm::window::interaction::{CommitPolicy, Handle, PointerSample, ResizeEdge};
use page_wm::window::{ManagerOptions, WindowManager, callbacks::Callbacks};

const VIEWPORT: (i32, i32) = (1920, 1080);

#[derive(Parser, Debug)]
#[command(
    name = "page-wm-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Feeds a synthetic pointer stream through the window manager and counts geometry commits"
)]
struct BenchCli {
    /// Pointer samples per gesture.
    #[arg(short = 's', long = "samples", value_name = "N", default_value_t = 10_000)]
    samples: u32,

    /// Pointer sample rate of the simulated device.
    #[arg(short = 'r', long = "rate", value_name = "HZ", default_value_t = 1000.0)]
    rate_hz: f64,

    /// Simulated frame interval. Batched commits land once per frame.
    #[arg(short = 'f', long = "frame-ms", value_name = "MS", default_value_t = 16.0)]
    frame_ms: f64,
}

struct BenchConfig {
    samples: u32,
    sample_interval: Duration,
    frame_interval: Duration,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=10_000_000).contains(&cli.samples) {
            return Err("samples must be between 1 and 10000000".to_string());
        }
        if !(1.0..=100_000.0).contains(&cli.rate_hz) {
            return Err("rate must be between 1 and 100000 Hz".to_string());
        }
        if !(1.0..=1000.0).contains(&cli.frame_ms) {
            return Err("frame interval must be between 1 and 1000 ms".to_string());
        }
        Ok(Self {
            samples: cli.samples,
            sample_interval: Duration::from_secs_f64(1.0 / cli.rate_hz),
            frame_interval: Duration::from_secs_f64(cli.frame_ms / 1000.0),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    for handle in [Handle::Drag, Handle::Resize(ResizeEdge::BottomRight)] {
        let immediate = run_gesture(&config, CommitPolicy::Immediate, handle)?;
        let batched = run_gesture(&config, CommitPolicy::Batched, handle)?;
        println!("{}", report(&config, handle, &immediate, &batched));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct GestureStats {
    moves: u64,
    resizes: u64,
    frames: u64,
    final_rect: (i32, i32, i32, i32),
    wall: Duration,
}

impl GestureStats {
    fn commits(&self) -> u64 {
        self.moves + self.resizes
    }
}

/// Deterministic wobble so the pointer path is not a straight line.
struct Jitter {
    state: u64,
}

impl Jitter {
    fn next(&mut self) -> i32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.state >> 33) % 5) as i32 - 2
    }
}

fn run_gesture(
    config: &BenchConfig,
    policy: CommitPolicy,
    handle: Handle,
) -> io::Result<GestureStats> {
    let moves = Rc::new(Cell::new(0u64));
    let resizes = Rc::new(Cell::new(0u64));
    let options = ManagerOptions {
        commit_policy: policy,
        ..ManagerOptions::default()
    };
    let mut wm = WindowManager::with_options(VIEWPORT.0, VIEWPORT.1, options);
    let mut window = WindowConfig::titled("bench");
    window.width = Some(Length::Px(400.0));
    window.height = Some(Length::Px(300.0));
    window.x = Some(Length::Px(200.0));
    window.y = Some(Length::Px(200.0));
    window.callbacks = Callbacks::default()
        .on_move({
            let moves = Rc::clone(&moves);
            move |_, _, _| moves.set(moves.get() + 1)
        })
        .on_resize({
            let resizes = Rc::clone(&resizes);
            move |_, _, _| resizes.set(resizes.get() + 1)
        });
    let id = wm.create(window);
    moves.set(0);
    resizes.set(0);

    let started = Instant::now();
    let origin = PointerSample::new(300, 210);
    wm.pointer_down_at(id, handle, origin, started)
        .map_err(io::Error::other)?;

    let mut jitter = Jitter {
        state: 0x5EED_0F_BE7C,
    };
    let mut frames = 0u64;
    let mut clock = Duration::ZERO;
    let mut next_frame = config.frame_interval;
    let mut point = origin;
    for step in 0..config.samples {
        // Sweep out and back so the window stays on screen.
        let phase = i32::try_from(step % 1000).unwrap_or(0);
        let offset = if phase < 500 { phase } else { 1000 - phase };
        point = PointerSample::new(
            origin.x + offset + jitter.next(),
            origin.y + offset / 2 + jitter.next(),
        );
        wm.pointer_move(point);
        clock += config.sample_interval;
        while clock >= next_frame {
            wm.frame_tick();
            frames += 1;
            next_frame += config.frame_interval;
        }
    }
    wm.pointer_move(point);
    wm.frame_tick();
    wm.pointer_up();
    let wall = started.elapsed();

    let rect = wm.window(id).map(|w| w.rect()).unwrap_or_default();
    Ok(GestureStats {
        moves: moves.get(),
        resizes: resizes.get(),
        frames,
        final_rect: (rect.x, rect.y, rect.width, rect.height),
        wall,
    })
}

fn report(
    config: &BenchConfig,
    handle: Handle,
    immediate: &GestureStats,
    batched: &GestureStats,
) -> String {
    let ratio = if batched.commits() > 0 {
        immediate.commits() as f64 / batched.commits() as f64
    } else {
        0.0
    };
    let gesture = match handle {
        Handle::Drag => "drag".to_string(),
        Handle::Resize(edge) => format!("resize ({})", edge.dir()),
    };
    indoc::formatdoc!(
        r#"
        Gesture: {gesture}, {samples} samples, {frames} frames
        Immediate: {im_moves} moves + {im_resizes} resizes in {im_wall:.2} ms
        Batched:   {ba_moves} moves + {ba_resizes} resizes in {ba_wall:.2} ms
        Commit reduction: {ratio:.1}x | same final geometry: {same}
        "#,
        samples = config.samples,
        frames = batched.frames,
        im_moves = immediate.moves,
        im_resizes = immediate.resizes,
        im_wall = immediate.wall.as_secs_f64() * 1_000.0,
        ba_moves = batched.moves,
        ba_resizes = batched.resizes,
        ba_wall = batched.wall.as_secs_f64() * 1_000.0,
        same = immediate.final_rect == batched.final_rect,
    )
}
