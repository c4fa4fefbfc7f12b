//! Crossway binary: load a simulation directory and run it in the
//! terminal (or headless).

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crossway::{Controller, Event, InputListener, SimOptions, TerminalGuard};

#[derive(Parser, Debug)]
#[command(name = "crossway", version, about = "Threaded city-traffic simulation")]
struct Args {
    /// Directory containing map.json, cameras.json, and voyagers.json.
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Run without a terminal UI (frames are discarded, logs only).
    #[arg(long)]
    headless: bool,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 10)]
    tick_rate: u32,

    /// Schedule Close automatically after this many seconds.
    #[arg(long)]
    run_for: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never corrupt the rendered frame.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let tick_rate = args.tick_rate.max(1);
    let tick_interval = Duration::from_secs(1) / tick_rate;
    let options = SimOptions {
        tick_interval,
        step_seconds: tick_interval.as_secs_f32(),
        headless: args.headless,
    };

    let mut controller = Controller::new(&args.dir, options)
        .with_context(|| format!("loading simulation configuration from {}", args.dir.display()))?;
    let scheduler = controller.scheduler();

    let guard = if args.headless {
        None
    } else {
        Some(TerminalGuard::enter().context("taking over the terminal")?)
    };
    let input = if args.headless {
        None
    } else {
        Some(
            InputListener::spawn(scheduler.clone(), Duration::from_millis(50))
                .context("spawning input listener")?,
        )
    };

    if let Some(secs) = args.run_for {
        let closer = scheduler.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            let _ = closer.schedule(Event::Close);
        });
    }

    scheduler
        .schedule(Event::Start)
        .context("scheduling initial start")?;
    let result = controller.run();

    if let Some(input) = input {
        input.join();
    }
    drop(guard);
    result.context("control loop failed")
}
