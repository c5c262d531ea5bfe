//! Horde Survivor headless runner
//!
//! Drives the game loop against a recording canvas and prints the HUD.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use horde_survivor::hud::{Hud, HudSink};
use horde_survivor::{
    Clock, GameLoop, ManualClock, RunSummary, Settings, SystemClock, WorldVariant,
};

/// Top-down survival shooter, run headless
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// RNG seed (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Play in the bounded arena instead of the infinite world
    #[arg(long)]
    arena: bool,

    /// World variant by name (arena/bounded, infinite/endless)
    #[arg(long)]
    variant: Option<String>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pace frames to the target refresh rate on the wall clock
    #[arg(long)]
    realtime: bool,

    /// Let the AI steer the player
    #[arg(long)]
    autopilot: bool,

    /// Print the HUD every N frames
    #[arg(long, default_value_t = 60)]
    hud_every: u64,
}

/// Prints the HUD line every `every` frames
struct PrintHud {
    every: u64,
    seen: u64,
}

impl HudSink for PrintHud {
    fn publish(&mut self, hud: &Hud) {
        self.seen += 1;
        if self.every > 0 && self.seen % self.every == 0 {
            println!("[{:>6}] {}", self.seen, hud);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    if let Some(name) = &args.variant {
        match WorldVariant::from_str(name) {
            Some(variant) => settings.variant = variant,
            None => log::warn!(
                "Unknown world variant '{}', keeping {}",
                name,
                settings.variant.as_str()
            ),
        }
    }
    if args.arena {
        settings.variant = WorldVariant::Arena;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    log::info!(
        "Horde Survivor starting: variant={} frames={} realtime={}",
        settings.variant.as_str(),
        args.frames,
        args.realtime
    );

    let mut hud = PrintHud {
        every: args.hud_every,
        seen: 0,
    };
    let interval_ms = settings.frame_interval_ms();

    let (finished, last) = if args.realtime {
        let frame_time = Duration::from_secs_f64(interval_ms / 1000.0);
        let mut game = GameLoop::new(settings, SystemClock::new());
        game.set_autopilot(args.autopilot);
        let mut frame_start = Instant::now();
        let finished = game.run(args.frames, &mut hud, |_| {
            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                spin_sleep::sleep(frame_time - elapsed);
            }
            frame_start = Instant::now();
        });
        (finished, summarize(&game))
    } else {
        let mut game = GameLoop::new(settings, ManualClock::new(0.0));
        game.set_autopilot(args.autopilot);
        let finished = game.run(args.frames, &mut hud, |g| g.clock().advance(interval_ms));
        (finished, summarize(&game))
    };

    for summary in finished.iter().chain(std::iter::once(&last)) {
        match serde_json::to_string(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Failed to serialize run summary: {}", e),
        }
    }
    log::info!("Finished {} run(s)", finished.len());
}

/// Summary of the run still in progress
fn summarize<C: Clock>(game: &GameLoop<C>) -> RunSummary {
    RunSummary::from_state(game.state(), game.clock().now_ms())
}
