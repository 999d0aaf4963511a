//! Break Block Build entry point
//!
//! Runs a headless autopilot session and prints the end-of-run report.
//!
//! Usage: `break-block-build [settings.json] [highscores.json]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
use break_block_build::renderer::Headless;
#[cfg(not(target_arch = "wasm32"))]
use break_block_build::sim::autopilot;
#[cfg(not(target_arch = "wasm32"))]
use break_block_build::{FrameOutcome, Game, HighScores, Settings};

/// Display refresh the headless session pretends to run at
#[cfg(not(target_arch = "wasm32"))]
const FRAME_SECONDS: f64 = 1.0 / 60.0;
/// Give up on sessions that never end (autopilot stalemate)
#[cfg(not(target_arch = "wasm32"))]
const MAX_SESSION_SECONDS: f64 = 600.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Break Block Build (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = match args.get(1) {
        Some(path) => Settings::load(Path::new(path)),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(clock_seed);

    let mut game = Game::new(settings, seed);
    let mut renderer = Headless::new();
    let mut now = 0.0;

    let report = loop {
        let input = autopilot(game.state());
        match game.frame(now, &input, &mut renderer) {
            FrameOutcome::Ended(report) => break Some(report),
            FrameOutcome::Stopped => break game.report().cloned(),
            FrameOutcome::Running | FrameOutcome::Paused => {}
        }
        now += FRAME_SECONDS;
        if now > MAX_SESSION_SECONDS {
            log::warn!("Session hit the {MAX_SESSION_SECONDS}s limit without a result");
            break None;
        }
    };

    log::info!("Rendered {} frames", renderer.counts.frames);
    let Some(report) = report else {
        if let Some(hud) = &renderer.last_hud {
            println!("{}", serde_json::to_string_pretty(hud).unwrap_or_default());
        }
        return;
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode report: {e}"),
    }

    if let Some(path) = args.get(2) {
        let path = Path::new(path);
        let mut scores = HighScores::load(path);
        if let Some(best) = scores.top_score() {
            log::info!("Best so far: {best}");
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = scores.record(&report, timestamp) {
            println!("New high score! Rank #{rank}");
        }
        if let Err(e) = scores.save(path) {
            log::error!("Failed to save high scores to {}: {e}", path.display());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A web front end drives `Game::frame` itself
}
