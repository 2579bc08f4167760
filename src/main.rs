//! Crater Artillery headless runner
//!
//! Plays a match with every team scripted and prints the final frame as JSON.
//!
//! Usage: `crater-artillery [settings.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use crater_artillery::MatchSettings;
use crater_artillery::sim::{FrameSnapshot, GameState, TickInput, tick};

/// Fixed elapsed time per frame
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many frames (one hour of play)
const MAX_FRAMES: u64 = 60 * 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Crater Artillery (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => MatchSettings::load(path),
        None => MatchSettings::default(),
    };
    // No input source here, so nobody is a player
    let settings = settings.without_players();

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    log::info!("Match seed {}", seed);

    let mut state = match GameState::with_settings(settings, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    let input = TickInput::default();
    while !(state.is_over() && state.stable) && state.frame < MAX_FRAMES {
        tick(&mut state, &input, FRAME_DT);
    }

    if state.frame >= MAX_FRAMES {
        log::warn!("Stopped at the frame cap in {:?}", state.phase);
    }
    match state.winner {
        Some(team) => log::info!("Team {} won after {} frames", team, state.frame),
        None => log::info!("No winner after {} frames", state.frame),
    }

    match serde_json::to_string_pretty(&FrameSnapshot::capture(&state)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Could not encode snapshot: {}", e);
            std::process::exit(1);
        }
    }
}
