//! Paddle Director headless demo
//!
//! Runs the director against the sandbox host at a fixed timestep and logs a
//! summary. Usage: `paddle-director [preset] [tuning.json] [ticks] [--all-ai]`

use paddle_director::consts::SIM_DT;
use paddle_director::sim::{SandboxConfig, TickStats, build_board, tick};
use paddle_director::{Difficulty, Director, DirectorTuning};

const DEFAULT_TICKS: u64 = 120 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut all_ai = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--all-ai" {
            all_ai = true;
        } else {
            positional.push(arg);
        }
    }

    let preset = positional
        .first()
        .and_then(|s| {
            let preset = Difficulty::from_str(s);
            if preset.is_none() {
                log::warn!("Unknown preset '{}', using {}", s, Difficulty::default().as_str());
            }
            preset
        })
        .unwrap_or_default();

    // Preset first; the tuning file overrides only the fields it names
    let base = DirectorTuning::from_preset(preset);
    let tuning = match positional.get(1) {
        Some(path) => DirectorTuning::load_over(path, base),
        None => base,
    };

    let ticks = positional
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TICKS);

    let config = SandboxConfig {
        all_ai,
        ..Default::default()
    };

    log::info!(
        "Paddle Director demo: preset {}, {} paddles ({}), {} ticks",
        preset.as_str(),
        config.paddle_count,
        if all_ai { "all AI" } else { "player 0 human" },
        ticks
    );

    let mut board = build_board(&config);
    let mut director = Director::new(tuning);
    let mut stats = TickStats::default();
    let bricks_at_start = board.bricks.iter().filter(|b| b.is_target()).count();

    for step in 0..ticks {
        stats.merge(tick(&mut board, &mut director, &config, SIM_DT));
        if step > 0 && step % 1200 == 0 {
            log::debug!("t={:.0}s {:?}", step as f32 * SIM_DT, stats);
        }
        if board.bricks.iter().all(|b| !b.is_target()) {
            log::info!("Wall cleared after {:.1}s", (step + 1) as f32 * SIM_DT);
            break;
        }
    }

    log::info!(
        "Bricks destroyed: {}/{} ({} hits)",
        stats.bricks_destroyed,
        bricks_at_start,
        stats.brick_hits
    );
    log::info!(
        "Serves: {}, paddle hits: {}, balls lost: {}",
        stats.serves,
        stats.paddle_hits,
        stats.balls_lost
    );
    for i in 0..board.paddles.len() {
        if let Some(target) = director.debug_target(i) {
            log::debug!(
                "Paddle {} at {:.1} -> target {:.1}, brick {:?}",
                i,
                board.paddles[i].pos.x,
                target.x,
                director.target_brick(i)
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; the demo is native only
}
