//! Auto-serve arbiter
//!
//! Each AI paddle waits a per-paddle delay before launching a held ball so
//! several paddles never serve in lockstep.

use super::state::AiPaddleState;
use crate::golden_spread;
use crate::sim::Board;
use crate::tuning::DirectorTuning;

/// Serve delay for a paddle, spread across `[serve_delay_min, serve_delay_max)`
pub fn serve_delay_for(paddle_index: usize, tuning: &DirectorTuning) -> f32 {
    let span = (tuning.serve_delay_max - tuning.serve_delay_min).max(0.0);
    tuning.serve_delay_min + span * golden_spread(paddle_index)
}

/// Decide whether `paddle_index` should launch its held ball this tick.
///
/// Returns true exactly once per hold: when the countdown crosses zero. The
/// countdown is armed on the first tick the primary ball is seen held and
/// disarmed as soon as the ball is no longer held.
pub fn should_auto_serve(
    state: &mut AiPaddleState,
    board: &Board,
    paddle_index: usize,
    dt: f32,
    tuning: &DirectorTuning,
) -> bool {
    let dt = dt.max(0.0);
    state.release_cooldown_left = (state.release_cooldown_left - dt).max(0.0);

    let held = board.primary_ball(paddle_index).is_some_and(|b| b.is_held());
    if !held {
        state.serve_delay_left = None;
        return false;
    }
    if board.launch_suppressed(paddle_index) {
        return false;
    }

    let (left, armed_now) = match state.serve_delay_left {
        Some(left) => (left, false),
        None => {
            if state.release_cooldown_left > 0.0 {
                return false;
            }
            let delay = serve_delay_for(paddle_index, tuning);
            log::trace!("Paddle {} serve armed: {:.3}s", paddle_index, delay);
            (delay, true)
        }
    };

    if left <= 0.0 && !armed_now {
        // Already fired for this hold
        return false;
    }

    let next = left - dt;
    if next <= 0.0 {
        state.serve_delay_left = Some(0.0);
        state.release_cooldown_left = tuning.release_cooldown;
        log::debug!("Paddle {} auto-serves", paddle_index);
        true
    } else {
        state.serve_delay_left = Some(next);
        false
    }
}
