//! Attack planning: brick selection and aimed serve offsets

use glam::Vec2;

use super::lanes::{Lane, lane_bounds};
use super::state::AiPaddleState;
use crate::consts::BALL_RADIUS;
use crate::hash_signed;
use crate::sim::Board;
use crate::sim::state::clamp_span;
use crate::tuning::DirectorTuning;

const SERVE_SALT: u32 = 0x5E4E_0003;

/// Distance from `x` to the closed interval of `lane` (0 inside)
fn distance_to_lane(x: f32, lane: &Lane) -> f32 {
    (lane.min_x - x).max(x - lane.max_x).max(0.0)
}

/// Pick a brick in `lane` for `paddle_index` to attack.
///
/// Lower rows, fewer hit points and bricks near the lane center score better.
/// Bricks close to the primary human's lane are penalized so AI paddles work
/// on different bricks than the player.
pub fn choose_brick(
    board: &Board,
    paddle_index: usize,
    lane: Lane,
    tuning: &DirectorTuning,
) -> Option<usize> {
    let lane_center = lane.center();
    let human_lane = board
        .primary_human()
        .filter(|&h| h != paddle_index)
        .map(|h| lane_bounds(h, board.paddles.len(), board.width()));

    board
        .bricks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_target() && lane.contains(b.center().x))
        .map(|(i, b)| {
            let c = b.center();
            let mut score = tuning.brick_row_weight * c.y
                + tuning.brick_hp_weight * b.hp as f32
                + tuning.brick_center_weight * (c.x - lane_center).abs();
            if let Some(human) = &human_lane {
                if distance_to_lane(c.x, human) < tuning.human_avoid_radius {
                    score += tuning.human_lane_penalty;
                }
            }
            (i, score)
        })
        .filter(|(_, score)| score.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Paddle-local launch offset that sends a served ball toward `brick_index`.
///
/// The launch slope (dx/dy) is clamped so serves stay vertically dominant,
/// then scaled by the paddle half-width and kept inside
/// `[-(half_width - ball_radius), half_width - ball_radius]`.
pub fn serve_offset_for_brick(
    board: &Board,
    paddle_index: usize,
    brick_index: usize,
    tuning: &DirectorTuning,
) -> f32 {
    let Some(paddle) = board.paddles.get(paddle_index) else {
        return 0.0;
    };
    let Some(brick) = board.bricks.get(brick_index).filter(|b| b.is_target()) else {
        return 0.0;
    };

    let ball_radius = board
        .primary_ball(paddle_index)
        .map(|b| b.radius)
        .unwrap_or(BALL_RADIUS);
    let half_width = paddle.half_width();
    let limit = (half_width - ball_radius).max(0.0);

    let launch = Vec2::new(paddle.pos.x, paddle.top() + ball_radius);
    let delta = brick.center() - launch;
    let dy = delta.y.max(ball_radius.max(1.0));
    let max_slope = tuning.serve_max_slope;
    let slope = clamp_span(delta.x / dy, -max_slope, max_slope);

    let jitter = hash_signed(paddle_index as u32, brick.id ^ SERVE_SALT) * tuning.serve_jitter;
    clamp_span(slope * half_width + jitter, -limit, limit)
}

/// Run the attack planner cadence for one paddle.
///
/// The target brick is re-chosen when the retarget countdown expires or the
/// cached brick died / left the lane; the serve offset is recomputed when its
/// own countdown expires or the target changed.
pub fn plan_attack(
    state: &mut AiPaddleState,
    board: &Board,
    paddle_index: usize,
    lane: Lane,
    dt: f32,
    tuning: &DirectorTuning,
) {
    let dt = dt.max(0.0);
    state.retarget_brick_time_left = (state.retarget_brick_time_left - dt).max(0.0);
    state.desired_serve_offset_time_left = (state.desired_serve_offset_time_left - dt).max(0.0);

    let cached_stale = state.target_brick.is_some_and(|i| {
        board
            .bricks
            .get(i)
            .is_none_or(|b| !b.is_target() || !lane.contains(b.center().x))
    });

    if cached_stale || state.retarget_brick_time_left <= 0.0 {
        let next = choose_brick(board, paddle_index, lane, tuning);
        if next != state.target_brick {
            log::debug!("Paddle {} targets brick {:?}", paddle_index, next);
            state.desired_serve_offset_time_left = 0.0;
        }
        state.target_brick = next;
        state.retarget_brick_time_left = tuning.retarget_interval;
    }

    if state.desired_serve_offset_time_left <= 0.0 {
        state.desired_serve_offset_x = state
            .target_brick
            .map(|b| serve_offset_for_brick(board, paddle_index, b, tuning))
            .unwrap_or(0.0);
        state.desired_serve_offset_time_left = tuning.serve_offset_interval;
    }
}
