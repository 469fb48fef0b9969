//! Per-tick steering for one AI paddle
//!
//! Target selection only runs when the reaction countdown expires. Smoothing
//! of the target and of the emitted move intent runs every tick, so the
//! output stays continuous no matter how far the raw target jumps.

use glam::Vec2;

use super::lanes::{Lane, lane_anchor_x};
use super::prediction::predict_x_at_line;
use super::state::AiPaddleState;
use super::threat::{ball_still_valid, choose_ball};
use crate::sim::state::clamp_span;
use crate::sim::{Board, Paddle, Rect};
use crate::tuning::DirectorTuning;
use crate::{hash_signed, hash_unit, relax_toward_zero};

const JITTER_SALT: u32 = 0x4A17_0001;
const AIM_SALT: u32 = 0xA1E5_0002;

/// Per-tick steering inputs for one paddle
#[derive(Debug, Clone, Copy)]
pub struct SteerInput {
    /// Region the paddle rectangle must stay inside
    pub bounds: Rect,
    pub dt: f32,
    /// This paddle intercepts for its lane (otherwise it supports)
    pub is_defender: bool,
    pub lane: Lane,
    /// Row the paddle defends
    pub defend_y: f32,
    /// Intercept targets may leave `lane`
    pub may_leave_lane: bool,
}

/// Map a filtered-target delta on one axis to a stick deflection in [-1, 1].
/// Deltas at or inside the dead-zone give exactly zero.
pub fn axis_intent(delta: f32, dead_zone: f32, range: f32) -> f32 {
    let magnitude = delta.abs();
    if magnitude <= dead_zone || !magnitude.is_finite() {
        return 0.0;
    }
    let remainder = magnitude - dead_zone;
    delta.signum() * (remainder / range.max(f32::EPSILON)).min(1.0)
}

/// Advance steering for `paddle_index` and return the move intent
pub fn steer(
    state: &mut AiPaddleState,
    board: &Board,
    paddle_index: usize,
    input: &SteerInput,
    tuning: &DirectorTuning,
) -> Vec2 {
    let Some(paddle) = board.paddles.get(paddle_index) else {
        return Vec2::ZERO;
    };

    // NaN and non-positive ticks are no-ops
    if input.dt.is_nan() || input.dt <= 0.0 {
        return state.last_move;
    }
    let dt = input.dt.min(tuning.max_dt);

    if state.lane_jitter_seeded {
        state.lane_jitter_x =
            relax_toward_zero(state.lane_jitter_x, tuning.lane_jitter_decay * dt);
    } else {
        state.lane_jitter_x =
            hash_signed(paddle_index as u32, JITTER_SALT) * tuning.lane_jitter_max;
        state.lane_jitter_seeded = true;
    }

    state.reaction_time_left = (state.reaction_time_left - dt).max(0.0);
    if state.reaction_time_left <= 0.0 {
        state.reaction_time_left = tuning.reaction_delay;
        state.next_target = evaluate_target(state, board, paddle_index, paddle, input, tuning);
    }

    let alpha = 1.0 - (-tuning.smoothing_hz * dt).exp();
    state.filtered_target += (state.next_target - state.filtered_target) * alpha;

    let delta = state.filtered_target - paddle.pos;
    let desired = Vec2::new(
        axis_intent(delta.x, paddle.size.x * tuning.dead_zone_frac_x, tuning.move_range_x),
        axis_intent(delta.y, paddle.size.y * tuning.dead_zone_frac_y, tuning.move_range_y),
    );

    let blend = clamp_span(
        dt / tuning.response_time,
        tuning.min_response_blend,
        tuning.max_response_blend,
    );
    state.last_move = (state.last_move + (desired - state.last_move) * blend)
        .clamp(Vec2::splat(-1.0), Vec2::ONE);
    state.last_move
}

/// Recompute the raw target (reaction delay just expired)
fn evaluate_target(
    state: &mut AiPaddleState,
    board: &Board,
    paddle_index: usize,
    paddle: &Paddle,
    input: &SteerInput,
    tuning: &DirectorTuning,
) -> Vec2 {
    let anchor = lane_anchor_x(paddle_index, board.paddles.len(), board.width(), paddle.size.x);
    let mut target = Vec2::new(input.lane.clamp(anchor + state.lane_jitter_x), input.defend_y);

    let ball_index = ball_still_valid(board, state.last_ball)
        .or_else(|| choose_ball(board, paddle_index, tuning));
    if ball_index != state.last_ball {
        log::debug!("Paddle {} assigned ball {:?}", paddle_index, ball_index);
    }
    state.last_ball = ball_index;

    if let Some(ball) = ball_index.and_then(|i| board.balls.get(i)) {
        if input.is_defender {
            let intercept = predict_x_at_line(ball, input.defend_y, board.width());
            let distance = (intercept - paddle.pos.x).abs();
            let magnitude = clamp_span(
                tuning.aim_error_base
                    + distance * tuning.aim_error_per_pixel
                    + ball.speed() * tuning.aim_error_per_speed,
                tuning.aim_error_base,
                tuning.aim_error_max,
            );
            let sign = if hash_unit(paddle_index as u32, ball.id ^ AIM_SALT) < 0.5 {
                -1.0
            } else {
                1.0
            };
            state.aim_error_x += (sign * magnitude - state.aim_error_x) * tuning.aim_error_ease;

            let aimed = intercept + state.aim_error_x;
            target.x = if input.may_leave_lane {
                aimed
            } else {
                input.lane.clamp(aimed)
            };

            let follow_row = (ball.pos.y - tuning.ball_row_offset).max(input.defend_y);
            target.y = input.defend_y + (follow_row - input.defend_y) * tuning.vertical_follow;
        } else if input.lane.contains(ball.pos.x) {
            target.x += (ball.pos.x - target.x) * tuning.support_drift;
        }
    }

    input.bounds.clamp_center(target, paddle.half_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::lanes::lane_bounds;
    use crate::sim::Ball;

    fn board_one_paddle() -> Board {
        let mut board = Board::new(800.0, 600.0, 120.0);
        board.add_paddle(400.0, 30.0, Vec2::new(80.0, 12.0), true);
        board
    }

    fn input_for(board: &Board, dt: f32) -> SteerInput {
        SteerInput {
            bounds: board.paddle_zone(),
            dt,
            is_defender: true,
            lane: lane_bounds(0, board.paddles.len(), board.width()),
            defend_y: 30.0,
            may_leave_lane: true,
        }
    }

    #[test]
    fn test_axis_intent_dead_zone_and_range() {
        assert_eq!(axis_intent(5.0, 5.0, 60.0), 0.0);
        assert_eq!(axis_intent(-5.0, 5.0, 60.0), 0.0);
        assert!(axis_intent(6.0, 5.0, 60.0) > 0.0);
        assert!(axis_intent(-6.0, 5.0, 60.0) < 0.0);
        assert_eq!(axis_intent(500.0, 5.0, 60.0), 1.0);
        assert_eq!(axis_intent(f32::NAN, 5.0, 60.0), 0.0);
    }

    #[test]
    fn test_dt_zero_is_idempotent() {
        let board = board_one_paddle();
        let tuning = DirectorTuning::default();
        let mut state = AiPaddleState::new(Vec2::new(300.0, 30.0));
        state.next_target = Vec2::new(500.0, 30.0);
        state.last_move = Vec2::new(0.25, 0.0);
        let before = state.clone();

        for _ in 0..10 {
            let out = steer(&mut state, &board, 0, &input_for(&board, 0.0), &tuning);
            assert_eq!(out, before.last_move);
        }
        assert_eq!(state.filtered_target, before.filtered_target);
        assert_eq!(state.last_move, before.last_move);
    }

    #[test]
    fn test_nan_dt_is_a_no_op() {
        let board = board_one_paddle();
        let tuning = DirectorTuning::default();
        let mut state = AiPaddleState::new(Vec2::new(400.0, 30.0));
        state.reaction_time_left = 10.0;
        state.next_target = Vec2::new(700.0, 30.0);
        let before = state.clone();

        let out = steer(&mut state, &board, 0, &input_for(&board, f32::NAN), &tuning);
        assert_eq!(out, before.last_move);
        assert_eq!(state, before);
    }

    #[test]
    fn test_unsanitized_tuning_does_not_panic() {
        let mut board = board_one_paddle();
        let id = board.next_entity_id();
        board
            .balls
            .push(Ball::free(id, Vec2::new(400.0, 500.0), Vec2::new(120.0, -400.0)));
        let tuning = DirectorTuning {
            min_response_blend: 0.9,
            max_response_blend: 0.1,
            aim_error_base: 30.0,
            aim_error_max: 2.0,
            ..Default::default()
        };
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        for _ in 0..30 {
            let out = steer(&mut state, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
            assert!(out.is_finite());
            assert!(out.x.abs() <= 1.0 && out.y.abs() <= 1.0);
        }
        // Inverted aim-error bounds collapse onto their midpoint
        assert!(state.aim_error_x.abs() <= 16.0 + 1e-3);
    }

    #[test]
    fn test_dead_zone_boundary_through_steer() {
        let board = board_one_paddle();
        // 80 * 0.0625 = 5 px dead-zone, exact in f32
        let tuning = DirectorTuning {
            dead_zone_frac_x: 0.0625,
            ..Default::default()
        };
        let paddle = board.paddles[0].pos;

        let mut at_edge = AiPaddleState::new(paddle + Vec2::new(5.0, 0.0));
        at_edge.reaction_time_left = 10.0;
        let out = steer(&mut at_edge, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
        assert_eq!(out.x, 0.0);

        let mut beyond = AiPaddleState::new(paddle + Vec2::new(6.0, 0.0));
        beyond.reaction_time_left = 10.0;
        let out = steer(&mut beyond, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
        assert!(out.x > 0.0);
    }

    #[test]
    fn test_filtered_target_converges_without_overshoot() {
        let board = board_one_paddle();
        let tuning = DirectorTuning::default();
        let mut state = AiPaddleState::new(Vec2::new(400.0, 30.0));
        state.reaction_time_left = 100.0;
        state.next_target = Vec2::new(600.0, 30.0);

        let mut last = state.filtered_target.x;
        for _ in 0..240 {
            steer(&mut state, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
            assert!(state.filtered_target.x >= last);
            assert!(state.filtered_target.x <= 600.0);
            last = state.filtered_target.x;
        }
        assert!((state.filtered_target.x - 600.0).abs() < 1.0);
    }

    #[test]
    fn test_move_intent_is_rate_limited() {
        let board = board_one_paddle();
        let tuning = DirectorTuning::default();
        let mut state = AiPaddleState::new(Vec2::new(790.0, 30.0));
        state.reaction_time_left = 100.0;
        state.next_target = Vec2::new(790.0, 30.0);

        let out = steer(&mut state, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
        // desired is a full +1 deflection, but one tick only blends part of the way
        assert!(out.x > 0.0);
        assert!(out.x <= tuning.max_response_blend);
    }

    #[test]
    fn test_defender_targets_predicted_intercept() {
        let mut board = board_one_paddle();
        let id = board.next_entity_id();
        board
            .balls
            .push(Ball::free(id, Vec2::new(400.0, 300.0), Vec2::new(100.0, -200.0)));
        let tuning = DirectorTuning {
            aim_error_base: 0.0,
            aim_error_max: 0.0,
            vertical_follow: 0.0,
            ..Default::default()
        };
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        steer(&mut state, &board, 0, &input_for(&board, 1.0 / 120.0), &tuning);
        // t = 270 / 200 = 1.35 -> x = 400 + 135
        assert_eq!(state.last_ball, Some(0));
        assert!((state.next_target.x - 535.0).abs() < 1e-3);
        assert_eq!(state.next_target.y, 30.0);
        assert!((state.reaction_time_left - tuning.reaction_delay).abs() < 1e-6);
    }

    #[test]
    fn test_aim_error_eases_instead_of_snapping() {
        let mut board = board_one_paddle();
        let id = board.next_entity_id();
        board
            .balls
            .push(Ball::free(id, Vec2::new(400.0, 500.0), Vec2::new(0.0, -400.0)));
        let tuning = DirectorTuning::default();
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        let input = input_for(&board, 1.0 / 120.0);

        steer(&mut state, &board, 0, &input, &tuning);
        let first = state.aim_error_x.abs();
        assert!(first > 0.0);
        assert!(first < tuning.aim_error_max);

        state.reaction_time_left = 0.0;
        steer(&mut state, &board, 0, &input, &tuning);
        assert!(state.aim_error_x.abs() > first);
    }

    #[test]
    fn test_lane_clamp_when_leaving_is_forbidden() {
        let mut board = Board::new(800.0, 600.0, 120.0);
        board.add_paddle(200.0, 30.0, Vec2::new(80.0, 12.0), true);
        board.add_paddle(600.0, 30.0, Vec2::new(80.0, 12.0), true);
        let id = board.next_entity_id();
        // heads for x ~ 700, inside lane 1
        board
            .balls
            .push(Ball::free(id, Vec2::new(500.0, 300.0), Vec2::new(150.0, -200.0)));

        let lane = lane_bounds(0, 2, 800.0);
        let input = SteerInput {
            lane,
            may_leave_lane: false,
            ..input_for(&board, 1.0 / 120.0)
        };
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        steer(&mut state, &board, 0, &input, &DirectorTuning::default());
        assert!(state.next_target.x <= lane.max_x);
    }

    #[test]
    fn test_support_paddle_drifts_only_for_balls_in_lane() {
        let mut board = Board::new(800.0, 600.0, 120.0);
        board.add_paddle(200.0, 30.0, Vec2::new(80.0, 12.0), true);
        board.add_paddle(600.0, 30.0, Vec2::new(80.0, 12.0), true);
        let id = board.next_entity_id();
        board
            .balls
            .push(Ball::free(id, Vec2::new(100.0, 300.0), Vec2::new(0.0, 200.0)));
        let tuning = DirectorTuning {
            lane_jitter_max: 0.0,
            ..Default::default()
        };

        let support = SteerInput {
            lane: lane_bounds(0, 2, 800.0),
            is_defender: false,
            may_leave_lane: false,
            ..input_for(&board, 1.0 / 120.0)
        };
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        steer(&mut state, &board, 0, &support, &tuning);
        // anchor 200 drifts 40% toward 100
        assert!((state.next_target.x - 160.0).abs() < 1e-3);

        let other = SteerInput {
            lane: lane_bounds(1, 2, 800.0),
            ..support
        };
        let mut state = AiPaddleState::new(board.paddles[1].pos);
        steer(&mut state, &board, 1, &other, &tuning);
        assert!((state.next_target.x - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_target_respects_bounds_with_half_size() {
        let mut board = board_one_paddle();
        let id = board.next_entity_id();
        board
            .balls
            .push(Ball::free(id, Vec2::new(795.0, 590.0), Vec2::new(0.0, -50.0)));
        let mut state = AiPaddleState::new(board.paddles[0].pos);
        steer(&mut state, &board, 0, &input_for(&board, 1.0 / 120.0), &DirectorTuning::default());
        assert!(state.next_target.x <= 800.0 - 40.0);
        assert!(state.next_target.y <= 120.0 - 6.0);
    }

    #[test]
    fn test_hitch_dt_is_clamped() {
        let board = board_one_paddle();
        let tuning = DirectorTuning::default();
        let mut a = AiPaddleState::new(Vec2::new(400.0, 30.0));
        a.reaction_time_left = 100.0;
        a.next_target = Vec2::new(700.0, 30.0);
        let mut b = a.clone();
        steer(&mut a, &board, 0, &input_for(&board, 5.0), &tuning);
        steer(&mut b, &board, 0, &input_for(&board, tuning.max_dt), &tuning);
        assert_eq!(a.filtered_target, b.filtered_target);
        assert_eq!(a.last_move, b.last_move);
    }
}
