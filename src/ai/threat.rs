//! Threat selection: which ball a paddle should care about

use crate::sim::{Ball, Board};
use crate::tuning::DirectorTuning;

/// Score a ball for a paddle at `paddle_pos` (lower is more urgent)
fn threat_score(ball: &Ball, paddle_x: f32, paddle_y: f32, tuning: &DirectorTuning) -> f32 {
    let row_delta = paddle_y - ball.pos.y;
    let incoming = ball.vel.y * row_delta > 0.0;
    let base = if incoming { 0.0 } else { tuning.away_penalty };

    let time_to_intercept = if ball.vel.y.abs() > f32::EPSILON {
        (row_delta.abs() / ball.vel.y.abs()).min(tuning.max_intercept_time)
    } else {
        tuning.max_intercept_time
    };

    base + time_to_intercept * tuning.intercept_time_weight + (ball.pos.x - paddle_x).abs()
}

/// Pick the most relevant ball for paddle `paddle_index`.
///
/// Held balls never count. Balls slower than the threat threshold are only
/// considered by the nearest-ball fallback. Returns `None` only when no
/// unheld ball exists (or the paddle index is stale).
pub fn choose_ball(board: &Board, paddle_index: usize, tuning: &DirectorTuning) -> Option<usize> {
    let paddle = board.paddles.get(paddle_index)?;
    let (px, py) = (paddle.pos.x, paddle.pos.y);

    let threat = board
        .balls
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_held() && b.speed() >= tuning.min_threat_speed)
        .map(|(i, b)| (i, threat_score(b, px, py, tuning)))
        .filter(|(_, score)| score.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    threat.or_else(|| {
        board
            .balls
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_held())
            .map(|(i, b)| (i, b.pos.distance_squared(paddle.pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    })
}

/// A previously assigned ball is still usable when it exists and is in play
pub fn ball_still_valid(board: &Board, ball_index: Option<usize>) -> Option<usize> {
    let index = ball_index?;
    let ball = board.balls.get(index)?;
    (!ball.is_held()).then_some(index)
}
