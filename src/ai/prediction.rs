//! Trajectory prediction with elastic side-wall reflection

use crate::consts::{VELOCITY_EPSILON, WIDTH_EPSILON};
use crate::sim::Ball;
use crate::sim::state::clamp_span;

/// Predict the x-coordinate where `ball` crosses the horizontal line `target_y`.
///
/// Left/right walls are treated as perfect mirrors for the ball's center, so the
/// result always lies in `[radius, board_width - radius]`. Bricks and paddles are
/// ignored. Returns the current x when the ball has no vertical speed or is
/// moving away from the line.
pub fn predict_x_at_line(ball: &Ball, target_y: f32, board_width: f32) -> f32 {
    if ball.vel.y.abs() < VELOCITY_EPSILON {
        return ball.pos.x;
    }

    let time_to_cross = (target_y - ball.pos.y) / ball.vel.y;
    if !time_to_cross.is_finite() || time_to_cross < 0.0 {
        return ball.pos.x;
    }

    let unreflected = ball.pos.x + ball.vel.x * time_to_cross;
    reflect_into(unreflected, ball.radius, board_width - ball.radius)
}

/// Fold `x` into `[lo, hi]` with a triangle wave (any number of bounces)
pub fn reflect_into(x: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= WIDTH_EPSILON || !x.is_finite() {
        return clamp_span(if x.is_finite() { x } else { lo }, lo, hi);
    }

    let phase = ((x - lo) / span).rem_euclid(2.0);
    let tri = if phase > 1.0 { 2.0 - phase } else { phase };
    lo + tri * span
}

/// Seconds until `ball` reaches the row `target_y`, if it is heading there
pub fn time_to_row(ball: &Ball, target_y: f32) -> Option<f32> {
    if ball.vel.y.abs() < VELOCITY_EPSILON {
        return None;
    }
    let t = (target_y - ball.pos.y) / ball.vel.y;
    (t.is_finite() && t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn ball(pos: (f32, f32), vel: (f32, f32), radius: f32) -> Ball {
        let mut b = Ball::free(1, Vec2::new(pos.0, pos.1), Vec2::new(vel.0, vel.1));
        b.radius = radius;
        b
    }

    #[test]
    fn test_zero_horizontal_velocity_keeps_x() {
        let b = ball((321.0, 300.0), (0.0, -150.0), 8.0);
        for row in [0.0, 50.0, 120.0, 299.0] {
            assert_eq!(predict_x_at_line(&b, row, 800.0), 321.0);
        }
    }

    #[test]
    fn test_no_vertical_velocity_returns_current_x() {
        let b = ball((100.0, 300.0), (250.0, 0.0), 8.0);
        assert_eq!(predict_x_at_line(&b, 50.0, 800.0), 100.0);
    }

    #[test]
    fn test_moving_away_returns_current_x() {
        let b = ball((400.0, 300.0), (100.0, 200.0), 10.0);
        assert_eq!(predict_x_at_line(&b, 50.0, 800.0), 400.0);
        assert_eq!(time_to_row(&b, 50.0), None);
    }

    #[test]
    fn test_straight_crossing_without_walls() {
        // t = 250 / 200 = 1.25, x = 400 + 100 * 1.25
        let b = ball((400.0, 300.0), (100.0, -200.0), 10.0);
        assert_eq!(predict_x_at_line(&b, 50.0, 800.0), 525.0);
        assert_eq!(time_to_row(&b, 50.0), Some(1.25));
    }

    #[test]
    fn test_narrow_board_mirrors_once() {
        // unreflected 525 is past the right limit 390: 2 * 390 - 525 = 255
        let b = ball((400.0, 300.0), (100.0, -200.0), 10.0);
        let x = predict_x_at_line(&b, 50.0, 400.0);
        assert!((x - 255.0).abs() < 1e-3, "got {x}");
    }

    #[test]
    fn test_one_two_three_bounces() {
        // Limits [10, 390], t = 1.25 for every case.
        // One bounce: 200 + 260 * 1.25 = 525 -> 780 - 525 = 255
        let one = ball((200.0, 300.0), (260.0, -200.0), 10.0);
        assert!((predict_x_at_line(&one, 50.0, 400.0) - 255.0).abs() < 1e-3);

        // Two bounces: 200 - 480 * 1.25 = -400 -> 20 + 400 = 420 -> 780 - 420 = 360
        let two = ball((200.0, 300.0), (-480.0, -200.0), 10.0);
        assert!((predict_x_at_line(&two, 50.0, 400.0) - 360.0).abs() < 1e-3);

        // Three bounces: 200 + 800 * 1.25 = 1200 -> -420 -> 440 -> 340
        let three = ball((200.0, 300.0), (800.0, -200.0), 10.0);
        assert!((predict_x_at_line(&three, 50.0, 400.0) - 340.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_width_clamps() {
        let b = ball((5.0, 300.0), (100.0, -200.0), 10.0);
        // Playable width is negative: collapse to the midpoint
        let x = predict_x_at_line(&b, 50.0, 15.0);
        assert!(x.is_finite());
        assert!((x - 7.5).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_prediction_stays_in_playable_range(
            px in 10.0f32..790.0,
            py in 60.0f32..600.0,
            vx in -2000.0f32..2000.0,
            vy in -2000.0f32..-1.0,
            radius in 2.0f32..20.0,
        ) {
            let b = ball((px, py), (vx, vy), radius);
            let x = predict_x_at_line(&b, 50.0, 800.0);
            prop_assert!(x.is_finite());
            prop_assert!(x >= radius - 1e-2 && x <= 800.0 - radius + 1e-2);
            prop_assert_eq!(x, predict_x_at_line(&b, 50.0, 800.0));
        }
    }
}
