//! Paddle Director - autonomous paddle controller for ball-and-brick arcade games
//!
//! Core modules:
//! - `ai`: Per-tick decision system (prediction, targeting, steering, serving, overlap)
//! - `sim`: Host-facing board snapshot types and a small deterministic sandbox host
//! - `tuning`: Data-driven controller balance
//!
//! Board space is y-up: the origin sits at the bottom-left corner, paddles
//! defend the bottom of the board and bricks live above them.

pub mod ai;
pub mod sim;
pub mod tuning;

pub use ai::{Director, PaddleCommand};
pub use tuning::{Difficulty, DirectorTuning};

/// Controller configuration constants (defaults for [`DirectorTuning`])
pub mod consts {
    /// Fixed simulation timestep used by the sandbox host (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Steering never integrates more than this per tick (frame hitches)
    pub const MAX_STEER_DT: f32 = 1.0 / 20.0;

    /// Seconds between target re-evaluations (human perception latency)
    pub const REACTION_DELAY: f32 = 0.14;
    /// Exponential smoothing rate of the filtered target (1/s)
    pub const SMOOTHING_HZ: f32 = 9.0;

    /// Dead-zone as a fraction of paddle width / height
    pub const DEAD_ZONE_FRAC_X: f32 = 0.06;
    pub const DEAD_ZONE_FRAC_Y: f32 = 0.25;
    /// Pixel distance beyond the dead-zone that maps to full stick deflection
    pub const MOVE_RANGE_X: f32 = 60.0;
    pub const MOVE_RANGE_Y: f32 = 24.0;

    /// Move-intent response time and blend bounds
    pub const RESPONSE_TIME: f32 = 0.09;
    pub const MIN_RESPONSE_BLEND: f32 = 0.05;
    pub const MAX_RESPONSE_BLEND: f32 = 0.6;

    /// Aim error (pixels)
    pub const AIM_ERROR_BASE: f32 = 4.0;
    pub const AIM_ERROR_MAX: f32 = 38.0;
    pub const AIM_ERROR_PER_PIXEL: f32 = 0.045;
    pub const AIM_ERROR_PER_SPEED: f32 = 0.012;
    /// Fraction of the gap to the new aim bias closed per re-evaluation
    pub const AIM_ERROR_EASE: f32 = 0.35;

    /// Lane jitter amplitude (pixels) and decay rate (pixels/s)
    pub const LANE_JITTER_MAX: f32 = 14.0;
    pub const LANE_JITTER_DECAY: f32 = 4.0;

    /// Vertical targeting: row offset below the ball and blend toward it
    pub const BALL_ROW_OFFSET: f32 = 70.0;
    pub const VERTICAL_FOLLOW: f32 = 0.3;
    /// Defend row height above the bottom of the paddle zone
    pub const DEFEND_ROW_LIFT: f32 = 24.0;
    /// Fraction of the way a support paddle drifts toward a ball in its lane
    pub const SUPPORT_DRIFT: f32 = 0.4;

    /// Threat selection
    pub const MIN_THREAT_SPEED: f32 = 25.0;
    pub const AWAY_PENALTY: f32 = 10_000.0;
    pub const INTERCEPT_TIME_WEIGHT: f32 = 250.0;
    pub const MAX_INTERCEPT_TIME: f32 = 8.0;

    /// Brick scoring
    pub const BRICK_ROW_WEIGHT: f32 = 1.0;
    pub const BRICK_HP_WEIGHT: f32 = 45.0;
    pub const BRICK_CENTER_WEIGHT: f32 = 0.6;
    pub const HUMAN_LANE_PENALTY: f32 = 400.0;
    pub const HUMAN_AVOID_RADIUS: f32 = 110.0;

    /// Serve aiming
    pub const SERVE_MAX_SLOPE: f32 = 1.1;
    pub const SERVE_JITTER: f32 = 3.0;
    pub const SERVE_DELAY_MIN: f32 = 0.35;
    pub const SERVE_DELAY_MAX: f32 = 1.2;

    /// Attack planner cadence (seconds)
    pub const RETARGET_INTERVAL: f32 = 1.25;
    pub const SERVE_OFFSET_INTERVAL: f32 = 0.4;
    pub const RELEASE_COOLDOWN: f32 = 0.6;

    /// Minimum horizontal gap kept between AI paddles (pixels)
    pub const OVERLAP_GAP: f32 = 6.0;

    /// Ball radius assumed when a paddle has no ball to measure
    pub const BALL_RADIUS: f32 = 7.0;

    /// Numeric guards
    pub const VELOCITY_EPSILON: f32 = 1e-3;
    pub const WIDTH_EPSILON: f32 = 1e-3;
}

/// Integer hash of two values (avalanching, stable across platforms)
#[inline]
pub fn hash_u32(a: u32, b: u32) -> u32 {
    let mut h = a.wrapping_mul(0x9E37_79B1) ^ b.wrapping_mul(0x85EB_CA77).rotate_left(13);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^= h >> 16;
    h
}

/// Deterministic pseudo-random value in `[0, 1)` for a pair of indices
#[inline]
pub fn hash_unit(a: u32, b: u32) -> f32 {
    (hash_u32(a, b) >> 8) as f32 / (1u32 << 24) as f32
}

/// Deterministic pseudo-random value in `[-1, 1)` for a pair of indices
#[inline]
pub fn hash_signed(a: u32, b: u32) -> f32 {
    hash_unit(a, b) * 2.0 - 1.0
}

/// Golden-ratio spread in `[0, 1)`: pairwise distinct for distinct indices
#[inline]
pub fn golden_spread(index: usize) -> f32 {
    const INV_PHI: f64 = 0.618_033_988_749_895;
    (0.5 + index as f64 * INV_PHI).fract() as f32
}

/// Move `value` toward zero by at most `step`
#[inline]
pub fn relax_toward_zero(value: f32, step: f32) -> f32 {
    if value.abs() <= step {
        0.0
    } else {
        value - step * value.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_in_range() {
        for a in 0..32 {
            for b in 0..32 {
                let u = hash_unit(a, b);
                assert!((0.0..1.0).contains(&u));
                assert_eq!(u, hash_unit(a, b));
                let s = hash_signed(a, b);
                assert!((-1.0..1.0).contains(&s));
            }
        }
        assert_ne!(hash_u32(0, 1), hash_u32(1, 0));
    }

    #[test]
    fn test_golden_spread_distinct() {
        let values: Vec<f32> = (0..64).map(golden_spread).collect();
        for (i, a) in values.iter().enumerate() {
            assert!((0.0..1.0).contains(a));
            for b in &values[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_relax_toward_zero() {
        assert_eq!(relax_toward_zero(5.0, 2.0), 3.0);
        assert_eq!(relax_toward_zero(-5.0, 2.0), -3.0);
        assert_eq!(relax_toward_zero(1.5, 2.0), 0.0);
        assert_eq!(relax_toward_zero(0.0, 2.0), 0.0);
    }
}
