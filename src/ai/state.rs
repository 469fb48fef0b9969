//! Per-paddle controller state
//!
//! One record per roster slot, indexed by paddle index. The store follows the
//! roster lazily: a length mismatch is repaired on the next sync.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Paddle;

/// Mutable controller memory for one paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPaddleState {
    /// Seconds until the next target re-evaluation (>= 0)
    pub reaction_time_left: f32,
    /// Smoothed steering target
    pub filtered_target: Vec2,
    /// Raw target from the last re-evaluation
    pub next_target: Vec2,
    /// Ball assigned at the last re-evaluation
    pub last_ball: Option<usize>,
    /// Persistent signed intercept bias (pixels)
    pub aim_error_x: f32,
    /// Auto-serve countdown; `None` while no held ball has been seen
    pub serve_delay_left: Option<f32>,
    /// Move intent emitted last tick
    pub last_move: Vec2,
    /// Decaying lane offset
    pub lane_jitter_x: f32,
    pub lane_jitter_seeded: bool,

    // === Attack planning ===
    pub target_brick: Option<usize>,
    pub retarget_brick_time_left: f32,
    pub desired_serve_offset_x: f32,
    pub desired_serve_offset_time_left: f32,
    pub release_cooldown_left: f32,
}

impl AiPaddleState {
    /// Fresh state for a paddle currently centered at `at`
    pub fn new(at: Vec2) -> Self {
        Self {
            reaction_time_left: 0.0,
            filtered_target: at,
            next_target: at,
            last_ball: None,
            aim_error_x: 0.0,
            serve_delay_left: None,
            last_move: Vec2::ZERO,
            lane_jitter_x: 0.0,
            lane_jitter_seeded: false,
            target_brick: None,
            retarget_brick_time_left: 0.0,
            desired_serve_offset_x: 0.0,
            desired_serve_offset_time_left: 0.0,
            release_cooldown_left: 0.0,
        }
    }
}

/// Arena of per-paddle states, keyed by roster index
#[derive(Debug, Clone, Default)]
pub struct AiStateStore {
    states: Vec<AiPaddleState>,
}

impl AiStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AiPaddleState> {
        self.states.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut AiPaddleState> {
        self.states.get_mut(index)
    }

    /// Drop every record (run restart)
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Match the store to the roster. Existing records keep their index, new
    /// slots start at their paddle's current center. Returns true on resize.
    pub fn sync(&mut self, paddles: &[Paddle]) -> bool {
        if self.states.len() == paddles.len() {
            return false;
        }

        let old_len = self.states.len();
        if paddles.is_empty() {
            self.states.clear();
        } else if paddles.len() < old_len {
            self.states.truncate(paddles.len());
        } else {
            self.states
                .extend(paddles[old_len..].iter().map(|p| AiPaddleState::new(p.pos)));
        }

        log::info!("AI roster resized: {} -> {} paddles", old_len, self.states.len());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddles(xs: &[f32]) -> Vec<Paddle> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| Paddle::new(i as u32, Vec2::new(x, 30.0), Vec2::new(80.0, 12.0)))
            .collect()
    }

    #[test]
    fn test_new_slots_start_at_paddle_center() {
        let mut store = AiStateStore::new();
        assert!(store.sync(&paddles(&[100.0, 500.0])));
        assert_eq!(store.len(), 2);
        let s = store.get(1).unwrap();
        assert_eq!(s.filtered_target, Vec2::new(500.0, 30.0));
        assert_eq!(s.next_target, s.filtered_target);
        assert_eq!(s.serve_delay_left, None);
    }

    #[test]
    fn test_grow_keeps_existing_records() {
        let mut store = AiStateStore::new();
        store.sync(&paddles(&[100.0]));
        store.get_mut(0).unwrap().aim_error_x = 7.5;
        assert!(store.sync(&paddles(&[100.0, 300.0, 600.0])));
        assert_eq!(store.get(0).unwrap().aim_error_x, 7.5);
        assert_eq!(store.get(2).unwrap().filtered_target.x, 600.0);
    }

    #[test]
    fn test_shrink_truncates_and_empty_clears() {
        let mut store = AiStateStore::new();
        store.sync(&paddles(&[100.0, 300.0, 600.0]));
        store.get_mut(0).unwrap().aim_error_x = 3.0;
        store.sync(&paddles(&[100.0]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().aim_error_x, 3.0);
        assert!(store.get(2).is_none());
        store.sync(&[]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_same_length_is_a_no_op() {
        let mut store = AiStateStore::new();
        store.sync(&paddles(&[100.0]));
        assert!(!store.sync(&paddles(&[250.0])));
        assert_eq!(store.get(0).unwrap().filtered_target.x, 100.0);
    }
}
