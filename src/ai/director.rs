//! Per-tick orchestration of every AI paddle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attack::plan_attack;
use super::lanes::{lane_bounds, lane_index_for_x};
use super::overlap;
use super::prediction::{predict_x_at_line, time_to_row};
use super::serve::should_auto_serve;
use super::state::{AiPaddleState, AiStateStore};
use super::steering::{SteerInput, steer};
use crate::sim::Board;
use crate::tuning::DirectorTuning;

/// What the director wants one AI paddle to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleCommand {
    /// Roster index of the paddle
    pub paddle: usize,
    /// Normalized stick deflection, each axis in [-1, 1]
    pub move_intent: Vec2,
    /// Launch the held primary ball now
    pub serve: bool,
    /// Paddle-local launch offset to use when serving
    pub serve_offset: f32,
}

/// The AI director: owns all per-paddle controller memory
#[derive(Debug, Clone, Default)]
pub struct Director {
    tuning: DirectorTuning,
    store: AiStateStore,
}

impl Director {
    pub fn new(tuning: DirectorTuning) -> Self {
        Self {
            tuning: tuning.sanitized(),
            store: AiStateStore::new(),
        }
    }

    pub fn tuning(&self) -> &DirectorTuning {
        &self.tuning
    }

    /// Replace the tuning; controller memory is kept
    pub fn set_tuning(&mut self, tuning: DirectorTuning) {
        self.tuning = tuning.sanitized();
    }

    /// Forget all controller memory (run restart)
    pub fn reset(&mut self) {
        log::info!("Director reset ({} paddle records dropped)", self.store.len());
        self.store.clear();
    }

    /// Run one controller tick and return a command for every AI paddle
    pub fn update(&mut self, board: &Board, dt: f32) -> Vec<PaddleCommand> {
        self.store.sync(&board.paddles);

        let count = board.paddles.len();
        let width = board.width();
        let zone = board.paddle_zone();
        let threatened = self.threatened_lanes(board);
        let any_threat = threatened.iter().any(|&t| t);
        let may_leave_lane = count == 1 || !self.tuning.lane_discipline;
        let defend_y = self.defend_row(board);

        let mut commands = Vec::with_capacity(board.ai_count());
        for i in 0..count {
            if !board.is_ai(i) {
                continue;
            }
            let Some(state) = self.store.get_mut(i) else {
                continue;
            };

            let lane = lane_bounds(i, count, width);
            let input = SteerInput {
                bounds: zone,
                dt,
                is_defender: threatened[i] || !any_threat,
                lane,
                defend_y,
                may_leave_lane,
            };
            let move_intent = steer(state, board, i, &input, &self.tuning);
            plan_attack(state, board, i, lane, dt, &self.tuning);

            commands.push(PaddleCommand {
                paddle: i,
                move_intent,
                serve: false,
                serve_offset: state.desired_serve_offset_x,
            });
        }

        // Serving runs after every paddle has steered
        for command in &mut commands {
            if let Some(state) = self.store.get_mut(command.paddle) {
                command.serve = should_auto_serve(state, board, command.paddle, dt, &self.tuning);
            }
        }

        log::trace!("Director tick: {} commands", commands.len());
        commands
    }

    /// Sequential overlap phase; call after the host applied movement
    pub fn resolve_overlaps(&self, board: &mut Board) {
        let is_ai: Vec<bool> = (0..board.paddles.len()).map(|i| board.is_ai(i)).collect();
        let width = board.width();
        overlap::resolve_overlaps(&mut board.paddles, &is_ai, width, self.tuning.overlap_gap);
    }

    /// Last raw steering target for `paddle`
    pub fn debug_target(&self, paddle: usize) -> Option<Vec2> {
        self.store.get(paddle).map(|s| s.next_target)
    }

    pub fn target_brick(&self, paddle: usize) -> Option<usize> {
        self.store.get(paddle).and_then(|s| s.target_brick)
    }

    pub fn desired_serve_offset(&self, paddle: usize) -> Option<f32> {
        self.store.get(paddle).map(|s| s.desired_serve_offset_x)
    }

    pub fn paddle_state(&self, paddle: usize) -> Option<&AiPaddleState> {
        self.store.get(paddle)
    }

    /// Row defenders hold their paddle center on. Threat detection predicts
    /// against the same row.
    pub fn defend_row(&self, board: &Board) -> f32 {
        board.paddle_zone().min.y + self.tuning.defend_row_lift
    }

    /// Lanes where a free ball is predicted to cross the defend row
    fn threatened_lanes(&self, board: &Board) -> Vec<bool> {
        let count = board.paddles.len();
        let mut threatened = vec![false; count.max(1)];
        let defend_y = self.defend_row(board);

        for ball in board.balls.iter().filter(|b| !b.is_held()) {
            if time_to_row(ball, defend_y).is_none() {
                continue;
            }
            let x = predict_x_at_line(ball, defend_y, board.width());
            threatened[lane_index_for_x(x, count, board.width())] = true;
        }
        threatened
    }
}
