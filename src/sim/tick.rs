//! Sandbox host
//!
//! A minimal stand-in for the game's physics and movement systems so the
//! director can be driven end to end. Fixed timestep, seeded RNG, stable
//! iteration order: identical seeds and tick durations replay identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{BallState, Board, Brick, Rect};
use crate::ai::{Director, PaddleCommand};
use crate::consts::DEFEND_ROW_LIFT;

/// Sandbox board layout and physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_zone_height: f32,
    pub paddle_count: usize,
    pub paddle_size: Vec2,
    /// Paddle speed at full stick deflection (px/s)
    pub paddle_speed: f32,
    /// Launch speed of a served ball (px/s)
    pub ball_speed: f32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub seed: u64,
    /// Roster slot left to a human (ignored when `all_ai`)
    pub human_slot: Option<usize>,
    pub all_ai: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_zone_height: 120.0,
            paddle_count: 4,
            paddle_size: Vec2::new(90.0, 14.0),
            paddle_speed: 520.0,
            ball_speed: 380.0,
            brick_rows: 6,
            brick_cols: 10,
            seed: 0x5EED,
            human_slot: Some(0),
            all_ai: false,
        }
    }
}

/// Counters produced by the sandbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub bricks_destroyed: u32,
    pub brick_hits: u32,
    pub paddle_hits: u32,
    pub serves: u32,
    pub balls_lost: u32,
}

impl TickStats {
    pub fn merge(&mut self, other: TickStats) {
        self.bricks_destroyed += other.bricks_destroyed;
        self.brick_hits += other.brick_hits;
        self.paddle_hits += other.paddle_hits;
        self.serves += other.serves;
        self.balls_lost += other.balls_lost;
    }
}

/// Build a board: paddles at their lane centers, one held ball each, and a
/// seeded brick wall
pub fn build_board(config: &SandboxConfig) -> Board {
    let mut board = Board::new(config.width, config.height, config.paddle_zone_height);
    board.all_ai = config.all_ai;

    let count = config.paddle_count;
    let slice = config.width / count.max(1) as f32;
    // Paddles start on the default defend row
    let y = DEFEND_ROW_LIFT;
    for i in 0..count {
        let ai = config.human_slot != Some(i);
        board.add_paddle(slice * (i as f32 + 0.5), y, config.paddle_size, ai);
    }
    for i in 0..count {
        board.spawn_ball_held(i);
    }

    generate_wall(&mut board, config.seed, config.brick_rows, config.brick_cols);
    board
}

/// Replace the board's bricks with a seeded wall above the paddle zone
pub fn generate_wall(board: &mut Board, seed: u64, rows: u32, cols: u32) {
    let mut rng = Pcg32::seed_from_u64(seed);
    board.bricks.clear();
    if rows == 0 || cols == 0 {
        return;
    }

    const GAP: f32 = 4.0;
    let top = board.height() - 40.0;
    let bottom = board.paddle_zone().max.y + (board.height() - board.paddle_zone_height) * 0.35;
    let cell = Vec2::new(
        board.width() / cols as f32,
        ((top - bottom) / rows as f32).max(GAP * 2.0),
    );

    for row in 0..rows {
        for col in 0..cols {
            // Leave a few holes so lanes differ
            if rng.random_bool(0.12) {
                continue;
            }
            let hp = rng.random_range(1..=3u8);
            let center = Vec2::new(
                cell.x * (col as f32 + 0.5),
                bottom + cell.y * (row as f32 + 0.5),
            );
            let id = board.next_entity_id();
            let rect = Rect::from_center_size(center, cell - Vec2::splat(GAP));
            board.bricks.push(Brick::new(id, rect, hp));
        }
    }

    log::info!(
        "Generated brick wall: {} bricks ({}x{}, seed {})",
        board.bricks.len(),
        rows,
        cols,
        seed
    );
}

/// Move paddles by their commands and launch requested serves
pub fn apply_commands(
    board: &mut Board,
    commands: &[PaddleCommand],
    config: &SandboxConfig,
    dt: f32,
) -> TickStats {
    let mut stats = TickStats::default();
    let dt = dt.max(0.0);
    let zone = board.paddle_zone();

    for command in commands {
        let Some(paddle) = board.paddles.get_mut(command.paddle) else {
            continue;
        };
        let intent = command.move_intent.clamp(Vec2::splat(-1.0), Vec2::ONE);
        let moved = paddle.pos + intent * config.paddle_speed * dt;
        paddle.pos = zone.clamp_center(moved, paddle.half_size());
    }

    for command in commands.iter().filter(|c| c.serve) {
        let Some(paddle) = board.paddles.get(command.paddle) else {
            continue;
        };
        let Some(index) = board.players.get(command.paddle).and_then(|p| p.primary_ball) else {
            continue;
        };
        let Some(ball) = board.balls.get_mut(index) else {
            continue;
        };
        if let BallState::Held { owner, .. } = ball.state {
            ball.state = BallState::Held {
                owner,
                offset: command.serve_offset,
            };
            ball.update_held(paddle);
            ball.launch(paddle, config.ball_speed);
            stats.serves += 1;
            log::debug!(
                "Paddle {} served ball {} (offset {:.1})",
                command.paddle,
                ball.id,
                command.serve_offset
            );
        }
    }

    stats
}

/// Advance every ball by one step: walls, bricks, paddles, loss
pub fn advance_balls(board: &mut Board, dt: f32) -> TickStats {
    let mut stats = TickStats::default();
    let dt = dt.max(0.0);
    let width = board.width();
    let height = board.height();

    for index in 0..board.balls.len() {
        let ball = &mut board.balls[index];
        if let BallState::Held { owner, .. } = ball.state {
            if let Some(paddle) = board.paddles.get(owner) {
                ball.update_held(paddle);
            }
            continue;
        }

        ball.pos += ball.vel * dt;
        let r = ball.radius;

        if ball.pos.x < r {
            ball.pos.x = r;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x > width - r {
            ball.pos.x = width - r;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y > height - r {
            ball.pos.y = height - r;
            ball.vel.y = -ball.vel.y.abs();
        }

        // One brick per step
        if let Some(brick) = board
            .bricks
            .iter_mut()
            .filter(|b| b.is_target())
            .find(|b| expanded(&b.rect, r).contains_point(ball.pos))
        {
            bounce_out(&expanded(&brick.rect, r), &mut ball.pos, &mut ball.vel);
            brick.hp = brick.hp.saturating_sub(1);
            stats.brick_hits += 1;
            if brick.hp == 0 {
                brick.alive = false;
                stats.bricks_destroyed += 1;
                log::debug!("Brick {} destroyed", brick.id);
            }
        }

        if ball.vel.y < 0.0 {
            if let Some(paddle) = board.paddles.iter().find(|p| {
                expanded(&p.rect(), r).contains_point(ball.pos) && ball.pos.y >= p.pos.y
            }) {
                let speed = ball.speed();
                let english = ((ball.pos.x - paddle.pos.x) / paddle.half_width().max(1.0))
                    .clamp(-1.0, 1.0);
                ball.pos.y = paddle.top() + r;
                ball.vel = Vec2::new(english, 1.0).normalize_or(Vec2::Y) * speed;
                stats.paddle_hits += 1;
            }
        }

        if ball.pos.y < -r {
            let owner = board
                .players
                .iter()
                .position(|p| p.primary_ball == Some(index))
                .unwrap_or(0);
            if let Some(paddle) = board.paddles.get(owner) {
                ball.state = BallState::Held { owner, offset: 0.0 };
                ball.update_held(paddle);
                stats.balls_lost += 1;
                log::debug!("Ball {} lost, returned to paddle {}", ball.id, owner);
            }
        }
    }

    stats
}

/// One full host tick: director, then movement and serves, then the overlap
/// phase, then ball physics
pub fn tick(
    board: &mut Board,
    director: &mut Director,
    config: &SandboxConfig,
    dt: f32,
) -> TickStats {
    let commands = director.update(board, dt);
    let mut stats = apply_commands(board, &commands, config, dt);
    director.resolve_overlaps(board);
    stats.merge(advance_balls(board, dt));
    stats
}

fn expanded(rect: &Rect, by: f32) -> Rect {
    Rect::new(rect.min - Vec2::splat(by), rect.max + Vec2::splat(by))
}

/// Push `pos` out of `rect` along the axis of least penetration and reflect
fn bounce_out(rect: &Rect, pos: &mut Vec2, vel: &mut Vec2) {
    let left = pos.x - rect.min.x;
    let right = rect.max.x - pos.x;
    let below = pos.y - rect.min.y;
    let above = rect.max.y - pos.y;

    if left.min(right) < below.min(above) {
        if left < right {
            pos.x = rect.min.x;
            vel.x = -vel.x.abs();
        } else {
            pos.x = rect.max.x;
            vel.x = vel.x.abs();
        }
    } else if below < above {
        pos.y = rect.min.y;
        vel.y = -vel.y.abs();
    } else {
        pos.y = rect.max.y;
        vel.y = vel.y.abs();
    }
}
