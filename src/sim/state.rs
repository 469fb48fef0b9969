//! Board snapshot types shared with the host simulation
//!
//! Balls and bricks are read-only to the director. Paddles are read every
//! tick and written only by the overlap resolver (and by the host's
//! movement system).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BALL_RADIUS;

/// Axis-aligned rectangle in board space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Clamp a center point so a box of `half` extents stays inside
    pub fn clamp_center(&self, point: Vec2, half: Vec2) -> Vec2 {
        Vec2::new(
            clamp_span(point.x, self.min.x + half.x, self.max.x - half.x),
            clamp_span(point.y, self.min.y + half.y, self.max.y - half.y),
        )
    }
}

/// Clamp that never panics: an inverted (or NaN) range collapses onto its midpoint
#[inline]
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if lo <= hi {
        value.clamp(lo, hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Ball state - held by a paddle (not yet served) or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball rests on paddle `owner` at a paddle-local x offset
    Held { owner: usize, offset: f32 },
    /// Ball is free-moving
    Free,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Free,
        }
    }

    pub fn free(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            ..Self::new(id)
        }
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        matches!(self.state, BallState::Held { .. })
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Keep a held ball resting on top of its paddle
    pub fn update_held(&mut self, paddle: &Paddle) {
        if let BallState::Held { offset, .. } = self.state {
            self.pos = Vec2::new(paddle.pos.x + offset, paddle.top() + self.radius + 1.0);
            self.vel = Vec2::ZERO;
        }
    }

    /// Launch a held ball. The launch slope (dx/dy) is offset / half-width.
    pub fn launch(&mut self, paddle: &Paddle, speed: f32) {
        if let BallState::Held { offset, .. } = self.state {
            let half_width = paddle.half_width().max(1.0);
            let dir = Vec2::new(offset / half_width, 1.0).normalize_or(Vec2::Y);
            self.vel = dir * speed;
            self.state = BallState::Free;
        }
    }
}

/// A paddle. `pos` is the rectangle center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self { id, pos, size }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x * 0.5
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half_width()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half_width()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.pos, self.size)
    }
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub alive: bool,
    pub hp: u8,
}

impl Brick {
    pub fn new(id: u32, rect: Rect, hp: u8) -> Self {
        Self {
            id,
            rect,
            alive: hp > 0,
            hp,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Returns true if this brick can still be hit for damage
    #[inline]
    pub fn is_target(&self) -> bool {
        self.alive && self.hp > 0
    }
}

/// Per-player control flags, indexed like the paddle roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Paddle is driven by the director
    pub ai_controlled: bool,
    /// Ball this player serves
    pub primary_ball: Option<usize>,
    /// Serving is externally blocked (e.g. a menu just closed)
    #[serde(default)]
    pub launch_suppressed: bool,
}

/// Complete board snapshot handed to the director each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Playfield viewport (width, height)
    pub size: Vec2,
    /// Height of the band at the bottom where paddles may move
    pub paddle_zone_height: f32,
    pub balls: Vec<Ball>,
    pub paddles: Vec<Paddle>,
    pub bricks: Vec<Brick>,
    pub players: Vec<PlayerSlot>,
    /// Override: every paddle is AI-controlled
    #[serde(default)]
    pub all_ai: bool,
    next_id: u32,
}

impl Board {
    pub fn new(width: f32, height: f32, paddle_zone_height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            paddle_zone_height,
            balls: Vec::new(),
            paddles: Vec::new(),
            bricks: Vec::new(),
            players: Vec::new(),
            all_ai: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Whole playfield
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size)
    }

    /// Region paddle rectangles are confined to
    pub fn paddle_zone(&self) -> Rect {
        Rect::new(
            Vec2::ZERO,
            Vec2::new(self.size.x, self.paddle_zone_height.min(self.size.y)),
        )
    }

    /// Add a paddle on the roster; returns its index
    pub fn add_paddle(&mut self, x: f32, y: f32, size: Vec2, ai_controlled: bool) -> usize {
        let id = self.next_entity_id();
        self.paddles.push(Paddle::new(id, Vec2::new(x, y), size));
        self.players.push(PlayerSlot {
            ai_controlled,
            ..Default::default()
        });
        self.paddles.len() - 1
    }

    /// Spawn a ball held by `owner` and make it that player's primary ball
    pub fn spawn_ball_held(&mut self, owner: usize) -> Option<usize> {
        let paddle = self.paddles.get(owner)?.clone();
        let id = self.next_entity_id();
        let mut ball = Ball::new(id);
        ball.state = BallState::Held { owner, offset: 0.0 };
        ball.update_held(&paddle);
        self.balls.push(ball);
        let index = self.balls.len() - 1;
        if let Some(slot) = self.players.get_mut(owner) {
            slot.primary_ball = Some(index);
        }
        Some(index)
    }

    /// Is paddle `index` driven by the director
    pub fn is_ai(&self, index: usize) -> bool {
        if index >= self.paddles.len() {
            return false;
        }
        self.all_ai || self.players.get(index).is_some_and(|p| p.ai_controlled)
    }

    pub fn ai_count(&self) -> usize {
        (0..self.paddles.len()).filter(|&i| self.is_ai(i)).count()
    }

    /// First human-controlled paddle on the roster
    pub fn primary_human(&self) -> Option<usize> {
        (0..self.paddles.len()).find(|&i| !self.is_ai(i))
    }

    /// The primary ball of player `index`, if it still exists
    pub fn primary_ball(&self, index: usize) -> Option<&Ball> {
        let ball = self.players.get(index)?.primary_ball?;
        self.balls.get(ball)
    }

    pub fn launch_suppressed(&self, index: usize) -> bool {
        self.players.get(index).is_some_and(|p| p.launch_suppressed)
    }
}
