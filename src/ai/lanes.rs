//! Lane geometry: the board width split into one equal slice per paddle

use crate::sim::state::clamp_span;

/// Horizontal extent of a paddle's lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub min_x: f32,
    pub max_x: f32,
}

impl Lane {
    #[inline]
    pub fn center(&self) -> f32 {
        (self.min_x + self.max_x) * 0.5
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        clamp_span(x, self.min_x, self.max_x)
    }
}

/// Lane slice for `paddle_index` out of `paddle_count`
pub fn lane_bounds(paddle_index: usize, paddle_count: usize, board_width: f32) -> Lane {
    let count = paddle_count.max(1);
    let index = paddle_index.min(count - 1);
    let slice = board_width.max(0.0) / count as f32;
    Lane {
        min_x: slice * index as f32,
        max_x: slice * (index + 1) as f32,
    }
}

/// Home x for a paddle: its slice center, kept so the paddle stays on the board
pub fn lane_anchor_x(
    paddle_index: usize,
    paddle_count: usize,
    board_width: f32,
    paddle_width: f32,
) -> f32 {
    let center = lane_bounds(paddle_index, paddle_count, board_width).center();
    let half = paddle_width * 0.5;
    clamp_span(center, half, board_width - half)
}

/// Which lane `x` falls into
pub fn lane_index_for_x(x: f32, paddle_count: usize, board_width: f32) -> usize {
    let count = paddle_count.max(1);
    if board_width <= 0.0 || !x.is_finite() {
        return 0;
    }
    let slice = board_width / count as f32;
    ((x / slice).floor().max(0.0) as usize).min(count - 1)
}
