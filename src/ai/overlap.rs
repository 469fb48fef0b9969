//! Horizontal overlap resolution between paddles
//!
//! Strictly sequential: indices are sorted by x once, then swept left to
//! right, so each paddle's correction sees the already-corrected position of
//! its left neighbor. Human paddles are never moved.

use crate::sim::Paddle;
use crate::sim::state::clamp_span;

/// Remove horizontal overlap between adjacent paddles where at least one is AI.
///
/// Runs only when two or more paddles are AI-controlled. Pass order:
/// 1. primary sweep (AI/AI pairs split the correction, AI/human pairs move the AI)
/// 2. clamp AI paddles to the board
/// 3. corrective sweep that packs each run of AI paddles between its human
///    (or wall) anchors, which removes anything the clamp reintroduced
pub fn resolve_overlaps(paddles: &mut [Paddle], is_ai: &[bool], board_width: f32, gap: f32) {
    let n = paddles.len();
    let ai = |i: usize| is_ai.get(i).copied().unwrap_or(false);
    if (0..n).filter(|&i| ai(i)).count() < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        paddles[a]
            .pos
            .x
            .total_cmp(&paddles[b].pos.x)
            .then(a.cmp(&b))
    });

    for w in order.windows(2) {
        let (prev, next) = (w[0], w[1]);
        let (prev_ai, next_ai) = (ai(prev), ai(next));
        if !prev_ai && !next_ai {
            continue;
        }

        let required = paddles[prev].half_width() + gap + paddles[next].half_width();
        let overlap = required - (paddles[next].pos.x - paddles[prev].pos.x);
        if overlap <= 0.0 {
            continue;
        }

        if prev_ai && next_ai {
            paddles[prev].pos.x -= overlap * 0.5;
            paddles[next].pos.x += overlap * 0.5;
        } else if next_ai {
            paddles[next].pos.x += overlap;
        } else {
            paddles[prev].pos.x -= overlap;
        }
    }

    for (i, paddle) in paddles.iter_mut().enumerate() {
        if ai(i) {
            let half = paddle.half_width();
            paddle.pos.x = clamp_span(paddle.pos.x, half, board_width - half);
        }
    }

    corrective_sweep(paddles, &order, &ai, board_width, gap);
}

/// Pack each maximal run of AI paddles (in `order`) between its anchors
fn corrective_sweep(
    paddles: &mut [Paddle],
    order: &[usize],
    ai: &impl Fn(usize) -> bool,
    board_width: f32,
    gap: f32,
) {
    let n = order.len();
    let mut start = 0;
    while start < n {
        if !ai(order[start]) {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < n && ai(order[end]) {
            end += 1;
        }

        let left_limit = if start > 0 {
            paddles[order[start - 1]].right() + gap
        } else {
            0.0
        };
        let right_limit = if end < n {
            paddles[order[end]].left() - gap
        } else {
            board_width
        };

        // Push right to satisfy the left anchor and spacing
        for k in start..end {
            let i = order[k];
            let lo = if k == start {
                left_limit + paddles[i].half_width()
            } else {
                let p = order[k - 1];
                paddles[p].pos.x + paddles[p].half_width() + gap + paddles[i].half_width()
            };
            paddles[i].pos.x = paddles[i].pos.x.max(lo);
        }

        // Push left to satisfy the right anchor without breaking spacing
        for k in (start..end).rev() {
            let i = order[k];
            let hi = if k + 1 == end {
                right_limit - paddles[i].half_width()
            } else {
                let q = order[k + 1];
                paddles[q].pos.x - paddles[q].half_width() - gap - paddles[i].half_width()
            };
            paddles[i].pos.x = paddles[i].pos.x.min(hi);
        }

        // Infeasible runs still end up on the board
        for &i in &order[start..end] {
            let half = paddles[i].half_width();
            paddles[i].pos.x = clamp_span(paddles[i].pos.x, half, board_width - half);
        }

        start = end;
    }
}
