//! Board model and sandbox host
//!
//! `state` holds the snapshot types the director reads each tick. `tick` is a
//! small deterministic host used by the demo binary and end-to-end tests:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (roster index)

pub mod state;
pub mod tick;

pub use state::{Ball, BallState, Board, Brick, Paddle, PlayerSlot, Rect};
pub use tick::{
    SandboxConfig, TickStats, advance_balls, apply_commands, build_board, generate_wall, tick,
};
