//! Autonomous paddle controller
//!
//! Runs synchronously once per simulation tick. Per-paddle steering, attack
//! planning and serving happen first; the overlap resolver is a separate,
//! strictly sequential phase the host calls after applying movement.

pub mod attack;
pub mod director;
pub mod lanes;
pub mod overlap;
pub mod prediction;
pub mod serve;
pub mod state;
pub mod steering;
pub mod threat;

pub use attack::{choose_brick, plan_attack, serve_offset_for_brick};
pub use director::{Director, PaddleCommand};
pub use lanes::{Lane, lane_anchor_x, lane_bounds, lane_index_for_x};
pub use overlap::resolve_overlaps;
pub use prediction::{predict_x_at_line, time_to_row};
pub use serve::{serve_delay_for, should_auto_serve};
pub use state::{AiPaddleState, AiStateStore};
pub use steering::{SteerInput, steer};
pub use threat::choose_ball;
