//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one step)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Field, WallHits, bounce_off_walls, impact_factor, is_below_field, reflect};
pub use rect::{GeometryError, Rect, Side, classify};
pub use schedule::{Clock, FixedStep, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use schedule::SystemClock;
pub use state::{
    Award, Ball, Block, Direction, GameEvent, InputEvent, MatchError, MatchPhase, MatchState,
    MatchSummary, MoveOutcome, Paddle, Player, PlayerId, PlayerScore,
};
pub use tick::{autopilot, generate_blocks, tick};
