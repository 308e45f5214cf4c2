//! Game rules for Brick'n'Balls.
//!
//! Pure state machines for brick health, shot limit, launch readiness and
//! score keeping. No ECS dependency: everything here operates on plain data
//! and reports state deltas into an outbound `GameEvent` list.

pub mod brick;
pub mod launch;
pub mod score;
pub mod shot_limit;

pub use bricknballs_core as core;
