//! Game state snapshot: the complete visible state handed to presentation each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EntityId, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u32,
    pub shots: ShotsView,
    /// Bricks still tracked by the registry.
    pub bricks_remaining: usize,
    pub launcher: LauncherView,
    pub balls: Vec<BallView>,
    /// Notifications raised during this tick, in order.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShotsView {
    pub used: u32,
    pub max: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LauncherView {
    pub position: Vec3,
    pub phase: LaunchPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// A recycle is pending for this ball.
    pub recycling: bool,
}
