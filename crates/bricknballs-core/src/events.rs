//! Notifications emitted by the game-state layer for presentation.
//!
//! The presentation layer polls these once per tick from the snapshot;
//! nothing is delivered through callbacks.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// State deltas raised while consuming facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A brick lost health.
    DamageTaken {
        brick: EntityId,
        damage: i32,
        remaining: i32,
    },
    /// A brick was hit; `remaining` is its health after the hit.
    BrickHit { brick: EntityId, remaining: i32 },
    /// A brick reached zero health and was removed.
    BrickDestroyed { brick: EntityId, max_health: i32 },
    /// Score value changed.
    ScoreChanged { score: u32 },
    /// Shot counter or limit changed.
    ShotsChanged { shots_used: u32, max_shots: u32 },
    /// A launch was accepted.
    BallLaunched { shots_used: u32 },
    /// A ball fell out of bounds and was returned to the launcher.
    BallLost,
    /// Terminal notification, raised once per run.
    GameOver,
}
