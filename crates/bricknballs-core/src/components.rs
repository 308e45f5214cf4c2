//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems and in the rules crate, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Marks an entity as a ball.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallTag;

/// Marks an entity as a brick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BrickTag;

/// Marks the static out-of-bounds trigger region below the play field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutOfBoundsTrigger;

/// Marks a static wall collider. Walls never produce facts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WallTag;

/// Initial health baked into a brick at creation.
/// Live health is tracked by the brick registry, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BrickHealth {
    pub value: i32,
}

/// Grid slot a brick was spawned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickSlot {
    pub row: u32,
    pub column: u32,
}

// --- Launcher singleton ---

/// Marks the launcher singleton.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Launcher;

/// Current launcher (and aim origin) position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LauncherPosition {
    pub value: Vec3,
}

/// Velocity imparted on the ball by the next spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallInitialVelocity {
    pub value: Vec3,
}

/// Whether the launcher may fire. `false` means a ball is in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LaunchState {
    pub ready_to_launch: bool,
}

// --- Request markers ---

/// Attached to the launcher when a launch was accepted; consumed by the spawn system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallSpawnRequest;

/// Attached to a ball that fell out of bounds; consumed after the physics step.
/// A component slot holds at most one, so insertion is idempotent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallRecycleRequest;
