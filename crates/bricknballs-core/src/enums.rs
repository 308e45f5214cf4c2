//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Overall game flow phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Steps run and facts are consumed.
    #[default]
    Playing,
    /// Physics is halted; commands are still processed.
    Paused,
    /// Shot limit exhausted and the last ball lost. Latched until reset.
    GameOver,
}

/// Kind of a pairwise fact reported by the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Solid-solid contact.
    Collision,
    /// Overlap with a trigger volume.
    Trigger,
}

/// Ball/launcher lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchPhase {
    #[default]
    ReadyToLaunch,
    InFlight,
}

/// Brick health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickPhase {
    Alive,
    /// Terminal.
    Destroyed,
}

/// Result of a launch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchOutcome {
    /// Shot consumed, spawn requested.
    Accepted,
    /// A ball is already in flight.
    RejectedInFlight,
    /// No shots left.
    RejectedShotLimit,
}
