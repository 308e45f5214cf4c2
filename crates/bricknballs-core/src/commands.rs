//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary, so they
//! never interleave with a partially processed drain.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Launcher ---
    /// Launch the ball with an externally computed aim velocity.
    Launch { velocity: Vec3 },
    /// Move the launcher horizontally (clamped to the configured bounds).
    SetLauncherPosition { x: f32 },

    // --- Rules ---
    /// Change the shot limit for the current run.
    SetMaxShots { max_shots: u32 },

    // --- Game flow ---
    /// Halt the simulation.
    Pause,
    /// Resume after a pause.
    Resume,
    /// Start a fresh run: clears score, shots, queues and rebuilds the bricks.
    ResetGame,
}
