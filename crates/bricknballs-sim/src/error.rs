//! Error types for the simulation crate.
//!
//! Expected steady-state refusals (launch while in flight, hits on destroyed
//! bricks, ...) are outcomes, not errors. These cover real failures.

use thiserror::Error;

/// Failures inside the simulation that abandon the current operation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The launcher singleton (or one of its parts) is gone.
    #[error("launcher singleton is missing: {0}")]
    LauncherMissing(&'static str),
    /// An entity handle did not resolve to a live entity.
    #[error("no such entity: {0:?}")]
    NoSuchEntity(hecs::Entity),
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("damage_per_hit must be positive, got {0}")]
    NonPositiveDamage(i32),
    #[error("recycle_margin must be finite and non-negative, got {0}")]
    InvalidRecycleMargin(f32),
    #[error("launcher bounds are inverted: min_x {min_x} > max_x {max_x}")]
    InvertedLauncherBounds { min_x: f32, max_x: f32 },
    #[error("launch_speed must be positive, got {0}")]
    NonPositiveLaunchSpeed(f32),
    #[error("brick health range is inverted: min {min} > max {max}")]
    InvertedHealthRange { min: i32, max: i32 },
}

