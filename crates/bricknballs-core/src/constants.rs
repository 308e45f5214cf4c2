//! Simulation constants and tuning parameters.

// --- Scoring / damage ---

/// Points awarded for every brick hit that is not ignored.
pub const POINTS_PER_HIT: u32 = 1;

/// Damage applied to a brick per hit.
pub const DAMAGE_PER_HIT: i32 = 1;

// --- Shot limit ---

/// Shots available per run.
pub const DEFAULT_MAX_SHOTS: u32 = 5;

// --- Launcher ---

/// Launch speed used when the aim vector is degenerate (units/s).
pub const DEFAULT_LAUNCH_SPEED: f32 = 6.0;

/// Aim vectors shorter than this (squared) fall back to straight up.
pub const MIN_AIM_LENGTH_SQ: f32 = 0.0001;

/// Default launcher spawn point.
pub const DEFAULT_LAUNCHER_X: f32 = 0.0;
pub const DEFAULT_LAUNCHER_Y: f32 = -4.0;

/// Horizontal movement bounds for the launcher.
pub const LAUNCHER_MIN_X: f32 = -7.5;
pub const LAUNCHER_MAX_X: f32 = 7.5;

// --- Out of bounds ---

/// A ball must be at least this far below the launcher before an
/// out-of-bounds overlap counts as a loss.
pub const MIN_FALL_DISTANCE_BELOW_LAUNCHER: f32 = 0.10;

/// Vertical offset of the out-of-bounds trigger below the launcher.
pub const OUT_OF_BOUNDS_OFFSET: f32 = 1.5;

// --- Brick layout ---

pub const DEFAULT_BRICK_ROWS: u32 = 4;
pub const DEFAULT_BRICK_COLUMNS: u32 = 8;

/// Distance between neighbouring brick centres.
pub const BRICK_SPACING_X: f32 = 1.6;
pub const BRICK_SPACING_Y: f32 = 0.6;

/// Centre of the top brick row.
pub const BRICK_ORIGIN_Y: f32 = 3.5;

/// Health range when randomizing brick health (inclusive).
pub const BRICK_MIN_HEALTH: i32 = 1;
pub const BRICK_MAX_HEALTH: i32 = 3;

// --- Detection workers ---

/// Upper bound on parallel detection workers.
pub const MAX_DETECTION_WORKERS: usize = 8;

/// Contact events per worker before detection is split across threads.
pub const MIN_EVENTS_PER_WORKER: usize = 256;
