//! Session configuration.
//!
//! Every field has a default from `bricknballs_core::constants`, so a JSON
//! config only needs to name the values it overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use bricknballs_core::constants::*;

use crate::error::ConfigError;

/// Configuration for starting a new simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for brick health rolls. Same seed = same layout.
    pub seed: u64,
    /// Shots available per run.
    pub max_shots: u32,
    /// Score awarded per accepted brick hit.
    pub points_per_hit: u32,
    /// Health removed per brick hit.
    pub damage_per_hit: i32,
    /// Distance a ball must fall below the launcher before an
    /// out-of-bounds overlap counts as a loss.
    pub recycle_margin: f32,
    /// Detection worker threads. 0 = pick from available parallelism.
    pub detection_workers: usize,
    /// Contact events per worker before detection is split.
    pub parallel_threshold: usize,
    /// Fallback launch speed for degenerate aim vectors.
    pub launch_speed: f32,
    /// Launcher spawn point.
    pub launcher_position: Vec3,
    pub launcher_min_x: f32,
    pub launcher_max_x: f32,
    pub brick_layout: BrickLayout,
}

/// Brick grid spawned at session start and on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickLayout {
    pub rows: u32,
    pub columns: u32,
    pub spacing: Vec3,
    /// Centre of the top row.
    pub origin: Vec3,
    /// Roll each brick's health uniformly in `min_health..=max_health`.
    pub randomize_health: bool,
    pub min_health: i32,
    pub max_health: i32,
    /// Health used when `randomize_health` is false.
    pub fixed_health: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_shots: DEFAULT_MAX_SHOTS,
            points_per_hit: POINTS_PER_HIT,
            damage_per_hit: DAMAGE_PER_HIT,
            recycle_margin: MIN_FALL_DISTANCE_BELOW_LAUNCHER,
            detection_workers: 0,
            parallel_threshold: MIN_EVENTS_PER_WORKER,
            launch_speed: DEFAULT_LAUNCH_SPEED,
            launcher_position: Vec3::new(DEFAULT_LAUNCHER_X, DEFAULT_LAUNCHER_Y, 0.0),
            launcher_min_x: LAUNCHER_MIN_X,
            launcher_max_x: LAUNCHER_MAX_X,
            brick_layout: BrickLayout::default(),
        }
    }
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: DEFAULT_BRICK_ROWS,
            columns: DEFAULT_BRICK_COLUMNS,
            spacing: Vec3::new(BRICK_SPACING_X, BRICK_SPACING_Y, 0.0),
            origin: Vec3::new(0.0, BRICK_ORIGIN_Y, 0.0),
            randomize_health: true,
            min_health: BRICK_MIN_HEALTH,
            max_health: BRICK_MAX_HEALTH,
            fixed_health: 1,
        }
    }
}

impl SimConfig {
    /// Check values the rules cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.damage_per_hit <= 0 {
            return Err(ConfigError::NonPositiveDamage(self.damage_per_hit));
        }
        if !self.recycle_margin.is_finite() || self.recycle_margin < 0.0 {
            return Err(ConfigError::InvalidRecycleMargin(self.recycle_margin));
        }
        if self.launch_speed.is_nan() || self.launch_speed <= 0.0 {
            return Err(ConfigError::NonPositiveLaunchSpeed(self.launch_speed));
        }
        if self.launcher_min_x > self.launcher_max_x {
            return Err(ConfigError::InvertedLauncherBounds {
                min_x: self.launcher_min_x,
                max_x: self.launcher_max_x,
            });
        }
        let layout = &self.brick_layout;
        if layout.randomize_health && layout.min_health > layout.max_health {
            return Err(ConfigError::InvertedHealthRange {
                min: layout.min_health,
                max: layout.max_health,
            });
        }
        Ok(())
    }

    /// Number of detection workers to use for a step with `event_count` facts.
    pub fn workers_for(&self, event_count: usize) -> usize {
        let ceiling = if self.detection_workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(MAX_DETECTION_WORKERS)
        } else {
            self.detection_workers
        };
        let per_worker = self.parallel_threshold.max(1);
        (event_count / per_worker).clamp(1, ceiling.max(1))
    }
}
