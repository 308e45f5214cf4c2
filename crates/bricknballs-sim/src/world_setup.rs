//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the launcher singleton, the ball, the out-of-bounds trigger,
//! walls and the brick grid with their component bundles.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bricknballs_core::components::*;
use bricknballs_core::constants::OUT_OF_BOUNDS_OFFSET;
use bricknballs_core::types::{PhysicsVelocity, Transform};

use crate::config::{BrickLayout, SimConfig};

/// Handles created by [`setup_session`].
#[derive(Debug, Clone)]
pub struct SessionEntities {
    pub launcher: Entity,
    pub ball: Entity,
    pub out_of_bounds: Entity,
    pub walls: Vec<Entity>,
    pub bricks: Vec<(BrickSlot, Entity)>,
}

impl SessionEntities {
    /// Brick spawned into a grid slot, if it was ever spawned.
    pub fn brick_at(&self, row: u32, column: u32) -> Option<Entity> {
        self.bricks
            .iter()
            .find(|(slot, _)| slot.row == row && slot.column == column)
            .map(|(_, entity)| *entity)
    }
}

/// Populate an empty world for a new session.
pub fn setup_session(
    world: &mut World,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> SessionEntities {
    let launcher = spawn_launcher(world, config.launcher_position, config.launch_speed);
    let ball = spawn_ball(world, config.launcher_position);
    let out_of_bounds = spawn_out_of_bounds(world, config.launcher_position.y);
    let walls = spawn_walls(world, config);
    let bricks = spawn_brick_layout(world, &config.brick_layout, rng);

    SessionEntities {
        launcher,
        ball,
        out_of_bounds,
        walls,
        bricks,
    }
}

/// Spawn the launcher singleton, ready to fire straight up.
pub fn spawn_launcher(world: &mut World, position: Vec3, launch_speed: f32) -> Entity {
    world.spawn((
        Launcher,
        LauncherPosition { value: position },
        BallInitialVelocity {
            value: Vec3::Y * launch_speed,
        },
        LaunchState {
            ready_to_launch: true,
        },
    ))
}

/// Spawn a ball resting at `position`.
pub fn spawn_ball(world: &mut World, position: Vec3) -> Entity {
    world.spawn((BallTag, Transform::at(position), PhysicsVelocity::default()))
}

/// Spawn the trigger volume below the launcher.
pub fn spawn_out_of_bounds(world: &mut World, launcher_y: f32) -> Entity {
    world.spawn((
        OutOfBoundsTrigger,
        Transform::at(Vec3::new(0.0, launcher_y - OUT_OF_BOUNDS_OFFSET, 0.0)),
    ))
}

/// Spawn left, right and top walls around the play field.
pub fn spawn_walls(world: &mut World, config: &SimConfig) -> Vec<Entity> {
    let layout = &config.brick_layout;
    let top = layout.origin.y + layout.spacing.y * 2.0;
    let mid = (top + config.launcher_position.y) * 0.5;
    let margin = layout.spacing.x;

    [
        Vec3::new(config.launcher_min_x - margin, mid, 0.0),
        Vec3::new(config.launcher_max_x + margin, mid, 0.0),
        Vec3::new(0.0, top, 0.0),
    ]
    .into_iter()
    .map(|position| world.spawn((WallTag, Transform::at(position))))
    .collect()
}

/// Spawn one brick with a baked initial health.
pub fn spawn_brick(world: &mut World, position: Vec3, slot: BrickSlot, health: i32) -> Entity {
    world.spawn((
        BrickTag,
        BrickHealth {
            value: health.max(1),
        },
        slot,
        Transform::at(position),
    ))
}

/// Spawn the configured brick grid, centred horizontally on the layout origin.
pub fn spawn_brick_layout(
    world: &mut World,
    layout: &BrickLayout,
    rng: &mut ChaCha8Rng,
) -> Vec<(BrickSlot, Entity)> {
    let mut bricks = Vec::with_capacity((layout.rows * layout.columns) as usize);
    let half_width = (layout.columns.saturating_sub(1)) as f32 * layout.spacing.x * 0.5;

    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let position = layout.origin
                + Vec3::new(
                    column as f32 * layout.spacing.x - half_width,
                    -(row as f32) * layout.spacing.y,
                    0.0,
                );
            let slot = BrickSlot { row, column };
            let health = roll_health(layout, rng);
            bricks.push((slot, spawn_brick(world, position, slot, health)));
        }
    }
    bricks
}

/// Despawn every brick entity. Returns how many were removed.
pub fn despawn_bricks(world: &mut World) -> usize {
    let bricks: Vec<Entity> = world
        .query::<&BrickTag>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for &entity in &bricks {
        let _ = world.despawn(entity);
    }
    bricks.len()
}

fn roll_health(layout: &BrickLayout, rng: &mut ChaCha8Rng) -> i32 {
    if layout.randomize_health {
        let min = layout.min_health.max(1);
        let max = layout.max_health.max(min);
        rng.gen_range(min..=max)
    } else {
        layout.fixed_health.max(1)
    }
}
