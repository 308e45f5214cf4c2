//! Launcher singleton access and the launch gate.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::debug;

use bricknballs_core::components::*;
use bricknballs_core::constants::MIN_AIM_LENGTH_SQ;
use bricknballs_core::enums::{LaunchOutcome, LaunchPhase};
use bricknballs_core::events::GameEvent;
use bricknballs_rules::launch::{evaluate_launch, phase_after_launch, phase_from_ready};
use bricknballs_rules::shot_limit::ShotLimit;

use crate::error::SimError;

/// Find the launcher singleton, if one exists.
pub fn find(world: &World) -> Option<Entity> {
    world
        .query::<&Launcher>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
}

/// Current launcher position.
pub fn position(world: &World, launcher: Entity) -> Result<Vec3, SimError> {
    world
        .get::<&LauncherPosition>(launcher)
        .map(|pos| pos.value)
        .map_err(|_| SimError::LauncherMissing("no LauncherPosition"))
}

/// Whether the launcher may fire.
pub fn is_ready(world: &World, launcher: Entity) -> Result<bool, SimError> {
    world
        .get::<&LaunchState>(launcher)
        .map(|state| state.ready_to_launch)
        .map_err(|_| SimError::LauncherMissing("no LaunchState"))
}

/// Velocity to impart for an aim vector. Degenerate aims launch straight up.
pub fn launch_velocity(aim: Vec3, fallback_speed: f32) -> Vec3 {
    if aim.length_squared() < MIN_AIM_LENGTH_SQ || !aim.is_finite() {
        Vec3::Y * fallback_speed
    } else {
        aim
    }
}

/// Try to launch: readiness first, then the shot limit. On acceptance the
/// launcher goes in flight, stores the launch velocity, and gets a spawn request.
pub fn request_launch(
    world: &mut World,
    launcher: Entity,
    aim: Vec3,
    fallback_speed: f32,
    shots: &mut ShotLimit,
    events: &mut Vec<GameEvent>,
) -> Result<LaunchOutcome, SimError> {
    if !world.contains(launcher) {
        return Err(SimError::NoSuchEntity(launcher));
    }

    let phase = phase_from_ready(is_ready(world, launcher)?);
    let outcome = evaluate_launch(phase, shots, events);
    if outcome != LaunchOutcome::Accepted {
        debug!(?outcome, "launch rejected");
        return Ok(outcome);
    }

    let velocity = launch_velocity(aim, fallback_speed);
    let ready_to_launch = phase_after_launch(phase, outcome) == LaunchPhase::ReadyToLaunch;
    world
        .insert(
            launcher,
            (
                LaunchState { ready_to_launch },
                BallInitialVelocity { value: velocity },
                BallSpawnRequest,
            ),
        )
        .map_err(|_| SimError::NoSuchEntity(launcher))?;

    debug!(?velocity, shots_used = shots.shots_used(), "launch accepted");
    Ok(outcome)
}

/// Move the launcher horizontally, clamped to `[min_x, max_x]`.
pub fn set_x(
    world: &mut World,
    launcher: Entity,
    x: f32,
    min_x: f32,
    max_x: f32,
) -> Result<(), SimError> {
    let mut pos = world
        .get::<&mut LauncherPosition>(launcher)
        .map_err(|_| SimError::LauncherMissing("no LauncherPosition"))?;
    pos.value.x = x.clamp(min_x, max_x);
    Ok(())
}

/// Mark the launcher ready and drop any pending spawn request.
pub fn make_ready(world: &mut World, launcher: Entity) -> Result<(), SimError> {
    world
        .insert_one(launcher, LaunchState { ready_to_launch: true })
        .map_err(|_| SimError::NoSuchEntity(launcher))?;
    let _ = world.remove_one::<BallSpawnRequest>(launcher);
    Ok(())
}

/// Re-insert whichever launcher parts are missing, keeping the ones present.
/// Returns how many parts were restored.
pub fn repair(
    world: &mut World,
    launcher: Entity,
    position: Vec3,
    launch_speed: f32,
) -> Result<usize, SimError> {
    let mut restored = 0;
    if world.get::<&Launcher>(launcher).is_err() {
        world
            .insert_one(launcher, Launcher)
            .map_err(|_| SimError::NoSuchEntity(launcher))?;
        restored += 1;
    }
    if world.get::<&LauncherPosition>(launcher).is_err() {
        world
            .insert_one(launcher, LauncherPosition { value: position })
            .map_err(|_| SimError::NoSuchEntity(launcher))?;
        restored += 1;
    }
    if world.get::<&BallInitialVelocity>(launcher).is_err() {
        let value = Vec3::Y * launch_speed;
        world
            .insert_one(launcher, BallInitialVelocity { value })
            .map_err(|_| SimError::NoSuchEntity(launcher))?;
        restored += 1;
    }
    if world.get::<&LaunchState>(launcher).is_err() {
        world
            .insert_one(launcher, LaunchState { ready_to_launch: true })
            .map_err(|_| SimError::NoSuchEntity(launcher))?;
        restored += 1;
    }
    Ok(restored)
}
