//! Deferred mutation applier: returns fallen balls to the launcher.
//!
//! Runs strictly after the physics step, so transforms and velocities can be
//! written directly. Every recycled ball releases the in-flight lock and
//! produces exactly one ball-lost signal.

use hecs::{Entity, World};
use tracing::debug;

use bricknballs_core::components::{
    BallRecycleRequest, BallTag, LaunchState, LauncherPosition,
};
use bricknballs_core::types::{PhysicsVelocity, Transform};

use crate::bridge::EventBridge;
use crate::error::SimError;

/// Apply all pending recycle requests. Returns the number of balls recycled.
/// Uses a caller-owned buffer to avoid per-step allocation.
pub fn run(
    world: &mut World,
    launcher: Entity,
    bridge: &EventBridge,
    recycled: &mut Vec<Entity>,
) -> Result<usize, SimError> {
    recycled.clear();

    // Resolve every launcher part first; a broken launcher leaves requests pending.
    let launcher_position = world
        .get::<&LauncherPosition>(launcher)
        .map(|pos| pos.value)
        .map_err(|_| SimError::LauncherMissing("no LauncherPosition"))?;
    if world.get::<&LaunchState>(launcher).is_err() {
        return Err(SimError::LauncherMissing("no LaunchState"));
    }

    for (entity, (transform, velocity, _ball, _request)) in world.query_mut::<(
        &mut Transform,
        &mut PhysicsVelocity,
        &BallTag,
        &BallRecycleRequest,
    )>() {
        velocity.stop();
        transform.position = launcher_position;
        recycled.push(entity);
    }

    for &entity in recycled.iter() {
        let _ = world.remove_one::<BallRecycleRequest>(entity);
    }

    let count = recycled.len();
    if count == 0 {
        return Ok(0);
    }

    if let Ok(mut state) = world.get::<&mut LaunchState>(launcher) {
        state.ready_to_launch = true;
    }

    let mut signalled = 0;
    for _ in 0..count {
        if bridge.enqueue_ball_lost() {
            signalled += 1;
        }
    }
    debug!(count, signalled, "balls recycled to launcher");

    Ok(count)
}
