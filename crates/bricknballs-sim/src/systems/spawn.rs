//! Spawn application for the launch path.
//!
//! When the launcher carries a `BallSpawnRequest`, every ball is moved to the
//! launcher and given the stored launch velocity, then the request is cleared.

use hecs::{Entity, World};
use tracing::debug;

use bricknballs_core::components::{
    BallInitialVelocity, BallSpawnRequest, BallTag, LauncherPosition,
};
use bricknballs_core::types::{PhysicsVelocity, Transform};

/// Apply a pending spawn request. Returns the number of balls launched.
pub fn run(world: &mut World, launcher: Entity) -> usize {
    if world.get::<&BallSpawnRequest>(launcher).is_err() {
        return 0;
    }

    let parts = {
        let position = world.get::<&LauncherPosition>(launcher).map(|p| p.value);
        let velocity = world.get::<&BallInitialVelocity>(launcher).map(|v| v.value);
        position.ok().zip(velocity.ok())
    };
    let _ = world.remove_one::<BallSpawnRequest>(launcher);

    let Some((position, velocity)) = parts else {
        return 0;
    };

    let mut launched = 0;
    for (_entity, (transform, ball_velocity, _ball)) in
        world.query_mut::<(&mut Transform, &mut PhysicsVelocity, &BallTag)>()
    {
        transform.position = position;
        ball_velocity.linear = velocity;
        ball_velocity.angular = glam::Vec3::ZERO;
        launched += 1;
    }

    debug!(launched, ?velocity, "ball spawn applied");
    launched
}
