//! Snapshot system: builds the per-tick GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use bricknballs_core::components::{BallRecycleRequest, BallTag, LaunchState, LauncherPosition};
use bricknballs_core::enums::GamePhase;
use bricknballs_core::events::GameEvent;
use bricknballs_core::state::*;
use bricknballs_core::types::{PhysicsVelocity, SimTime, Transform};
use bricknballs_rules::launch::phase_from_ready;
use bricknballs_rules::score::ScoreBoard;
use bricknballs_rules::shot_limit::ShotLimit;

use crate::entity_id;
use crate::registry::BrickRegistry;

/// Game-state collaborators read by the snapshot.
pub struct SnapshotSources<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub launcher: Option<Entity>,
    pub score: &'a ScoreBoard,
    pub shots: &'a ShotLimit,
    pub registry: &'a BrickRegistry,
}

/// Build a complete GameStateSnapshot from the current world and rule state.
pub fn build_snapshot(
    world: &World,
    sources: SnapshotSources<'_>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: sources.time,
        phase: sources.phase,
        score: sources.score.score(),
        shots: ShotsView {
            used: sources.shots.shots_used(),
            max: sources.shots.max_shots(),
            remaining: sources.shots.shots_remaining(),
        },
        bricks_remaining: sources.registry.active_brick_count(),
        launcher: build_launcher(world, sources.launcher),
        balls: build_balls(world),
        events,
    }
}

fn build_launcher(world: &World, launcher: Option<Entity>) -> LauncherView {
    let Some(launcher) = launcher else {
        return LauncherView::default();
    };
    let position = world
        .get::<&LauncherPosition>(launcher)
        .map(|pos| pos.value)
        .unwrap_or_default();
    let ready = world
        .get::<&LaunchState>(launcher)
        .map(|state| state.ready_to_launch)
        .unwrap_or(true);
    LauncherView {
        position,
        phase: phase_from_ready(ready),
    }
}

fn build_balls(world: &World) -> Vec<BallView> {
    let mut balls: Vec<BallView> = world
        .query::<(
            &BallTag,
            &Transform,
            &PhysicsVelocity,
            Option<&BallRecycleRequest>,
        )>()
        .iter()
        .map(|(entity, (_ball, transform, velocity, request))| BallView {
            id: entity_id(entity),
            position: transform.position,
            velocity: velocity.linear,
            recycling: request.is_some(),
        })
        .collect();
    balls.sort_by_key(|ball| ball.id);
    balls
}
