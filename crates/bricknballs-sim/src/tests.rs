//! Tests for the event bridge, detection, deferred mutation, registry and engine.

use glam::Vec3;
use hecs::Entity;

use bricknballs_core::commands::PlayerCommand;
use bricknballs_core::components::{BallRecycleRequest, BallTag, LaunchState};
use bricknballs_core::enums::{GamePhase, LaunchPhase};
use bricknballs_core::events::GameEvent;
use bricknballs_core::types::{PhysicsVelocity, Transform};
use bricknballs_rules::score::ScoreBoard;

use crate::bridge::EventBridge;
use crate::config::{BrickLayout, SimConfig};
use crate::contact::ContactPair;
use crate::engine::SimulationEngine;
use crate::error::ConfigError;
use crate::registry::{BrickRegistry, HitOutcome};
use crate::systems::collision::{self, DetectionParams, Fact};
use crate::systems::recycle;
use crate::world_setup;
use crate::{entity_id, launcher};

// ---- Helpers ----

fn config_with(rows: u32, columns: u32, health: i32, max_shots: u32) -> SimConfig {
    SimConfig {
        max_shots,
        brick_layout: BrickLayout {
            rows,
            columns,
            randomize_health: false,
            fixed_health: health,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn engine(config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config).unwrap()
}

fn first_brick(engine: &SimulationEngine) -> Entity {
    engine.session().brick_at(0, 0).unwrap()
}

fn hit(engine: &SimulationEngine, brick: Entity) -> ContactPair {
    ContactPair::collision(engine.session().ball, brick)
}

fn fall(engine: &SimulationEngine) -> ContactPair {
    ContactPair::trigger(engine.session().out_of_bounds, engine.session().ball)
}

fn place_ball(engine: &mut SimulationEngine, ball: Entity, position: Vec3) {
    let mut transform = engine.world_mut().get::<&mut Transform>(ball).unwrap();
    transform.position = position;
}

fn below_launcher(engine: &SimulationEngine, depth: f32) -> Vec3 {
    engine.config().launcher_position - Vec3::Y * depth
}

fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|&e| pred(e)).count()
}

fn launch(engine: &mut SimulationEngine) -> Vec<GameEvent> {
    engine.queue_command(PlayerCommand::Launch {
        velocity: Vec3::new(1.0, 6.0, 0.0),
    });
    engine.tick(&[]).events
}

fn lose_ball(engine: &mut SimulationEngine) -> Vec<GameEvent> {
    let ball = engine.session().ball;
    let pos = below_launcher(engine, 1.0);
    place_ball(engine, ball, pos);
    let contact = fall(engine);
    engine.tick(&[contact]).events
}

// ---- Event bridge ----

#[test]
fn test_bridge_lifecycle() {
    let mut bridge = EventBridge::new();
    assert!(!bridge.is_ready());
    assert!(!bridge.enqueue_ball_lost());
    assert!(!bridge.try_dequeue_ball_lost());

    assert!(bridge.init());
    assert!(!bridge.init(), "Second init must keep the existing queues");
    assert!(bridge.is_ready());
    assert!(bridge.enqueue_ball_lost());
    assert!(bridge.try_dequeue_ball_lost());
    assert!(!bridge.try_dequeue_ball_lost());

    bridge.teardown();
    assert!(!bridge.is_ready());
    assert!(!bridge.enqueue_ball_lost());
    assert_eq!(bridge.pending(), (0, 0));
}

#[test]
fn test_bridge_clear_then_dequeue_is_empty() {
    let mut world = hecs::World::new();
    let brick = world.spawn((1u8,));
    let bridge = EventBridge::initialized();
    for _ in 0..10 {
        bridge.enqueue_hit(brick);
        bridge.enqueue_ball_lost();
    }
    assert_eq!(bridge.pending(), (10, 10));

    bridge.clear();
    for _ in 0..100 {
        assert_eq!(bridge.try_dequeue_hit(), None);
        assert!(!bridge.try_dequeue_ball_lost());
    }
    bridge.clear();
    assert_eq!(bridge.pending(), (0, 0));
}

#[test]
fn test_bridge_is_fifo() {
    let mut world = hecs::World::new();
    let bricks: Vec<Entity> = (0..5).map(|i| world.spawn((i as u32,))).collect();
    let bridge = EventBridge::initialized();
    for &brick in &bricks {
        bridge.enqueue_hit(brick);
    }
    let drained: Vec<Entity> = std::iter::from_fn(|| bridge.try_dequeue_hit()).collect();
    assert_eq!(drained, bricks);
}

#[test]
fn test_bridge_many_producers_lose_nothing() {
    let mut world = hecs::World::new();
    let brick = world.spawn((0u8,));
    let bridge = EventBridge::initialized();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..1000 {
                    assert!(bridge.enqueue_hit(brick));
                    assert!(bridge.enqueue_ball_lost());
                }
            });
        }
    });

    let mut hits = 0;
    while bridge.try_dequeue_hit().is_some() {
        hits += 1;
    }
    let mut lost = 0;
    while bridge.try_dequeue_ball_lost() {
        lost += 1;
    }
    assert_eq!(hits, 8000);
    assert_eq!(lost, 8000);
}

// ---- Detection ----

#[test]
fn test_classify_pairs() {
    let engine = engine(config_with(1, 2, 1, 5));
    let world = engine.world();
    let session = engine.session();
    let brick = first_brick(&engine);
    let params = DetectionParams {
        launcher_y: Some(engine.config().launcher_position.y),
        recycle_margin: 0.1,
        workers: 1,
    };

    assert_eq!(
        collision::classify(world, &ContactPair::collision(brick, session.ball), &params),
        Fact::BrickHit(brick)
    );
    assert_eq!(
        collision::classify(world, &ContactPair::collision(session.ball, brick), &params),
        Fact::BrickHit(brick)
    );
    assert_eq!(
        collision::classify(world, &ContactPair::collision(session.ball, session.walls[0]), &params),
        Fact::Ignored
    );
    let other_brick = session.brick_at(0, 1).unwrap();
    assert_eq!(
        collision::classify(world, &ContactPair::collision(brick, other_brick), &params),
        Fact::Ignored
    );
    assert_eq!(
        collision::classify(world, &ContactPair::trigger(session.out_of_bounds, brick), &params),
        Fact::Ignored
    );
}

#[test]
fn test_loss_guard_near_launcher() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let ball = engine.session().ball;
    let launcher_y = engine.config().launcher_position.y;
    let contact = fall(&engine);

    let params = DetectionParams {
        launcher_y: Some(launcher_y),
        recycle_margin: 0.1,
        workers: 1,
    };

    // Resting at the launcher: overlap does not count.
    assert_eq!(collision::classify(engine.world(), &contact, &params), Fact::Suppressed);

    // Inside the margin band.
    place_ball(&mut engine, ball, Vec3::new(0.0, launcher_y - 0.05, 0.0));
    assert_eq!(collision::classify(engine.world(), &contact, &params), Fact::Suppressed);

    place_ball(&mut engine, ball, Vec3::new(0.0, launcher_y - 0.5, 0.0));
    assert_eq!(collision::classify(engine.world(), &contact, &params), Fact::BallLost(ball));

    // No launcher height known: never a loss.
    let blind = DetectionParams {
        launcher_y: None,
        ..params
    };
    assert_eq!(collision::classify(engine.world(), &contact, &blind), Fact::Suppressed);
}

#[test]
fn test_thousand_overlaps_make_one_recycle_request() {
    let mut engine = engine(SimConfig {
        detection_workers: 4,
        parallel_threshold: 10,
        ..config_with(1, 1, 1, 5)
    });
    let ball = engine.session().ball;
    let pos = below_launcher(&engine, 1.0);
    place_ball(&mut engine, ball, pos);

    let contacts = vec![fall(&engine); 1000];
    let params = DetectionParams {
        launcher_y: Some(engine.config().launcher_position.y),
        recycle_margin: engine.config().recycle_margin,
        workers: engine.config().workers_for(contacts.len()),
    };
    assert_eq!(params.workers, 4);

    let bridge = EventBridge::initialized();
    let mut detection = collision::run(engine.world(), &contacts, &bridge, params);
    assert_eq!(detection.commands.len(), 4, "One command buffer per worker");
    detection.flush(engine.world_mut());

    let pending = engine
        .world()
        .query::<(&BallTag, &BallRecycleRequest)>()
        .iter()
        .count();
    assert_eq!(pending, 1);

    let launcher = engine.session().launcher;
    let mut buffer = Vec::new();
    let recycled = recycle::run(engine.world_mut(), launcher, &bridge, &mut buffer).unwrap();
    assert_eq!(recycled, 1);
    assert_eq!(bridge.pending(), (0, 1), "Exactly one ball-lost signal");
}

#[test]
fn test_pending_request_suppresses_further_losses() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let ball = engine.session().ball;
    let pos = below_launcher(&engine, 1.0);
    place_ball(&mut engine, ball, pos);
    engine.world_mut().insert_one(ball, BallRecycleRequest).unwrap();

    let params = DetectionParams {
        launcher_y: Some(engine.config().launcher_position.y),
        recycle_margin: 0.1,
        workers: 1,
    };
    assert_eq!(
        collision::classify(engine.world(), &fall(&engine), &params),
        Fact::Suppressed
    );
}

#[test]
fn test_parallel_detection_matches_sequential() {
    let mut seq = engine(SimConfig {
        detection_workers: 1,
        ..config_with(2, 8, 1000, 5)
    });
    let mut par = engine(SimConfig {
        detection_workers: 6,
        parallel_threshold: 8,
        ..config_with(2, 8, 1000, 5)
    });

    let contacts_for = |engine: &SimulationEngine| -> Vec<ContactPair> {
        let bricks: Vec<Entity> = engine.session().bricks.iter().map(|(_, e)| *e).collect();
        (0..640).map(|i| hit(engine, bricks[i % bricks.len()])).collect()
    };
    let seq_contacts = contacts_for(&seq);
    let par_contacts = contacts_for(&par);

    let seq_snap = seq.tick(&seq_contacts);
    let par_snap = par.tick(&par_contacts);

    assert_eq!(seq_snap.score, 640);
    assert_eq!(par_snap.score, seq_snap.score);
    for (slot, brick) in &par.session().bricks {
        assert_eq!(
            par.registry().get(*brick).unwrap().health(),
            1000 - 40,
            "Brick {slot:?} should take 40 hits"
        );
    }
}

// ---- Deferred mutation ----

#[test]
fn test_recycle_moves_and_stops_ball() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    launch(&mut engine);
    assert!(!engine.is_ready_to_launch());

    let ball = engine.session().ball;
    let pos = below_launcher(&engine, 2.0);
    place_ball(&mut engine, ball, pos);
    let contact = fall(&engine);
    let snap = engine.tick(&[contact]);

    let world = engine.world();
    let transform = world.get::<&Transform>(ball).unwrap();
    let velocity = world.get::<&PhysicsVelocity>(ball).unwrap();
    assert_eq!(transform.position, engine.config().launcher_position);
    assert!(velocity.is_stopped());
    assert!(world.get::<&BallRecycleRequest>(ball).is_err());
    assert!(engine.is_ready_to_launch());
    assert_eq!(snap.launcher.phase, LaunchPhase::ReadyToLaunch);
    assert_eq!(count_events(&snap.events, |e| *e == GameEvent::BallLost), 1);
}

#[test]
fn test_multiple_balls_recycled_in_one_step_signal_each() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let pos = below_launcher(&engine, 1.0);
    let extra = world_setup::spawn_ball(engine.world_mut(), pos);
    let ball = engine.session().ball;
    place_ball(&mut engine, ball, pos);

    let oob = engine.session().out_of_bounds;
    let snap = engine.tick(&[
        ContactPair::trigger(oob, ball),
        ContactPair::trigger(extra, oob),
        ContactPair::trigger(oob, ball),
    ]);

    assert_eq!(count_events(&snap.events, |e| *e == GameEvent::BallLost), 2);
}

// ---- Brick registry ----

#[test]
fn test_brick_health_three_scenario() {
    let mut engine = engine(config_with(1, 2, 3, 5));
    let brick = first_brick(&engine);
    assert_eq!(engine.registry().active_brick_count(), 2);

    let contact = hit(&engine, brick);
    let snap = engine.tick(&[contact, contact]);
    assert_eq!(snap.score, 2);
    assert_eq!(engine.registry().get(brick).unwrap().health(), 1);
    assert!(engine.world().contains(brick));
    assert_eq!(
        count_events(&snap.events, |e| matches!(e, GameEvent::DamageTaken { .. })),
        2
    );

    let snap = engine.tick(&[contact]);
    assert_eq!(snap.score, 3);
    assert_eq!(engine.registry().active_brick_count(), 1);
    assert!(engine.registry().get(brick).is_none());
    assert!(!engine.world().contains(brick));
    assert!(snap.events.contains(&GameEvent::BrickDestroyed {
        brick: entity_id(brick),
        max_health: 3,
    }));
}

#[test]
fn test_hits_beyond_health_are_ignored() {
    for health in 1..=4 {
        for hits in 0..=6usize {
            let mut engine = engine(config_with(1, 1, health, 5));
            let brick = first_brick(&engine);
            let contacts = vec![hit(&engine, brick); hits];
            let snap = engine.tick(&contacts);

            let expected_destroyed = hits >= health as usize;
            assert_eq!(!engine.world().contains(brick), expected_destroyed);
            assert_eq!(snap.score as usize, hits.min(health as usize));
            assert_eq!(
                count_events(&snap.events, |e| matches!(e, GameEvent::BrickDestroyed { .. })),
                usize::from(expected_destroyed)
            );
            assert_eq!(
                engine.registry().active_brick_count(),
                usize::from(!expected_destroyed)
            );
        }
    }
}

#[test]
fn test_destroyed_brick_never_reported_twice() {
    let mut engine = engine(config_with(1, 3, 1, 5));
    let brick = first_brick(&engine);
    let contact = hit(&engine, brick);

    let first = engine.tick(&[contact]);
    let second = engine.tick(&[contact, contact]);
    assert_eq!(
        count_events(&first.events, |e| matches!(e, GameEvent::BrickDestroyed { .. })),
        1
    );
    assert!(second.events.is_empty());
    assert_eq!(engine.registry().active_brick_count(), 2);
    assert_eq!(engine.score(), 1);
}

#[test]
fn test_non_positive_damage_awards_nothing() {
    let mut world = hecs::World::new();
    let brick = world_setup::spawn_brick(
        &mut world,
        Vec3::ZERO,
        bricknballs_core::components::BrickSlot { row: 0, column: 0 },
        3,
    );
    let mut registry = BrickRegistry::new(0, 1);
    let mut score = ScoreBoard::default();
    let mut events = Vec::new();

    let outcome = registry.handle_hit(&mut world, brick, &mut score, &mut events);
    assert_eq!(outcome, HitOutcome::Ignored);
    assert_eq!(score.score(), 0);
    assert!(events.is_empty());
    assert_eq!(registry.get(brick).unwrap().health(), 3);
    assert!(world.contains(brick));
}

#[test]
fn test_late_spawned_brick_registers_lazily() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let late = world_setup::spawn_brick(
        engine.world_mut(),
        Vec3::new(0.0, 1.0, 0.0),
        bricknballs_core::components::BrickSlot { row: 9, column: 9 },
        2,
    );
    assert!(engine.registry().get(late).is_none());

    let contact = hit(&engine, late);
    engine.tick(&[contact]);
    let record = engine.registry().get(late).unwrap();
    assert_eq!(record.health(), 1);
    assert_eq!(record.max_health(), 2);
}

// ---- Launch lifecycle ----

#[test]
fn test_launch_applies_aim_velocity() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let events = launch(&mut engine);
    assert!(events.contains(&GameEvent::BallLaunched { shots_used: 1 }));

    let ball = engine.session().ball;
    let velocity = *engine.world().get::<&PhysicsVelocity>(ball).unwrap();
    assert_eq!(velocity.linear, Vec3::new(1.0, 6.0, 0.0));
    assert_eq!(velocity.angular, Vec3::ZERO);
}

#[test]
fn test_degenerate_aim_launches_straight_up() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    engine.queue_command(PlayerCommand::Launch {
        velocity: Vec3::ZERO,
    });
    engine.tick(&[]);
    let ball = engine.session().ball;
    let velocity = engine.world().get::<&PhysicsVelocity>(ball).unwrap().linear;
    assert_eq!(velocity, Vec3::Y * engine.config().launch_speed);
}

#[test]
fn test_launch_while_in_flight_rejected() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    launch(&mut engine);
    assert_eq!(engine.shot_limit().shots_used(), 1);

    for _ in 0..3 {
        let events = launch(&mut engine);
        assert!(events.is_empty());
    }
    assert_eq!(engine.shot_limit().shots_used(), 1);
    assert!(!engine.is_ready_to_launch());

    lose_ball(&mut engine);
    assert!(engine.is_ready_to_launch());
    launch(&mut engine);
    assert_eq!(engine.shot_limit().shots_used(), 2);
}

#[test]
fn test_launch_with_damaged_launcher_repairs_in_place() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    engine.queue_command(PlayerCommand::SetLauncherPosition { x: 3.0 });
    engine.tick(&[]);

    let old = engine.session().launcher;
    engine.world_mut().remove_one::<LaunchState>(old).unwrap();

    let events = launch(&mut engine);
    assert!(events.is_empty());
    assert_eq!(engine.shot_limit().shots_used(), 0);
    assert_eq!(engine.session().launcher, old, "Repair must keep the entity");
    assert_eq!(launcher::position(engine.world(), old).unwrap().x, 3.0);
    assert!(engine.is_ready_to_launch());

    launch(&mut engine);
    assert_eq!(engine.shot_limit().shots_used(), 1);
}

#[test]
fn test_launch_with_despawned_launcher_recreates_it() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let old = engine.session().launcher;
    engine.world_mut().despawn(old).unwrap();

    let events = launch(&mut engine);
    assert!(events.is_empty());
    assert_eq!(engine.shot_limit().shots_used(), 0);

    let current = engine.session().launcher;
    assert_ne!(current, old);
    assert_eq!(
        launcher::position(engine.world(), current).unwrap(),
        engine.config().launcher_position
    );
    assert!(engine.is_ready_to_launch());

    launch(&mut engine);
    assert_eq!(engine.shot_limit().shots_used(), 1);
}

#[test]
fn test_loss_waits_for_launcher_state() {
    let mut engine = engine(config_with(1, 1, 1, 1));
    launch(&mut engine);
    let launcher = engine.session().launcher;
    let ball = engine.session().ball;
    engine.world_mut().remove_one::<LaunchState>(launcher).unwrap();

    let events = lose_ball(&mut engine);
    assert_eq!(count_events(&events, |e| *e == GameEvent::BallLost), 0);
    assert!(engine.world().get::<&BallRecycleRequest>(ball).is_ok());
    assert_eq!(
        engine.world().get::<&Transform>(ball).unwrap().position,
        below_launcher(&engine, 1.0),
        "Ball must not move while the recycle is abandoned"
    );
    assert_eq!(engine.bridge().pending(), (0, 0));

    engine
        .world_mut()
        .insert_one(launcher, LaunchState { ready_to_launch: false })
        .unwrap();
    let snap = engine.tick(&[]);
    assert_eq!(count_events(&snap.events, |e| *e == GameEvent::BallLost), 1);
    assert!(snap.events.contains(&GameEvent::GameOver));
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(engine.is_ready_to_launch());
}

#[test]
fn test_launcher_position_clamped() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    engine.queue_command(PlayerCommand::SetLauncherPosition { x: 100.0 });
    let snap = engine.tick(&[]);
    assert_eq!(snap.launcher.position.x, engine.config().launcher_max_x);

    let launcher = engine.session().launcher;
    let y = launcher::position(engine.world(), launcher).unwrap().y;
    assert_eq!(y, engine.config().launcher_position.y);
}

// ---- Shot limit / game over ----

#[test]
fn test_game_over_after_five_shots() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    let mut game_overs = 0;
    for shot in 1..=5 {
        launch(&mut engine);
        assert_eq!(engine.shot_limit().shots_used(), shot);
        let events = lose_ball(&mut engine);
        game_overs += count_events(&events, |e| *e == GameEvent::GameOver);
        if shot < 5 {
            assert_eq!(engine.phase(), GamePhase::Playing);
        }
    }
    assert_eq!(game_overs, 1);
    assert_eq!(engine.phase(), GamePhase::GameOver);

    // Further losses are no-ops.
    for _ in 0..3 {
        let events = lose_ball(&mut engine);
        assert_eq!(count_events(&events, |e| *e == GameEvent::GameOver), 0);
    }

    engine.queue_command(PlayerCommand::ResetGame);
    let snap = engine.tick(&[]);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.shots.used, 0);
    assert_eq!(snap.shots.remaining, 5);
    assert!(!engine.shot_limit().is_game_over());
}

#[test]
fn test_single_shot_scenario() {
    let mut engine = engine(config_with(1, 1, 1, 1));
    launch(&mut engine);
    assert_eq!(engine.shot_limit().shots_used(), 1);

    let events = lose_ball(&mut engine);
    assert!(events.contains(&GameEvent::GameOver));
    assert!(engine.is_ready_to_launch());

    let events = launch(&mut engine);
    assert!(events.is_empty(), "Launch must be rejected by the shot limit");
    assert_eq!(engine.shot_limit().shots_used(), 1);
    assert!(engine.is_ready_to_launch());
}

#[test]
fn test_last_shot_scores_before_game_over() {
    let mut engine = engine(config_with(1, 1, 5, 1));
    launch(&mut engine);
    let brick = first_brick(&engine);
    let contact = hit(&engine, brick);
    let snap = engine.tick(&[contact]);
    assert_eq!(snap.score, 1);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.shots.remaining, 0);
}

// ---- Game flow ----

#[test]
fn test_pause_discards_contacts() {
    let mut engine = engine(config_with(1, 1, 3, 5));
    let brick = first_brick(&engine);
    let contact = hit(&engine, brick);

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick(&[contact]);
    assert_eq!(snap.phase, GamePhase::Paused);
    assert_eq!(snap.score, 0);
    assert_eq!(engine.time().tick, 0);

    engine.queue_command(PlayerCommand::Resume);
    let snap = engine.tick(&[contact]);
    assert_eq!(snap.score, 1);
    assert_eq!(engine.time().tick, 1);
}

#[test]
fn test_reset_clears_pending_facts_and_rebuilds_bricks() {
    let mut engine = engine(config_with(2, 2, 1, 5));
    let brick = first_brick(&engine);
    let contact = hit(&engine, brick);
    engine.tick(&[contact]);
    assert_eq!(engine.registry().active_brick_count(), 3);

    // Facts produced but not yet consumed.
    let pending_hit = hit(&engine, engine.session().brick_at(1, 1).unwrap());
    engine.step_physics(&[pending_hit]);
    engine.bridge().enqueue_ball_lost();
    assert_eq!(engine.bridge().pending(), (1, 1));

    engine.reset_game();
    assert_eq!(engine.bridge().pending(), (0, 0));
    assert_eq!(engine.registry().active_brick_count(), 4);
    assert_eq!(engine.score(), 0);

    engine.consume_facts();
    assert_eq!(engine.score(), 0);
    assert!(engine.is_ready_to_launch());
}

#[test]
fn test_shutdown_skips_producers_and_consumer() {
    let mut engine = engine(config_with(1, 1, 3, 5));
    let brick = first_brick(&engine);
    engine.shutdown();
    assert!(!engine.bridge().is_ready());

    let contact = hit(&engine, brick);
    let snap = engine.tick(&[contact]);
    assert_eq!(snap.score, 0);
    assert_eq!(engine.registry().get(brick).unwrap().health(), 3);
}

#[test]
fn test_set_max_shots_notifies() {
    let mut engine = engine(config_with(1, 1, 1, 5));
    engine.queue_command(PlayerCommand::SetMaxShots { max_shots: 2 });
    let snap = engine.tick(&[]);
    assert!(snap.events.contains(&GameEvent::ShotsChanged {
        shots_used: 0,
        max_shots: 2
    }));
    assert_eq!(snap.shots.max, 2);
}

// ---- Config / setup ----

#[test]
fn test_config_validation() {
    let bad_damage = SimConfig {
        damage_per_hit: 0,
        ..Default::default()
    };
    assert_eq!(bad_damage.validate(), Err(ConfigError::NonPositiveDamage(0)));
    assert!(SimulationEngine::new(bad_damage).is_err());

    let bad_margin = SimConfig {
        recycle_margin: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        bad_margin.validate(),
        Err(ConfigError::InvalidRecycleMargin(_))
    ));

    assert!(SimConfig::default().validate().is_ok());
}

#[test]
fn test_config_parses_partial_json() {
    let config: SimConfig =
        serde_json::from_str(r#"{"max_shots": 3, "brick_layout": {"rows": 1}}"#).unwrap();
    assert_eq!(config.max_shots, 3);
    assert_eq!(config.brick_layout.rows, 1);
    assert_eq!(config.brick_layout.columns, SimConfig::default().brick_layout.columns);
    assert_eq!(config.recycle_margin, SimConfig::default().recycle_margin);
}

#[test]
fn test_workers_for_small_steps_is_one() {
    let config = SimConfig {
        detection_workers: 8,
        parallel_threshold: 100,
        ..Default::default()
    };
    assert_eq!(config.workers_for(0), 1);
    assert_eq!(config.workers_for(99), 1);
    assert_eq!(config.workers_for(250), 2);
    assert_eq!(config.workers_for(10_000), 8);
}

#[test]
fn test_same_seed_same_layout() {
    let healths = |seed: u64| -> Vec<i32> {
        let engine = engine(SimConfig {
            seed,
            ..Default::default()
        });
        engine
            .session()
            .bricks
            .iter()
            .map(|(_, brick)| engine.registry().get(*brick).unwrap().max_health())
            .collect()
    };
    assert_eq!(healths(7), healths(7));
    assert!(healths(7).iter().all(|h| (1..=3).contains(h)));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine(SimConfig::default());
    launch(&mut engine);
    let snap = engine.tick(&[]);
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"phase\":\"Playing\""));
    assert_eq!(snap.balls.len(), 1);
    assert_eq!(snap.bricks_remaining, 32);
}
