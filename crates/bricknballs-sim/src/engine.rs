//! Simulation engine: the bridge between physics steps and game state.
//!
//! `SimulationEngine` owns the hecs world, the event bridge and every
//! game-state machine. One `tick` is one frame:
//!
//! 1. queued player commands
//! 2. spawn application for an accepted launch
//! 3. per physics step: detection (parallel, read-only) -> barrier ->
//!    command-buffer flush -> recycle apply
//! 4. consumer drain of both bridge queues
//!
//! Everything is owned and passed explicitly; there is no global state.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, trace, warn};

use bricknballs_core::commands::PlayerCommand;
use bricknballs_core::components::{BallRecycleRequest, BallTag};
use bricknballs_core::enums::GamePhase;
use bricknballs_core::events::GameEvent;
use bricknballs_core::state::GameStateSnapshot;
use bricknballs_core::types::{PhysicsVelocity, SimTime, Transform};
use bricknballs_rules::score::ScoreBoard;
use bricknballs_rules::shot_limit::ShotLimit;

use crate::bridge::EventBridge;
use crate::config::SimConfig;
use crate::contact::ContactPair;
use crate::error::ConfigError;
use crate::launcher;
use crate::registry::BrickRegistry;
use crate::systems;
use crate::systems::collision::DetectionParams;
use crate::systems::snapshot::SnapshotSources;
use crate::world_setup::{self, SessionEntities};

/// Latches so that missing-collaborator conditions are logged only once.
#[derive(Debug, Default)]
struct WarnOnce {
    bridge_offline: bool,
    launcher_missing: bool,
}

/// The simulation engine. Owns the ECS world and all game state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    session: SessionEntities,
    bridge: EventBridge,
    registry: BrickRegistry,
    shot_limit: ShotLimit,
    score: ScoreBoard,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    recycle_buffer: Vec<Entity>,
    warned: WarnOnce,
}

impl SimulationEngine {
    /// Create a new engine and populate the world for a fresh session.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let session = world_setup::setup_session(&mut world, &config, &mut rng);

        let mut registry = BrickRegistry::new(config.damage_per_hit, config.points_per_hit);
        registry.discover(&world);

        info!(
            bricks = registry.active_brick_count(),
            max_shots = config.max_shots,
            "session started"
        );

        Ok(Self {
            world,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng,
            session,
            bridge: EventBridge::initialized(),
            registry,
            shot_limit: ShotLimit::new(config.max_shots),
            score: ScoreBoard::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            recycle_buffer: Vec::new(),
            warned: WarnOnce::default(),
            config,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one frame with a single physics step and return the snapshot.
    pub fn tick(&mut self, contacts: &[ContactPair]) -> GameStateSnapshot {
        self.tick_steps(std::iter::once(contacts))
    }

    /// Advance one frame covering several physics steps.
    pub fn tick_steps<'a>(
        &mut self,
        steps: impl IntoIterator<Item = &'a [ContactPair]>,
    ) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Paused {
            let discarded: usize = steps.into_iter().map(<[ContactPair]>::len).sum();
            if discarded > 0 {
                debug!(discarded, "paused, contact facts discarded");
            }
        } else {
            self.apply_spawn();
            for contacts in steps {
                self.step_physics(contacts);
            }
            self.consume_facts();
            self.time.advance();
        }

        self.snapshot()
    }

    /// Run detection and deferred mutation for one physics step.
    ///
    /// Detection only reads the world; its intents are applied after every
    /// worker has joined, then recycle requests are applied.
    pub fn step_physics(&mut self, contacts: &[ContactPair]) {
        let launcher = self.launcher_entity();
        let launcher_y = launcher
            .and_then(|entity| launcher::position(&self.world, entity).ok())
            .map(|position| position.y);

        let params = DetectionParams {
            launcher_y,
            recycle_margin: self.config.recycle_margin,
            workers: self.config.workers_for(contacts.len()),
        };
        let mut detection =
            systems::collision::run(&self.world, contacts, &self.bridge, params);

        if detection.dropped_hits > 0 && !self.warned.bridge_offline {
            self.warned.bridge_offline = true;
            warn!(
                dropped = detection.dropped_hits,
                "event bridge not ready, brick hits skipped"
            );
        }

        trace!(
            hits = detection.brick_hits,
            recycles = detection.recycle_requests,
            suppressed = detection.suppressed,
            "detection finished"
        );

        // Barrier: every worker has joined, the world may be mutated again.
        detection.flush(&mut self.world);

        let Some(launcher) = launcher else {
            return;
        };
        if let Err(err) = systems::recycle::run(
            &mut self.world,
            launcher,
            &self.bridge,
            &mut self.recycle_buffer,
        ) {
            error!(%err, "recycle abandoned this step");
        }
    }

    /// Drain both bridge queues into the game-state machines.
    ///
    /// Every ball-lost signal is observed individually, so several losses in
    /// one frame each reach the shot limit.
    pub fn consume_facts(&mut self) {
        if !self.bridge.is_ready() {
            if !self.warned.bridge_offline {
                self.warned.bridge_offline = true;
                warn!("event bridge not ready, nothing to consume");
            }
            return;
        }

        while let Some(brick) = self.bridge.try_dequeue_hit() {
            self.registry
                .handle_hit(&mut self.world, brick, &mut self.score, &mut self.events);
        }

        while self.bridge.try_dequeue_ball_lost() {
            self.events.push(GameEvent::BallLost);
            if self.shot_limit.notify_ball_lost(&mut self.events) {
                self.phase = GamePhase::GameOver;
                info!(
                    score = self.score.score(),
                    shots_used = self.shot_limit.shots_used(),
                    "game over"
                );
            }
        }
    }

    /// Start a fresh run: queues, score, shots, bricks and launcher.
    pub fn reset_game(&mut self) {
        self.bridge.clear();
        self.score.reset(&mut self.events);
        self.shot_limit.reset(&mut self.events);

        world_setup::despawn_bricks(&mut self.world);
        self.session.bricks = world_setup::spawn_brick_layout(
            &mut self.world,
            &self.config.brick_layout,
            &mut self.rng,
        );
        self.registry.reset(&self.world);

        self.park_balls();
        self.phase = GamePhase::Playing;
        info!(bricks = self.registry.active_brick_count(), "game reset");
    }

    /// Tear down the event bridge. Producers and the consumer skip afterwards.
    pub fn shutdown(&mut self) {
        self.bridge.teardown();
        info!(tick = self.time.tick, "session shut down");
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the physics layer (outside `tick`).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> &SessionEntities {
        &self.session
    }

    pub fn bridge(&self) -> &EventBridge {
        &self.bridge
    }

    pub fn registry(&self) -> &BrickRegistry {
        &self.registry
    }

    pub fn shot_limit(&self) -> &ShotLimit {
        &self.shot_limit
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    /// Whether the launcher may fire.
    pub fn is_ready_to_launch(&self) -> bool {
        launcher::is_ready(&self.world, self.session.launcher).unwrap_or(false)
    }

    /// Snapshot of the current state, draining pending notifications.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotSources {
                time: self.time,
                phase: self.phase,
                launcher: Some(self.session.launcher),
                score: &self.score,
                shots: &self.shot_limit,
                registry: &self.registry,
            },
            events,
        )
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Launch { velocity } => {
                if self.phase == GamePhase::Paused {
                    debug!("launch ignored while paused");
                    return;
                }
                let Some(launcher) = self.launcher_entity() else {
                    error!("launcher singleton missing, launch abandoned");
                    self.restore_launcher();
                    return;
                };
                match launcher::request_launch(
                    &mut self.world,
                    launcher,
                    velocity,
                    self.config.launch_speed,
                    &mut self.shot_limit,
                    &mut self.events,
                ) {
                    Ok(outcome) => debug!(?outcome, "launch request"),
                    Err(err) => {
                        error!(%err, "launch abandoned");
                        self.restore_launcher();
                    }
                }
            }
            PlayerCommand::SetLauncherPosition { x } => {
                let Some(launcher) = self.launcher_entity() else {
                    return;
                };
                if let Err(err) = launcher::set_x(
                    &mut self.world,
                    launcher,
                    x,
                    self.config.launcher_min_x,
                    self.config.launcher_max_x,
                ) {
                    error!(%err, "launcher move abandoned");
                }
            }
            PlayerCommand::SetMaxShots { max_shots } => {
                self.shot_limit.set_max_shots(max_shots, &mut self.events);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::ResetGame => self.reset_game(),
        }
    }

    fn apply_spawn(&mut self) {
        if let Some(launcher) = self.launcher_entity() {
            systems::spawn::run(&mut self.world, launcher);
        }
    }

    /// Live launcher handle. Re-resolves once if the stored handle went stale.
    fn launcher_entity(&mut self) -> Option<Entity> {
        if self.world.contains(self.session.launcher) {
            return Some(self.session.launcher);
        }
        if let Some(found) = launcher::find(&self.world) {
            self.session.launcher = found;
            return Some(found);
        }
        if !self.warned.launcher_missing {
            self.warned.launcher_missing = true;
            warn!("launcher singleton missing, loss detection disabled");
        }
        None
    }

    /// Repair the launcher singleton in place, or recreate it at the
    /// configured position when the entity is gone.
    fn restore_launcher(&mut self) {
        let existing = Some(self.session.launcher)
            .filter(|&entity| self.world.contains(entity))
            .or_else(|| launcher::find(&self.world));

        if let Some(entity) = existing {
            match launcher::repair(
                &mut self.world,
                entity,
                self.config.launcher_position,
                self.config.launch_speed,
            ) {
                Ok(restored) => {
                    self.session.launcher = entity;
                    self.warned.launcher_missing = false;
                    warn!(restored, "launcher singleton repaired");
                    return;
                }
                Err(err) => error!(%err, "launcher repair failed"),
            }
        }

        self.session.launcher = world_setup::spawn_launcher(
            &mut self.world,
            self.config.launcher_position,
            self.config.launch_speed,
        );
        self.warned.launcher_missing = false;
        warn!("launcher singleton recreated at configured position");
    }

    /// Return every ball to the launcher at rest and release the in-flight lock.
    fn park_balls(&mut self) {
        let Some(launcher) = self.launcher_entity() else {
            return;
        };
        let position = launcher::position(&self.world, launcher)
            .unwrap_or(self.config.launcher_position);

        let pending: Vec<Entity> = self
            .world
            .query::<(&BallTag, &BallRecycleRequest)>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in pending {
            let _ = self.world.remove_one::<BallRecycleRequest>(entity);
        }

        for (_entity, (transform, velocity, _ball)) in self
            .world
            .query_mut::<(&mut Transform, &mut PhysicsVelocity, &BallTag)>()
        {
            transform.position = position;
            velocity.stop();
        }

        if let Err(err) = launcher::make_ready(&mut self.world, launcher) {
            error!(%err, "launcher could not be made ready");
        }
    }
}
