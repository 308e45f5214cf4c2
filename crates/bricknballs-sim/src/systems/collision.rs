//! Collision detector: classifies the step's contact pairs into facts.
//!
//! Runs while the physics step is still in progress, so it only reads the
//! world. Brick hits go straight into the event bridge; ball losses become
//! `BallRecycleRequest` insertions recorded in a command buffer and applied
//! after the step barrier. Each event is classified independently, which
//! lets large steps fan out across scoped worker threads.

use hecs::{CommandBuffer, Entity, World};
use tracing::trace;

use bricknballs_core::components::{BallRecycleRequest, BallTag, BrickTag, OutOfBoundsTrigger};
use bricknballs_core::types::Transform;

use crate::bridge::EventBridge;
use crate::contact::ContactPair;

/// Read-only inputs shared by every worker.
#[derive(Debug, Clone, Copy)]
pub struct DetectionParams {
    /// Launcher height this step. `None` disables loss detection.
    pub launcher_y: Option<f32>,
    /// How far below the launcher a ball must be to count as lost.
    pub recycle_margin: f32,
    /// Worker threads to fan out over.
    pub workers: usize,
}

/// Classification of a single contact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    /// A ball touched a brick.
    BrickHit(Entity),
    /// A ball is inside the out-of-bounds trigger and far enough down.
    BallLost(Entity),
    /// Ball/out-of-bounds overlap that does not count (yet).
    Suppressed,
    /// Not a pairing the game cares about.
    Ignored,
}

/// Deferred intents and counters gathered during one step.
#[derive(Default)]
pub struct Detection {
    /// One buffer per worker; flush each with `run_on` after the step.
    pub commands: Vec<CommandBuffer>,
    pub brick_hits: usize,
    /// Hits that could not be queued because the bridge was not live.
    pub dropped_hits: usize,
    pub recycle_requests: usize,
    pub suppressed: usize,
}

impl Detection {
    fn merge(&mut self, other: Detection) {
        self.commands.extend(other.commands);
        self.brick_hits += other.brick_hits;
        self.dropped_hits += other.dropped_hits;
        self.recycle_requests += other.recycle_requests;
        self.suppressed += other.suppressed;
    }

    /// Apply every buffered intent. Call only after the physics step completed.
    pub fn flush(&mut self, world: &mut World) {
        for cmd in self.commands.iter_mut() {
            cmd.run_on(world);
        }
        self.commands.clear();
    }
}

/// Classify every contact of the step.
pub fn run(
    world: &World,
    contacts: &[ContactPair],
    bridge: &EventBridge,
    params: DetectionParams,
) -> Detection {
    let workers = params.workers.max(1);
    if workers == 1 || contacts.len() < 2 {
        return detect_chunk(world, contacts, bridge, &params);
    }

    let chunk_size = contacts.len().div_ceil(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = contacts
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || detect_chunk(world, chunk, bridge, &params)))
            .collect();

        let mut detection = Detection::default();
        for handle in handles {
            match handle.join() {
                Ok(part) => detection.merge(part),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        detection
    })
}

fn detect_chunk(
    world: &World,
    contacts: &[ContactPair],
    bridge: &EventBridge,
    params: &DetectionParams,
) -> Detection {
    let mut cmd = CommandBuffer::new();
    let mut detection = Detection::default();

    for pair in contacts {
        match classify(world, pair, params) {
            Fact::BrickHit(brick) => {
                if bridge.enqueue_hit(brick) {
                    detection.brick_hits += 1;
                } else {
                    detection.dropped_hits += 1;
                }
            }
            Fact::BallLost(ball) => {
                // Overwrites on repeat, so the ball ends up with exactly one request.
                cmd.insert_one(ball, BallRecycleRequest);
                detection.recycle_requests += 1;
            }
            Fact::Suppressed => detection.suppressed += 1,
            Fact::Ignored => {}
        }
    }

    detection.commands.push(cmd);
    detection
}

/// Classify one pair using tag membership and the loss guard.
pub fn classify(world: &World, pair: &ContactPair, params: &DetectionParams) -> Fact {
    let (a, b) = (pair.a, pair.b);

    let a_oob = has::<OutOfBoundsTrigger>(world, a);
    let b_oob = has::<OutOfBoundsTrigger>(world, b);
    if a_oob != b_oob {
        let other = if a_oob { b } else { a };
        if has::<BallTag>(world, other) {
            return classify_loss(world, other, params);
        }
        return Fact::Ignored;
    }

    let a_brick = has::<BrickTag>(world, a);
    let b_brick = has::<BrickTag>(world, b);
    let a_ball = has::<BallTag>(world, a);
    let b_ball = has::<BallTag>(world, b);
    if a_brick && b_ball && !b_brick {
        return Fact::BrickHit(a);
    }
    if b_brick && a_ball && !a_brick {
        return Fact::BrickHit(b);
    }

    Fact::Ignored
}

fn classify_loss(world: &World, ball: Entity, params: &DetectionParams) -> Fact {
    let Some(launcher_y) = params.launcher_y else {
        return Fact::Suppressed;
    };

    let ball_y = match world.get::<&Transform>(ball) {
        Ok(transform) => transform.position.y,
        Err(_) => return Fact::Suppressed,
    };

    // Ball and trigger can overlap right at spawn; only count real falls.
    if ball_y >= launcher_y - params.recycle_margin {
        trace!(ball_y, launcher_y, "out-of-bounds overlap above loss line");
        return Fact::Suppressed;
    }

    if has::<BallRecycleRequest>(world, ball) {
        return Fact::Suppressed;
    }

    Fact::BallLost(ball)
}

fn has<T: hecs::Component>(world: &World, entity: Entity) -> bool {
    world.get::<&T>(entity).is_ok()
}
