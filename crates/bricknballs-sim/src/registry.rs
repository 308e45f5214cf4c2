//! Brick registry: live health for every known brick.
//!
//! Records are created from the baked `BrickHealth` either when the world is
//! scanned or lazily on the first hit, and removed on destruction together
//! with the brick entity. Handles are generation-checked, so a hit that
//! names an already despawned brick simply fails to resolve.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::{debug, trace};

use bricknballs_core::components::{BrickHealth, BrickTag};
use bricknballs_core::events::GameEvent;
use bricknballs_rules::brick::{BrickRecord, DamageOutcome};
use bricknballs_rules::score::ScoreBoard;

use crate::entity_id;

/// Result of consuming one brick-hit fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown, despawned, or already destroyed brick. No score.
    Ignored,
    /// Scored; the brick survives with `remaining` health.
    Damaged { remaining: i32 },
    /// Scored; the brick was destroyed and despawned.
    Destroyed,
}

pub struct BrickRegistry {
    bricks: HashMap<Entity, BrickRecord>,
    damage_per_hit: i32,
    points_per_hit: u32,
}

impl BrickRegistry {
    pub fn new(damage_per_hit: i32, points_per_hit: u32) -> Self {
        Self {
            bricks: HashMap::new(),
            damage_per_hit,
            points_per_hit,
        }
    }

    /// Register every brick in the world not yet tracked. Returns how many were added.
    pub fn discover(&mut self, world: &World) -> usize {
        let mut added = 0;
        for (entity, (_brick, health)) in world.query::<(&BrickTag, &BrickHealth)>().iter() {
            if !self.bricks.contains_key(&entity) {
                self.bricks.insert(entity, BrickRecord::new(health.value));
                added += 1;
            }
        }
        debug!(added, total = self.bricks.len(), "bricks discovered");
        added
    }

    /// Register a brick. Returns the existing record if already tracked.
    pub fn register(&mut self, entity: Entity, initial_health: i32) -> &BrickRecord {
        self.bricks
            .entry(entity)
            .or_insert_with(|| BrickRecord::new(initial_health))
    }

    pub fn get(&self, entity: Entity) -> Option<&BrickRecord> {
        self.bricks.get(&entity)
    }

    /// Tracked record, registering it from the world on first sight.
    pub fn lookup(&mut self, world: &World, entity: Entity) -> Option<&mut BrickRecord> {
        if !self.bricks.contains_key(&entity) {
            if world.get::<&BrickTag>(entity).is_err() {
                return None;
            }
            let health = world.get::<&BrickHealth>(entity).ok()?.value;
            self.bricks.insert(entity, BrickRecord::new(health));
        }
        self.bricks.get_mut(&entity)
    }

    pub fn active_brick_count(&self) -> usize {
        self.bricks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entity, &BrickRecord)> {
        self.bricks.iter()
    }

    /// Consume one brick-hit fact: award score, apply damage, destroy at zero.
    pub fn handle_hit(
        &mut self,
        world: &mut World,
        brick: Entity,
        score: &mut ScoreBoard,
        events: &mut Vec<GameEvent>,
    ) -> HitOutcome {
        let damage = self.damage_per_hit;
        let Some(record) = self.lookup(world, brick) else {
            trace!(?brick, "hit on unknown brick ignored");
            return HitOutcome::Ignored;
        };
        if record.is_destroyed() {
            return HitOutcome::Ignored;
        }

        let outcome = record.take_damage(damage);
        let remaining = record.health();
        let max_health = record.max_health();

        let id = entity_id(brick);
        match outcome {
            DamageOutcome::Ignored => {
                trace!(?brick, damage, "non-positive damage, hit ignored");
                return HitOutcome::Ignored;
            }
            DamageOutcome::Damaged { damage, remaining } => {
                score.add_score(self.points_per_hit, events);
                events.push(GameEvent::DamageTaken {
                    brick: id,
                    damage,
                    remaining,
                });
            }
            DamageOutcome::Destroyed { damage } => {
                score.add_score(self.points_per_hit, events);
                events.push(GameEvent::DamageTaken {
                    brick: id,
                    damage,
                    remaining: 0,
                });
            }
        }
        events.push(GameEvent::BrickHit {
            brick: id,
            remaining,
        });

        if !matches!(outcome, DamageOutcome::Destroyed { .. }) {
            return HitOutcome::Damaged { remaining };
        }

        self.bricks.remove(&brick);
        let _ = world.despawn(brick);
        events.push(GameEvent::BrickDestroyed {
            brick: id,
            max_health,
        });
        debug!(?brick, max_health, remaining = self.bricks.len(), "brick destroyed");
        HitOutcome::Destroyed
    }

    /// Forget every record and rescan the world.
    pub fn reset(&mut self, world: &World) -> usize {
        self.bricks.clear();
        self.discover(world)
    }
}
