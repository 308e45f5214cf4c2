//! Brick health state machine: Alive -> Destroyed (terminal).

use bricknballs_core::enums::BrickPhase;

/// Live health of one brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickRecord {
    health: i32,
    max_health: i32,
}

/// What a damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Brick already destroyed, or damage was not positive.
    Ignored,
    /// Health decreased but the brick survives.
    Damaged { damage: i32, remaining: i32 },
    /// Health reached zero on this hit.
    Destroyed { damage: i32 },
}

impl BrickRecord {
    /// Create a record from the baked initial health. Health is at least 1.
    pub fn new(initial_health: i32) -> Self {
        let health = initial_health.max(1);
        Self {
            health,
            max_health: health,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn phase(&self) -> BrickPhase {
        if self.is_destroyed() {
            BrickPhase::Destroyed
        } else {
            BrickPhase::Alive
        }
    }

    /// Apply `damage`. Health never increases and is clamped at zero.
    pub fn take_damage(&mut self, damage: i32) -> DamageOutcome {
        if self.is_destroyed() || damage <= 0 {
            return DamageOutcome::Ignored;
        }

        self.health -= damage;
        if self.health <= 0 {
            self.health = 0;
            return DamageOutcome::Destroyed { damage };
        }

        DamageOutcome::Damaged {
            damage,
            remaining: self.health,
        }
    }
}
