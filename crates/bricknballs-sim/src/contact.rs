//! Pairwise facts produced by the physics layer's narrow phase.

use hecs::Entity;

use bricknballs_core::enums::ContactKind;

/// One contact or trigger overlap reported for the current step.
/// Order of `a` and `b` carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub kind: ContactKind,
    pub a: Entity,
    pub b: Entity,
}

impl ContactPair {
    pub fn collision(a: Entity, b: Entity) -> Self {
        Self {
            kind: ContactKind::Collision,
            a,
            b,
        }
    }

    pub fn trigger(a: Entity, b: Entity) -> Self {
        Self {
            kind: ContactKind::Trigger,
            a,
            b,
        }
    }
}
