//! Simulation core for Brick'n'Balls.
//!
//! Owns the hecs ECS world and bridges the (possibly parallel) physics
//! step to the single-threaded game-state layer: contact classification,
//! deferred mutation, the event bridge, and the per-frame consumer tick.

pub mod bridge;
pub mod config;
pub mod contact;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod registry;
pub mod systems;
pub mod world_setup;

pub use bricknballs_core as core;
pub use bridge::EventBridge;
pub use config::SimConfig;
pub use contact::ContactPair;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;

/// Serializable form of an entity handle for notifications and snapshots.
pub fn entity_id(entity: hecs::Entity) -> core::types::EntityId {
    core::types::EntityId(entity.to_bits().get())
}
