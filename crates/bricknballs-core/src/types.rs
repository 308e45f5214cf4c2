//! Fundamental geometric and simulation types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-space placement of a simulation object (world units).
/// x = right, y = up, z = depth (unused by gameplay, kept for the 3D physics layer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
}

/// Kinematic state owned by the physics layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsVelocity {
    /// Linear velocity (units/s).
    pub linear: Vec3,
    /// Angular velocity (rad/s).
    pub angular: Vec3,
}

/// Opaque, serializable form of an entity handle.
///
/// Carries the full generation-checked bits of the handle so that a
/// presentation layer can correlate notifications without holding ECS types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Frame counter for the consumer tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed frames.
    pub tick: u64,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self { position }
    }
}

impl PhysicsVelocity {
    pub fn linear(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }

    /// Zero both linear and angular components.
    pub fn stop(&mut self) {
        self.linear = Vec3::ZERO;
        self.angular = Vec3::ZERO;
    }

    pub fn is_stopped(&self) -> bool {
        self.linear == Vec3::ZERO && self.angular == Vec3::ZERO
    }
}

impl SimTime {
    /// Advance by one frame.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
