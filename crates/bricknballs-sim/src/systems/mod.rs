//! ECS systems that operate on the simulation world each step.
//!
//! Systems are functions over `&World` (detection, snapshot) or `&mut World`
//! (deferred mutation, spawn). They do not own state; the engine does.

pub mod collision;
pub mod recycle;
pub mod snapshot;
pub mod spawn;
