//! Ball/launcher lifecycle: ReadyToLaunch <-> InFlight.
//!
//! The launch gate checks readiness before touching the shot counter, so a
//! request while a ball is in flight never consumes a shot.

use bricknballs_core::enums::{LaunchOutcome, LaunchPhase};
use bricknballs_core::events::GameEvent;

use crate::shot_limit::ShotLimit;

/// Decide a launch request. On `Accepted` the caller moves the launcher to `InFlight`.
pub fn evaluate_launch(
    phase: LaunchPhase,
    shots: &mut ShotLimit,
    events: &mut Vec<GameEvent>,
) -> LaunchOutcome {
    if phase == LaunchPhase::InFlight {
        return LaunchOutcome::RejectedInFlight;
    }

    if !shots.try_consume_shot(events) {
        return LaunchOutcome::RejectedShotLimit;
    }

    events.push(GameEvent::BallLaunched {
        shots_used: shots.shots_used(),
    });
    LaunchOutcome::Accepted
}

/// Phase after a launch decision.
pub fn phase_after_launch(phase: LaunchPhase, outcome: LaunchOutcome) -> LaunchPhase {
    match outcome {
        LaunchOutcome::Accepted => LaunchPhase::InFlight,
        LaunchOutcome::RejectedInFlight | LaunchOutcome::RejectedShotLimit => phase,
    }
}

/// Map the launcher's readiness flag onto a lifecycle phase.
pub fn phase_from_ready(ready_to_launch: bool) -> LaunchPhase {
    if ready_to_launch {
        LaunchPhase::ReadyToLaunch
    } else {
        LaunchPhase::InFlight
    }
}
