//! Shot-limit / game-over state machine.
//!
//! counting (used < max) -> exhausted (used >= max) -> GameOver (latched).
//! GameOver only latches on a ball-lost signal, so the last shot in flight
//! can still score before the run ends.

use bricknballs_core::constants::DEFAULT_MAX_SHOTS;
use bricknballs_core::events::GameEvent;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ShotLimit {
    shots_used: u32,
    max_shots: u32,
    game_over_raised: bool,
}

impl Default for ShotLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SHOTS)
    }
}

impl ShotLimit {
    pub fn new(max_shots: u32) -> Self {
        Self {
            shots_used: 0,
            max_shots,
            game_over_raised: false,
        }
    }

    pub fn shots_used(&self) -> u32 {
        self.shots_used
    }

    pub fn max_shots(&self) -> u32 {
        self.max_shots
    }

    pub fn shots_remaining(&self) -> u32 {
        self.max_shots.saturating_sub(self.shots_used)
    }

    pub fn can_launch(&self) -> bool {
        self.shots_used < self.max_shots
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_raised
    }

    /// Change the limit. Does not unlatch a raised game over.
    pub fn set_max_shots(&mut self, max_shots: u32, events: &mut Vec<GameEvent>) {
        self.max_shots = max_shots;
        self.push_shots_changed(events);
    }

    /// Consume one shot if any remain. Fails without side effects otherwise.
    pub fn try_consume_shot(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.can_launch() {
            debug!(
                shots_used = self.shots_used,
                max_shots = self.max_shots,
                "shot denied"
            );
            return false;
        }

        self.shots_used += 1;
        self.push_shots_changed(events);
        debug!(
            shots_used = self.shots_used,
            max_shots = self.max_shots,
            "shot consumed"
        );
        true
    }

    /// Observe one ball-lost signal. Returns true if this call latched game over.
    pub fn notify_ball_lost(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.game_over_raised {
            debug!("ball lost ignored, game already over");
            return false;
        }

        if self.shots_used >= self.max_shots {
            self.game_over_raised = true;
            events.push(GameEvent::GameOver);
            debug!(shots_used = self.shots_used, "game over raised");
            return true;
        }

        false
    }

    /// Zero the counter and unlatch game over.
    pub fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.shots_used = 0;
        self.game_over_raised = false;
        self.push_shots_changed(events);
    }

    fn push_shots_changed(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::ShotsChanged {
            shots_used: self.shots_used,
            max_shots: self.max_shots,
        });
    }
}
