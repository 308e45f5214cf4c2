//! Score keeping.

use bricknballs_core::events::GameEvent;

/// Running score for the current run.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Add `points` to the score.
    pub fn add_score(&mut self, points: u32, events: &mut Vec<GameEvent>) {
        self.set(self.score.saturating_add(points), events);
    }

    /// Overwrite the score.
    pub fn set_score(&mut self, value: u32, events: &mut Vec<GameEvent>) {
        self.set(value, events);
    }

    pub fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.set(0, events);
    }

    // Only raises a notification when the value actually changes.
    fn set(&mut self, value: u32, events: &mut Vec<GameEvent>) {
        if self.score != value {
            self.score = value;
            events.push(GameEvent::ScoreChanged { score: value });
        }
    }
}
