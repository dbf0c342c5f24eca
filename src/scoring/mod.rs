//! Scoring module - outcome classification and session tally

use bevy::prelude::*;

/// How a penalty ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotOutcome {
    Goal,
    Save,
    /// Post, bar, or wide/high (anything outside the goal mouth)
    Post,
}

impl ShotOutcome {
    pub const ALL: [ShotOutcome; 3] = [ShotOutcome::Goal, ShotOutcome::Save, ShotOutcome::Post];

    /// Epilogue title
    pub fn title(&self) -> &'static str {
        match self {
            ShotOutcome::Goal => "¡GOOOOL!",
            ShotOutcome::Save => "¡Atajada!",
            ShotOutcome::Post => "¡Fallado!",
        }
    }

    /// Short code used in logs, scenarios and the results database
    pub fn code(&self) -> &'static str {
        match self {
            ShotOutcome::Goal => "goal",
            ShotOutcome::Save => "save",
            ShotOutcome::Post => "post",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

/// Resolve a goal-line crossing. The save roll wins over everything; a ball
/// outside the mouth (`|x| > w/2`, `y > h`, `y < 0`) is a miss.
pub fn classify_outcome(ball_pos: Vec3, saved: bool, goal_width: f32, goal_height: f32) -> ShotOutcome {
    if saved {
        ShotOutcome::Save
    } else if ball_pos.x.abs() > goal_width / 2.0 || ball_pos.y > goal_height || ball_pos.y < 0.0 {
        ShotOutcome::Post
    } else {
        ShotOutcome::Goal
    }
}

/// Running tally across rounds
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct SessionScore {
    pub rounds: u32,
    pub goals: u32,
    pub saves: u32,
    pub posts: u32,
}

impl SessionScore {
    pub fn record(&mut self, outcome: ShotOutcome) {
        self.rounds += 1;
        match outcome {
            ShotOutcome::Goal => self.goals += 1,
            ShotOutcome::Save => self.saves += 1,
            ShotOutcome::Post => self.posts += 1,
        }
    }

    /// Goals per round taken (0 before the first round)
    pub fn conversion_rate(&self) -> f32 {
        if self.rounds == 0 {
            0.0
        } else {
            self.goals as f32 / self.rounds as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GOAL_HEIGHT, GOAL_WIDTH};

    fn classify(x: f32, y: f32, saved: bool) -> ShotOutcome {
        classify_outcome(Vec3::new(x, y, -15.0), saved, GOAL_WIDTH, GOAL_HEIGHT)
    }

    #[test]
    fn test_save_checked_first() {
        // Even a ball far wide counts as a save if the roll said so
        assert_eq!(classify(20.0, 1.0, true), ShotOutcome::Save);
    }

    #[test]
    fn test_goal_mouth_edges() {
        assert_eq!(classify(9.99, 7.99, false), ShotOutcome::Goal);
        assert_eq!(classify(10.0, 1.0, false), ShotOutcome::Goal);
        assert_eq!(classify(-10.01, 1.0, false), ShotOutcome::Post);
        assert_eq!(classify(0.0, 8.01, false), ShotOutcome::Post);
        assert_eq!(classify(0.0, -0.01, false), ShotOutcome::Post);
        assert_eq!(classify(0.0, 0.1, false), ShotOutcome::Goal);
    }

    #[test]
    fn test_titles_and_codes() {
        assert_eq!(ShotOutcome::Goal.title(), "¡GOOOOL!");
        assert_eq!(ShotOutcome::Save.title(), "¡Atajada!");
        assert_eq!(ShotOutcome::Post.title(), "¡Fallado!");
        for o in ShotOutcome::ALL {
            assert_eq!(ShotOutcome::from_code(o.code()), Some(o));
        }
    }

    #[test]
    fn test_session_tally() {
        let mut score = SessionScore::default();
        assert_eq!(score.conversion_rate(), 0.0);
        score.record(ShotOutcome::Goal);
        score.record(ShotOutcome::Save);
        score.record(ShotOutcome::Goal);
        score.record(ShotOutcome::Post);
        assert_eq!((score.rounds, score.goals, score.saves, score.posts), (4, 2, 1, 1));
        assert_eq!(score.conversion_rate(), 0.5);
    }
}
