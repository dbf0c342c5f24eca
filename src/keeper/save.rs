//! Save roll at the goal line

use bevy::prelude::*;
use rand::Rng;

use crate::constants::KEEPER_MAX_SAVE_CHANCE;
use crate::keeper::components::KeeperState;
use crate::keeper::skills::KeeperSkills;

/// Outcome of the save check (chance is 0 when the keeper had no play)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveRoll {
    pub saved: bool,
    pub chance: f32,
}

impl SaveRoll {
    pub const NO_PLAY: SaveRoll = SaveRoll {
        saved: false,
        chance: 0.0,
    };
}

/// Effective reach and base save chance for a keeper state
pub fn state_reach(state: KeeperState, skills: &KeeperSkills) -> Option<(f32, f32)> {
    match state {
        KeeperState::Idle | KeeperState::Watching => None,
        KeeperState::Ready => Some((0.8 * skills.reach, 0.7)),
        KeeperState::Stepping => Some((1.3 * skills.reach, 0.5 * skills.positioning)),
        KeeperState::Diving => Some((1.8 * skills.reach, 0.4 * skills.reflexes)),
        KeeperState::Desperate => Some((2.0 * skills.reach, 0.15)),
        _ => Some((1.0, 0.3)),
    }
}

/// Distance across the goal mouth; depth is ignored
fn mouth_distance(ball: Vec3, keeper: Vec3) -> f32 {
    Vec2::new(ball.x - keeper.x, ball.y - keeper.y).length()
}

/// Save chance before the roll. `concentration` is the per-shot multiplier in [0.8, 1.2].
/// None when the keeper has no play on the ball.
pub fn save_chance(
    ball: Vec3,
    keeper: Vec3,
    state: KeeperState,
    skills: &KeeperSkills,
    concentration: f32,
) -> Option<f32> {
    let (reach, mut chance) = state_reach(state, skills)?;
    if mouth_distance(ball, keeper) > reach {
        return None;
    }

    if ball.y > 1.8 {
        chance *= 0.7;
    }
    if ball.y < 0.5 {
        chance *= 1.2;
    }
    if ball.x.abs() > 1.5 {
        chance *= 0.8;
    }
    chance *= concentration;
    Some(chance.clamp(0.0, KEEPER_MAX_SAVE_CHANCE))
}

/// Full save check. Rolls concentration and the save only when the keeper has a play.
pub fn check_save(
    ball: Vec3,
    keeper: Vec3,
    state: KeeperState,
    skills: &KeeperSkills,
    rng: &mut impl Rng,
) -> SaveRoll {
    let Some((reach, _)) = state_reach(state, skills) else {
        return SaveRoll::NO_PLAY;
    };
    if mouth_distance(ball, keeper) > reach {
        return SaveRoll::NO_PLAY;
    }

    let concentration = rng.gen_range(0.8..1.2);
    let chance = save_chance(ball, keeper, state, skills, concentration).unwrap_or(0.0);
    SaveRoll {
        saved: rng.r#gen::<f32>() < chance,
        chance,
    }
}
