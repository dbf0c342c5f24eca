//! Keeper decision table and action motion targets

use bevy::prelude::*;

use crate::keeper::components::{KeeperLimits, KeeperState};
use crate::keeper::skills::KeeperSkills;
use crate::tween::Ease;

/// Chance of a desperate lunge when nothing else fits
const DESPERATION_CHANCE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeeperAction {
    StayReady,
    Step,
    Dive,
    Desperate,
    Watch,
}

impl KeeperAction {
    pub const ALL: [KeeperAction; 5] = [
        KeeperAction::StayReady,
        KeeperAction::Step,
        KeeperAction::Dive,
        KeeperAction::Desperate,
        KeeperAction::Watch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KeeperAction::StayReady => "StayReady",
            KeeperAction::Step => "Step",
            KeeperAction::Dive => "Dive",
            KeeperAction::Desperate => "Desperate",
            KeeperAction::Watch => "Watch",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Keeper state while performing this action
    pub fn state(&self) -> KeeperState {
        match self {
            KeeperAction::StayReady => KeeperState::Ready,
            KeeperAction::Step => KeeperState::Stepping,
            KeeperAction::Dive => KeeperState::Diving,
            KeeperAction::Desperate => KeeperState::Desperate,
            KeeperAction::Watch => KeeperState::Watching,
        }
    }
}

/// Pick an action from the predicted crossing point.
/// `desperation_roll` is uniform in [0, 1).
pub fn decide(target: Option<Vec3>, skills: &KeeperSkills, desperation_roll: f32) -> KeeperAction {
    let Some(target) = target else {
        return KeeperAction::StayReady;
    };

    let offset = target.x.abs();
    let height = target.y;
    // Distance of the crossing point from the goal-mouth origin
    let target_offset = target.x.hypot(target.y);

    let can_reach = offset <= skills.reach * 2.5;
    let has_time = target_offset < 3.0 + skills.reflexes * 2.0;
    let well_positioned = skills.positioning > 0.6;

    if offset < 0.8 && height < 1.0 {
        KeeperAction::StayReady
    } else if offset < 1.5 && has_time && well_positioned {
        KeeperAction::Step
    } else if can_reach && has_time && skills.reflexes > 0.7 {
        KeeperAction::Dive
    } else if desperation_roll < DESPERATION_CHANCE {
        KeeperAction::Desperate
    } else {
        KeeperAction::Watch
    }
}

/// Destination, duration and easing of an action tween, starting at `pos`
pub fn action_motion(
    action: KeeperAction,
    target: Option<Vec3>,
    pos: Vec3,
    home: Vec3,
    skills: &KeeperSkills,
    limits: &KeeperLimits,
) -> (Vec3, f32, Ease) {
    let target_x = target.map(|t| t.x).unwrap_or(0.0);
    let target_y = target.map(|t| t.y).unwrap_or(0.0);
    let sign = if target_x > 0.0 { 1.0 } else { -1.0 };

    match action {
        KeeperAction::StayReady => (Vec3::new(pos.x, home.y - 0.1, pos.z), 0.3, Ease::CubicOut),
        KeeperAction::Step => {
            let step = (target_x.abs() * 0.7).min(1.0) * skills.positioning;
            (
                Vec3::new(pos.x + sign * step, home.y - 0.05, pos.z),
                0.3,
                Ease::CubicOut,
            )
        }
        KeeperAction::Dive => {
            let dive_x = (target_x.abs() * skills.reach).min(limits.max_x);
            let dive_y = (target_y * 0.8).max(0.2).min(limits.max_y);
            (
                Vec3::new(pos.x + sign * dive_x, dive_y, pos.z),
                0.4,
                Ease::CubicOut,
            )
        }
        KeeperAction::Desperate => (
            Vec3::new(pos.x + sign * 1.5, home.y + 0.3, pos.z),
            0.5,
            Ease::CubicOut,
        ),
        KeeperAction::Watch => (
            Vec3::new(pos.x + sign * 0.3, home.y - 0.05, pos.z),
            0.4,
            Ease::SineOut,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::KEEPER_SPAWN;

    fn skills(reflexes: f32, positioning: f32, reach: f32) -> KeeperSkills {
        KeeperSkills {
            reflexes,
            positioning,
            reach,
        }
    }

    fn at(x: f32, y: f32) -> Option<Vec3> {
        Some(Vec3::new(x, y, -15.0))
    }

    #[test]
    fn test_no_prediction_stays_ready() {
        assert_eq!(decide(None, &skills(0.9, 0.9, 0.9), 0.0), KeeperAction::StayReady);
    }

    #[test]
    fn test_central_low_shot_stays_ready() {
        assert_eq!(decide(at(0.5, 0.5), &skills(0.6, 0.5, 0.7), 0.0), KeeperAction::StayReady);
        // Central but high is not "ready"
        assert_ne!(decide(at(0.5, 1.5), &skills(0.6, 0.5, 0.7), 0.9), KeeperAction::StayReady);
    }

    #[test]
    fn test_step_needs_positioning() {
        assert_eq!(decide(at(1.2, 1.0), &skills(0.6, 0.7, 0.7), 0.9), KeeperAction::Step);
        // Poor positioning falls through to the dive check (reflexes too low) then watch
        assert_eq!(decide(at(1.2, 1.0), &skills(0.6, 0.5, 0.7), 0.9), KeeperAction::Watch);
    }

    #[test]
    fn test_dive_needs_reflexes_and_reach() {
        // |x| = 1.9 <= 0.8 * 2.5; offset 2.15 < 3 + 1.6
        assert_eq!(decide(at(1.9, 1.0), &skills(0.8, 0.5, 0.8), 0.9), KeeperAction::Dive);
        assert_eq!(decide(at(1.9, 1.0), &skills(0.7, 0.5, 0.8), 0.9), KeeperAction::Watch);
        // Out of reach
        assert_eq!(decide(at(2.2, 0.5), &skills(0.8, 0.5, 0.7), 0.9), KeeperAction::Watch);
    }

    #[test]
    fn test_no_time_means_desperate_or_watch() {
        // Far corner: offset 6.4 > 3 + 1.8
        let target = at(5.0, 4.0);
        let s = skills(0.9, 0.9, 0.9);
        assert_eq!(decide(target, &s, 0.29), KeeperAction::Desperate);
        assert_eq!(decide(target, &s, 0.3), KeeperAction::Watch);
    }

    #[test]
    fn test_action_motion_targets() {
        let s = skills(0.8, 0.8, 0.8);
        let limits = KeeperLimits::around(KEEPER_SPAWN);
        let pos = Vec3::new(0.5, 0.0, -14.8);

        let (dest, dur, ease) = action_motion(KeeperAction::Step, at(-1.0, 1.0), pos, KEEPER_SPAWN, &s, &limits);
        assert!((dest.x - (0.5 - 0.7 * 0.8)).abs() < 1e-5);
        assert!((dest.y + 0.05).abs() < 1e-6);
        assert_eq!((dur, ease), (0.3, Ease::CubicOut));

        let (dest, dur, _) = action_motion(KeeperAction::Dive, at(4.0, 3.0), pos, KEEPER_SPAWN, &s, &limits);
        assert!((dest.x - (0.5 + 3.2)).abs() < 1e-5);
        assert!((dest.y - 2.0).abs() < 1e-5);
        assert_eq!(dur, 0.4);

        let (dest, _, _) = action_motion(KeeperAction::Dive, at(-2.0, 0.1), pos, KEEPER_SPAWN, &s, &limits);
        assert!((dest.y - 0.2).abs() < 1e-6);

        let (dest, dur, ease) = action_motion(KeeperAction::Watch, at(2.0, 1.0), pos, KEEPER_SPAWN, &s, &limits);
        assert!((dest.x - 0.8).abs() < 1e-5);
        assert_eq!((dur, ease), (0.4, Ease::SineOut));

        let (dest, dur, _) = action_motion(KeeperAction::Desperate, at(-3.0, 1.0), pos, KEEPER_SPAWN, &s, &limits);
        assert!((dest.x + 1.0).abs() < 1e-5);
        assert!((dest.y - 0.3).abs() < 1e-6);
        assert_eq!(dur, 0.5);
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in KeeperAction::ALL {
            assert_eq!(KeeperAction::from_name(action.name()), Some(action));
        }
        assert_eq!(KeeperAction::from_name("Juggle"), None);
    }
}
