//! Scripted kicker that plays rounds through the real input path
//!
//! The bot only touches `ButtonInput<KeyCode>` and `AimRotation`, the same
//! two things a player changes with keyboard and mouse. Runs in
//! `PenaltySet::Input` ahead of `capture_input`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::player::AimRotation;
use crate::round::{GamePhase, RoundState};

use super::profiles::{KickerProfile, ShotPlan};

/// Keys the bot ever holds, released whenever a phase doesn't need them
const BOT_KEYS: [KeyCode; 5] = [
    KeyCode::Enter,
    KeyCode::KeyW,
    KeyCode::ShiftLeft,
    KeyCode::Space,
    KeyCode::KeyR,
];

/// Bot state for the session
#[derive(Resource, Debug)]
pub struct KickerBot {
    pub profile: KickerProfile,
    /// Overrides the profile roll every round (shot grid cells)
    pub fixed_plan: Option<ShotPlan>,
    /// Rounds to start before the bot stops pressing retry
    pub rounds: u32,
    /// Shot for the round in progress
    pub plan: Option<ShotPlan>,
    /// Seconds Space has been held, None before the charge starts
    pub charge_held: Option<f32>,
    /// Kick released this round
    pub kicked: bool,
    rng: StdRng,
}

impl KickerBot {
    pub fn new(profile: KickerProfile, rounds: u32, seed: u64) -> Self {
        Self {
            profile,
            fixed_plan: None,
            rounds,
            plan: None,
            charge_held: None,
            kicked: false,
            // Separate stream so the bot's choices don't shift the game's rolls
            rng: StdRng::seed_from_u64(seed ^ 0x6b69_636b),
        }
    }

    /// Same shot every round
    pub fn with_plan(mut self, plan: ShotPlan) -> Self {
        self.fixed_plan = Some(plan);
        self
    }

    fn next_plan(&mut self) -> ShotPlan {
        match self.fixed_plan {
            Some(plan) => plan,
            None => self.profile.plan(&mut self.rng),
        }
    }

    fn clear_round(&mut self) {
        self.plan = None;
        self.charge_held = None;
        self.kicked = false;
    }
}

fn hold_only(keyboard: &mut ButtonInput<KeyCode>, keys: &[KeyCode]) {
    for key in BOT_KEYS {
        if keys.contains(&key) {
            keyboard.press(key);
        } else {
            keyboard.release(key);
        }
    }
}

/// Decide this frame's key state from the current phase
pub fn kicker_bot_update(
    phase: Res<State<GamePhase>>,
    round: Res<RoundState>,
    time: Res<Time>,
    mut bot: ResMut<KickerBot>,
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    mut aim: ResMut<AimRotation>,
) {
    match phase.get() {
        GamePhase::Intro => {
            if bot.rounds > 0 {
                hold_only(&mut keyboard, &[KeyCode::Enter]);
            }
        }
        GamePhase::PrePenal => {
            bot.clear_round();
            hold_only(&mut keyboard, &[KeyCode::KeyW, KeyCode::ShiftLeft]);
        }
        GamePhase::Aiming => {
            let plan = match bot.plan {
                Some(plan) => plan,
                None => {
                    let plan = bot.next_plan();
                    debug!(
                        "Bot plan: yaw {:.1}°, pitch {:.1}°, charge {:.2}s",
                        plan.yaw.to_degrees(),
                        plan.pitch.to_degrees(),
                        plan.charge_time
                    );
                    bot.plan = Some(plan);
                    plan
                }
            };
            aim.yaw = plan.yaw;
            aim.pitch = plan.pitch;

            if bot.kicked {
                hold_only(&mut keyboard, &[]);
                return;
            }
            let held = bot.charge_held.map_or(0.0, |h| h + time.delta_secs());
            if bot.charge_held.is_some() && held >= plan.charge_time {
                bot.kicked = true;
                hold_only(&mut keyboard, &[]);
            } else {
                hold_only(&mut keyboard, &[KeyCode::Space]);
            }
            bot.charge_held = Some(held);
        }
        GamePhase::Kick | GamePhase::Outcome => {
            hold_only(&mut keyboard, &[]);
        }
        GamePhase::Epilogue => {
            if round.round < bot.rounds {
                hold_only(&mut keyboard, &[KeyCode::KeyR]);
            } else {
                hold_only(&mut keyboard, &[]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_plan_wins_over_profile() {
        let plan = ShotPlan::from_degrees(10.0, 5.0, 1.0);
        let mut bot = KickerBot::new(KickerProfile::default(), 1, 1).with_plan(plan);
        assert_eq!(bot.next_plan(), plan);
        assert_eq!(bot.next_plan(), plan);
    }

    #[test]
    fn test_same_seed_same_plans() {
        let mut a = KickerBot::new(KickerProfile::default(), 3, 42);
        let mut b = KickerBot::new(KickerProfile::default(), 3, 42);
        for _ in 0..3 {
            assert_eq!(a.next_plan(), b.next_plan());
        }
    }

    #[test]
    fn test_hold_only_releases_other_keys() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        hold_only(&mut keyboard, &[KeyCode::KeyW, KeyCode::ShiftLeft]);
        assert!(keyboard.pressed(KeyCode::KeyW));
        hold_only(&mut keyboard, &[KeyCode::Space]);
        assert!(!keyboard.pressed(KeyCode::KeyW));
        assert!(!keyboard.pressed(KeyCode::ShiftLeft));
        assert!(keyboard.pressed(KeyCode::Space));
    }
}
