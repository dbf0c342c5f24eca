//! Scene spawning and the between-rounds reset

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ball::{Ball, BallFlight, GoalLineCheck};
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::input::KickerInput;
use crate::keeper::{Goalkeeper, KeeperSkills, roll_in};
use crate::player::{AimRotation, Kicker};
use crate::round::{GameRng, KeeperOverride, RoundState};
use crate::shooting::LastShot;
use crate::tuning::PenaltyTweaks;

/// Startup: kicker, ball and keeper at their spawn points
pub fn spawn_scene(mut commands: Commands, tweaks: Res<PenaltyTweaks>, mut rng: ResMut<GameRng>) {
    commands.spawn((
        Name::new("Kicker"),
        Kicker,
        Transform::from_translation(KICKER_SPAWN),
    ));
    commands.spawn((
        Name::new("Ball"),
        Ball,
        Transform::from_translation(BALL_SPAWN),
        BallFlight::default(),
        GoalLineCheck::default(),
    ));

    let mut keeper = Goalkeeper::new(KEEPER_SPAWN);
    let skills = KeeperSkills::roll(&tweaks, &mut rng.0);
    let reaction = roll_in(tweaks.keeper_reaction, &mut rng.0);
    let home = keeper.reset(skills, reaction, &mut rng.0);
    commands.spawn((Name::new("Goalkeeper"), keeper, Transform::from_translation(home)));
}

/// Everything a round reset touches
#[derive(SystemParam)]
pub struct SceneReset<'w, 's> {
    pub tweaks: Res<'w, PenaltyTweaks>,
    pub keeper_override: Res<'w, KeeperOverride>,
    pub rng: ResMut<'w, GameRng>,
    pub aim: ResMut<'w, AimRotation>,
    pub input: ResMut<'w, KickerInput>,
    pub last_shot: ResMut<'w, LastShot>,
    pub round: ResMut<'w, RoundState>,
    pub event_bus: ResMut<'w, EventBus>,
    pub kicker: Query<'w, 's, &'static mut Transform, (With<Kicker>, Without<Ball>, Without<Goalkeeper>)>,
    pub ball: Query<
        'w,
        's,
        (&'static mut Transform, &'static mut BallFlight, &'static mut GoalLineCheck),
        (With<Ball>, Without<Kicker>, Without<Goalkeeper>),
    >,
    pub keeper: Query<
        'w,
        's,
        (&'static mut Transform, &'static mut Goalkeeper),
        (Without<Kicker>, Without<Ball>),
    >,
}

impl SceneReset<'_, '_> {
    /// Kicker and ball back to their spots, aim zeroed, a new keeper, power 0
    pub fn reset(&mut self) {
        self.round.round += 1;
        self.round.pending_power = None;
        self.round.outcome = None;
        self.round.outcome_timer = 0.0;
        self.round.epilogue_title = None;

        for mut transform in &mut self.kicker {
            *transform = Transform::from_translation(KICKER_SPAWN);
        }
        self.aim.reset();
        self.input.reset();
        self.last_shot.0 = None;

        for (mut transform, mut flight, mut check) in &mut self.ball {
            transform.translation = BALL_SPAWN;
            *flight = BallFlight::default();
            check.reset();
        }

        let skills = self
            .keeper_override
            .skills
            .unwrap_or_else(|| KeeperSkills::roll(&self.tweaks, &mut self.rng.0));
        let reaction = self
            .keeper_override
            .reaction_time
            .unwrap_or_else(|| roll_in(self.tweaks.keeper_reaction, &mut self.rng.0));

        for (mut transform, mut keeper) in &mut self.keeper {
            transform.translation = keeper.reset(skills, reaction, &mut self.rng.0);
        }

        info!(
            "Round {} - keeper R:{:.0} P:{:.0} A:{:.0}",
            self.round.round,
            skills.reflexes * 100.0,
            skills.positioning * 100.0,
            skills.reach * 100.0
        );
        self.event_bus.emit(GameEvent::RoundStart {
            round: self.round.round,
            reflexes: skills.reflexes,
            positioning: skills.positioning,
            reach: skills.reach,
        });
    }
}
