//! Round module - the penalty-kick state machine and its plugin
//!
//! INTRO → PRE_PENAL → AIMING → KICK → OUTCOME → EPILOGUE, then back to
//! PRE_PENAL on retry. Every phase is a Bevy state; per-phase behavior lives in
//! `OnEnter`/`OnExit` systems and `Update` systems gated with `in_state`.

mod reset;
mod systems;

pub use reset::*;
pub use systems::*;

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ball::{ball_flight, stop_ball};
use crate::events::{EventBus, update_event_bus_time};
use crate::input::{KickerInput, capture_input};
use crate::keeper::{KeeperSkills, keeper_aiming_start, keeper_tick};
use crate::player::{AimRotation, ShotPreview, aiming_profile, apply_mouse_look, prepenal_movement};
use crate::scoring::{SessionScore, ShotOutcome};
use crate::shooting::LastShot;
use crate::tuning::PenaltyTweaks;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Intro,
    PrePenal,
    Aiming,
    Kick,
    Outcome,
    Epilogue,
}

impl GamePhase {
    pub const ALL: [GamePhase; 6] = [
        GamePhase::Intro,
        GamePhase::PrePenal,
        GamePhase::Aiming,
        GamePhase::Kick,
        GamePhase::Outcome,
        GamePhase::Epilogue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Intro => "Intro",
            GamePhase::PrePenal => "PrePenal",
            GamePhase::Aiming => "Aiming",
            GamePhase::Kick => "Kick",
            GamePhase::Outcome => "Outcome",
            GamePhase::Epilogue => "Epilogue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Shared randomness for shots, keeper rolls and patrols. Seed it for replays.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Per-round bookkeeping
#[derive(Resource, Default, Debug)]
pub struct RoundState {
    /// 1-based, 0 before the first reset
    pub round: u32,
    /// Power of the kick accepted in AIMING, consumed on entering KICK
    pub pending_power: Option<f32>,
    pub outcome: Option<ShotOutcome>,
    /// Seconds spent in OUTCOME
    pub outcome_timer: f32,
    pub epilogue_title: Option<&'static str>,
}

/// Fixed keeper for scenarios and sweeps (replaces the per-round roll)
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct KeeperOverride {
    pub skills: Option<KeeperSkills>,
    pub reaction_time: Option<f32>,
}

/// Frame ordering inside `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PenaltySet {
    Input,
    Movement,
    Keeper,
    Ball,
    Resolve,
}

/// Registers every resource and system the penalty round needs.
/// Requires `StatesPlugin` (or `DefaultPlugins`) to be added first.
pub struct PenaltyPlugin;

impl Plugin for PenaltyPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<EventBus>() {
            app.insert_resource(EventBus::new());
        }

        app.init_state::<GamePhase>()
            .init_resource::<PenaltyTweaks>()
            .init_resource::<GameRng>()
            .init_resource::<KeeperOverride>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<AccumulatedMouseMotion>()
            .init_resource::<KickerInput>()
            .init_resource::<AimRotation>()
            .init_resource::<ShotPreview>()
            .init_resource::<LastShot>()
            .init_resource::<RoundState>()
            .init_resource::<SessionScore>()
            .configure_sets(
                Update,
                (
                    PenaltySet::Input,
                    PenaltySet::Movement,
                    PenaltySet::Keeper,
                    PenaltySet::Ball,
                    PenaltySet::Resolve,
                )
                    .chain(),
            )
            .add_systems(Startup, spawn_scene)
            .add_systems(
                Update,
                (update_event_bus_time, capture_input, apply_mouse_look, track_phase_changes)
                    .chain()
                    .in_set(PenaltySet::Input),
            )
            .add_systems(
                Update,
                (
                    intro_start.run_if(in_state(GamePhase::Intro)),
                    prepenal_movement.run_if(in_state(GamePhase::PrePenal)),
                    (aiming_profile, aiming_take_kick)
                        .chain()
                        .run_if(in_state(GamePhase::Aiming)),
                    drop_stray_kick.run_if(not(in_state(GamePhase::Aiming))),
                    epilogue_retry.run_if(in_state(GamePhase::Epilogue)),
                )
                    .in_set(PenaltySet::Movement),
            )
            .add_systems(Update, keeper_tick.in_set(PenaltySet::Keeper))
            .add_systems(
                Update,
                ball_flight
                    .run_if(in_state(GamePhase::Kick))
                    .in_set(PenaltySet::Ball),
            )
            .add_systems(
                Update,
                (
                    resolve_kick.run_if(in_state(GamePhase::Kick)),
                    outcome_countdown.run_if(in_state(GamePhase::Outcome)),
                )
                    .in_set(PenaltySet::Resolve),
            )
            .add_systems(OnEnter(GamePhase::PrePenal), enable_movement)
            .add_systems(OnExit(GamePhase::PrePenal), disable_movement)
            .add_systems(OnEnter(GamePhase::Aiming), keeper_aiming_start)
            .add_systems(OnEnter(GamePhase::Kick), start_kick)
            .add_systems(OnExit(GamePhase::Kick), stop_ball)
            .add_systems(OnEnter(GamePhase::Outcome), enter_outcome)
            .add_systems(OnEnter(GamePhase::Epilogue), enter_epilogue);
    }
}
