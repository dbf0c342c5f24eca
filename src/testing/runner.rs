//! Test execution engine

use bevy::prelude::*;

use crate::ball::{Ball, BallFlight};
use crate::events::EventBus;
use crate::input::{KickerInput, capture_input};
use crate::keeper::{Goalkeeper, KeeperSkills};
use crate::player::{AimRotation, Kicker};
use crate::round::{GamePhase, KeeperOverride, PenaltySet, RoundState};
use crate::scoring::SessionScore;
use crate::simulation::HeadlessAppBuilder;
use crate::tuning::{self, PenaltyTweaks};

use super::assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
use super::input::{ScriptedInputs, scripted_input};
use super::parser::{KickerSetup, TestDefinition};

/// Frames run when a test names neither inputs nor state checks
const DEFAULT_FRAMES: u64 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

fn keeper_override(test: &TestDefinition) -> KeeperOverride {
    match &test.setup.keeper {
        Some(keeper) => KeeperOverride {
            skills: Some(KeeperSkills {
                reflexes: keeper.reflexes,
                positioning: keeper.positioning,
                reach: keeper.reach,
            }),
            reaction_time: keeper.reaction_time,
        },
        None => KeeperOverride::default(),
    }
}

fn test_tweaks(test: &TestDefinition) -> PenaltyTweaks {
    let mut tweaks = PenaltyTweaks::default();
    if let Err(err) = tuning::apply_global_tuning(&mut tweaks) {
        warn!("{}, using default tuning", err);
    }
    if let Some(pressure) = test.setup.pressure {
        tweaks.pressure = pressure;
    }
    tweaks
}

/// Moves the kicker and sets the look angles once the first round has begun
fn apply_kicker_setup(world: &mut World, setup: &KickerSetup) {
    let mut kickers = world.query_filtered::<&mut Transform, With<Kicker>>();
    for mut transform in kickers.iter_mut(world) {
        if let Some(x) = setup.x {
            transform.translation.x = x;
        }
        if let Some(z) = setup.z {
            transform.translation.z = z;
        }
    }
    let mut aim = world.resource_mut::<AimRotation>();
    if let Some(yaw) = setup.yaw {
        aim.yaw = yaw.to_radians();
    }
    if let Some(pitch) = setup.pitch {
        aim.pitch = pitch.to_radians();
    }
}

/// Snapshot everything a state check can reference
fn capture_world_state(world: &mut World) -> WorldState {
    let mut state = WorldState {
        phase: world.resource::<State<GamePhase>>().get().name().to_string(),
        ..Default::default()
    };

    let round = world.resource::<RoundState>();
    state.round = round.round;
    state.outcome = round.outcome.map(|o| o.code().to_string());
    state.title = round.epilogue_title.map(str::to_string);

    let aim = *world.resource::<AimRotation>();
    state.yaw = aim.yaw.to_degrees();
    state.pitch = aim.pitch.to_degrees();
    state.power = world.resource::<KickerInput>().power;

    let score = world.resource::<SessionScore>().clone();
    state.goals = score.goals;
    state.saves = score.saves;
    state.posts = score.posts;
    state.rounds = score.rounds;

    let mut kickers = world.query_filtered::<&Transform, With<Kicker>>();
    if let Some(transform) = kickers.iter(world).next() {
        state.kicker = transform.translation;
    }
    let mut balls = world.query_filtered::<(&Transform, &BallFlight), With<Ball>>();
    if let Some((transform, flight)) = balls.iter(world).next() {
        state.ball = transform.translation;
        state.ball_flying = flight.active;
    }
    let mut keepers = world.query::<(&Transform, &Goalkeeper)>();
    if let Some((transform, keeper)) = keepers.iter(world).next() {
        state.keeper = transform.translation;
        state.keeper_state = keeper.state.name().to_string();
    }

    state
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let mut scripted = match ScriptedInputs::from_inputs(&test.input) {
        Ok(scripted) => scripted,
        Err(message) => return TestResult::Error { message },
    };
    for state in &test.expect.state {
        scripted.set_max_frame(state.after_frame);
    }
    if let Some(frames) = test.setup.frames {
        scripted.set_max_frame(frames);
    }
    if scripted.max_frame == 0 {
        scripted.max_frame = DEFAULT_FRAMES;
    }
    let max_frame = scripted.max_frame;

    let mut builder = HeadlessAppBuilder::new()
        .with_tweaks(test_tweaks(test))
        .with_keeper_override(keeper_override(test));
    if let Some(seed) = test.setup.seed {
        builder = builder.with_seed(seed);
    }
    let mut app = builder.build();
    app.insert_resource(scripted);
    app.add_systems(
        Update,
        scripted_input.in_set(PenaltySet::Input).before(capture_input),
    );

    let mut state_checks: Vec<_> = test.expect.state.iter().collect();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;

    let mut captured = Vec::new();
    let mut kicker_applied = test.setup.kicker.is_none();

    for frame in 0..=max_frame {
        app.update();

        for (_, event) in app.world_mut().resource_mut::<EventBus>().export_events() {
            captured.push(CapturedEvent::from_game_event(frame, &event));
        }

        if !kicker_applied
            && app.world().resource::<RoundState>().round >= 1
            && let Some(setup) = &test.setup.kicker
        {
            apply_kicker_setup(app.world_mut(), setup);
            kicker_applied = true;
        }

        while next_check < state_checks.len() && state_checks[next_check].after_frame == frame {
            let world_state = capture_world_state(app.world_mut());
            if let Err(error) = check_state(state_checks[next_check], &world_state) {
                return TestResult::Fail { error };
            }
            next_check += 1;
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: max_frame + 1 }
}
