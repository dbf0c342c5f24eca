//! Phase systems for the penalty round

use bevy::prelude::*;

use crate::ball::{Ball, BallFlight, GoalLineCheck};
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::input::KickerInput;
use crate::keeper::{Goalkeeper, SaveRoll, check_save};
use crate::player::AimRotation;
use crate::round::{GamePhase, GameRng, RoundState, SceneReset};
use crate::scoring::{SessionScore, ShotOutcome, classify_outcome};
use crate::shooting::{LastShot, ShotModel};
use crate::tuning::PenaltyTweaks;

/// Emit a PhaseChange whenever the state machine moves
pub fn track_phase_changes(
    phase: Res<State<GamePhase>>,
    mut last: Local<Option<GamePhase>>,
    mut event_bus: ResMut<EventBus>,
) {
    let current = *phase.get();
    if *last == Some(current) {
        return;
    }
    if let Some(previous) = *last {
        debug!("Phase {} -> {}", previous.name(), current.name());
        event_bus.emit(GameEvent::PhaseChange {
            from: previous.name().to_string(),
            to: current.name().to_string(),
        });
    }
    *last = Some(current);
}

/// INTRO: Enter starts the first round
pub fn intro_start(mut scene: SceneReset, mut next_phase: ResMut<NextState<GamePhase>>) {
    if scene.input.take_start() {
        scene.reset();
        next_phase.set(GamePhase::PrePenal);
    }
}

pub fn enable_movement(mut input: ResMut<KickerInput>) {
    input.set_movement_enabled(true);
}

pub fn disable_movement(mut input: ResMut<KickerInput>) {
    input.set_movement_enabled(false);
}

/// AIMING: a released charge becomes the kick
pub fn aiming_take_kick(
    aim: Res<AimRotation>,
    mut input: ResMut<KickerInput>,
    mut round: ResMut<RoundState>,
    mut event_bus: ResMut<EventBus>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    let Some(power) = input.take_kick() else {
        return;
    };
    info!("Kick: power {:.2}, yaw {:.3}, pitch {:.3}", power, aim.yaw, aim.pitch);
    round.pending_power = Some(power);
    event_bus.emit(GameEvent::Kick {
        power,
        yaw: aim.yaw,
        pitch: aim.pitch,
    });
    next_phase.set(GamePhase::Kick);
}

/// Any phase but AIMING: a released charge is discarded
pub fn drop_stray_kick(mut input: ResMut<KickerInput>) {
    if let Some(power) = input.take_kick() {
        debug!("Kick ({:.2}) ignored outside aiming", power);
    }
}

/// OnEnter(KICK): build the shot, launch the ball, alert the keeper
#[allow(clippy::too_many_arguments)]
pub fn start_kick(
    tweaks: Res<PenaltyTweaks>,
    aim: Res<AimRotation>,
    mut rng: ResMut<GameRng>,
    mut round: ResMut<RoundState>,
    mut input: ResMut<KickerInput>,
    mut last_shot: ResMut<LastShot>,
    mut ball_query: Query<&mut BallFlight, With<Ball>>,
    mut keeper_query: Query<(&mut Transform, &mut Goalkeeper)>,
    mut event_bus: ResMut<EventBus>,
) {
    let power = round.pending_power.take().unwrap_or(0.0);
    input.power = 0.0;

    let model = ShotModel::from_tweaks(&tweaks);
    let shot = model.calculate_trajectory(aim.rotation(), power, tweaks.pressure, &mut rng.0);

    for mut flight in &mut ball_query {
        flight.launch(shot.initial_velocity);
    }
    for (mut transform, mut keeper) in &mut keeper_query {
        transform.translation = keeper.react_to_shot(shot.target_point, transform.translation);
    }

    let v = shot.initial_velocity;
    event_bus.emit(GameEvent::ShotComputed {
        velocity: (v.x, v.y, v.z),
        target: shot.target_point.map(|t| (t.x, t.y)),
    });
    last_shot.0 = Some(shot);
}

/// KICK: once the ball reaches the line, roll the save and classify
pub fn resolve_kick(
    mut rng: ResMut<GameRng>,
    mut round: ResMut<RoundState>,
    mut score: ResMut<SessionScore>,
    mut ball_query: Query<&mut GoalLineCheck, With<Ball>>,
    keeper_query: Query<(&Transform, &Goalkeeper)>,
    mut event_bus: ResMut<EventBus>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    let Ok(mut check) = ball_query.single_mut() else {
        return;
    };
    let Some(crossing) = check.crossing.take() else {
        return;
    };

    let outcome = if crossing.timed_out {
        ShotOutcome::Post
    } else {
        let roll = match keeper_query.single() {
            Ok((transform, keeper)) => check_save(
                crossing.position,
                transform.translation,
                keeper.state,
                &keeper.skills,
                &mut rng.0,
            ),
            Err(_) => SaveRoll::NO_PLAY,
        };
        event_bus.emit(GameEvent::KeeperSave {
            saved: roll.saved,
            chance: roll.chance,
        });
        classify_outcome(crossing.position, roll.saved, GOAL_WIDTH, GOAL_HEIGHT)
    };

    info!(
        "Round {}: {} at ({:.2}, {:.2})",
        round.round,
        outcome.code(),
        crossing.position.x,
        crossing.position.y
    );
    round.outcome = Some(outcome);
    score.record(outcome);
    event_bus.emit(GameEvent::Outcome {
        result: outcome.code().to_string(),
    });
    next_phase.set(GamePhase::Outcome);
}

pub fn enter_outcome(mut round: ResMut<RoundState>) {
    round.outcome_timer = 0.0;
}

/// OUTCOME: hold the result on screen, then show the epilogue
pub fn outcome_countdown(
    time: Res<Time>,
    tweaks: Res<PenaltyTweaks>,
    mut round: ResMut<RoundState>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    round.outcome_timer += time.delta_secs();
    if round.outcome_timer >= tweaks.outcome_delay {
        next_phase.set(GamePhase::Epilogue);
    }
}

/// OnEnter(EPILOGUE): pick the title and close the round
pub fn enter_epilogue(
    mut round: ResMut<RoundState>,
    score: Res<SessionScore>,
    mut input: ResMut<KickerInput>,
    mut event_bus: ResMut<EventBus>,
) {
    let title = round.outcome.map(|o| o.title()).unwrap_or(ShotOutcome::Post.title());
    round.epilogue_title = Some(title);
    info!(
        "{} ({} goals / {} rounds)",
        title, score.goals, score.rounds
    );
    // Retry presses from earlier phases don't count
    input.take_retry();
    event_bus.emit(GameEvent::RoundEnd {
        round: round.round,
        goals: score.goals,
        saves: score.saves,
        posts: score.posts,
    });
}

/// EPILOGUE: R plays another round
pub fn epilogue_retry(mut scene: SceneReset, mut next_phase: ResMut<NextState<GamePhase>>) {
    if scene.input.take_retry() {
        scene.reset();
        next_phase.set(GamePhase::PrePenal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keeper::KeeperState;
    use crate::round::{KeeperOverride, PenaltyPlugin};
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / 60.0,
        )));
        app.insert_resource(GameRng::seeded(12));
        app.add_plugins(PenaltyPlugin);
        app.update();
        app
    }

    fn phase(app: &App) -> GamePhase {
        *app.world().resource::<State<GamePhase>>().get()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
    }

    fn release(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().release(key);
    }

    fn run_until(app: &mut App, target: GamePhase, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if phase(app) == target {
                return true;
            }
            app.update();
        }
        phase(app) == target
    }

    fn kicker_pos(app: &mut App) -> Vec3 {
        let mut query = app.world_mut().query_filtered::<&Transform, With<crate::player::Kicker>>();
        query.single(app.world()).map(|t| t.translation).unwrap_or_default()
    }

    #[test]
    fn test_starts_in_intro_and_waits() {
        let mut app = test_app();
        for _ in 0..30 {
            app.update();
        }
        assert_eq!(phase(&app), GamePhase::Intro);
        assert_eq!(app.world().resource::<RoundState>().round, 0);
    }

    #[test]
    fn test_enter_starts_round_one() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        assert_eq!(app.world().resource::<RoundState>().round, 1);
        assert!(app.world().resource::<KickerInput>().movement_enabled);
    }

    #[test]
    fn test_walking_up_starts_aiming() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        release(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::KeyW);
        press(&mut app, KeyCode::ShiftLeft);
        // 7.5 m at 6 m/s
        assert!(run_until(&mut app, GamePhase::Aiming, 120));
        let pos = kicker_pos(&mut app);
        assert!(pos.z < APPROACH_DISTANCE + 0.2);
        assert!(!app.world().resource::<KickerInput>().movement_enabled);

        // Keeper switched to the aiming patrol
        let mut keepers = app.world_mut().query::<&Goalkeeper>();
        let keeper = keepers.single(app.world()).unwrap();
        assert_eq!(keeper.state, KeeperState::AimingActive);
    }

    #[test]
    fn test_full_round_reaches_epilogue_and_retries() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        release(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::KeyW);
        press(&mut app, KeyCode::ShiftLeft);
        assert!(run_until(&mut app, GamePhase::Aiming, 120));
        release(&mut app, KeyCode::KeyW);
        release(&mut app, KeyCode::ShiftLeft);

        // Charge for ~1 s then release
        press(&mut app, KeyCode::Space);
        for _ in 0..60 {
            app.update();
        }
        release(&mut app, KeyCode::Space);
        assert!(run_until(&mut app, GamePhase::Kick, 5));
        assert!(app.world().resource::<LastShot>().0.is_some());

        assert!(run_until(&mut app, GamePhase::Outcome, 60 * 7));
        let outcome = app.world().resource::<RoundState>().outcome;
        assert!(outcome.is_some());

        // Two seconds of outcome before the epilogue
        assert!(run_until(&mut app, GamePhase::Epilogue, 130));
        let state = app.world().resource::<RoundState>();
        assert_eq!(state.epilogue_title, outcome.map(|o| o.title()));
        assert_eq!(app.world().resource::<SessionScore>().rounds, 1);

        press(&mut app, KeyCode::KeyR);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        assert_eq!(app.world().resource::<RoundState>().round, 2);
        assert_eq!(kicker_pos(&mut app), KICKER_SPAWN);
    }

    #[test]
    fn test_space_outside_aiming_does_nothing() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        press(&mut app, KeyCode::Space);
        app.update();
        release(&mut app, KeyCode::Space);
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(phase(&app), GamePhase::PrePenal);
        assert!(app.world().resource::<KickerInput>().kick.is_none());
    }

    #[test]
    fn test_keeper_override_applies_on_reset() {
        let mut app = test_app();
        let skills = crate::keeper::KeeperSkills {
            reflexes: 0.61,
            positioning: 0.62,
            reach: 0.63,
        };
        app.insert_resource(KeeperOverride {
            skills: Some(skills),
            reaction_time: Some(0.3),
        });
        press(&mut app, KeyCode::Enter);
        assert!(run_until(&mut app, GamePhase::PrePenal, 5));
        let mut keepers = app.world_mut().query::<&Goalkeeper>();
        let keeper = keepers.single(app.world()).unwrap();
        assert_eq!(keeper.skills, skills);
        assert_eq!(keeper.reaction_time, 0.3);
    }
}
