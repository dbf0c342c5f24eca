//! Keeper systems

use bevy::prelude::*;
use rand::Rng;

use crate::constants::KEEPER_RECOVERY_RANGE;
use crate::events::{EventBus, GameEvent};
use crate::keeper::components::*;
use crate::keeper::decision::{KeeperAction, decide};
use crate::keeper::patrol::Patrol;
use crate::keeper::skills::roll_in;
use crate::round::GameRng;

/// Advance one keeper by `dt`. Returns the new position and the action
/// committed this step, if the reaction time ran out.
pub fn step_keeper(
    keeper: &mut Goalkeeper,
    pos: Vec3,
    dt: f32,
    rng: &mut impl Rng,
) -> (Vec3, Option<KeeperAction>) {
    let mut pos = pos;
    let mut decided = None;

    if let Some(pending) = keeper.pending.as_mut() {
        pending.remaining -= dt;
        if pending.remaining <= 0.0 {
            let target = pending.target;
            keeper.pending = None;
            let action = decide(target, &keeper.skills, rng.r#gen());
            let recovery = roll_in(KEEPER_RECOVERY_RANGE, rng);
            keeper.commit(action, target, pos, recovery);
            decided = Some(action);
        }
    }

    if let Some(timer) = keeper.recovery_timer.as_mut() {
        *timer -= dt;
        if *timer <= 0.0 {
            keeper.recovery_timer = None;
            if keeper.state != KeeperState::Idle {
                keeper.begin_recovery(pos);
            }
        }
    }

    if let Some(motion) = keeper.motion.as_mut() {
        pos = motion.advance(dt);
        if motion.is_finished() {
            keeper.motion = None;
            if keeper.state == KeeperState::Recovering {
                keeper.state = KeeperState::Idle;
                keeper.patrol = Some(Patrol::idle(rng));
            }
        }
    } else if let Some(patrol) = keeper.patrol.as_mut() {
        pos = patrol.advance(pos, keeper.home, dt);
    }

    (pos, decided)
}

/// Runs every frame in every phase: reaction clock, action tweens, recovery, patrol
pub fn keeper_tick(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut query: Query<(&mut Transform, &mut Goalkeeper)>,
    mut event_bus: ResMut<EventBus>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut keeper) in &mut query {
        let (pos, decided) = step_keeper(&mut keeper, transform.translation, dt, &mut rng.0);
        transform.translation = pos;

        if let Some(action) = decided {
            debug!(
                "Keeper decision: {} (R:{:.0} P:{:.0} A:{:.0})",
                action.name(),
                keeper.skills.reflexes * 100.0,
                keeper.skills.positioning * 100.0,
                keeper.skills.reach * 100.0
            );
            event_bus.emit(GameEvent::KeeperDecision {
                action: action.name().to_string(),
            });
        }
    }
}

/// OnEnter(Aiming): switch to the aiming patrol
pub fn keeper_aiming_start(mut query: Query<&mut Goalkeeper>) {
    for mut keeper in &mut query {
        keeper.on_aiming_start();
    }
}
