//! Ball flight systems

use bevy::prelude::*;

use crate::ball::components::*;
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::tuning::PenaltyTweaks;

/// One explicit Euler step: move, then apply gravity, then clamp to the floor
pub fn integrate_ball(pos: Vec3, vel: Vec3, dt: f32, gravity: f32) -> (Vec3, Vec3) {
    let mut pos = pos + vel * dt;
    let mut vel = vel;
    vel.y -= gravity * dt;

    if pos.y < BALL_REST_HEIGHT {
        pos.y = BALL_REST_HEIGHT;
        vel.y = 0.0;
    }
    (pos, vel)
}

/// KICK: integrate the flight and latch the first goal-line crossing
pub fn ball_flight(
    time: Res<Time>,
    tweaks: Res<PenaltyTweaks>,
    mut query: Query<(&mut Transform, &mut BallFlight, &mut GoalLineCheck), With<Ball>>,
    mut event_bus: ResMut<EventBus>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut flight, mut check) in &mut query {
        if !flight.active {
            continue;
        }

        let (pos, vel) = integrate_ball(transform.translation, flight.velocity, dt, tweaks.gravity);
        transform.translation = pos;
        flight.velocity = vel;
        flight.elapsed += dt;

        if check.crossed {
            continue;
        }

        let crossing = if pos.z <= GOAL_LINE_Z {
            Some(BallCrossing {
                position: pos,
                timed_out: false,
            })
        } else if flight.elapsed >= tweaks.max_flight_time {
            warn!("Ball never reached the goal line ({:.1}s)", flight.elapsed);
            Some(BallCrossing {
                position: pos,
                timed_out: true,
            })
        } else {
            None
        };

        if let Some(crossing) = crossing {
            check.record(crossing);
            event_bus.emit(GameEvent::BallCrossed {
                pos: (pos.x, pos.y, pos.z),
                timed_out: crossing.timed_out,
            });
        }
    }
}

/// Leaving KICK zeroes the ball velocity
pub fn stop_ball(mut query: Query<&mut BallFlight, With<Ball>>) {
    for mut flight in &mut query {
        flight.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_applies_gravity_after_move() {
        let (pos, vel) = integrate_ball(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, -3.0), 0.5, 9.8);
        assert!((pos - Vec3::new(0.5, 2.0, -1.5)).length() < 1e-5);
        assert!((vel.y - (2.0 - 4.9)).abs() < 1e-5);
        assert_eq!(vel.x, 1.0);
        assert_eq!(vel.z, -3.0);
    }

    #[test]
    fn test_floor_clamp() {
        let (pos, vel) = integrate_ball(Vec3::new(0.0, 0.2, 0.0), Vec3::new(0.0, -5.0, -10.0), 0.1, 9.8);
        assert_eq!(pos.y, BALL_REST_HEIGHT);
        assert_eq!(vel.y, 0.0);
        assert!((pos.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_crossing_latches_once() {
        let mut check = GoalLineCheck::default();
        check.record(BallCrossing {
            position: Vec3::new(1.0, 2.0, -15.1),
            timed_out: false,
        });
        check.record(BallCrossing {
            position: Vec3::ZERO,
            timed_out: true,
        });
        let first = check.crossing.take().unwrap();
        assert_eq!(first.position.x, 1.0);
        assert!(check.crossed);
        check.record(BallCrossing {
            position: Vec3::ZERO,
            timed_out: true,
        });
        assert!(check.crossing.is_none());
    }

    #[test]
    fn test_flight_system_detects_goal_line() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_secs_f32(1.0 / 60.0),
        ));
        app.init_resource::<PenaltyTweaks>();
        app.insert_resource(EventBus::new());
        app.add_systems(Update, ball_flight);

        let mut flight = BallFlight::default();
        flight.launch(Vec3::new(0.0, 5.0, -30.0));
        let ball = app
            .world_mut()
            .spawn((Ball, Transform::from_translation(BALL_SPAWN), flight, GoalLineCheck::default()))
            .id();

        for _ in 0..60 {
            app.update();
        }

        let check = app.world().get::<GoalLineCheck>(ball).unwrap();
        assert!(check.crossed);
        let crossing = check.crossing.unwrap();
        assert!(!crossing.timed_out);
        assert!(crossing.position.z <= GOAL_LINE_Z);

        let bus = app.world().resource::<EventBus>();
        let crossings = bus
            .peek()
            .iter()
            .filter(|e| matches!(e.event, GameEvent::BallCrossed { .. }))
            .count();
        assert_eq!(crossings, 1);
    }
}
