//! Kicker movement systems

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::ball::Ball;
use crate::constants::*;
use crate::input::KickerInput;
use crate::player::components::*;
use crate::round::GamePhase;
use crate::tuning::PenaltyTweaks;

/// Horizontal (x, z) distance from the penalty spot
fn area_distance(pos: Vec3) -> f32 {
    Vec2::new(pos.x - PENALTY_SPOT.x, pos.z - PENALTY_SPOT.z).length()
}

/// Apply a walking step if it keeps the kicker in the penalty area.
/// A kicker standing outside the area (the spawn point) may still step inward.
pub fn constrain_to_area(current: Vec3, step: Vec3) -> Vec3 {
    let next = current + step;
    let next_dist = area_distance(next);
    if next_dist < PLAYER_AREA_RADIUS || next_dist < area_distance(current) {
        next
    } else {
        current
    }
}

/// World-space walking step for this frame
pub fn walk_step(direction: Vec2, speed: f32, dt: f32, heading: Quat) -> Vec3 {
    if direction == Vec2::ZERO {
        return Vec3::ZERO;
    }
    let local = direction.normalize() * speed * dt;
    heading * Vec3::new(local.x, 0.0, local.y)
}

/// True once the kicker is close enough to the ball to start aiming
pub fn within_approach(kicker: Vec3, ball: Vec3) -> bool {
    Vec2::new(kicker.x - ball.x, kicker.z - ball.z).length() < APPROACH_DISTANCE
}

/// Mouse look. Consumes the accumulated delta so scripted motion applies once.
pub fn apply_mouse_look(
    tweaks: Res<PenaltyTweaks>,
    mut motion: ResMut<AccumulatedMouseMotion>,
    mut aim: ResMut<AimRotation>,
) {
    let delta = motion.delta;
    if delta == Vec2::ZERO {
        return;
    }
    aim.yaw -= delta.x * tweaks.mouse_sensitivity;
    aim.pitch = (aim.pitch - delta.y * tweaks.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    motion.delta = Vec2::ZERO;
}

/// PRE_PENAL: walk toward the ball. Switches to aiming on approach.
pub fn prepenal_movement(
    time: Res<Time>,
    tweaks: Res<PenaltyTweaks>,
    input: Res<KickerInput>,
    aim: Res<AimRotation>,
    mut kicker_query: Query<&mut Transform, With<Kicker>>,
    ball_query: Query<&Transform, (With<Ball>, Without<Kicker>)>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    let Ok(mut kicker) = kicker_query.single_mut() else {
        return;
    };

    let speed = if input.sprint {
        tweaks.sprint_speed
    } else {
        tweaks.walk_speed
    };
    let step = walk_step(input.move_direction(), speed, time.delta_secs(), aim.heading());
    kicker.translation = constrain_to_area(kicker.translation, step);

    if let Ok(ball) = ball_query.single()
        && within_approach(kicker.translation, ball.translation)
    {
        debug!("Kicker reached the ball, aiming");
        next_phase.set(GamePhase::Aiming);
    }
}

/// AIMING: A/D shuffle sideways within the profile limit
pub fn aiming_profile(
    time: Res<Time>,
    tweaks: Res<PenaltyTweaks>,
    input: Res<KickerInput>,
    mut preview: ResMut<ShotPreview>,
    mut kicker_query: Query<&mut Transform, With<Kicker>>,
) {
    if let Ok(mut kicker) = kicker_query.single_mut() {
        let dt = time.delta_secs();
        let mut x = kicker.translation.x;
        if input.left {
            x -= tweaks.profile_speed * dt;
        }
        if input.right {
            x += tweaks.profile_speed * dt;
        }
        kicker.translation.x = x.clamp(-PROFILE_LIMIT, PROFILE_LIMIT);
    }
    preview.power = input.power;
}
