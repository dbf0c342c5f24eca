//! Shot trajectory model
//!
//! Turns aim rotation and charge power into a launch velocity, plus the point
//! where the keeper expects the ball to cross the goal line.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::tuning::PenaltyTweaks;

/// Velocity components smaller than this count as "not moving toward goal"
const MIN_APPROACH_SPEED: f32 = 1e-4;

/// Shot model parameters
#[derive(Debug, Clone, Copy)]
pub struct ShotModel {
    pub max_power_speed: f32,
    pub lift_factor: f32,
    pub gravity: f32,
}

impl Default for ShotModel {
    fn default() -> Self {
        Self {
            max_power_speed: MAX_POWER_SPEED,
            lift_factor: LIFT_FACTOR,
            gravity: GRAVITY,
        }
    }
}

/// Output of the shot model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotData {
    pub initial_velocity: Vec3,
    /// Predicted goal-line crossing, None if the ball never heads for goal
    pub target_point: Option<Vec3>,
    pub power: f32,
    pub aim: Quat,
}

/// Most recent shot, kept for logging and scenario checks
#[derive(Resource, Default, Debug)]
pub struct LastShot(pub Option<ShotData>);

impl ShotModel {
    pub fn from_tweaks(tweaks: &PenaltyTweaks) -> Self {
        Self {
            max_power_speed: tweaks.max_power_speed,
            lift_factor: tweaks.lift_factor,
            gravity: tweaks.gravity,
        }
    }

    /// Unit launch direction before pressure noise
    pub fn direction(&self, aim: Quat, power: f32) -> Vec3 {
        let local = Vec3::new(0.0, power * self.lift_factor, -1.0).normalize();
        aim * local
    }

    /// Full trajectory with pressure noise rolled from `rng`
    pub fn calculate_trajectory(
        &self,
        aim: Quat,
        power: f32,
        pressure: f32,
        rng: &mut impl Rng,
    ) -> ShotData {
        let mut direction = self.direction(aim, power);
        direction.x += (rng.r#gen::<f32>() - 0.5) * pressure * PRESSURE_NOISE_X;
        direction.y += (rng.r#gen::<f32>() - 0.5) * pressure * PRESSURE_NOISE_Y;

        let initial_velocity = direction * (self.max_power_speed * power);
        ShotData {
            initial_velocity,
            target_point: self.predict_target(initial_velocity),
            power,
            aim,
        }
    }

    /// Where the keeper reads the shot: straight-line time to the goal line,
    /// ballistic height, no floor.
    pub fn predict_target(&self, velocity: Vec3) -> Option<Vec3> {
        if velocity.z >= -MIN_APPROACH_SPEED {
            return None;
        }
        let t = (PREDICTION_DISTANCE / velocity.z).abs();
        Some(Vec3::new(
            velocity.x * t,
            BALL_REST_HEIGHT + velocity.y * t - 0.5 * self.gravity * t * t,
            -PREDICTION_DISTANCE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::AimRotation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_direction_is_unit_length() {
        let model = ShotModel::default();
        for (yaw, pitch) in [(0.0, 0.0), (0.4, -0.1), (-1.2, 0.6), (3.0, 1.5)] {
            let aim = AimRotation::new(yaw, pitch).rotation();
            for power in [0.0, 0.25, 0.5, 1.0] {
                let dir = model.direction(aim, power);
                assert!((dir.length() - 1.0).abs() < 1e-5, "yaw {yaw} power {power}");
            }
        }
    }

    #[test]
    fn test_straight_shot_without_pressure() {
        let model = ShotModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let shot = model.calculate_trajectory(Quat::IDENTITY, 1.0, 0.0, &mut rng);

        // Full power lifts by 0.25 before normalizing
        let expected = Vec3::new(0.0, 0.25, -1.0).normalize() * 50.0;
        assert!((shot.initial_velocity - expected).length() < 1e-3);
        assert_eq!(shot.power, 1.0);

        let target = shot.target_point.unwrap();
        assert_eq!(target.z, -15.0);
        assert!(target.x.abs() < 1e-5);
        let t = 15.0 / expected.z.abs();
        let y = 0.1 + expected.y * t - 4.9 * t * t;
        assert!((target.y - y).abs() < 1e-3);
    }

    #[test]
    fn test_pressure_noise_is_bounded() {
        let model = ShotModel::default();
        let mut rng = StdRng::seed_from_u64(42);
        let clean = model.direction(Quat::IDENTITY, 0.5) * 25.0;
        for _ in 0..200 {
            let shot = model.calculate_trajectory(Quat::IDENTITY, 0.5, PRESSURE, &mut rng);
            let dv = shot.initial_velocity - clean;
            assert!(dv.x.abs() <= 0.5 * PRESSURE * PRESSURE_NOISE_X * 25.0 + 1e-4);
            assert!(dv.y.abs() <= 0.5 * PRESSURE * PRESSURE_NOISE_Y * 25.0 + 1e-4);
            assert_eq!(dv.z, 0.0);
        }
    }

    #[test]
    fn test_zero_power_has_no_prediction() {
        let model = ShotModel::default();
        let mut rng = StdRng::seed_from_u64(1);
        let shot = model.calculate_trajectory(Quat::IDENTITY, 0.0, PRESSURE, &mut rng);
        assert_eq!(shot.initial_velocity, Vec3::ZERO);
        assert!(shot.target_point.is_none());
    }

    #[test]
    fn test_backward_aim_has_no_prediction() {
        let model = ShotModel::default();
        let aim = AimRotation::new(std::f32::consts::PI, 0.0).rotation();
        let mut rng = StdRng::seed_from_u64(1);
        let shot = model.calculate_trajectory(aim, 1.0, 0.0, &mut rng);
        assert!(shot.initial_velocity.z > 0.0);
        assert!(shot.target_point.is_none());
    }

    #[test]
    fn test_yaw_left_aims_left() {
        let model = ShotModel::default();
        let aim = AimRotation::new(0.2, 0.0).rotation();
        let target = model
            .predict_target(model.direction(aim, 0.8) * 40.0)
            .unwrap();
        assert!(target.x < 0.0);
    }
}
