//! Global gameplay tuning settings

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

// Serde default functions for fields added after the first config shipped
fn default_pressure() -> f32 {
    PRESSURE
}
fn default_max_flight_time() -> f32 {
    MAX_FLIGHT_TIME
}
fn default_outcome_delay() -> f32 {
    OUTCOME_DELAY
}
fn default_mouse_sensitivity() -> f32 {
    MOUSE_SENSITIVITY
}
fn default_keeper_reflexes() -> (f32, f32) {
    KEEPER_REFLEXES_RANGE
}
fn default_keeper_positioning() -> (f32, f32) {
    KEEPER_POSITIONING_RANGE
}
fn default_keeper_reach() -> (f32, f32) {
    KEEPER_REACH_RANGE
}
fn default_keeper_reaction() -> (f32, f32) {
    KEEPER_REACTION_RANGE
}

/// Path to global gameplay tuning config
pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

/// Serializable tuning values stored in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayTuning {
    pub gravity: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub profile_speed: f32,
    pub charge_duration: f32,
    pub max_power_speed: f32,
    pub lift_factor: f32,
    #[serde(default = "default_pressure")]
    pub pressure: f32,
    #[serde(default = "default_max_flight_time")]
    pub max_flight_time: f32,
    #[serde(default = "default_outcome_delay")]
    pub outcome_delay: f32,
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    // Keeper skill roll ranges (min, max)
    #[serde(default = "default_keeper_reflexes")]
    pub keeper_reflexes: (f32, f32),
    #[serde(default = "default_keeper_positioning")]
    pub keeper_positioning: (f32, f32),
    #[serde(default = "default_keeper_reach")]
    pub keeper_reach: (f32, f32),
    #[serde(default = "default_keeper_reaction")]
    pub keeper_reaction: (f32, f32),
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            profile_speed: PROFILE_SPEED,
            charge_duration: CHARGE_DURATION,
            max_power_speed: MAX_POWER_SPEED,
            lift_factor: LIFT_FACTOR,
            pressure: default_pressure(),
            max_flight_time: default_max_flight_time(),
            outcome_delay: default_outcome_delay(),
            mouse_sensitivity: default_mouse_sensitivity(),
            keeper_reflexes: default_keeper_reflexes(),
            keeper_positioning: default_keeper_positioning(),
            keeper_reach: default_keeper_reach(),
            keeper_reaction: default_keeper_reaction(),
        }
    }
}

impl GameplayTuning {
    pub fn apply_to(&self, tweaks: &mut PenaltyTweaks) {
        tweaks.gravity = self.gravity;
        tweaks.walk_speed = self.walk_speed;
        tweaks.sprint_speed = self.sprint_speed;
        tweaks.profile_speed = self.profile_speed;
        tweaks.charge_duration = self.charge_duration;
        tweaks.max_power_speed = self.max_power_speed;
        tweaks.lift_factor = self.lift_factor;
        tweaks.pressure = self.pressure;
        tweaks.max_flight_time = self.max_flight_time;
        tweaks.outcome_delay = self.outcome_delay;
        tweaks.mouse_sensitivity = self.mouse_sensitivity;
        tweaks.keeper_reflexes = self.keeper_reflexes;
        tweaks.keeper_positioning = self.keeper_positioning;
        tweaks.keeper_reach = self.keeper_reach;
        tweaks.keeper_reaction = self.keeper_reaction;
    }
}

/// Runtime gameplay values read by every system
#[derive(Resource, Debug, Clone)]
pub struct PenaltyTweaks {
    pub gravity: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub profile_speed: f32,
    pub charge_duration: f32,
    pub max_power_speed: f32,
    pub lift_factor: f32,
    pub pressure: f32,
    pub max_flight_time: f32,
    pub outcome_delay: f32,
    pub mouse_sensitivity: f32,
    pub keeper_reflexes: (f32, f32),
    pub keeper_positioning: (f32, f32),
    pub keeper_reach: (f32, f32),
    pub keeper_reaction: (f32, f32),
}

impl Default for PenaltyTweaks {
    fn default() -> Self {
        let mut tweaks = Self {
            gravity: 0.0,
            walk_speed: 0.0,
            sprint_speed: 0.0,
            profile_speed: 0.0,
            charge_duration: 0.0,
            max_power_speed: 0.0,
            lift_factor: 0.0,
            pressure: 0.0,
            max_flight_time: 0.0,
            outcome_delay: 0.0,
            mouse_sensitivity: 0.0,
            keeper_reflexes: (0.0, 0.0),
            keeper_positioning: (0.0, 0.0),
            keeper_reach: (0.0, 0.0),
            keeper_reaction: (0.0, 0.0),
        };
        GameplayTuning::default().apply_to(&mut tweaks);
        tweaks
    }
}

pub fn load_gameplay_tuning_from_file(path: &str) -> Result<GameplayTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn apply_global_tuning(tweaks: &mut PenaltyTweaks) -> Result<(), String> {
    match load_gameplay_tuning_from_file(GAMEPLAY_TUNING_FILE) {
        Ok(tuning) => {
            tuning.apply_to(tweaks);
            Ok(())
        }
        Err(err) => {
            GameplayTuning::default().apply_to(tweaks);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let tweaks = PenaltyTweaks::default();
        assert_eq!(tweaks.gravity, GRAVITY);
        assert_eq!(tweaks.charge_duration, CHARGE_DURATION);
        assert_eq!(tweaks.pressure, PRESSURE);
        assert_eq!(tweaks.keeper_reach, KEEPER_REACH_RANGE);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "gravity": 9.8,
            "walk_speed": 4.0,
            "sprint_speed": 8.0,
            "profile_speed": 1.0,
            "charge_duration": 1.0,
            "max_power_speed": 40.0,
            "lift_factor": 0.3
        }"#;
        let tuning: GameplayTuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.walk_speed, 4.0);
        assert_eq!(tuning.pressure, PRESSURE);
        assert_eq!(tuning.keeper_reaction, KEEPER_REACTION_RANGE);

        let mut tweaks = PenaltyTweaks::default();
        tuning.apply_to(&mut tweaks);
        assert_eq!(tweaks.max_power_speed, 40.0);
        assert_eq!(tweaks.charge_duration, 1.0);
    }

    #[test]
    fn test_missing_file_reports_error() {
        let result = load_gameplay_tuning_from_file("config/does_not_exist.json");
        assert!(result.is_err());
        assert!(result.unwrap_err().starts_with("Failed to read"));
    }
}
