//! Tunable constants for penaltykick
//!
//! All gameplay values are defined here for easy tweaking.
//! Units are metres and seconds. +X is right, +Y is up, the goal sits at -Z.

use bevy::prelude::*;

// =============================================================================
// FIELD GEOMETRY
// =============================================================================

pub const PENALTY_SPOT: Vec3 = Vec3::ZERO;
pub const PLAYER_AREA_RADIUS: f32 = 9.0; // Kicker must stay inside this circle around the spot
pub const GOAL_LINE_Z: f32 = -15.0;
pub const GOAL_WIDTH: f32 = 20.0; // Matches the 3x scaled goal model
pub const GOAL_HEIGHT: f32 = 8.0;

// =============================================================================
// SPAWN POSITIONS
// =============================================================================

pub const BALL_REST_HEIGHT: f32 = 0.1; // Ball radius, also the floor clamp
pub const BALL_SPAWN: Vec3 = Vec3::new(0.0, BALL_REST_HEIGHT, 0.0);
pub const KICKER_SPAWN: Vec3 = Vec3::new(0.0, 1.7, 10.0); // Eye height, well behind the ball
pub const KEEPER_SPAWN: Vec3 = Vec3::new(0.0, 0.0, -14.8);

// =============================================================================
// KICKER MOVEMENT
// =============================================================================

pub const WALK_SPEED: f32 = 3.0;
pub const SPRINT_SPEED: f32 = 6.0;
pub const APPROACH_DISTANCE: f32 = 2.5; // Horizontal distance to the ball that starts aiming
pub const PROFILE_SPEED: f32 = 1.0; // Sideways shuffle while aiming
pub const PROFILE_LIMIT: f32 = 1.5;
pub const MOUSE_SENSITIVITY: f32 = 0.002; // Radians per pixel

// =============================================================================
// PHYSICS
// =============================================================================

pub const GRAVITY: f32 = 9.8;

// =============================================================================
// SHOOTING
// =============================================================================

pub const CHARGE_DURATION: f32 = 1.5; // Seconds from empty to full power
pub const MAX_POWER_SPEED: f32 = 50.0; // Ball speed at full power
pub const LIFT_FACTOR: f32 = 0.25; // Upward component per unit of power
pub const PRESSURE: f32 = 0.3; // Fixed moderate pressure
pub const PRESSURE_NOISE_X: f32 = 0.2;
pub const PRESSURE_NOISE_Y: f32 = 0.15;
pub const PREDICTION_DISTANCE: f32 = 15.0; // Spot to goal line, used for the keeper's read

// =============================================================================
// ROUND FLOW
// =============================================================================

pub const OUTCOME_DELAY: f32 = 2.0; // Seconds between the result and the epilogue
pub const MAX_FLIGHT_TIME: f32 = 6.0; // A ball that never reaches the line counts as a miss

// =============================================================================
// GOALKEEPER
// =============================================================================

pub const KEEPER_REFLEXES_RANGE: (f32, f32) = (0.6, 0.9);
pub const KEEPER_POSITIONING_RANGE: (f32, f32) = (0.5, 0.9);
pub const KEEPER_REACH_RANGE: (f32, f32) = (0.7, 0.9);
pub const KEEPER_REACTION_RANGE: (f32, f32) = (0.2, 0.35);
pub const KEEPER_RECOVERY_RANGE: (f32, f32) = (2.0, 3.0);
pub const KEEPER_RECOVERY_DURATION: f32 = 1.0;
pub const KEEPER_MIN_X: f32 = -5.0;
pub const KEEPER_MAX_X: f32 = 5.0;
pub const KEEPER_MAX_RISE: f32 = 2.0; // Highest point above home height
pub const KEEPER_MAX_SAVE_CHANCE: f32 = 0.85;

// =============================================================================
// FILES
// =============================================================================

pub const KICKER_PROFILES_FILE: &str = "assets/kicker_profiles.txt";
