//! Event type definitions for the logging system

use serde::{Deserialize, Serialize};

/// Game configuration snapshot for analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub gravity: f32,
    pub charge_duration: f32,
    pub max_power_speed: f32,
    pub lift_factor: f32,
    pub pressure: f32,
    pub keeper_reflexes: (f32, f32),
    pub keeper_positioning: (f32, f32),
    pub keeper_reach: (f32, f32),
    /// Kicker profile driving the round (simulation only)
    pub kicker_profile: Option<String>,
}

impl GameConfig {
    pub fn from_tweaks(tweaks: &crate::tuning::PenaltyTweaks, kicker_profile: Option<String>) -> Self {
        Self {
            gravity: tweaks.gravity,
            charge_duration: tweaks.charge_duration,
            max_power_speed: tweaks.max_power_speed,
            lift_factor: tweaks.lift_factor,
            pressure: tweaks.pressure,
            keeper_reflexes: tweaks.keeper_reflexes,
            keeper_positioning: tweaks.keeper_positioning,
            keeper_reach: tweaks.keeper_reach,
            kicker_profile,
        }
    }
}

/// All game events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Session Events ===
    /// Session started (generated once per run)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // Compact UTC timestamp
    },
    /// Game configuration snapshot (logged after session start)
    Config(GameConfig),

    // === Round Events ===
    /// Scene reset, a new round begins
    RoundStart {
        round: u32,
        reflexes: f32,
        positioning: f32,
        reach: f32,
    },
    /// State machine moved between phases
    PhaseChange { from: String, to: String },
    /// Space pressed, power meter started
    ChargeStart,
    /// Kick accepted while aiming
    Kick { power: f32, yaw: f32, pitch: f32 },
    /// Shot model output
    ShotComputed {
        velocity: (f32, f32, f32),
        target: Option<(f32, f32)>,
    },
    /// Keeper committed to an action
    KeeperDecision { action: String },
    /// Ball reached the goal line (or timed out)
    BallCrossed { pos: (f32, f32, f32), timed_out: bool },
    /// Keeper save roll result
    KeeperSave { saved: bool, chance: f32 },
    /// Round resolved
    Outcome { result: String },
    /// Round finished (epilogue reached)
    RoundEnd {
        round: u32,
        goals: u32,
        saves: u32,
        posts: u32,
    },
}

impl GameEvent {
    /// Two-letter code used by the compact text format
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::Config(_) => "CF",
            GameEvent::RoundStart { .. } => "RS",
            GameEvent::PhaseChange { .. } => "PC",
            GameEvent::ChargeStart => "CS",
            GameEvent::Kick { .. } => "KK",
            GameEvent::ShotComputed { .. } => "SC",
            GameEvent::KeeperDecision { .. } => "KD",
            GameEvent::BallCrossed { .. } => "BC",
            GameEvent::KeeperSave { .. } => "KS",
            GameEvent::Outcome { .. } => "OC",
            GameEvent::RoundEnd { .. } => "RE",
        }
    }

    /// Human-readable event name (used by scenario expectations)
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::Config(_) => "Config",
            GameEvent::RoundStart { .. } => "RoundStart",
            GameEvent::PhaseChange { .. } => "PhaseChange",
            GameEvent::ChargeStart => "ChargeStart",
            GameEvent::Kick { .. } => "Kick",
            GameEvent::ShotComputed { .. } => "ShotComputed",
            GameEvent::KeeperDecision { .. } => "KeeperDecision",
            GameEvent::BallCrossed { .. } => "BallCrossed",
            GameEvent::KeeperSave { .. } => "KeeperSave",
            GameEvent::Outcome { .. } => "Outcome",
            GameEvent::RoundEnd { .. } => "RoundEnd",
        }
    }
}
