//! Penaltykick - a first-person penalty shootout built with Bevy
//!
//! The kicker walks up to the ball, aims with the mouse, charges a shot with
//! Space and tries to beat a goalkeeper whose skills are rolled every round.
//! This crate provides the round state machine, its systems and resources,
//! plus headless simulation and scenario-testing tools.

// Core modules
pub mod constants;
pub mod events;
pub mod simulation;
pub mod testing;
pub mod tuning;
pub mod tween;

// Game logic modules
pub mod ball;
pub mod input;
pub mod keeper;
pub mod player;
pub mod round;
pub mod scoring;
pub mod shooting;

// Re-export commonly used types for convenience
pub use ball::{Ball, BallCrossing, BallFlight, GoalLineCheck};
pub use constants::*;
pub use events::{BusEvent, EventBus, EventLogConfig, EventLogger, GameConfig, GameEvent};
pub use input::KickerInput;
pub use keeper::{Goalkeeper, KeeperAction, KeeperSkills, KeeperState, SaveRoll};
pub use player::{AimRotation, Kicker, ShotPreview};
pub use round::{GamePhase, GameRng, KeeperOverride, PenaltyPlugin, PenaltySet, RoundState};
pub use scoring::{SessionScore, ShotOutcome};
pub use shooting::{LastShot, ShotData, ShotModel};
pub use tuning::{GameplayTuning, PenaltyTweaks};
