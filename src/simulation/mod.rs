//! Penalty simulation - headless rounds driven by scripted kickers
//!
//! Runs the real round plugin without rendering, collecting outcome
//! statistics per kicker profile, per keeper action and per shot cell.

pub mod app_builder;
pub mod config;
pub mod db;
pub mod kicker_bot;
pub mod metrics;
pub mod parallel;
pub mod profiles;
pub mod runner;

pub use app_builder::HeadlessAppBuilder;
pub use config::{SimConfig, SimMode};
pub use kicker_bot::{KickerBot, kicker_bot_update};
pub use metrics::{RoundResult, SimMetrics, SweepResult, rounds_from_events};
pub use profiles::{KickerProfile, KickerProfileDatabase, ShotPlan};
pub use runner::{RoundJob, SessionRun, play, run_round, run_session, run_simulation};
