//! Penaltykick - a first-person penalty shootout built on Bevy
//!
//! Main entry point: plays a headless session where a scripted kicker takes
//! rounds back-to-back against freshly rolled keepers, with bevy logging on.
//!
//! Usage:
//!   cargo run -- --rounds 5 --profile Blaster --seed 7
//!   cargo run -- --log-dir logs

use bevy::prelude::*;
use penaltykick::simulation::{
    HeadlessAppBuilder, KickerBot, KickerProfileDatabase, SimMetrics, run_session,
    runner::write_evlog,
};

/// Seconds of game time allowed per round before the session is cut off
const ROUND_TIME_LIMIT: f32 = 30.0;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: penaltykick [--rounds N] [--profile NAME] [--seed N] [--log-dir DIR]");
        return;
    }

    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    };

    let rounds = value_of("--rounds")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(5)
        .max(1);
    let seed = value_of("--seed")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let log_dir = value_of("--log-dir").unwrap_or_else(|| "logs".to_string());

    let profiles = KickerProfileDatabase::default();
    let profile = match value_of("--profile") {
        Some(name) => match profiles.get_by_name(&name) {
            Some(profile) => profile.clone(),
            None => {
                eprintln!("Unknown kicker profile '{}'. Available: {:?}", name, profiles.names());
                std::process::exit(1);
            }
        },
        None => Default::default(),
    };

    let builder = HeadlessAppBuilder::new().with_logging();
    let bot = KickerBot::new(profile.clone(), rounds, seed);
    let run = run_session(builder, bot, rounds, ROUND_TIME_LIMIT, seed);

    write_evlog(&log_dir, &run);

    println!("\n{} kicks {} penalties (seed {})", profile.name, rounds, seed);
    for result in &run.results {
        println!(
            "  Round {}: {:<4}  power {:.2}  keeper {:<10} save chance {:.2}",
            result.round, result.outcome, result.power, result.keeper_action, result.save_chance
        );
    }
    println!("{}", SimMetrics::from_results(&run.results).format_summary());

    if !run.completed {
        warn!("Session ended before all {} rounds were played", rounds);
        std::process::exit(1);
    }
}
