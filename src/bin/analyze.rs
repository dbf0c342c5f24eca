//! Results Tool - summarize a simulation database
//!
//! Reads the SQLite file written by `simulate --db`, prints per-profile goal
//! rates, the keeper action breakdown and, on request, one round's events.
//!
//! Usage:
//!   cargo run --bin analyze -- results.db
//!   cargo run --bin analyze -- results.db --profile Blaster --outcome save
//!   cargo run --bin analyze -- results.db --events 42
//!   cargo run --bin analyze -- --evlog logs/20260101_120000_1a2b3c4d.evlog

use std::path::{Path, PathBuf};

use penaltykick::events::{GameEvent, read_evlog};
use penaltykick::simulation::db::{RoundFilter, SimDatabase};
use penaltykick::simulation::{SimMetrics, rounds_from_events};

fn main() {
    let config = AnalyzeConfig::from_args();

    if config.show_help {
        print_help();
        return;
    }

    if let Some(path) = &config.evlog_file {
        summarize_evlog(path);
        return;
    }

    if !config.db_path.exists() {
        println!("No database found at {}", config.db_path.display());
        println!("\nTo record rounds, run simulations with --db:");
        println!("  cargo run --bin simulate -- --sweep 20 --db results.db");
        std::process::exit(1);
    }

    let db = match SimDatabase::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(round_id) = config.events_for {
        print_events(&db, round_id);
        return;
    }

    if let Err(e) = print_report(&db, &config) {
        eprintln!("Query failed: {}", e);
        std::process::exit(1);
    }
}

fn print_report(db: &SimDatabase, config: &AnalyzeConfig) -> rusqlite::Result<()> {
    println!(
        "{} sessions, {} rounds in {}\n",
        db.session_count()?,
        db.round_count()?,
        config.db_path.display()
    );

    println!("=== Profiles ===");
    println!(
        "{:<12} {:>7} {:>6} {:>6} {:>6} {:>7} {:>7}",
        "Profile", "Rounds", "Goals", "Saves", "Posts", "Goal%", "Power"
    );
    for profile in db.profiles()? {
        let stats = db.get_profile_stats(&profile)?;
        println!(
            "{:<12} {:>7} {:>6} {:>6} {:>6} {:>6.1}% {:>7.2}",
            stats.profile,
            stats.rounds,
            stats.goals,
            stats.saves,
            stats.posts,
            stats.goal_rate() * 100.0,
            stats.avg_power
        );
    }

    println!("\n=== Keeper actions ===");
    for action in db.action_breakdown(config.filter.profile.as_deref())? {
        let save_rate = if action.rounds == 0 {
            0.0
        } else {
            action.saves as f64 / action.rounds as f64 * 100.0
        };
        println!(
            "{:<12} {:>5} rounds  {:>5} goals  {:>5} saves ({:.1}%)",
            action.action, action.rounds, action.goals, action.saves, save_rate
        );
    }

    if config.filter.profile.is_some() || config.filter.outcome.is_some() {
        println!("\n=== Rounds ===");
        for round in db.query_rounds(&config.filter)? {
            println!(
                "#{:<6} {:<24} {:<5} power {:.2}  keeper {:<10} chance {:.2}",
                round.id, round.profile, round.outcome, round.power, round.keeper_action, round.save_chance
            );
        }
    }

    Ok(())
}

fn print_events(db: &SimDatabase, round_id: i64) {
    match db.get_events(round_id) {
        Ok(events) if events.is_empty() => println!("No events stored for round {}", round_id),
        Ok(events) => {
            for event in events {
                println!("{}", event.to_line());
            }
        }
        Err(e) => eprintln!("Failed to read events for round {}: {}", round_id, e),
    }
}

/// Summarize a single session log written by `penaltykick` or `simulate --evlog`
fn summarize_evlog(path: &Path) {
    let events = match read_evlog(path) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let profile = events
        .iter()
        .find_map(|(_, e)| match e {
            GameEvent::Config(config) => config.kicker_profile.clone(),
            _ => None,
        })
        .unwrap_or_else(|| "unknown".to_string());
    let results = rounds_from_events(&events, &profile, 0);

    println!("{} events, {} rounds ({})", events.len(), results.len(), profile);
    for result in &results {
        println!(
            "  Round {}: {:<4}  power {:.2}  keeper {:<10} chance {:.2}",
            result.round, result.outcome, result.power, result.keeper_action, result.save_chance
        );
    }
    println!("{}", SimMetrics::from_results(&results).format_summary());
}

/// Configuration for the analyze tool
struct AnalyzeConfig {
    db_path: PathBuf,
    filter: RoundFilter,
    events_for: Option<i64>,
    evlog_file: Option<PathBuf>,
    show_help: bool,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("results.db"),
            filter: RoundFilter {
                limit: Some(20),
                ..Default::default()
            },
            events_for: None,
            evlog_file: None,
            show_help: false,
        }
    }
}

impl AnalyzeConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--profile" => {
                    if i + 1 < args.len() {
                        config.filter.profile = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--outcome" => {
                    if i + 1 < args.len() {
                        config.filter.outcome = Some(args[i + 1].to_lowercase());
                        i += 1;
                    }
                }
                "--limit" => {
                    if i + 1 < args.len() {
                        config.filter.limit = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--events" => {
                    if i + 1 < args.len() {
                        config.events_for = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--evlog" => {
                    if i + 1 < args.len() {
                        config.evlog_file = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    config.show_help = true;
                }
                arg if !arg.starts_with('-') => {
                    // Positional argument: db path
                    config.db_path = PathBuf::from(arg);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Results Tool - summarize simulation results

USAGE:
    cargo run --bin analyze -- [DB_PATH] [OPTIONS]

ARGUMENTS:
    DB_PATH             SQLite database path (default: results.db)

OPTIONS:
    --profile <NAME>    Restrict the action breakdown and list that profile's rounds
    --outcome <CODE>    List rounds with this outcome (goal, save, post)
    --limit <N>         Rounds to list (default: 20)
    --events <ID>       Print the stored event lines of one round
    --evlog <FILE>      Summarize an .evlog session file instead of a database
    --help, -h          Show this help

EXAMPLES:
    cargo run --bin analyze -- results.db
    cargo run --bin analyze -- results.db --profile Chipper --outcome save
    cargo run --bin analyze -- results.db --events 7
"#
    );
}
