//! Simulation runner - plays rounds headless and reports statistics

use bevy::prelude::*;
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;

use crate::events::{EventBus, EventLogConfig, EventLogger, GameConfig, GameEvent};
use crate::round::GamePhase;
use crate::scoring::SessionScore;
use crate::tuning::PenaltyTweaks;

use super::app_builder::HeadlessAppBuilder;
use super::config::{SimConfig, SimMode};
use super::db::SimDatabase;
use super::kicker_bot::KickerBot;
use super::metrics::{GridCell, GridResult, RoundResult, SimMetrics, SweepResult, rounds_from_events};
use super::parallel::{init_parallel, run_jobs_parallel};
use super::profiles::{KickerProfile, KickerProfileDatabase, ShotPlan};

/// Shot grid axes (degrees) and power levels
pub const GRID_YAWS: [f32; 5] = [-24.0, -12.0, 0.0, 12.0, 24.0];
pub const GRID_PITCHES: [f32; 3] = [0.0, 8.0, 16.0];
pub const GRID_POWERS: [f32; 3] = [0.4, 0.7, 1.0];

/// Everything a headless session produced
#[derive(Debug, Default)]
pub struct SessionRun {
    pub results: Vec<RoundResult>,
    /// Full event stream in emit order
    pub events: Vec<(u32, GameEvent)>,
    /// Tweaks the session ran with (for the evlog Config line)
    pub config: GameConfig,
    /// False if the frame limit hit before the last round finished
    pub completed: bool,
}

/// One independent round for batch execution
#[derive(Debug, Clone)]
pub struct RoundJob {
    /// Name stored with the result (profile or grid cell)
    pub label: String,
    pub profile: KickerProfile,
    pub plan: Option<ShotPlan>,
    pub seed: u64,
}

/// Step an app until `rounds` rounds reached the epilogue.
/// Returns false if `max_frames` ran out first.
pub fn play(app: &mut App, rounds: u32, max_frames: u64) -> bool {
    for _ in 0..max_frames {
        app.update();
        let finished = app.world().resource::<SessionScore>().rounds >= rounds;
        let phase = *app.world().resource::<State<GamePhase>>().get();
        if finished && phase == GamePhase::Epilogue {
            return true;
        }
    }
    false
}

/// Play `rounds` rounds back-to-back in one app, retrying from the epilogue
pub fn run_session(
    builder: HeadlessAppBuilder,
    bot: KickerBot,
    rounds: u32,
    time_limit: f32,
    seed: u64,
) -> SessionRun {
    let frames_per_round = (time_limit / builder.frame_time().as_secs_f32()).ceil() as u64;
    let label = bot.profile.name.clone();
    let mut app = builder.with_seed(seed).with_bot(bot).build();

    let completed = play(&mut app, rounds, frames_per_round * rounds as u64);
    if !completed {
        warn!(
            "Session {} (seed {}) stopped after {} frames before finishing {} rounds",
            label,
            seed,
            frames_per_round * rounds as u64,
            rounds
        );
    }

    let events = app.world_mut().resource_mut::<EventBus>().export_events();
    let config = GameConfig::from_tweaks(app.world().resource::<PenaltyTweaks>(), Some(label.clone()));
    SessionRun {
        results: rounds_from_events(&events, &label, seed),
        events,
        config,
        completed,
    }
}

/// Charge duration from the global tuning file, falling back to defaults
fn tuned_charge_duration() -> f32 {
    let mut tweaks = PenaltyTweaks::default();
    if let Err(err) = crate::tuning::apply_global_tuning(&mut tweaks) {
        warn!("{}, using default tuning", err);
    }
    tweaks.charge_duration
}

/// Run a single independent round
pub fn run_round(config: &SimConfig, job: &RoundJob) -> Option<RoundResult> {
    let mut bot = KickerBot::new(job.profile.clone(), 1, job.seed);
    bot.fixed_plan = job.plan;

    let mut builder = HeadlessAppBuilder::new();
    if config.parallel > 0 {
        builder = builder.with_minimal_threads();
    }
    let run = run_session(builder, bot, 1, config.round_time_limit, job.seed);
    if let Some(dir) = &config.evlog_dir {
        write_evlog(dir, &run);
    }

    let mut result = run.results.into_iter().next()?;
    result.profile = job.label.clone();
    Some(result)
}

/// Run jobs sequentially or on the rayon pool
pub fn run_jobs(config: &SimConfig, jobs: &[RoundJob]) -> Vec<RoundResult> {
    if config.parallel > 0 {
        return run_jobs_parallel(config, jobs).into_iter().flatten().collect();
    }

    let mut results = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        if !config.quiet {
            print!("\rRound {}/{}: {}...", i + 1, jobs.len(), job.label);
            std::io::stdout().flush().ok();
        }
        if let Some(result) = run_round(config, job) {
            results.push(result);
        }
    }
    if !config.quiet {
        println!("\rCompleted {} rounds.{:20}", results.len(), "");
    }
    results
}

/// Write one session's events to an .evlog file
pub fn write_evlog(dir: &str, run: &SessionRun) {
    let mut logger = EventLogger::new(EventLogConfig {
        log_dir: PathBuf::from(dir),
        enabled: true,
    });
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    logger.start_session(&timestamp);
    logger.log_config(run.config.clone());
    for (time_ms, event) in &run.events {
        logger.log(*time_ms, event.clone());
    }
    logger.end_session();
}

/// Jobs for one profile, seeds counting up from `base_seed`
pub fn profile_jobs(profile: &KickerProfile, rounds: u32, base_seed: u64) -> Vec<RoundJob> {
    (0..rounds)
        .map(|i| RoundJob {
            label: profile.name.clone(),
            profile: profile.clone(),
            plan: None,
            seed: base_seed.wrapping_add(i as u64),
        })
        .collect()
}

/// Jobs for every aim × power cell of the shot grid
pub fn grid_jobs(shots_per_cell: u32, base_seed: u64, charge_duration: f32) -> Vec<RoundJob> {
    let mut jobs = Vec::new();
    let mut n = 0u64;
    for &yaw in &GRID_YAWS {
        for &pitch in &GRID_PITCHES {
            for &power in &GRID_POWERS {
                let plan = ShotPlan::from_degrees(
                    yaw,
                    pitch,
                    ShotPlan::charge_for_power(power, charge_duration),
                );
                for _ in 0..shots_per_cell {
                    n += 1;
                    jobs.push(RoundJob {
                        label: GridCell::label(yaw, pitch, power),
                        profile: KickerProfile::default(),
                        plan: Some(plan),
                        seed: base_seed.wrapping_add(n),
                    });
                }
            }
        }
    }
    jobs
}

/// Group grid results back into cells
pub fn collect_grid(results: &[RoundResult]) -> GridResult {
    let mut grid = GridResult::default();
    for &yaw in &GRID_YAWS {
        for &pitch in &GRID_PITCHES {
            for &power in &GRID_POWERS {
                let label = GridCell::label(yaw, pitch, power);
                let cell: Vec<RoundResult> =
                    results.iter().filter(|r| r.profile == label).cloned().collect();
                grid.cells.push(GridCell {
                    yaw_deg: yaw,
                    pitch_deg: pitch,
                    power,
                    metrics: SimMetrics::from_results(&cell),
                });
            }
        }
    }
    grid
}

/// Main simulation entry point
pub fn run_simulation(config: SimConfig) {
    let profile_db = KickerProfileDatabase::default();
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    if config.parallel > 0 {
        init_parallel(config.parallel);
    }

    let results = match &config.mode {
        SimMode::Single { rounds } => {
            let Some(profile) = profile_db.get_by_name(&config.profile) else {
                eprintln!(
                    "Unknown profile '{}'. Available: {}",
                    config.profile,
                    profile_db.names().join(", ")
                );
                return;
            };
            if !config.quiet {
                println!(
                    "Running {} rounds with {} (seed: {})",
                    rounds, profile.name, base_seed
                );
            }

            let results = run_jobs(&config, &profile_jobs(profile, *rounds, base_seed));
            let metrics = SimMetrics::from_results(&results);
            println!("\n{}", metrics.format_summary());
            write_output(&config, &results);
            results
        }

        SimMode::Sweep { rounds_per_profile } => {
            let profiles: Vec<&KickerProfile> = if config.profiles.is_empty() {
                profile_db.profiles().iter().collect()
            } else {
                config
                    .profiles
                    .iter()
                    .filter_map(|name| profile_db.get_by_name(name))
                    .collect()
            };
            if !config.quiet {
                println!(
                    "Running sweep: {} profiles, {} rounds each (seed: {})",
                    profiles.len(),
                    rounds_per_profile,
                    base_seed
                );
            }

            let mut jobs = Vec::new();
            for (i, profile) in profiles.iter().enumerate() {
                let seed = base_seed.wrapping_add(i as u64 * *rounds_per_profile as u64);
                jobs.extend(profile_jobs(profile, *rounds_per_profile, seed));
            }
            let results = run_jobs(&config, &jobs);

            let mut sweep = SweepResult::new();
            for result in &results {
                sweep
                    .results_by_profile
                    .entry(result.profile.clone())
                    .or_default()
                    .push(result.clone());
            }
            sweep.calculate_stats();
            let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();
            println!("{}", sweep.format_table(&names));
            write_output(&config, &sweep);
            results
        }

        SimMode::ShotGrid { shots_per_cell } => {
            let charge_duration = tuned_charge_duration();
            let jobs = grid_jobs(*shots_per_cell, base_seed, charge_duration);
            if !config.quiet {
                println!(
                    "Running shot grid: {} cells, {} shots each (seed: {})",
                    jobs.len() / (*shots_per_cell).max(1) as usize,
                    shots_per_cell,
                    base_seed
                );
            }

            let results = run_jobs(&config, &jobs);
            let grid = collect_grid(&results);
            println!("{}", grid.format_table());
            write_output(&config, &grid);
            results
        }
    };

    if let Some(db_path) = &config.db_path
        && let Err(e) = store_results(db_path, &config, &results)
    {
        eprintln!("Failed to write database {}: {}", db_path, e);
    }
}

fn store_results(db_path: &str, config: &SimConfig, results: &[RoundResult]) -> rusqlite::Result<()> {
    let db = SimDatabase::open(std::path::Path::new(db_path))?;
    let session_type = match config.mode {
        SimMode::Single { .. } => "single",
        SimMode::Sweep { .. } => "sweep",
        SimMode::ShotGrid { .. } => "shot_grid",
    };
    let config_json = serde_json::to_string(config).ok();
    let session_id = db.create_session(session_type, config_json.as_deref())?;
    for result in results {
        db.insert_round(&session_id, result)?;
    }
    if !config.quiet {
        println!("Stored {} rounds in {} (session {})", results.len(), db_path, &session_id[..8]);
    }
    Ok(())
}

fn write_output<T: serde::Serialize>(config: &SimConfig, value: &T) {
    let Some(output_file) = &config.output_file else {
        return;
    };
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize results: {}", e);
            return;
        }
    };
    match std::fs::write(output_file, json) {
        Ok(()) => println!("Results written to {}", output_file),
        Err(e) => eprintln!("Failed to write {}: {}", output_file, e),
    }
}
