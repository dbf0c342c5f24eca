//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Simulation mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimMode {
    /// Run N rounds with one kicker profile
    Single { rounds: u32 },
    /// Run every kicker profile for N rounds each
    Sweep { rounds_per_profile: u32 },
    /// Fixed aim grid × power levels, N shots per cell
    ShotGrid { shots_per_cell: u32 },
}

impl Default for SimMode {
    fn default() -> Self {
        SimMode::Single { rounds: 10 }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: SimMode,
    /// Kicker profile for single runs
    pub profile: String,
    /// Profiles to include in a sweep (empty = all profiles)
    pub profiles: Vec<String>,
    /// RNG seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Output file path (None = stdout)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Number of parallel threads (0 = sequential, N = N threads)
    pub parallel: usize,
    /// Path to SQLite database for storing results
    pub db_path: Option<String>,
    /// Directory for per-round .evlog files (None = no evlogs)
    pub evlog_dir: Option<String>,
    /// Give up on a round after this many simulated seconds
    pub round_time_limit: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::default(),
            profile: "Balanced".to_string(),
            profiles: Vec::new(),
            seed: None,
            output_file: None,
            quiet: false,
            parallel: 0,
            db_path: None,
            evlog_dir: None,
            round_time_limit: 30.0,
        }
    }
}

/// Local simulation settings (optional)
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Settings file if present, built-in defaults otherwise
    pub fn from_config_files() -> Self {
        Self::from_file(SIM_SETTINGS_FILE).unwrap_or_default()
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::from_config_files();

        // Explicit settings file replaces the base before CLI overrides
        if let Some(i) = args.iter().position(|a| a == "--settings")
            && let Some(path) = args.get(i + 1)
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        if config.apply_args(&args[1.min(args.len())..]) {
            print_help();
            std::process::exit(0);
        }
        config
    }

    /// Apply CLI overrides. Returns true if help was requested.
    pub fn apply_args(&mut self, args: &[String]) -> bool {
        let mut i = 0;
        while i < args.len() {
            let next = args.get(i + 1).filter(|s| !s.starts_with('-'));
            match args[i].as_str() {
                "--settings" => {
                    i += 1;
                }
                "--rounds" => {
                    if let Some(v) = next {
                        self.mode = SimMode::Single {
                            rounds: v.parse().unwrap_or(10),
                        };
                        i += 1;
                    }
                }
                "--profile" => {
                    if let Some(v) = next {
                        self.profile = v.clone();
                        i += 1;
                    }
                }
                "--profiles" => {
                    if let Some(v) = next {
                        self.profiles = v
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                        i += 1;
                    }
                }
                "--sweep" => {
                    let rounds = match next {
                        Some(v) => {
                            i += 1;
                            v.parse().unwrap_or(20)
                        }
                        None => 20,
                    };
                    self.mode = SimMode::Sweep {
                        rounds_per_profile: rounds,
                    };
                }
                "--shot-grid" => {
                    let shots = match next {
                        Some(v) => {
                            i += 1;
                            v.parse().unwrap_or(10)
                        }
                        None => 10,
                    };
                    self.mode = SimMode::ShotGrid {
                        shots_per_cell: shots,
                    };
                }
                "--seed" => {
                    if let Some(v) = next {
                        self.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = next {
                        self.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => {
                    self.quiet = true;
                }
                "--parallel" => {
                    if let Some(v) = next {
                        self.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--db" => {
                    if let Some(v) = next {
                        self.db_path = Some(v.clone());
                        i += 1;
                    }
                }
                "--evlog" => {
                    if let Some(v) = next {
                        self.evlog_dir = Some(v.clone());
                        i += 1;
                    }
                }
                "--help" | "-h" => return true,
                _ => {}
            }
            i += 1;
        }
        false
    }
}

fn print_help() {
    println!(
        r#"Penalty Simulation Tool - headless penalty rounds with scripted kickers

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --rounds <N>        Run N rounds with one profile (default: 10)
    --profile <NAME>    Kicker profile for single runs (default: Balanced)
    --profiles <LIST>   Comma-separated profiles for a sweep
    --sweep [N]         Run every profile, N rounds each (default: 20)
    --shot-grid [N]     Fixed aim grid × power levels, N shots per cell (default: 10)
    --seed <N>          RNG seed for reproducibility
    --output <FILE>     Output JSON to file (default: stdout)
    --quiet, -q         Suppress progress output
    --parallel <N>      Run rounds in parallel with N threads
    --db <FILE>         Store results in SQLite database
    --evlog <DIR>       Write one .evlog file per round
    --help, -h          Show this help

EXAMPLES:
    # 50 rounds with the corner-placing kicker
    cargo run --bin simulate -- --rounds 50 --profile Placer --seed 7

    # Compare every kicker, 100 rounds each, 8 threads, results to SQLite
    cargo run --bin simulate -- --sweep 100 --parallel 8 --db results.db

    # Which aim/power cells beat the keeper?
    cargo run --bin simulate -- --shot-grid 20 --output grid.json

PROFILES:
    Defined in assets/kicker_profiles.txt (Balanced, Placer, Blaster, Chipper, Nervous, ...)
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.mode, SimMode::Single { rounds: 10 });
        assert_eq!(config.profile, "Balanced");
        assert_eq!(config.parallel, 0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = SimConfig::default();
        let help = config.apply_args(&args(&[
            "--rounds", "25", "--profile", "Placer", "--seed", "9", "--db", "r.db", "-q",
        ]));
        assert!(!help);
        assert_eq!(config.mode, SimMode::Single { rounds: 25 });
        assert_eq!(config.profile, "Placer");
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.db_path.as_deref(), Some("r.db"));
        assert!(config.quiet);
    }

    #[test]
    fn test_optional_counts() {
        let mut config = SimConfig::default();
        config.apply_args(&args(&["--sweep", "--quiet"]));
        assert_eq!(config.mode, SimMode::Sweep { rounds_per_profile: 20 });
        assert!(config.quiet);

        config.apply_args(&args(&["--shot-grid", "4"]));
        assert_eq!(config.mode, SimMode::ShotGrid { shots_per_cell: 4 });
    }

    #[test]
    fn test_profile_list_and_help() {
        let mut config = SimConfig::default();
        let help = config.apply_args(&args(&["--profiles", "Placer, Blaster,", "--help"]));
        assert!(help);
        assert_eq!(config.profiles, vec!["Placer".to_string(), "Blaster".to_string()]);
    }

    #[test]
    fn test_settings_json_partial() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "parallel": 4, "mode": { "Sweep": { "rounds_per_profile": 3 } } }"#)
                .unwrap();
        assert_eq!(config.parallel, 4);
        assert_eq!(config.mode, SimMode::Sweep { rounds_per_profile: 3 });
        assert_eq!(config.profile, "Balanced");
    }
}
