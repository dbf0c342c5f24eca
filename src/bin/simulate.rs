//! Penalty Simulation Tool - headless rounds for outcome statistics
//!
//! Plays penalties with scripted kickers against rolled keepers, without
//! rendering, and reports goal/save/post rates.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --rounds 50 --profile Placer
//!   cargo run --bin simulate -- --sweep 20 --parallel 8 --db results.db
//!   cargo run --bin simulate -- --shot-grid 10 --output grid.json

use penaltykick::simulation::{SimConfig, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    run_simulation(config);
}
