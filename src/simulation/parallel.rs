//! Parallel simulation execution
//!
//! Uses Rayon to run independent rounds concurrently.
//! Each round runs in its own Bevy app with minimal threading
//! to avoid hitting OS thread limits.

use rayon::prelude::*;

use super::config::SimConfig;
use super::metrics::RoundResult;
use super::runner::{RoundJob, run_round};

/// Initialize the global Rayon pool with the given thread count.
/// Call this once at startup before running parallel simulations.
pub fn init_parallel(threads: usize) {
    if threads == 0 {
        return;
    }
    // A second call in the same process keeps the first pool
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        eprintln!("Rayon pool already initialized: {}", e);
    }
}

/// Run round jobs in parallel.
/// Returns results in the same order as `jobs`; None for rounds that never finished.
pub fn run_jobs_parallel(config: &SimConfig, jobs: &[RoundJob]) -> Vec<Option<RoundResult>> {
    let mut config = config.clone();
    // Apps built from worker threads must not spawn their own pools
    config.parallel = config.parallel.max(1);
    jobs.par_iter().map(|job| run_round(&config, job)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::profiles::KickerProfile;
    use crate::simulation::runner::profile_jobs;

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimConfig {
            quiet: true,
            parallel: 2,
            ..Default::default()
        };
        let jobs = profile_jobs(&KickerProfile::default(), 3, 40);
        let parallel = run_jobs_parallel(&config, &jobs);
        assert_eq!(parallel.len(), 3);

        for (job, result) in jobs.iter().zip(&parallel) {
            let result = result.as_ref().expect("round finished");
            let sequential = run_round(&config, job).unwrap();
            assert_eq!(result.seed, job.seed);
            assert_eq!(result.outcome, sequential.outcome);
            assert_eq!(result.power, sequential.power);
        }
    }
}
