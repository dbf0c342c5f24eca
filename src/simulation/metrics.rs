//! Metrics collection for penalty simulation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::GameEvent;
use crate::scoring::ShotOutcome;

/// Result of a single simulated round, rebuilt from its event stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    /// Kicker profile (or grid cell label)
    pub profile: String,
    /// RNG seed of the app that played the round
    pub seed: u64,
    /// "goal", "save" or "post"
    pub outcome: String,
    pub power: f32,
    /// Look angles at the kick, radians
    pub yaw: f32,
    pub pitch: f32,
    /// Keeper action committed after the shot ("-" if none)
    pub keeper_action: String,
    pub keeper_reflexes: f32,
    pub keeper_positioning: f32,
    pub keeper_reach: f32,
    /// Save probability rolled against (0 for timeouts)
    pub save_chance: f32,
    /// Ball position when the round resolved
    pub crossing: (f32, f32, f32),
    pub timed_out: bool,
    /// Seconds from round start to outcome
    pub duration: f32,
    /// Events of this round (used for DB persistence)
    #[serde(skip)]
    pub events: Vec<(u32, GameEvent)>,
}

impl RoundResult {
    pub fn outcome(&self) -> Option<ShotOutcome> {
        ShotOutcome::from_code(&self.outcome)
    }
}

/// Split a session's events into per-round results.
/// Rounds that never reached an outcome are dropped.
pub fn rounds_from_events(events: &[(u32, GameEvent)], profile: &str, seed: u64) -> Vec<RoundResult> {
    let mut results = Vec::new();
    let mut current: Option<(u32, RoundResult)> = None;

    for (time_ms, event) in events {
        if let GameEvent::RoundStart {
            round,
            reflexes,
            positioning,
            reach,
        } = event
        {
            current = Some((
                *time_ms,
                RoundResult {
                    round: *round,
                    profile: profile.to_string(),
                    seed,
                    keeper_action: "-".to_string(),
                    keeper_reflexes: *reflexes,
                    keeper_positioning: *positioning,
                    keeper_reach: *reach,
                    ..Default::default()
                },
            ));
        }

        let Some((start_ms, result)) = current.as_mut() else {
            continue;
        };
        result.events.push((*time_ms, event.clone()));

        match event {
            GameEvent::Kick { power, yaw, pitch } => {
                result.power = *power;
                result.yaw = *yaw;
                result.pitch = *pitch;
            }
            GameEvent::KeeperDecision { action } => {
                result.keeper_action = action.clone();
            }
            GameEvent::BallCrossed { pos, timed_out } => {
                result.crossing = *pos;
                result.timed_out = *timed_out;
            }
            GameEvent::KeeperSave { chance, .. } => {
                result.save_chance = *chance;
            }
            GameEvent::Outcome { result: code } => {
                result.outcome = code.clone();
                result.duration = time_ms.saturating_sub(*start_ms) as f32 / 1000.0;
            }
            GameEvent::RoundEnd { .. } => {
                if let Some((_, finished)) = current.take()
                    && !finished.outcome.is_empty()
                {
                    results.push(finished);
                }
            }
            _ => {}
        }
    }

    // Session stopped after the outcome but before the epilogue
    if let Some((_, finished)) = current
        && !finished.outcome.is_empty()
    {
        results.push(finished);
    }

    results
}

/// Goals/saves for one keeper action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStats {
    pub rounds: u32,
    pub goals: u32,
    pub saves: u32,
}

/// Aggregate statistics over a set of rounds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimMetrics {
    pub rounds: u32,
    pub goals: u32,
    pub saves: u32,
    pub posts: u32,
    pub goal_rate: f32,
    pub save_rate: f32,
    pub post_rate: f32,
    pub avg_power: f32,
    /// Mean save chance over rounds that reached the line
    pub avg_save_chance: f32,
    pub by_action: HashMap<String, ActionStats>,
}

impl SimMetrics {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let mut metrics = Self::default();
        let mut power_sum = 0.0;
        let mut chance_sum = 0.0;
        let mut chance_count = 0u32;

        for result in results {
            let Some(outcome) = result.outcome() else {
                continue;
            };
            metrics.rounds += 1;
            power_sum += result.power;
            if !result.timed_out {
                chance_sum += result.save_chance;
                chance_count += 1;
            }

            let action = metrics
                .by_action
                .entry(result.keeper_action.clone())
                .or_default();
            action.rounds += 1;
            match outcome {
                ShotOutcome::Goal => {
                    metrics.goals += 1;
                    action.goals += 1;
                }
                ShotOutcome::Save => {
                    metrics.saves += 1;
                    action.saves += 1;
                }
                ShotOutcome::Post => metrics.posts += 1,
            }
        }

        if metrics.rounds > 0 {
            let n = metrics.rounds as f32;
            metrics.goal_rate = metrics.goals as f32 / n;
            metrics.save_rate = metrics.saves as f32 / n;
            metrics.post_rate = metrics.posts as f32 / n;
            metrics.avg_power = power_sum / n;
        }
        if chance_count > 0 {
            metrics.avg_save_chance = chance_sum / chance_count as f32;
        }
        metrics
    }

    /// Multi-line summary for terminal output
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Rounds: {}  Goals: {} ({:.1}%)  Saves: {} ({:.1}%)  Misses: {} ({:.1}%)\n",
            self.rounds,
            self.goals,
            self.goal_rate * 100.0,
            self.saves,
            self.save_rate * 100.0,
            self.posts,
            self.post_rate * 100.0
        ));
        output.push_str(&format!(
            "Avg power: {:.2}  Avg save chance: {:.2}\n",
            self.avg_power, self.avg_save_chance
        ));

        let mut actions: Vec<_> = self.by_action.iter().collect();
        actions.sort_by(|a, b| b.1.rounds.cmp(&a.1.rounds).then(a.0.cmp(b.0)));
        if !actions.is_empty() {
            output.push_str(&format!(
                "\n{:>14} | {:>6} | {:>6} | {:>6}\n",
                "Keeper action", "Rounds", "Goals", "Saves"
            ));
            output.push_str(&format!("{:-<14}-+-{:-<6}-+-{:-<6}-+-{:-<6}\n", "", "", "", ""));
            for (name, stats) in actions {
                output.push_str(&format!(
                    "{:>14} | {:>6} | {:>6} | {:>6}\n",
                    name, stats.rounds, stats.goals, stats.saves
                ));
            }
        }
        output
    }
}

/// Results of a profile sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepResult {
    pub results_by_profile: HashMap<String, Vec<RoundResult>>,
    pub metrics_by_profile: HashMap<String, SimMetrics>,
    /// Profile with the best conversion rate
    pub best_profile: String,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate_stats(&mut self) {
        self.metrics_by_profile.clear();
        let mut best_rate = -1.0;
        for (profile, results) in &self.results_by_profile {
            let metrics = SimMetrics::from_results(results);
            if metrics.rounds > 0
                && (metrics.goal_rate > best_rate
                    || (metrics.goal_rate == best_rate && *profile < self.best_profile))
            {
                best_rate = metrics.goal_rate;
                self.best_profile = profile.clone();
            }
            self.metrics_by_profile.insert(profile.clone(), metrics);
        }
    }

    /// Format as ASCII table, rows in the given profile order
    pub fn format_table(&self, profiles: &[String]) -> String {
        let mut output = String::new();
        output.push_str("\nKicker Profile Sweep:\n\n");
        output.push_str(&format!(
            "{:>12} | {:>6} | {:>7} | {:>7} | {:>7} | {:>9}\n",
            "Profile", "Rounds", "Goal %", "Save %", "Miss %", "Avg power"
        ));
        output.push_str(&format!(
            "{:-<12}-+-{:-<6}-+-{:-<7}-+-{:-<7}-+-{:-<7}-+-{:-<9}\n",
            "", "", "", "", "", ""
        ));

        for profile in profiles {
            let Some(m) = self.metrics_by_profile.get(profile) else {
                continue;
            };
            output.push_str(&format!(
                "{:>12} | {:>6} | {:>6.1}% | {:>6.1}% | {:>6.1}% | {:>9.2}\n",
                &profile[..profile.len().min(12)],
                m.rounds,
                m.goal_rate * 100.0,
                m.save_rate * 100.0,
                m.post_rate * 100.0,
                m.avg_power
            ));
        }

        if let Some(best) = self.metrics_by_profile.get(&self.best_profile) {
            output.push_str(&format!(
                "\nBest conversion: {} ({:.1}%)\n",
                self.best_profile,
                best.goal_rate * 100.0
            ));
        }
        output
    }
}

/// One aim × power cell of the shot grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub power: f32,
    pub metrics: SimMetrics,
}

impl GridCell {
    pub fn label(yaw_deg: f32, pitch_deg: f32, power: f32) -> String {
        format!("grid y{:+.0} p{:+.0} @{:.2}", yaw_deg, pitch_deg, power)
    }
}

/// Results of a shot grid run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridResult {
    pub cells: Vec<GridCell>,
}

impl GridResult {
    pub fn format_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nShot Grid:\n\n");
        output.push_str(&format!(
            "{:>6} | {:>6} | {:>5} | {:>6} | {:>7} | {:>7} | {:>7}\n",
            "Yaw", "Pitch", "Power", "Shots", "Goal %", "Save %", "Miss %"
        ));
        output.push_str(&format!(
            "{:-<6}-+-{:-<6}-+-{:-<5}-+-{:-<6}-+-{:-<7}-+-{:-<7}-+-{:-<7}\n",
            "", "", "", "", "", "", ""
        ));
        for cell in &self.cells {
            let m = &cell.metrics;
            output.push_str(&format!(
                "{:>6.0} | {:>6.0} | {:>5.2} | {:>6} | {:>6.1}% | {:>6.1}% | {:>6.1}%\n",
                cell.yaw_deg,
                cell.pitch_deg,
                cell.power,
                m.rounds,
                m.goal_rate * 100.0,
                m.save_rate * 100.0,
                m.post_rate * 100.0
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_events(round: u32, outcome: &str, action: &str, t0: u32) -> Vec<(u32, GameEvent)> {
        vec![
            (
                t0,
                GameEvent::RoundStart {
                    round,
                    reflexes: 0.7,
                    positioning: 0.6,
                    reach: 0.8,
                },
            ),
            (
                t0 + 1000,
                GameEvent::Kick {
                    power: 0.5,
                    yaw: 0.1,
                    pitch: 0.0,
                },
            ),
            (
                t0 + 1300,
                GameEvent::KeeperDecision {
                    action: action.to_string(),
                },
            ),
            (
                t0 + 1500,
                GameEvent::BallCrossed {
                    pos: (1.0, 1.0, -15.0),
                    timed_out: false,
                },
            ),
            (
                t0 + 1500,
                GameEvent::KeeperSave {
                    saved: outcome == "save",
                    chance: 0.4,
                },
            ),
            (
                t0 + 1500,
                GameEvent::Outcome {
                    result: outcome.to_string(),
                },
            ),
            (
                t0 + 3500,
                GameEvent::RoundEnd {
                    round,
                    goals: 0,
                    saves: 0,
                    posts: 0,
                },
            ),
        ]
    }

    #[test]
    fn test_rounds_from_events() {
        let mut events = round_events(1, "goal", "Dive", 0);
        events.extend(round_events(2, "save", "Center", 5000));
        let results = rounds_from_events(&events, "Placer", 9);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].outcome, "goal");
        assert_eq!(results[0].keeper_action, "Dive");
        assert_eq!(results[0].power, 0.5);
        assert_eq!(results[0].events.len(), 7);
        assert!((results[0].duration - 1.5).abs() < 1e-5);
        assert_eq!(results[1].round, 2);
        assert_eq!(results[1].profile, "Placer");
        assert_eq!(results[1].seed, 9);
    }

    #[test]
    fn test_unfinished_round_is_dropped() {
        let mut events = round_events(1, "goal", "Dive", 0);
        events.truncate(2);
        assert!(rounds_from_events(&events, "Balanced", 0).is_empty());
    }

    #[test]
    fn test_metrics_rates_and_actions() {
        let mut events = round_events(1, "goal", "Dive", 0);
        events.extend(round_events(2, "save", "Dive", 5000));
        events.extend(round_events(3, "goal", "Jump", 10000));
        events.extend(round_events(4, "post", "Center", 15000));
        let metrics = SimMetrics::from_results(&rounds_from_events(&events, "Balanced", 0));

        assert_eq!(metrics.rounds, 4);
        assert_eq!(metrics.goals, 2);
        assert!((metrics.goal_rate - 0.5).abs() < 1e-6);
        assert!((metrics.avg_power - 0.5).abs() < 1e-6);
        assert_eq!(
            metrics.by_action["Dive"],
            ActionStats {
                rounds: 2,
                goals: 1,
                saves: 1
            }
        );
        assert!(metrics.format_summary().contains("Dive"));
    }

    #[test]
    fn test_sweep_picks_best_profile() {
        let mut sweep = SweepResult::new();
        sweep.results_by_profile.insert(
            "Placer".to_string(),
            rounds_from_events(&round_events(1, "goal", "Dive", 0), "Placer", 0),
        );
        sweep.results_by_profile.insert(
            "Blaster".to_string(),
            rounds_from_events(&round_events(1, "save", "Dive", 0), "Blaster", 0),
        );
        sweep.calculate_stats();
        assert_eq!(sweep.best_profile, "Placer");
        let table = sweep.format_table(&["Placer".to_string(), "Blaster".to_string()]);
        assert!(table.contains("Best conversion: Placer"));
    }
}
