use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabrl_agent::PlayerRecord;
use tabrl_engine::RngSeed;
use tabrl_training::{
    experiment::{BanditExperimentConfig, ExperimentResult, LastRun},
    self_play::{GameTally, SelfPlayConfig, SelfPlayResult},
};

/// Learning curves of a bandit experiment, ready for plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanditReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    pub seed: RngSeed,
    pub config: BanditExperimentConfig,
    /// Legend entry per agent, in the order of the series below
    pub labels: Vec<String>,
    pub runs: u64,
    /// `[agent][step]` reward averaged over all runs
    pub avg_rewards: Vec<Vec<f64>>,
    /// `[agent][step]` fraction of runs that chose the optimal arm
    pub optimal_fraction: Vec<Vec<f64>>,
    /// Trajectory of the final run
    pub last_run: Option<LastRun>,
}

impl BanditReport {
    pub fn new(config: BanditExperimentConfig, result: ExperimentResult) -> Self {
        let ExperimentResult {
            seed,
            labels,
            curves,
            last_run,
        } = result;
        Self {
            generated_at: Utc::now(),
            seed,
            config,
            labels,
            runs: curves.runs,
            avg_rewards: curves.avg_rewards,
            optimal_fraction: curves.optimal_fraction,
            last_run,
        }
    }
}

/// Outcome of a self-play series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    pub seed: RngSeed,
    pub config: SelfPlayConfig,
    pub tally: GameTally,
    /// Tally of each consecutive window of `config.window` games
    pub windows: Vec<GameTally>,
    /// Per-seat record, player one first
    pub records: [PlayerRecord; 2],
    pub visited_states: [usize; 2],
}

impl SelfPlayReport {
    pub fn new(config: SelfPlayConfig, result: SelfPlayResult) -> Self {
        let SelfPlayResult {
            seed,
            tally,
            windows,
            records,
            visited_states,
        } = result;
        Self {
            generated_at: Utc::now(),
            seed,
            config,
            tally,
            windows,
            records,
            visited_states,
        }
    }
}
