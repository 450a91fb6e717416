//! Multi-run bandit experiments.
//!
//! An experiment repeats a bandit run many times with a fresh testbed and
//! fresh agents, and averages the per-step rewards and optimal-arm choices of
//! each agent over all runs.
//!
//! # Seeding
//!
//! The master [`RngSeed`] generates one seed per run, in run order, before
//! any run starts. Run `i` draws only from its own generator, so its data
//! depends on the master seed and `i` alone.
//!
//! # Parallelism
//!
//! Runs are evaluated in waves of `workers` runs on scoped threads. Each run
//! records into its own [`LearningCurves`]; the main thread adds them to the
//! total in run order. Floating-point sums are therefore formed in exactly
//! the same order as in a single-threaded pass, and the result does not
//! depend on the worker count.

use std::{num::NonZero, thread};

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tabrl_agent::{BanditAgent, BanditAgentConfig, EstimatorConfig, ExplorationPolicy};
use tabrl_engine::{BanditTestbed, RngSeed};

use crate::{
    RunError,
    bandit_run::run_bandit,
    recorder::{AveragedCurves, LearningCurves, RunLog},
};

/// Parameters of a multi-run bandit experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditExperimentConfig {
    pub arm_count: usize,
    pub runs: usize,
    pub steps: usize,
    /// Standard deviation of the initial true means around zero.
    pub initial_sigma: f64,
    /// Standard deviation of the per-step random walk; 0 keeps the testbed
    /// stationary.
    pub drift_sigma: f64,
    pub agents: Vec<BanditAgentConfig>,
    /// Threads to use; all available cores if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for BanditExperimentConfig {
    fn default() -> Self {
        Self {
            arm_count: 10,
            runs: 2000,
            steps: 10_000,
            initial_sigma: 0.0,
            drift_sigma: 0.01,
            agents: default_agents(0.1, 0.1),
            workers: None,
        }
    }
}

/// Sample average, constant step size and unbiased constant step size, all
/// epsilon-greedy with the same exploration rate.
#[must_use]
pub fn default_agents(explore_pct: f64, alpha: f64) -> Vec<BanditAgentConfig> {
    let policy = ExplorationPolicy::EpsilonGreedy { explore_pct };
    [
        EstimatorConfig::SampleAverage,
        EstimatorConfig::ConstantStepSize { alpha },
        EstimatorConfig::UnbiasedConstantStepSize { alpha },
    ]
    .into_iter()
    .map(|estimator| BanditAgentConfig::new(estimator, policy))
    .collect()
}

impl BanditExperimentConfig {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.agents.iter().map(BanditAgentConfig::label).collect()
    }

    fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZero::get))
            .max(1)
    }

    fn build_agents(&self) -> Result<Vec<BanditAgent>, RunError> {
        self.agents
            .iter()
            .map(|agent| Ok(agent.build(self.arm_count)?))
            .collect()
    }
}

/// Detailed data of the final run, for plotting one trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRun {
    pub seed: RngSeed,
    /// `[arm][step]` true means after each step's drift.
    pub true_means: Vec<Vec<f64>>,
    /// `[agent][arm][step]` estimates after each step's update.
    pub estimate_history: Vec<Vec<Vec<f64>>>,
    /// `[agent][arm]` estimates at the end of the run.
    pub final_estimates: Vec<Vec<f64>>,
    pub optimal_arm: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub seed: RngSeed,
    pub labels: Vec<String>,
    pub curves: AveragedCurves,
    pub last_run: Option<LastRun>,
}

/// Runs the experiment described by `config`.
///
/// `on_progress` is called on the calling thread with the number of finished
/// runs, after every wave.
pub fn run_experiment<F>(
    config: &BanditExperimentConfig,
    seed: RngSeed,
    mut on_progress: F,
) -> Result<ExperimentResult, RunError>
where
    F: FnMut(usize),
{
    // fail on invalid agents before spawning anything
    config.build_agents()?;

    let mut master = seed.rng();
    let run_seeds: Vec<RngSeed> = (0..config.runs).map(|_| master.random()).collect();
    let workers = config.worker_count();
    log::info!(
        "running {} runs of {} steps with {} agents on {workers} workers (seed {seed})",
        config.runs,
        config.steps,
        config.agents.len()
    );

    let mut total = LearningCurves::new(config.agents.len(), config.steps);
    let mut last_run = None;
    let mut done = 0;
    for wave in run_seeds.chunks(workers) {
        let results = thread::scope(|s| {
            let handles = wave
                .iter()
                .enumerate()
                .map(|(offset, &run_seed)| {
                    let keep_log = done + offset + 1 == config.runs;
                    s.spawn(move || single_run(config, run_seed, keep_log))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<Vec<_>>()
        });
        for (offset, result) in results.into_iter().enumerate() {
            let (curves, log) = result?;
            total.merge(&curves);
            if let Some(log) = log {
                last_run = Some(log);
            }
            log::debug!("run {} finished", done + offset);
        }
        done += wave.len();
        on_progress(done);
    }
    log::info!("experiment finished after {} runs", total.runs());

    Ok(ExperimentResult {
        seed,
        labels: config.labels(),
        curves: total.average(),
        last_run,
    })
}

fn single_run(
    config: &BanditExperimentConfig,
    seed: RngSeed,
    keep_log: bool,
) -> Result<(LearningCurves, Option<LastRun>), RunError> {
    let mut rng = seed.rng();
    let mut testbed = BanditTestbed::new(
        config.arm_count,
        config.initial_sigma,
        config.drift_sigma,
        &mut rng,
    )?;
    let mut agents = config.build_agents()?;
    let mut curves = LearningCurves::new(agents.len(), config.steps);

    let last_run = if keep_log {
        let mut log = RunLog::new(agents.len());
        run_bandit(
            &mut testbed,
            &mut agents,
            config.steps,
            &mut rng,
            &mut (&mut curves, &mut log),
        )?;
        Some(LastRun {
            seed,
            true_means: log.true_mean_series(),
            estimate_history: (0..agents.len()).map(|a| log.estimate_series(a)).collect(),
            final_estimates: agents
                .iter()
                .map(|agent| agent.estimates().values().to_vec())
                .collect(),
            optimal_arm: testbed.optimal_arm(),
        })
    } else {
        run_bandit(&mut testbed, &mut agents, config.steps, &mut rng, &mut curves)?;
        None
    };
    curves.finish_run();
    Ok((curves, last_run))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(workers: usize) -> BanditExperimentConfig {
        BanditExperimentConfig {
            arm_count: 4,
            runs: 7,
            steps: 60,
            initial_sigma: 1.0,
            drift_sigma: 0.05,
            agents: default_agents(0.1, 0.1),
            workers: Some(workers),
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = small_config(2);
        let a = run_experiment(&config, RngSeed::from_u64(10), |_| {}).unwrap();
        let b = run_experiment(&config, RngSeed::from_u64(10), |_| {}).unwrap();
        assert_eq!(a, b);

        let c = run_experiment(&config, RngSeed::from_u64(11), |_| {}).unwrap();
        assert_ne!(a.curves, c.curves);
    }

    #[test]
    fn test_independent_of_worker_count() {
        let seed = RngSeed::from_u64(99);
        let sequential = run_experiment(&small_config(1), seed, |_| {}).unwrap();
        for workers in [2, 3, 7, 16] {
            let parallel = run_experiment(&small_config(workers), seed, |_| {}).unwrap();
            assert_eq!(parallel, sequential, "workers = {workers}");
        }
    }

    #[test]
    fn test_shapes_and_progress() {
        let config = small_config(3);
        let mut progress = vec![];
        let result = run_experiment(&config, RngSeed::from_u64(1), |done| progress.push(done)).unwrap();
        assert_eq!(progress, vec![3, 6, 7]);

        assert_eq!(result.curves.runs, 7);
        assert_eq!(result.labels.len(), 3);
        assert_eq!(result.labels[0], "sample average, epsilon = 0.1");
        assert_eq!(result.curves.avg_rewards.len(), 3);
        assert!(result.curves.avg_rewards.iter().all(|c| c.len() == 60));
        assert!(
            result
                .curves
                .optimal_fraction
                .iter()
                .flatten()
                .all(|f| (0.0..=1.0).contains(f))
        );

        let last = result.last_run.unwrap();
        assert_eq!(last.true_means.len(), 4);
        assert!(last.true_means.iter().all(|series| series.len() == 60));
        assert_eq!(last.estimate_history.len(), 3);
        assert_eq!(last.estimate_history[0].len(), 4);
        for (history, estimates) in last.estimate_history.iter().zip(&last.final_estimates) {
            let from_history: Vec<f64> = history.iter().map(|arm| arm[59]).collect();
            assert_eq!(&from_history, estimates);
        }
    }

    #[test]
    fn test_invalid_agent_fails_early() {
        let mut config = small_config(1);
        config.agents[1] = BanditAgentConfig::new(
            EstimatorConfig::ConstantStepSize { alpha: 2.0 },
            ExplorationPolicy::default(),
        );
        assert!(matches!(
            run_experiment(&config, RngSeed::from_u64(0), |_| {}),
            Err(RunError::InvalidAgent(_))
        ));
    }

    #[test]
    fn test_zero_runs() {
        let mut config = small_config(2);
        config.runs = 0;
        let result = run_experiment(&config, RngSeed::from_u64(0), |_| {}).unwrap();
        assert_eq!(result.curves.runs, 0);
        assert!(result.last_run.is_none());
        assert!(result.curves.avg_rewards[0].iter().all(|r| *r == 0.0));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: BanditExperimentConfig = serde_json::from_str(r#"{"runs": 5}"#).unwrap();
        assert_eq!(config.runs, 5);
        assert_eq!(config.arm_count, 10);
        assert_eq!(config.steps, 10_000);
        assert_eq!(config.drift_sigma, 0.01);
        assert_eq!(config.agents.len(), 3);
    }
}
