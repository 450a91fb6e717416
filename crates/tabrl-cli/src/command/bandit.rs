use std::path::PathBuf;

use anyhow::Context as _;
use tabrl_agent::{BanditAgentConfig, EstimatorKind, PolicyKind};
use tabrl_stats::{descriptive::DescriptiveStats, series};
use tabrl_training::experiment::{self, BanditExperimentConfig};

use crate::{schema::report::BanditReport, util};

/// Share of the final steps summarized on the console.
const TAIL_FRACTION: usize = 10;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BanditArg {
    /// Number of arms
    #[arg(long, default_value_t = 10)]
    arms: usize,
    /// Independent runs to average over
    #[arg(long, default_value_t = 2000)]
    runs: usize,
    /// Steps per run
    #[arg(long, default_value_t = 10_000)]
    steps: usize,
    /// Spread of the initial true means
    #[arg(long, default_value_t = 0.0)]
    initial_sigma: f64,
    /// Per-step random-walk spread of the true means (0 = stationary)
    #[arg(long, default_value_t = 0.01)]
    drift_sigma: f64,
    /// Estimators to compare, one agent each
    #[arg(
        long = "estimator",
        value_name = "KIND",
        default_values_t = [EstimatorKind::Average, EstimatorKind::Constant, EstimatorKind::Unbiased],
    )]
    estimators: Vec<EstimatorKind>,
    /// Step size of the constant step size estimators
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,
    /// Exploration policy shared by all agents
    #[arg(long, default_value = "epsilon")]
    policy: PolicyKind,
    /// Exploration rate of epsilon-greedy
    #[arg(long, default_value_t = 0.1)]
    explore_pct: f64,
    /// Confidence `c` of UCB
    #[arg(long, default_value_t = 2.0)]
    confidence: f64,
    /// Starting estimate of every arm
    #[arg(long, default_value_t = 0.0)]
    initial_value: f64,
    /// Worker threads (default: all cores)
    #[arg(long)]
    workers: Option<usize>,
    /// Master seed; random if absent
    #[arg(long)]
    seed: Option<u64>,
    /// JSON experiment config replacing the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl BanditArg {
    fn experiment_config(&self) -> anyhow::Result<BanditExperimentConfig> {
        if let Some(path) = &self.config {
            return util::load_config("experiment config", path);
        }
        let policy = match self.policy {
            PolicyKind::Epsilon => self.policy.with_param(self.explore_pct),
            PolicyKind::Ucb => self.policy.with_param(self.confidence),
        };
        let agents = self
            .estimators
            .iter()
            .map(|kind| BanditAgentConfig {
                initial_value: self.initial_value,
                ..BanditAgentConfig::new(kind.with_alpha(self.alpha), policy)
            })
            .collect();
        Ok(BanditExperimentConfig {
            arm_count: self.arms,
            runs: self.runs,
            steps: self.steps,
            initial_sigma: self.initial_sigma,
            drift_sigma: self.drift_sigma,
            agents,
            workers: self.workers,
        })
    }
}

pub(crate) fn run(arg: &BanditArg) -> anyhow::Result<()> {
    let config = arg.experiment_config()?;
    let seed = util::resolve_seed(arg.seed);

    let result = experiment::run_experiment(&config, seed, |done| {
        eprint!("Run {done:5} / {}\r", config.runs);
    })
    .context("bandit experiment failed")?;
    eprintln!();

    let tail = (config.steps / TAIL_FRACTION).max(1);
    eprintln!("Last {tail} steps, averaged over {} runs:", result.curves.runs);
    for (agent, label) in result.labels.iter().enumerate() {
        let reward = series::tail_mean(&result.curves.avg_rewards[agent], tail).unwrap_or(0.0);
        let optimal =
            series::tail_mean(&result.curves.optimal_fraction[agent], tail).unwrap_or(0.0);
        eprintln!(
            "  {label:32} reward {reward:7.3}   optimal {:5.1}%",
            optimal * 100.0
        );
        let trend = series::window_means(&result.curves.optimal_fraction[agent], tail);
        eprintln!(
            "  {:32} optimal trend {:.2?}",
            "",
            trend.iter().map(|f| f * 100.0).collect::<Vec<_>>()
        );
    }

    if let Some(last) = &result.last_run {
        eprintln!("Final run (optimal arm {}):", last.optimal_arm);
        let true_means: Vec<f64> = last
            .true_means
            .iter()
            .filter_map(|arm| arm.last().copied())
            .collect();
        for (label, estimates) in result.labels.iter().zip(&last.final_estimates) {
            let errors = estimates
                .iter()
                .zip(&true_means)
                .map(|(estimate, truth)| (estimate - truth).abs());
            if let Some(stats) = DescriptiveStats::new(errors) {
                eprintln!(
                    "  {label:32} estimate error mean {:.3}  max {:.3}",
                    stats.mean, stats.max
                );
            }
        }
    }

    util::emit_report(&BanditReport::new(config, result), arg.output.clone())?;
    Ok(())
}
