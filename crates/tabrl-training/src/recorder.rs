//! Output channel for per-step bandit data.
//!
//! The bandit driver pushes every observation into a [`StepRecorder`] it is
//! handed by reference. What gets kept is the recorder's business: a
//! [`RunLog`] keeps one run in full, [`LearningCurves`] folds many runs into
//! per-step sums.

use serde::{Deserialize, Serialize};

/// Receives the data produced by a bandit run, step by step.
pub trait StepRecorder {
    /// Agent `agent` received `reward` at `step`; `optimal` tells whether the
    /// pulled arm was the testbed's optimal arm at that time.
    fn record(&mut self, step: usize, agent: usize, reward: f64, optimal: bool);

    /// True means after the drift of `step` was applied.
    fn record_true_means(&mut self, _step: usize, _means: &[f64]) {}

    /// Estimates of `agent` after its update at `step`.
    fn record_estimates(&mut self, _step: usize, _agent: usize, _estimates: &[f64]) {}
}

impl<S> StepRecorder for &mut S
where
    S: StepRecorder + ?Sized,
{
    fn record(&mut self, step: usize, agent: usize, reward: f64, optimal: bool) {
        (**self).record(step, agent, reward, optimal);
    }

    fn record_true_means(&mut self, step: usize, means: &[f64]) {
        (**self).record_true_means(step, means);
    }

    fn record_estimates(&mut self, step: usize, agent: usize, estimates: &[f64]) {
        (**self).record_estimates(step, agent, estimates);
    }
}

/// Feeds both recorders.
impl<A, B> StepRecorder for (A, B)
where
    A: StepRecorder,
    B: StepRecorder,
{
    fn record(&mut self, step: usize, agent: usize, reward: f64, optimal: bool) {
        self.0.record(step, agent, reward, optimal);
        self.1.record(step, agent, reward, optimal);
    }

    fn record_true_means(&mut self, step: usize, means: &[f64]) {
        self.0.record_true_means(step, means);
        self.1.record_true_means(step, means);
    }

    fn record_estimates(&mut self, step: usize, agent: usize, estimates: &[f64]) {
        self.0.record_estimates(step, agent, estimates);
        self.1.record_estimates(step, agent, estimates);
    }
}

/// Discards everything.
impl StepRecorder for () {
    fn record(&mut self, _step: usize, _agent: usize, _reward: f64, _optimal: bool) {}
}

/// Reward and optimal-arm flag of one agent at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub reward: f64,
    pub optimal: bool,
}

/// Everything observed during a single run.
///
/// Series are indexed `[agent][step]` (rewards, estimates) and
/// `[step][arm]` (true means, estimates per step).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub steps: Vec<Vec<StepRecord>>,
    pub true_means: Vec<Vec<f64>>,
    pub estimates: Vec<Vec<Vec<f64>>>,
}

impl RunLog {
    #[must_use]
    pub fn new(agent_count: usize) -> Self {
        Self {
            steps: vec![vec![]; agent_count],
            true_means: vec![],
            estimates: vec![vec![]; agent_count],
        }
    }

    /// Rewards of `agent` in step order.
    pub fn rewards(&self, agent: usize) -> impl Iterator<Item = f64> + '_ {
        self.steps[agent].iter().map(|r| r.reward)
    }

    /// True mean of each arm over time, as `[arm][step]`.
    #[must_use]
    pub fn true_mean_series(&self) -> Vec<Vec<f64>> {
        transpose(&self.true_means)
    }

    /// Estimates of `agent` for each arm over time, as `[arm][step]`.
    #[must_use]
    pub fn estimate_series(&self, agent: usize) -> Vec<Vec<f64>> {
        transpose(&self.estimates[agent])
    }
}

impl StepRecorder for RunLog {
    fn record(&mut self, _step: usize, agent: usize, reward: f64, optimal: bool) {
        self.steps[agent].push(StepRecord { reward, optimal });
    }

    fn record_true_means(&mut self, _step: usize, means: &[f64]) {
        self.true_means.push(means.to_vec());
    }

    fn record_estimates(&mut self, _step: usize, agent: usize, estimates: &[f64]) {
        self.estimates[agent].push(estimates.to_vec());
    }
}

fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect()
}

/// Per-step sums of rewards and optimal choices over many runs.
///
/// Runs are folded in by recording into the curves directly; [`Self::merge`]
/// adds the sums of another set of runs, so partial curves computed in
/// parallel combine into the same result as one sequential pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningCurves {
    reward_sums: Vec<Vec<f64>>,
    optimal_counts: Vec<Vec<u64>>,
    runs: u64,
}

/// Learning curves divided by the number of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedCurves {
    pub runs: u64,
    /// `[agent][step]` mean reward.
    pub avg_rewards: Vec<Vec<f64>>,
    /// `[agent][step]` fraction of runs that pulled the optimal arm.
    pub optimal_fraction: Vec<Vec<f64>>,
}

impl LearningCurves {
    #[must_use]
    pub fn new(agent_count: usize, steps: usize) -> Self {
        Self {
            reward_sums: vec![vec![0.0; steps]; agent_count],
            optimal_counts: vec![vec![0; steps]; agent_count],
            runs: 0,
        }
    }

    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Marks the end of one run's recording.
    pub fn finish_run(&mut self) {
        self.runs += 1;
    }

    /// Adds another set of runs over the same agents and steps.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn merge(&mut self, other: &Self) {
        assert_eq!(self.reward_sums.len(), other.reward_sums.len());
        for (sums, other) in self.reward_sums.iter_mut().zip(&other.reward_sums) {
            assert_eq!(sums.len(), other.len());
            for (sum, value) in sums.iter_mut().zip(other) {
                *sum += value;
            }
        }
        for (counts, other) in self.optimal_counts.iter_mut().zip(&other.optimal_counts) {
            for (count, value) in counts.iter_mut().zip(other) {
                *count += value;
            }
        }
        self.runs += other.runs;
    }

    /// Divides the sums by the number of runs (all zeros if there were none).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average(&self) -> AveragedCurves {
        let runs = self.runs.max(1) as f64;
        AveragedCurves {
            runs: self.runs,
            avg_rewards: self
                .reward_sums
                .iter()
                .map(|sums| sums.iter().map(|s| s / runs).collect())
                .collect(),
            optimal_fraction: self
                .optimal_counts
                .iter()
                .map(|counts| counts.iter().map(|&c| c as f64 / runs).collect())
                .collect(),
        }
    }
}

impl StepRecorder for LearningCurves {
    fn record(&mut self, step: usize, agent: usize, reward: f64, optimal: bool) {
        self.reward_sums[agent][step] += reward;
        self.optimal_counts[agent][step] += u64::from(optimal);
    }
}
