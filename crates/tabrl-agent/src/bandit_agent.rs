use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    estimator::{EstimateTable, EstimatorConfig, InvalidStepSizeError, ValueEstimator},
    history::EpisodeHistory,
    policy::{ActionScore, ExplorationPolicy, InvalidPolicyError, NoLegalMovesError, Selection},
};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum InvalidAgentConfigError {
    #[display("invalid estimator: {_0}")]
    StepSize(InvalidStepSizeError),
    #[display("invalid policy: {_0}")]
    Policy(InvalidPolicyError),
}

/// Everything needed to build a fresh [`BanditAgent`] for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanditAgentConfig {
    /// Legend used in reports; derived from the estimator and policy if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub policy: ExplorationPolicy,
    /// Starting estimate of every arm; values above the reward scale make the
    /// agent explore optimistically.
    #[serde(default)]
    pub initial_value: f64,
}

impl BanditAgentConfig {
    #[must_use]
    pub fn new(estimator: EstimatorConfig, policy: ExplorationPolicy) -> Self {
        Self {
            label: None,
            estimator,
            policy,
            initial_value: 0.0,
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("{}, {}", self.estimator.label(), self.policy.label()))
    }

    pub fn build(&self, arm_count: usize) -> Result<BanditAgent, InvalidAgentConfigError> {
        self.policy.validate()?;
        let estimator = self.estimator.build(arm_count, self.initial_value)?;
        Ok(BanditAgent::new(self.label(), estimator, self.policy))
    }
}

/// A learner for the k-armed bandit: one estimator plus one exploration policy.
///
/// The estimator's keys are arm indices. The agent counts its own selections;
/// that count is the `t` handed to UCB.
#[derive(Debug)]
pub struct BanditAgent {
    label: String,
    estimator: Box<dyn ValueEstimator>,
    policy: ExplorationPolicy,
    history: EpisodeHistory<(usize, f64)>,
    steps: u64,
}

impl BanditAgent {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        estimator: Box<dyn ValueEstimator>,
        policy: ExplorationPolicy,
    ) -> Self {
        Self {
            label: label.into(),
            estimator,
            policy,
            history: EpisodeHistory::new(),
            steps: 0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn policy(&self) -> ExplorationPolicy {
        self.policy
    }

    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.estimator.table().len()
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn estimates(&self) -> &EstimateTable {
        self.estimator.table()
    }

    #[must_use]
    pub fn history(&self) -> &EpisodeHistory<(usize, f64)> {
        &self.history
    }

    /// Picks one of the candidate `arms` with the configured policy.
    ///
    /// The returned [`Selection::index`] is the arm itself, not its position
    /// in `arms`. Arms outside the estimate table score as unvisited at the
    /// initial value.
    pub fn select_arm<R>(&self, arms: &[usize], rng: &mut R) -> Result<Selection, NoLegalMovesError>
    where
        R: Rng + ?Sized,
    {
        let table = self.estimator.table();
        let scores: Vec<ActionScore> = arms
            .iter()
            .map(|&arm| ActionScore {
                value: table.read(arm),
                visits: table.visits(arm),
            })
            .collect();
        let selection = self.policy.select(&scores, self.steps, rng)?;
        Ok(Selection {
            index: arms[selection.index],
            ..selection
        })
    }

    /// Folds the reward of a pulled arm into the estimate.
    pub fn observe(&mut self, arm: usize, reward: f64) {
        self.estimator.update(arm, reward);
        self.history.push((arm, reward));
        self.steps += 1;
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }
}
