//! Value estimators: tabular update rules for action and state values.
//!
//! Every estimator owns an [`EstimateTable`] and differs only in the step size
//! it applies when a new observation `r` arrives for `key`:
//!
//! ```text
//! Q[key] += step * (r - Q[key])
//! ```
//!
//! | estimator                     | step                       | suits                 |
//! |-------------------------------|----------------------------|-----------------------|
//! | [`SampleAverage`]             | `1 / N[key]`               | stationary sources    |
//! | [`ConstantStepSize`]          | `alpha`                    | drifting sources      |
//! | [`UnbiasedConstantStepSize`]  | `alpha / o[key]`           | drifting, no init bias|
//! | [`TemporalDifference`]        | `alpha`, target = `V[next]`| self-play game states |
//!
//! The first three are interchangeable behind [`ValueEstimator`] and are built
//! from an [`EstimatorConfig`]. [`TemporalDifference`] also implements the
//! trait but adds the bootstrap and terminal rules used by game players.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::{
    constant_step::*, sample_average::*, step_size::*, table::*, temporal_difference::*,
};

mod constant_step;
mod sample_average;
mod step_size;
mod table;
mod temporal_difference;

/// A tabular value estimator.
///
/// Keys are dense indices into the estimator's [`EstimateTable`]: arm indices
/// for the bandit, [`StateIndex`](tabrl_engine::StateIndex) values for the game.
pub trait ValueEstimator: fmt::Debug + Send {
    /// Table of current estimates and visit counts.
    fn table(&self) -> &EstimateTable;

    /// Folds one observation for `key` into its estimate.
    ///
    /// # Panics
    ///
    /// Panics if `key` is outside the table.
    fn update(&mut self, key: usize, observed: f64);

    /// Current estimate for `key`, or the table's initial value if unseen.
    fn read(&self, key: usize) -> f64 {
        self.table().read(key)
    }

    /// Number of updates applied to `key`.
    fn visits(&self, key: usize) -> u64 {
        self.table().visits(key)
    }
}

/// Estimator family selector for command-line flags.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum EstimatorKind {
    #[default]
    Average,
    Constant,
    Unbiased,
}

impl EstimatorKind {
    /// Pairs the family with a step size (ignored by [`Self::Average`]).
    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> EstimatorConfig {
        match self {
            Self::Average => EstimatorConfig::SampleAverage,
            Self::Constant => EstimatorConfig::ConstantStepSize { alpha },
            Self::Unbiased => EstimatorConfig::UnbiasedConstantStepSize { alpha },
        }
    }
}

/// Serializable description of a bandit action-value estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorConfig {
    SampleAverage,
    ConstantStepSize { alpha: f64 },
    UnbiasedConstantStepSize { alpha: f64 },
}

impl EstimatorConfig {
    /// Builds an estimator over `len` keys, each starting at `initial_value`.
    pub fn build(
        self,
        len: usize,
        initial_value: f64,
    ) -> Result<Box<dyn ValueEstimator>, InvalidStepSizeError> {
        let table = EstimateTable::new(len, initial_value);
        let estimator: Box<dyn ValueEstimator> = match self {
            Self::SampleAverage => Box::new(SampleAverage::new(table)),
            Self::ConstantStepSize { alpha } => {
                Box::new(ConstantStepSize::new(table, StepSize::new(alpha)?))
            }
            Self::UnbiasedConstantStepSize { alpha } => {
                Box::new(UnbiasedConstantStepSize::new(table, StepSize::new(alpha)?))
            }
        };
        Ok(estimator)
    }

    /// Short human-readable label, used for report legends.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::SampleAverage => "sample average".to_owned(),
            Self::ConstantStepSize { alpha } => format!("fixed alpha = {alpha}"),
            Self::UnbiasedConstantStepSize { alpha } => format!("unbiased fixed alpha = {alpha}"),
        }
    }
}
