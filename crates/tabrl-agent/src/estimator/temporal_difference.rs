use tabrl_engine::{Outcome, StateIndex};

use super::{EstimateTable, InvalidStepSizeError, StepSize, ValueEstimator};

/// Temporal-difference state values for the game.
///
/// Holds one value per [`StateIndex`], all starting at
/// [`Self::DEFAULT_VALUE`]. Two rules touch the table:
///
/// - [`Self::bootstrap`] blends the value of the state a player left toward the
///   value of the state it moved to: `V[prev] += alpha * (V[next] - V[prev])`.
///   Players call it only after a greedy move, and only once they have a
///   previous state.
/// - [`Self::assign_terminal`] overwrites the value of a state with the final
///   reward (`+1` win, `-1` loss, `0` draw).
///
/// Bootstrapped values move gradually while terminal values are replaced
/// outright.
#[derive(Debug, Clone)]
pub struct TemporalDifference {
    table: EstimateTable,
    alpha: StepSize,
}

impl TemporalDifference {
    /// Value of a state never reached by a terminal or bootstrap update.
    pub const DEFAULT_VALUE: f64 = 0.5;

    pub fn new(alpha: f64) -> Result<Self, InvalidStepSizeError> {
        Ok(Self::with_step_size(StepSize::new(alpha)?))
    }

    #[must_use]
    pub fn with_step_size(alpha: StepSize) -> Self {
        Self {
            table: EstimateTable::new(StateIndex::COUNT, Self::DEFAULT_VALUE),
            alpha,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> StepSize {
        self.alpha
    }

    #[must_use]
    pub fn value(&self, state: StateIndex) -> f64 {
        self.table.read(state.as_usize())
    }

    /// Counts one more choice of `state` as a move target.
    pub fn record_visit(&mut self, state: StateIndex) -> u64 {
        self.table.record_visit(state.as_usize())
    }

    pub fn bootstrap(&mut self, prev: StateIndex, next: StateIndex) {
        let target = self.value(next);
        self.table
            .step_toward(prev.as_usize(), target, self.alpha.get());
    }

    pub fn assign_terminal(&mut self, state: StateIndex, outcome: Outcome) {
        self.table.set(state.as_usize(), terminal_reward(outcome));
    }
}

/// Reward written into the final state of a game.
#[must_use]
pub fn terminal_reward(outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Won => 1.0,
        Outcome::Lost => -1.0,
        Outcome::Draw => 0.0,
    }
}

impl ValueEstimator for TemporalDifference {
    fn table(&self) -> &EstimateTable {
        &self.table
    }

    /// Blends the value of state `key` toward `observed` with step `alpha`.
    fn update(&mut self, key: usize, observed: f64) {
        self.table.step_toward(key, observed, self.alpha.get());
    }
}
