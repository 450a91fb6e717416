use super::{EstimateTable, StepSize, ValueEstimator};

/// Exponential recency-weighted average: `Q += alpha * (r - Q)`.
///
/// Older observations decay by a factor `1 - alpha` per update, which lets the
/// estimate follow a drifting source. The initial value keeps a weight of
/// `(1 - alpha)^n` after `n` updates; see [`UnbiasedConstantStepSize`] for a
/// variant without that bias.
#[derive(Debug, Clone)]
pub struct ConstantStepSize {
    table: EstimateTable,
    alpha: StepSize,
}

impl ConstantStepSize {
    #[must_use]
    pub fn new(table: EstimateTable, alpha: StepSize) -> Self {
        Self { table, alpha }
    }

    #[must_use]
    pub fn alpha(&self) -> StepSize {
        self.alpha
    }
}

impl ValueEstimator for ConstantStepSize {
    fn table(&self) -> &EstimateTable {
        &self.table
    }

    fn update(&mut self, key: usize, observed: f64) {
        self.table.record_visit(key);
        self.table.step_toward(key, observed, self.alpha.get());
    }
}

/// Constant step size with the initial-value bias removed.
///
/// Keeps a per-key trace `o` that starts at 0 and moves toward 1:
///
/// ```text
/// o[key] += alpha * (1 - o[key])
/// beta    = alpha / o[key]
/// Q[key] += beta * (r - Q[key])
/// ```
///
/// The trace is updated before `beta` is computed, so the first update uses
/// `beta = alpha / alpha = 1` and the estimate jumps straight to the first
/// observation. As `o` saturates, `beta` falls back to `alpha` and the
/// estimator tracks drifting sources like [`ConstantStepSize`].
#[derive(Debug, Clone)]
pub struct UnbiasedConstantStepSize {
    table: EstimateTable,
    alpha: StepSize,
    trace: Vec<f64>,
}

impl UnbiasedConstantStepSize {
    #[must_use]
    pub fn new(table: EstimateTable, alpha: StepSize) -> Self {
        let trace = vec![0.0; table.len()];
        Self {
            table,
            alpha,
            trace,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> StepSize {
        self.alpha
    }

    /// Current trace `o[key]` (0 for keys never updated).
    #[must_use]
    pub fn trace(&self, key: usize) -> f64 {
        self.trace.get(key).copied().unwrap_or(0.0)
    }
}

impl ValueEstimator for UnbiasedConstantStepSize {
    fn table(&self) -> &EstimateTable {
        &self.table
    }

    fn update(&mut self, key: usize, observed: f64) {
        self.table.record_visit(key);
        let alpha = self.alpha.get();
        let trace = &mut self.trace[key];
        *trace += alpha * (1.0 - *trace);
        // alpha > 0, so the trace is positive from the first update on
        let beta = alpha / *trace;
        self.table.step_toward(key, observed, beta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(value: f64) -> StepSize {
        StepSize::new(value).unwrap()
    }

    mod constant {
        use super::*;

        #[test]
        fn test_moves_by_alpha() {
            let mut estimator = ConstantStepSize::new(EstimateTable::new(1, 0.0), alpha(0.5));
            estimator.update(0, 8.0);
            assert_eq!(estimator.read(0), 4.0);
            estimator.update(0, 8.0);
            assert_eq!(estimator.read(0), 6.0);
            assert_eq!(estimator.visits(0), 2);
        }

        #[test]
        fn test_keeps_initial_bias() {
            let mut estimator = ConstantStepSize::new(EstimateTable::new(1, 10.0), alpha(0.1));
            estimator.update(0, 0.0);
            assert!((estimator.read(0) - 9.0).abs() < 1e-12);
        }

        #[test]
        fn test_weights_recent_observations_more() {
            let mut estimator = ConstantStepSize::new(EstimateTable::new(1, 0.0), alpha(0.1));
            for _ in 0..200 {
                estimator.update(0, 1.0);
            }
            for _ in 0..50 {
                estimator.update(0, 5.0);
            }
            // a sample average would sit at 1.8
            assert!(estimator.read(0) > 4.9);
        }
    }

    mod unbiased {
        use super::*;

        #[test]
        fn test_first_update_jumps_to_observation() {
            for initial in [0.0, -50.0, 1e6] {
                let mut estimator =
                    UnbiasedConstantStepSize::new(EstimateTable::new(2, initial), alpha(0.1));
                estimator.update(1, 3.25);
                assert_eq!(estimator.read(1), 3.25, "initial = {initial}");
                assert_eq!(estimator.read(0), initial);
                assert!((estimator.trace(1) - 0.1).abs() < 1e-15);
            }
        }

        #[test]
        fn test_optimistic_initial_value_leaves_no_residue() {
            let mut estimator =
                UnbiasedConstantStepSize::new(EstimateTable::new(1, 3.0), alpha(0.1));
            estimator.update(0, 0.3);
            assert_eq!(estimator.read(0), 0.3);
            for _ in 0..20 {
                estimator.update(0, 0.3);
            }
            assert_eq!(estimator.read(0), 0.3);
        }

        #[test]
        fn test_second_update_matches_closed_form() {
            let mut estimator = UnbiasedConstantStepSize::new(EstimateTable::new(1, 0.0), alpha(0.5));
            estimator.update(0, 2.0);
            estimator.update(0, 4.0);
            // o = 0.5 then 0.75, beta = 2/3: 2 + 2/3 * (4 - 2)
            assert!((estimator.trace(0) - 0.75).abs() < 1e-15);
            assert!((estimator.read(0) - (2.0 + 4.0 / 3.0)).abs() < 1e-12);
        }

        #[test]
        fn test_trace_saturates_to_constant_step() {
            let mut unbiased =
                UnbiasedConstantStepSize::new(EstimateTable::new(1, 0.0), alpha(0.1));
            for _ in 0..500 {
                unbiased.update(0, 1.0);
            }
            assert!((unbiased.trace(0) - 1.0).abs() < 1e-12);

            let mut constant = ConstantStepSize::new(EstimateTable::new(1, 1.0), alpha(0.1));
            unbiased.update(0, 3.0);
            constant.update(0, 3.0);
            assert!((unbiased.read(0) - constant.read(0)).abs() < 1e-9);
        }
    }
}
