use super::{EstimateTable, ValueEstimator};

/// Incremental sample mean: `Q += (r - Q) / N` with `N` counted after the visit.
///
/// Weights every observation of a key equally, so it converges to the true mean
/// of a stationary source but reacts slowly once the source drifts.
#[derive(Debug, Clone)]
pub struct SampleAverage {
    table: EstimateTable,
}

impl SampleAverage {
    #[must_use]
    pub fn new(table: EstimateTable) -> Self {
        Self { table }
    }
}

impl ValueEstimator for SampleAverage {
    fn table(&self) -> &EstimateTable {
        &self.table
    }

    #[expect(clippy::cast_precision_loss)]
    fn update(&mut self, key: usize, observed: f64) {
        let n = self.table.record_visit(key);
        self.table.step_toward(key, observed, 1.0 / n as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_reward_is_exact() {
        for n in [1, 2, 7, 1000] {
            let mut estimator = SampleAverage::new(EstimateTable::new(2, 3.0));
            for _ in 0..n {
                estimator.update(0, 0.3);
            }
            assert_eq!(estimator.read(0), 0.3, "after {n} observations");
            assert_eq!(estimator.visits(0), n);
            assert_eq!(estimator.read(1), 3.0);
        }
    }

    #[test]
    fn test_is_arithmetic_mean() {
        let mut estimator = SampleAverage::new(EstimateTable::new(1, 0.0));
        for r in [1.0, 2.0, 3.0, 6.0] {
            estimator.update(0, r);
        }
        assert!((estimator.read(0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_update_ignores_initial_value() {
        let mut estimator = SampleAverage::new(EstimateTable::new(1, 100.0));
        estimator.update(0, -2.0);
        assert_eq!(estimator.read(0), -2.0);
    }
}
