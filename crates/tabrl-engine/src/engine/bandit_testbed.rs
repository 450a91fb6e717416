use rand::Rng;
use rand_distr::{Distribution as _, Normal, StandardNormal};

use crate::{InvalidTestbedError, OutOfRangeActionError};

use super::environment::Environment;

/// A k-armed bandit with Gaussian rewards and optional random-walk drift.
///
/// Every arm has a hidden true mean. Pulling arm `k` yields a reward drawn from
/// `N(true_mean[k], 1)`. If a drift is configured, [`Self::step`] perturbs every
/// true mean with independent `N(0, drift_sigma)` noise, which makes the problem
/// non-stationary.
///
/// # Optimal arm
///
/// The testbed tracks the arm with the highest true mean for scoring. When
/// several arms share the maximum, the one with the **lowest index** is the
/// optimal arm. This tie-break is part of the contract: `is_optimal` is true
/// for exactly one arm at any time.
///
/// # Example
///
/// ```
/// use tabrl_engine::BanditTestbed;
///
/// let mut rng = rand::rng();
/// let testbed = BanditTestbed::with_means(vec![0.0, 2.0, 2.0], 0.0).unwrap();
/// assert_eq!(testbed.optimal_arm(), 1);
/// assert!(testbed.is_optimal(1));
/// assert!(!testbed.is_optimal(2));
///
/// let reward = testbed.sample(0, &mut rng).unwrap();
/// assert!(reward.is_finite());
/// assert!(testbed.sample(3, &mut rng).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BanditTestbed {
    true_means: Vec<f64>,
    drift: Option<Normal<f64>>,
    optimal_arm: usize,
}

impl BanditTestbed {
    /// Creates a testbed whose true means are drawn from `N(0, initial_sigma)`.
    ///
    /// `initial_sigma = 0` starts every arm at a mean of zero; `drift_sigma = 0`
    /// keeps the testbed stationary.
    pub fn new<R>(
        arm_count: usize,
        initial_sigma: f64,
        drift_sigma: f64,
        rng: &mut R,
    ) -> Result<Self, InvalidTestbedError>
    where
        R: Rng + ?Sized,
    {
        let initial = zero_mean_normal("initial_sigma", initial_sigma)?;
        let true_means = initial.sample_iter(rng).take(arm_count).collect();
        Self::with_means(true_means, drift_sigma)
    }

    /// Creates a testbed with explicit true means.
    pub fn with_means(true_means: Vec<f64>, drift_sigma: f64) -> Result<Self, InvalidTestbedError> {
        if true_means.is_empty() {
            return Err(InvalidTestbedError::NoArms);
        }
        let drift = if drift_sigma == 0.0 {
            None
        } else {
            Some(zero_mean_normal("drift_sigma", drift_sigma)?)
        };
        let mut this = Self {
            true_means,
            drift,
            optimal_arm: 0,
        };
        this.optimal_arm = this.compute_optimal_arm();
        Ok(this)
    }

    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.true_means.len()
    }

    #[must_use]
    pub fn true_means(&self) -> &[f64] {
        &self.true_means
    }

    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.drift.is_none()
    }

    #[must_use]
    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    #[must_use]
    pub fn is_optimal(&self, arm: usize) -> bool {
        arm == self.optimal_arm
    }

    /// Advances the random walk by one step and recomputes the optimal arm.
    ///
    /// Does nothing observable for a stationary testbed (and draws no random
    /// numbers).
    pub fn step<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let Some(drift) = self.drift else {
            return;
        };
        for mean in &mut self.true_means {
            *mean += drift.sample(rng);
        }
        self.optimal_arm = self.compute_optimal_arm();
    }

    /// Pulls `arm` and returns a reward drawn from `N(true_mean[arm], 1)`.
    pub fn sample<R>(&self, arm: usize, rng: &mut R) -> Result<f64, OutOfRangeActionError>
    where
        R: Rng + ?Sized,
    {
        let mean = self.true_means.get(arm).ok_or(OutOfRangeActionError {
            arm,
            arm_count: self.arm_count(),
        })?;
        let noise: f64 = rng.sample(StandardNormal);
        Ok(mean + noise)
    }

    fn compute_optimal_arm(&self) -> usize {
        let mut best = 0;
        for (arm, mean) in self.true_means.iter().enumerate().skip(1) {
            // strict comparison keeps the first maximum
            if *mean > self.true_means[best] {
                best = arm;
            }
        }
        best
    }
}

/// `N(0, sigma)`, rejecting a negative or non-finite `sigma`.
fn zero_mean_normal(name: &'static str, sigma: f64) -> Result<Normal<f64>, InvalidTestbedError> {
    let invalid = InvalidTestbedError::InvalidSigma { name, sigma };
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(invalid);
    }
    Normal::new(0.0, sigma).map_err(|_| invalid)
}

impl Environment for BanditTestbed {
    type Action = usize;

    fn legal_actions(&self) -> Vec<usize> {
        (0..self.arm_count()).collect()
    }

    fn is_terminal(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn test_rejects_empty_testbed() {
        assert_eq!(
            BanditTestbed::with_means(vec![], 0.0).unwrap_err(),
            InvalidTestbedError::NoArms
        );
    }

    #[test]
    fn test_rejects_negative_sigma() {
        let err = BanditTestbed::new(3, -1.0, 0.0, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            InvalidTestbedError::InvalidSigma {
                name: "initial_sigma",
                ..
            }
        ));
        let err = BanditTestbed::with_means(vec![0.0], f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            InvalidTestbedError::InvalidSigma {
                name: "drift_sigma",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_drift_sigma() {
        assert_eq!(
            BanditTestbed::with_means(vec![0.0, 1.0], -0.5).unwrap_err(),
            InvalidTestbedError::InvalidSigma {
                name: "drift_sigma",
                sigma: -0.5,
            }
        );
        assert!(BanditTestbed::new(3, 1.0, f64::INFINITY, &mut rng()).is_err());
        assert!(BanditTestbed::with_means(vec![0.0], 0.5).is_ok());
    }

    #[test]
    fn test_zero_initial_sigma_gives_equal_means() {
        let testbed = BanditTestbed::new(5, 0.0, 0.0, &mut rng()).unwrap();
        assert_eq!(testbed.true_means(), &[0.0; 5]);
        // all tied: first arm wins
        assert_eq!(testbed.optimal_arm(), 0);
    }

    #[test]
    fn test_optimal_arm_prefers_first_maximum() {
        let testbed = BanditTestbed::with_means(vec![1.0, 3.0, -2.0, 3.0], 0.0).unwrap();
        assert_eq!(testbed.optimal_arm(), 1);
        assert!(testbed.is_optimal(1));
        assert!(!testbed.is_optimal(3));
    }

    #[test]
    fn test_sample_out_of_range() {
        let testbed = BanditTestbed::with_means(vec![0.0, 1.0], 0.0).unwrap();
        assert_eq!(
            testbed.sample(2, &mut rng()).unwrap_err(),
            OutOfRangeActionError {
                arm: 2,
                arm_count: 2
            }
        );
    }

    #[test]
    fn test_sample_mean_matches_true_mean() {
        let testbed = BanditTestbed::with_means(vec![-3.0, 4.0], 0.0).unwrap();
        let mut rng = rng();
        let n = 20_000;
        let mean = (0..n)
            .map(|_| testbed.sample(1, &mut rng).unwrap())
            .sum::<f64>()
            / f64::from(n);
        assert!((mean - 4.0).abs() < 0.05, "mean = {mean}");
    }

    #[test]
    fn test_stationary_step_is_noop() {
        let mut testbed = BanditTestbed::with_means(vec![0.5, 0.25], 0.0).unwrap();
        assert!(testbed.is_stationary());
        for _ in 0..10 {
            testbed.step(&mut rng());
        }
        assert_eq!(testbed.true_means(), &[0.5, 0.25]);
    }

    #[test]
    fn test_drift_moves_every_arm_and_tracks_optimal() {
        let mut testbed = BanditTestbed::with_means(vec![0.0; 4], 0.5).unwrap();
        let mut rng = rng();
        testbed.step(&mut rng);
        assert!(testbed.true_means().iter().all(|m| *m != 0.0));

        for _ in 0..100 {
            testbed.step(&mut rng);
            let max = testbed
                .true_means()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(testbed.true_means()[testbed.optimal_arm()], max);
        }
    }

    #[test]
    fn test_environment_actions_are_all_arms() {
        let testbed = BanditTestbed::with_means(vec![0.0; 3], 0.0).unwrap();
        assert_eq!(testbed.legal_actions(), vec![0, 1, 2]);
        assert!(!testbed.is_terminal());
    }
}
