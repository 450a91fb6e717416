/// Step size outside `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("step size must lie in (0, 1], got {alpha}")]
pub struct InvalidStepSizeError {
    pub alpha: f64,
}

/// A validated constant step size `alpha` in `(0, 1]`.
///
/// An `alpha` of 1 replaces the estimate with the latest observation; values
/// close to 0 average over a long window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize(f64);

impl StepSize {
    pub fn new(alpha: f64) -> Result<Self, InvalidStepSizeError> {
        if alpha > 0.0 && alpha <= 1.0 {
            Ok(Self(alpha))
        } else {
            Err(InvalidStepSizeError { alpha })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}
