use std::fmt;

pub struct Options {
    /// Termination tolerance on the 2-norm of the constraint violation.
    pub tolerance: f64,

    /// Factor by which the penalty parameter is multiplied when the
    /// constraint violation has not decreased sufficiently.
    pub penalty_growth: f64,
    /// The constraint violation must shrink below this fraction of its
    /// previous value for the penalty parameter to be left unchanged.
    pub decrease_ratio: f64,
    /// Upper bound on the penalty parameter.
    pub max_sigma: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,

            penalty_growth: 10.0,
            decrease_ratio: 0.25,
            max_sigma: 1e12,
        }
    }
}

/// A NaN or infinite value produced by a function evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NonFiniteValue {
    /// What was being evaluated.
    pub what: &'static str,
    pub value: f64,
}

impl fmt::Display for NonFiniteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "non-finite {}: {}", self.what, self.value)
    }
}

impl std::error::Error for NonFiniteValue {}
