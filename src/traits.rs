use anyhow::Result;

/// A differentiable scalar function of a real vector.
pub trait DifferentiableFunction {
    /// Returns the function value at `x`.
    fn evaluate(&self, x: &[f64]) -> f64;

    /// Returns the gradient at `x`, with the same length as `x`.
    fn gradient(&self, x: &[f64]) -> Vec<f64>;
}

/// Objective function with a fixed number of nonlinear equality constraints:
///
/// ```txt
///       min f(x)
///        x
///
/// subject to
///
///       c_i(x) = 0,  i = 0..m
/// ```
///
/// Implementations must not keep optimization state, a single instance
/// may be evaluated by any number of optimizers.
pub trait LagrangianFunction: DifferentiableFunction {
    /// Number of equality constraints, `m`.
    fn num_constraints(&self) -> usize;

    /// Evaluates constraint `index` at `x`.
    fn evaluate_constraint(&self, index: usize, x: &[f64]) -> f64;

    /// Gradient of constraint `index` at `x`.
    fn gradient_constraint(&self, index: usize, x: &[f64]) -> Vec<f64>;

    /// Number of optimization variables, if known.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Suggested starting point.
    fn initial_point(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Unconstrained minimizer used to solve each augmented subproblem.
pub trait InnerMinimizer {
    /// Minimizes `function` starting from `x0`, keeping `num_basis`
    /// correction pairs of curvature history. Returns the best point found,
    /// which need not be a converged minimizer.
    fn minimize<F: DifferentiableFunction>(
        &self,
        function: &F,
        x0: &[f64],
        num_basis: usize,
    ) -> Result<Vec<f64>>;
}

/// Called after each outer iteration of the solver with the current
/// iteration number, the 2-norm of the constraint violation, the penalty
/// parameter, the objective function value and the Lagrange multipliers.
pub trait ProgressMonitor {
    /// Receives the state after outer iteration `i`.
    fn update(&self, i: usize, violation: f64, sigma: f64, obj: f64, lambda: &[f64]);
}
