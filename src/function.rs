use crate::math::axpy;
use crate::traits::{DifferentiableFunction, LagrangianFunction};

/// Augmented Lagrangian of a constrained problem for fixed multipliers
/// and penalty parameter:
///
/// ```txt
///       L(x) = f(x) - sum_i lambda_i c_i(x) + sigma/2 sum_i c_i(x)^2
/// ```
///
/// This is the function handed to the unconstrained inner minimizer.
/// `lambda` and `sigma` are updated in place between outer iterations.
pub(crate) struct AugLagrangianFunction<'a, F: LagrangianFunction> {
    function: &'a F,
    pub(crate) lambda: Vec<f64>,
    pub(crate) sigma: f64,
}

impl<'a, F: LagrangianFunction> AugLagrangianFunction<'a, F> {
    /// Binds `function` with zero multipliers and the given penalty.
    pub(crate) fn new(function: &'a F, sigma: f64) -> Self {
        Self {
            function,
            lambda: vec![0.0; function.num_constraints()],
            sigma,
        }
    }
}

impl<'a, F: LagrangianFunction> DifferentiableFunction for AugLagrangianFunction<'a, F> {
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut obj = self.function.evaluate(x);
        for (i, &lam) in self.lambda.iter().enumerate() {
            let c = self.function.evaluate_constraint(i, x);
            obj += -lam * c + 0.5 * self.sigma * c * c;
        }
        obj
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let mut grad = self.function.gradient(x);
        for (i, &lam) in self.lambda.iter().enumerate() {
            let c = self.function.evaluate_constraint(i, x);
            let dc = self.function.gradient_constraint(i, x);
            // -lambda_i * dc_i + sigma * c_i * dc_i
            axpy(self.sigma * c - lam, &dc, &mut grad);
        }
        grad
    }
}
