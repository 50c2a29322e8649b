use crate::common::*;
use crate::function::AugLagrangianFunction;
use crate::lbfgs::LBFGS;
use crate::math::{is_finite, norm};
use crate::traits::*;
use anyhow::{format_err, Result};
use log::{debug, info, warn};

/// Augmented Lagrangian method, also called the method of multipliers.
/// Minimize a function F(x) beginning from a starting point x0, subject
/// to nonlinear equality constraints.
///
/// ```txt
///       min F(x)
///        x
///
/// subject to
///
///       c(x) = 0            (nonlinear equalities)
/// ```
///
/// Each outer iteration minimizes the augmented Lagrangian
///
/// ```txt
///       L(x) = F(x) - lambda'*c(x) + sigma/2 * |c(x)|^2
/// ```
///
/// with an unconstrained solver (L-BFGS by default), then updates the
/// multipliers `lambda -= sigma * c(x)` and grows the penalty `sigma`
/// whenever the constraint violation stalls.
pub struct AugLagrangian<'a, F: LagrangianFunction, M: InnerMinimizer = LBFGS> {
    function: &'a F,
    minimizer: M,
    progress: Option<&'a dyn ProgressMonitor>,

    /// Number of memory points used by the inner minimizer.
    pub num_basis: usize,
    pub options: Options,

    lambda: Vec<f64>,
    sigma: f64,
}

impl<'a, F: LagrangianFunction> AugLagrangian<'a, F, LBFGS> {
    /// Solver using L-BFGS with `num_basis` memory points for the subproblems.
    pub fn new(function: &'a F, num_basis: usize) -> Self {
        Self::with_minimizer(function, num_basis, LBFGS::default())
    }
}

impl<'a, F: LagrangianFunction, M: InnerMinimizer> AugLagrangian<'a, F, M> {
    /// Solver using `minimizer` for the subproblems.
    pub fn with_minimizer(function: &'a F, num_basis: usize, minimizer: M) -> Self {
        Self {
            function,
            minimizer,
            progress: None,
            num_basis,
            options: Options::default(),
            lambda: Vec::new(),
            sigma: 0.0,
        }
    }

    /// Replaces the outer-iteration options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Reports each outer iteration to `progress`.
    pub fn with_progress(mut self, progress: &'a dyn ProgressMonitor) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The constrained problem being optimized.
    pub fn function(&self) -> &'a F {
        self.function
    }

    /// Lagrange multipliers from the last call to `optimize`.
    pub fn lambda(&self) -> &[f64] {
        &self.lambda
    }

    /// Penalty parameter from the last call to `optimize`.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Runs at most `max_iterations` outer iterations starting from, and
    /// updating, `coordinates`.
    ///
    /// Returns `Ok(true)` once the 2-norm of the constraint violation falls
    /// below `options.tolerance`. `Ok(false)` is returned if the iteration
    /// budget is exhausted or a function evaluation produced a NaN or
    /// infinite value; `coordinates` then hold the last finite iterate.
    /// Invalid settings or dimensions are reported as errors before any
    /// iteration is performed.
    pub fn optimize(
        &mut self,
        max_iterations: usize,
        coordinates: &mut [f64],
        sigma: f64,
    ) -> Result<bool> {
        self.validate(coordinates, sigma)?;

        if max_iterations == 0 {
            return Ok(false);
        }

        let mut aug = AugLagrangianFunction::new(self.function, sigma);
        let converged = self.run(&mut aug, max_iterations, coordinates);

        self.lambda = aug.lambda;
        self.sigma = aug.sigma;

        Ok(converged)
    }

    fn validate(&self, coordinates: &[f64], sigma: f64) -> Result<()> {
        let opt = &self.options;
        if self.num_basis == 0 {
            return Err(format_err!("num_basis must be at least 1"));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(format_err!("sigma ({}) must be positive", sigma));
        }
        if !(opt.tolerance > 0.0) {
            return Err(format_err!(
                "tolerance ({}) must be positive",
                opt.tolerance
            ));
        }
        if !(opt.penalty_growth > 1.0) {
            return Err(format_err!(
                "penalty_growth ({}) must be greater than 1",
                opt.penalty_growth
            ));
        }
        if !(opt.decrease_ratio > 0.0 && opt.decrease_ratio < 1.0) {
            return Err(format_err!(
                "decrease_ratio ({}) must be between 0 and 1",
                opt.decrease_ratio
            ));
        }
        if !(opt.max_sigma >= sigma) {
            return Err(format_err!(
                "max_sigma ({}) must not be less than sigma ({})",
                opt.max_sigma,
                sigma
            ));
        }

        let nx = coordinates.len();
        if let Some(n) = self.function.dimension() {
            if n != nx {
                return Err(format_err!(
                    "coordinates have {} elements, problem has {} variables",
                    nx,
                    n
                ));
            }
        }
        let df = self.function.gradient(coordinates);
        if df.len() != nx {
            return Err(format_err!(
                "objective gradient has {} elements, expected {}",
                df.len(),
                nx
            ));
        }
        for i in 0..self.function.num_constraints() {
            let dc = self.function.gradient_constraint(i, coordinates);
            if dc.len() != nx {
                return Err(format_err!(
                    "gradient of constraint {} has {} elements, expected {}",
                    i,
                    dc.len(),
                    nx
                ));
            }
        }
        Ok(())
    }

    /// Outer iterations. Only finite iterates are copied to `coordinates`.
    fn run(
        &self,
        aug: &mut AugLagrangianFunction<F>,
        max_iterations: usize,
        coordinates: &mut [f64],
    ) -> bool {
        let opt = &self.options;
        let nc = self.function.num_constraints();

        let mut x = coordinates.to_vec();

        // Evaluate cost f(x0) and constraints c(x0)
        let f0 = self.function.evaluate(&x);
        let df0 = self.function.gradient(&x);
        let c0: Vec<f64> = (0..nc)
            .map(|i| self.function.evaluate_constraint(i, &x))
            .collect();
        if !f0.is_finite() || !is_finite(&df0) || !is_finite(&c0) {
            warn!("non-finite objective or constraint at the starting point");
            return false;
        }
        debug!(
            "start: f = {}, |c| = {}, sigma = {}",
            f0,
            norm(&c0),
            aug.sigma
        );

        let mut last_violation = f64::INFINITY;

        for iterations in 1..=max_iterations {
            match self.minimizer.minimize(&*aug, &x, self.num_basis) {
                Ok(x1) => {
                    if x1.len() != x.len() || !is_finite(&x1) {
                        warn!("inner minimizer returned an invalid point");
                        return false;
                    }
                    x = x1;
                }
                Err(err) => {
                    if let Some(nf) = err.downcast_ref::<NonFiniteValue>() {
                        warn!("numerically failed: {}", nf);
                        return false;
                    }
                    // x is kept, the multipliers are still updated
                    warn!("inner minimization failed: {}", err);
                }
            }

            let c: Vec<f64> = (0..nc)
                .map(|i| self.function.evaluate_constraint(i, &x))
                .collect();
            let f = self.function.evaluate(&x);
            if !f.is_finite() || !is_finite(&c) {
                warn!("non-finite objective or constraint at iteration {}", iterations);
                return false;
            }
            let violation = norm(&c);

            // update multipliers
            let sigma = aug.sigma;
            for (lam, &ci) in aug.lambda.iter_mut().zip(&c) {
                *lam -= sigma * ci;
            }

            // update penalty
            if violation > opt.decrease_ratio * last_violation {
                aug.sigma = f64::min(aug.sigma * opt.penalty_growth, opt.max_sigma);
            }
            last_violation = violation;

            coordinates.copy_from_slice(&x);

            debug!(
                "{}: f = {}, |c| = {}, sigma = {}",
                iterations, f, violation, aug.sigma
            );
            if let Some(progress) = self.progress {
                progress.update(iterations, violation, aug.sigma, f, &aug.lambda);
            }

            if violation < opt.tolerance {
                info!("Converged in {} iterations.", iterations);
                return true;
            }
        }
        info!("Did not converge in {} iterations.", max_iterations);

        false
    }
}
