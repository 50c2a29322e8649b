use std::cell::RefCell;

use crate::common::NonFiniteValue;
use crate::traits::{DifferentiableFunction, InnerMinimizer};
use anyhow::{format_err, Result};
use argmin::core::{CostFunction, Error, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton;

type LineSearch = MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64>;
type Solver = quasinewton::LBFGS<LineSearch, Vec<f64>, Vec<f64>, f64>;

/// Exposes a `DifferentiableFunction` to argmin, rejecting NaN and
/// infinite evaluations so that the solver stops instead of stepping
/// through them.
///
/// argmin's L-BFGS turns line-search errors into a normal termination, so
/// the first rejected value is also kept in `failure`.
struct ArgminProblem<'a, F: DifferentiableFunction> {
    function: &'a F,
    failure: &'a RefCell<Option<NonFiniteValue>>,
}

impl<'a, F: DifferentiableFunction> ArgminProblem<'a, F> {
    fn reject(&self, what: &'static str, value: f64) -> Error {
        let nf = NonFiniteValue { what, value };
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(nf.clone());
        }
        nf.into()
    }
}

impl<'a, F: DifferentiableFunction> CostFunction for ArgminProblem<'a, F> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let f = self.function.evaluate(x);
        if !f.is_finite() {
            return Err(self.reject("objective", f));
        }
        Ok(f)
    }
}

impl<'a, F: DifferentiableFunction> Gradient for ArgminProblem<'a, F> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        let df = self.function.gradient(x);
        if let Some(&v) = df.iter().find(|v| !v.is_finite()) {
            return Err(self.reject("gradient", v));
        }
        Ok(df)
    }
}

/// Limited-memory BFGS with a More-Thuente line search.
pub struct LBFGS {
    /// Maximum number of iterations per minimization.
    pub max_iterations: u64,
    /// Terminates when the 2-norm of the gradient falls below this value.
    pub tol_grad: f64,
    /// Terminates when the change in function value falls below this value.
    pub tol_cost: f64,
}

impl InnerMinimizer for LBFGS {
    fn minimize<F: DifferentiableFunction>(
        &self,
        function: &F,
        x0: &[f64],
        num_basis: usize,
    ) -> Result<Vec<f64>> {
        let solver = Solver::new(LineSearch::new(), num_basis)
            .with_tolerance_grad(self.tol_grad)?
            .with_tolerance_cost(self.tol_cost)?;

        let failure = RefCell::new(None);
        let problem = ArgminProblem {
            function,
            failure: &failure,
        };
        let res = Executor::new(problem, solver)
            .configure(|state| state.param(x0.to_vec()).max_iters(self.max_iterations))
            .run()?;

        let state = res.state();
        log::trace!(
            "L-BFGS: {} iterations, cost {}, {:?}",
            state.get_iter(),
            state.get_best_cost(),
            state.get_termination_status()
        );
        if let Some(nf) = failure.take() {
            return Err(nf.into());
        }

        state
            .get_best_param()
            .cloned()
            .ok_or_else(|| format_err!("L-BFGS finished without a solution"))
    }
}

impl Default for LBFGS {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tol_grad: 1e-10,
            tol_cost: f64::EPSILON,
        }
    }
}
