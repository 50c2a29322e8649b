use float_cmp::approx_eq;

use crate::math::dot;
use crate::{AugLagrangian, DifferentiableFunction, LagrangianFunction};

/// 2-d quadratic with a single linear equality constraint:
///
/// ```txt
///     min  x_1^2 + x_2^2
///     s.t. x_1 + x_2 - 1 = 0
/// ```
///
/// The minimizer is `(0.5, 0.5)` with multiplier `1`.
pub(super) struct Constrained2DQuadratic {}

impl DifferentiableFunction for Constrained2DQuadratic {
    fn evaluate(&self, x: &[f64]) -> f64 {
        dot(x, x)
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        vec![2.0 * x[0], 2.0 * x[1]]
    }
}

impl LagrangianFunction for Constrained2DQuadratic {
    fn num_constraints(&self) -> usize {
        1
    }

    fn evaluate_constraint(&self, _index: usize, x: &[f64]) -> f64 {
        x[0] + x[1] - 1.0
    }

    fn gradient_constraint(&self, _index: usize, _x: &[f64]) -> Vec<f64> {
        vec![1.0, 1.0]
    }
}

/// Shifted quadratic on the same constraint:
///
/// ```txt
///     min  1/2 (x_1 - 2)^2 + 1/2 (x_2 - 3)^2
///     s.t. x_1 + x_2 - 1 = 0
/// ```
///
/// The minimizer is `(0, 1)` with multiplier `-2`.
struct ShiftedQuadratic {}

impl DifferentiableFunction for ShiftedQuadratic {
    fn evaluate(&self, x: &[f64]) -> f64 {
        0.5 * (x[0] - 2.0).powi(2) + 0.5 * (x[1] - 3.0).powi(2)
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        vec![x[0] - 2.0, x[1] - 3.0]
    }
}

impl LagrangianFunction for ShiftedQuadratic {
    fn num_constraints(&self) -> usize {
        1
    }

    fn evaluate_constraint(&self, _index: usize, x: &[f64]) -> f64 {
        x[0] + x[1] - 1.0
    }

    fn gradient_constraint(&self, _index: usize, _x: &[f64]) -> Vec<f64> {
        vec![1.0, 1.0]
    }

    fn dimension(&self) -> Option<usize> {
        Some(2)
    }
}

#[test]
fn constrained_2d_quadratic() {
    let f = Constrained2DQuadratic {};

    let mut x = vec![0.0, 0.0];
    let mut al = AugLagrangian::new(&f, 5);
    let converged = al.optimize(20, &mut x, 1.0).unwrap();

    assert!(converged);
    assert!(approx_eq!(f64, x[0], 0.5, epsilon = 1e-6));
    assert!(approx_eq!(f64, x[1], 0.5, epsilon = 1e-6));
    assert_eq!(al.lambda().len(), 1);
    assert!(approx_eq!(f64, al.lambda()[0], 1.0, epsilon = 1e-6));
    assert!(al.sigma() >= 1.0);
}

#[test]
fn shifted_quadratic() {
    let f = ShiftedQuadratic {};

    let mut x = vec![5.0, -5.0];
    let mut al = AugLagrangian::new(&f, 3);
    let converged = al.optimize(50, &mut x, 0.5).unwrap();

    assert!(converged);
    assert!(approx_eq!(f64, x[0], 0.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, x[1], 1.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, al.lambda()[0], -2.0, epsilon = 1e-6));
}

#[test]
fn repeated_optimize_restarts_multipliers() {
    let f = Constrained2DQuadratic {};
    let mut al = AugLagrangian::new(&f, 5);

    let mut x1 = vec![0.0, 0.0];
    assert!(al.optimize(20, &mut x1, 1.0).unwrap());
    let (lambda1, sigma1) = (al.lambda().to_vec(), al.sigma());

    let mut x2 = vec![0.0, 0.0];
    assert!(al.optimize(20, &mut x2, 1.0).unwrap());

    assert_eq!(x1, x2);
    assert_eq!(lambda1, al.lambda());
    assert_eq!(sigma1, al.sigma());
}
