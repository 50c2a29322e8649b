mod auglag;
mod common;
mod function;
mod lbfgs;
mod math;
#[cfg(test)]
mod tests;
mod traits;

pub use auglag::AugLagrangian;
pub use common::*;
pub use lbfgs::LBFGS;
pub use math::{dot, is_finite, norm, norm_inf};
pub use traits::*;
