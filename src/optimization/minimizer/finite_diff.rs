//! Boundary-aware finite differences.
//!
//! The stock finite-difference helpers assume a total function; the custom
//! conjugate-gradient solver instead needs to know, per coordinate, whether a
//! probe stepped outside the objective's domain. [`grad_and_boundary`]
//! returns that information as a flag vector alongside the gradient.
//!
//! Also hosts the one-sided Jacobian used by the Jacobian checker.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::{Eval, Objective},
        types::{BoundaryFlags, Grad, Jacobian, Point},
    },
};
use ndarray::{Array1, Array2};

/// Probe step for gradient and boundary-flag estimation.
pub const FD_STEP: f64 = 1e-4;

/// Probe step for the forward-difference Jacobian.
pub const JAC_FD_EPS: f64 = 1e-10;

/// Central-difference gradient of `f` at `x` with per-coordinate boundary
/// detection.
///
/// For each coordinate `k`, the objective is probed at `x ± delta·e_k`:
/// - both probes feasible: `grad[k] = (f₊ - f₋) / (2·delta)`, flag `0`;
/// - positive probe infeasible: flag `+1`, `grad[k] = 0`;
/// - otherwise, negative probe infeasible: flag `-1`, `grad[k] = 0`.
///
/// The positive probe is checked first, so a coordinate boxed in on both
/// sides reports `+1`. The center point itself is never evaluated.
pub fn grad_and_boundary<F: Objective>(
    f: &F, x: &Point, delta: f64,
) -> (Grad, BoundaryFlags) {
    let dim = x.len();
    let mut grad = Array1::zeros(dim);
    let mut flags = BoundaryFlags::zeros(dim);
    let mut probe = x.clone();
    for k in 0..dim {
        probe[k] = x[k] + delta;
        let f_plus = f.eval(&probe);
        probe[k] = x[k] - delta;
        let f_minus = f.eval(&probe);
        probe[k] = x[k];
        match (f_plus, f_minus) {
            (Eval::Feasible(fp), Eval::Feasible(fm)) => {
                grad[k] = (fp - fm) / (2.0 * delta);
            }
            (Eval::Infeasible, _) => {
                flags[k] = 1;
            }
            (_, Eval::Infeasible) => {
                flags[k] = -1;
            }
        }
    }
    (grad, flags)
}

/// Forward-difference Jacobian of a vector-valued function at `x`.
///
/// Column `k` is `(f(x + eps·e_k) - f(x)) / eps`. The result is `m × n` for
/// an `m`-valued function of `n` parameters.
///
/// # Errors
/// Propagates any error raised by the function itself.
pub fn forward_diff_jacobian<F>(f: &F, x: &Point, eps: f64) -> OptResult<Jacobian>
where
    F: Fn(&Point) -> OptResult<Array1<f64>>,
{
    let base = f(x)?;
    let (rows, cols) = (base.len(), x.len());
    let mut jac = Array2::zeros((rows, cols));
    let mut probe = x.clone();
    for k in 0..cols {
        probe[k] = x[k] + eps;
        let shifted = f(&probe)?;
        probe[k] = x[k];
        for (i, (&si, &bi)) in shifted.iter().zip(base.iter()).enumerate() {
            jac[(i, k)] = (si - bi) / eps;
        }
    }
    Ok(jac)
}
