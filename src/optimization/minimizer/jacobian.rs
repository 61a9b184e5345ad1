//! minimizer::jacobian — finite-difference validation of analytic Jacobians.
//!
//! Compares a candidate Jacobian matrix against a forward-difference
//! estimate, element by element, and reports every entry whose error
//! exceeds a tolerance. Mismatches are never fatal; the caller gets a
//! structured discrepancy list and a summary warning is logged when the
//! worst error is large relative to the candidate's magnitude.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        finite_diff::forward_diff_jacobian,
        types::{Jacobian, Point},
    },
};
use ndarray::Array1;

/// Denominator guard for the relative-error metric.
const REL_EPS: f64 = 1e-10;

/// Worst-error-to-magnitude ratio above which a summary warning is logged.
const WARN_RATIO: f64 = 0.01;

/// How element-wise Jacobian errors are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMetric {
    /// `|fd - candidate| / (|fd| + 1e-10)`.
    Relative,
    /// `|fd - candidate|`.
    Absolute,
}

/// Outcome of a Jacobian check.
#[derive(Debug, Clone)]
pub struct JacobianCheck {
    /// Sum of the element-wise errors over the whole matrix.
    pub total_error: f64,
    /// `(row, col, error)` for every entry exceeding tolerance, sorted by
    /// descending error.
    pub discrepancies: Vec<(usize, usize, f64)>,
    /// The forward-difference Jacobian, for inspection.
    pub fd_jacobian: Jacobian,
}

/// Check `jac_to_check` against a forward-difference Jacobian of `f` at
/// `x0`, using probe step `eps` and per-entry tolerance `tol`.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] when the candidate's shape disagrees
///   with the finite-difference estimate.
/// - Propagates errors from `f` itself.
pub fn check_jacobian<F>(
    f: &F, x0: &Point, jac_to_check: &Jacobian, eps: f64, tol: f64, metric: ErrorMetric,
) -> OptResult<JacobianCheck>
where
    F: Fn(&Point) -> OptResult<Array1<f64>>,
{
    let fd_jacobian = forward_diff_jacobian(f, x0, eps)?;
    if jac_to_check.dim() != fd_jacobian.dim() {
        return Err(OptError::DimensionMismatch {
            expected: fd_jacobian.len(),
            found: jac_to_check.len(),
        });
    }
    let (rows, cols) = fd_jacobian.dim();

    let mut total_error = 0.0;
    let mut discrepancies = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let diff = (fd_jacobian[(i, j)] - jac_to_check[(i, j)]).abs();
            let err = match metric {
                ErrorMetric::Relative => diff / (fd_jacobian[(i, j)].abs() + REL_EPS),
                ErrorMetric::Absolute => diff,
            };
            if err > tol {
                discrepancies.push((i, j, err));
            }
            total_error += err;
        }
    }
    discrepancies.sort_by(|a, b| b.2.total_cmp(&a.2));

    if let Some(&(_, _, worst)) = discrepancies.first() {
        let max_abs = jac_to_check.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
        let ratio = worst / max_abs;
        if ratio > WARN_RATIO {
            log::warn!(
                "jacobian check: max err/jac_max = {ratio} (jac_max = {max_abs})"
            );
        }
    }

    Ok(JacobianCheck { total_error, discrepancies, fd_jacobian })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::finite_diff::JAC_FD_EPS;
    use ndarray::array;

    fn linear(x: &Point) -> OptResult<Array1<f64>> {
        Ok(array![2.0 * x[0] + x[1], -x[0] + 3.0 * x[1]])
    }

    #[test]
    // Purpose
    // -------
    // A correct analytic Jacobian passes the check with no discrepancies.
    //
    // Given
    // -----
    // - The exact Jacobian of a linear map, relative metric, tol 1e-4.
    //
    // Expect
    // ------
    // - Empty discrepancy list.
    fn correct_jacobian_passes() {
        let jac = array![[2.0, 1.0], [-1.0, 3.0]];
        let check = check_jacobian(
            &linear,
            &array![0.5, 0.5],
            &jac,
            JAC_FD_EPS,
            1e-4,
            ErrorMetric::Relative,
        )
        .unwrap();
        assert!(check.discrepancies.is_empty(), "got {:?}", check.discrepancies);
    }

    #[test]
    // Purpose
    // -------
    // An entry that is off by 1.0 must be reported with its coordinates,
    // first in the sorted list.
    //
    // Given
    // -----
    // - The exact Jacobian with entry (1, 0) perturbed by +1.
    //
    // Expect
    // ------
    // - Discrepancy list headed by (1, 0).
    fn wrong_entry_is_located() {
        let jac = array![[2.0, 1.0], [0.0, 3.0]];
        let check = check_jacobian(
            &linear,
            &array![0.5, 0.5],
            &jac,
            JAC_FD_EPS,
            1e-4,
            ErrorMetric::Absolute,
        )
        .unwrap();
        assert!(!check.discrepancies.is_empty());
        let (row, col, err) = check.discrepancies[0];
        assert_eq!((row, col), (1, 0));
        assert!((err - 1.0).abs() < 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Shape disagreement is a caller error.
    //
    // Given
    // -----
    // - A 1x2 candidate for a 2x2 finite-difference Jacobian.
    //
    // Expect
    // ------
    // - DimensionMismatch.
    fn shape_mismatch_is_rejected() {
        let jac = array![[2.0, 1.0]];
        let err = check_jacobian(
            &linear,
            &array![0.5, 0.5],
            &jac,
            JAC_FD_EPS,
            1e-4,
            ErrorMetric::Relative,
        )
        .unwrap_err();
        assert!(matches!(err, OptError::DimensionMismatch { .. }));
    }
}
