//! Validation helpers for the minimization gateway.
//!
//! Centralizes the consistency checks used across the solver interface:
//!
//! - **Option checks**: [`verify_tol`], [`verify_max_iter`] ensure the
//!   gateway configuration is finite, positive, and non-degenerate.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Outcome validation**: [`validate_best_point`] and [`validate_value`]
//!   guarantee a [`SolverOutcome`](crate::optimization::minimizer::SolverOutcome)
//!   never carries NaN or infinite results out of a solve.
//!
//! All helpers report through domain-specific [`OptError`] variants so
//! higher-level code stays uniform.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::types::{Grad, Point},
};

/// Validate a convergence tolerance: must be finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTol`] otherwise.
pub fn verify_tol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate an iteration or evaluation budget: must be at least 1.
///
/// # Errors
/// Returns [`OptError::InvalidMaxIter`] when zero.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Iteration budget must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if the length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap a solver's best point.
///
/// # Errors
/// - [`OptError::MissingBestPoint`] if no point was produced.
/// - [`OptError::InvalidBestPoint`] if any coordinate is non-finite.
pub fn validate_best_point(best: Option<Point>) -> OptResult<Point> {
    match best {
        Some(x) => {
            for (index, &value) in x.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidBestPoint {
                        index,
                        value,
                        reason: "Best point coordinates must be finite.",
                    });
                }
            }
            Ok(x)
        }
        None => Err(OptError::MissingBestPoint),
    }
}

/// Validate a scalar objective value for finiteness.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] when NaN or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn verify_tol_accepts_small_positive_values() {
        assert!(verify_tol(1e-12).is_ok());
    }

    #[test]
    fn verify_tol_rejects_nan_and_zero() {
        assert!(matches!(verify_tol(f64::NAN), Err(OptError::InvalidTol { .. })));
        assert!(matches!(verify_tol(0.0), Err(OptError::InvalidTol { .. })));
    }

    #[test]
    fn validate_grad_flags_dimension_and_nan() {
        let g = array![1.0, 2.0];
        assert!(matches!(validate_grad(&g, 3), Err(OptError::GradientDimMismatch { .. })));
        let g = array![1.0, f64::INFINITY];
        assert!(matches!(validate_grad(&g, 2), Err(OptError::InvalidGradient { index: 1, .. })));
    }

    #[test]
    fn validate_best_point_requires_presence_and_finiteness() {
        assert!(matches!(validate_best_point(None), Err(OptError::MissingBestPoint)));
        let x = validate_best_point(Some(array![0.5, -0.5])).unwrap();
        assert_eq!(x, array![0.5, -0.5]);
    }
}
