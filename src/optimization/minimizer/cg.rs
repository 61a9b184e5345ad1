//! minimizer::cg — boundary-aware conjugate-gradient maximizer.
//!
//! Purpose
//! -------
//! Maximize an objective whose domain may be bounded, without a projection
//! operator: boundaries are detected by trial evaluations coming back
//! infeasible, and the search direction is masked so it never pushes further
//! into a flagged boundary.
//!
//! Key behaviors
//! -------------
//! - Polak–Ribiere direction updates, reset to steepest ascent every
//!   [`RESET`] iterations.
//! - Direction components that would cross a flagged boundary are zeroed;
//!   when every component is zeroed the solver is boxed in and returns the
//!   last feasible point.
//! - The direction is normalized so its largest-magnitude component is 1,
//!   keeping line-search step sizes comparable across iterations.
//! - Step sizes warm-start from the previous iteration's optimum and are
//!   floored at [`MIN_STEPSIZE`].
//!
//! Conventions
//! -----------
//! This solver *maximizes*; the reported `fun` is negated so the outcome is
//! interchangeable with the gateway's minimization methods.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        finite_diff::{FD_STEP, grad_and_boundary},
        linesearch::maximize_1d,
        traits::{CountedObjective, Eval, MinimizeOptions, Objective, SolverOutcome},
        types::{BoundaryFlags, Grad, Point},
    },
};
use ndarray::Array1;

/// Step-size floor; also the smallest step that keeps the outer loop alive
/// away from direction resets.
const MIN_STEPSIZE: f64 = 1e-8;

/// Seed step size for the first line search.
const INITIAL_STEPSIZE: f64 = 1e-6;

/// Direction-reset period, in iterations.
const RESET: usize = 5;

/// Maximize `f` from `x0`.
///
/// `grad_and_flags` supplies the ascent gradient and boundary flags at a
/// point; when `None`, a central finite-difference estimator with step
/// [`FD_STEP`] is used, deriving flags from probes that leave the domain.
///
/// # Errors
/// - [`OptError::InfeasibleStart`] when `f` is undefined at `x0`.
/// - Propagates line-search errors (fully undefined slices).
pub fn fmax_cg<F: Objective>(
    f: &F, x0: Point, opts: &MinimizeOptions,
    grad_and_flags: Option<&dyn Fn(&Point) -> (Grad, BoundaryFlags)>,
) -> OptResult<SolverOutcome> {
    let counted = CountedObjective::new(f);
    let dim = x0.len();

    let mut x = x0.clone();
    let mut last_x = x0.clone();
    let mut last_fx = match counted.eval(&x0) {
        Eval::Feasible(v) => v,
        Eval::Infeasible => return Err(OptError::InfeasibleStart),
    };
    let mut fx = last_fx;

    let mut stepsize = INITIAL_STEPSIZE;
    let mut step = 0usize;
    let mut cancelled = false;
    let mut last_grad: Grad = Array1::zeros(dim);
    let mut last_gradnorm = 0.0;
    let mut last_change: Grad = Array1::zeros(dim);

    while step < opts.max_iter && (stepsize > MIN_STEPSIZE || step % RESET != 1) {
        if opts.cancelled() {
            cancelled = true;
            break;
        }

        let (grad, flags) = match grad_and_flags {
            Some(g) => g(&x),
            None => grad_and_boundary(&counted, &x, FD_STEP),
        };
        let gradnorm = grad.dot(&grad);

        let mut change = if step % RESET == 0 {
            grad.clone()
        } else {
            // Polak-Ribiere
            let beta = (gradnorm - grad.dot(&last_grad)) / last_gradnorm;
            &grad + &(beta * &last_change)
        };

        // Mask components that would push further into a flagged boundary.
        for i in 0..dim {
            if f64::from(flags[i]) * change[i] > 0.0 {
                change[i] = 0.0;
                log::debug!("Preventing motion along dimension {i}");
            }
        }

        let max_abs = change.iter().fold(0.0f64, |m, &c| m.max(c.abs()));
        if max_abs == 0.0 {
            // Boxed in on every axis: the last feasible point is terminal.
            log::warn!("Completely boxed in");
            fx = last_fx;
            x = last_x.clone();
            break;
        }

        last_grad = grad;
        last_gradnorm = gradnorm;

        change *= 1.0 / max_abs;

        if stepsize < MIN_STEPSIZE {
            stepsize = MIN_STEPSIZE;
        }
        let g = |s: f64| counted.eval(&(&x + &(s * &change)));
        stepsize = maximize_1d(&g, 0.0, stepsize.abs(), Eval::Feasible(last_fx))?;

        x = &x + &(stepsize * &change);
        fx = match counted.eval(&x) {
            Eval::Feasible(v) => v,
            Eval::Infeasible => {
                // Line search returned a feasible step, so this is only
                // reachable for a non-deterministic objective.
                log::warn!("Objective became undefined at an accepted step");
                x = last_x.clone();
                fx = last_fx;
                break;
            }
        };
        let difference = fx - last_fx;
        log::debug!("Max iter {step}: f = {fx}, step = {stepsize}");

        if difference.abs() < opts.tol {
            break;
        }

        last_change = change;
        last_fx = fx;
        last_x = x.clone();
        step += 1;
    }

    log::debug!("Custom CG finished: {step} iterations, maximum f = {fx}");

    let success = step < opts.max_iter && !cancelled;
    let message = if cancelled {
        Some("Cancelled".to_string())
    } else if !success {
        Some("Maximum iterations exceeded".to_string())
    } else {
        None
    };
    // Negate the maximum so the outcome conforms to the minimization methods.
    SolverOutcome::new(Some(x), -fx, success, message, step, counted.counts())
}
