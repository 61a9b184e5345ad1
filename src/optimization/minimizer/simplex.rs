//! minimizer::simplex — custom simplex minimizer and the repeated-simplex
//! ("supersimplex") driver.
//!
//! Purpose
//! -------
//! [`fmin_simplex`] is an independent simplex implementation kept as a
//! validation cross-check for the library Nelder–Mead; it runs slower and
//! exists to confirm results, not to replace it. [`fmin_supersimplex`] wraps
//! repeated library Nelder–Mead solves with an adaptive inner iteration
//! budget for robust (if slow) minimization.
//!
//! Key behaviors
//! -------------
//! - Custom simplex: reflection through the centroid direction by factor 2,
//!   expansion by one extra step, contraction by 0.5, and a shrink of every
//!   vertex halfway toward the best as the last resort. Converges when the
//!   RMS magnitude of the reflection direction drops below tolerance.
//! - Supersimplex: the inner budget starts at a minimum, multiplies by 10
//!   whenever outer improvement stalls below the outer tolerance, and
//!   divides by 10 after 10 consecutive outer iterations at the same budget.
//!
//! Invariants
//! ----------
//! - Vertex objective values are cached; a vertex is only re-evaluated when
//!   it moves.
//! - Infeasible evaluations are carried as `+∞` so the worst-vertex
//!   selection pushes the simplex back into the domain.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        run::run_simplex_solver,
        traits::{Callback, CountedObjective, Eval, MinimizeOptions, Objective, SolverOutcome},
        types::{FnEvalMap, Point},
    },
};
use ndarray::Array1;

/// Supersimplex outer-loop improvement tolerance.
const OUTER_TOL: f64 = 1.0;

/// Supersimplex starting (and minimum) inner iteration budget.
const MIN_INNER_MAXITER: usize = 100;

/// Supersimplex outer iteration cap.
const MAX_OUTER_ITER: usize = 100;

/// Infeasible evaluations order above every feasible value.
fn value_or_inf(e: Eval) -> f64 {
    e.value().unwrap_or(f64::INFINITY)
}

/// Minimize `f` with the custom simplex.
///
/// `slide` sets the offset of the initial vertices: vertex `i` is `x0` with
/// coordinate `i - 1` shifted by `slide`.
///
/// `opts.max_iter` caps outer iterations. `opts.max_fev` additionally caps
/// objective evaluations when set; evaluations are unlimited otherwise (a
/// simplex iteration spends between one and `n + 1` of them, so any
/// evaluation cap below `max_iter + n + 1` binds before the iteration cap).
///
/// # Errors
/// - [`OptError::InfeasibleStart`] when `f` is undefined at `x0`.
/// - Outcome-validation errors for non-finite results.
pub fn fmin_simplex<F: Objective>(
    f: &F, x0: Point, slide: f64, opts: &MinimizeOptions,
) -> OptResult<SolverOutcome> {
    let counted = CountedObjective::new(f);
    let n = x0.len();
    let max_fev = opts.max_fev.map(|cap| cap as u64);

    let mut vertices: Vec<Point> = Vec::with_capacity(n + 1);
    vertices.push(x0.clone());
    for i in 1..=n {
        let mut v = x0.clone();
        v[i - 1] += slide;
        vertices.push(v);
    }
    let mut values: Vec<f64> = Vec::with_capacity(n + 1);
    for v in &vertices {
        values.push(value_or_inf(counted.eval(v)));
    }
    if !values[0].is_finite() {
        return Err(OptError::InfeasibleStart);
    }

    let mut counter = 0usize;
    loop {
        let low = argmin_index(&values);
        let high = argmax_index(&values);
        counter += 1;

        // Reflection direction: (sum of vertices - (n+1)·worst) / n.
        let mut d: Point = Array1::zeros(n);
        for v in &vertices {
            d += v;
        }
        d -= &(&vertices[high] * (n as f64 + 1.0));
        d /= n as f64;

        let rms = (d.dot(&d) / n as f64).sqrt();
        let budget_spent = max_fev.map_or(false, |cap| counted.counts()["cost_count"] >= cap);
        if rms < opts.tol || counter == opts.max_iter || budget_spent || opts.cancelled() {
            let success = rms < opts.tol;
            let message = if success {
                None
            } else if opts.cancelled() {
                Some("Cancelled".to_string())
            } else if budget_spent {
                Some("Maximum function evaluations exceeded".to_string())
            } else {
                Some("Maximum iterations exceeded".to_string())
            };
            return SolverOutcome::new(
                Some(vertices[low].clone()),
                values[low],
                success,
                message,
                counter,
                counted.counts(),
            );
        }

        let mut new_x = &vertices[high] + &(2.0 * &d);
        let mut new_f = value_or_inf(counted.eval(&new_x));

        if new_f <= values[low] {
            // Reflected point beats the best: accept and try one expansion.
            vertices[high] = new_x;
            values[high] = new_f;
            new_x = &vertices[high] + &d;
            new_f = value_or_inf(counted.eval(&new_x));
            if new_f <= values[low] {
                vertices[high] = new_x;
                values[high] = new_f;
            }
        } else if new_f < values[high] {
            // Plain reflection must strictly improve on the worst vertex; an
            // equal-valued reflection would mirror the simplex back and
            // forth forever on symmetric objectives, so ties contract.
            vertices[high] = new_x;
            values[high] = new_f;
        } else {
            // Contract toward the centroid.
            new_x = &vertices[high] + &(0.5 * &d);
            new_f = value_or_inf(counted.eval(&new_x));
            if new_f <= values[high] {
                vertices[high] = new_x;
                values[high] = new_f;
            } else {
                // Shrink every vertex halfway toward the best.
                let best = vertices[low].clone();
                for i in 0..vertices.len() {
                    if i != low {
                        vertices[i] = &best + &(0.5 * (&vertices[i] - &best));
                        values[i] = value_or_inf(counted.eval(&vertices[i]));
                    }
                }
            }
        }
    }
}

/// Minimize `f` by repeated Nelder–Mead solves with an adaptive inner
/// iteration budget.
///
/// Terminates successfully once the outer improvement is within
/// [`OUTER_TOL`] and the inner budget has grown to `opts.max_iter`; fails
/// when [`MAX_OUTER_ITER`] outer iterations are spent first.
///
/// # Errors
/// - [`OptError::InfeasibleStart`] when `f` is undefined at `x0`.
/// - Propagates inner-solver errors (infeasible probes reach the caller
///   because the library simplex assumes a total objective).
pub fn fmin_supersimplex<F: Objective>(
    f: &F, x0: Point, opts: &MinimizeOptions, mut callback: Option<Callback<'_>>,
) -> OptResult<SolverOutcome> {
    let mut f_init = match f.eval(&x0) {
        Eval::Feasible(v) => v,
        Eval::Infeasible => return Err(OptError::InfeasibleStart),
    };
    let max_inner_maxiter = opts.max_iter;
    // Primed so the first outer iteration always runs.
    let mut f_final = f_init - 10.0 * OUTER_TOL;
    let mut x_start = x0;

    let mut i = 1usize;
    let mut cnt_at_same_maxiter = 1usize;
    let mut inner_maxiter = MIN_INNER_MAXITER;
    let mut total_evals = FnEvalMap::new();
    let mut cancelled = false;

    while (f_init - f_final > OUTER_TOL || inner_maxiter < max_inner_maxiter) && i < MAX_OUTER_ITER
    {
        if opts.cancelled() {
            cancelled = true;
            break;
        }
        if f_init - f_final <= OUTER_TOL && inner_maxiter < max_inner_maxiter {
            inner_maxiter *= 10;
            cnt_at_same_maxiter = 1;
        }
        if cnt_at_same_maxiter > 10 && inner_maxiter > MIN_INNER_MAXITER {
            inner_maxiter /= 10;
            cnt_at_same_maxiter = 1;
        }
        f_init = f_final;

        log::info!("supersimplex: outer iteration {i} (inner budget {inner_maxiter})");
        i += 1;
        cnt_at_same_maxiter += 1;

        let inner_opts =
            MinimizeOptions { tol: opts.tol, max_iter: inner_maxiter, ..Default::default() };
        let problem = ArgMinAdapter::new(f, None);
        let solver = build_nelder_mead(&x_start, &inner_opts)?;
        let inner = run_simplex_solver(&inner_opts, problem, solver)?;

        if !inner.success {
            log::warn!(
                "supersimplex inner loop failed (tol = {}, budget = {inner_maxiter}): {}",
                opts.tol,
                inner.message.as_deref().unwrap_or("no message")
            );
        }

        f_final = inner.fun;
        x_start = inner.x;
        for (key, count) in inner.fn_evals {
            *total_evals.entry(key).or_insert(0) += count;
        }
        log::info!("supersimplex: outer iteration {i} gives min = {f_final}");
        if let Some(cb) = callback.as_mut() {
            cb(&x_start, Some(f_final), None);
        }
    }

    let success = i < MAX_OUTER_ITER && !cancelled;
    let message = if cancelled {
        Some("Cancelled".to_string())
    } else if !success {
        Some("Maximum iterations exceeded".to_string())
    } else {
        None
    };
    // f_final is still primed if the loop never ran; fall back to f(x0).
    let fun = if i == 1 { f_init } else { f_final };
    SolverOutcome::new(Some(x_start), fun, success, message, i, total_evals)
}

fn argmin_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}

fn argmax_index(values: &[f64]) -> usize {
    let mut worst = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[worst] {
            worst = i;
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn opts(tol: f64, max_iter: usize) -> MinimizeOptions {
        MinimizeOptions { tol, max_iter, ..Default::default() }
    }

    #[test]
    // Purpose
    // -------
    // The custom simplex should solve a shifted quadratic to high accuracy
    // within a modest iteration budget. The symmetric quadratic produces
    // exact-tie reflections along the way; a tie must never be accepted as
    // progress, or the simplex mirrors in place until the budget runs out.
    //
    // Given
    // -----
    // - f(x, y) = (x - 3)^2 + (y + 1)^2, x0 = (0, 0), tol = 1e-10,
    //   max_iter = 1000.
    //
    // Expect
    // ------
    // - x ≈ (3, -1) within 1e-4, fun ≈ 0, success = true.
    fn custom_simplex_solves_shifted_quadratic() {
        let f = |x: &Point| Eval::Feasible((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
        let outcome = fmin_simplex(&f, array![0.0, 0.0], 1.0, &opts(1e-10, 1000)).unwrap();
        assert!(outcome.success, "got {:?}", outcome.message);
        assert!((outcome.x[0] - 3.0).abs() < 1e-4);
        assert!((outcome.x[1] + 1.0).abs() < 1e-4);
        assert!(outcome.fun < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Running out of iterations must be reported as failure with a
    // diagnostic, not an error.
    //
    // Given
    // -----
    // - The same quadratic with max_iter = 2.
    //
    // Expect
    // ------
    // - success = false and a message.
    fn custom_simplex_reports_budget_exhaustion() {
        let f = |x: &Point| Eval::Feasible((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
        let outcome = fmin_simplex(&f, array![0.0, 0.0], 1.0, &opts(1e-12, 2)).unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.is_some());
    }

    #[test]
    // Purpose
    // -------
    // With no evaluation cap set, only the iteration budget terminates a
    // non-converging run, even though the simplex always spends more
    // evaluations than iterations (n + 1 up front, then one to n + 1 per
    // iteration).
    //
    // Given
    // -----
    // - The shifted quadratic at tol = 1e-12 with max_iter = 5 and
    //   max_fev unset.
    //
    // Expect
    // ------
    // - The "Maximum iterations exceeded" diagnostic, with more recorded
    //   evaluations than iterations.
    fn unset_evaluation_cap_leaves_iterations_as_the_only_budget() {
        let f = |x: &Point| Eval::Feasible((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
        let outcome = fmin_simplex(&f, array![0.0, 0.0], 1.0, &opts(1e-12, 5)).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Maximum iterations exceeded"));
        assert!(outcome.fn_evals["cost_count"] > 5);
    }

    #[test]
    // Purpose
    // -------
    // An explicit evaluation cap is enforced and reported as such.
    //
    // Given
    // -----
    // - The shifted quadratic with max_fev = 4, well below what the
    //   iteration budget would allow.
    //
    // Expect
    // ------
    // - success = false with the "Maximum function evaluations exceeded"
    //   diagnostic.
    fn explicit_evaluation_cap_is_enforced() {
        let f = |x: &Point| Eval::Feasible((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
        let o = MinimizeOptions { max_fev: Some(4), ..opts(1e-12, 1000) };
        let outcome = fmin_simplex(&f, array![0.0, 0.0], 1.0, &o).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Maximum function evaluations exceeded"));
    }

    #[test]
    // Purpose
    // -------
    // An infeasible vertex must not poison the simplex: reflections away
    // from the undefined half-plane still reach the minimum.
    //
    // Given
    // -----
    // - f(x) = (x - 0.5)^2 defined only for x >= -0.2, x0 = 0, slide = -1
    //   so the second vertex starts infeasible.
    //
    // Expect
    // ------
    // - Best vertex within 0.01 of 0.5.
    fn custom_simplex_tolerates_infeasible_probes() {
        let f = |x: &Point| {
            if x[0] >= -0.2 { Eval::Feasible((x[0] - 0.5).powi(2)) } else { Eval::Infeasible }
        };
        let outcome = fmin_simplex(&f, array![0.0], -1.0, &opts(1e-10, 10_000)).unwrap();
        assert!((outcome.x[0] - 0.5).abs() < 1e-2, "got x = {}", outcome.x[0]);
    }

    #[test]
    // Purpose
    // -------
    // An infeasible starting point is a caller error for both drivers.
    //
    // Given
    // -----
    // - f undefined at x0.
    //
    // Expect
    // ------
    // - InfeasibleStart from fmin_simplex and fmin_supersimplex.
    fn infeasible_start_is_rejected() {
        let f = |x: &Point| {
            if x[0] >= 0.0 { Eval::Feasible(x[0]) } else { Eval::Infeasible }
        };
        let err = fmin_simplex(&f, array![-1.0], 1.0, &opts(1e-8, 100)).unwrap_err();
        assert!(matches!(err, OptError::InfeasibleStart));
        let err = fmin_supersimplex(&f, array![-1.0], &opts(1e-8, 100), None).unwrap_err();
        assert!(matches!(err, OptError::InfeasibleStart));
    }

    #[test]
    // Purpose
    // -------
    // Supersimplex should at least match a single Nelder-Mead run on a
    // well-behaved quadratic and report success.
    //
    // Given
    // -----
    // - f(x, y) = x^2 + y^2 from (2, -2), tol = 1e-10, max_iter = 10000.
    //
    // Expect
    // ------
    // - x ≈ (0, 0) within 1e-3, success = true, at least one outer
    //   iteration recorded.
    fn supersimplex_solves_quadratic() {
        let f = |x: &Point| Eval::Feasible(x.dot(x));
        let outcome =
            fmin_supersimplex(&f, array![2.0, -2.0], &opts(1e-10, 10_000), None).unwrap();
        assert!(outcome.success, "got {:?}", outcome.message);
        assert!(outcome.x[0].abs() < 1e-3);
        assert!(outcome.x[1].abs() < 1e-3);
        assert!(outcome.iterations >= 1);
    }
}
