//! minimizer::hopping — basin hopping and the brute-force grid method.
//!
//! Basin hopping alternates random perturbations with L-BFGS local solves
//! and keeps the Metropolis-accepted chain's best point. The brute method
//! scans a coarse grid over `[0, 1]^n` and polishes the best grid point with
//! Nelder–Mead; it is only sensible for small dimension.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        adapter::ArgMinAdapter,
        builders::{build_lbfgs_more_thuente, build_nelder_mead},
        run::{run_gradient_solver, run_simplex_solver},
        traits::{Callback, Eval, MinimizeOptions, Objective, SolverOutcome},
        types::{FnEvalMap, Grad, Point},
    },
};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Metropolis temperature for the accept test.
const TEMPERATURE: f64 = 2.0;

/// Half-width of the uniform perturbation applied between hops.
const STEPSIZE: f64 = 1.0;

/// Grid points per dimension for the brute scan.
const BRUTE_NS: usize = 4;

/// Largest dimension the brute scan accepts (`BRUTE_NS^n` evaluations).
const BRUTE_MAX_DIM: usize = 8;

/// Iteration budget for each basin-hopping local solve.
const LOCAL_MAX_ITER: usize = 1000;

/// Minimize `f` by basin hopping: L-BFGS local solves from randomly
/// perturbed restarts, chained through a Metropolis accept test at
/// temperature [`TEMPERATURE`].
///
/// A local solve that fails outright (the objective went undefined under
/// the unconstrained L-BFGS) counts as a rejected step rather than aborting
/// the outer loop. The callback, when given, receives each candidate with
/// its value and accept flag. `opts.stop_val` ends the loop early once a
/// candidate value reaches it. `success` is always `true` at the iteration
/// cap; the cap is the intended termination.
///
/// # Errors
/// - [`OptError::InfeasibleStart`] when `f` is undefined at `x0`.
/// - Outcome-validation errors for non-finite results.
pub fn fmin_basin_hopping<F: Objective>(
    f: &F, x0: Point, opts: &MinimizeOptions, jac: Option<&dyn Fn(&Point) -> Grad>,
    mut callback: Option<Callback<'_>>,
) -> OptResult<SolverOutcome> {
    if !f.eval(&x0).is_feasible() {
        return Err(OptError::InfeasibleStart);
    }
    let dim = x0.len();
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut total_evals = FnEvalMap::new();

    // Seed the chain with a local solve from x0 itself.
    let (mut x_cur, mut f_cur) = match local_solve(f, x0.clone(), jac, opts, &mut total_evals) {
        Some((x, v)) => (x, v),
        None => {
            let v = match f.eval(&x0) {
                Eval::Feasible(v) => v,
                Eval::Infeasible => return Err(OptError::InfeasibleStart),
            };
            (x0, v)
        }
    };
    let mut x_best = x_cur.clone();
    let mut f_best = f_cur;

    let mut iterations = 0usize;
    let mut cancelled = false;
    for _ in 0..opts.max_iter {
        if opts.cancelled() {
            cancelled = true;
            break;
        }
        iterations += 1;

        let trial: Point = Array1::from_shape_fn(dim, |i| {
            x_cur[i] + STEPSIZE * (2.0 * rng.gen::<f64>() - 1.0)
        });
        let accepted;
        let f_trial;
        match local_solve(f, trial, jac, opts, &mut total_evals) {
            Some((x, v)) => {
                f_trial = v;
                accepted = v < f_cur || rng.gen::<f64>() < (-(v - f_cur) / TEMPERATURE).exp();
                if accepted {
                    x_cur = x.clone();
                    f_cur = v;
                }
                if v < f_best {
                    f_best = v;
                    x_best = x;
                }
            }
            None => {
                // Local solve wandered out of the domain: rejected step.
                f_trial = f_cur;
                accepted = false;
            }
        }
        if let Some(cb) = callback.as_mut() {
            cb(&x_cur, Some(f_trial), Some(accepted));
        }
        if let Some(stop_val) = opts.stop_val {
            if f_trial <= stop_val {
                break;
            }
        }
    }

    let message = cancelled.then(|| "Cancelled".to_string());
    SolverOutcome::new(Some(x_best), f_best, !cancelled, message, iterations, total_evals)
}

/// One L-BFGS local solve; `None` when the solve failed to produce a point
/// (typically an infeasible evaluation under the unconstrained solver).
fn local_solve<F: Objective>(
    f: &F, x0: Point, jac: Option<&dyn Fn(&Point) -> Grad>, opts: &MinimizeOptions,
    total_evals: &mut FnEvalMap,
) -> Option<(Point, f64)> {
    let local_opts = MinimizeOptions {
        tol: opts.tol,
        max_iter: LOCAL_MAX_ITER.min(opts.max_iter),
        ..Default::default()
    };
    let problem = ArgMinAdapter { f, jac };
    let solver = build_lbfgs_more_thuente(&local_opts).ok()?;
    match run_gradient_solver(x0, &local_opts, problem, solver) {
        Ok(outcome) => {
            for (key, count) in outcome.fn_evals {
                *total_evals.entry(key).or_insert(0) += count;
            }
            Some((outcome.x, outcome.fun))
        }
        Err(e) => {
            log::debug!("basin hopping local solve failed: {e}");
            None
        }
    }
}

/// Minimize `f` by scanning a grid of [`BRUTE_NS`] points per dimension
/// over `[0, 1]^n` and polishing the best grid point with Nelder–Mead.
///
/// # Errors
/// - [`OptError::UnsupportedDimension`] when `n > BRUTE_MAX_DIM`.
/// - Propagates polish-solver errors.
pub fn fmin_brute<F: Objective>(
    f: &F, dim: usize, opts: &MinimizeOptions,
) -> OptResult<SolverOutcome> {
    if dim > BRUTE_MAX_DIM {
        return Err(OptError::UnsupportedDimension {
            method: "brute",
            dim,
            reason: "Grid evaluation count grows as 4^n.",
        });
    }
    let total = BRUTE_NS.pow(dim as u32);
    let mut best_x: Option<Point> = None;
    let mut best_f = f64::INFINITY;
    for flat in 0..total {
        // Decode the flat index into per-dimension grid coordinates.
        let mut rem = flat;
        let x = Array1::from_shape_fn(dim, |_| {
            let idx = rem % BRUTE_NS;
            rem /= BRUTE_NS;
            idx as f64 / (BRUTE_NS - 1) as f64
        });
        if let Eval::Feasible(v) = f.eval(&x) {
            if v < best_f {
                best_f = v;
                best_x = Some(x);
            }
        }
    }
    let xmin = best_x.ok_or(OptError::InfeasibleStart)?;
    log::debug!("brute grid minimum {best_f} at {xmin}");

    let problem = ArgMinAdapter::new(f, None);
    let solver = build_nelder_mead(&xmin, opts)?;
    let mut outcome = run_simplex_solver(opts, problem, solver)?;
    let grid_evals = total as u64;
    *outcome.fn_evals.entry("cost_count".to_string()).or_insert(0) += grid_evals;
    Ok(outcome)
}
