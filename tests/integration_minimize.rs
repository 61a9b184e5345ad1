//! Integration tests for the minimization gateway.
//!
//! Purpose
//! -------
//! - Validate the end-to-end minimization pipeline: from an objective and
//!   starting point, through method dispatch at the gateway, to a
//!   normalized `SolverOutcome` with sane diagnostics.
//! - Exercise realistic regimes (boundary-constrained objectives, seeded
//!   stochastic methods, early stopping, cancellation) rather than toy
//!   edge cases only.
//!
//! Coverage
//! --------
//! - `optimization::minimizer::api`:
//!   - Dispatch across every `Method` variant on a shared test problem.
//!   - String-driven method selection via `FromStr`.
//! - `optimization::minimizer::cg` and `linesearch`:
//!   - Boundary-aware descent on an objective undefined outside its domain.
//! - `optimization::minimizer::{hopping, swarm, evolve}`:
//!   - Seed-for-seed reproducibility and `stop_val` early termination.
//! - `optimization::minimizer::jacobian`:
//!   - Finite-difference detection of a wrong analytic Jacobian entry.
//! - Cooperative cancellation through the shared cancel token.
//!
//! Exclusions
//! ----------
//! - Fine-grained behavior of individual solver internals (bracket
//!   expansion, boundary flags, Metropolis acceptance) — these are covered
//!   by unit tests in the solver modules.
//! - Exhaustive accuracy sweeps over dimensions and tolerances — those
//!   belong in targeted property tests.
use gst_optimize::optimization::{
    errors::OptResult,
    minimizer::{
        ErrorMetric, Eval, LineSearcher, Method, MinimizeOptions, Point, check_jacobian, minimize,
        types::CancelToken,
    },
};
use ndarray::{Array1, array};
use std::{
    str::FromStr,
    sync::{Arc, atomic::AtomicBool},
};

/// Purpose
/// -------
/// Shared test objective: a shifted quadratic with its minimum at
/// (0.6, 0.3), placed inside the unit box so the grid- and box-oriented
/// methods (brute, swarm, evolve) can reach it natively.
///
/// Returns
/// -------
/// - `Eval::Feasible((x - 0.6)^2 + (y - 0.3)^2)` everywhere.
fn boxed_quadratic(x: &Point) -> Eval {
    Eval::Feasible((x[0] - 0.6).powi(2) + (x[1] - 0.3).powi(2))
}

/// Purpose
/// -------
/// Build seeded options with a given tolerance and iteration budget.
/// Seeding makes the stochastic methods deterministic so the accuracy
/// assertions below are reliable.
fn opts(tol: f64, max_iter: usize, seed: u64) -> MinimizeOptions {
    MinimizeOptions::new(tol, max_iter, None, None, Some(seed))
        .expect("MinimizeOptions::new should accept positive tolerance and budget")
}

#[test]
// Purpose
// -------
// Every method reachable from the gateway solves the same well-behaved
// quadratic, demonstrating that dispatch, options handling, and outcome
// normalization work across the whole method surface.
//
// Given
// -----
// - The boxed quadratic with minimum at (0.6, 0.3), started at the
//   origin.
// - Deterministic methods with a convergence tolerance run with tol 1e-6
//   and a generous budget; steepest descent and nonlinear CG run with a
//   short budget, since neither carries a gradient tolerance: they stop at
//   the budget or when the line search degenerates at the
//   finite-difference cancellation floor, keeping the best point either
//   way; stochastic methods run seeded with a moderate generation budget.
//
// Expect
// ------
// - Tolerance-bearing deterministic methods land within 1e-2 of the
//   minimum with fun < 1e-3; steepest descent and nonlinear CG reach
//   fun < 1e-2 without erroring.
// - Stochastic methods reach fun < 0.05.
// - Every outcome carries a finite best point and at least one recorded
//   objective evaluation.
fn gateway_supports_every_method_on_a_quadratic() {
    let deterministic = [
        Method::Simplex,
        Method::SuperSimplex,
        Method::CustomCg,
        Method::Brute,
        Method::NelderMead,
        Method::Lbfgs(LineSearcher::MoreThuente),
        Method::Lbfgs(LineSearcher::HagerZhang),
    ];
    for method in deterministic {
        let outcome = minimize(
            &boxed_quadratic,
            array![0.0, 0.0],
            method,
            &opts(1e-6, 10_000, 0),
            None,
            None,
        )
        .expect("gateway dispatch should succeed");
        assert!(
            (outcome.x[0] - 0.6).abs() < 1e-2 && (outcome.x[1] - 0.3).abs() < 1e-2,
            "method {method:?} got x = {:?}",
            outcome.x
        );
        assert!(outcome.fun < 1e-3, "method {method:?} got fun = {}", outcome.fun);
        assert!(outcome.x.iter().all(|v| v.is_finite()));
        assert!(outcome.fn_evals.values().sum::<u64>() > 0, "method {method:?}");
    }

    for method in [Method::SteepestDescent, Method::ConjugateGradient] {
        let outcome = minimize(
            &boxed_quadratic,
            array![0.0, 0.0],
            method,
            &opts(1e-6, 30, 0),
            None,
            None,
        )
        .expect("gateway dispatch should succeed");
        assert!(outcome.fun < 1e-2, "method {method:?} got fun = {}", outcome.fun);
        assert!(outcome.fn_evals.values().sum::<u64>() > 0, "method {method:?}");
    }

    let stochastic = [Method::BasinHopping, Method::Swarm, Method::Evolve];
    for method in stochastic {
        let outcome = minimize(
            &boxed_quadratic,
            array![0.0, 0.0],
            method,
            &opts(1e-8, 60, 17),
            None,
            None,
        )
        .expect("gateway dispatch should succeed");
        assert!(outcome.success, "method {method:?}");
        assert!(outcome.fun < 0.05, "method {method:?} got fun = {}", outcome.fun);
        assert!(outcome.fn_evals.values().sum::<u64>() > 0, "method {method:?}");
    }
}

#[test]
// Purpose
// -------
// The custom conjugate-gradient method respects a domain boundary: an
// objective that is undefined outside [0, 5] must be minimized without
// the solver ever relying on values beyond the boundary.
//
// Given
// -----
// - f(x) = (x - 2)^2 on [0, 5], infeasible elsewhere, started at 4.9
//   (close to the right boundary so the first descent steps probe it).
//
// Expect
// ------
// - success = true, x ≈ 2 within 1e-3, fun ≈ 0.
fn custom_cg_respects_domain_boundary() {
    let f = |x: &Point| {
        if (0.0..=5.0).contains(&x[0]) {
            Eval::Feasible((x[0] - 2.0).powi(2))
        } else {
            Eval::Infeasible
        }
    };
    let outcome =
        minimize(&f, array![4.9], Method::CustomCg, &opts(1e-10, 500, 0), None, None)
            .expect("boundary-constrained solve should succeed");
    assert!(outcome.success, "message: {:?}", outcome.message);
    assert!((outcome.x[0] - 2.0).abs() < 1e-3, "got x = {}", outcome.x[0]);
    assert!(outcome.fun < 1e-5, "got fun = {}", outcome.fun);
}

#[test]
// Purpose
// -------
// Callers holding the historical string identifiers can drive the
// gateway through `Method::from_str`.
//
// Given
// -----
// - The names "supersimplex", "lbfgs", and "basinhopping" parsed and
//   dispatched on the boxed quadratic.
//
// Expect
// ------
// - Each parsed method solves to fun < 0.05.
fn string_method_names_drive_the_gateway() {
    for name in ["supersimplex", "lbfgs", "basinhopping"] {
        let method = Method::from_str(name).expect("historical names should parse");
        let outcome = minimize(
            &boxed_quadratic,
            array![0.0, 0.0],
            method,
            &opts(1e-8, 50, 3),
            None,
            None,
        )
        .expect("parsed method should dispatch");
        assert!(outcome.fun < 0.05, "name {name} got fun = {}", outcome.fun);
    }
}

#[test]
// Purpose
// -------
// A fixed seed makes each stochastic method reproducible run-for-run,
// which the fitting layers rely on for regression comparisons.
//
// Given
// -----
// - Two identical seeded runs per stochastic method.
//
// Expect
// ------
// - Identical best points, values, and evaluation counts.
fn seeded_stochastic_methods_are_reproducible() {
    for method in [Method::BasinHopping, Method::Swarm, Method::Evolve] {
        let run = || {
            minimize(&boxed_quadratic, array![0.0, 0.0], method, &opts(1e-8, 20, 99), None, None)
                .expect("seeded run should succeed")
        };
        let a = run();
        let b = run();
        assert_eq!(a.x, b.x, "method {method:?}");
        assert_eq!(a.fun, b.fun, "method {method:?}");
        assert_eq!(a.fn_evals, b.fn_evals, "method {method:?}");
    }
}

#[test]
// Purpose
// -------
// Basin hopping honors `stop_val` and reports each hop to the progress
// callback with an accept flag.
//
// Given
// -----
// - The boxed quadratic, stop_val = 0.5 (reached by the very first local
//   solve), and a counting callback.
//
// Expect
// ------
// - The loop ends after at most 2 hops.
// - The callback fired once per hop, always with Some(accepted).
fn basin_hopping_stop_val_and_callback() {
    let mut calls = 0usize;
    let mut all_flagged = true;
    let outcome = {
        let mut cb = |_: &Point, _: Option<f64>, accepted: Option<bool>| {
            calls += 1;
            all_flagged &= accepted.is_some();
        };
        let options = MinimizeOptions { stop_val: Some(0.5), ..opts(1e-8, 100, 7) };
        minimize(
            &boxed_quadratic,
            array![0.0, 0.0],
            Method::BasinHopping,
            &options,
            None,
            Some(&mut cb),
        )
        .expect("basin hopping should succeed")
    };
    assert!(outcome.iterations <= 2, "got {} hops", outcome.iterations);
    assert!(outcome.fun < 0.5);
    assert_eq!(calls, outcome.iterations);
    assert!(all_flagged);
}

#[test]
// Purpose
// -------
// A raised cancel token stops a solve at the next outer iteration and is
// reported as an unsuccessful outcome, never as an error.
//
// Given
// -----
// - A cancel token raised before the solve starts, on the evolutionary
//   method.
//
// Expect
// ------
// - Ok outcome with success = false and the "Cancelled" message.
fn raised_cancel_token_stops_the_solve() {
    let token: CancelToken = Arc::new(AtomicBool::new(true));
    let options = MinimizeOptions { cancel: Some(token), ..opts(1e-8, 1000, 1) };
    let outcome =
        minimize(&boxed_quadratic, array![0.0, 0.0], Method::Evolve, &options, None, None)
            .expect("cancellation is an outcome, not an error");
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Cancelled"));
    assert_eq!(outcome.iterations, 0);
}

#[test]
// Purpose
// -------
// An exhausted iteration budget is ordinary non-convergence: the gateway
// returns Ok with success = false and a message instead of an error.
//
// Given
// -----
// - The custom simplex with max_iter = 2, far too few to converge at
//   tol 1e-12.
//
// Expect
// ------
// - Ok outcome, success = false, a non-empty diagnostic message, and a
//   finite best point.
fn exhausted_budget_reports_failure_not_error() {
    let outcome = minimize(
        &boxed_quadratic,
        array![0.0, 0.0],
        Method::Simplex,
        &opts(1e-12, 2, 0),
        None,
        None,
    )
    .expect("budget exhaustion should not be an error");
    assert!(!outcome.success);
    assert!(outcome.message.is_some());
    assert!(outcome.x.iter().all(|v| v.is_finite()));
}

#[test]
// Purpose
// -------
// The Jacobian checker catches a single wrong entry in an otherwise
// correct analytic Jacobian of a nonlinear vector map.
//
// Given
// -----
// - f(x) = [x0^2 * x1, x0 + x1^3] at (1.5, 0.5), with the analytic
//   Jacobian's (0, 1) entry perturbed.
//
// Expect
// ------
// - The correct Jacobian produces no discrepancies at tol 1e-3.
// - The perturbed Jacobian's worst discrepancy is located at (0, 1).
fn jacobian_checker_flags_a_wrong_entry() {
    let f = |x: &Point| -> OptResult<Array1<f64>> {
        Ok(array![x[0] * x[0] * x[1], x[0] + x[1].powi(3)])
    };
    let x0 = array![1.5, 0.5];
    // d/dx [x0^2 x1, x0 + x1^3] at (1.5, 0.5).
    let correct = array![[1.5, 2.25], [1.0, 0.75]];
    let check = check_jacobian(&f, &x0, &correct, 1e-7, 1e-3, ErrorMetric::Absolute)
        .expect("check should run on a well-defined map");
    assert!(check.discrepancies.is_empty(), "got {:?}", check.discrepancies);

    let wrong = array![[1.5, 3.25], [1.0, 0.75]];
    let check = check_jacobian(&f, &x0, &wrong, 1e-7, 1e-3, ErrorMetric::Absolute)
        .expect("check should run on a well-defined map");
    let (row, col, err) = check.discrepancies[0];
    assert_eq!((row, col), (0, 1));
    assert!((err - 1.0).abs() < 1e-2, "got err = {err}");
}
