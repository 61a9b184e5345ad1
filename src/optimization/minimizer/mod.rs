//! minimizer — pluggable minimization gateway with boundary-aware custom
//! solvers.
//!
//! Purpose
//! -------
//! Provide one entry point, [`minimize`], routing an objective function to
//! any of the crate's minimization methods: the custom boundary-aware
//! solvers (simplex, supersimplex, conjugate-gradient maximizer), the
//! stochastic global methods (basin hopping, particle swarm, evolutionary,
//! brute grid), and the standard Argmin-backed algorithms (Nelder–Mead,
//! L-BFGS, steepest descent, nonlinear CG).
//!
//! Key behaviors
//! -------------
//! - Callers implement [`Objective`]; an evaluation is either
//!   [`Eval::Feasible`] with a value or [`Eval::Infeasible`], and every
//!   solver knows how to react to the infeasible case (boundary clamping,
//!   sentinel fitness, rejected step, or a surfaced error, per method).
//! - [`Method`] selects the strategy; [`MinimizeOptions`] carries the shared
//!   tolerance, budgets, seeding, and cancellation configuration.
//! - Every method normalizes into a [`SolverOutcome`] with the best point,
//!   its value in minimization convention, a success flag, and diagnostics.
//! - [`check_jacobian`] validates analytic Jacobians against finite
//!   differences without participating in any solve.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are pure: side-effect free and repeatable for the same
//!   input. They are the dominant cost of a solve, so vertex, particle, and
//!   individual values are cached rather than recomputed.
//! - The gateway always *minimizes*; the custom CG method maximizes the
//!   negated objective internally and negates the reported optimum back.
//! - An exhausted iteration budget is reported as `success = false` with a
//!   message, never as an error; only structurally invalid input errors.
//!
//! Conventions
//! -----------
//! - Parameters are [`types::Point`] (`Array1<f64>`); errors bubble up as
//!   [`OptResult`](crate::optimization::errors::OptResult) and never as
//!   panics in non-test code.
//! - Warnings from local numerical quirks (un-bracketable line searches,
//!   boxed-in terminations, Jacobian mismatches) go through `log` and do
//!   not interrupt the solve.
//!
//! Downstream usage
//! ----------------
//! - The statistical layer implements [`Objective`] over its gate-set
//!   probability calculations, then calls [`minimize`] with a method chosen
//!   per problem regime.
//! - [`ProgressPrinter`] builds the standard progress callback for long
//!   solves.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover the algorithm-level invariants
//!   (bracket behavior, boundary flags, acceptance rules, caching).
//! - Integration tests exercise the gateway end to end on known quadratic
//!   and boundary-constrained problems.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod callback;
pub mod cg;
pub mod evolve;
pub mod finite_diff;
pub mod hopping;
pub mod jacobian;
pub mod linesearch;
pub mod run;
pub mod simplex;
pub mod swarm;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::callback::ProgressPrinter;
pub use self::jacobian::{ErrorMetric, JacobianCheck, check_jacobian};
pub use self::traits::{
    Callback, Eval, LineSearcher, Method, MinimizeOptions, Objective, SolverOutcome,
};
pub use self::types::{BoundaryFlags, Cost, FnEvalMap, Grad, Jacobian, Point};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use gst_optimize::optimization::minimizer::prelude::*;
//
// to import the main gateway surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::jacobian::{ErrorMetric, check_jacobian};
    pub use super::traits::{Eval, Method, MinimizeOptions, Objective, SolverOutcome};
    pub use super::types::{Grad, Jacobian, Point};
}
