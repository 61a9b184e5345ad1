//! gst_optimize — boundary-aware numerical minimization for gate-set fitting.
//!
//! Purpose
//! -------
//! Serve as the crate root for the minimization subsystem used by gate-set
//! tomography fits: a single gateway routing objectives to gradient-based,
//! derivative-free, and population-based solvers, plus two custom solvers
//! built for objectives that are only partially defined over parameter
//! space.
//!
//! Key behaviors
//! -------------
//! - Expose [`optimization::minimizer::minimize`] as the single entry point;
//!   method selection, option handling, and outcome normalization all live
//!   behind it.
//! - Treat an objective returning `Infeasible` as a first-class event:
//!   custom solvers clamp, penalize, or reject locally instead of aborting
//!   the solve.
//! - Provide a finite-difference Jacobian checker and a progress-printing
//!   callback as standalone utilities alongside the solvers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are pure and expensive; every solver caches evaluations
//!   rather than recomputing them.
//! - Non-convergence is a reported outcome, never an error; only
//!   structurally invalid input errors.
//!
//! Conventions
//! -----------
//! - Parameter vectors are `ndarray::Array1<f64>` throughout.
//! - Errors are the crate's own [`optimization::errors::OptError`] values;
//!   Argmin backend errors are downcast and wrapped at the boundary.
//!
//! Downstream usage
//! ----------------
//! - Fitting layers implement [`optimization::minimizer::Objective`] over
//!   their likelihood or chi-squared computation and call `minimize` with a
//!   method chosen per problem regime.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the solver modules and
//!   by integration tests exercising the gateway end to end.

pub mod optimization;
