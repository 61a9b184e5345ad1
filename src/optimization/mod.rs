//! optimization — the numerical minimization subsystem behind every GST fit.
//!
//! Purpose
//! -------
//! Provide a single gateway over heterogeneous minimization strategies
//! (gradient-based, derivative-free, population-based, hybrid) together with
//! two custom solvers that tolerate *partially defined* objectives: functions
//! that report [`minimizer::Eval::Infeasible`] outside their domain instead of
//! raising.
//!
//! Key behaviors
//! -------------
//! - Route every request through [`minimizer::minimize`], which validates the
//!   starting point, normalizes options, and dispatches on
//!   [`minimizer::Method`].
//! - Run off-the-shelf algorithms (Nelder-Mead, L-BFGS, steepest descent,
//!   nonlinear CG) through Argmin via [`minimizer::adapter`], and the custom
//!   boundary-aware algorithms (CG maximizer, simplex, swarm, basin hopping,
//!   evolutionary search) through their own modules.
//! - Normalize every result into a [`minimizer::SolverOutcome`], with
//!   `success = false` plus a message for ordinary non-convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are pure: repeatable for the same input and side-effect free.
//! - An objective undefined at the starting point is a caller error
//!   ([`errors::OptError::InfeasibleStart`]); undefined probes anywhere else
//!   are handled locally by the solvers and never escape as errors.
//! - All solvers are single-threaded, call-and-return; the iteration cap (or
//!   the cooperative cancel token) is the only cancellation mechanism.
//!
//! Downstream usage
//! ----------------
//! - GST fitting layers call [`minimizer::minimize`] with an objective that
//!   wraps a gate-set probability computation; objective evaluation dominates
//!   cost, so every solver caches values rather than recomputing.

pub mod errors;
pub mod minimizer;
