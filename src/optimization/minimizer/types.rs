//! minimizer::types — shared numeric aliases and solver wiring.
//!
//! Centralizes the core numeric types and Argmin solver aliases used by the
//! minimization gateway so the rest of the code stays agnostic to `ndarray`
//! and Argmin generics.
use argmin::solver::{
    conjugategradient::{NonlinearConjugateGradient, beta::PolakRibiere},
    gradientdescent::SteepestDescent,
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use std::sync::{Arc, atomic::AtomicBool};

/// Candidate point `x` in parameter space.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the minimizer.
pub type Point = Array1<f64>;

/// Gradient vector `∇f(x)`, matching the shape of [`Point`].
pub type Grad = Array1<f64>;

/// Dense Jacobian matrix for vector-valued functions; `m × n` rows of
/// per-output gradients.
pub type Jacobian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Per-dimension boundary indicator: `+1` when a positive finite-difference
/// probe left the feasible region, `-1` for a negative probe, `0` otherwise.
pub type BoundaryFlags = Array1<i8>;

/// Function-evaluation counters, keyed by counter name (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Cooperative cancellation flag, checked once per outer iteration by the
/// custom solvers.
pub type CancelToken = Arc<AtomicBool>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Point, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Point, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Point, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Point, Grad, Cost>;

/// Steepest descent with a More–Thuente line search.
pub type SteepestDescentMt = SteepestDescent<MoreThuenteLS>;

/// Nonlinear conjugate gradient with the Polak–Ribiere beta update.
pub type PolakRibiereCg = NonlinearConjugateGradient<Point, MoreThuenteLS, PolakRibiere, Cost>;

/// Argmin's Nelder–Mead simplex over this crate's numeric types.
pub type ArgminSimplex = NelderMead<Point, Cost>;
