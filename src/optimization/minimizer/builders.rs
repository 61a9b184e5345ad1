//! minimizer::builders — construction helpers for Argmin-backed solvers.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind small builders so the gateway can
//! request a configured solver without touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS with either Hager–Zhang or More–Thuente line search
//!   and apply the gateway tolerance as both gradient and cost tolerance.
//! - Construct steepest descent and Polak–Ribiere nonlinear CG over a
//!   More–Thuente line search.
//! - Construct Nelder–Mead with an axis-aligned initial simplex around the
//!   starting point and the gateway tolerance as the sd tolerance.
//!
//! Conventions
//! -----------
//! - Builders never set the initial parameter vector or `max_iters`; those
//!   are runtime concerns applied by the runner.
//! - Errors surface as [`OptError`](crate::optimization::errors::OptError)
//!   via the crate's `From<argmin::core::Error>` conversion; Argmin error
//!   values never leak across module boundaries.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizeOptions,
        types::{
            ArgminSimplex, Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Point, PolakRibiereCg, SteepestDescentMt,
        },
    },
};
use argmin::solver::{
    conjugategradient::{NonlinearConjugateGradient, beta::PolakRibiere},
    gradientdescent::SteepestDescent,
    neldermead::NelderMead,
};

/// Offset used for the axis-aligned vertices of an initial simplex.
const SIMPLEX_OFFSET: f64 = 0.05;

/// Build L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Returns an error if Argmin rejects the tolerance settings.
pub fn build_lbfgs_hager_zhang(opts: &MinimizeOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, DEFAULT_LBFGS_MEM);
    configure_lbfgs(lbfgs, opts)
}

/// Build L-BFGS with a More–Thuente line search.
///
/// # Errors
/// Returns an error if Argmin rejects the tolerance settings.
pub fn build_lbfgs_more_thuente(opts: &MinimizeOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let lbfgs = LbfgsMoreThuente::new(more_thuente, DEFAULT_LBFGS_MEM);
    configure_lbfgs(lbfgs, opts)
}

/// Apply the gateway tolerance to an L-BFGS solver as both the gradient-norm
/// and cost-change tolerance. Generic over the line-search type so both
/// builders share the wiring.
pub fn configure_lbfgs<L>(
    solver: LBFGS<L, Point, Grad, Cost>, opts: &MinimizeOptions,
) -> OptResult<LBFGS<L, Point, Grad, Cost>> {
    let solver = solver.with_tolerance_grad(opts.tol)?.with_tolerance_cost(opts.tol)?;
    Ok(solver)
}

/// Build steepest descent over a More–Thuente line search.
pub fn build_steepest_descent() -> SteepestDescentMt {
    SteepestDescent::new(MoreThuenteLS::new())
}

/// Build nonlinear conjugate gradient with the Polak–Ribiere beta update
/// over a More–Thuente line search.
pub fn build_conjugate_gradient() -> PolakRibiereCg {
    NonlinearConjugateGradient::new(MoreThuenteLS::new(), PolakRibiere::new())
}

/// Build Argmin's Nelder–Mead around `x0`.
///
/// The initial simplex has `n + 1` vertices: `x0` itself plus one vertex per
/// axis offset by [`SIMPLEX_OFFSET`]. The gateway tolerance becomes the
/// sample-standard-deviation termination tolerance.
///
/// # Errors
/// Returns an error if Argmin rejects the sd tolerance.
pub fn build_nelder_mead(x0: &Point, opts: &MinimizeOptions) -> OptResult<ArgminSimplex> {
    let simplex = initial_simplex(x0);
    let solver = NelderMead::new(simplex).with_sd_tolerance(opts.tol)?;
    Ok(solver)
}

/// Axis-aligned initial simplex around `x0`.
pub fn initial_simplex(x0: &Point) -> Vec<Point> {
    let dim = x0.len();
    let mut vertices = Vec::with_capacity(dim + 1);
    vertices.push(x0.clone());
    for i in 0..dim {
        let mut vertex = x0.clone();
        vertex[i] += SIMPLEX_OFFSET;
        vertices.push(vertex);
    }
    vertices
}
