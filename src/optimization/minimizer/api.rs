//! minimizer::api — the minimization gateway.
//!
//! Purpose
//! -------
//! Single entry point routing an objective to any of the crate's
//! minimization methods behind one calling convention and one outcome type.
//!
//! Key behaviors
//! -------------
//! - Validates options and rejects a starting point where the objective is
//!   undefined before dispatching.
//! - The custom CG method maximizes the negated objective internally; an
//!   analytic Jacobian handed to it is negated and paired with all-zero
//!   boundary flags, since an exact derivative is valid everywhere it is
//!   supplied.
//! - Methods that support a progress callback invoke it once per outer
//!   iteration; the others ignore it.
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! let f = |x: &Point| Eval::Feasible(x.dot(x));
//! let outcome = minimize(&f, x0, Method::SuperSimplex, &opts, None, None)?;
//! ```
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        adapter::ArgMinAdapter,
        builders::{
            build_conjugate_gradient, build_lbfgs_hager_zhang, build_lbfgs_more_thuente,
            build_nelder_mead, build_steepest_descent,
        },
        cg::fmax_cg,
        evolve::fmin_evolutionary,
        hopping::{fmin_basin_hopping, fmin_brute},
        run::{run_gradient_solver, run_simplex_solver},
        simplex::{fmin_simplex, fmin_supersimplex},
        swarm::fmin_particle_swarm,
        traits::{
            Callback, Eval, LineSearcher, Method, MinimizeOptions, Objective, SolverOutcome,
        },
        types::{BoundaryFlags, Grad, Point},
    },
};

/// Default swarm population at the gateway.
const SWARM_POPSIZE: usize = 1000;

/// Default evolutionary population at the gateway.
const EVOLVE_POPSIZE: usize = 500;

/// Initial vertex offset for the custom simplex.
const SIMPLEX_SLIDE: f64 = 1.0;

/// Objective negation wrapper for the internally-maximizing CG method.
struct Negated<'a, F: Objective>(&'a F);

impl<'a, F: Objective> Objective for Negated<'a, F> {
    fn eval(&self, x: &Point) -> Eval {
        match self.0.eval(x) {
            Eval::Feasible(v) => Eval::Feasible(-v),
            Eval::Infeasible => Eval::Infeasible,
        }
    }
}

/// Minimize `f` from `x0` with the chosen method.
///
/// `jac` is the optional analytic Jacobian of `f`, used by the
/// gradient-based methods (and negated for the custom CG). `callback` is
/// invoked by the methods that track outer-iteration progress
/// (supersimplex, basin hopping, swarm, evolutionary).
///
/// # Errors
/// - [`OptError::InfeasibleStart`] when `f` is undefined at `x0`.
/// - Method-specific input errors (population sizes, unsupported
///   dimensions).
/// - Non-convergence is NOT an error: an exhausted budget comes back as
///   `success = false` with a message.
pub fn minimize<F: Objective>(
    f: &F, x0: Point, method: Method, opts: &MinimizeOptions,
    jac: Option<&dyn Fn(&Point) -> Grad>, callback: Option<Callback<'_>>,
) -> OptResult<SolverOutcome> {
    if !f.eval(&x0).is_feasible() {
        return Err(OptError::InfeasibleStart);
    }

    match method {
        Method::Simplex => fmin_simplex(f, x0, SIMPLEX_SLIDE, opts),
        Method::SuperSimplex => fmin_supersimplex(f, x0, opts, callback),
        Method::CustomCg => {
            let negated = Negated(f);
            match jac {
                Some(jac) => {
                    // Analytic derivative: negate and never flag a boundary.
                    let grad_and_flags = move |x: &Point| -> (Grad, BoundaryFlags) {
                        let g = -jac(x);
                        let flags = BoundaryFlags::zeros(g.len());
                        (g, flags)
                    };
                    fmax_cg(&negated, x0, opts, Some(&grad_and_flags))
                }
                None => fmax_cg(&negated, x0, opts, None),
            }
        }
        Method::Brute => fmin_brute(f, x0.len(), opts),
        Method::BasinHopping => fmin_basin_hopping(f, x0, opts, jac, callback),
        Method::Swarm => fmin_particle_swarm(f, &x0, opts, SWARM_POPSIZE, false, callback),
        Method::Evolve => fmin_evolutionary(f, &x0, opts, EVOLVE_POPSIZE, callback),
        Method::NelderMead => {
            let problem = ArgMinAdapter::new(f, None);
            let solver = build_nelder_mead(&x0, opts)?;
            run_simplex_solver(opts, problem, solver)
        }
        Method::Lbfgs(LineSearcher::HagerZhang) => {
            let problem = ArgMinAdapter { f, jac };
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_gradient_solver(x0, opts, problem, solver)
        }
        Method::Lbfgs(LineSearcher::MoreThuente) => {
            let problem = ArgMinAdapter { f, jac };
            let solver = build_lbfgs_more_thuente(opts)?;
            run_gradient_solver(x0, opts, problem, solver)
        }
        Method::SteepestDescent => {
            let problem = ArgMinAdapter { f, jac };
            run_gradient_solver(x0, opts, problem, build_steepest_descent())
        }
        Method::ConjugateGradient => {
            let problem = ArgMinAdapter { f, jac };
            run_gradient_solver(x0, opts, problem, build_conjugate_gradient())
        }
    }
}
