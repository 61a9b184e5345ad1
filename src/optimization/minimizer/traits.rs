//! Public API surface for the minimization gateway.
//!
//! - [`Objective`]: trait users implement for the function being minimized.
//! - [`Eval`]: two-case evaluation result — a point is either feasible with a
//!   value or infeasible (outside the objective's domain).
//! - [`Method`] and [`LineSearcher`]: choice of minimization strategy.
//! - [`MinimizeOptions`]: tolerances, budgets, seeding, and cancellation.
//! - [`SolverOutcome`]: normalized result returned by every method.
//!
//! Convention: the gateway always *minimizes*. The custom conjugate-gradient
//! method internally maximizes the negated objective and negates the reported
//! optimum back, so its outcome is interchangeable with every other method's.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{CancelToken, Cost, FnEvalMap, Point},
        validation::{validate_best_point, validate_value, verify_max_iter, verify_tol},
    },
};
use std::str::FromStr;

/// Result of evaluating an objective at a single point.
///
/// Objectives over a bounded domain return [`Eval::Infeasible`] outside it
/// instead of panicking or returning NaN; every solver in this module knows
/// how to react to an infeasible probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eval {
    /// The point is inside the domain and the objective has this value.
    Feasible(f64),
    /// The point is outside the objective's domain.
    Infeasible,
}

impl Eval {
    /// The value at a feasible point, or `None` when infeasible.
    pub fn value(self) -> Option<f64> {
        match self {
            Eval::Feasible(v) => Some(v),
            Eval::Infeasible => None,
        }
    }

    pub fn is_feasible(self) -> bool {
        matches!(self, Eval::Feasible(_))
    }
}

/// User-implemented objective interface.
///
/// `eval` must be pure: side-effect free and repeatable for the same input.
/// It is called many times per solve (10³–10⁶), so it should be as cheap as
/// the underlying model allows; solvers never re-evaluate a point whose value
/// they already hold.
pub trait Objective {
    fn eval(&self, x: &Point) -> Eval;
}

impl<F: Fn(&Point) -> Eval> Objective for F {
    fn eval(&self, x: &Point) -> Eval {
        self(x)
    }
}

/// Progress hook invoked once per outer iteration by the methods that
/// support one. Arguments are the current point, the objective value when
/// the method tracks one, and the accept/reject flag for stochastic methods.
pub type Callback<'a> = &'a mut dyn FnMut(&Point, Option<f64>, Option<bool>);

/// Objective wrapper that counts evaluations, so the custom solvers can
/// report `fn_evals` the same way the Argmin-backed ones do.
pub(crate) struct CountedObjective<'a, F: Objective> {
    inner: &'a F,
    count: std::cell::Cell<u64>,
}

impl<'a, F: Objective> CountedObjective<'a, F> {
    pub(crate) fn new(inner: &'a F) -> Self {
        Self { inner, count: std::cell::Cell::new(0) }
    }

    /// Evaluation counters under the same key Argmin uses.
    pub(crate) fn counts(&self) -> FnEvalMap {
        let mut map = FnEvalMap::new();
        map.insert("cost_count".to_string(), self.count.get());
        map
    }
}

impl<'a, F: Objective> Objective for CountedObjective<'a, F> {
    fn eval(&self, x: &Point) -> Eval {
        self.count.set(self.count.get() + 1);
        self.inner.eval(x)
    }
}

/// Choice of line search used inside gradient-based Argmin solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Minimization strategy selected at the gateway.
///
/// The first seven are this crate's own implementations; the rest are
/// standard algorithms run through Argmin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Custom simplex minimizer (validation cross-check for Nelder–Mead).
    Simplex,
    /// Repeated Nelder–Mead with an adaptive inner iteration budget.
    SuperSimplex,
    /// Custom boundary-aware conjugate-gradient maximizer of `-f`.
    CustomCg,
    /// Coarse grid scan over `[0,1]^n` followed by a Nelder–Mead polish.
    Brute,
    /// Metropolis-accepted random restarts around L-BFGS local solves.
    BasinHopping,
    /// Particle swarm with periodic wraparound on `[-1,1]^n`.
    Swarm,
    /// Generational evolutionary search.
    Evolve,
    /// Argmin Nelder–Mead.
    NelderMead,
    /// Argmin L-BFGS with the given line search.
    Lbfgs(LineSearcher),
    /// Argmin steepest descent.
    SteepestDescent,
    /// Argmin nonlinear CG (Polak–Ribiere).
    ConjugateGradient,
}

impl FromStr for Method {
    type Err = OptError;

    /// Parse a method name (case-insensitive), for callers holding the
    /// historical string identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simplex" => Ok(Method::Simplex),
            "supersimplex" => Ok(Method::SuperSimplex),
            "customcg" => Ok(Method::CustomCg),
            "brute" => Ok(Method::Brute),
            "basinhopping" => Ok(Method::BasinHopping),
            "swarm" => Ok(Method::Swarm),
            "evolve" => Ok(Method::Evolve),
            "nelder-mead" | "neldermead" => Ok(Method::NelderMead),
            "lbfgs" | "l-bfgs" => Ok(Method::Lbfgs(LineSearcher::MoreThuente)),
            "steepest" | "steepestdescent" => Ok(Method::SteepestDescent),
            "cg" | "conjugategradient" => Ok(Method::ConjugateGradient),
            _ => Err(OptError::InvalidMethod {
                name: s.to_string(),
                reason: "Unrecognized minimization method name.",
            }),
        }
    }
}

/// Gateway-level configuration shared by every method.
///
/// Fields:
/// - `tol` — convergence tolerance; each method applies it to its own
///   criterion (RMS reflection size, |Δf|, gradient norm, simplex spread).
/// - `max_iter` — hard cap on outer iterations / generations.
/// - `max_fev` — cap on objective evaluations where a method supports one;
///   evaluations are unlimited when unset, leaving `max_iter` as the only
///   budget.
/// - `stop_val` — basin hopping terminates early once `f ≤ stop_val`.
/// - `seed` — fixes the RNG of stochastic methods for reproducible solves.
/// - `verbose` — attaches an Argmin observer (behind the `obs_slog` feature)
///   to Argmin-backed methods.
/// - `cancel` — cooperative cancellation flag checked once per outer
///   iteration by the custom solvers.
#[derive(Debug, Clone)]
pub struct MinimizeOptions {
    pub tol: f64,
    pub max_iter: usize,
    pub max_fev: Option<usize>,
    pub stop_val: Option<f64>,
    pub seed: Option<u64>,
    pub verbose: bool,
    pub cancel: Option<CancelToken>,
}

impl MinimizeOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidTol`] for a non-finite or non-positive tolerance.
    /// - [`OptError::InvalidMaxIter`] when `max_iter` or `max_fev` is zero.
    pub fn new(
        tol: f64, max_iter: usize, max_fev: Option<usize>, stop_val: Option<f64>,
        seed: Option<u64>,
    ) -> OptResult<Self> {
        verify_tol(tol)?;
        verify_max_iter(max_iter)?;
        if let Some(fev) = max_fev {
            verify_max_iter(fev)?;
        }
        Ok(Self { tol, max_iter, max_fev, stop_val, seed, verbose: false, cancel: None })
    }

    /// True once the cancel token (if any) has been raised.
    pub fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|token| token.load(std::sync::atomic::Ordering::Relaxed))
            .unwrap_or(false)
    }
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            tol: 1e-10,
            max_iter: 1_000_000,
            max_fev: None,
            stop_val: None,
            seed: None,
            verbose: false,
            cancel: None,
        }
    }
}

/// Canonical result returned by every minimization method.
///
/// - `x`: best point found.
/// - `fun`: objective value at `x` (always in minimization convention, even
///   for the internally-maximizing custom CG method).
/// - `success`: `false` when the iteration budget ran out before the
///   method's convergence criterion was met, or the solve was cancelled.
/// - `message`: human-readable diagnostic accompanying `success = false`.
/// - `iterations`: outer iterations / generations performed.
/// - `fn_evals`: objective-evaluation counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub x: Point,
    pub fun: Cost,
    pub success: bool,
    pub message: Option<String>,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl SolverOutcome {
    /// Build a validated [`SolverOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingBestPoint`] when no best point was produced.
    /// - [`OptError::InvalidBestPoint`] / [`OptError::NonFiniteCost`] when the
    ///   point or value is non-finite.
    pub fn new(
        best: Option<Point>, fun: Cost, success: bool, message: Option<String>, iterations: usize,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let x = validate_best_point(best)?;
        validate_value(fun)?;
        Ok(Self { x, fun, success, message, iterations, fn_evals })
    }
}
