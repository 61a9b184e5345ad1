//! Execution helpers that run an Argmin solver on an adapted objective and
//! normalize the result into a [`SolverOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        traits::{MinimizeOptions, Objective, SolverOutcome},
        types::{Grad, Point},
    },
};
use argmin::core::{
    ArgminError, CostFunction, Error, Executor, KV, OptimizationResult, Problem, Solver, State,
    TerminationReason, TerminationStatus,
};

/// Solver wrapper that turns a numerical failure inside an iteration into a
/// termination at the best state found so far.
///
/// Steepest descent and nonlinear CG carry no convergence tolerance, so near
/// an optimum they keep iterating until the finite-difference gradient
/// cancels to exactly zero and the line search rejects the direction with a
/// `ConditionViolated` error. That is ordinary non-convergence, not a broken
/// solve: the wrapper records the failure text and stops, keeping the best
/// known state. Every other error class still propagates.
struct BestEffort<S> {
    inner: S,
    failure: Option<String>,
}

impl<S> BestEffort<S> {
    fn new(inner: S) -> Self {
        Self { inner, failure: None }
    }
}

impl<O, I, S> Solver<O, I> for BestEffort<S>
where
    S: Solver<O, I>,
    I: State + Clone,
{
    const NAME: &'static str = S::NAME;

    fn init(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        self.inner.init(problem, state)
    }

    fn next_iter(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        // The inner solver consumes the state, so keep a copy to fall back on.
        let checkpoint = state.clone();
        match self.inner.next_iter(problem, state) {
            Ok(step) => Ok(step),
            Err(err) => {
                let degenerate = matches!(
                    err.downcast_ref::<ArgminError>(),
                    Some(ArgminError::ConditionViolated { .. })
                );
                if !degenerate {
                    return Err(err);
                }
                let text = err.to_string();
                log::warn!("solver iteration failed, stopping at the best known point: {text}");
                self.failure = Some(text.clone());
                Ok((checkpoint.terminate_with(TerminationReason::SolverExit(text)), None))
            }
        }
    }

    fn terminate_internal(&mut self, state: &I) -> TerminationStatus {
        self.inner.terminate_internal(state)
    }

    fn terminate(&mut self, state: &I) -> TerminationStatus {
        self.inner.terminate(state)
    }
}

/// Run a gradient-based Argmin solver (L-BFGS, steepest descent, nonlinear
/// CG) from `x0` and normalize the result.
///
/// Wires up the adapted problem, the initial parameter and cost, an optional
/// slog observer (behind the `obs_slog` feature, when `opts.verbose` is
/// set), and the iteration cap, then executes the solver. A line-search
/// failure on a degenerate direction ends the run at the best state found
/// so far with `success = false` and the failure text as the message.
///
/// # Errors
/// - Evaluation errors at `x0` itself (infeasible or non-finite cost).
/// - Argmin runtime errors other than the degenerate-direction case
///   (infeasible evaluations surfaced by the adapter), via the crate's
///   `From<argmin::core::Error>` conversion.
/// - Outcome-validation errors for non-finite results.
pub fn run_gradient_solver<'a, F, S>(
    x0: Point, opts: &MinimizeOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<SolverOutcome>
where
    F: Objective,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Point, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    // Seed the initial cost so the starting point is a valid best state even
    // when the first iteration already fails.
    let f0 = problem.cost(&x0)?;
    let mut executor = Executor::new(problem, BestEffort::new(solver));
    executor =
        executor.configure(|state| state.param(x0).cost(f0).max_iters(opts.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let OptimizationResult { solver, mut state, .. } = executor.run()?;
    let iterations = state.get_iter() as usize;
    let function_counts = state.get_func_counts().clone();
    let best_cost = state.get_best_cost();
    let (success, message) = match solver.failure {
        Some(text) => (false, Some(text)),
        None => summarize_termination(state.get_termination_status()),
    };
    Ok(SolverOutcome::new(
        state.take_best_param(),
        best_cost,
        success,
        message,
        iterations,
        function_counts,
    )?)
}

/// Run a derivative-free Argmin solver (Nelder–Mead) from its configured
/// initial simplex and normalize the result.
///
/// # Errors
/// Same propagation behavior as [`run_gradient_solver`].
pub fn run_simplex_solver<'a, F, S>(
    opts: &MinimizeOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<SolverOutcome>
where
    F: Objective,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Point, (), (), (), (), f64>,
        > + Send
        + 'static,
{
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.max_iters(opts.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = executor.run()?.state().clone();
    let iterations = result.get_iter() as usize;
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let best_cost = result.get_best_cost();
    let (success, message) = summarize_termination(&termination);
    Ok(SolverOutcome::new(
        result.take_best_param(),
        best_cost,
        success,
        message,
        iterations,
        function_counts,
    )?)
}

/// Map Argmin's termination status onto the gateway's `(success, message)`
/// pair. Running out of iterations is the only unsuccessful terminal state;
/// everything else counts as converged.
fn summarize_termination(status: &TerminationStatus) -> (bool, Option<String>) {
    match status {
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            (false, Some("Maximum number of iterations reached".to_string()))
        }
        TerminationStatus::Terminated(TerminationReason::SolverExit(reason)) => {
            (true, Some(reason.clone()))
        }
        TerminationStatus::Terminated(_) => (true, None),
        TerminationStatus::NotTerminated => {
            (false, Some("Solver stopped before termination".to_string()))
        }
    }
}
