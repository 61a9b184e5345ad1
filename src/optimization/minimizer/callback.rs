//! minimizer::callback — progress-printing helper for long solves.
//!
//! Builds the standard progress hook: elapsed seconds since an explicit
//! reference instant plus the current objective value, with an
//! accepted/rejected tag for stochastic methods. The reference instant is
//! passed in at construction instead of living in process-wide state, so
//! concurrent solves can each carry their own clock.
use crate::optimization::minimizer::{
    traits::{Eval, Objective},
    types::Point,
};
use std::time::Instant;

/// Progress printer pairing an objective with a reference instant.
pub struct ProgressPrinter<F: Objective> {
    start: Instant,
    objective: F,
}

impl<F: Objective> ProgressPrinter<F> {
    pub fn new(start: Instant, objective: F) -> Self {
        Self { start, objective }
    }

    /// Report one progress tick.
    ///
    /// When the solver supplies both a value and an accept flag (the
    /// stochastic methods do), they are printed directly; otherwise the
    /// objective is evaluated at `x`.
    pub fn report(&self, x: &Point, f: Option<f64>, accepted: Option<bool>) {
        let elapsed = self.start.elapsed().as_secs();
        match (f, accepted) {
            (Some(value), Some(accepted)) => {
                let tag = if accepted { "accepted" } else { "not accepted" };
                log::info!("{elapsed:>5}s {value:>22.10} {tag}");
            }
            _ => {
                let value = match f {
                    Some(value) => value,
                    None => match self.objective.eval(x) {
                        Eval::Feasible(value) => value,
                        Eval::Infeasible => {
                            log::info!("{elapsed:>5}s (objective undefined at current point)");
                            return;
                        }
                    },
                };
                log::info!("{elapsed:>5}s {value:>22.10}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The printer must tolerate every argument combination without
    // panicking, including an infeasible current point.
    //
    // Given
    // -----
    // - A printer over a half-line objective.
    //
    // Expect
    // ------
    // - No panic for (f, accepted), (f, None), (None, None), and an
    //   infeasible point.
    fn report_handles_all_argument_shapes() {
        let f = |x: &Point| {
            if x[0] >= 0.0 { Eval::Feasible(x[0]) } else { Eval::Infeasible }
        };
        let printer = ProgressPrinter::new(Instant::now(), f);
        printer.report(&array![1.0], Some(0.5), Some(true));
        printer.report(&array![1.0], Some(0.5), None);
        printer.report(&array![1.0], None, None);
        printer.report(&array![-1.0], None, None);
    }
}
