//! Adapter that exposes an [`Objective`] as an Argmin problem.
//!
//! Argmin solvers assume a total objective, so an [`Eval::Infeasible`]
//! evaluation is surfaced as an error here; the gateway only routes to Argmin
//! methods when the caller's domain is effectively unconstrained (or the
//! method is used as a local polish inside a boundary-tolerant outer loop
//! that treats the failure as a rejected step).
//!
//! Gradients come from the caller's analytic Jacobian when one was supplied,
//! otherwise from finite differences of the cost: central differences first,
//! retried with forward differences when an evaluation inside the FD stencil
//! failed or produced a non-finite component.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    minimizer::{
        traits::{Eval, Objective},
        types::{Cost, Grad, Point},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges an [`Objective`] (plus optional analytic Jacobian) to Argmin's
/// `CostFunction` and `Gradient`.
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub jac: Option<&'a (dyn Fn(&Point) -> Grad + 'a)>,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, jac: Option<&'a (dyn Fn(&Point) -> Grad + 'a)>) -> Self {
        Self { f, jac }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Output = Cost;

    /// Evaluate the objective, rejecting infeasible and non-finite results.
    ///
    /// # Errors
    /// - [`OptError::InfeasiblePoint`] when the objective is undefined here.
    /// - [`OptError::NonFiniteCost`] when a feasible value is NaN/infinite.
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        match self.f.eval(x) {
            Eval::Feasible(value) => {
                if !value.is_finite() {
                    return Err((OptError::NonFiniteCost { value }).into());
                }
                Ok(value)
            }
            Eval::Infeasible => Err(OptError::InfeasiblePoint.into()),
        }
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Gradient = Grad;

    /// Evaluate the gradient of the objective at `x`.
    ///
    /// Behavior:
    /// - With an analytic Jacobian, validate it and return it unchanged (the
    ///   gateway minimizes directly, so no sign flip is needed).
    /// - Otherwise finite-difference the cost. The FD closure cannot use `?`,
    ///   so the first error is captured in `closure_err` and the closure
    ///   returns `NaN`; after the FD pass the captured error either aborts the
    ///   gradient or triggers one forward-difference retry.
    ///
    /// # Errors
    /// - Validation errors for a wrong-dimension or non-finite gradient.
    /// - Any error raised by cost evaluations performed during FD.
    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = x.len();
        if let Some(jac) = self.jac {
            let g = jac(x);
            validate_grad(&g, dim)?;
            return Ok(g);
        }

        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_fn = |x: &Point| -> f64 {
            match self.cost(x) {
                Ok(value) => value,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };

        let fd_grad = x.central_diff(&cost_fn);
        if closure_err.borrow().is_some() {
            return forward_fd(x, &cost_fn, &closure_err);
        }
        match validate_grad(&fd_grad, dim) {
            Ok(()) => Ok(fd_grad),
            Err(_) => forward_fd(x, &cost_fn, &closure_err),
        }
    }
}

/// Forward-difference retry path: clears the capture cell, re-runs FD, and
/// surfaces either the captured error or a validated gradient.
fn forward_fd<G: Fn(&Point) -> f64>(
    x: &Point, cost_fn: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = x.forward_diff(cost_fn);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, x.len())?;
    Ok(fd_grad)
}
