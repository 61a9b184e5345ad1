//! minimizer::linesearch — 1-D maximization along a ray with boundary search.
//!
//! Purpose
//! -------
//! Find the step size that maximizes `g(s) = f(x + s·d)` for the custom
//! conjugate-gradient solver, where the objective may be undefined past some
//! unknown point along the ray.
//!
//! Key behaviors
//! -------------
//! - Golden-ratio bracket expansion from an initial point and step guess.
//! - When a probe leaves the feasible region, the nearest domain edge is
//!   located by bisection ([`find_boundary`]) and the bracket endpoint is
//!   clamped there; expansion past a clamped endpoint is disallowed and the
//!   clamped step is returned as the optimum.
//! - Golden-section narrowing once a bracket `g(s2) ≥ g(s1), g(s3)` exists.
//! - An un-bracketable slice (monotone within reach) logs a warning and
//!   falls back to the best known feasible step.
//!
//! Invariants
//! ----------
//! - Infeasible evaluations are carried as `-∞` so ordering comparisons
//!   treat them as worse than every feasible value.
//! - The returned step always evaluates feasible.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::traits::Eval,
};

/// Golden ratio, `(1 + √5) / 2`.
const PHI: f64 = 1.618033988749895;

/// Absolute bracket-width tolerance.
const LINE_TOL: f64 = 1e-10;

/// Relative bracket-width tolerance (fraction of the bracket span).
const LINE_FRAC_TOL: f64 = 1e-6;

/// Bisection tolerance for the domain-edge search.
const BOUNDARY_TOL: f64 = 1e-6;

/// Infeasible evaluations order below every feasible value.
fn value_or_neg_inf(e: Eval) -> f64 {
    e.value().unwrap_or(f64::NEG_INFINITY)
}

/// Maximize `g` along the ray, starting from the known point `(s1, g1)` with
/// `s2` as the initial step guess.
///
/// Returns the optimal step size. The bracketing and narrowing phases follow
/// the behavior documented in the module header.
///
/// # Errors
/// [`OptError::UndefinedLineSegment`] when both the starting point and the
/// first expansion probe are infeasible, leaving no feasible anchor.
pub fn maximize_1d<G>(g: &G, s1: f64, s2: f64, g1: Eval) -> OptResult<f64>
where
    G: Fn(f64) -> Eval,
{
    let mut s1 = s1;
    let mut s2 = s2;
    let mut s3 = s2 + PHI * (s2 - s1);
    let mut g1 = value_or_neg_inf(g1);
    let mut g2 = value_or_neg_inf(g(s2));
    let mut g3 = value_or_neg_inf(g(s3));
    let mut s1_on_bd = false;
    let mut s3_on_bd = false;

    if g1 == f64::NEG_INFINITY && g3 == f64::NEG_INFINITY {
        return Err(OptError::UndefinedLineSegment);
    }
    if g1 == f64::NEG_INFINITY || g3 == f64::NEG_INFINITY {
        if g1 == f64::NEG_INFINITY {
            let (s, v) = find_boundary(g, s3, s1);
            s1 = s;
            g1 = v;
            s1_on_bd = true;
        }
        if g3 == f64::NEG_INFINITY {
            let (s, v) = find_boundary(g, s1, s3);
            s3 = s;
            g3 = v;
            s3_on_bd = true;
        }
        s2 = s1 + (s3 - s1) / PHI;
        g2 = value_or_neg_inf(g(s2));
    }

    while (s3 - s1).abs() > LINE_TOL && (s3 - s1).abs() > LINE_FRAC_TOL * (s3.abs() + s1.abs()) {
        if g3 > g2 {
            if g2 >= g1 {
                // Expand to the right.
                if s3_on_bd {
                    return Ok(s3);
                }
                s2 = s3;
                g2 = g3;
                s3 = s1 + (s3 - s1) * PHI;
                g3 = value_or_neg_inf(g(s3));
                if g3 == f64::NEG_INFINITY {
                    let (s, v) = find_boundary(g, s2, s3);
                    s3 = s;
                    g3 = v;
                    s3_on_bd = true;
                }
            } else {
                // Contract to the left.
                s3 = s2;
                g3 = g2;
                s2 = s1 + (s3 - s1) / PHI;
                g2 = value_or_neg_inf(g(s2));
            }
        } else if g2 <= g1 {
            // Expand to the left.
            if s1_on_bd {
                return Ok(s1);
            }
            s2 = s1;
            g2 = g1;
            s1 = s3 - (s3 - s1) * PHI;
            g1 = value_or_neg_inf(g(s1));
            if g1 == f64::NEG_INFINITY {
                let (s, v) = find_boundary(g, s2, s1);
                s1 = s;
                g1 = v;
                s1_on_bd = true;
            }
        } else {
            // Bracketed: g2 exceeds both ends.
            return Ok(max_within_bracket(g, s1, s2, g2, s3));
        }
    }

    log::warn!("1-D maximizer could not bracket a maximum; returning best known step");
    if g2 > f64::NEG_INFINITY { Ok(s2) } else { Ok(s1) }
}

/// Golden-section narrowing of a valid bracket `s1 < s2 < s3` with
/// `g(s2) ≥ g(s1), g(s3)`. Returns the middle point once the bracket width
/// drops below tolerance.
///
/// The objective is assumed defined throughout the bracket; a probe that
/// nonetheless lands infeasible stops the narrowing at the best known point.
fn max_within_bracket<G>(g: &G, mut s1: f64, mut s2: f64, mut g2: f64, mut s3: f64) -> f64
where
    G: Fn(f64) -> Eval,
{
    while (s3 - s1).abs() > LINE_TOL && (s3 - s1).abs() > LINE_FRAC_TOL * (s3.abs() + s1.abs()) {
        let s4 = s1 + (s3 - s2);
        let g4 = match g(s4) {
            Eval::Feasible(v) => v,
            Eval::Infeasible => {
                log::warn!("1-D maximizer probe left the domain inside a bracket");
                return s2;
            }
        };
        if s4 > s2 {
            if g4 > g2 {
                s1 = s2;
                s2 = s4;
                g2 = g4;
            } else {
                s3 = s4;
            }
        } else if g4 > g2 {
            s3 = s2;
            s2 = s4;
            g2 = g4;
        } else {
            s1 = s4;
        }
    }
    s2
}

/// Bisect for the feasible-region edge between a feasible step `s_ok` and an
/// infeasible step `s_bad`. Returns the last feasible step and its value.
pub fn find_boundary<G>(g: &G, mut s_ok: f64, mut s_bad: f64) -> (f64, f64)
where
    G: Fn(f64) -> Eval,
{
    while (s_ok - s_bad).abs() > BOUNDARY_TOL {
        let mid = (s_ok + s_bad) / 2.0;
        match g(mid) {
            Eval::Feasible(_) => s_ok = mid,
            Eval::Infeasible => s_bad = mid,
        }
    }
    // s_ok stayed on the feasible side throughout the bisection.
    (s_ok, value_or_neg_inf(g(s_ok)))
}
