//! minimizer::swarm — particle swarm minimizer on the periodic box
//! `[-1, 1]^n`.
//!
//! Purpose
//! -------
//! Global search for objectives too rough for local descent. Particles are
//! seeded near `x0` with random symmetric offsets and move under the
//! standard PSO velocity rule; positions wrap around the box edges.
//!
//! Key behaviors
//! -------------
//! - Velocity update `v' = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)` with
//!   scalar draws `r1, r2` per particle per generation.
//! - Infeasible evaluations take the large fitness sentinel, the same value
//!   unvisited particles start with.
//! - The global best is a `(position, fitness)` snapshot reassigned whenever
//!   a particle improves on it; the snapshot within a generation is visible
//!   to the particles evaluated after it.
//! - The generation cap is the only termination condition; an early-stop
//!   error criterion is deliberately not implemented.
//! - Optional polish: every 10 generations the global best is refined with
//!   a short custom-simplex run (boundary-tolerant, so it composes with
//!   partially defined objectives).
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        simplex::fmin_simplex,
        traits::{Callback, CountedObjective, Eval, MinimizeOptions, Objective, SolverOutcome},
        types::Point,
    },
};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Inertia weight.
const W: f64 = 1.0;

/// Affinity for a particle's personal best.
const C1: f64 = 2.0;

/// Affinity for the global best.
const C2: f64 = 2.0;

/// Fitness sentinel: large == bad, since we minimize.
const LARGE: f64 = 1e10;

/// Polish period, in generations.
const POLISH_EVERY: usize = 10;

/// One member of the swarm. Rebuilt fields only change through the
/// generation sweep.
#[derive(Debug, Clone)]
struct Particle {
    position: Point,
    velocity: Point,
    best_position: Point,
    best_fitness: f64,
}

/// Minimize `f` with a particle swarm of `popsize` particles.
///
/// `opts.max_iter` is the generation cap; `opts.seed` fixes the RNG for
/// reproducible runs. When `polish` is set, the global best is refined with
/// the custom simplex every [`POLISH_EVERY`] generations.
///
/// # Errors
/// - [`OptError::InvalidPopSize`] when `popsize < 2`.
/// - Outcome-validation errors for non-finite results.
pub fn fmin_particle_swarm<F: Objective>(
    f: &F, x0: &Point, opts: &MinimizeOptions, popsize: usize, polish: bool,
    mut callback: Option<Callback<'_>>,
) -> OptResult<SolverOutcome> {
    if popsize < 2 {
        return Err(OptError::InvalidPopSize {
            popsize,
            reason: "Swarm needs at least two particles.",
        });
    }
    let counted = CountedObjective::new(f);
    let dim = x0.len();
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut particles: Vec<Particle> = (0..popsize)
        .map(|_| {
            let offset: Point =
                Array1::from_shape_fn(dim, |_| 2.0 * (rng.gen::<f64>() - 0.5));
            let position = x0 + &offset;
            Particle {
                best_position: position.clone(),
                position,
                velocity: Array1::zeros(dim),
                best_fitness: LARGE,
            }
        })
        .collect();

    let mut gbest_position = particles[0].position.clone();
    let mut gbest_fitness = LARGE;

    let mut generation = 0usize;
    let mut cancelled = false;
    while generation < opts.max_iter {
        if opts.cancelled() {
            cancelled = true;
            break;
        }
        for p in particles.iter_mut() {
            let fitness = match counted.eval(&p.position) {
                Eval::Feasible(v) => v,
                Eval::Infeasible => LARGE,
            };
            if fitness < p.best_fitness {
                p.best_fitness = fitness;
                p.best_position = p.position.clone();
            }
            if fitness < gbest_fitness {
                gbest_fitness = fitness;
                gbest_position = p.position.clone();
            }

            let r1 = rng.gen::<f64>();
            let r2 = rng.gen::<f64>();
            let v = W * &p.velocity
                + C1 * r1 * (&p.best_position - &p.position)
                + C2 * r2 * (&gbest_position - &p.position);
            p.position += &v;
            p.velocity = v;
            // Periodic box between -1 and 1.
            p.position.mapv_inplace(|pv| (pv + 1.0).rem_euclid(2.0) - 1.0);
        }

        log::debug!("swarm generation {generation}: global best = {gbest_fitness}");
        if let Some(cb) = callback.as_mut() {
            cb(&gbest_position, Some(gbest_fitness), None);
        }

        if polish && (generation + 1) % POLISH_EVERY == 0 && gbest_fitness < LARGE {
            let polish_opts =
                MinimizeOptions { tol: opts.tol, max_iter: 100, ..Default::default() };
            let refined = fmin_simplex(&counted, gbest_position.clone(), 0.1, &polish_opts)?;
            if refined.fun < gbest_fitness {
                gbest_fitness = refined.fun;
                gbest_position = refined.x;
            }
        }
        generation += 1;
    }

    let message = cancelled.then(|| "Cancelled".to_string());
    SolverOutcome::new(
        Some(gbest_position),
        gbest_fitness,
        !cancelled,
        message,
        generation,
        counted.counts(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn opts(seed: u64, max_iter: usize) -> MinimizeOptions {
        MinimizeOptions { tol: 1e-8, max_iter, seed: Some(seed), ..Default::default() }
    }

    #[test]
    // Purpose
    // -------
    // On a convex quadratic inside the box, the swarm should get close to
    // the optimum, and a polished run should reach it tightly.
    //
    // Given
    // -----
    // - f(x) = (x0 - 0.3)^2 + (x1 + 0.4)^2, x0 = (0, 0), seeded.
    //
    // Expect
    // ------
    // - Unpolished best fitness well below the value at x0; polished best
    //   within 1e-3 of (0.3, -0.4).
    fn converges_on_quadratic_inside_box() {
        let f = |x: &Point| Eval::Feasible((x[0] - 0.3).powi(2) + (x[1] + 0.4).powi(2));
        let x0 = array![0.0, 0.0];
        let raw = fmin_particle_swarm(&f, &x0, &opts(7, 60), 200, false, None).unwrap();
        assert!(raw.success);
        assert!(raw.fun < 0.05, "got fun = {}", raw.fun);

        let polished = fmin_particle_swarm(&f, &x0, &opts(7, 60), 200, true, None).unwrap();
        assert!(polished.fun <= raw.fun);
        assert!((polished.x[0] - 0.3).abs() < 1e-3, "got x = {:?}", polished.x);
        assert!((polished.x[1] + 0.4).abs() < 1e-3, "got x = {:?}", polished.x);
    }

    #[test]
    // Purpose
    // -------
    // A fixed seed must make the whole solve reproducible.
    //
    // Given
    // -----
    // - Two identical seeded runs.
    //
    // Expect
    // ------
    // - Identical best points and values.
    fn seeded_runs_are_identical() {
        let f = |x: &Point| Eval::Feasible(x.dot(x));
        let x0 = array![0.2, -0.1];
        let a = fmin_particle_swarm(&f, &x0, &opts(42, 30), 100, false, None).unwrap();
        let b = fmin_particle_swarm(&f, &x0, &opts(42, 30), 100, false, None).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.fun, b.fun);
    }

    #[test]
    // Purpose
    // -------
    // A population of fewer than two particles is a caller error.
    //
    // Given
    // -----
    // - popsize = 1.
    //
    // Expect
    // ------
    // - InvalidPopSize.
    fn rejects_degenerate_population() {
        let f = |x: &Point| Eval::Feasible(x.dot(x));
        let err =
            fmin_particle_swarm(&f, &array![0.0], &opts(1, 10), 1, false, None).unwrap_err();
        assert!(matches!(err, OptError::InvalidPopSize { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Infeasible regions are survivable: particles landing there take the
    // sentinel fitness and the best stays feasible.
    //
    // Given
    // -----
    // - f defined only on x0 >= 0, minimized at 0.2.
    //
    // Expect
    // ------
    // - Best point feasible with fitness below the sentinel.
    fn infeasible_regions_take_sentinel_fitness() {
        let f = |x: &Point| {
            if x[0] >= 0.0 { Eval::Feasible((x[0] - 0.2).powi(2)) } else { Eval::Infeasible }
        };
        let outcome =
            fmin_particle_swarm(&f, &array![0.5], &opts(3, 40), 100, false, None).unwrap();
        assert!(outcome.x[0] >= 0.0);
        assert!(outcome.fun < LARGE);
    }
}
