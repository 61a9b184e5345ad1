//! minimizer::evolve — generational evolutionary minimizer.
//!
//! Tournament selection, two-point crossover, and Gaussian gene mutation
//! over a population of gene vectors initialized uniformly in `[0, 1)`.
//! Fitness values are cached per individual and only recomputed for
//! offspring whose genes changed.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        traits::{Callback, CountedObjective, Eval, MinimizeOptions, Objective, SolverOutcome},
        types::Point,
    },
};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Probability that a selected pair is crossed over.
const PROB_TO_CROSS: f64 = 0.5;

/// Probability that an offspring is mutated.
const PROB_TO_MUTATE: f64 = 0.2;

/// Per-gene mutation probability within a mutated individual.
const MUT_INDPB: f64 = 0.1;

/// Standard deviation of the Gaussian gene mutation.
const MUT_SIGMA: f64 = 0.5;

/// Tournament size for selection.
const TOURNAMENT_SIZE: usize = 3;

/// Fitness assigned to infeasible gene vectors.
const LARGE: f64 = 1e10;

/// Minimize `f` with a generational GA of `num_individuals` members for
/// `opts.max_iter` generations. `x0` fixes the gene count only; the initial
/// population is drawn uniformly from the unit box.
///
/// # Errors
/// - [`OptError::InvalidPopSize`] when `num_individuals < 2`.
/// - Outcome-validation errors for non-finite results.
pub fn fmin_evolutionary<F: Objective>(
    f: &F, x0: &Point, opts: &MinimizeOptions, num_individuals: usize,
    mut callback: Option<Callback<'_>>,
) -> OptResult<SolverOutcome> {
    if num_individuals < 2 {
        return Err(OptError::InvalidPopSize {
            popsize: num_individuals,
            reason: "Evolution needs at least two individuals.",
        });
    }
    let counted = CountedObjective::new(f);
    let genes = x0.len();
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut population: Vec<Point> = (0..num_individuals)
        .map(|_| Array1::from_shape_fn(genes, |_| rng.gen::<f64>()))
        .collect();
    let mut fitness: Vec<f64> =
        population.iter().map(|ind| evaluate(&counted, ind)).collect();

    let mut generation = 0usize;
    let mut cancelled = false;
    while generation < opts.max_iter {
        if opts.cancelled() {
            cancelled = true;
            break;
        }
        log_generation_stats(generation, &fitness);

        // Tournament selection into a cloned offspring pool.
        let mut offspring: Vec<Point> = Vec::with_capacity(num_individuals);
        let mut off_fitness: Vec<Option<f64>> = Vec::with_capacity(num_individuals);
        for _ in 0..num_individuals {
            let mut winner = rng.gen_range(0..num_individuals);
            for _ in 1..TOURNAMENT_SIZE {
                let challenger = rng.gen_range(0..num_individuals);
                if fitness[challenger] < fitness[winner] {
                    winner = challenger;
                }
            }
            offspring.push(population[winner].clone());
            off_fitness.push(Some(fitness[winner]));
        }

        // Two-point crossover on consecutive pairs.
        for pair in (0..num_individuals.saturating_sub(1)).step_by(2) {
            if genes >= 2 && rng.gen::<f64>() < PROB_TO_CROSS {
                let (a, b) = cut_points(genes, &mut rng);
                let (left, right) = offspring.split_at_mut(pair + 1);
                let child1 = &mut left[pair];
                let child2 = &mut right[0];
                for g in a..b {
                    std::mem::swap(&mut child1[g], &mut child2[g]);
                }
                off_fitness[pair] = None;
                off_fitness[pair + 1] = None;
            }
        }

        // Gaussian mutation.
        for (ind, fit) in offspring.iter_mut().zip(off_fitness.iter_mut()) {
            if rng.gen::<f64>() < PROB_TO_MUTATE {
                for g in 0..genes {
                    if rng.gen::<f64>() < MUT_INDPB {
                        let n: f64 = rng.sample(StandardNormal);
                        ind[g] += MUT_SIGMA * n;
                    }
                }
                *fit = None;
            }
        }

        // Re-evaluate only the individuals whose genes changed.
        population = offspring;
        fitness = population
            .iter()
            .zip(off_fitness)
            .map(|(ind, fit)| fit.unwrap_or_else(|| evaluate(&counted, ind)))
            .collect();

        if let Some(cb) = callback.as_mut() {
            let best = best_index(&fitness);
            cb(&population[best], Some(fitness[best]), None);
        }
        generation += 1;
    }

    let best = best_index(&fitness);
    let message = cancelled.then(|| "Cancelled".to_string());
    SolverOutcome::new(
        Some(population[best].clone()),
        fitness[best],
        !cancelled,
        message,
        generation,
        counted.counts(),
    )
}

fn evaluate<F: Objective>(f: &F, ind: &Point) -> f64 {
    match f.eval(ind) {
        Eval::Feasible(v) => v,
        Eval::Infeasible => LARGE,
    }
}

/// Two ordered cut points with at least one gene between them.
fn cut_points(genes: usize, rng: &mut StdRng) -> (usize, usize) {
    let a = rng.gen_range(0..genes);
    let b = rng.gen_range(0..genes);
    if a <= b { (a, b + 1) } else { (b, a + 1) }
}

fn best_index(fitness: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in fitness.iter().enumerate() {
        if v < fitness[best] {
            best = i;
        }
    }
    best
}

fn log_generation_stats(generation: usize, fitness: &[f64]) {
    let n = fitness.len() as f64;
    let avg = fitness.iter().sum::<f64>() / n;
    let var = fitness.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
    let min = fitness.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    log::debug!(
        "evolve generation {generation}: avg = {avg}, std = {}, min = {min}, max = {max}",
        var.sqrt()
    );
}
