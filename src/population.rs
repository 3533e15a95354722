//! # Population
//!
//! Bulk operations on whole populations: the parallel random bootstrap, size
//! normalization of a resumed population, and batch fitness evaluation.
//!
//! The bootstrap runs on a dedicated rayon pool with one worker per available
//! hardware thread. Every individual is built from its worker's own thread-local
//! RNG, so workers never contend on a shared generator.

use std::num::NonZeroUsize;
use std::thread;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::error::{GeneticError, OptionExt, Result};
use crate::evolution::Challenge;
use crate::individual::Individual;

/// Number of bootstrap workers.
pub fn worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Builds `count` random individuals of `num_triangles` genes each, in parallel.
///
/// # Errors
///
/// Returns an error if the worker pool cannot be started, if `max_coordinate` is
/// 0 while genes are requested, or if fewer individuals than requested come back.
pub fn generate_random_population(
    count: usize,
    num_triangles: usize,
    max_coordinate: u32,
) -> Result<Vec<Individual>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if max_coordinate == 0 && num_triangles > 0 {
        return Err(GeneticError::Configuration(
            "Maximum coordinate must be positive".to_string(),
        ));
    }

    let workers = worker_count();
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("bootstrap-{}", idx))
        .build()
        .map_err(|e| {
            GeneticError::RandomGeneration(format!("Failed to start worker pool: {}", e))
        })?;

    // a panicking worker unwinds through install into the caller, aborting startup
    let population: Vec<Individual> = pool.install(|| {
        (0..count)
            .into_par_iter()
            .map(|_| Individual::random(num_triangles, max_coordinate))
            .collect()
    });

    if population.len() != count {
        return Err(GeneticError::RandomGeneration(format!(
            "Expected {} random individuals, workers produced {}",
            count,
            population.len()
        )));
    }

    debug!(count, num_triangles, workers, "Generated random population");
    Ok(population)
}

/// Brings a resumed population to exactly `target_size`: pads with random
/// individuals when short, keeps the first `target_size` entries when long.
pub fn normalize_population(
    mut population: Vec<Individual>,
    target_size: usize,
    num_triangles: usize,
    max_coordinate: u32,
) -> Result<Vec<Individual>> {
    let loaded = population.len();

    if loaded < target_size {
        let padding = generate_random_population(target_size - loaded, num_triangles, max_coordinate)?;
        population.extend(padding);
        info!(loaded, target_size, "Padded resumed population with random individuals");
    } else if loaded > target_size {
        population.truncate(target_size);
        info!(loaded, target_size, "Truncated resumed population");
    }

    Ok(population)
}

/// Scores every individual that has no cached fitness.
///
/// Batches of at least `parallel_threshold` individuals are scored in parallel.
///
/// # Errors
///
/// Returns an error if any score is not finite.
pub fn evaluate_population<C>(
    population: &mut [Individual],
    challenge: &C,
    parallel_threshold: usize,
) -> Result<()>
where
    C: Challenge + ?Sized,
{
    let check = |score: f64| {
        if score.is_finite() {
            Ok(())
        } else {
            Err(GeneticError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )))
        }
    };

    if population.len() >= parallel_threshold {
        population
            .par_iter_mut()
            .try_for_each(|individual| check(individual.evaluate(challenge)))
    } else {
        population
            .iter_mut()
            .try_for_each(|individual| check(individual.evaluate(challenge)))
    }
}

/// The individual with the highest cached fitness.
///
/// # Errors
///
/// Returns an error if the population is empty or has no evaluated individual.
pub fn best(population: &[Individual]) -> Result<&Individual> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }

    population
        .iter()
        .filter(|i| i.fitness().is_some_and(|f| !f.is_nan()))
        .max_by(|a, b| {
            let a = a.fitness().unwrap_or(f64::NEG_INFINITY);
            let b = b.fitness().unwrap_or(f64::NEG_INFINITY);
            a.total_cmp(&b)
        })
        .ok_or_else_genetic(|| {
            GeneticError::FitnessCalculation("No individual has been evaluated".to_string())
        })
}

/// Mean cached fitness over the evaluated individuals, if any.
pub fn mean_fitness(population: &[Individual]) -> Option<f64> {
    let scores: Vec<f64> = population.iter().filter_map(Individual::fitness).collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::{population_with_reds, RedChallenge};

    struct NanChallenge;

    impl Challenge for NanChallenge {
        fn score(&self, _: &Individual) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_generate_random_population() {
        let population = generate_random_population(25, 4, 12).unwrap();

        assert_eq!(population.len(), 25);
        assert!(population.iter().all(|i| i.len() == 4 && i.is_within(12)));
        assert!(population.iter().all(|i| !i.is_evaluated()));
    }

    #[test]
    fn test_generate_empty_population() {
        assert!(generate_random_population(0, 4, 12).unwrap().is_empty());
        assert!(generate_random_population(3, 4, 0).is_err());
    }

    #[test]
    fn test_normalize_pads_and_truncates() {
        let short = population_with_reds(&[1, 2]);
        let padded = normalize_population(short.clone(), 5, 1, 4).unwrap();
        assert_eq!(padded.len(), 5);
        assert_eq!(&padded[..2], &short[..]);

        let long = population_with_reds(&[1, 2, 3, 4]);
        let truncated = normalize_population(long.clone(), 3, 1, 4).unwrap();
        assert_eq!(truncated, long[..3].to_vec());

        let exact = normalize_population(long.clone(), 4, 1, 4).unwrap();
        assert_eq!(exact, long);
    }

    #[test]
    fn test_evaluate_population_sequential_and_parallel() {
        let mut small = generate_random_population(5, 1, 8).unwrap();
        evaluate_population(&mut small, &RedChallenge, 1000).unwrap();
        assert!(small.iter().all(Individual::is_evaluated));

        let mut large = generate_random_population(5, 1, 8).unwrap();
        evaluate_population(&mut large, &RedChallenge, 1).unwrap();
        assert!(large.iter().all(Individual::is_evaluated));
    }

    #[test]
    fn test_evaluate_population_rejects_nan() {
        let mut population = generate_random_population(3, 1, 8).unwrap();
        let result = evaluate_population(&mut population, &NanChallenge, 1000);

        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
    }

    #[test]
    fn test_best_and_mean() {
        let population = population_with_reds(&[10, 250, 40]);

        assert_eq!(best(&population).unwrap().triangles()[0].color[0], 250);
        let mean = mean_fitness(&population).unwrap();
        assert!((mean - 300.0 / 3.0 / 255.0).abs() < 1e-9);

        assert!(best(&[]).is_err());
        assert!(best(&[Individual::random(1, 3)]).is_err());
        assert_eq!(mean_fitness(&[]), None);
    }
}
