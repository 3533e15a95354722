use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// A selection strategy turns an evaluated population into a breeding pool. The
/// pool may be smaller than the population but is never empty for a non-empty
/// population, and it is always returned in descending fitness order so that
/// element 0 is the best individual of the pool. The population itself is left
/// untouched and its order does not matter.
///
/// # Examples
///
/// ```
/// use trivolve::evolution::Challenge;
/// use trivolve::individual::Individual;
/// use trivolve::rng::RandomNumberGenerator;
/// use trivolve::selection::{ElitistSelection, SelectionStrategy};
///
/// struct MoreIsBetter;
///
/// impl Challenge for MoreIsBetter {
///     fn score(&self, individual: &Individual) -> f64 {
///         individual.triangles()[0].color[0] as f64
///     }
/// }
///
/// let mut population: Vec<Individual> = (0..6).map(|_| Individual::random(1, 10)).collect();
/// for individual in &mut population {
///     individual.evaluate(&MoreIsBetter);
/// }
///
/// let selection = ElitistSelection::new(0.5).unwrap();
/// let pool = selection.select(&population, &mut RandomNumberGenerator::new()).unwrap();
///
/// assert_eq!(pool.len(), 3);
/// assert!(pool.iter().all(|i| i.fitness() <= pool[0].fitness()));
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects a breeding pool from an evaluated population.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The population is empty
    /// - Some individual has no cached fitness or a non-finite one
    fn select(
        &self,
        population: &[Individual],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Individual>>;
}

/// Collects the cached fitness of every individual.
pub(crate) fn collect_fitness(population: &[Individual]) -> Result<Vec<f64>> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }

    population
        .iter()
        .enumerate()
        .map(|(idx, individual)| match individual.fitness() {
            Some(score) if score.is_finite() => Ok(score),
            Some(score) => Err(GeneticError::FitnessCalculation(format!(
                "Non-finite fitness score {} at index {}",
                score, idx
            ))),
            None => Err(GeneticError::FitnessCalculation(format!(
                "Individual at index {} was not evaluated before selection",
                idx
            ))),
        })
        .collect()
}

/// Size of the breeding pool: `ceil(len * rate)`, clamped to `[1, len]`.
pub fn pool_size(population_len: usize, selection_rate: f64) -> usize {
    let size = (population_len as f64 * selection_rate).ceil() as usize;
    size.clamp(1, population_len.max(1))
}

pub(crate) fn validate_rate(selection_rate: f64) -> Result<()> {
    if selection_rate > 0.0 && selection_rate <= 1.0 {
        Ok(())
    } else {
        Err(GeneticError::Configuration(format!(
            "Selection rate must be in (0, 1], got {}",
            selection_rate
        )))
    }
}
