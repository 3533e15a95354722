//! # Generation Manager
//!
//! Survivor selection: combines the current population with the freshly mutated
//! children into the next population of exactly `population_size` individuals.
//!
//! Two replacement policies are available:
//!
//! - [`ElitistReplacement`] keeps the best `elite_count` parents, then the best
//!   children, then the best remaining parents.
//! - [`FullReplacement`] prefers children and only falls back to parents when
//!   there are not enough children.
//!
//! If parents and children together are still too few, the best survivors are
//! cloned in turn until the population is full. The next population is always
//! sorted by descending fitness.

use std::fmt::Debug;

use tracing::trace;

use crate::error::{GeneticError, Result};
use crate::evolution::Challenge;
use crate::individual::{sort_by_fitness_desc, Individual};
use crate::population::evaluate_population;

/// Trait for survivor-selection policies.
///
/// Both inputs are evaluated. Implementations return at most
/// `population_size` individuals; [`GenerationManager`] fills any shortfall.
pub trait ReplacementStrategy: Debug + Send + Sync {
    fn replace(
        &self,
        parents: Vec<Individual>,
        children: Vec<Individual>,
        population_size: usize,
    ) -> Vec<Individual>;
}

/// Keeps the top parents unconditionally, so the best fitness of a generation
/// never drops below that of the previous one while `elite_count >= 1`.
#[derive(Debug, Clone)]
pub struct ElitistReplacement {
    elite_count: usize,
}

impl ElitistReplacement {
    pub fn new(elite_count: usize) -> Self {
        Self { elite_count }
    }

    pub fn elite_count(&self) -> usize {
        self.elite_count
    }
}

impl Default for ElitistReplacement {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ReplacementStrategy for ElitistReplacement {
    fn replace(
        &self,
        mut parents: Vec<Individual>,
        mut children: Vec<Individual>,
        population_size: usize,
    ) -> Vec<Individual> {
        sort_by_fitness_desc(&mut parents);
        sort_by_fitness_desc(&mut children);

        let elites = self.elite_count.min(parents.len()).min(population_size);
        let rest = parents.split_off(elites);

        let mut next = parents;
        next.extend(children.into_iter().take(population_size - elites));
        let missing = population_size - next.len();
        next.extend(rest.into_iter().take(missing));
        next
    }
}

/// Replaces the parents by the best children.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReplacement;

impl ReplacementStrategy for FullReplacement {
    fn replace(
        &self,
        mut parents: Vec<Individual>,
        mut children: Vec<Individual>,
        population_size: usize,
    ) -> Vec<Individual> {
        sort_by_fitness_desc(&mut parents);
        sort_by_fitness_desc(&mut children);

        let mut next: Vec<Individual> = children.into_iter().take(population_size).collect();
        let missing = population_size - next.len();
        next.extend(parents.into_iter().take(missing));
        next
    }
}

/// Produces each next population under a fixed replacement policy and size.
#[derive(Debug)]
pub struct GenerationManager {
    replacement: Box<dyn ReplacementStrategy>,
    population_size: usize,
    parallel_threshold: usize,
}

impl GenerationManager {
    /// # Errors
    ///
    /// Returns a configuration error if `population_size` is 0.
    pub fn new(
        replacement: Box<dyn ReplacementStrategy>,
        population_size: usize,
        parallel_threshold: usize,
    ) -> Result<Self> {
        if population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        Ok(Self {
            replacement,
            population_size,
            parallel_threshold,
        })
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Scores the children and builds the next population from them and
    /// `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if scoring fails or if both inputs are empty.
    pub fn next_generation<C>(
        &self,
        mut population: Vec<Individual>,
        mut children: Vec<Individual>,
        challenge: &C,
    ) -> Result<Vec<Individual>>
    where
        C: Challenge + ?Sized,
    {
        evaluate_population(&mut population, challenge, self.parallel_threshold)?;
        evaluate_population(&mut children, challenge, self.parallel_threshold)?;

        let candidates = population.len() + children.len();
        if candidates == 0 {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut next = self
            .replacement
            .replace(population, children, self.population_size);
        next.truncate(self.population_size);
        sort_by_fitness_desc(&mut next);

        let survivors = next.len();
        if survivors == 0 {
            return Err(GeneticError::Evolution(
                "Replacement policy kept no survivors".to_string(),
            ));
        }
        for idx in 0..self.population_size.saturating_sub(survivors) {
            next.push(next[idx % survivors].clone());
        }
        sort_by_fitness_desc(&mut next);

        trace!(candidates, survivors, size = next.len(), "Built next generation");
        Ok(next)
    }
}
