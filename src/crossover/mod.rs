//! # CrossoverStrategy
//!
//! The `CrossoverStrategy` trait defines how children are bred from a selection
//! pool. Every strategy produces exactly the requested number of children, each
//! with the same number of genes as its parents and a fresh (unevaluated)
//! fitness.
//!
//! Parents are paired the same way for every strategy: child `i` takes
//! `pool[i % pool.len()]` as its first parent, so every pool member breeds, and a
//! uniformly drawn *different* pool member as its second parent. A pool of one
//! pairs the individual with itself.
pub mod blend;
pub mod single_point;
pub mod uniform;

use std::fmt::Debug;

use rand::Rng;

use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    rng::RandomNumberGenerator,
};

pub use blend::BlendCrossover;
pub use single_point::SinglePointCrossover;
pub use uniform::UniformCrossover;

/// # CrossoverStrategy
///
/// Implementors only describe how two parents combine into one child; pairing,
/// counting and validation are shared through the provided
/// [`CrossoverStrategy::crossover`].
pub trait CrossoverStrategy: Debug + Send + Sync {
    /// Combines two parents of equal length into a new child.
    fn combine(
        &self,
        first: &Individual,
        second: &Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Individual;

    /// Breeds `num_offspring` children from `pool`.
    ///
    /// ## Errors
    ///
    /// This method can fail if:
    /// - The pool is empty
    /// - Two paired parents have a different number of genes
    fn crossover(
        &self,
        pool: &[Individual],
        num_offspring: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Individual>> {
        if pool.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut children = Vec::with_capacity(num_offspring);
        for i in 0..num_offspring {
            let (first, second) = pick_parents(pool, i, rng);
            if first.len() != second.len() {
                return Err(GeneticError::Breeding(format!(
                    "Cannot cross parents with {} and {} genes",
                    first.len(),
                    second.len()
                )));
            }
            children.push(self.combine(first, second, rng));
        }

        Ok(children)
    }
}

/// Returns the parents of child `index`.
pub(crate) fn pick_parents<'a>(
    pool: &'a [Individual],
    index: usize,
    rng: &mut RandomNumberGenerator,
) -> (&'a Individual, &'a Individual) {
    let first = index % pool.len();
    if pool.len() == 1 {
        return (&pool[first], &pool[first]);
    }

    let mut second = rng.gen_range(0..pool.len() - 1);
    if second >= first {
        second += 1;
    }
    (&pool[first], &pool[second])
}
