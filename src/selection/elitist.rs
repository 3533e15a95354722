use crate::error::Result;
use crate::individual::{sort_by_fitness_desc, Individual};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{
    collect_fitness, pool_size, validate_rate, SelectionStrategy,
};

/// Truncation selection: the pool is the top `selection_rate` share of the
/// population by fitness.
///
/// The pool always contains the best individual of the population, which makes
/// this the strategy of choice when the best-of-generation fitness should never
/// regress.
///
/// # Examples
///
/// ```
/// use trivolve::selection::ElitistSelection;
///
/// let selection = ElitistSelection::new(0.25).unwrap();
/// assert_eq!(selection.selection_rate(), 0.25);
/// assert!(ElitistSelection::new(0.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ElitistSelection {
    selection_rate: f64,
}

impl ElitistSelection {
    /// Creates a new ElitistSelection strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection_rate` is not in `(0, 1]`.
    pub fn new(selection_rate: f64) -> Result<Self> {
        validate_rate(selection_rate)?;
        Ok(Self { selection_rate })
    }

    pub fn selection_rate(&self) -> f64 {
        self.selection_rate
    }
}

impl Default for ElitistSelection {
    /// Keeps the better half of the population.
    fn default() -> Self {
        Self {
            selection_rate: 0.5,
        }
    }
}

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        population: &[Individual],
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Individual>> {
        collect_fitness(population)?;

        let mut ranked = population.to_vec();
        sort_by_fitness_desc(&mut ranked);
        ranked.truncate(pool_size(population.len(), self.selection_rate));

        Ok(ranked)
    }
}
