use std::collections::HashSet;

use rand::Rng;

use crate::error::{GeneticError, Result};
use crate::individual::{sort_by_fitness_desc, Individual};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{
    collect_fitness, pool_size, validate_rate, SelectionStrategy,
};

/// A selection strategy that fills the pool through tournaments.
///
/// Each tournament draws `tournament_size` contestants uniformly from the
/// individuals not yet in the pool and admits the fittest one. Tournaments are
/// repeated until the pool holds `selection_rate` of the population.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    selection_rate: f64,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy.
    ///
    /// # Arguments
    ///
    /// * `tournament_size` - The number of contestants per tournament. Must be at
    ///   least 1. A tournament size of 1 is equivalent to random selection.
    /// * `selection_rate` - Share of the population admitted to the pool, in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0 or the rate is out of range.
    pub fn new(tournament_size: usize, selection_rate: f64) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        validate_rate(selection_rate)?;

        Ok(Self {
            tournament_size,
            selection_rate,
        })
    }

    /// Runs a single tournament among the individuals not in `excluded` and
    /// returns the index of the winner.
    ///
    /// # Errors
    ///
    /// Returns an error if every individual is excluded.
    fn run_tournament(
        &self,
        fitness: &[f64],
        rng: &mut RandomNumberGenerator,
        excluded: &HashSet<usize>,
    ) -> Result<usize> {
        let eligible: Vec<usize> = (0..fitness.len())
            .filter(|i| !excluded.contains(i))
            .collect();

        if eligible.is_empty() {
            return Err(GeneticError::Configuration(
                "No eligible individuals for tournament selection".to_string(),
            ));
        }

        let mut best_idx = eligible[rng.gen_range(0..eligible.len())];
        for _ in 1..self.tournament_size {
            let idx = eligible[rng.gen_range(0..eligible.len())];
            if fitness[idx] > fitness[best_idx] {
                best_idx = idx;
            }
        }

        Ok(best_idx)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 3,
            selection_rate: 0.5,
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        population: &[Individual],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Individual>> {
        let fitness = collect_fitness(population)?;
        let num_to_select = pool_size(population.len(), self.selection_rate);

        let mut selected = Vec::with_capacity(num_to_select);
        let mut selected_indices = HashSet::with_capacity(num_to_select);

        while selected.len() < num_to_select {
            let winner_idx = self.run_tournament(&fitness, rng, &selected_indices)?;
            if selected_indices.insert(winner_idx) {
                selected.push(population[winner_idx].clone());
            }
        }

        sort_by_fitness_desc(&mut selected);
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::{population_with_reds, reds};

    #[test]
    fn test_tournament_selection() {
        let population = population_with_reds(&[50, 80, 30, 90, 10]);
        let mut rng = RandomNumberGenerator::from_seed(3);

        let selection = TournamentSelection::new(2, 0.6).unwrap();
        let selected = selection.select(&population, &mut rng).unwrap();

        assert_eq!(selected.len(), 3);
        let picked = reds(&selected);
        assert!(picked.windows(2).all(|w| w[0] >= w[1]));

        // no duplicates
        let unique: HashSet<u8> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_tournament_as_large_as_population_is_elitist() {
        let population = population_with_reds(&[50, 80, 30, 90, 10]);
        let mut rng = RandomNumberGenerator::from_seed(11);

        // With 1000 draws per tournament, every eligible contestant is seen
        let selection = TournamentSelection::new(1000, 0.4).unwrap();
        let selected = selection.select(&population, &mut rng).unwrap();

        assert_eq!(reds(&selected), vec![90, 80]);
    }

    #[test]
    fn test_tournament_selection_full_rate_returns_everyone() {
        let population = population_with_reds(&[4, 2, 9]);
        let selection = TournamentSelection::new(1, 1.0).unwrap();
        let selected = selection
            .select(&population, &mut RandomNumberGenerator::new())
            .unwrap();

        assert_eq!(reds(&selected), vec![9, 4, 2]);
    }

    #[test]
    fn test_tournament_selection_empty_population() {
        let selection = TournamentSelection::default();
        let result = selection.select(&[], &mut RandomNumberGenerator::new());

        assert!(result.is_err());
    }

    #[test]
    fn test_tournament_selection_invalid_size() {
        assert!(TournamentSelection::new(0, 0.5).is_err());
        assert!(TournamentSelection::new(2, 0.0).is_err());
    }

    #[test]
    fn test_run_tournament_with_excluded() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);

        // Exclude all but one individual
        let excluded: HashSet<usize> = [0, 1, 2, 4].into_iter().collect();

        let selection = TournamentSelection::default();
        let winner = selection
            .run_tournament(&fitness, &mut rng, &excluded)
            .unwrap();

        // Only index 3 is not excluded
        assert_eq!(winner, 3);

        // Exclude all individuals
        let excluded: HashSet<usize> = (0..fitness.len()).collect();
        let result = selection.run_tournament(&fitness, &mut rng, &excluded);
        assert!(result.is_err());
    }
}
