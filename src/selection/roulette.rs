use std::collections::HashSet;

use rand::Rng;

use crate::error::Result;
use crate::individual::{sort_by_fitness_desc, Individual};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{
    collect_fitness, pool_size, validate_rate, SelectionStrategy,
};

/// A selection strategy that selects individuals through roulette wheel selection.
///
/// Roulette wheel selection (also known as fitness proportionate selection) selects
/// individuals with probability proportional to their fitness. Individuals with higher
/// fitness have a higher chance of being selected. Each spin only covers the
/// individuals not yet in the pool, so the pool holds no duplicates.
///
/// Similarity scores are never negative. When every remaining individual scores
/// zero the wheel degrades to a uniform draw.
#[derive(Debug, Clone)]
pub struct RouletteWheelSelection {
    selection_rate: f64,
}

impl RouletteWheelSelection {
    /// Creates a new RouletteWheelSelection strategy.
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

    /// Spins the wheel over the individuals not in `excluded` and returns the
    /// index it lands on, or `None` if nobody is left.
    fn spin(
        fitness: &[f64],
        rng: &mut RandomNumberGenerator,
        excluded: &HashSet<usize>,
    ) -> Option<usize> {
        let eligible: Vec<usize> = (0..fitness.len())
            .filter(|i| !excluded.contains(i))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let sum: f64 = eligible.iter().map(|&i| fitness[i].max(0.0)).sum();
        if sum <= 0.0 {
            return Some(eligible[rng.gen_range(0..eligible.len())]);
        }

        let spin = rng.gen::<f64>() * sum;
        let mut cumulative = 0.0;
        for &idx in &eligible {
            cumulative += fitness[idx].max(0.0);
            if spin < cumulative {
                return Some(idx);
            }
        }

        // Floating point slack can leave the spin just past the last slot
        eligible
            .iter()
            .rev()
            .copied()
            .find(|&i| fitness[i] > 0.0)
    }
}

impl Default for RouletteWheelSelection {
    fn default() -> Self {
        Self {
            selection_rate: 0.5,
        }
    }
}

impl SelectionStrategy for RouletteWheelSelection {
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
            match Self::spin(&fitness, rng, &selected_indices) {
                Some(idx) => {
                    selected_indices.insert(idx);
                    selected.push(population[idx].clone());
                }
                None => break,
            }
        }

        sort_by_fitness_desc(&mut selected);
        Ok(selected)
    }
}
