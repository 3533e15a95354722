//! # Mutation
//!
//! [`Mutator`] perturbs freshly bred children in place. Each gene mutates with
//! probability `mutation_rate`, in one of three ways:
//!
//! - move one vertex along one axis (45%)
//! - shift one color channel (45%)
//! - replace the whole triangle with a random one (10%)
//!
//! Moves and shifts draw a delta of at most `mutation_strength` times the value
//! range and clamp the result, so genes never leave their valid range. After the
//! per-gene pass, a child trades the paint order of two genes with probability
//! `swap_probability`. Any touched child loses its cached fitness.

use rand::Rng;

use crate::error::{GeneticError, Result};
use crate::individual::{Individual, Triangle};
use crate::rng::RandomNumberGenerator;

const MOVE_VERTEX: f64 = 0.45;
const SHIFT_COLOR: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct Mutator {
    mutation_rate: f64,
    mutation_strength: f64,
    swap_probability: f64,
    max_coordinate: u32,
}

impl Mutator {
    /// # Errors
    ///
    /// Returns a configuration error if a probability is outside `[0, 1]`, the
    /// strength is outside `(0, 1]` or `max_coordinate` is 0.
    pub fn new(
        mutation_rate: f64,
        mutation_strength: f64,
        swap_probability: f64,
        max_coordinate: u32,
    ) -> Result<Self> {
        let probability = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(GeneticError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )))
            }
        };
        probability("Mutation rate", mutation_rate)?;
        probability("Swap probability", swap_probability)?;

        if !(mutation_strength > 0.0 && mutation_strength <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Mutation strength must be in (0, 1], got {}",
                mutation_strength
            )));
        }
        if max_coordinate == 0 {
            return Err(GeneticError::Configuration(
                "Maximum coordinate must be positive".to_string(),
            ));
        }

        Ok(Self {
            mutation_rate,
            mutation_strength,
            swap_probability,
            max_coordinate,
        })
    }

    /// Mutates every child in place.
    pub fn mutate(&self, children: &mut [Individual], rng: &mut RandomNumberGenerator) {
        for child in children {
            self.mutate_individual(child, rng);
        }
    }

    /// Mutates one individual in place.
    pub fn mutate_individual(&self, individual: &mut Individual, rng: &mut RandomNumberGenerator) {
        let len = individual.len();

        for idx in 0..len {
            if rng.gen_bool(self.mutation_rate) {
                self.mutate_gene(&mut individual.triangles_mut()[idx], rng);
            }
        }

        if len >= 2 && rng.gen_bool(self.swap_probability) {
            let a = rng.gen_range(0..len);
            let mut b = rng.gen_range(0..len - 1);
            if b >= a {
                b += 1;
            }
            individual.swap_triangles(a, b);
        }
    }

    fn mutate_gene(&self, gene: &mut Triangle, rng: &mut RandomNumberGenerator) {
        let roll: f64 = rng.gen();

        if roll < MOVE_VERTEX {
            let span = self.span(self.max_coordinate as f64);
            let vertex = &mut gene.vertices[rng.gen_range(0..3)];
            let axis = if rng.gen_bool(0.5) {
                &mut vertex.x
            } else {
                &mut vertex.y
            };
            *axis = shift(*axis as i64, rng.gen_range(-span..=span), self.max_coordinate as i64 - 1) as u32;
        } else if roll < SHIFT_COLOR {
            let span = self.span(255.0);
            let channel = &mut gene.color[rng.gen_range(0..4)];
            *channel = shift(*channel as i64, rng.gen_range(-span..=span), 255) as u8;
        } else {
            *gene = Triangle::random(rng, self.max_coordinate);
        }
    }

    /// Largest allowed delta for a value range of `range`, at least 1.
    fn span(&self, range: f64) -> i64 {
        ((range * self.mutation_strength) as i64).max(1)
    }
}

fn shift(value: i64, delta: i64, max: i64) -> i64 {
    (value + delta).clamp(0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters() {
        assert!(Mutator::new(1.5, 0.1, 0.0, 10).is_err());
        assert!(Mutator::new(0.1, 0.0, 0.0, 10).is_err());
        assert!(Mutator::new(0.1, 0.1, -0.5, 10).is_err());
        assert!(Mutator::new(0.1, 0.1, 0.1, 0).is_err());
        assert!(Mutator::new(0.0, 1.0, 1.0, 1).is_ok());
    }

    #[test]
    fn test_zero_rates_leave_genes_alone() {
        let mutator = Mutator::new(0.0, 0.5, 0.0, 20).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let original = Individual::random_with(&mut rng, 6, 20);
        let mut child = original.clone();

        mutator.mutate_individual(&mut child, &mut rng);

        assert_eq!(child, original);
    }

    #[test]
    fn test_full_rate_changes_genes_within_bounds() {
        let mutator = Mutator::new(1.0, 1.0, 1.0, 16).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut children: Vec<Individual> = (0..20)
            .map(|_| Individual::random_with(&mut rng, 10, 16))
            .collect();
        let before = children.clone();

        for _ in 0..50 {
            mutator.mutate(&mut children, &mut rng);
        }

        for (child, original) in children.iter().zip(&before) {
            assert_eq!(child.len(), 10);
            assert!(child.is_within(16));
            assert_ne!(child, original);
        }
    }

    #[test]
    fn test_mutation_drops_cached_fitness() {
        struct Constant;
        impl crate::evolution::Challenge for Constant {
            fn score(&self, _: &Individual) -> f64 {
                0.5
            }
        }

        let mutator = Mutator::new(1.0, 0.1, 0.0, 10).unwrap();
        let mut child = Individual::random(3, 10);
        child.evaluate(&Constant);

        mutator.mutate_individual(&mut child, &mut RandomNumberGenerator::new());

        assert!(!child.is_evaluated());
    }

    #[test]
    fn test_swap_only_permutes_genes() {
        let mutator = Mutator::new(0.0, 0.1, 1.0, 10).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(6);
        let original = Individual::random_with(&mut rng, 2, 10);
        let mut child = original.clone();

        mutator.mutate_individual(&mut child, &mut rng);

        assert_eq!(child.triangles()[0], original.triangles()[1]);
        assert_eq!(child.triangles()[1], original.triangles()[0]);
    }

    #[test]
    fn test_shift_clamps() {
        assert_eq!(shift(3, -10, 255), 0);
        assert_eq!(shift(250, 10, 255), 255);
        assert_eq!(shift(7, 2, 255), 9);
    }
}
