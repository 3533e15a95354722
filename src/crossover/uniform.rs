use rand::Rng;

use super::CrossoverStrategy;
use crate::{individual::Individual, rng::RandomNumberGenerator};

/// Takes each gene from either parent with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCrossover;

impl CrossoverStrategy for UniformCrossover {
    fn combine(
        &self,
        first: &Individual,
        second: &Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Individual {
        let triangles = first
            .triangles()
            .iter()
            .zip(second.triangles())
            .map(|(a, b)| if rng.gen_bool(0.5) { *a } else { *b })
            .collect();
        Individual::new(triangles)
    }
}
