use rand::Rng;

use super::CrossoverStrategy;
use crate::{individual::Individual, rng::RandomNumberGenerator};

/// Cuts both chromosomes at one random position: the child takes the genes
/// before the cut from the first parent and the rest from the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointCrossover;

impl CrossoverStrategy for SinglePointCrossover {
    fn combine(
        &self,
        first: &Individual,
        second: &Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Individual {
        let len = first.len();
        let cut = rng.gen_range(0..=len);

        let mut triangles = Vec::with_capacity(len);
        triangles.extend_from_slice(&first.triangles()[..cut]);
        triangles.extend_from_slice(&second.triangles()[cut..]);
        Individual::new(triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_is_prefix_plus_suffix() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let first = Individual::random_with(&mut rng, 10, 40);
        let second = Individual::random_with(&mut rng, 10, 40);

        for _ in 0..10 {
            let child = SinglePointCrossover.combine(&first, &second, &mut rng);
            let cut = child
                .triangles()
                .iter()
                .zip(first.triangles())
                .take_while(|(c, f)| c == f)
                .count();

            assert_eq!(&child.triangles()[..cut], &first.triangles()[..cut]);
            assert_eq!(&child.triangles()[cut..], &second.triangles()[cut..]);
        }
    }

    #[test]
    fn test_empty_chromosomes() {
        let empty = Individual::new(Vec::new());
        let child = SinglePointCrossover.combine(&empty, &empty, &mut RandomNumberGenerator::new());

        assert!(child.is_empty());
    }
}
