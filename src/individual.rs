//! # Individual
//!
//! An [`Individual`] is one candidate approximation of the target image: an
//! ordered, fixed-length sequence of colored [`Triangle`] genes. Later genes are
//! painted on top of earlier ones.
//!
//! Vertex coordinates live in full-resolution target pixel space and range over
//! `[0, max_coordinate)`, where `max_coordinate = max(2 * width, 2 * height)` of
//! the target, so shapes may reach past the canvas and cover it only partially.
//!
//! Fitness is a cached value. It is filled in by [`Individual::evaluate`] and is
//! dropped whenever the genes are touched through [`Individual::triangles_mut`]
//! or [`Individual::swap_triangles`].
//!
//! ## Example
//!
//! ```rust
//! use trivolve::individual::Individual;
//! use trivolve::render::Viewport;
//!
//! let individual = Individual::random(5, 64);
//! assert_eq!(individual.len(), 5);
//! assert!(individual.fitness().is_none());
//!
//! let image = individual.render(Viewport::new(32, 16)).unwrap();
//! assert_eq!(image.dimensions(), (32, 16));
//! ```

use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::evolution::Challenge;
use crate::error::Result;
use crate::render::{self, Viewport};
use crate::rng::ThreadLocalRng;

/// A triangle corner in gene space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub x: u32,
    pub y: u32,
}

impl Vertex {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One gene: three vertices and a straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: [u8; 4],
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], color: [u8; 4]) -> Self {
        Self { vertices, color }
    }

    /// Draws every vertex coordinate uniformly from `[0, max_coordinate)` and
    /// every color channel uniformly from `[0, 255]`.
    ///
    /// `max_coordinate` must be positive.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_coordinate: u32) -> Self {
        let mut vertex = || Vertex::new(rng.gen_range(0..max_coordinate), rng.gen_range(0..max_coordinate));
        let vertices = [vertex(), vertex(), vertex()];
        Self {
            vertices,
            color: rng.gen(),
        }
    }

    /// Returns `true` if every coordinate is below `max_coordinate`.
    pub fn is_within(&self, max_coordinate: u32) -> bool {
        self.vertices
            .iter()
            .all(|v| v.x < max_coordinate && v.y < max_coordinate)
    }
}

/// A candidate solution: exactly N triangles plus the cached fitness of that gene state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    triangles: Vec<Triangle>,
    #[serde(skip)]
    fitness: Option<f64>,
}

impl Individual {
    /// Wraps a gene sequence. The fitness starts out unevaluated.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            fitness: None,
        }
    }

    /// Builds an individual of `num_triangles` random genes using the calling
    /// thread's own RNG, so it can run on many workers at once without contention.
    pub fn random(num_triangles: usize, max_coordinate: u32) -> Self {
        Self::random_with(&mut ThreadLocalRng::rng(), num_triangles, max_coordinate)
    }

    /// Builds an individual of `num_triangles` random genes from `rng`.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, num_triangles: usize, max_coordinate: u32) -> Self {
        let triangles = (0..num_triangles)
            .map(|_| Triangle::random(&mut *rng, max_coordinate))
            .collect();
        Self::new(triangles)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Mutable access to the genes. The slice cannot change the chromosome
    /// length, and taking it drops the cached fitness.
    pub fn triangles_mut(&mut self) -> &mut [Triangle] {
        self.fitness = None;
        &mut self.triangles
    }

    /// Exchanges the paint order of two genes and drops the cached fitness.
    pub fn swap_triangles(&mut self, a: usize, b: usize) {
        self.fitness = None;
        self.triangles.swap(a, b);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The cached fitness, or `None` if the current genes were never scored.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Scores the individual against `challenge` unless a score for the current
    /// genes is already cached, and returns it.
    pub fn evaluate<C: Challenge + ?Sized>(&mut self, challenge: &C) -> f64 {
        match self.fitness {
            Some(score) => score,
            None => {
                let score = challenge.score(self);
                self.fitness = Some(score);
                score
            }
        }
    }

    /// Composites the genes, in order, onto a transparent raster of the viewport's size.
    pub fn render(&self, viewport: Viewport) -> Result<RgbaImage> {
        let mut pixmap = render::new_pixmap(viewport.width(), viewport.height())?;
        render::draw_triangles(&mut pixmap, &self.triangles, &viewport);
        Ok(render::to_image(&pixmap))
    }

    /// Returns `true` if every gene has its coordinates below `max_coordinate`.
    pub fn is_within(&self, max_coordinate: u32) -> bool {
        self.triangles.iter().all(|t| t.is_within(max_coordinate))
    }
}

/// Two individuals are equal when their genes are; the fitness cache is ignored.
impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.triangles == other.triangles
    }
}

/// Orders a slice by descending fitness. Unevaluated and NaN scores sort last.
pub fn sort_by_fitness_desc(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| {
        let a = a.fitness.filter(|f| !f.is_nan()).unwrap_or(f64::NEG_INFINITY);
        let b = b.fitness.filter(|f| !f.is_nan()).unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingChallenge {
        calls: AtomicUsize,
    }

    impl Challenge for CountingChallenge {
        fn score(&self, individual: &Individual) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            individual.len() as f64
        }
    }

    #[test]
    fn test_random_individual_respects_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let individual = Individual::random_with(&mut rng, 50, 20);

        assert_eq!(individual.len(), 50);
        assert!(individual.is_within(20));
    }

    #[test]
    fn test_random_on_thread_rng() {
        let individual = Individual::random(3, 8);
        assert_eq!(individual.len(), 3);
        assert!(individual.is_within(8));
    }

    #[test]
    fn test_fitness_is_cached_until_genes_change() {
        let challenge = CountingChallenge {
            calls: AtomicUsize::new(0),
        };
        let mut individual = Individual::random(4, 10);

        assert_eq!(individual.evaluate(&challenge), 4.0);
        assert_eq!(individual.evaluate(&challenge), 4.0);
        assert_eq!(challenge.calls.load(Ordering::SeqCst), 1);

        individual.triangles_mut()[0].color = [1, 2, 3, 4];
        assert!(!individual.is_evaluated());

        individual.evaluate(&challenge);
        assert_eq!(challenge.calls.load(Ordering::SeqCst), 2);

        individual.swap_triangles(0, 1);
        assert!(individual.fitness().is_none());
    }

    #[test]
    fn test_equality_ignores_fitness() {
        let challenge = CountingChallenge {
            calls: AtomicUsize::new(0),
        };
        let a = Individual::random(2, 10);
        let mut b = a.clone();
        b.evaluate(&challenge);

        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_by_fitness_desc_puts_unevaluated_last() {
        let mut individuals: Vec<Individual> = (0..4).map(|_| Individual::random(1, 4)).collect();
        individuals[0].fitness = Some(0.2);
        individuals[1].fitness = Some(0.9);
        individuals[3].fitness = Some(0.5);

        sort_by_fitness_desc(&mut individuals);

        assert_eq!(individuals[0].fitness(), Some(0.9));
        assert_eq!(individuals[1].fitness(), Some(0.5));
        assert_eq!(individuals[2].fitness(), Some(0.2));
        assert_eq!(individuals[3].fitness(), None);
    }
}
