use rand::Rng;

use super::CrossoverStrategy;
use crate::{
    individual::{Individual, Triangle, Vertex},
    rng::RandomNumberGenerator,
};

/// Interpolates every gene pair: each vertex coordinate and color channel of the
/// child lies between the parents' values, weighted by one random factor per gene.
///
/// The result of interpolating two in-range values is in range, so children need
/// no clamping.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendCrossover;

fn lerp(a: f64, b: f64, weight: f64) -> f64 {
    a * weight + b * (1.0 - weight)
}

fn blend_triangles(a: &Triangle, b: &Triangle, weight: f64) -> Triangle {
    let mut vertices = a.vertices;
    for (v, (va, vb)) in vertices.iter_mut().zip(a.vertices.iter().zip(&b.vertices)) {
        *v = Vertex::new(
            lerp(va.x as f64, vb.x as f64, weight).round() as u32,
            lerp(va.y as f64, vb.y as f64, weight).round() as u32,
        );
    }

    let mut color = a.color;
    for (c, (ca, cb)) in color.iter_mut().zip(a.color.iter().zip(&b.color)) {
        *c = lerp(*ca as f64, *cb as f64, weight).round() as u8;
    }

    Triangle::new(vertices, color)
}

impl CrossoverStrategy for BlendCrossover {
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
            .map(|(a, b)| blend_triangles(a, b, rng.gen::<f64>()))
            .collect();
        Individual::new(triangles)
    }
}
