use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};

use trivolve::{
    evolution::{Challenge, ImageChallenge},
    individual::Individual,
    render::{self, Viewport},
    rng::RandomNumberGenerator,
};

fn target(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let mut rng = RandomNumberGenerator::from_seed(1);

    for triangles in [10, 50, 200].iter() {
        let individual = Individual::random_with(&mut rng, *triangles, 256);
        let viewport = Viewport::new(128, 128);
        let mut pixmap = render::new_pixmap(128, 128).unwrap();

        group.bench_with_input(
            BenchmarkId::new("reused_pixmap", triangles),
            &individual,
            |b, individual| {
                b.iter(|| render::paint(&mut pixmap, black_box(individual.triangles()), black_box(&viewport)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("to_image", triangles),
            &individual,
            |b, individual| b.iter(|| black_box(individual).render(viewport).unwrap()),
        );
    }

    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");
    let mut rng = RandomNumberGenerator::from_seed(2);
    let individual = Individual::random_with(&mut rng, 50, 512);

    for quality in [1.0, 0.5, 0.25].iter() {
        let challenge = ImageChallenge::new(target(256), *quality).unwrap();

        group.bench_with_input(
            BenchmarkId::new("score", quality),
            &challenge,
            |b, challenge| b.iter(|| challenge.score(black_box(&individual))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_fitness);
criterion_main!(benches);
