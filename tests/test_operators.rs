use image::{Rgba, RgbaImage};
use trivolve::{
    crossover::{BlendCrossover, CrossoverStrategy, SinglePointCrossover, UniformCrossover},
    evolution::{Challenge, ImageChallenge},
    generation::{ElitistReplacement, FullReplacement, GenerationManager, ReplacementStrategy},
    individual::Individual,
    mutation::Mutator,
    population::{evaluate_population, generate_random_population, normalize_population},
    rng::RandomNumberGenerator,
    selection::{
        ElitistSelection, RouletteWheelSelection, SelectionStrategy, TournamentSelection,
    },
};

const TRIANGLES: usize = 6;

fn challenge() -> ImageChallenge {
    let target = RgbaImage::from_fn(12, 8, |x, y| Rgba([(x * 20) as u8, (y * 30) as u8, 90, 255]));
    ImageChallenge::new(target, 0.5).unwrap()
}

fn evaluated_population(challenge: &ImageChallenge, size: usize) -> Vec<Individual> {
    let mut population =
        generate_random_population(size, TRIANGLES, challenge.max_coordinate()).unwrap();
    evaluate_population(&mut population, challenge, 1000).unwrap();
    population
}

fn selections() -> Vec<Box<dyn SelectionStrategy>> {
    vec![
        Box::new(ElitistSelection::new(0.4).unwrap()),
        Box::new(TournamentSelection::new(3, 0.4).unwrap()),
        Box::new(RouletteWheelSelection::new(0.4).unwrap()),
    ]
}

#[test]
fn test_selection_pool_is_sorted_and_non_destructive() {
    let challenge = challenge();
    let population = evaluated_population(&challenge, 20);
    let before = population.clone();
    let mut rng = RandomNumberGenerator::from_seed(1);

    for selection in selections() {
        let pool = selection.select(&population, &mut rng).unwrap();

        assert_eq!(pool.len(), 8, "{:?}", selection);
        let scores: Vec<f64> = pool.iter().map(|i| i.fitness().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", selection);
        assert!(pool.iter().all(|i| population.contains(i)));
        assert_eq!(population, before);
    }
}

#[test]
fn test_elitist_pool_starts_with_population_best() {
    let challenge = challenge();
    let population = evaluated_population(&challenge, 15);
    let best = population
        .iter()
        .map(|i| i.fitness().unwrap())
        .fold(f64::NEG_INFINITY, f64::max);

    let pool = ElitistSelection::new(0.2)
        .unwrap()
        .select(&population, &mut RandomNumberGenerator::new())
        .unwrap();

    assert_eq!(pool[0].fitness(), Some(best));
}

#[test]
fn test_single_individual_population() {
    let challenge = challenge();
    let population = evaluated_population(&challenge, 1);
    let mut rng = RandomNumberGenerator::new();

    for selection in selections() {
        let pool = selection.select(&population, &mut rng).unwrap();
        assert_eq!(pool.len(), 1);
    }
}

#[test]
fn test_bred_and_mutated_children_keep_invariants() {
    let challenge = challenge();
    let max = challenge.max_coordinate();
    let population = evaluated_population(&challenge, 10);
    let mut rng = RandomNumberGenerator::from_seed(2);
    let mutator = Mutator::new(0.5, 0.3, 0.5, max).unwrap();
    let strategies: Vec<Box<dyn CrossoverStrategy>> = vec![
        Box::new(UniformCrossover),
        Box::new(SinglePointCrossover),
        Box::new(BlendCrossover),
    ];

    let pool = ElitistSelection::new(0.5)
        .unwrap()
        .select(&population, &mut rng)
        .unwrap();

    for strategy in strategies {
        for _ in 0..10 {
            let mut children = strategy.crossover(&pool, 13, &mut rng).unwrap();
            mutator.mutate(&mut children, &mut rng);

            assert_eq!(children.len(), 13);
            for child in &children {
                assert_eq!(child.len(), TRIANGLES);
                assert!(child.is_within(max));
                assert!(!child.is_evaluated());
            }
        }
    }
}

#[test]
fn test_next_generation_has_exact_size() {
    let challenge = challenge();
    let mut rng = RandomNumberGenerator::from_seed(3);
    let replacements: Vec<Box<dyn ReplacementStrategy>> = vec![
        Box::new(ElitistReplacement::new(2)),
        Box::new(FullReplacement),
    ];

    for replacement in replacements {
        let manager = GenerationManager::new(replacement, 10, 1000).unwrap();
        for offspring in [1, 4, 10, 25] {
            let population = evaluated_population(&challenge, 10);
            let pool = population[..5].to_vec();
            let children = UniformCrossover.crossover(&pool, offspring, &mut rng).unwrap();

            let next = manager
                .next_generation(population, children, &challenge)
                .unwrap();

            assert_eq!(next.len(), 10);
            assert!(next.iter().all(Individual::is_evaluated));
        }
    }
}

#[test]
fn test_elitist_replacement_never_loses_the_best() {
    let challenge = challenge();
    let mut rng = RandomNumberGenerator::from_seed(4);
    let selection = ElitistSelection::new(0.5).unwrap();
    let mutator = Mutator::new(0.3, 0.5, 0.1, challenge.max_coordinate()).unwrap();
    let manager = GenerationManager::new(Box::new(ElitistReplacement::new(1)), 12, 1000).unwrap();

    let mut population = evaluated_population(&challenge, 12);
    let mut best = f64::NEG_INFINITY;
    for _ in 0..15 {
        let pool = selection.select(&population, &mut rng).unwrap();
        let score = pool[0].fitness().unwrap();
        assert!(score >= best);
        best = score;

        let mut children = BlendCrossover.crossover(&pool, 12, &mut rng).unwrap();
        mutator.mutate(&mut children, &mut rng);
        population = manager
            .next_generation(population, children, &challenge)
            .unwrap();
    }
}

#[test]
fn test_normalization_pads_with_valid_individuals() {
    let challenge = challenge();
    let max = challenge.max_coordinate();
    let loaded = generate_random_population(3, TRIANGLES, max).unwrap();

    let padded = normalize_population(loaded.clone(), 8, TRIANGLES, max).unwrap();
    assert_eq!(padded.len(), 8);
    assert_eq!(&padded[..3], &loaded[..]);
    assert!(padded.iter().all(|i| i.len() == TRIANGLES && i.is_within(max)));

    let truncated = normalize_population(padded.clone(), 2, TRIANGLES, max).unwrap();
    assert_eq!(truncated, padded[..2].to_vec());
}

#[test]
fn test_scores_match_between_sequential_and_parallel_evaluation() {
    let challenge = challenge();
    let population = generate_random_population(16, TRIANGLES, challenge.max_coordinate()).unwrap();

    let mut sequential = population.clone();
    evaluate_population(&mut sequential, &challenge, usize::MAX).unwrap();
    let mut parallel = population;
    evaluate_population(&mut parallel, &challenge, 0).unwrap();

    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.fitness(), Some(challenge.score(a)));
    }
}
