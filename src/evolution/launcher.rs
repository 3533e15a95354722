use tracing::{debug, info};

use super::{
    challenge::ImageChallenge,
    options::{EvolutionOptions, LogLevel},
};
use crate::{
    checkpoint::{check_compatibility, CheckpointStore},
    crossover::CrossoverStrategy,
    error::{GeneticError, OptionExt, Result},
    generation::GenerationManager,
    imaging,
    individual::Individual,
    mutation::Mutator,
    output::OutputLayout,
    population::{self, evaluate_population, generate_random_population, normalize_population},
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};

/// Represents the result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best individual of the final population.
    pub best: Individual,
    /// The fitness score of `best`.
    pub score: f64,
    /// Best-of-generation fitness, one entry per generation.
    pub history: Vec<f64>,
}

/// Drives the generation loop: selection, snapshot of the best individual,
/// crossover, mutation and replacement, repeated for the configured number of
/// generations, with the final population checkpointed at the end.
///
/// Use [`EvolutionLauncherBuilder`](super::builder::EvolutionLauncherBuilder) to
/// assemble one.
#[derive(Debug)]
pub struct EvolutionLauncher {
    options: EvolutionOptions,
    challenge: ImageChallenge,
    selection: Box<dyn SelectionStrategy>,
    crossover: Box<dyn CrossoverStrategy>,
    mutator: Mutator,
    generations: GenerationManager,
    output: OutputLayout,
    checkpoints: CheckpointStore,
}

impl EvolutionLauncher {
    pub(crate) fn new(
        options: EvolutionOptions,
        challenge: ImageChallenge,
        selection: Box<dyn SelectionStrategy>,
        crossover: Box<dyn CrossoverStrategy>,
        mutator: Mutator,
        generations: GenerationManager,
    ) -> Self {
        let output = OutputLayout::new(options.get_output_dir());
        let checkpoints = CheckpointStore::new(output.checkpoint_path());
        Self {
            options,
            challenge,
            selection,
            crossover,
            mutator,
            generations,
            output,
            checkpoints,
        }
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn challenge(&self) -> &ImageChallenge {
        &self.challenge
    }

    pub fn output(&self) -> &OutputLayout {
        &self.output
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    /// Runs the evolution with a generator seeded from the `seed` option, or
    /// from entropy when there is none.
    pub fn evolve(&self) -> Result<EvolutionResult> {
        let mut rng = RandomNumberGenerator::from_optional_seed(self.options.get_seed());
        self.evolve_with_rng(&mut rng)
    }

    /// Runs the evolution.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The output directory cannot be created
    /// - A present checkpoint is unreadable or does not fit the run
    /// - The bootstrap workers fail
    /// - An operator fails in some generation
    /// - An artifact cannot be written
    pub fn evolve_with_rng(&self, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult> {
        let num_generations = self.options.get_num_generations();
        let num_offspring = self.options.get_num_offspring();
        let parallel_threshold = self.options.get_parallel_threshold();
        let log_level = self.options.get_log_level();
        let output_viewport = self.challenge.output_viewport();

        self.output.prepare()?;

        let mut population = self.initial_population()?;
        evaluate_population(&mut population, &self.challenge, parallel_threshold)?;

        let mut history = Vec::with_capacity(num_generations);
        let mut max_fitness = f64::NEG_INFINITY;

        for generation in 0..num_generations {
            let pool = self.selection.select(&population, rng).map_err(|e| {
                GeneticError::Evolution(format!(
                    "Selection failed in generation {}: {}",
                    generation, e
                ))
            })?;

            let best = pool.first().ok_or_else_genetic(|| {
                GeneticError::Evolution(format!(
                    "Selection returned an empty pool in generation {}",
                    generation
                ))
            })?;
            let score = best.fitness().ok_or_else_genetic(|| {
                GeneticError::FitnessCalculation(format!(
                    "Best individual of generation {} was not evaluated",
                    generation
                ))
            })?;
            history.push(score);

            imaging::save_png(
                &best.render(output_viewport)?,
                &self.output.generation_image(generation),
            )?;

            match log_level {
                LogLevel::Minimal => {
                    info!(generation, "Generation");
                    if score > max_fitness {
                        info!(generation, fitness = score, "New max fitness");
                    }
                }
                LogLevel::Verbose => {
                    info!(generation, "Generation");
                    if score > max_fitness {
                        info!(generation, fitness = score, "New max fitness");
                    }
                    debug!(
                        generation,
                        fitness = score,
                        mean = population::mean_fitness(&population).unwrap_or(0.0),
                        pool = pool.len(),
                        "Generation complete"
                    );
                }
                LogLevel::None => {}
            }
            max_fitness = max_fitness.max(score);

            let mut children = self
                .crossover
                .crossover(&pool, num_offspring, rng)
                .map_err(|e| {
                    GeneticError::Breeding(format!(
                        "Failed to breed children in generation {}: {}",
                        generation, e
                    ))
                })?;
            self.mutator.mutate(&mut children, rng);

            population = self
                .generations
                .next_generation(population, children, &self.challenge)?;
        }

        self.checkpoints.save(&population)?;

        let best = population::best(&population)?.clone();
        let score = best.fitness().ok_or_else_genetic(|| {
            GeneticError::Evolution("Final population was not evaluated".to_string())
        })?;

        Ok(EvolutionResult {
            best,
            score,
            history,
        })
    }

    /// The population generation 0 starts from: the checkpoint when resuming
    /// and one exists, fresh random individuals otherwise. Always exactly
    /// `population` individuals.
    fn initial_population(&self) -> Result<Vec<Individual>> {
        let size = self.options.get_population_size();
        let num_triangles = self.options.get_num_triangles();
        let max_coordinate = self.challenge.max_coordinate();

        if self.options.get_continue_latest() {
            if let Some(loaded) = self.checkpoints.load()? {
                check_compatibility(&loaded, num_triangles, max_coordinate)?;
                info!(loaded = loaded.len(), size, "Resuming from checkpoint");
                return normalize_population(loaded, size, num_triangles, max_coordinate);
            }
            info!(
                path = %self.checkpoints.path().display(),
                "No checkpoint to resume from, starting from a random population"
            );
        }

        debug!(size, num_triangles, max_coordinate, "Generating random population");
        generate_random_population(size, num_triangles, max_coordinate)
    }
}
