use tracing::debug;

use super::{
    challenge::ImageChallenge,
    options::{CrossoverKind, EvolutionOptions, ReplacementKind, SelectionKind},
    EvolutionLauncher,
};
use crate::{
    crossover::{BlendCrossover, CrossoverStrategy, SinglePointCrossover, UniformCrossover},
    error::{GeneticError, Result},
    generation::{ElitistReplacement, FullReplacement, GenerationManager, ReplacementStrategy},
    mutation::Mutator,
    selection::{ElitistSelection, RouletteWheelSelection, SelectionStrategy, TournamentSelection},
};

/// Assembles an [`EvolutionLauncher`].
///
/// Only the options are required. The challenge is loaded from the configured
/// image unless one is supplied, and each strategy not supplied explicitly is
/// the one the options name.
#[derive(Debug, Default)]
pub struct EvolutionLauncherBuilder {
    options: Option<EvolutionOptions>,
    challenge: Option<ImageChallenge>,
    selection_strategy: Option<Box<dyn SelectionStrategy>>,
    crossover_strategy: Option<Box<dyn CrossoverStrategy>>,
    replacement_strategy: Option<Box<dyn ReplacementStrategy>>,
}

impl EvolutionLauncherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_challenge(mut self, challenge: ImageChallenge) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn with_selection_strategy(mut self, selection_strategy: Box<dyn SelectionStrategy>) -> Self {
        self.selection_strategy = Some(selection_strategy);
        self
    }

    pub fn with_crossover_strategy(mut self, crossover_strategy: Box<dyn CrossoverStrategy>) -> Self {
        self.crossover_strategy = Some(crossover_strategy);
        self
    }

    pub fn with_replacement_strategy(
        mut self,
        replacement_strategy: Box<dyn ReplacementStrategy>,
    ) -> Self {
        self.replacement_strategy = Some(replacement_strategy);
        self
    }

    pub fn build(self) -> Result<EvolutionLauncher> {
        let options = self
            .options
            .ok_or_else(|| GeneticError::Configuration("Evolution options not specified".to_string()))?;
        options.validate()?;

        let challenge = match self.challenge {
            Some(challenge) => challenge,
            None => ImageChallenge::from_path(options.get_image_path(), options.get_quality_factor())?,
        };
        debug!(
            width = challenge.source_image().width(),
            height = challenge.source_image().height(),
            working_width = challenge.working_viewport().width(),
            working_height = challenge.working_viewport().height(),
            max_coordinate = challenge.max_coordinate(),
            "Prepared rendering context"
        );

        let selection = match self.selection_strategy {
            Some(strategy) => strategy,
            None => selection_from_options(&options)?,
        };
        let crossover = self
            .crossover_strategy
            .unwrap_or_else(|| crossover_from_options(&options));
        let replacement = self
            .replacement_strategy
            .unwrap_or_else(|| replacement_from_options(&options));

        let mutator = Mutator::new(
            options.get_mutation_rate(),
            options.get_mutation_strength(),
            options.get_swap_probability(),
            challenge.max_coordinate(),
        )?;
        let generations = GenerationManager::new(
            replacement,
            options.get_population_size(),
            options.get_parallel_threshold(),
        )?;

        Ok(EvolutionLauncher::new(
            options,
            challenge,
            selection,
            crossover,
            mutator,
            generations,
        ))
    }
}

fn selection_from_options(options: &EvolutionOptions) -> Result<Box<dyn SelectionStrategy>> {
    let rate = options.get_selection_rate();
    Ok(match options.get_selection() {
        SelectionKind::Elitist => Box::new(ElitistSelection::new(rate)?),
        SelectionKind::Tournament => {
            Box::new(TournamentSelection::new(options.get_tournament_size(), rate)?)
        }
        SelectionKind::Roulette => Box::new(RouletteWheelSelection::new(rate)?),
    })
}

fn crossover_from_options(options: &EvolutionOptions) -> Box<dyn CrossoverStrategy> {
    match options.get_crossover() {
        CrossoverKind::Uniform => Box::new(UniformCrossover),
        CrossoverKind::SinglePoint => Box::new(SinglePointCrossover),
        CrossoverKind::Blend => Box::new(BlendCrossover),
    }
}

fn replacement_from_options(options: &EvolutionOptions) -> Box<dyn ReplacementStrategy> {
    match options.get_replacement() {
        ReplacementKind::Elitist => Box::new(ElitistReplacement::new(options.get_elite_count())),
        ReplacementKind::Full => Box::new(FullReplacement),
    }
}
