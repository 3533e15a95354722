//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the configuration of one run: the target
//! image, chromosome and population sizes, the operator policies and their
//! parameters, and the logging level. Options are read from a JSON file or built
//! programmatically, and are validated before any evolution work starts.
//!
//! ## Example
//!
//! ```rust
//! use trivolve::evolution::options::{EvolutionOptions, LogLevel, SelectionKind};
//!
//! let options = EvolutionOptions::builder()
//!     .image_path("target.png")
//!     .triangles(50)
//!     .population(40)
//!     .max_generations(200)
//!     .selection(SelectionKind::Tournament)
//!     .log_level(LogLevel::Verbose)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.get_num_offspring(), 40);
//! ```
//!
//! A configuration file only needs the required keys:
//!
//! ```json
//! {
//!     "triangles": 50,
//!     "image_path": "target.png",
//!     "population": 40,
//!     "quality_factor": 0.5,
//!     "continue_latest": true,
//!     "max_generations": 1000
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GeneticError, Result};

/// How much progress the generation loop reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every generation, with mean fitness and pool sizes.
    Verbose,
    /// Every improvement of the best fitness.
    #[default]
    Minimal,
    /// Nothing per generation.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Elitist,
    Tournament,
    Roulette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    #[default]
    Uniform,
    SinglePoint,
    Blend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementKind {
    #[default]
    Elitist,
    Full,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_selection_rate() -> f64 {
    0.5
}

fn default_tournament_size() -> usize {
    3
}

fn default_mutation_rate() -> f64 {
    0.05
}

fn default_mutation_strength() -> f64 {
    0.1
}

fn default_swap_probability() -> f64 {
    0.05
}

fn default_elite_count() -> usize {
    1
}

fn default_parallel_threshold() -> usize {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOptions {
    triangles: usize,
    image_path: PathBuf,
    population: usize,
    quality_factor: f64,
    continue_latest: bool,
    max_generations: usize,

    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default)]
    selection: SelectionKind,
    #[serde(default = "default_selection_rate")]
    selection_rate: f64,
    #[serde(default = "default_tournament_size")]
    tournament_size: usize,
    #[serde(default)]
    crossover: CrossoverKind,
    /// Children bred per generation; the population size when absent.
    #[serde(default)]
    offspring: Option<usize>,
    #[serde(default = "default_mutation_rate")]
    mutation_rate: f64,
    #[serde(default = "default_mutation_strength")]
    mutation_strength: f64,
    #[serde(default = "default_swap_probability")]
    swap_probability: f64,
    #[serde(default)]
    replacement: ReplacementKind,
    #[serde(default = "default_elite_count")]
    elite_count: usize,
    /// Minimum batch size for parallel fitness evaluation
    #[serde(default = "default_parallel_threshold")]
    parallel_threshold: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_level: LogLevel,
}

impl EvolutionOptions {
    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read, is not valid
    /// JSON, misses a required key or holds an out-of-range value.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            GeneticError::Configuration(format!(
                "Cannot read configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            GeneticError::Configuration(msg) => {
                GeneticError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)
            .map_err(|e| GeneticError::Configuration(format!("Invalid configuration: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Checks every option against its allowed range.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(GeneticError::Configuration(msg));
        let probability = |value: f64| (0.0..=1.0).contains(&value);
        let fraction = |value: f64| value > 0.0 && value <= 1.0;

        if self.triangles == 0 {
            return fail("Number of triangles must be positive".to_string());
        }
        if self.population == 0 {
            return fail("Population size cannot be zero".to_string());
        }
        if self.max_generations == 0 {
            return fail("Number of generations must be positive".to_string());
        }
        if !fraction(self.quality_factor) {
            return fail(format!(
                "Quality factor must be in (0, 1], got {}",
                self.quality_factor
            ));
        }
        if self.image_path.as_os_str().is_empty() {
            return fail("Image path must not be empty".to_string());
        }
        if !fraction(self.selection_rate) {
            return fail(format!(
                "Selection rate must be in (0, 1], got {}",
                self.selection_rate
            ));
        }
        if self.tournament_size == 0 {
            return fail("Tournament size must be at least 1".to_string());
        }
        if self.offspring == Some(0) {
            return fail("Number of offspring cannot be zero".to_string());
        }
        if !probability(self.mutation_rate) {
            return fail(format!(
                "Mutation rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if !fraction(self.mutation_strength) {
            return fail(format!(
                "Mutation strength must be in (0, 1], got {}",
                self.mutation_strength
            ));
        }
        if !probability(self.swap_probability) {
            return fail(format!(
                "Swap probability must be in [0, 1], got {}",
                self.swap_probability
            ));
        }
        if self.elite_count > self.population {
            return fail(format!(
                "Elite count {} exceeds population size {}",
                self.elite_count, self.population
            ));
        }

        Ok(())
    }

    pub fn get_num_triangles(&self) -> usize {
        self.triangles
    }

    pub fn get_image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn get_population_size(&self) -> usize {
        self.population
    }

    pub fn get_quality_factor(&self) -> f64 {
        self.quality_factor
    }

    pub fn get_continue_latest(&self) -> bool {
        self.continue_latest
    }

    pub fn get_num_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn get_selection(&self) -> SelectionKind {
        self.selection
    }

    pub fn get_selection_rate(&self) -> f64 {
        self.selection_rate
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_crossover(&self) -> CrossoverKind {
        self.crossover
    }

    /// Children bred per generation.
    pub fn get_num_offspring(&self) -> usize {
        self.offspring.unwrap_or(self.population)
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_mutation_strength(&self) -> f64 {
        self.mutation_strength
    }

    pub fn get_swap_probability(&self) -> f64 {
        self.swap_probability
    }

    pub fn get_replacement(&self) -> ReplacementKind {
        self.replacement
    }

    pub fn get_elite_count(&self) -> usize {
        self.elite_count
    }

    /// Returns the minimum number of individuals scored in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Sets the number of generations.
    pub fn set_num_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// This provides a more flexible way to configure evolution options
    /// with a fluent interface.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

/// Builder for `EvolutionOptions`.
///
/// Every option except the image path has a default; `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    triangles: Option<usize>,
    image_path: Option<PathBuf>,
    population: Option<usize>,
    quality_factor: Option<f64>,
    continue_latest: Option<bool>,
    max_generations: Option<usize>,
    output_dir: Option<PathBuf>,
    selection: Option<SelectionKind>,
    selection_rate: Option<f64>,
    tournament_size: Option<usize>,
    crossover: Option<CrossoverKind>,
    offspring: Option<usize>,
    mutation_rate: Option<f64>,
    mutation_strength: Option<f64>,
    swap_probability: Option<f64>,
    replacement: Option<ReplacementKind>,
    elite_count: Option<usize>,
    parallel_threshold: Option<usize>,
    seed: Option<u64>,
    log_level: Option<LogLevel>,
}

impl EvolutionOptionsBuilder {
    pub fn triangles(mut self, value: usize) -> Self {
        self.triangles = Some(value);
        self
    }

    pub fn image_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.image_path = Some(value.into());
        self
    }

    pub fn population(mut self, value: usize) -> Self {
        self.population = Some(value);
        self
    }

    pub fn quality_factor(mut self, value: f64) -> Self {
        self.quality_factor = Some(value);
        self
    }

    pub fn continue_latest(mut self, value: bool) -> Self {
        self.continue_latest = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn output_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(value.into());
        self
    }

    pub fn selection(mut self, value: SelectionKind) -> Self {
        self.selection = Some(value);
        self
    }

    pub fn selection_rate(mut self, value: f64) -> Self {
        self.selection_rate = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn crossover(mut self, value: CrossoverKind) -> Self {
        self.crossover = Some(value);
        self
    }

    pub fn offspring(mut self, value: usize) -> Self {
        self.offspring = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn mutation_strength(mut self, value: f64) -> Self {
        self.mutation_strength = Some(value);
        self
    }

    pub fn swap_probability(mut self, value: f64) -> Self {
        self.swap_probability = Some(value);
        self
    }

    pub fn replacement(mut self, value: ReplacementKind) -> Self {
        self.replacement = Some(value);
        self
    }

    pub fn elite_count(mut self, value: usize) -> Self {
        self.elite_count = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds and validates the `EvolutionOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no image path was given or if an option
    /// is out of range.
    pub fn build(self) -> Result<EvolutionOptions> {
        let image_path = self.image_path.ok_or_else(|| {
            GeneticError::Configuration("Image path not specified".to_string())
        })?;

        let options = EvolutionOptions {
            triangles: self.triangles.unwrap_or(50),
            image_path,
            population: self.population.unwrap_or(50),
            quality_factor: self.quality_factor.unwrap_or(1.0),
            continue_latest: self.continue_latest.unwrap_or(false),
            max_generations: self.max_generations.unwrap_or(100),
            output_dir: self.output_dir.unwrap_or_else(default_output_dir),
            selection: self.selection.unwrap_or_default(),
            selection_rate: self.selection_rate.unwrap_or_else(default_selection_rate),
            tournament_size: self.tournament_size.unwrap_or_else(default_tournament_size),
            crossover: self.crossover.unwrap_or_default(),
            offspring: self.offspring,
            mutation_rate: self.mutation_rate.unwrap_or_else(default_mutation_rate),
            mutation_strength: self
                .mutation_strength
                .unwrap_or_else(default_mutation_strength),
            swap_probability: self
                .swap_probability
                .unwrap_or_else(default_swap_probability),
            replacement: self.replacement.unwrap_or_default(),
            elite_count: self.elite_count.unwrap_or_else(default_elite_count),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or_else(default_parallel_threshold),
            seed: self.seed,
            log_level: self.log_level.unwrap_or_default(),
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "triangles": 25,
        "image_path": "images/target.png",
        "population": 30,
        "quality_factor": 0.5,
        "continue_latest": false,
        "max_generations": 400
    }"#;

    #[test]
    fn test_required_keys_and_defaults() {
        let options = EvolutionOptions::from_json_str(MINIMAL).unwrap();

        assert_eq!(options.get_num_triangles(), 25);
        assert_eq!(options.get_image_path(), Path::new("images/target.png"));
        assert_eq!(options.get_population_size(), 30);
        assert_eq!(options.get_num_generations(), 400);
        assert_eq!(options.get_output_dir(), Path::new("output"));
        assert_eq!(options.get_selection(), SelectionKind::Elitist);
        assert_eq!(options.get_crossover(), CrossoverKind::Uniform);
        assert_eq!(options.get_replacement(), ReplacementKind::Elitist);
        assert_eq!(options.get_num_offspring(), 30);
        assert_eq!(options.get_elite_count(), 1);
        assert_eq!(options.get_parallel_threshold(), 1000);
        assert_eq!(options.get_seed(), None);
        assert_eq!(options.get_log_level(), LogLevel::Minimal);
    }

    #[test]
    fn test_optional_keys() {
        let text = r#"{
            "triangles": 5, "image_path": "a.png", "population": 8,
            "quality_factor": 1.0, "continue_latest": true, "max_generations": 3,
            "selection": "tournament", "crossover": "single_point",
            "replacement": "full", "log_level": "verbose", "offspring": 12,
            "seed": 99
        }"#;
        let options = EvolutionOptions::from_json_str(text).unwrap();

        assert!(options.get_continue_latest());
        assert_eq!(options.get_selection(), SelectionKind::Tournament);
        assert_eq!(options.get_crossover(), CrossoverKind::SinglePoint);
        assert_eq!(options.get_replacement(), ReplacementKind::Full);
        assert_eq!(options.get_log_level(), LogLevel::Verbose);
        assert_eq!(options.get_num_offspring(), 12);
        assert_eq!(options.get_seed(), Some(99));
    }

    #[test]
    fn test_missing_required_key() {
        let text = r#"{ "triangles": 5, "image_path": "a.png" }"#;
        let result = EvolutionOptions::from_json_str(text);

        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_out_of_range_values() {
        let with = |key: &str, value: &str| {
            let mut json: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
            json[key] = serde_json::from_str(value).unwrap();
            EvolutionOptions::from_json_str(&json.to_string())
        };

        assert!(with("quality_factor", "0.0").is_err());
        assert!(with("quality_factor", "1.5").is_err());
        assert!(with("population", "0").is_err());
        assert!(with("triangles", "0").is_err());
        assert!(with("max_generations", "0").is_err());
        assert!(with("selection_rate", "0").is_err());
        assert!(with("mutation_rate", "2").is_err());
        assert!(with("elite_count", "31").is_err());
        assert!(with("offspring", "0").is_err());
        assert!(with("selection", "\"rank\"").is_err());
        assert!(with("elite_count", "30").is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, MINIMAL).unwrap();

        let options = EvolutionOptions::from_json_file(&path).unwrap();
        assert_eq!(options.get_quality_factor(), 0.5);

        assert!(EvolutionOptions::from_json_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_builder_requires_image_path() {
        assert!(EvolutionOptions::builder().build().is_err());

        let options = EvolutionOptions::builder()
            .image_path("x.png")
            .population(10)
            .offspring(4)
            .build()
            .unwrap();
        assert_eq!(options.get_num_offspring(), 4);
        assert_eq!(options.get_num_triangles(), 50);
    }
}
