//! Approximates a target image with a fixed number of translucent triangles by
//! evolving a population of candidate drawings.

pub mod caching;
pub mod checkpoint;
pub mod crossover;
pub mod error;
pub mod evolution;
pub mod generation;
pub mod imaging;
pub mod individual;
pub mod mutation;
pub mod output;
pub mod population;
pub mod render;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{EvolutionLauncher, EvolutionLauncherBuilder, EvolutionOptions, EvolutionResult};
pub use individual::{Individual, Triangle, Vertex};
