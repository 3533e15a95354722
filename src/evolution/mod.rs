pub mod builder;
pub mod challenge;
pub mod launcher;
pub mod options;

pub use builder::EvolutionLauncherBuilder;
pub use challenge::{Challenge, ImageChallenge};
pub use launcher::{EvolutionLauncher, EvolutionResult};
pub use options::{CrossoverKind, EvolutionOptions, LogLevel, ReplacementKind, SelectionKind};
