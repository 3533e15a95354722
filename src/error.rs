//! # Error Types
//!
//! This module defines the error type shared by every stage of the image
//! evolution engine. Configuration and resource problems surface as variants of
//! [`GeneticError`]; broken chromosome invariants are programming defects and are
//! asserted in tests instead of being modelled here.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use trivolve::error::{GeneticError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(GeneticError::EmptyPopulation);
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(0).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to foreign errors:
//!
//! ```rust
//! use trivolve::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_target(path: &str) -> Result<File> {
//!     File::open(path).context("Failed to open target image")
//! }
//!
//! assert!(open_target("/definitely/not/here.png").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use trivolve::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> trivolve::error::Result<f64> {
//!     scores
//!         .iter()
//!         .cloned()
//!         .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[0.2, 0.7]).unwrap(), 0.7);
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while evolving an image approximation.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when children cannot be bred from the selection pool.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// Error that occurs when the generation loop cannot proceed.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness value is missing or not a finite number.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when the random generation of individuals fails.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),

    /// Error that occurs when a checkpoint exists but cannot be used.
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when an image cannot be decoded or encoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error that occurs when JSON (config or checkpoint) cannot be processed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for the evolution engine.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use trivolve::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> trivolve::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error into a [`GeneticError::Other`] prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using a closure
    /// to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
