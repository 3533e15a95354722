//! # Checkpoint Store
//!
//! Persists a whole population so a long search can be paused and resumed. The
//! file is a JSON envelope carrying a format version and the individuals' genes;
//! cached fitness is not stored and is recomputed after loading.
//!
//! Saves go to a temporary sibling first and are then renamed over the previous
//! checkpoint, so an interrupted save leaves the old checkpoint intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GeneticError, Result};
use crate::individual::Individual;

/// Current checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Serialize)]
struct CheckpointRef<'a> {
    version: u32,
    individuals: &'a [Individual],
}

#[derive(Deserialize)]
struct CheckpointFile {
    version: u32,
    individuals: Vec<Individual>,
}

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `population`, replacing any previous checkpoint at this path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, population: &[Individual]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec(&CheckpointRef {
            version: CHECKPOINT_VERSION,
            individuals: population,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            individuals = population.len(),
            "Saved checkpoint"
        );
        Ok(())
    }

    /// Reads the stored population, or `None` if there is no checkpoint.
    ///
    /// # Errors
    ///
    /// Returns a checkpoint error if the file exists but cannot be read, parsed,
    /// or has an unknown format version.
    pub fn load(&self) -> Result<Option<Vec<Individual>>> {
        let payload = match fs::read(&self.path) {
            Ok(payload) => payload,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No checkpoint found");
                return Ok(None);
            }
            Err(e) => {
                return Err(GeneticError::Checkpoint(format!(
                    "Failed reading checkpoint {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let file: CheckpointFile = serde_json::from_slice(&payload).map_err(|e| {
            GeneticError::Checkpoint(format!(
                "Failed parsing checkpoint {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if file.version != CHECKPOINT_VERSION {
            return Err(GeneticError::Checkpoint(format!(
                "Checkpoint {} has format version {}, expected {}",
                self.path.display(),
                file.version,
                CHECKPOINT_VERSION
            )));
        }

        info!(
            path = %self.path.display(),
            individuals = file.individuals.len(),
            "Loaded checkpoint"
        );
        Ok(Some(file.individuals))
    }
}

/// Rejects a loaded population that does not fit the current run.
///
/// # Errors
///
/// Returns a checkpoint error naming the first individual whose gene count is
/// not `num_triangles` or whose coordinates reach `max_coordinate`.
pub fn check_compatibility(
    population: &[Individual],
    num_triangles: usize,
    max_coordinate: u32,
) -> Result<()> {
    for (idx, individual) in population.iter().enumerate() {
        if individual.len() != num_triangles {
            return Err(GeneticError::Checkpoint(format!(
                "Individual {} has {} triangles, the run uses {}",
                idx,
                individual.len(),
                num_triangles
            )));
        }
        if !individual.is_within(max_coordinate) {
            return Err(GeneticError::Checkpoint(format!(
                "Individual {} has coordinates outside [0, {})",
                idx, max_coordinate
            )));
        }
    }
    Ok(())
}
