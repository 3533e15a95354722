//! Output directory bookkeeping: one PNG per generation plus the checkpoint,
//! all under a single directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};

const CHECKPOINT_FILE: &str = "latest.json";

#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory if it does not exist.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .context(format!("Cannot create output directory {}", self.dir.display()))
    }

    /// `<dir>/generation-<N>.png`
    pub fn generation_image(&self, generation: usize) -> PathBuf {
        self.dir.join(format!("generation-{}.png", generation))
    }

    /// `<dir>/latest.json`
    pub fn checkpoint_path(&self) -> PathBuf {
        self.dir.join(CHECKPOINT_FILE)
    }
}
