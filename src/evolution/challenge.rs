//! # Challenge
//!
//! A [`Challenge`] scores individuals; higher is better. [`ImageChallenge`] is the
//! rendering context every individual is scored against: the full-resolution
//! target kept for output, its working-resolution copy used for scoring, and the
//! gene-space bounds derived from the target size. It is built once before the
//! generation loop and only read afterwards.

use std::path::Path;

use image::RgbaImage;
use tracing::warn;

use crate::caching::ScratchCanvas;
use crate::error::{GeneticError, Result};
use crate::imaging;
use crate::individual::Individual;
use crate::render::{self, premultiplied_bytes, Viewport};

pub trait Challenge: Send + Sync {
    fn score(&self, individual: &Individual) -> f64;
}

/// Shared, read-only scoring context for one target image.
#[derive(Debug)]
pub struct ImageChallenge {
    source: RgbaImage,
    working: RgbaImage,
    target: Vec<u8>,
    working_viewport: Viewport,
    max_coordinate: u32,
    scratch: ScratchCanvas,
}

impl ImageChallenge {
    /// Builds the context from an already loaded target.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the image is empty or if
    /// `quality_factor` is outside `(0, 1]`.
    pub fn new(source: RgbaImage, quality_factor: f64) -> Result<Self> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(GeneticError::Configuration(
                "Target image must not be empty".to_string(),
            ));
        }
        if !(quality_factor > 0.0 && quality_factor <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Quality factor must be in (0, 1], got {}",
                quality_factor
            )));
        }

        let (block_width, block_height) = imaging::working_size(width, height, quality_factor);
        let working = imaging::resize(&source, block_width, block_height);
        let target = premultiplied_bytes(&working);
        // fail on an unallocatable raster here rather than during scoring
        render::new_pixmap(block_width, block_height)?;

        Ok(Self {
            working_viewport: Viewport::scaled(width, height, block_width, block_height),
            max_coordinate: imaging::max_coordinate(width, height),
            source,
            working,
            target,
            scratch: ScratchCanvas::new(),
        })
    }

    /// Loads the target from disk and builds the context.
    pub fn from_path(path: &Path, quality_factor: f64) -> Result<Self> {
        Self::new(imaging::load_target(path)?, quality_factor)
    }

    /// Exclusive upper bound of gene coordinates.
    pub fn max_coordinate(&self) -> u32 {
        self.max_coordinate
    }

    pub fn source_image(&self) -> &RgbaImage {
        &self.source
    }

    pub fn working_image(&self) -> &RgbaImage {
        &self.working
    }

    /// Viewport used for scoring.
    pub fn working_viewport(&self) -> Viewport {
        self.working_viewport
    }

    /// Viewport at the full target size, used for saved artifacts.
    pub fn output_viewport(&self) -> Viewport {
        Viewport::new(self.source.width(), self.source.height())
    }

    /// `1 - mean absolute difference` over the premultiplied RGBA bytes of
    /// `rendered` against the working target, normalized by 255. Lies in `[0, 1]`.
    pub fn similarity(&self, rendered: &[u8]) -> f64 {
        debug_assert_eq!(rendered.len(), self.target.len());
        if self.target.is_empty() {
            return 1.0;
        }
        let total: u64 = rendered
            .iter()
            .zip(&self.target)
            .map(|(a, b)| a.abs_diff(*b) as u64)
            .sum();
        1.0 - total as f64 / (self.target.len() as f64 * 255.0)
    }
}

impl Challenge for ImageChallenge {
    /// Returns NaN when no scratch raster is available; population evaluation
    /// reports that as a fitness error.
    fn score(&self, individual: &Individual) -> f64 {
        let viewport = self.working_viewport;
        let scored = self.scratch.with(viewport.width(), viewport.height(), |pixmap| {
            render::draw_triangles(pixmap, individual.triangles(), &viewport);
            self.similarity(pixmap.data())
        });
        match scored {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "Scoring raster unavailable");
                f64::NAN
            }
        }
    }
}
