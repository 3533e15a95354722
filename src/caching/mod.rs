//! # Caching Module
//!
//! Scoring an individual means rasterizing it at working resolution. Allocating a
//! fresh pixmap for every evaluation is wasteful, so each worker thread keeps its
//! own scratch [`Pixmap`] and reuses the allocation across evaluations.

use std::cell::RefCell;
use std::fmt;

use thread_local::ThreadLocal;
use tiny_skia::Pixmap;

use crate::error::Result;
use crate::render;

/// A per-thread pool of reusable pixmaps.
///
/// Every thread that calls [`ScratchCanvas::with`] gets its own pixmap, so
/// parallel fitness evaluation never contends on a shared buffer.
#[derive(Default)]
pub struct ScratchCanvas {
    pixmaps: ThreadLocal<RefCell<Pixmap>>,
}

impl fmt::Debug for ScratchCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchCanvas").finish_non_exhaustive()
    }
}

impl ScratchCanvas {
    /// Creates an empty pool. Pixmaps are allocated lazily per thread.
    pub fn new() -> Self {
        Self {
            pixmaps: ThreadLocal::new(),
        }
    }

    /// Runs `f` with this thread's pixmap, cleared to a transparent
    /// `width` x `height` raster.
    ///
    /// Must not be re-entered from inside `f` on the same thread.
    pub fn with<R, F>(&self, width: u32, height: u32, f: F) -> Result<R>
    where
        F: FnOnce(&mut Pixmap) -> R,
    {
        let cell = self
            .pixmaps
            .get_or_try(|| render::new_pixmap(width, height).map(RefCell::new))?;
        let mut pixmap = cell.borrow_mut();
        render::prepare(&mut pixmap, width, height)?;
        Ok(f(&mut pixmap))
    }
}
