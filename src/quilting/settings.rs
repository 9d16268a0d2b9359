//! Synthesis parameters and their validation

use crate::io::configuration::{
    DEFAULT_BLOCK_SIZE, DEFAULT_OVERLAP_DIVISOR, DEFAULT_QUILT_SIZE, DEFAULT_SEARCH_STRIDE,
    DEFAULT_SEED, DEFAULT_SELECTION_SPAN,
};
use crate::io::error::{QuiltError, Result, invalid_parameter};
use crate::spatial::Extent;

/// Strategy used to choose the source rectangle for each grid cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlockSelection {
    /// Uniformly random origin inside the source
    Random,
    /// Rank candidates by overlap error and pick among the best
    Weighted {
        /// Spacing of the candidate origin lattice, at least 1
        search_stride: u32,
        /// Fraction of best-ranked candidates eligible, in `[0, 1]`
        selection_span: f32,
    },
}

impl Default for BlockSelection {
    fn default() -> Self {
        Self::Weighted {
            search_stride: DEFAULT_SEARCH_STRIDE,
            selection_span: DEFAULT_SELECTION_SPAN,
        }
    }
}

/// Complete parameter set for one quilting run
#[derive(Clone, Debug, PartialEq)]
// Each flag toggles an independent pass; a bitflag type would only obscure the call sites
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    /// Seed for the run's random engine
    pub seed: u64,
    /// Size of each sampled block
    pub block_size: Extent,
    /// Width of the left overlap and height of the top overlap
    pub overlap: Extent,
    /// Number of blocks placed along each axis
    pub quilt_size: Extent,
    /// Discard the old side of each seam before compositing
    pub do_cut: bool,
    /// Paint every seam over the final canvas
    pub show_seams: bool,
    /// Average canvas and block pixels along each seam
    pub blend_seams: bool,
    /// Compress seam costs with a natural logarithm
    pub use_log_cost: bool,
    /// Produce an output whose opposite edges continue each other
    pub make_tileable: bool,
    /// Replace overlap regions with a grayscale rendering of their cost map
    pub show_difference: bool,
    /// Evaluate weighted candidates on the graphics device
    pub use_gpu_acceleration: bool,
    /// Block selection strategy
    pub block_selection: BlockSelection,
}

impl Default for Settings {
    fn default() -> Self {
        let block_size = Extent::square(DEFAULT_BLOCK_SIZE);
        Self {
            seed: DEFAULT_SEED,
            block_size,
            overlap: Extent::new(
                block_size.width / DEFAULT_OVERLAP_DIVISOR,
                block_size.height / DEFAULT_OVERLAP_DIVISOR,
            ),
            quilt_size: Extent::square(DEFAULT_QUILT_SIZE),
            do_cut: true,
            show_seams: false,
            blend_seams: false,
            use_log_cost: true,
            make_tileable: false,
            show_difference: false,
            use_gpu_acceleration: false,
            block_selection: BlockSelection::default(),
        }
    }
}

impl Settings {
    /// Distance between the origins of neighbouring blocks
    pub const fn step(&self) -> Extent {
        self.block_size.saturating_sub(self.overlap)
    }

    /// Canvas size before any tileable crop, `None` when it overflows `u32`
    pub fn checked_canvas_size(&self) -> Option<Extent> {
        self.quilt_size
            .checked_scale(self.step())
            .and_then(|grid| grid.checked_add(self.overlap))
    }

    /// Canvas size before any tileable crop
    ///
    /// Saturates to `u32::MAX` on both axes when the canvas overflows;
    /// [`Settings::validate`] rejects such settings.
    pub fn canvas_size(&self) -> Extent {
        self.checked_canvas_size().unwrap_or(Extent::MAX)
    }

    /// Size of the image returned for these settings
    pub fn output_size(&self) -> Extent {
        if self.make_tileable {
            self.canvas_size().saturating_sub(self.block_size)
        } else {
            self.canvas_size()
        }
    }

    /// Check every invariant against a source image of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The block size is zero on either axis
    /// - The overlap is zero or not smaller than the block on either axis
    /// - The quilt has no blocks, or fewer than two per axis while tiling
    /// - The canvas does not fit in `u32` pixels per axis or in addressable memory
    /// - Weighted selection has a zero stride or a span outside `[0, 1]`
    /// - The block does not fit strictly inside the source
    pub fn validate(&self, source: Extent) -> Result<()> {
        if self.block_size.is_empty() {
            return Err(invalid_parameter(
                "block_size",
                &self.block_size,
                &"must be positive on both axes",
            ));
        }

        if self.overlap.is_empty() || !self.overlap.fits_strictly_within(self.block_size) {
            return Err(invalid_parameter(
                "overlap",
                &self.overlap,
                &format!("must be positive and smaller than block size {}", self.block_size),
            ));
        }

        if self.quilt_size.is_empty() {
            return Err(invalid_parameter(
                "quilt_size",
                &self.quilt_size,
                &"must place at least one block per axis",
            ));
        }

        if self.make_tileable && (self.quilt_size.width < 2 || self.quilt_size.height < 2) {
            return Err(invalid_parameter(
                "quilt_size",
                &self.quilt_size,
                &"tileable output needs at least two blocks per axis",
            ));
        }

        let canvas_bytes = self
            .checked_canvas_size()
            .and_then(|canvas| canvas.area().checked_mul(4));
        if canvas_bytes.is_none() {
            return Err(invalid_parameter(
                "quilt_size",
                &self.quilt_size,
                &format!(
                    "canvas for {} blocks of step {} overflows",
                    self.quilt_size,
                    self.step()
                ),
            ));
        }

        if let BlockSelection::Weighted {
            search_stride,
            selection_span,
        } = self.block_selection
        {
            if search_stride < 1 {
                return Err(invalid_parameter(
                    "search_stride",
                    &search_stride,
                    &"must be at least 1",
                ));
            }
            if !(0.0..=1.0).contains(&selection_span) {
                return Err(invalid_parameter(
                    "selection_span",
                    &selection_span,
                    &"must lie in [0, 1]",
                ));
            }
        }

        if !self.block_size.fits_strictly_within(source) {
            return Err(QuiltError::InvalidGeometry {
                reason: format!(
                    "block size {} must be smaller than source size {source}",
                    self.block_size
                ),
            });
        }

        Ok(())
    }
}
