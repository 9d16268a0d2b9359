//! Quilting defaults and output naming constants

/// Fixed seed for reproducible synthesis
pub const DEFAULT_SEED: u64 = 4830;

/// Default block edge length in pixels
pub const DEFAULT_BLOCK_SIZE: u32 = 90;

// Overlap is a fraction of the block; 1/6 keeps seams short relative to the block
/// Divisor applied to the block size to derive the default overlap
pub const DEFAULT_OVERLAP_DIVISOR: u32 = 6;

/// Default number of blocks placed along each axis
pub const DEFAULT_QUILT_SIZE: u32 = 4;

/// Default candidate lattice spacing for weighted selection
pub const DEFAULT_SEARCH_STRIDE: u32 = 3;

/// Default fraction of best-ranked candidates eligible for selection
pub const DEFAULT_SELECTION_SPAN: f32 = 0.1;

/// Colour used to paint seams when seam visualization is enabled
pub const SEAM_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Weight of the canvas pixel when blending along a seam
pub const SEAM_BLEND_FACTOR: f32 = 0.5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_quilt";

/// Width of the batch progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
