//! Image quilting: overlap costs, seams, block selection and synthesis
//!
//! A quilt is built from square-ish blocks sampled from a source image and
//! laid on a grid with overlapping edges. Each new block is joined to its
//! neighbours along the cheapest seam through the overlap's cost map.

/// Per-pixel dissimilarity maps
pub mod cost;
/// Synthesis driver and run report
pub mod executor;
/// Minimum-error seam search
pub mod seam;
/// Block selection strategies and candidate evaluation
pub mod selection;
/// Synthesis parameters
pub mod settings;
/// Blending, cutting and drawing along seams
pub mod stitch;

pub use executor::{BlockPlacement, BlockSeams, Quilt, Quilter, quilt, stitch_block, try_quilt};
pub use settings::{BlockSelection, Settings};
