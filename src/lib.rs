//! Texture synthesis by image quilting
//!
//! Blocks sampled from a source image are arranged on an overlapping grid and
//! stitched together along minimum-error boundary cuts, producing a larger
//! image with the look of the source. Candidate blocks can be ranked on the
//! CPU or, through wgpu, on the graphics device.

#![forbid(unsafe_code)]

/// Hardware-accelerated candidate evaluation
pub mod gpu;
/// Input/output operations, configuration and error handling
pub mod io;
/// Cost maps, seams, block selection and quilt synthesis
pub mod quilting;
/// Pixel buffers and integer geometry
pub mod spatial;

pub use io::error::{QuiltError, Result};
pub use quilting::{BlockPlacement, BlockSelection, Quilt, Quilter, Settings, quilt, try_quilt};
pub use spatial::{Extent, PixelBuffer, Point, Rect};
