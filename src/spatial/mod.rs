//! Pixel storage and integer geometry
//!
//! This module contains the spatial building blocks every quilting pass uses:
//! - Points, extents and rectangles in pixel space
//! - The RGBA8 pixel buffer with region copy and compositing

/// RGBA8 pixel buffer
pub mod buffer;
/// Integer pixel-space geometry
pub mod geometry;

pub use buffer::PixelBuffer;
pub use geometry::{Extent, Point, Rect};
