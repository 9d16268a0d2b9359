//! Per-pixel dissimilarity maps between overlapping image regions

use crate::spatial::{Extent, PixelBuffer, Point, Rect};
use image::Rgba;
use ndarray::Array2;

/// Dense grid of non-negative costs, indexed `[[row, column]]`
#[derive(Clone, Debug, PartialEq)]
pub struct CostMap {
    values: Array2<f32>,
}

impl CostMap {
    /// Wrap an existing array of costs
    pub const fn from_array(values: Array2<f32>) -> Self {
        Self { values }
    }

    /// Map of the given size with every entry set to `cost`
    pub fn uniform(size: Extent, cost: f32) -> Self {
        Self {
            values: Array2::from_elem((size.height as usize, size.width as usize), cost),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// True when the map covers no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cost at a cell, `None` outside the map
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.values.get([y, x]).copied()
    }

    /// Underlying array
    pub const fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Sum of every entry
    pub fn total(&self) -> f64 {
        self.values.iter().map(|&v| f64::from(v)).sum()
    }

    /// Largest entry, zero for an empty map
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Replace every positive entry by its natural logarithm
    ///
    /// Entries at or below zero are kept as they are.
    pub fn apply_log_scale(&mut self) {
        self.values.mapv_inplace(|v| if v > 0.0 { v.ln() } else { v });
    }
}

/// Euclidean distance between the RGB parts of two pixels, in 8-bit units
pub fn rgb_distance(a: Rgba<u8>, b: Rgba<u8>) -> f32 {
    let dr = f32::from(a.0[0]) - f32::from(b.0[0]);
    let dg = f32::from(a.0[1]) - f32::from(b.0[1]);
    let db = f32::from(a.0[2]) - f32::from(b.0[2]);
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// Cost map between a canvas region and the same region of a block
///
/// `region.origin` is the block's position on the canvas; the block itself is
/// read from its own origin. Used for seam search over an overlap strip.
pub fn overlap_cost(canvas: &PixelBuffer, block: &PixelBuffer, region: Rect) -> CostMap {
    difference_between(canvas, region.origin, block, Point::ZERO, region.size)
}

/// Cost map comparing `size` pixels of `a` at `a_origin` with `b` at `b_origin`
///
/// Pixels falling outside either image contribute zero cost.
pub fn difference_between(
    a: &PixelBuffer,
    a_origin: Point,
    b: &PixelBuffer,
    b_origin: Point,
    size: Extent,
) -> CostMap {
    let mut values = Array2::zeros((size.height as usize, size.width as usize));
    for ((row, col), cost) in values.indexed_iter_mut() {
        let offset = Point::new(col as u32, row as u32);
        if let (Some(pa), Some(pb)) = (a.pixel(a_origin + offset), b.pixel(b_origin + offset)) {
            *cost = rgb_distance(pa, pb);
        }
    }
    CostMap { values }
}

/// Render a cost map as opaque grayscale, normalized by its maximum
///
/// A map whose maximum is zero renders as black.
pub fn render_difference(costs: &CostMap) -> PixelBuffer {
    let size = Extent::new(costs.width() as u32, costs.height() as u32);
    let mut rendered = PixelBuffer::filled(size, [0, 0, 0, 255]);
    let max = costs.max();
    if max <= 0.0 {
        return rendered;
    }
    for ((row, col), &cost) in costs.values().indexed_iter() {
        let level = (255.0 * cost / max).round() as u8;
        rendered.set_pixel(
            Point::new(col as u32, row as u32),
            Rgba([level, level, level, 255]),
        );
    }
    rendered
}
