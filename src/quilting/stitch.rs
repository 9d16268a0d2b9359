//! Applying a seam to a block: blending, cutting and seam overlay
//!
//! All three passes mutate buffers owned by the caller in place and run in the
//! order blend, cut, overlay. The cut never clears seam cells, so blended seam
//! pixels survive it.

use crate::io::configuration::{SEAM_BLEND_FACTOR, SEAM_COLOR};
use crate::quilting::cost::{CostMap, render_difference};
use crate::quilting::seam::Traversal;
use crate::spatial::buffer::{TRANSPARENT, lerp_color};
use crate::spatial::{Extent, PixelBuffer, Point, Rect};
use bitvec::prelude::*;
use image::Rgba;

const FILL_DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Mix canvas and block colours on every seam cell of the block
///
/// `block_origin` is where the block sits on the canvas; path cells are in
/// block coordinates.
pub fn blend_seam(
    block: &mut PixelBuffer,
    canvas: &PixelBuffer,
    block_origin: Point,
    path: &[Point],
) {
    for &cell in path {
        if let (Some(old), Some(new)) = (canvas.pixel(block_origin + cell), block.pixel(cell)) {
            block.set_pixel(cell, lerp_color(old, new, SEAM_BLEND_FACTOR));
        }
    }
}

/// Make the old side of a seam transparent
///
/// Flood-fills with 4-connectivity from the overlap's outer edge (left column
/// for a top-to-bottom seam, top row for a left-to-right seam), never
/// entering seam cells or leaving the `overlap` rectangle at the block's
/// origin. Seam cells themselves are kept.
pub fn cut_along_seam(
    block: &mut PixelBuffer,
    overlap: Extent,
    path: &[Point],
    traversal: Traversal,
) {
    let (width, height) = (overlap.width as usize, overlap.height as usize);
    if width == 0 || height == 0 {
        return;
    }

    let bounds = Rect::at_origin(overlap);
    let mut border = bitvec![0; width * height];
    for cell in path.iter().filter(|cell| bounds.contains(**cell)) {
        border.set(cell.y as usize * width + cell.x as usize, true);
    }

    let mut visited = bitvec![0; width * height];
    let mut pending: Vec<(usize, usize)> = match traversal {
        Traversal::TopToBottom => (0..height).map(|y| (0, y)).collect(),
        Traversal::LeftToRight => (0..width).map(|x| (x, 0)).collect(),
    };

    while let Some((x, y)) = pending.pop() {
        let index = y * width + x;
        if visited.get(index).as_deref() != Some(&false) {
            continue;
        }
        visited.set(index, true);
        if border.get(index).as_deref() == Some(&true) {
            continue;
        }

        block.set_pixel(Point::new(x as u32, y as u32), TRANSPARENT);

        for (dx, dy) in FILL_DIRECTIONS {
            if let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                && nx < width
                && ny < height
                && visited.get(ny * width + nx).as_deref() == Some(&false)
            {
                pending.push((nx, ny));
            }
        }
    }
}

/// Paint seam cells, offset to canvas space, into the seams layer
pub fn record_seam(seams: &mut PixelBuffer, block_origin: Point, path: &[Point]) {
    for &cell in path {
        seams.set_pixel(block_origin + cell, Rgba(SEAM_COLOR));
    }
}

/// Replace the overlap region of a block with a grayscale view of its costs
pub fn paint_difference(block: &mut PixelBuffer, costs: &CostMap) {
    block.composite(&render_difference(costs), Point::ZERO);
}
