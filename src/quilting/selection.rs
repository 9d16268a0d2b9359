//! Block selection strategies and the CPU candidate-error backend
//!
//! Weighted selection ranks candidate source origins by how well their overlap
//! strips match what is already on the canvas. Ranking is computed by a
//! [`CandidateEvaluator`]; this module provides the CPU implementation and the
//! GPU one lives in [`crate::gpu::evaluator`]. Both produce an [`ErrorMap`]
//! over the same candidate lattice so the final choice is shared.

use crate::io::error::Result;
use crate::quilting::cost::difference_between;
use crate::spatial::{Extent, PixelBuffer, Point, Rect};
use rand::Rng;

/// Overlap strips a grid slot shares with already placed blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateQuery {
    /// Canvas position of the slot being filled
    pub block_origin: Point,
    /// Size of every block
    pub block_size: Extent,
    /// Top strip (`block.width × overlap.height`) when a block sits above
    pub top: Option<Extent>,
    /// Left strip (`overlap.width × block.height`) when a block sits to the left
    pub left: Option<Extent>,
    /// Spacing of the candidate origin lattice
    pub stride: u32,
}

impl CandidateQuery {
    /// Query for the slot at `block_origin` given the overlap and neighbours
    pub const fn new(
        block_origin: Point,
        block_size: Extent,
        overlap: Extent,
        stride: u32,
    ) -> Self {
        let top = if block_origin.y > 0 {
            Some(Extent::new(block_size.width, overlap.height))
        } else {
            None
        };
        let left = if block_origin.x > 0 {
            Some(Extent::new(overlap.width, block_size.height))
        } else {
            None
        };
        Self {
            block_origin,
            block_size,
            top,
            left,
            stride,
        }
    }

    /// Height of the top strip, zero without a top neighbour
    pub fn top_rows(&self) -> u32 {
        self.top.map_or(0, |top| top.height)
    }

    /// Pixels compared per candidate, shared corner counted once
    pub fn compared_pixels(&self) -> usize {
        let top = self.top.map_or(0, Extent::area);
        let left = self.left.map_or(0, |left| {
            Extent::new(left.width, left.height.saturating_sub(self.top_rows())).area()
        });
        top + left
    }

    /// Lattice dimensions for a source of the given size
    pub fn lattice(&self, source: Extent) -> Extent {
        let room = source.saturating_sub(self.block_size);
        let stride = self.stride.max(1);
        Extent::new(room.width / stride + 1, room.height / stride + 1)
    }
}

/// Mean overlap error of each candidate on a regular lattice of origins
///
/// Candidate `(i, j)` has its source origin at `(i * stride, j * stride)`.
/// Errors are mean RGB distances in 8-bit units, rounded to integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorMap {
    lattice: Extent,
    stride: u32,
    errors: Vec<u32>,
}

impl ErrorMap {
    /// Wrap row-major errors for a `lattice`-sized candidate grid
    ///
    /// Returns `None` when the error count does not match the lattice.
    pub fn new(lattice: Extent, stride: u32, errors: Vec<u32>) -> Option<Self> {
        (errors.len() == lattice.area()).then_some(Self {
            lattice,
            stride: stride.max(1),
            errors,
        })
    }

    /// Candidate grid dimensions
    pub const fn lattice(&self) -> Extent {
        self.lattice
    }

    /// Row-major candidate errors
    pub const fn errors(&self) -> &[u32] {
        self.errors.as_slice()
    }

    /// Number of candidates
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no candidate was evaluated
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Source origin of the candidate at a row-major index
    pub const fn origin(&self, index: usize) -> Point {
        let columns = self.lattice.width as usize;
        Point::new(
            (index % columns) as u32 * self.stride,
            (index / columns) as u32 * self.stride,
        )
    }
}

/// Computes candidate errors for weighted selection
///
/// Implementations must agree on the lattice and metric; they may differ in
/// floating-point rounding.
pub trait CandidateEvaluator {
    /// Prepare for a synthesis run over `source`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot accept the source image
    fn begin(&mut self, _source: &PixelBuffer) -> Result<()> {
        Ok(())
    }

    /// Evaluate every lattice candidate against the canvas
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to produce the error map
    fn evaluate(
        &mut self,
        source: &PixelBuffer,
        canvas: &PixelBuffer,
        query: &CandidateQuery,
    ) -> Result<ErrorMap>;
}

/// Candidate evaluation through the cost map builder
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuEvaluator;

impl CpuEvaluator {
    /// Mean overlap error of one candidate origin
    pub fn candidate_error(
        source: &PixelBuffer,
        canvas: &PixelBuffer,
        query: &CandidateQuery,
        candidate: Point,
    ) -> u32 {
        let count = query.compared_pixels();
        if count == 0 {
            return 0;
        }

        let mut total = 0.0;
        if let Some(top) = query.top {
            total += difference_between(canvas, query.block_origin, source, candidate, top).total();
        }
        if let Some(left) = query.left {
            // Rows already covered by the top strip are skipped
            let skip = query.top_rows().min(left.height);
            let strip = Rect::new(
                Point::new(0, skip),
                Extent::new(left.width, left.height - skip),
            );
            total += difference_between(
                canvas,
                query.block_origin + strip.origin,
                source,
                candidate + strip.origin,
                strip.size,
            )
            .total();
        }

        (total / count as f64).round() as u32
    }
}

impl CandidateEvaluator for CpuEvaluator {
    fn evaluate(
        &mut self,
        source: &PixelBuffer,
        canvas: &PixelBuffer,
        query: &CandidateQuery,
    ) -> Result<ErrorMap> {
        let lattice = query.lattice(source.extent());
        let stride = query.stride.max(1);
        let mut errors = Vec::with_capacity(lattice.area());
        for j in 0..lattice.height {
            for i in 0..lattice.width {
                let candidate = Point::new(i * stride, j * stride);
                errors.push(Self::candidate_error(source, canvas, query, candidate));
            }
        }
        ErrorMap::new(lattice, stride, errors).ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "search_stride",
                &stride,
                &"candidate lattice does not match the evaluated errors",
            )
        })
    }
}

/// Uniformly random block origin fully inside the source
pub fn select_random<R: Rng + ?Sized>(rng: &mut R, source: Extent, block: Extent) -> Point {
    let room = source.saturating_sub(block);
    Point::new(
        rng.random_range(0..=room.width),
        rng.random_range(0..=room.height),
    )
}

/// Pick uniformly among the lowest-error `selection_span` fraction of candidates
///
/// Candidates are ranked by error with ties broken by lattice index. A span of
/// zero always returns the best candidate. Returns `None` for an empty map.
pub fn select_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    errors: &ErrorMap,
    selection_span: f32,
) -> Option<Point> {
    if errors.is_empty() {
        return None;
    }

    let mut ranked: Vec<usize> = (0..errors.len()).collect();
    ranked.sort_by_key(|&index| errors.errors().get(index).copied().unwrap_or(u32::MAX));

    let span = f64::from(selection_span.clamp(0.0, 1.0));
    let last_eligible = ((ranked.len() as f64 * span) as usize).min(ranked.len() - 1);
    let pick = rng.random_range(0..=last_eligible);

    ranked.get(pick).map(|&index| errors.origin(index))
}
