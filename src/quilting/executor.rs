//! Block-by-block quilt synthesis
//!
//! A run validates its [`Settings`], places `quilt_size` blocks in row-major
//! order on a transparent canvas, stitches each new block into its
//! neighbours along minimum-error seams and finally applies the seam overlay
//! and the tileable crop.

use crate::gpu::{GpuContext, GpuEvaluator};
use crate::io::error::{QuiltError, Result};
use crate::quilting::cost::overlap_cost;
use crate::quilting::seam::{SeamPath, Traversal, find_seam, path_cost};
use crate::quilting::selection::{
    CandidateEvaluator, CandidateQuery, CpuEvaluator, select_random, select_weighted,
};
use crate::quilting::settings::{BlockSelection, Settings};
use crate::quilting::stitch::{blend_seam, cut_along_seam, paint_difference, record_seam};
use crate::spatial::{Extent, PixelBuffer, Point, Rect};
use rand::{SeedableRng, rngs::StdRng};

/// Where one grid cell's block came from and where it landed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPlacement {
    /// Grid column
    pub column: u32,
    /// Grid row
    pub row: u32,
    /// Top-left corner of the block on the uncropped canvas
    pub canvas_origin: Point,
    /// Top-left corner of the sampled source rectangle
    pub source_origin: Point,
}

/// Result of a successful run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quilt {
    /// Synthesized image, already cropped when tiling
    pub image: PixelBuffer,
    /// One entry per grid cell in row-major order
    pub placements: Vec<BlockPlacement>,
}

impl Quilt {
    /// Placement of the block at a grid cell
    pub fn placement(&self, column: u32, row: u32) -> Option<&BlockPlacement> {
        self.placements
            .iter()
            .find(|p| p.column == column && p.row == row)
    }
}

/// Reusable synthesis driver owning the candidate evaluators
///
/// A `Quilter` with a GPU evaluator keeps the compiled shader pipeline across
/// runs; create one per graphics context.
#[derive(Default)]
pub struct Quilter {
    cpu: CpuEvaluator,
    gpu: Option<GpuEvaluator>,
}

impl Quilter {
    /// Quilter evaluating candidates on the CPU only
    pub fn new() -> Self {
        Self::default()
    }

    /// Quilter that can evaluate candidates on the given device
    pub const fn with_gpu(context: GpuContext) -> Self {
        Self::with_gpu_evaluator(GpuEvaluator::new(context))
    }

    /// Quilter using an existing GPU evaluator
    pub const fn with_gpu_evaluator(evaluator: GpuEvaluator) -> Self {
        Self {
            cpu: CpuEvaluator,
            gpu: Some(evaluator),
        }
    }

    /// True when a GPU evaluator is attached
    pub const fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    /// Synthesize a quilt, returning an empty buffer on failure
    ///
    /// Failures are logged at warning level.
    pub fn quilt(&mut self, source: &PixelBuffer, settings: &Settings) -> PixelBuffer {
        match self.try_quilt(source, settings) {
            Ok(quilt) => quilt.image,
            Err(e) => {
                log::warn!("quilting rejected: {e}");
                PixelBuffer::default()
            }
        }
    }

    /// Synthesize a quilt and report every block placement
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings violate an invariant or do not fit the source
    /// - The GPU evaluator fails to produce candidate errors
    pub fn try_quilt(&mut self, source: &PixelBuffer, settings: &Settings) -> Result<Quilt> {
        settings.validate(source.extent())?;

        let use_gpu = settings.use_gpu_acceleration && self.gpu.is_some();
        if settings.use_gpu_acceleration && !use_gpu {
            log::warn!("GPU acceleration requested without a GPU evaluator, using CPU");
        }

        let evaluator: &mut dyn CandidateEvaluator = match (use_gpu, self.gpu.as_mut()) {
            (true, Some(gpu)) => gpu,
            _ => &mut self.cpu,
        };

        if let BlockSelection::Weighted { .. } = settings.block_selection {
            evaluator.begin(source)?;
        }

        log::info!(
            "quilting {} source into {} grid of {} blocks ({})",
            source.extent(),
            settings.quilt_size,
            settings.block_size,
            if use_gpu { "gpu" } else { "cpu" },
        );

        let mut run = Run::new(source, settings);
        for row in 0..settings.quilt_size.height {
            for column in 0..settings.quilt_size.width {
                run.place_block(column, row, evaluator)?;
            }
        }

        Ok(run.finish())
    }
}

/// Seams found while stitching one block, in block coordinates
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockSeams {
    /// Seam through the left overlap, crossing top to bottom
    pub left: Option<SeamPath>,
    /// Seam through the top overlap, crossing left to right
    pub top: Option<SeamPath>,
}

/// Join a block to the canvas content it overlaps
///
/// The left overlap is resolved before the top one: the top cost map is
/// measured on a block whose left strip has already been blended and cut.
/// Each overlap runs cost map, optional difference painting, optional log
/// scaling, seam search, blend and cut, in that order.
pub fn stitch_block(
    canvas: &PixelBuffer,
    block: &mut PixelBuffer,
    block_origin: Point,
    settings: &Settings,
) -> BlockSeams {
    let mut seams = BlockSeams::default();
    if block_origin.x > 0 {
        let left = Extent::new(settings.overlap.width, settings.block_size.height);
        seams.left = Some(stitch_overlap(
            canvas,
            block,
            Rect::new(block_origin, left),
            Traversal::TopToBottom,
            settings,
        ));
    }
    if block_origin.y > 0 {
        let top = Extent::new(settings.block_size.width, settings.overlap.height);
        seams.top = Some(stitch_overlap(
            canvas,
            block,
            Rect::new(block_origin, top),
            Traversal::LeftToRight,
            settings,
        ));
    }
    seams
}

fn stitch_overlap(
    canvas: &PixelBuffer,
    block: &mut PixelBuffer,
    overlap: Rect,
    traversal: Traversal,
    settings: &Settings,
) -> SeamPath {
    let mut costs = overlap_cost(canvas, block, overlap);

    if settings.show_difference {
        paint_difference(block, &costs);
    }
    if settings.use_log_cost {
        costs.apply_log_scale();
    }

    let path = find_seam(&costs, traversal);
    log::trace!(
        "{traversal:?} seam at {} crosses {} cells, cost {:.2}",
        overlap.origin,
        path.len(),
        path_cost(&costs, &path)
    );

    if settings.blend_seams {
        blend_seam(block, canvas, overlap.origin, &path);
    }
    if settings.do_cut {
        cut_along_seam(block, overlap.size, &path, traversal);
    }
    path
}

/// Synthesize a quilt on the CPU, returning an empty buffer on failure
pub fn quilt(source: &PixelBuffer, settings: &Settings) -> PixelBuffer {
    Quilter::new().quilt(source, settings)
}

/// Synthesize a quilt on the CPU
///
/// # Errors
///
/// Returns an error if the settings are invalid for the source
pub fn try_quilt(source: &PixelBuffer, settings: &Settings) -> Result<Quilt> {
    Quilter::new().try_quilt(source, settings)
}

/// Mutable state of one synthesis call
struct Run<'a> {
    source: &'a PixelBuffer,
    settings: &'a Settings,
    rng: StdRng,
    canvas: PixelBuffer,
    seams: PixelBuffer,
    placements: Vec<BlockPlacement>,
}

impl<'a> Run<'a> {
    fn new(source: &'a PixelBuffer, settings: &'a Settings) -> Self {
        let canvas_size = settings.canvas_size();
        let seams = if settings.show_seams {
            PixelBuffer::new(canvas_size)
        } else {
            PixelBuffer::default()
        };
        Self {
            source,
            settings,
            rng: StdRng::seed_from_u64(settings.seed),
            canvas: PixelBuffer::new(canvas_size),
            seams,
            placements: Vec::with_capacity(settings.quilt_size.area()),
        }
    }

    fn place_block(
        &mut self,
        column: u32,
        row: u32,
        evaluator: &mut dyn CandidateEvaluator,
    ) -> Result<()> {
        let settings = self.settings;
        let canvas_origin = Point::scaled(settings.step(), column, row);
        let source_origin = self.choose_source(column, row, canvas_origin, evaluator)?;

        log::debug!("block ({column}, {row}) at {canvas_origin} from source {source_origin}");

        let mut block = self
            .source
            .copy_region(Rect::new(source_origin, settings.block_size));

        let seams = stitch_block(&self.canvas, &mut block, canvas_origin, settings);
        if settings.show_seams {
            for path in [&seams.left, &seams.top].into_iter().flatten() {
                record_seam(&mut self.seams, canvas_origin, path);
            }
        }

        self.canvas.composite(&block, canvas_origin);
        self.placements.push(BlockPlacement {
            column,
            row,
            canvas_origin,
            source_origin,
        });
        Ok(())
    }

    fn choose_source(
        &mut self,
        column: u32,
        row: u32,
        canvas_origin: Point,
        evaluator: &mut dyn CandidateEvaluator,
    ) -> Result<Point> {
        let settings = self.settings;
        let quilt = settings.quilt_size;
        let last_column = column + 1 == quilt.width;
        let last_row = row + 1 == quilt.height;

        if settings.make_tileable && (last_column || last_row) {
            // Wrap around so opposite edges share their source
            let anchor = if last_column { row * quilt.width } else { column };
            return self
                .placements
                .get(anchor as usize)
                .map(|p| p.source_origin)
                .ok_or_else(|| QuiltError::InvalidGeometry {
                    reason: format!("no placement recorded for wrap anchor {anchor}"),
                });
        }

        match settings.block_selection {
            BlockSelection::Random => Ok(self.random_origin()),
            BlockSelection::Weighted { .. } if column == 0 && row == 0 => Ok(self.random_origin()),
            BlockSelection::Weighted {
                search_stride,
                selection_span,
            } => {
                let query = CandidateQuery::new(
                    canvas_origin,
                    settings.block_size,
                    settings.overlap,
                    search_stride,
                );
                let errors = evaluator.evaluate(self.source, &self.canvas, &query)?;
                select_weighted(&mut self.rng, &errors, selection_span).ok_or_else(|| {
                    QuiltError::InvalidGeometry {
                        reason: format!("no candidate origins for block ({column}, {row})"),
                    }
                })
            }
        }
    }

    fn random_origin(&mut self) -> Point {
        select_random(
            &mut self.rng,
            self.source.extent(),
            self.settings.block_size,
        )
    }

    fn finish(mut self) -> Quilt {
        let settings = self.settings;
        if settings.show_seams {
            self.canvas.composite(&self.seams, Point::ZERO);
        }

        let image = if settings.make_tileable {
            let offset = Point::new(
                settings.block_size.width / 2,
                settings.block_size.height / 2,
            );
            self.canvas
                .copy_region(Rect::new(offset, settings.output_size()))
        } else {
            self.canvas
        };

        log::info!("quilt finished at {}", image.extent());

        Quilt {
            image,
            placements: self.placements,
        }
    }
}
