//! Command-line interface for batch quilting of PNG files

use crate::gpu::GpuContext;
use crate::io::configuration::{
    DEFAULT_BLOCK_SIZE, DEFAULT_OVERLAP_DIVISOR, DEFAULT_QUILT_SIZE, DEFAULT_SEARCH_STRIDE,
    DEFAULT_SEED, DEFAULT_SELECTION_SPAN, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, path_error};
use crate::io::image::{load_source, save_quilt};
use crate::io::progress::ProgressManager;
use crate::quilting::{BlockSelection, Quilter, Settings};
use crate::spatial::Extent;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "imagequilt")]
#[command(
    author,
    version,
    about = "Synthesize larger textures from PNG samples by image quilting"
)]
/// Command-line arguments for the quilting tool
// Every flag maps onto an independent synthesis switch
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible synthesis
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Block width in pixels (also the height unless --block-height is given)
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u32,

    /// Block height in pixels
    #[arg(long)]
    pub block_height: Option<u32>,

    /// Overlap in pixels on both axes [default: block size / 6]
    #[arg(short, long)]
    pub overlap: Option<u32>,

    /// Blocks per row (also per column unless --quilt-height is given)
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUILT_SIZE)]
    pub quilt_size: u32,

    /// Blocks per column
    #[arg(long)]
    pub quilt_height: Option<u32>,

    /// Pick blocks uniformly at random instead of by overlap error
    #[arg(short, long)]
    pub random: bool,

    /// Candidate lattice spacing for weighted selection
    #[arg(long, default_value_t = DEFAULT_SEARCH_STRIDE)]
    pub search_stride: u32,

    /// Fraction of best candidates eligible for weighted selection
    #[arg(long, default_value_t = DEFAULT_SELECTION_SPAN)]
    pub selection_span: f32,

    /// Paste blocks without cutting along seams
    #[arg(long)]
    pub no_cut: bool,

    /// Draw seams in red over the output
    #[arg(long)]
    pub show_seams: bool,

    /// Average colours along seams
    #[arg(long)]
    pub blend_seams: bool,

    /// Search seams on raw distances instead of log-scaled ones
    #[arg(long)]
    pub linear_cost: bool,

    /// Produce an output that tiles seamlessly
    #[arg(short, long)]
    pub tileable: bool,

    /// Render overlap cost maps in grayscale
    #[arg(long)]
    pub show_difference: bool,

    /// Rank candidates on the graphics device
    #[arg(short, long)]
    pub gpu: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Synthesis settings described by the flags
    pub fn to_settings(&self) -> Settings {
        let block_size = Extent::new(
            self.block_size,
            self.block_height.unwrap_or(self.block_size),
        );
        let overlap = self.overlap.map_or_else(
            || {
                Extent::new(
                    block_size.width / DEFAULT_OVERLAP_DIVISOR,
                    block_size.height / DEFAULT_OVERLAP_DIVISOR,
                )
            },
            Extent::square,
        );
        let block_selection = if self.random {
            BlockSelection::Random
        } else {
            BlockSelection::Weighted {
                search_stride: self.search_stride,
                selection_span: self.selection_span,
            }
        };

        Settings {
            seed: self.seed,
            block_size,
            overlap,
            quilt_size: Extent::new(
                self.quilt_size,
                self.quilt_height.unwrap_or(self.quilt_size),
            ),
            do_cut: !self.no_cut,
            show_seams: self.show_seams,
            blend_seams: self.blend_seams,
            use_log_cost: !self.linear_cost,
            make_tileable: self.tileable,
            show_difference: self.show_difference,
            use_gpu_acceleration: self.gpu,
            block_selection,
        }
    }
}

/// Orchestrates batch quilting of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    settings: Settings,
    quilter: Quilter,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    ///
    /// With `--gpu` a graphics context is requested up front; if none is
    /// available the run continues on the CPU.
    pub fn new(cli: Cli) -> Self {
        let quilter = if cli.gpu {
            GpuContext::new().map_or_else(
                || {
                    log::warn!("no GPU adapter available, continuing on the CPU");
                    Quilter::new()
                },
                Quilter::with_gpu,
            )
        } else {
            Quilter::new()
        };
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            settings: cli.to_settings(),
            cli,
            quilter,
            progress_manager,
        }
    }

    /// Settings applied to every file
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or any file fails to quilt
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
            let total: Duration = pm.completed().iter().map(|(_, elapsed)| *elapsed).sum();
            log::info!("quilted {} files in {total:.2?}", pm.completed().len());
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_png(target) {
                return Err(path_error(target, "target file must be a PNG image"));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target)? {
                let path = entry?.path();
                if is_png(&path) && !is_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(path_error(target, "target must be a PNG file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback on skipped files
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path);
        }

        let source = load_source(input_path)?;
        let quilt = self.quilter.try_quilt(&source, &self.settings)?;
        save_quilt(&quilt.image, &output_path)?;

        log::info!(
            "{} -> {} in {:.2?}",
            input_path.display(),
            output_path.display(),
            start_time.elapsed()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(input_path, start_time.elapsed());
        }

        Ok(())
    }

    /// Output path for an input file: `name.png` becomes `name_quilt.png`
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Earlier outputs in a directory are not quilted again
fn is_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
