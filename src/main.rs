//! CLI entry point for image quilting

use clap::Parser;
use imagequilt::io::cli::{Cli, FileProcessor};

fn main() -> imagequilt::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
