/// Command-line interface and batch file processing
pub mod cli;
/// Default parameters and output naming
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG loading and saving
pub mod image;
/// Batch progress display
pub mod progress;
