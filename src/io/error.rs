//! Error types for quilting runs, GPU evaluation and file handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all quilting operations
#[derive(Debug)]
pub enum QuiltError {
    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Settings value failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Source image and block geometry are incompatible
    ///
    /// Occurs when the block does not fit strictly inside the source, which
    /// would leave no candidate origins to sample from.
    InvalidGeometry {
        /// Description of the mismatch
        reason: String,
    },

    /// The graphics device could not complete a request
    Gpu {
        /// Stage of the GPU pipeline that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for QuiltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidGeometry { reason } => {
                write!(f, "Invalid geometry: {reason}")
            }
            Self::Gpu { operation, reason } => {
                write!(f, "GPU error during {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for QuiltError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for quilting results
pub type Result<T> = std::result::Result<T, QuiltError>;

impl From<std::io::Error> for QuiltError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> QuiltError {
    QuiltError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a GPU pipeline error
pub fn gpu_error(operation: &'static str, reason: &impl ToString) -> QuiltError {
    QuiltError::Gpu {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an error for an unusable CLI target path
pub fn path_error(path: impl Into<PathBuf>, reason: &str) -> QuiltError {
    QuiltError::FileSystem {
        path: path.into(),
        operation: "resolve target",
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, reason.to_string()),
    }
}
