//! PNG loading and saving for the command-line front end

use crate::io::error::{QuiltError, Result, invalid_parameter};
use crate::spatial::PixelBuffer;
use std::path::Path;

/// Load any supported image as straight-alpha RGBA8
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_source(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).map_err(|e| QuiltError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.into_rgba8().into())
}

/// Save a quilt as PNG, creating the parent directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is empty
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_quilt(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if buffer.is_empty() {
        return Err(invalid_parameter(
            "image",
            &buffer.extent(),
            &"cannot export an empty image",
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| QuiltError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    buffer
        .as_image()
        .save(path)
        .map_err(|e| QuiltError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
