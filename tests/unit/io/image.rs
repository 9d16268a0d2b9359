//! Tests for PNG loading and saving

#[cfg(test)]
mod tests {
    use imagequilt::QuiltError;
    use imagequilt::io::image::{load_source, save_quilt};
    use imagequilt::spatial::{Extent, PixelBuffer, Point};
    use image::Rgba;
    use tempfile::TempDir;

    // Tests saved quilts load back unchanged, creating missing directories
    // Verified by skipping parent directory creation
    #[test]
    fn test_save_and_load() {
        let Ok(dir) = TempDir::new() else {
            panic!("temporary directory");
        };
        let path = dir.path().join("nested").join("out.png");
        let mut buffer = PixelBuffer::filled(Extent::new(5, 3), [10, 20, 30, 255]);
        buffer.set_pixel(Point::new(4, 2), Rgba([1, 2, 3, 0]));

        assert!(save_quilt(&buffer, &path).is_ok());
        let loaded = load_source(&path);
        let Ok(loaded) = loaded else {
            panic!("saved image must load");
        };
        assert_eq!(loaded, buffer);
    }

    // Tests empty buffers are refused
    // Verified by removing the empty check
    #[test]
    fn test_save_empty_fails() {
        let Ok(dir) = TempDir::new() else {
            panic!("temporary directory");
        };
        let result = save_quilt(&PixelBuffer::default(), &dir.path().join("empty.png"));
        assert!(matches!(result, Err(QuiltError::InvalidParameter { .. })));
        assert!(!dir.path().join("empty.png").exists());
    }

    // Tests missing inputs report the path
    // Verified by mapping load errors to file system errors
    #[test]
    fn test_load_missing() {
        let result = load_source(std::path::Path::new("does/not/exist.png"));
        let Err(QuiltError::ImageLoad { path, .. }) = result else {
            panic!("missing file must fail to load");
        };
        assert!(path.ends_with("exist.png"));
    }
}
