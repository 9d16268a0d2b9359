//! Tests for default settings, derived sizes and validation

#[cfg(test)]
mod tests {
    use imagequilt::QuiltError;
    use imagequilt::quilting::settings::{BlockSelection, Settings};
    use imagequilt::spatial::Extent;

    fn rejected_parameter(settings: &Settings, source: Extent) -> Option<&'static str> {
        match settings.validate(source) {
            Err(QuiltError::InvalidParameter { parameter, .. }) => Some(parameter),
            _ => None,
        }
    }

    // Tests defaults match the documented configuration
    // Verified by deriving the overlap with a different divisor
    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.seed, 4830);
        assert_eq!(settings.block_size, Extent::square(90));
        assert_eq!(settings.overlap, Extent::square(15));
        assert_eq!(settings.quilt_size, Extent::square(4));
        assert!(settings.do_cut && settings.use_log_cost);
        assert!(!settings.show_seams && !settings.blend_seams && !settings.make_tileable);
        assert!(!settings.show_difference && !settings.use_gpu_acceleration);
        assert_eq!(
            settings.block_selection,
            BlockSelection::Weighted {
                search_stride: 3,
                selection_span: 0.1
            }
        );
    }

    // Tests the canvas formula and the tileable crop
    // Verified by omitting the trailing overlap from the canvas size
    #[test]
    fn test_sizes() {
        let mut settings = Settings::default();
        assert_eq!(settings.step(), Extent::square(75));
        assert_eq!(settings.canvas_size(), Extent::square(315));
        assert_eq!(settings.output_size(), Extent::square(315));

        settings.make_tileable = true;
        assert_eq!(settings.output_size(), Extent::square(225));
    }

    // Tests a valid configuration passes
    // Verified by requiring the block to be at most half the source
    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Settings::default().validate(Extent::square(91)).is_ok());
    }

    // Tests each parameter invariant names the offending parameter
    // Verified by removing the overlap check
    #[test]
    fn test_validate_parameters() {
        let source = Extent::square(200);

        let mut settings = Settings {
            block_size: Extent::new(0, 90),
            ..Settings::default()
        };
        assert_eq!(rejected_parameter(&settings, source), Some("block_size"));

        settings = Settings {
            overlap: Extent::new(90, 15),
            ..Settings::default()
        };
        assert_eq!(rejected_parameter(&settings, source), Some("overlap"));

        settings.overlap = Extent::new(15, 0);
        assert_eq!(rejected_parameter(&settings, source), Some("overlap"));

        settings = Settings {
            quilt_size: Extent::new(3, 0),
            ..Settings::default()
        };
        assert_eq!(rejected_parameter(&settings, source), Some("quilt_size"));

        settings = Settings {
            quilt_size: Extent::new(1, 4),
            make_tileable: true,
            ..Settings::default()
        };
        assert_eq!(rejected_parameter(&settings, source), Some("quilt_size"));
    }

    // Tests a quilt whose canvas overflows u32 is rejected before synthesis
    // Verified by computing the canvas with unchecked multiplication
    #[test]
    fn test_validate_canvas_overflow() {
        let settings = Settings {
            quilt_size: Extent::new(u32::MAX, 2),
            block_selection: BlockSelection::Random,
            ..Settings::default()
        };
        assert_eq!(settings.checked_canvas_size(), None);
        assert_eq!(settings.canvas_size(), Extent::square(u32::MAX));
        assert_eq!(
            rejected_parameter(&settings, Extent::square(200)),
            Some("quilt_size")
        );

        // Fits u32 per axis, but the pixel bytes do not fit in memory
        let vast = Settings {
            quilt_size: Extent::square(46_000_000),
            ..settings
        };
        assert!(vast.checked_canvas_size().is_some());
        assert_eq!(rejected_parameter(&vast, Extent::square(200)), Some("quilt_size"));
    }

    // Tests weighted selection parameters are range checked
    // Verified by accepting spans above one
    #[test]
    fn test_validate_weighted() {
        let source = Extent::square(200);
        let mut settings = Settings {
            block_selection: BlockSelection::Weighted {
                search_stride: 0,
                selection_span: 0.1,
            },
            ..Settings::default()
        };
        assert_eq!(rejected_parameter(&settings, source), Some("search_stride"));

        for span in [-0.1, 1.5, f32::NAN] {
            settings.block_selection = BlockSelection::Weighted {
                search_stride: 1,
                selection_span: span,
            };
            assert_eq!(rejected_parameter(&settings, source), Some("selection_span"));
        }

        settings.block_selection = BlockSelection::Random;
        assert!(settings.validate(source).is_ok());
    }

    // Tests the block must fit strictly inside the source
    // Verified by allowing a block equal to the source
    #[test]
    fn test_validate_geometry() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate(Extent::square(90)),
            Err(QuiltError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            settings.validate(Extent::new(200, 90)),
            Err(QuiltError::InvalidGeometry { .. })
        ));
    }
}
