//! Tests for points, extents and rectangles

#[cfg(test)]
mod tests {
    use imagequilt::spatial::{Extent, Point, Rect};

    // Tests grid cell scaling used to place blocks on the canvas
    // Verified by swapping width and height in the scaled components
    #[test]
    fn test_point_scaled_by_step() {
        let step = Extent::new(75, 60);
        assert_eq!(Point::scaled(step, 2, 3), Point::new(150, 180));
        assert_eq!(Point::scaled(step, 0, 0), Point::ZERO);
    }

    // Tests componentwise point addition saturates instead of wrapping
    // Verified by adding x into y
    #[test]
    fn test_point_add() {
        assert_eq!(Point::new(3, 4) + Point::new(10, 20), Point::new(13, 24));
        assert_eq!(
            Point::new(u32::MAX - 1, 0) + Point::new(5, 5),
            Point::new(u32::MAX, 5)
        );
    }

    // Tests that the canvas formula helpers compose to 315 for 4 blocks of 90 with 15 overlap
    // Verified by replacing scale with addition
    #[test]
    fn test_extent_arithmetic() {
        let block = Extent::square(90);
        let overlap = Extent::square(15);
        let step = block.saturating_sub(overlap);
        assert_eq!(step, Extent::square(75));
        let canvas = Extent::square(4)
            .checked_scale(step)
            .and_then(|grid| grid.checked_add(overlap));
        assert_eq!(canvas, Some(Extent::square(315)));
    }

    // Tests checked extent arithmetic reports overflow on either axis
    // Verified by multiplying with wrapping_mul
    #[test]
    fn test_extent_checked_overflow() {
        let huge = Extent::new(1, u32::MAX / 2 + 1);
        assert_eq!(huge.checked_scale(Extent::new(3, 2)), None);
        assert_eq!(
            Extent::new(2, 3).checked_scale(Extent::new(4, 5)),
            Some(Extent::new(8, 15))
        );
        assert_eq!(Extent::new(u32::MAX, 0).checked_add(Extent::new(1, 0)), None);
    }

    // Tests emptiness and area
    // Verified by checking only the width in is_empty
    #[test]
    fn test_extent_area_and_empty() {
        assert_eq!(Extent::new(3, 5).area(), 15);
        assert!(Extent::new(0, 5).is_empty());
        assert!(Extent::new(5, 0).is_empty());
        assert!(!Extent::new(1, 1).is_empty());
    }

    // Tests the strict containment check used for overlap and block validation
    // Verified by using <= instead of < on the height
    #[test]
    fn test_fits_strictly_within() {
        let outer = Extent::new(10, 10);
        assert!(Extent::new(9, 9).fits_strictly_within(outer));
        assert!(!Extent::new(9, 10).fits_strictly_within(outer));
        assert!(!Extent::new(10, 9).fits_strictly_within(outer));
    }

    // Tests saturating subtraction never wraps
    // Verified by replacing saturating_sub with wrapping_sub
    #[test]
    fn test_saturating_sub() {
        let room = Extent::new(5, 20).saturating_sub(Extent::new(10, 4));
        assert_eq!(room, Extent::new(0, 16));
    }

    // Tests the textual extent format used in log and error messages
    // Verified by changing the separator
    #[test]
    fn test_extent_display() {
        assert_eq!(Extent::new(120, 64).to_string(), "120x64");
        assert_eq!(Point::new(1, 2).to_string(), "(1, 2)");
    }

    // Tests rectangle edges, containment and bounds checks
    // Verified by making the right edge inclusive
    #[test]
    fn test_rect_bounds() {
        let rect = Rect::new(Point::new(2, 3), Extent::new(4, 5));
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 8);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 7)));
        assert!(!rect.contains(Point::new(1, 3)));
        assert!(rect.fits_within(Extent::new(6, 8)));
        assert!(!rect.fits_within(Extent::new(5, 8)));
        let far = Rect::new(Point::new(u32::MAX, 0), Extent::square(4));
        assert_eq!(far.right(), u32::MAX);
        assert_eq!(Rect::at_origin(Extent::square(3)).origin, Point::ZERO);
    }
}
