//! Tests for candidate queries, error maps and the selection strategies

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use imagequilt::quilting::selection::{
        CandidateEvaluator, CandidateQuery, CpuEvaluator, ErrorMap, select_random,
        select_weighted,
    };
    use imagequilt::spatial::{Extent, PixelBuffer, Point, Rect};
    use rand::{SeedableRng, rngs::StdRng};

    fn gradient(size: Extent) -> PixelBuffer {
        RgbaImage::from_fn(size.width, size.height, |x, y| {
            Rgba([(x * 12) as u8, (y * 12) as u8, 0, 255])
        })
        .into()
    }

    // Tests strips are present only for slots with neighbours
    // Verified by always setting the top strip
    #[test]
    fn test_query_strips() {
        let block = Extent::square(10);
        let overlap = Extent::new(2, 3);

        let first = CandidateQuery::new(Point::ZERO, block, overlap, 1);
        assert_eq!((first.top, first.left), (None, None));
        assert_eq!(first.compared_pixels(), 0);

        let row = CandidateQuery::new(Point::new(8, 0), block, overlap, 1);
        assert_eq!(row.top, None);
        assert_eq!(row.left, Some(Extent::new(2, 10)));

        let column = CandidateQuery::new(Point::new(0, 7), block, overlap, 1);
        assert_eq!(column.top, Some(Extent::new(10, 3)));
        assert_eq!(column.left, None);
    }

    // Tests the shared corner is counted once
    // Verified by summing both strip areas
    #[test]
    fn test_compared_pixels_union() {
        let query = CandidateQuery::new(Point::new(8, 7), Extent::square(10), Extent::new(2, 3), 1);
        assert_eq!(query.top_rows(), 3);
        assert_eq!(query.compared_pixels(), 30 + 14);
    }

    // Tests lattice dimensions include both ends of the room
    // Verified by dropping the +1 in the lattice size
    #[test]
    fn test_lattice() {
        let query = CandidateQuery::new(Point::new(8, 0), Extent::square(10), Extent::square(2), 3);
        assert_eq!(query.lattice(Extent::new(20, 15)), Extent::new(4, 2));
        assert_eq!(query.lattice(Extent::new(11, 11)), Extent::new(1, 1));
    }

    // Tests error maps reject mismatched sizes and map indices to strided origins
    // Verified by ignoring the stride in origin
    #[test]
    fn test_error_map() {
        assert!(ErrorMap::new(Extent::new(4, 2), 3, vec![0; 7]).is_none());

        let map = ErrorMap::new(Extent::new(4, 2), 3, vec![0; 8]);
        let Some(map) = map else {
            panic!("lattice and error count match");
        };
        assert_eq!(map.len(), 8);
        assert!(!map.is_empty());
        assert_eq!(map.lattice(), Extent::new(4, 2));
        assert_eq!(map.origin(0), Point::ZERO);
        assert_eq!(map.origin(5), Point::new(3, 3));
        assert_eq!(map.origin(3), Point::new(9, 0));
    }

    // Tests a constant colour shift yields the rounded per-pixel distance
    // Verified by dividing by the top strip area only
    #[test]
    fn test_candidate_error_mean() {
        let source = PixelBuffer::filled(Extent::square(20), [110, 110, 110, 255]);
        let canvas = PixelBuffer::filled(Extent::square(30), [100, 100, 100, 255]);
        let query = CandidateQuery::new(Point::new(6, 6), Extent::square(8), Extent::square(2), 1);

        let error = CpuEvaluator::candidate_error(&source, &canvas, &query, Point::new(4, 4));

        // sqrt(3 * 10²) = 17.32
        assert_eq!(error, 17);
    }

    // Tests the exact source match ranks first and span zero selects it
    // Verified by selecting the highest-error candidate
    #[test]
    fn test_cpu_evaluator_finds_exact_match() {
        let source = gradient(Extent::square(20));
        let block_size = Extent::square(8);
        let mut canvas = PixelBuffer::new(Extent::square(30));
        let matching = source.copy_region(Rect::new(Point::new(6, 3), block_size));
        canvas.composite(&matching, Point::new(8, 0));

        let query = CandidateQuery::new(Point::new(8, 0), block_size, Extent::square(3), 3);
        let mut evaluator = CpuEvaluator;
        let errors = evaluator.evaluate(&source, &canvas, &query);
        let Ok(errors) = errors else {
            panic!("cpu evaluation cannot fail");
        };

        assert_eq!(errors.lattice(), Extent::new(5, 5));
        assert_eq!(errors.errors().iter().min(), Some(&0));
        assert_eq!(errors.errors().iter().filter(|&&e| e == 0).count(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_weighted(&mut rng, &errors, 0.0), Some(Point::new(6, 3)));
    }

    // Tests ties on error are broken by candidate index
    // Verified by sorting unstably in reverse
    #[test]
    fn test_select_weighted_tie_break() {
        let errors = ErrorMap::new(Extent::new(2, 2), 4, vec![5, 1, 1, 9]);
        let Some(errors) = errors else {
            panic!("lattice and error count match");
        };
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(select_weighted(&mut rng, &errors, 0.0), Some(Point::new(4, 0)));
        }
    }

    // Tests only the best ranked fraction is eligible
    // Verified by picking from the whole ranking
    #[test]
    fn test_select_weighted_span() {
        let errors = ErrorMap::new(Extent::new(2, 2), 1, vec![5, 1, 1, 9]);
        let Some(errors) = errors else {
            panic!("lattice and error count match");
        };
        let worst = Point::new(1, 1);
        let mut seen_other = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_weighted(&mut rng, &errors, 0.5);
            assert_ne!(picked, Some(worst));
            seen_other |= picked != Some(Point::new(1, 0));
        }
        assert!(seen_other);
    }

    // Tests span one can reach every candidate without overflowing the ranking
    // Verified by removing the clamp on the last eligible rank
    #[test]
    fn test_select_weighted_full_span() {
        let errors = ErrorMap::new(Extent::new(3, 1), 1, vec![2, 1, 0]);
        let Some(errors) = errors else {
            panic!("lattice and error count match");
        };
        let mut picks = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(point) = select_weighted(&mut rng, &errors, 1.0) {
                picks.insert(point);
            }
        }
        assert_eq!(picks.len(), 3);
    }

    // Tests an empty error map yields no selection
    // Verified by removing the empty guard
    #[test]
    fn test_select_weighted_empty() {
        let errors = ErrorMap::new(Extent::new(0, 0), 1, Vec::new());
        let Some(errors) = errors else {
            panic!("empty lattice matches empty errors");
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_weighted(&mut rng, &errors, 0.5), None);
    }

    // Tests random origins keep the block inside the source
    // Verified by using the full source size as the range
    #[test]
    fn test_select_random_bounds() {
        let source = Extent::new(20, 12);
        let block = Extent::new(15, 10);
        let mut rng = StdRng::seed_from_u64(4830);
        for _ in 0..200 {
            let origin = select_random(&mut rng, source, block);
            assert!(origin.x <= 5 && origin.y <= 2);
        }
    }

    // Tests the CPU backend needs no per-run preparation for any source
    // Verified by rejecting empty sources in the default begin
    #[test]
    fn test_cpu_begin_accepts_any_source() {
        let mut evaluator = CpuEvaluator;
        assert!(evaluator.begin(&gradient(Extent::square(8))).is_ok());
        assert!(evaluator.begin(&PixelBuffer::default()).is_ok());
    }
}
