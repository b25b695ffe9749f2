//! Property tests for canvas growth and segment rasterization.

use laserpreview_core::{CellBounds, Point2, RasterError};
use laserpreview_visualizer::{draw_segment, BeamSink, Canvas};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Default)]
struct Counter {
    spots: Vec<Point2>,
}

impl BeamSink for Counter {
    fn deposit(&mut self, center: Point2, _intensity: f32) -> Result<(), RasterError> {
        self.spots.push(center);
        Ok(())
    }
}

fn arb_writes() -> impl Strategy<Value = Vec<(i32, i32, f32)>> {
    prop::collection::vec((-60i32..60, -60i32..60, 0.0f32..1.0), 1..80)
}

proptest! {
    #[test]
    fn growth_preserves_every_write(writes in arb_writes()) {
        let mut canvas = Canvas::new();
        let mut model: HashMap<(i32, i32), f32> = HashMap::new();

        for &(x, y, v) in &writes {
            canvas.accumulate(x, y, v).unwrap();
            *model.entry((x, y)).or_insert(0.0) += v;

            for (&(mx, my), &expected) in &model {
                prop_assert_eq!(canvas.get(mx, my), Some(expected));
            }
        }
    }

    #[test]
    fn bounds_only_grow(writes in arb_writes()) {
        let mut canvas = Canvas::new();
        let mut previous = canvas.bounds();

        for &(x, y, v) in &writes {
            canvas.accumulate(x, y, v).unwrap();
            let current = canvas.bounds();
            prop_assert!(current.contains_bounds(&previous));
            prop_assert!(current.contains(x, y));
            prop_assert!(current.contains(0, 0));
            prop_assert_eq!(current.width() * current.height(), canvas.as_slice().len() as u64);
            previous = current;
        }
    }

    #[test]
    fn extend_covers_union(
        x0 in -500i32..500, y0 in -500i32..500,
        x1 in -500i32..500, y1 in -500i32..500,
    ) {
        let mut canvas = Canvas::new();
        canvas.extend(x0, y0, x1, y1).unwrap();
        let expected = CellBounds::cell(0, 0).union(&CellBounds::new(x0, y0, x1, y1));
        prop_assert_eq!(canvas.bounds(), expected);
    }

    #[test]
    fn step_count_matches_dominant_length(
        fx in -200.0f64..200.0, fy in -200.0f64..200.0,
        tx in -200.0f64..200.0, ty in -200.0f64..200.0,
    ) {
        let mut counter = Counter::default();
        let from = Point2::new(fx, fy);
        let to = Point2::new(tx, ty);
        let steps = draw_segment(&mut counter, from, to, 1.0).unwrap();

        let expected = (tx - fx).abs().max((ty - fy).abs()).ceil() as u64;
        prop_assert_eq!(steps, expected);
        prop_assert_eq!(counter.spots.len() as u64, expected);
    }

    #[test]
    fn spots_stay_near_segment(
        fx in -50.0f64..50.0, fy in -50.0f64..50.0,
        tx in -50.0f64..50.0, ty in -50.0f64..50.0,
    ) {
        let mut counter = Counter::default();
        draw_segment(&mut counter, Point2::new(fx, fy), Point2::new(tx, ty), 1.0).unwrap();

        let (lo_x, hi_x) = (fx.min(tx), fx.max(tx));
        let (lo_y, hi_y) = (fy.min(ty), fy.max(ty));
        for spot in &counter.spots {
            prop_assert!(spot.x >= lo_x - 1.0 && spot.x <= hi_x + 2.0, "{}", spot);
            prop_assert!(spot.y >= lo_y - 1.0 && spot.y <= hi_y + 2.0, "{}", spot);
        }
    }
}
