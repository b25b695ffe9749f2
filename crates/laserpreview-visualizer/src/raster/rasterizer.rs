//! Vector rasterizer
//!
//! Cuts a segment into 1-pixel steps along its dominant axis and aims the
//! beam at the middle of each step. The beam is a 1×1 spot and pixel (0,0)
//! is centered on (0.5,0.5), so a segment from pixel F to pixel T travels
//! from F+(0.5,0.5) to T+(0.5,0.5).
//!
//! Moving from F (0,0) to T (4,2) takes 4 steps; the first one goes from
//! (0.5,0.5) to (1.5,1.0) and burns the spot centered on (1.0,0.75):
//!
//! ```text
//!     0   1   2   3   4
//!   +---+---+---+---+---+
//! 2 |   |   |   |   | T |
//!   +---+---+---+-/-+---+
//! 1 |   |   | / |   |   |
//!   +---+-/-+---+---+---+
//! 0 | F |   |   |   |   |
//!   +---+---+---+---+---+
//! ```

use laserpreview_core::{Point2, RasterError};
use tracing::trace;

/// Receiver of beam spots produced by [`draw_segment`]
pub trait BeamSink {
    /// Burn one beam spot. Spots arrive in travel order.
    fn deposit(&mut self, center: Point2, intensity: f32) -> Result<(), RasterError>;
}

/// Rasterize the segment `from`-`to` at `intensity`.
///
/// Issues exactly `ceil(max(|dx|, |dy|))` deposits, none for a zero-length
/// segment, and returns that count. The first failing deposit aborts the
/// segment and its error is returned.
pub fn draw_segment<S: BeamSink + ?Sized>(
    sink: &mut S,
    from: Point2,
    to: Point2,
    intensity: f32,
) -> Result<u64, RasterError> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx == 0.0 && dy == 0.0 {
        return Ok(0);
    }

    let x_dominant = dx.abs() >= dy.abs();
    // Walk the dominant axis upwards.
    let (start, end) = if (x_dominant && dx < 0.0) || (!x_dominant && dy < 0.0) {
        (to, from)
    } else {
        (from, to)
    };

    let (length, slope) = if x_dominant {
        let len = end.x - start.x;
        (len, (end.y - start.y) / len)
    } else {
        let len = end.y - start.y;
        (len, (end.x - start.x) / len)
    };

    let steps = length.ceil() as u64;
    trace!(
        "Segment {} -> {} at {:.3}: {} steps",
        start,
        end,
        intensity,
        steps
    );

    for step in 0..steps {
        // Distance travelled to the middle of this step.
        let along = step as f64 + 0.5;
        let center = if x_dominant {
            Point2::new(
                start.x + 0.5 + along,
                start.y + 0.5 + along * slope,
            )
        } else {
            Point2::new(
                start.x + 0.5 + along * slope,
                start.y + 0.5 + along,
            )
        };
        sink.deposit(center, intensity)?;
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        spots: Vec<Point2>,
        fail_after: Option<usize>,
    }

    impl BeamSink for Recorder {
        fn deposit(&mut self, center: Point2, _intensity: f32) -> Result<(), RasterError> {
            if self.fail_after == Some(self.spots.len()) {
                return Err(RasterError::AllocationFailed {
                    width: 1,
                    height: 1,
                });
            }
            self.spots.push(center);
            Ok(())
        }
    }

    #[test]
    fn test_documented_example() {
        let mut rec = Recorder::default();
        let steps = draw_segment(
            &mut rec,
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 2.0),
            1.0,
        )
        .unwrap();
        assert_eq!(steps, 4);
        assert_eq!(
            rec.spots,
            vec![
                Point2::new(1.0, 0.75),
                Point2::new(2.0, 1.25),
                Point2::new(3.0, 1.75),
                Point2::new(4.0, 2.25),
            ]
        );
    }

    #[test]
    fn test_degenerate_segment() {
        let mut rec = Recorder::default();
        let p = Point2::new(3.0, -2.0);
        assert_eq!(draw_segment(&mut rec, p, p, 1.0).unwrap(), 0);
        assert!(rec.spots.is_empty());
    }

    #[test]
    fn test_reversed_segment_visits_same_spots() {
        let mut forward = Recorder::default();
        let mut backward = Recorder::default();
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 2.0);
        draw_segment(&mut forward, a, b, 1.0).unwrap();
        draw_segment(&mut backward, b, a, 1.0).unwrap();
        assert_eq!(forward.spots, backward.spots);
    }

    #[test]
    fn test_vertical_dominant_axis() {
        let mut rec = Recorder::default();
        let steps = draw_segment(
            &mut rec,
            Point2::new(1.0, 5.0),
            Point2::new(2.0, 2.0),
            1.0,
        )
        .unwrap();
        assert_eq!(steps, 3);
        // Walked upwards from (2,2)
        assert_eq!(rec.spots[0].y, 3.0);
        assert!((rec.spots[0].x - (2.5 - 0.5 / 3.0)).abs() < 1e-12);
        assert_eq!(rec.spots[2].y, 5.0);
    }

    #[test]
    fn test_fractional_length_rounds_up() {
        let mut rec = Recorder::default();
        let steps = draw_segment(
            &mut rec,
            Point2::new(0.0, 0.0),
            Point2::new(2.3, 0.0),
            1.0,
        )
        .unwrap();
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_failure_aborts_segment() {
        let mut rec = Recorder {
            fail_after: Some(2),
            ..Default::default()
        };
        let err = draw_segment(
            &mut rec,
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, RasterError::AllocationFailed { .. }));
        assert_eq!(rec.spots.len(), 2);
    }
}
