//! Growable energy canvas
//!
//! A dense row-major grid of `f32` energy values addressed by signed cell
//! coordinates. The covered rectangle only ever grows; growth reallocates
//! the arena and moves every existing row to its new offset, so values
//! written before an extension read back unchanged after it.

use laserpreview_core::{CellBounds, RasterError};
use tracing::trace;

/// Accumulation buffer for a simulation run
#[derive(Debug, Clone)]
pub struct Canvas {
    bounds: CellBounds,
    width: usize,
    cells: Vec<f32>,
}

impl Canvas {
    /// Create a canvas holding the single cell (0,0)
    pub fn new() -> Self {
        Self {
            bounds: CellBounds::cell(0, 0),
            width: 1,
            cells: vec![0.0],
        }
    }

    /// Create a canvas covering `bounds` as well as the origin cell
    pub fn with_bounds(bounds: CellBounds) -> Result<Self, RasterError> {
        let mut canvas = Self::new();
        canvas.extend(bounds.x0, bounds.y0, bounds.x1, bounds.y1)?;
        Ok(canvas)
    }

    /// Current covered rectangle
    pub fn bounds(&self) -> CellBounds {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds.contains(x, y)
    }

    /// Grow the canvas to cover the union of its bounds and the requested
    /// rectangle, whose corners may be given in any order.
    ///
    /// Returns `Ok(false)` when nothing had to change. On error the canvas is
    /// left exactly as it was and the caller must abandon the pending write.
    pub fn extend(&mut self, nx0: i32, ny0: i32, nx1: i32, ny1: i32) -> Result<bool, RasterError> {
        let target = self.bounds.union(&CellBounds::new(nx0, ny0, nx1, ny1));
        if target == self.bounds {
            return Ok(false);
        }

        let (new_width, len) = arena_size(&target)?;
        let old = self.bounds;

        if target.x0 == old.x0 && target.x1 == old.x1 && target.y0 == old.y0 {
            // Same width and origin row: only rows are appended.
            self.cells
                .try_reserve_exact(len - self.cells.len())
                .map_err(|_| allocation_failed(&target))?;
            self.cells.resize(len, 0.0);
        } else {
            let mut cells: Vec<f32> = Vec::new();
            cells
                .try_reserve_exact(len)
                .map_err(|_| allocation_failed(&target))?;
            cells.resize(len, 0.0);

            let col = offset(old.x0, target.x0);
            let first_row = offset(old.y0, target.y0);
            for (row, src) in self.cells.chunks_exact(self.width).enumerate() {
                let start = (first_row + row) * new_width + col;
                cells[start..start + self.width].copy_from_slice(src);
            }
            self.cells = cells;
        }

        trace!("Canvas grown from {} to {}", old, target);
        self.bounds = target;
        self.width = new_width;
        Ok(true)
    }

    /// Make sure the cell (x,y) is covered
    pub fn ensure_contains(&mut self, x: i32, y: i32) -> Result<(), RasterError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            self.extend(x, y, x, y).map(|_| ())
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(offset(y, self.bounds.y0) * self.width + offset(x, self.bounds.x0))
        } else {
            None
        }
    }

    /// Value of an allocated cell
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Value of any cell; cells outside the canvas hold no energy yet
    pub fn value_at(&self, x: i32, y: i32) -> f32 {
        self.get(x, y).unwrap_or(0.0)
    }

    /// Add `delta` to cell (x,y), growing the canvas first when needed
    pub fn accumulate(&mut self, x: i32, y: i32, delta: f32) -> Result<(), RasterError> {
        self.ensure_contains(x, y)?;
        if let Some(i) = self.index(x, y) {
            self.cells[i] += delta;
        }
        Ok(())
    }

    /// Rows from `y0` to `y1`, each `width()` cells long
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[f32]> + ExactSizeIterator {
        self.cells.chunks_exact(self.width)
    }

    /// Raw row-major cells
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    /// Sum of every cell, accumulated in double precision
    pub fn total_energy(&self) -> f64 {
        self.cells.iter().map(|&v| f64::from(v)).sum()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Distance from `from` to `value` on one axis; callers guarantee `value >= from`.
fn offset(value: i32, from: i32) -> usize {
    (i64::from(value) - i64::from(from)) as usize
}

fn arena_size(bounds: &CellBounds) -> Result<(usize, usize), RasterError> {
    let overflow = || RasterError::DimensionOverflow {
        width: bounds.width(),
        height: bounds.height(),
    };
    let width = usize::try_from(bounds.width()).map_err(|_| overflow())?;
    let height = usize::try_from(bounds.height()).map_err(|_| overflow())?;
    let len = width.checked_mul(height).ok_or_else(overflow)?;
    len.checked_mul(std::mem::size_of::<f32>())
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or_else(overflow)?;
    Ok((width, len))
}

fn allocation_failed(bounds: &CellBounds) -> RasterError {
    RasterError::AllocationFailed {
        width: bounds.width(),
        height: bounds.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_single_cell() {
        let canvas = Canvas::new();
        assert_eq!(canvas.bounds(), CellBounds::cell(0, 0));
        assert_eq!(canvas.width(), 1);
        assert_eq!(canvas.height(), 1);
        assert_eq!(canvas.get(0, 0), Some(0.0));
        assert_eq!(canvas.get(1, 0), None);
    }

    #[test]
    fn test_extend_noop_within_bounds() {
        let mut canvas = Canvas::with_bounds(CellBounds::new(0, 0, 9, 9)).unwrap();
        assert!(!canvas.extend(2, 3, 4, 5).unwrap());
        assert!(!canvas.extend(9, 9, 0, 0).unwrap());
        assert_eq!(canvas.bounds(), CellBounds::new(0, 0, 9, 9));
    }

    #[test]
    fn test_extend_preserves_values_negative_origin() {
        let mut canvas = Canvas::with_bounds(CellBounds::new(0, 0, 3, 2)).unwrap();
        canvas.accumulate(1, 1, 0.5).unwrap();
        canvas.accumulate(3, 2, 0.25).unwrap();

        assert!(canvas.extend(-4, -3, 1, 1).unwrap());
        assert_eq!(canvas.bounds(), CellBounds::new(-4, -3, 3, 2));
        assert_eq!(canvas.width(), 8);
        assert_eq!(canvas.height(), 6);
        assert_eq!(canvas.get(1, 1), Some(0.5));
        assert_eq!(canvas.get(3, 2), Some(0.25));
        assert_eq!(canvas.get(-4, -3), Some(0.0));
    }

    #[test]
    fn test_extend_appends_rows_in_place() {
        let mut canvas = Canvas::with_bounds(CellBounds::new(0, 0, 4, 0)).unwrap();
        canvas.accumulate(2, 0, 1.0).unwrap();
        assert!(canvas.extend(0, 0, 4, 7).unwrap());
        assert_eq!(canvas.height(), 8);
        assert_eq!(canvas.get(2, 0), Some(1.0));
        assert_eq!(canvas.get(2, 7), Some(0.0));
    }

    #[test]
    fn test_accumulate_grows_on_demand() {
        let mut canvas = Canvas::new();
        canvas.accumulate(-2, 5, 0.75).unwrap();
        canvas.accumulate(-2, 5, 0.25).unwrap();
        assert!(canvas.contains(0, 0));
        assert_eq!(canvas.get(-2, 5), Some(1.0));
        assert_eq!(canvas.bounds(), CellBounds::new(-2, 0, 0, 5));
    }

    #[test]
    fn test_value_outside_is_zero() {
        let canvas = Canvas::new();
        assert_eq!(canvas.value_at(100, -100), 0.0);
    }

    #[test]
    fn test_oversized_extend_fails_and_leaves_canvas_intact() {
        let mut canvas = Canvas::new();
        canvas.accumulate(0, 0, 0.5).unwrap();
        let err = canvas
            .extend(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
            .unwrap_err();
        assert!(matches!(
            err,
            RasterError::DimensionOverflow { .. } | RasterError::AllocationFailed { .. }
        ));
        assert_eq!(canvas.bounds(), CellBounds::cell(0, 0));
        assert_eq!(canvas.get(0, 0), Some(0.5));
    }

    #[test]
    fn test_total_energy() {
        let mut canvas = Canvas::new();
        canvas.accumulate(1, 1, 0.5).unwrap();
        canvas.accumulate(-1, 0, 0.25).unwrap();
        assert!((canvas.total_energy() - 0.75).abs() < 1e-9);
    }
}
