//! Geometry types shared between the interpreter and the raster engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in pixel space. Fractional parts address sub-pixel locations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Inclusive rectangle of grid cells, possibly with negative coordinates.
///
/// Always kept normalized: `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CellBounds {
    /// Build bounds from two corners given in any order
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Bounds covering a single cell
    pub fn cell(x: i32, y: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Number of columns
    pub fn width(&self) -> u64 {
        (i64::from(self.x1) - i64::from(self.x0) + 1) as u64
    }

    /// Number of rows
    pub fn height(&self) -> u64 {
        (i64::from(self.y1) - i64::from(self.y0) + 1) as u64
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// True when `other` lies entirely inside these bounds
    pub fn contains_bounds(&self, other: &CellBounds) -> bool {
        self.contains(other.x0, other.y0) && self.contains(other.x1, other.y1)
    }

    /// Smallest bounds covering both rectangles
    pub fn union(&self, other: &CellBounds) -> CellBounds {
        CellBounds {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

impl fmt::Display for CellBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x0={} y0={} x1={} y1={}",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}
