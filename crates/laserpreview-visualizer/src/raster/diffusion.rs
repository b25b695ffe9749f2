//! Diffusion propagator
//!
//! Spreads energy that just landed on a cell over its 8 neighbours with the
//! material's 3×3 kernel. Each neighbour receives a scaled copy that spreads
//! again in turn, until the residual drops below [`DIFFUSION_CUTOFF`].
//! The walk uses an explicit worklist rather than native recursion.

use super::canvas::Canvas;
use laserpreview_core::constants::{DIFFUSION_CUTOFF, MAX_SPREAD_DEPTH};
use laserpreview_core::{MaterialProperties, RasterError};

#[derive(Debug, Clone, Copy)]
struct SpreadItem {
    x: i32,
    y: i32,
    value: f32,
    depth: u32,
}

/// Worklist-driven diffusion over a [`Canvas`]
#[derive(Debug, Clone)]
pub struct Diffuser {
    center: f32,
    orthogonal: f32,
    diagonal: f32,
    cutoff: f32,
    max_depth: u32,
    worklist: Vec<SpreadItem>,
}

impl Diffuser {
    pub fn new(material: &MaterialProperties) -> Self {
        Self {
            center: material.diffusion,
            orthogonal: material.orthogonal_weight(),
            diagonal: material.diagonal_weight(),
            cutoff: DIFFUSION_CUTOFF,
            max_depth: MAX_SPREAD_DEPTH,
            worklist: Vec::new(),
        }
    }

    /// Override the maximum number of hops away from the deposit point
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Deposit `value` at (x,y): the cell keeps `value * diffusion` and, if
    /// `value` reaches the cutoff, every neighbour spreads its share in turn.
    ///
    /// Cells touched by the spread are grown into the canvas as needed. An
    /// allocation failure aborts the spread and is returned to the caller.
    pub fn spread(&mut self, canvas: &mut Canvas, x: i32, y: i32, value: f32) -> Result<(), RasterError> {
        self.worklist.clear();
        self.worklist.push(SpreadItem {
            x,
            y,
            value,
            depth: 0,
        });

        while let Some(item) = self.worklist.pop() {
            canvas.accumulate(item.x, item.y, item.value * self.center)?;

            if item.value < self.cutoff || item.depth >= self.max_depth {
                continue;
            }

            let lin = item.value * self.orthogonal;
            let dia = item.value * self.diagonal;
            // Pushed in reverse so cells pop row by row from the top-left.
            let neighbours = [
                (1, 1, dia),
                (0, 1, lin),
                (-1, 1, dia),
                (1, 0, lin),
                (-1, 0, lin),
                (1, -1, dia),
                (0, -1, lin),
                (-1, -1, dia),
            ];
            for (dx, dy, share) in neighbours {
                self.worklist.push(SpreadItem {
                    x: item.x.saturating_add(dx),
                    y: item.y.saturating_add(dy),
                    value: share,
                    depth: item.depth + 1,
                });
            }
        }

        Ok(())
    }
}
