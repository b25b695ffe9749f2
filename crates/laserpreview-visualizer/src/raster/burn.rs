//! Energy depositor
//!
//! Marks the 1×1 beam spot around a fractional beam center. Cell (i,j) is
//! centered on (i+0.5, j+0.5), so a spot centered there covers it exactly.
//! Otherwise the spot overlaps up to four cells; each gets a bilinear share
//! of the energy,
//! scaled by how much the material absorbs given what the cell already
//! holds, and is only marked when the delivered energy reaches the cell's
//! marking threshold. Accepted shares go through the [`Diffuser`].
//!
//! Burns are not commutative. Absorption and thresholds are computed from
//! the cell values at the time of the call, so burns must be applied in
//! program order.

use super::canvas::Canvas;
use super::diffusion::Diffuser;
use laserpreview_core::constants::BEAM_SNAP_DIVISIONS;
use laserpreview_core::{BeamProperties, MaterialProperties, Point2, RasterError};

/// What one of the four overlapped cells received
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellShare {
    pub x: i32,
    pub y: i32,
    /// Bilinear overlap of the beam spot with this cell, 0..1
    pub overlap: f32,
    /// Absorbed energy share, at most 1.0
    pub share: f32,
    /// Energy the cell needed to be marked
    pub threshold: f32,
    /// Whether the share was applied
    pub accepted: bool,
}

/// Result of a single burn, cells ordered (x0,y0), (x1,y0), (x0,y1), (x1,y1)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BurnOutcome {
    pub cells: [CellShare; 4],
}

impl BurnOutcome {
    /// Number of cells that were marked
    pub fn accepted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.accepted).count()
    }

    /// Sum of the shares that were applied
    pub fn applied_energy(&self) -> f32 {
        self.cells
            .iter()
            .filter(|c| c.accepted)
            .map(|c| c.share)
            .sum()
    }
}

/// Material-aware splitter of beam energy over the canvas
#[derive(Debug, Clone)]
pub struct EnergyDepositor {
    material: MaterialProperties,
    energy_density: f32,
    diffuser: Diffuser,
}

impl EnergyDepositor {
    pub fn new(material: MaterialProperties, beam: &BeamProperties) -> Self {
        Self {
            diffuser: Diffuser::new(&material),
            material,
            energy_density: beam.energy_density,
        }
    }

    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    /// Marking threshold for a cell already holding `current` energy.
    ///
    /// Heavily marked cells need less extra energy to darken further; a
    /// cell at 1.0 or above accepts any positive energy.
    pub fn threshold(&self, current: f32) -> f32 {
        self.energy_density * (1.0 - current.max(0.0).sqrt())
    }

    /// Burn the beam spot centered on `center` at `intensity`, where
    /// `pixel_energy` is the energy the beam delivers per pixel at the
    /// current feed rate.
    ///
    /// Only an allocation failure while growing the canvas is reported; the
    /// caller must then abort the whole rasterization.
    pub fn burn(
        &mut self,
        canvas: &mut Canvas,
        center: Point2,
        intensity: f32,
        pixel_energy: f32,
    ) -> Result<BurnOutcome, RasterError> {
        let x = snap_to_beam_grid(center.x);
        let y = snap_to_beam_grid(center.y);

        // Offsets are measured from the center of the lower-left cell.
        let sx = x - 0.5;
        let sy = y - 0.5;
        let x0 = sx.floor() as i32;
        let y0 = sy.floor() as i32;
        let x1 = x0.saturating_add(1);
        let y1 = y0.saturating_add(1);

        canvas.extend(x0, y0, x1, y1)?;

        let fx = (sx - f64::from(x0)) as f32;
        let fy = (sy - f64::from(y0)) as f32;
        let corners = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x1, y0, fx * (1.0 - fy)),
            (x0, y1, (1.0 - fx) * fy),
            (x1, y1, fx * fy),
        ];

        let delivered = intensity * pixel_energy;
        let mut outcome = BurnOutcome::default();

        // All four shares are computed from the values before this burn.
        for (slot, &(cx, cy, overlap)) in outcome.cells.iter_mut().zip(corners.iter()) {
            let current = canvas.value_at(cx, cy);
            let share = (overlap * self.material.absorption_at(current) * intensity).min(1.0);
            let threshold = self.threshold(current);
            *slot = CellShare {
                x: cx,
                y: cy,
                overlap,
                share,
                threshold,
                accepted: delivered >= threshold,
            };
        }

        for cell in outcome.cells.iter().filter(|c| c.accepted) {
            self.diffuser.spread(canvas, cell.x, cell.y, cell.share)?;
        }

        Ok(outcome)
    }
}

/// Round to the nearest 1/16 pixel to absorb floating-point jitter
fn snap_to_beam_grid(v: f64) -> f64 {
    (v * BEAM_SNAP_DIVISIONS).round() / BEAM_SNAP_DIVISIONS
}
