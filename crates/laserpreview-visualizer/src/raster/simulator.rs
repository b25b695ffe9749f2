//! Simulation context
//!
//! `BurnSimulator` owns the canvas, the material and beam model, and the
//! current pixel energy. The interpreter, rasterizer, depositor, and
//! diffusion all work through `&mut BurnSimulator`, one call at a time.

use super::burn::{BurnOutcome, EnergyDepositor};
use super::canvas::Canvas;
use super::rasterizer::{draw_segment, BeamSink};
use crate::gcode::MotionSink;
use laserpreview_core::{BeamProperties, CellBounds, MaterialProperties, Point2, RasterError};
use serde::Serialize;
use tracing::{debug, info};

/// Counters collected over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SimulationStats {
    /// Segments handed to the rasterizer
    pub segments: u64,
    /// Beam spots burnt
    pub deposits: u64,
    /// Cells that reached their marking threshold
    pub marked_cells: u64,
    /// Cells that received too little energy to be marked
    pub rejected_cells: u64,
}

/// Mutable state of one preview run
#[derive(Debug, Clone)]
pub struct BurnSimulator {
    canvas: Canvas,
    depositor: EnergyDepositor,
    beam: BeamProperties,
    pixel_energy: f32,
    stats: SimulationStats,
}

impl BurnSimulator {
    /// Create a simulator on a blank single-cell canvas.
    ///
    /// Pixel energy starts at zero, so nothing is marked until a feed
    /// rate or pixel energy is set.
    pub fn new(material: MaterialProperties, beam: BeamProperties) -> Self {
        info!(
            "dif={:.6} lin={:.6} dia={:.6}",
            material.diffusion, material.diffusion_lin, material.diffusion_dia
        );
        Self {
            canvas: Canvas::new(),
            depositor: EnergyDepositor::new(material, &beam),
            beam,
            pixel_energy: 0.0,
            stats: SimulationStats::default(),
        }
    }

    /// Pre-size the canvas to at least `width`×`height` cells from the origin
    pub fn reserve_area(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        if width == 0 && height == 0 {
            return Ok(());
        }
        let x1 = i32::try_from(width.max(1) - 1).unwrap_or(i32::MAX);
        let y1 = i32::try_from(height.max(1) - 1).unwrap_or(i32::MAX);
        self.canvas.extend(0, 0, x1, y1)?;
        debug!("Canvas reserved to {}", self.canvas.bounds());
        Ok(())
    }

    /// Recompute pixel energy for `feed_rate` mm/min; non-positive feeds are ignored
    pub fn set_feed_rate(&mut self, feed_rate: f64) {
        if let Some(energy) = self.beam.pixel_energy(feed_rate) {
            self.pixel_energy = energy;
            debug!("Feed {} mm/min -> {:.6} J/px", feed_rate, energy);
        }
    }

    pub fn set_pixel_energy(&mut self, pixel_energy: f32) {
        self.pixel_energy = pixel_energy;
    }

    pub fn pixel_energy(&self) -> f32 {
        self.pixel_energy
    }

    pub fn beam(&self) -> &BeamProperties {
        &self.beam
    }

    pub fn material(&self) -> &MaterialProperties {
        self.depositor.material()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn bounds(&self) -> CellBounds {
        self.canvas.bounds()
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Burn one beam spot at the current pixel energy
    pub fn burn(&mut self, center: Point2, intensity: f32) -> Result<BurnOutcome, RasterError> {
        let outcome = self
            .depositor
            .burn(&mut self.canvas, center, intensity, self.pixel_energy)?;
        let marked = outcome.accepted_count() as u64;
        self.stats.deposits += 1;
        self.stats.marked_cells += marked;
        self.stats.rejected_cells += outcome.cells.len() as u64 - marked;
        Ok(outcome)
    }

    /// Rasterize a segment, returning the number of beam spots burnt
    pub fn draw_segment(&mut self, from: Point2, to: Point2, intensity: f32) -> Result<u64, RasterError> {
        let steps = draw_segment(self, from, to, intensity)?;
        if steps > 0 {
            self.stats.segments += 1;
        }
        Ok(steps)
    }
}

impl BeamSink for BurnSimulator {
    fn deposit(&mut self, center: Point2, intensity: f32) -> Result<(), RasterError> {
        self.burn(center, intensity).map(|_| ())
    }
}

impl MotionSink for BurnSimulator {
    fn set_feed_rate(&mut self, feed_rate: f64) {
        BurnSimulator::set_feed_rate(self, feed_rate);
    }

    fn draw(&mut self, from: Point2, to: Point2, intensity: f32) -> Result<(), RasterError> {
        self.draw_segment(from, to, intensity).map(|_| ())
    }
}
