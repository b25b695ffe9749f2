//! Energy-deposition raster engine
//!
//! This module provides:
//! - An unbounded canvas of accumulated energy
//! - The diffusion propagator spreading residual energy to neighbours
//! - The energy depositor splitting one beam spot over four cells
//! - The vector rasterizer walking a segment in unit steps
//! - `BurnSimulator`, the mutable context tying them together

pub mod burn;
pub mod canvas;
pub mod diffusion;
pub mod rasterizer;
pub mod simulator;

pub use burn::{BurnOutcome, CellShare, EnergyDepositor};
pub use canvas::Canvas;
pub use diffusion::Diffuser;
pub use rasterizer::{draw_segment, BeamSink};
pub use simulator::{BurnSimulator, SimulationStats};
