//! # LaserPreview Visualizer
//!
//! Energy-deposition simulation for laser engraving programs.
//! Includes the growable canvas, the beam rasterizer and depositor, the
//! diffusion propagator, the G-code motion interpreter, and grayscale export.
//!
//! Deposits are order dependent: the absorbed share of every burn depends
//! on the energy a cell already holds. Everything here therefore runs
//! strictly in program order through `&mut` access to one simulator.

pub mod export;
pub mod gcode;
pub mod raster;

pub use export::{energy_to_gray, GrayscaleImage};
pub use gcode::{
    BeamState, InterpreterSettings, InterpreterStats, MotionInterpreter, MotionSink, Word,
};
pub use raster::{
    draw_segment, BeamSink, BurnOutcome, BurnSimulator, Canvas, CellShare, Diffuser,
    EnergyDepositor, SimulationStats,
};
