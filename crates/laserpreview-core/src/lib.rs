//! # LaserPreview Core
//!
//! Core types, constants, and errors for LaserPreview.
//! Provides the material and beam model shared by the simulation engine,
//! the settings layer, and the command-line front end.

pub mod constants;
pub mod error;
pub mod material;
pub mod types;

pub use error::{Error, ExportError, RasterError, Result};
pub use material::{BeamProperties, MaterialPreset, MaterialProperties};
pub use types::{CellBounds, Point2};
