//! Material and beam model
//!
//! This module provides:
//! - Material presets (clear wood, painted aluminum)
//! - Absorption and diffusion coefficients, with the derived diagonal and
//!   center weights of the 3×3 diffusion kernel
//! - Beam properties and the per-pixel energy derived from the feed rate

use crate::constants::{
    DEFAULT_ABSORPTION, DEFAULT_ABSORPTION_FACTOR, DEFAULT_BEAM_POWER, DEFAULT_ENERGY_DENSITY,
    DEFAULT_LIN_DIFF, DEFAULT_PIXEL_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in material profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialPreset {
    /// Absorbs moderately at first, becomes much more sensitive once burnt
    #[default]
    ClearWood,
    /// Absorbs everything until the paint is gone, then nothing more
    PaintedAluminum,
}

impl fmt::Display for MaterialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClearWood => write!(f, "clear-wood"),
            Self::PaintedAluminum => write!(f, "painted-aluminum"),
        }
    }
}

impl FromStr for MaterialPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear-wood" | "wood" => Ok(Self::ClearWood),
            "painted-aluminum" | "aluminum" | "aluminium" => Ok(Self::PaintedAluminum),
            _ => Err(format!("Unknown material preset: {}", s)),
        }
    }
}

/// Absorption and diffusion coefficients of the engraved material.
///
/// The diffusion kernel is a 3×3 splat: the center keeps `diffusion`, each
/// orthogonal neighbour gets `diffusion_lin * diffusion` and each diagonal
/// neighbour `diffusion_dia * diffusion`, with
/// `diffusion * (1 + 4 * diffusion_lin + 4 * diffusion_dia) == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Baseline absorbed fraction, 0..1
    pub absorption: f32,
    /// Absorption change per unit of energy already in the cell; negative
    /// values model a surface that saturates once marked
    pub absorption_factor: f32,
    /// Share of energy sent to an orthogonal neighbour
    pub diffusion_lin: f32,
    /// Share of energy sent to a diagonal neighbour, `diffusion_lin^√2`
    pub diffusion_dia: f32,
    /// Center-retention normalizer
    pub diffusion: f32,
}

impl MaterialProperties {
    /// Build a material, deriving the diagonal and center kernel weights
    pub fn new(absorption: f32, absorption_factor: f32, diffusion_lin: f32) -> Self {
        let diffusion_dia = diffusion_lin.powf(std::f32::consts::SQRT_2);
        let diffusion = 1.0 / (1.0 + 4.0 * diffusion_dia + 4.0 * diffusion_lin);
        Self {
            absorption,
            absorption_factor,
            diffusion_lin,
            diffusion_dia,
            diffusion,
        }
    }

    /// Clear wood with the default diffusion ratio
    pub fn clear_wood() -> Self {
        Self::new(DEFAULT_ABSORPTION, DEFAULT_ABSORPTION_FACTOR, DEFAULT_LIN_DIFF)
    }

    /// Painted aluminum with the default diffusion ratio
    pub fn painted_aluminum() -> Self {
        Self::new(1.0, -1.0, DEFAULT_LIN_DIFF)
    }

    pub fn from_preset(preset: MaterialPreset) -> Self {
        match preset {
            MaterialPreset::ClearWood => Self::clear_wood(),
            MaterialPreset::PaintedAluminum => Self::painted_aluminum(),
        }
    }

    /// Same absorption model with another linear diffusion ratio
    pub fn with_diffusion(self, diffusion_lin: f32) -> Self {
        Self::new(self.absorption, self.absorption_factor, diffusion_lin)
    }

    /// Sum of the nine kernel weights; 1.0 up to rounding
    pub fn kernel_sum(&self) -> f32 {
        self.diffusion * (1.0 + 4.0 * self.diffusion_lin + 4.0 * self.diffusion_dia)
    }

    /// Weight applied to an orthogonal neighbour's share
    pub fn orthogonal_weight(&self) -> f32 {
        self.diffusion_lin * self.diffusion
    }

    /// Weight applied to a diagonal neighbour's share
    pub fn diagonal_weight(&self) -> f32 {
        self.diffusion_dia * self.diffusion
    }

    /// Absorbed fraction for a cell already holding `current` energy.
    ///
    /// Saturating materials (negative factor) never go below zero.
    pub fn absorption_at(&self, current: f32) -> f32 {
        let absorbed = self.absorption + self.absorption_factor * current;
        if self.absorption_factor < 0.0 {
            absorbed.max(0.0)
        } else {
            absorbed
        }
    }

    /// Check the coefficients describe a usable material
    pub fn is_valid(&self) -> bool {
        self.absorption.is_finite()
            && self.absorption_factor.is_finite()
            && self.diffusion_lin.is_finite()
            && self.diffusion_lin >= 0.0
            && self.diffusion.is_finite()
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::clear_wood()
    }
}

/// Laser beam and pixel geometry for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamProperties {
    /// Beam power in Watts
    pub power: f32,
    /// Pixel size in millimeters
    pub pixel_size: f64,
    /// Minimum marking energy per cell in Joules (J/mm² × pixel area)
    pub energy_density: f32,
}

impl BeamProperties {
    /// `energy_density_mm2` is in J/mm² and gets scaled to one cell's area
    pub fn new(power: f32, pixel_size: f64, energy_density_mm2: f32) -> Self {
        Self {
            power,
            pixel_size,
            energy_density: (f64::from(energy_density_mm2) * pixel_size * pixel_size) as f32,
        }
    }

    /// Energy in Joules delivered over one pixel at `feed_rate` mm/min.
    ///
    /// Power in W is J/s and the feed is mm/min, so P·60/F is J/mm and
    /// P·pixel·60/F is J/px. Returns `None` for non-positive feeds.
    pub fn pixel_energy(&self, feed_rate: f64) -> Option<f32> {
        if feed_rate > 0.0 {
            Some((f64::from(self.power) * self.pixel_size * 60.0 / feed_rate) as f32)
        } else {
            None
        }
    }

    /// Scale factor from program millimeters to pixels
    pub fn zoom(&self) -> f64 {
        1.0 / self.pixel_size
    }
}

impl Default for BeamProperties {
    fn default() -> Self {
        Self::new(DEFAULT_BEAM_POWER, DEFAULT_PIXEL_SIZE, DEFAULT_ENERGY_DENSITY)
    }
}
