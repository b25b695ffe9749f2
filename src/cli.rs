//! Command-line options and how they override the configuration file.

use anyhow::{bail, Context};
use clap::Parser;
use laserpreview::{MaterialPreset, PreviewConfig};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Inclusive crop rectangle in image pixels, `x0,y0,x1,y1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl FromStr for CropRect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid crop '{}': {}", s, e))?;
        match parts.as_slice() {
            &[x0, y0, x1, y1] => Ok(Self { x0, y0, x1, y1 }),
            _ => Err(format!("Invalid crop '{}': expected x0,y0,x1,y1", s)),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "laserpreview")]
#[command(version, long_version = long_version())]
#[command(about = "Preview how a laser engraving program burns the material")]
pub struct Cli {
    /// G-code program to simulate (stdin when omitted)
    pub input: Option<PathBuf>,

    /// PNG file to write (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (JSON or TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum output width in pixels
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Minimum output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Material preset
    #[arg(long)]
    pub material: Option<MaterialPreset>,

    /// Baseline absorption
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    pub absorption: Option<f32>,

    /// Absorption change once marked
    #[arg(short = 'A', long, allow_negative_numbers = true)]
    pub absorption_factor: Option<f32>,

    /// Beam power in Watts
    #[arg(short = 'b', long)]
    pub beam_power: Option<f32>,

    /// Minimum marking energy density in J/mm²
    #[arg(short = 'e', long)]
    pub energy_density: Option<f32>,

    /// Linear diffusion ratio
    #[arg(short = 'd', long)]
    pub diffusion: Option<f32>,

    /// Intensity multiplier
    #[arg(short = 'm', long)]
    pub multiply: Option<f64>,

    /// Pixel size in millimeters, ignored unless positive
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub pixel_size: Option<f64>,

    /// Feed rate in mm/min assumed before the program sets one
    #[arg(long)]
    pub feed: Option<f64>,

    /// Sub-pixel steps program coordinates snap to
    #[arg(long)]
    pub subdivisions: Option<u32>,

    /// Crop the image to x0,y0,x1,y1 (inclusive, top-left origin)
    #[arg(long)]
    pub crop: Option<CropRect>,

    /// Print a JSON run summary on stderr
    #[arg(long)]
    pub report: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
}

impl Cli {
    /// Configuration file values with the command-line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<PreviewConfig> {
        let mut config = match &self.config {
            Some(path) => PreviewConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PreviewConfig::load_default().context("Failed to load default config")?,
        };
        self.apply_overrides(&mut config);
        config.validate().context("Invalid settings")?;
        Ok(config)
    }

    /// Apply preset first, then individual values on top of it
    pub fn apply_overrides(&self, config: &mut PreviewConfig) {
        if let Some(preset) = self.material {
            config.material.apply_preset(preset);
        }
        if let Some(v) = self.width {
            config.canvas.min_width = v;
        }
        if let Some(v) = self.height {
            config.canvas.min_height = v;
        }
        match self.pixel_size {
            Some(v) if v > 0.0 => config.canvas.pixel_size = v,
            Some(v) => warn!("Ignoring non-positive pixel size {}", v),
            None => {}
        }
        if let Some(v) = self.subdivisions {
            config.canvas.position_subdivisions = v;
        }
        if let Some(v) = self.absorption {
            config.material.absorption = v;
        }
        if let Some(v) = self.absorption_factor {
            config.material.absorption_factor = v;
        }
        if let Some(v) = self.diffusion {
            config.material.diffusion = v;
        }
        if let Some(v) = self.beam_power {
            config.beam.power = v;
        }
        if let Some(v) = self.energy_density {
            config.beam.energy_density = v;
        }
        if let Some(v) = self.multiply {
            config.beam.multiply = v;
        }
        if let Some(v) = self.feed {
            config.beam.default_feed_rate = v;
        }
    }

    /// Output path, rejecting an input that would be overwritten
    pub fn output_path(&self) -> anyhow::Result<Option<&PathBuf>> {
        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            if input == output {
                bail!("Output {} would overwrite the input", output.display());
            }
        }
        Ok(self.output.as_ref())
    }
}
