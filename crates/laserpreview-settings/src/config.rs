//! Configuration for a LaserPreview run
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default file lives in the
//! platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Canvas settings (pixel size, minimum output size, coordinate grid)
//! - Beam settings (power, intensity multiplier, marking threshold, feed)
//! - Material settings (absorption model, diffusion)

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use laserpreview_core::constants::{
    DEFAULT_ABSORPTION, DEFAULT_ABSORPTION_FACTOR, DEFAULT_BEAM_POWER, DEFAULT_ENERGY_DENSITY,
    DEFAULT_FEED_RATE, DEFAULT_HEIGHT, DEFAULT_LIN_DIFF, DEFAULT_MULTIPLY, DEFAULT_PIXEL_SIZE,
    DEFAULT_POSITION_SUBDIVISIONS, DEFAULT_WIDTH,
};
use laserpreview_core::{BeamProperties, MaterialPreset, MaterialProperties};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR_NAME: &str = "laserpreview";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Canvas geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Minimum output width in pixels
    pub min_width: u32,
    /// Minimum output height in pixels
    pub min_height: u32,
    /// Pixel size in millimeters
    pub pixel_size: f64,
    /// Sub-pixel steps program coordinates are snapped to
    pub position_subdivisions: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_WIDTH,
            min_height: DEFAULT_HEIGHT,
            pixel_size: DEFAULT_PIXEL_SIZE,
            position_subdivisions: DEFAULT_POSITION_SUBDIVISIONS,
        }
    }
}

/// Laser beam settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamSettings {
    /// Beam power in Watts
    pub power: f32,
    /// Multiplier applied to every spindle-derived intensity
    pub multiply: f64,
    /// Minimum marking energy density in J/mm²
    pub energy_density: f32,
    /// Feed rate in mm/min assumed before the program sets one
    pub default_feed_rate: f64,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            power: DEFAULT_BEAM_POWER,
            multiply: DEFAULT_MULTIPLY,
            energy_density: DEFAULT_ENERGY_DENSITY,
            default_feed_rate: DEFAULT_FEED_RATE,
        }
    }
}

/// Material settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    /// Baseline absorbed fraction
    pub absorption: f32,
    /// Absorption change once the material is marked
    pub absorption_factor: f32,
    /// Linear diffusion ratio
    pub diffusion: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            absorption: DEFAULT_ABSORPTION,
            absorption_factor: DEFAULT_ABSORPTION_FACTOR,
            diffusion: DEFAULT_LIN_DIFF,
        }
    }
}

impl MaterialSettings {
    /// Replace the absorption model with a preset's, keeping diffusion
    pub fn apply_preset(&mut self, preset: MaterialPreset) {
        let props = MaterialProperties::from_preset(preset);
        self.absorption = props.absorption;
        self.absorption_factor = props.absorption_factor;
    }
}

/// Complete run configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Canvas geometry
    pub canvas: CanvasSettings,
    /// Beam settings
    pub beam: BeamSettings,
    /// Material settings
    pub material: MaterialSettings,
}

impl PreviewConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the default config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load the default config file, falling back to defaults when absent
    pub fn load_default() -> SettingsResult<Self> {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                debug!("Using built-in configuration: {}", e);
                return Ok(Self::default());
            }
        };
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        check_positive_f64("canvas.pixel_size", self.canvas.pixel_size)?;
        if self.canvas.position_subdivisions == 0 {
            return Err(out_of_range("canvas.position_subdivisions", 0).into());
        }

        check_non_negative("beam.power", self.beam.power)?;
        check_non_negative("beam.energy_density", self.beam.energy_density)?;
        check_positive_f64("beam.default_feed_rate", self.beam.default_feed_rate)?;
        if !self.beam.multiply.is_finite() {
            return Err(out_of_range("beam.multiply", self.beam.multiply).into());
        }

        if !self.material.absorption.is_finite() {
            return Err(out_of_range("material.absorption", self.material.absorption).into());
        }
        if !self.material.absorption_factor.is_finite() {
            return Err(out_of_range(
                "material.absorption_factor",
                self.material.absorption_factor,
            )
            .into());
        }
        check_non_negative("material.diffusion", self.material.diffusion)?;

        Ok(())
    }

    /// Material model described by this config
    pub fn material_properties(&self) -> MaterialProperties {
        MaterialProperties::new(
            self.material.absorption,
            self.material.absorption_factor,
            self.material.diffusion,
        )
    }

    /// Beam model described by this config
    pub fn beam_properties(&self) -> BeamProperties {
        BeamProperties::new(
            self.beam.power,
            self.canvas.pixel_size,
            self.beam.energy_density,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn check_positive_f64(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn check_non_negative(key: &str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}
