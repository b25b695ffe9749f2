//! # LaserPreview Settings
//!
//! Run configuration for LaserPreview: canvas geometry, beam, and material
//! sections, loaded from JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{BeamSettings, CanvasSettings, MaterialSettings, PreviewConfig};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
