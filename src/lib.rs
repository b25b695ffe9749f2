//! # LaserPreview
//!
//! Simulates how a laser engraving program burns a surface and renders the
//! result as an 8-bit grayscale image.
//!
//! ## Architecture
//!
//! LaserPreview is organized as a workspace with multiple crates:
//!
//! 1. **laserpreview-core** - Errors, constants, material and beam model, geometry
//! 2. **laserpreview-settings** - Run configuration files and validation
//! 3. **laserpreview-visualizer** - Canvas, burn simulation, G-code interpreter, export
//! 4. **laserpreview** - Main binary and the end-to-end preview pipeline
//!
//! ## Pipeline
//!
//! G-code lines feed the [`MotionInterpreter`], which hands drawing moves to
//! the [`BurnSimulator`]. The simulator rasterizes each move into beam
//! spots, deposits energy into a growable canvas, and spreads it with the
//! material's diffusion kernel. The finished canvas becomes a
//! [`GrayscaleImage`].

use anyhow::Context;
use serde::Serialize;
use std::io::BufRead;
use tracing::{error, info};

pub use laserpreview_core::{
    BeamProperties, CellBounds, Error, ExportError, MaterialPreset, MaterialProperties, Point2,
    RasterError, Result,
};
pub use laserpreview_settings::{
    BeamSettings, CanvasSettings, MaterialSettings, PreviewConfig, SettingsError,
};
pub use laserpreview_visualizer::{
    BurnSimulator, Canvas, GrayscaleImage, InterpreterSettings, InterpreterStats,
    MotionInterpreter, SimulationStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support, `default_level` otherwise
/// - Output on stderr, since the image may be written to stdout
pub fn init_logging(format: LogFormat, default_level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_level(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };
    result.context("Failed to install tracing subscriber")
}

/// Summary of a preview run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewReport {
    /// Final canvas rectangle
    pub bounds: CellBounds,
    /// Canvas width in cells
    pub width: u64,
    /// Canvas height in cells
    pub height: u64,
    /// Program lines read
    pub lines: u64,
    /// Drawing moves burnt
    pub segments: u64,
    /// Beam spots burnt
    pub deposits: u64,
    /// Cells that reached their marking threshold
    pub marked_cells: u64,
}

/// Rendered image plus run summary
#[derive(Debug, Clone)]
pub struct PreviewOutput {
    pub image: GrayscaleImage,
    pub report: PreviewReport,
}

/// Interpreter parameters matching a configuration
pub fn interpreter_settings(config: &PreviewConfig) -> InterpreterSettings {
    InterpreterSettings {
        zoom: config.beam_properties().zoom(),
        subdivisions: config.canvas.position_subdivisions,
        power_multiplier: config.beam.multiply,
    }
}

/// Simulate the program read from `input` and render the burnt canvas
pub fn run_preview<R: BufRead>(config: &PreviewConfig, input: R) -> anyhow::Result<PreviewOutput> {
    config.validate().context("Invalid configuration")?;

    let mut simulator =
        BurnSimulator::new(config.material_properties(), config.beam_properties());
    simulator
        .reserve_area(config.canvas.min_width, config.canvas.min_height)
        .context("Failed to allocate canvas")?;
    simulator.set_feed_rate(config.beam.default_feed_rate);

    let mut interpreter = MotionInterpreter::new(interpreter_settings(config));
    let lines = match interpreter.run(input, &mut simulator) {
        Ok(lines) => lines,
        Err(e) => {
            if e.is_allocation_failure() {
                error!(
                    "Canvas stopped growing at {} on line {}",
                    simulator.bounds(),
                    interpreter.stats().lines
                );
            }
            return Err(e).context("Failed to simulate program");
        }
    };

    let bounds = simulator.bounds();
    info!("x0={} y0={} x1={} y1={}", bounds.x0, bounds.y0, bounds.x1, bounds.y1);

    let stats = simulator.stats();
    let report = PreviewReport {
        bounds,
        width: bounds.width(),
        height: bounds.height(),
        lines: lines.lines,
        segments: lines.segments,
        deposits: stats.deposits,
        marked_cells: stats.marked_cells,
    };

    let image =
        GrayscaleImage::from_canvas(simulator.canvas()).context("Failed to render canvas")?;
    Ok(PreviewOutput { image, report })
}
