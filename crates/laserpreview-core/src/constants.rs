//! Default values and fixed tuning constants.

/// Default minimum canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 0;

/// Default minimum canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 0;

/// Default pixel size in millimeters
pub const DEFAULT_PIXEL_SIZE: f64 = 0.1;

/// Default beam power in Watts
pub const DEFAULT_BEAM_POWER: f32 = 10.0;

/// Default minimum marking energy density in J/mm²
pub const DEFAULT_ENERGY_DENSITY: f32 = 0.5;

/// Default linear diffusion ratio (share of energy sent one pixel away)
pub const DEFAULT_LIN_DIFF: f32 = 0.25;

/// Clear wood: little absorption at first, far more once burnt.
pub const DEFAULT_ABSORPTION: f32 = 0.75;

/// Absorption adjustment per unit of energy already in a cell
pub const DEFAULT_ABSORPTION_FACTOR: f32 = 2.0;

/// Default multiplier applied to spindle-derived intensity
pub const DEFAULT_MULTIPLY: f64 = 1.0;

/// Feed rate (mm/min) assumed until the program sets one
pub const DEFAULT_FEED_RATE: f64 = 1000.0;

/// Default number of sub-pixel steps program coordinates snap to
pub const DEFAULT_POSITION_SUBDIVISIONS: u32 = 1;

/// Beam centers are snapped to 1/16 of a pixel before depositing.
///
/// Tiny fractional parts left over from non-integer pixel sizes (7/80mm
/// for instance) otherwise push axis-aligned lines into the neighbouring
/// row or column.
pub const BEAM_SNAP_DIVISIONS: f64 = 16.0;

/// Residual energy below which diffusion stops spreading
pub const DIFFUSION_CUTOFF: f32 = 0.05;

/// Hard limit on diffusion hops away from the deposit point
pub const MAX_SPREAD_DEPTH: u32 = 64;

/// Full-scale spindle value
pub const SPINDLE_MAX: f64 = 255.0;

/// Line length the interpreter expects; longer lines are warned about
pub const MAX_LINE_LENGTH: usize = 1024;
