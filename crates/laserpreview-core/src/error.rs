//! Error handling for LaserPreview
//!
//! Provides error types for the layers of the simulation:
//! - Raster errors (canvas growth and memory exhaustion)
//! - Export errors (grayscale conversion, cropping, encoding)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Raster error type
///
/// The only failures the simulation core can produce. Both are fatal for a
/// run: a caller receiving one must abandon the write that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The canvas arena could not be grown
    #[error("Out of memory growing canvas to {width}x{height} cells")]
    AllocationFailed {
        /// Requested width in cells.
        width: u64,
        /// Requested height in cells.
        height: u64,
    },

    /// The requested canvas cannot be addressed at all
    #[error("Canvas dimensions {width}x{height} overflow addressable memory")]
    DimensionOverflow {
        /// Requested width in cells.
        width: u64,
        /// Requested height in cells.
        height: u64,
    },
}

/// Export error type
///
/// Represents errors raised while turning a finished canvas into an image.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Crop rectangle does not fit inside the image
    #[error("Invalid crop ({x0},{y0})-({x1},{y1}) for {width}x{height} image")]
    InvalidCrop {
        /// Left column.
        x0: i64,
        /// Top row.
        y0: i64,
        /// Right column, inclusive.
        x1: i64,
        /// Bottom row, inclusive.
        y1: i64,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The image has no pixels
    #[error("Image is empty")]
    EmptyImage,

    /// The image encoder rejected the buffer
    #[error("Failed to encode image: {reason}")]
    Encode {
        /// The reason given by the encoder.
        reason: String,
    },
}

/// Main error type for LaserPreview
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Raster error
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is an allocation failure
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::Raster(RasterError::AllocationFailed { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
