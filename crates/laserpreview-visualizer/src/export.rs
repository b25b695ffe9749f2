//! Grayscale export
//!
//! Converts a finished [`Canvas`] into an 8-bit grayscale picture where
//! unmarked material is white and saturated cells are black, then crops and
//! encodes it as PNG.

use crate::raster::Canvas;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder};
use laserpreview_core::{Error, ExportError, RasterError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Map accumulated energy to a gray level; 0 is white, 1 and above is black
pub fn energy_to_gray(energy: f32) -> u8 {
    if energy.is_nan() {
        return u8::MAX;
    }
    (255.0 * (1.0 - energy).clamp(0.0, 1.0)) as u8
}

/// Row-major 8-bit grayscale image, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayscaleImage {
    /// Build from raw pixels; `pixels.len()` must equal `width * height`
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyImage.into());
        }
        if pixels.len() as u64 != u64::from(width) * u64::from(height) {
            return Err(ExportError::Encode {
                reason: format!(
                    "{} pixels do not fill a {}x{} image",
                    pixels.len(),
                    width,
                    height
                ),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Render a canvas. The highest canvas row becomes the top image row so
    /// +Y points up in the picture.
    pub fn from_canvas(canvas: &Canvas) -> Result<Self> {
        let bounds = canvas.bounds();
        let overflow = || {
            Error::from(RasterError::DimensionOverflow {
                width: bounds.width(),
                height: bounds.height(),
            })
        };
        let width = u32::try_from(canvas.width()).map_err(|_| overflow())?;
        let height = u32::try_from(canvas.height()).map_err(|_| overflow())?;

        let mut pixels = Vec::with_capacity(canvas.as_slice().len());
        for row in canvas.rows().rev() {
            pixels.extend(row.iter().map(|&v| energy_to_gray(v)));
        }
        debug!("Rendered {}x{} grayscale image", width, height);
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Gray level at column `x`, row `y` from the top
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    /// Cut out the inclusive rectangle (x0,y0)-(x1,y1) in image coordinates
    pub fn crop(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Result<Self> {
        let invalid = || ExportError::InvalidCrop {
            x0,
            y0,
            x1,
            y1,
            width: self.width,
            height: self.height,
        };
        if x0 < 0 || y0 < 0 || x0 > x1 || y0 > y1 {
            return Err(invalid().into());
        }
        if x1 >= i64::from(self.width) || y1 >= i64::from(self.height) {
            return Err(invalid().into());
        }

        let (left, right) = (x0 as usize, x1 as usize);
        let stride = self.width as usize;
        let mut pixels = Vec::with_capacity((right - left + 1) * (y1 - y0 + 1) as usize);
        for row in self.pixels.chunks_exact(stride).skip(y0 as usize).take((y1 - y0 + 1) as usize) {
            pixels.extend_from_slice(&row[left..=right]);
        }
        Self::new((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32, pixels)
    }

    /// Copy into an `image` buffer
    pub fn to_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Encode as PNG into `writer`
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        PngEncoder::new(writer)
            .write_image(&self.pixels, self.width, self.height, ExtendedColorType::L8)
            .map_err(|e| ExportError::Encode {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Encode as PNG into a new file at `path`
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_png(&mut writer)?;
        writer.flush()?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
