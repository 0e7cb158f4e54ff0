//! Owned raster buffers.
//!
//! A [`RasterBuffer`] is a row-major grid of 8-bit samples. The same type
//! carries both flavors used by the compositor:
//!
//! - **Color buffers** (`Rgb` / `Rgba`): the base image and the composite.
//! - **Intensity buffers** (`Gray`, or a grayscale image replicated across
//!   `Rgb`/`Rgba` channels): the anomaly score scaled to 0..=255, read from
//!   channel 0.

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};

/// Per-pixel channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl PixelLayout {
    /// Number of bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether the layout carries red/green/blue channels.
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Rgb | Self::Rgba)
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba)
    }

    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }
}

/// An owned, contiguous raster.
///
/// Invariant: `data.len() == width * height * layout.channels()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap existing sample data, checking the length invariant.
    pub fn new(width: usize, height: usize, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or_else(|| {
                OverlayError::invalid_buffer(format!("{}x{} raster is too large", width, height))
            })?;

        if data.len() != expected {
            return Err(OverlayError::invalid_buffer(format!(
                "expected {} bytes for {}x{} {:?}, got {}",
                expected,
                width,
                height,
                layout,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// A raster with every pixel set to `pixel`.
    ///
    /// `pixel` must hold exactly `layout.channels()` samples.
    pub fn filled(width: usize, height: usize, layout: PixelLayout, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != layout.channels() {
            return Err(OverlayError::invalid_buffer(format!(
                "fill pixel has {} channels, {:?} needs {}",
                pixel.len(),
                layout,
                layout.channels()
            )));
        }
        let data = pixel.repeat(width * height);
        Self::new(width, height, layout, data)
    }

    /// Single-channel intensity raster.
    pub fn gray(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Gray, data)
    }

    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Rgb, data)
    }

    pub fn rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Rgba, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Samples of the pixel at flattened index `index`.
    pub fn pixel(&self, index: usize) -> &[u8] {
        let c = self.channels();
        &self.data[index * c..index * c + c]
    }

    /// Samples of the pixel at column `x`, row `y`.
    pub fn pixel_at(&self, x: usize, y: usize) -> &[u8] {
        self.pixel(y * self.width + x)
    }

    /// First-channel sample at flattened index `index`.
    ///
    /// For intensity rasters this is the anomaly byte regardless of layout.
    pub fn first_channel(&self, index: usize) -> u8 {
        self.data[index * self.channels()]
    }

    /// Fails with `DimensionMismatch` when the raster has no pixels.
    pub fn ensure_non_empty(&self, name: &str) -> Result<()> {
        if self.is_empty() {
            return Err(OverlayError::dimension_mismatch(format!(
                "{} buffer has zero size ({}x{})",
                name, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Fails with `InvalidBuffer` unless the raster is RGB or RGBA.
    pub fn ensure_color(&self, name: &str) -> Result<()> {
        if !self.layout.is_color() {
            return Err(OverlayError::invalid_buffer(format!(
                "{} buffer must be RGB or RGBA, got {:?}",
                name, self.layout
            )));
        }
        Ok(())
    }
}
