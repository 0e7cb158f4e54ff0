//! Raster generators for creating synthetic base and intensity images.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use overlay_common::{PixelLayout, RasterBuffer};

/// Creates an RGB raster with every pixel set to `rgb`.
pub fn uniform_rgb(width: usize, height: usize, rgb: [u8; 3]) -> RasterBuffer {
    RasterBuffer::filled(width, height, PixelLayout::Rgb, &rgb).expect("valid uniform rgb raster")
}

/// Creates an RGBA raster with every pixel set to `rgba`.
pub fn uniform_rgba(width: usize, height: usize, rgba: [u8; 4]) -> RasterBuffer {
    RasterBuffer::filled(width, height, PixelLayout::Rgba, &rgba)
        .expect("valid uniform rgba raster")
}

/// Creates a single-channel intensity raster with every pixel set to `value`.
pub fn uniform_intensity(width: usize, height: usize, value: u8) -> RasterBuffer {
    RasterBuffer::filled(width, height, PixelLayout::Gray, &[value])
        .expect("valid uniform intensity raster")
}

/// Creates an intensity raster whose value encodes the flattened index.
///
/// Pixel `i` holds `i % 256`, so a sampled byte identifies which source
/// pixel was read (for rasters up to 256 pixels).
pub fn index_intensity(width: usize, height: usize) -> RasterBuffer {
    let data = (0..width * height).map(|i| (i % 256) as u8).collect();
    RasterBuffer::gray(width, height, data).expect("valid index intensity raster")
}

/// Creates an intensity raster that ramps from 0 at the left edge to 255 at
/// the right edge.
pub fn horizontal_ramp(width: usize, height: usize) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        for col in 0..width {
            let value = if width > 1 {
                col * 255 / (width - 1)
            } else {
                0
            };
            data.push(value as u8);
        }
    }
    RasterBuffer::gray(width, height, data).expect("valid ramp raster")
}

/// Creates an intensity raster where each row is a constant value.
///
/// Row `r` holds `values[r % values.len()]`.
pub fn row_bands(width: usize, height: usize, values: &[u8]) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        let value = values[row % values.len()];
        data.extend(std::iter::repeat(value).take(width));
    }
    RasterBuffer::gray(width, height, data).expect("valid banded raster")
}

/// Creates an RGB raster whose pixel encodes its position: `(x, y, 0)`.
///
/// Useful for checking which source pixel the resampler picked.
pub fn coordinate_rgb(width: usize, height: usize) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            data.extend_from_slice(&[(col % 256) as u8, (row % 256) as u8, 0]);
        }
    }
    RasterBuffer::rgb(width, height, data).expect("valid coordinate raster")
}

/// Creates an RGB raster with a satellite-like texture.
///
/// Deterministic, so composites of it can be compared byte-for-byte.
pub fn textured_rgb(width: usize, height: usize) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            let r = ((col * 31 + row * 17) % 200 + 30) as u8;
            let g = ((col * 13 + row * 29) % 180 + 40) as u8;
            let b = ((col * 7 + row * 11) % 120 + 20) as u8;
            data.extend_from_slice(&[r, g, b]);
        }
    }
    RasterBuffer::rgb(width, height, data).expect("valid textured raster")
}

/// Creates a grayscale intensity raster replicated across RGBA channels, the
/// way decoded grayscale PNGs often arrive.
pub fn replicated_intensity(width: usize, height: usize, value: u8) -> RasterBuffer {
    uniform_rgba(width, height, [value, value, value, 255])
}
