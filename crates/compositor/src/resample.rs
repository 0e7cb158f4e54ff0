//! Nearest-neighbor index mapping from output pixels to source samples.
//!
//! Two mappings exist for the intensity raster:
//!
//! - **Flattened**: `floor(i / out_n * src_n)` on the row-major pixel index.
//!   Cheap, and exact when both rasters share an aspect ratio, but it drifts
//!   across rows otherwise.
//! - **Geometric**: independent per-axis mapping of (x, y).
//!
//! The base color raster always uses the geometric mapping, since it is
//! drawn at output scale.

use overlay_common::{RasterBuffer, ResampleMode};

use crate::sizing::OutputSize;

/// Map a flattened output index onto a flattened source index.
///
/// Integer arithmetic gives the exact floor of `(index / out_pixels) * src_pixels`.
#[inline]
pub fn flattened_index(index: usize, out_pixels: usize, src_pixels: usize) -> usize {
    let mapped = (index as u128 * src_pixels as u128) / out_pixels as u128;
    (mapped as usize).min(src_pixels.saturating_sub(1))
}

/// Map one output coordinate onto the matching source coordinate.
#[inline]
pub fn nearest_axis(coord: usize, out_len: usize, src_len: usize) -> usize {
    let mapped = (coord as u128 * src_len as u128) / out_len as u128;
    (mapped as usize).min(src_len.saturating_sub(1))
}

/// Precomputed column lookup for a source raster at output resolution.
///
/// Row lookups are cheap enough to compute per row; column lookups are reused
/// for every row, so they are tabulated once.
#[derive(Debug, Clone)]
pub struct AxisMap {
    columns: Vec<usize>,
    src_height: usize,
    out_height: usize,
}

impl AxisMap {
    pub fn new(src_width: usize, src_height: usize, out: OutputSize) -> Self {
        let columns = (0..out.width)
            .map(|x| nearest_axis(x, out.width, src_width))
            .collect();
        Self {
            columns,
            src_height,
            out_height: out.height,
        }
    }

    #[inline]
    pub fn source_row(&self, y: usize) -> usize {
        nearest_axis(y, self.out_height, self.src_height)
    }

    #[inline]
    pub fn source_column(&self, x: usize) -> usize {
        self.columns[x]
    }
}

/// Reads resampled intensity bytes for output pixels.
#[derive(Debug)]
pub struct IntensitySampler<'a> {
    source: &'a RasterBuffer,
    mode: ResampleMode,
    out_pixels: usize,
    axes: Option<AxisMap>,
}

impl<'a> IntensitySampler<'a> {
    pub fn new(source: &'a RasterBuffer, out: OutputSize, mode: ResampleMode) -> Self {
        let axes = match mode {
            ResampleMode::Geometric => Some(AxisMap::new(source.width(), source.height(), out)),
            ResampleMode::Flattened => None,
        };
        Self {
            source,
            mode,
            out_pixels: out.pixel_count(),
            axes,
        }
    }

    pub fn mode(&self) -> ResampleMode {
        self.mode
    }

    /// Intensity byte for the output pixel at (`x`, `y`), flattened `index`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, index: usize) -> u8 {
        let src_index = match &self.axes {
            Some(axes) => axes.source_row(y) * self.source.width() + axes.source_column(x),
            None => flattened_index(index, self.out_pixels, self.source.pixel_count()),
        };
        self.source.first_channel(src_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_identity() {
        for i in 0..16 {
            assert_eq!(flattened_index(i, 16, 16), i);
        }
    }

    #[test]
    fn test_flattened_downsample() {
        // 4 output pixels over 16 source pixels: every 4th sample.
        let picked: Vec<usize> = (0..4).map(|i| flattened_index(i, 4, 16)).collect();
        assert_eq!(picked, vec![0, 4, 8, 12]);
    }

    #[test]
    fn test_flattened_upsample_repeats() {
        let picked: Vec<usize> = (0..4).map(|i| flattened_index(i, 4, 2)).collect();
        assert_eq!(picked, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_nearest_axis_stays_in_bounds() {
        for x in 0..7 {
            assert!(nearest_axis(x, 7, 3) < 3);
        }
        assert_eq!(nearest_axis(6, 7, 3), 2);
    }
}
