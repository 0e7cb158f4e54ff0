//! Coverage statistics and threshold suggestion for intensity rasters.
//!
//! Everything is derived from a 256-bin histogram of the intensity bytes,
//! which is built in parallel for large rasters.

use overlay_common::{OverlayParams, RasterBuffer, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::classify::threshold_byte;

/// Minimum pixels before the histogram is built in parallel.
const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Bounds applied to a suggested threshold.
pub const SUGGESTED_THRESHOLD_MIN: f64 = 0.35;
pub const SUGGESTED_THRESHOLD_MAX: f64 = 0.85;

/// Quantile used for the suggested threshold.
pub const SUGGESTED_QUANTILE: f64 = 0.90;

/// Histogram of first-channel intensity bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityHistogram {
    bins: [u64; 256],
    total: u64,
}

impl IntensityHistogram {
    pub fn from_raster(intensity: &RasterBuffer) -> Self {
        let channels = intensity.channels();
        let data = intensity.data();

        let bins = if intensity.pixel_count() >= PARALLEL_THRESHOLD {
            let chunk = (data.len() / rayon::current_num_threads()).max(4096) / channels * channels;
            data.par_chunks(chunk.max(channels))
                .map(|part| count_bins(part, channels))
                .reduce(|| [0u64; 256], merge_bins)
        } else {
            count_bins(data, channels)
        };

        Self {
            bins,
            total: intensity.pixel_count() as u64,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, value: u8) -> u64 {
        self.bins[value as usize]
    }

    /// Pixels whose intensity is at or above `byte`.
    pub fn count_at_or_above(&self, byte: u8) -> u64 {
        self.bins[byte as usize..].iter().sum()
    }

    /// Mean intensity normalized to [0, 1].
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(value, &count)| value as f64 * count as f64)
            .sum();
        sum / self.total as f64 / 255.0
    }

    /// Normalized intensity at quantile `q`.
    ///
    /// Interpolates linearly between the two nearest ranks, matching
    /// `numpy.quantile`'s default method.
    pub fn quantile(&self, q: f64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let position = q.clamp(0.0, 1.0) * (self.total - 1) as f64;
        let lower = position.floor() as u64;
        let fraction = position - lower as f64;

        let low = self.value_at_rank(lower) as f64;
        let high = if fraction > 0.0 {
            self.value_at_rank(lower + 1) as f64
        } else {
            low
        };
        (low + fraction * (high - low)) / 255.0
    }

    /// Intensity byte of the sample at 0-based `rank` in sorted order.
    fn value_at_rank(&self, rank: u64) -> u8 {
        let mut cumulative = 0u64;
        for (value, &count) in self.bins.iter().enumerate() {
            cumulative += count;
            if cumulative > rank {
                return value as u8;
            }
        }
        u8::MAX
    }
}

fn count_bins(samples: &[u8], channels: usize) -> [u64; 256] {
    let mut bins = [0u64; 256];
    for sample in samples.iter().step_by(channels) {
        bins[*sample as usize] += 1;
    }
    bins
}

fn merge_bins(mut a: [u64; 256], b: [u64; 256]) -> [u64; 256] {
    for (dst, src) in a.iter_mut().zip(b.iter()) {
        *dst += src;
    }
    a
}

/// Summary of how much of an intensity raster a threshold flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageStats {
    pub threshold: f64,
    pub threshold_byte: u8,
    pub anomaly_pixels: u64,
    pub total_pixels: u64,
    pub anomaly_pixels_pct: f64,
    pub score_mean: f64,
    pub score_p95: f64,
}

/// Coverage statistics for `intensity` at `threshold`, at source resolution.
pub fn coverage(intensity: &RasterBuffer, threshold: f64) -> Result<CoverageStats> {
    intensity.ensure_non_empty("intensity")?;
    let histogram = IntensityHistogram::from_raster(intensity);
    Ok(coverage_from_histogram(&histogram, threshold))
}

pub fn coverage_from_histogram(histogram: &IntensityHistogram, threshold: f64) -> CoverageStats {
    let byte = threshold_byte(threshold);
    let anomaly_pixels = histogram.count_at_or_above(byte);
    let total_pixels = histogram.total();
    let anomaly_pixels_pct = if total_pixels == 0 {
        0.0
    } else {
        anomaly_pixels as f64 * 100.0 / total_pixels as f64
    };

    CoverageStats {
        threshold,
        threshold_byte: byte,
        anomaly_pixels,
        total_pixels,
        anomaly_pixels_pct,
        score_mean: histogram.mean(),
        score_p95: histogram.quantile(0.95),
    }
}

/// Suggest a starting threshold: the 90th percentile, kept within
/// [`SUGGESTED_THRESHOLD_MIN`, `SUGGESTED_THRESHOLD_MAX`].
pub fn suggest_threshold(intensity: &RasterBuffer) -> Result<f64> {
    intensity.ensure_non_empty("intensity")?;
    let histogram = IntensityHistogram::from_raster(intensity);
    Ok(histogram
        .quantile(SUGGESTED_QUANTILE)
        .clamp(SUGGESTED_THRESHOLD_MIN, SUGGESTED_THRESHOLD_MAX))
}

/// Parameters seeded with a suggested threshold for `intensity`.
pub fn suggested_params(intensity: &RasterBuffer, base: OverlayParams) -> Result<OverlayParams> {
    Ok(OverlayParams {
        threshold: suggest_threshold(intensity)?,
        ..base
    })
}
