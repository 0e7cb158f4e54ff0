//! Single-pass compositing of a threshold overlay.
//!
//! ```text
//! CompositeRequest
//!      │
//!      ├─► validate parameters and buffers
//!      │
//!      ├─► output_size(base)            (cancel check)
//!      │
//!      ├─► for each output pixel:       (cancel check before the pass)
//!      │      base sample  ──► copy
//!      │      intensity sample ──► classify ──► blend if anomalous
//!      │
//!      └─► CompositeResult              (cancel check after the pass)
//! ```

use std::time::Instant;

use overlay_common::{Color, OverlayError, OverlayParams, RasterBuffer, Result};
use tracing::debug;

use crate::blend::Blender;
use crate::classify::Classifier;
use crate::resample::{AxisMap, IntensitySampler};
use crate::sizing::{output_size, OutputSize};

/// Immutable input to one compositing pass.
#[derive(Debug, Clone, Copy)]
pub struct CompositeRequest<'a> {
    pub base: &'a RasterBuffer,
    pub intensity: &'a RasterBuffer,
    pub params: OverlayParams,
    pub highlight: Color,
}

impl<'a> CompositeRequest<'a> {
    pub fn new(base: &'a RasterBuffer, intensity: &'a RasterBuffer, params: OverlayParams) -> Self {
        Self {
            base,
            intensity,
            params,
            highlight: Color::HIGHLIGHT,
        }
    }

    pub fn with_highlight(mut self, highlight: Color) -> Self {
        self.highlight = highlight;
        self
    }

    /// Check parameters and source buffers before any pixel work.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        self.base.ensure_color("base")?;
        self.base.ensure_non_empty("base")?;
        self.intensity.ensure_non_empty("intensity")?;
        Ok(())
    }
}

/// The finished composite, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeResult {
    raster: RasterBuffer,
    threshold_byte: u8,
    anomalous_pixels: usize,
}

impl CompositeResult {
    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn into_raster(self) -> RasterBuffer {
        self.raster
    }

    pub fn width(&self) -> usize {
        self.raster.width()
    }

    pub fn height(&self) -> usize {
        self.raster.height()
    }

    pub fn size(&self) -> OutputSize {
        OutputSize {
            width: self.raster.width(),
            height: self.raster.height(),
        }
    }

    /// The byte threshold the classifier compared against.
    pub fn threshold_byte(&self) -> u8 {
        self.threshold_byte
    }

    /// Number of output pixels that received the highlight.
    pub fn anomalous_pixels(&self) -> usize {
        self.anomalous_pixels
    }

    /// Share of output pixels that received the highlight, in percent.
    pub fn anomalous_percent(&self) -> f64 {
        let total = self.raster.pixel_count();
        if total == 0 {
            return 0.0;
        }
        self.anomalous_pixels as f64 * 100.0 / total as f64
    }
}

/// Composite without cancellation.
pub fn composite(request: &CompositeRequest<'_>) -> Result<CompositeResult> {
    composite_cancellable(request, || false)
}

/// Composite, polling `is_cancelled` at each stage boundary.
///
/// Returns `OverlayError::Cancelled` as soon as a poll reports cancellation.
/// The pixel pass itself is never interrupted part-way.
pub fn composite_cancellable<F>(request: &CompositeRequest<'_>, is_cancelled: F) -> Result<CompositeResult>
where
    F: Fn() -> bool,
{
    request.validate()?;
    if is_cancelled() {
        return Err(OverlayError::Cancelled);
    }

    let start = Instant::now();
    let base = request.base;
    let params = &request.params;
    let out = output_size(base.width(), base.height(), params.max_output_dimension);

    if is_cancelled() {
        return Err(OverlayError::Cancelled);
    }

    let (raster, anomalous_pixels, classifier) = composite_pass(request, out)?;

    if is_cancelled() {
        return Err(OverlayError::Cancelled);
    }

    debug!(
        src_width = base.width(),
        src_height = base.height(),
        out_width = out.width,
        out_height = out.height,
        threshold_byte = classifier.threshold(),
        opacity = params.opacity,
        resample_mode = params.resample_mode.as_str(),
        anomalous_pixels,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Composited overlay"
    );

    Ok(CompositeResult {
        raster,
        threshold_byte: classifier.threshold(),
        anomalous_pixels,
    })
}

/// Resample, classify and blend in one iteration over output pixels.
fn composite_pass(
    request: &CompositeRequest<'_>,
    out: OutputSize,
) -> Result<(RasterBuffer, usize, Classifier)> {
    let base = request.base;
    let channels = base.channels();
    let base_axes = AxisMap::new(base.width(), base.height(), out);
    let sampler = IntensitySampler::new(request.intensity, out, request.params.resample_mode);
    let classifier = Classifier::new(request.params.threshold);
    let blender = Blender::new(request.highlight, request.params.opacity);

    let mut data = vec![0u8; out.pixel_count() * channels];
    let mut anomalous_pixels = 0usize;

    for (y, row) in data.chunks_exact_mut(out.width * channels).enumerate() {
        let src_y = base_axes.source_row(y);
        for (x, pixel) in row.chunks_exact_mut(channels).enumerate() {
            pixel.copy_from_slice(base.pixel_at(base_axes.source_column(x), src_y));

            let index = y * out.width + x;
            if classifier.is_anomalous(sampler.sample(x, y, index)) {
                blender.blend_into(pixel);
                anomalous_pixels += 1;
            }
        }
    }

    let raster = RasterBuffer::new(out.width, out.height, base.layout(), data)?;
    Ok((raster, anomalous_pixels, classifier))
}
