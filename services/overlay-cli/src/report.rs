//! JSON run report.

use compositor::{CompositeResult, CoverageStats};
use overlay_common::OverlayParams;
use serde::Serialize;

/// Summary of one overlay render, written with `--report`.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub base: String,
    pub intensity: String,
    pub output: String,
    /// Output `[width, height]`.
    pub size: [usize; 2],
    pub params: OverlayParams,
    pub threshold_suggested: bool,
    pub output_anomaly_pixels_pct: f64,
    /// Coverage at source resolution.
    pub coverage: CoverageStats,
}

impl RenderReport {
    pub fn new(
        base: String,
        intensity: String,
        output: String,
        params: OverlayParams,
        threshold_suggested: bool,
        result: &CompositeResult,
        coverage: CoverageStats,
    ) -> Self {
        Self {
            base,
            intensity,
            output,
            size: [result.width(), result.height()],
            params,
            threshold_suggested,
            output_anomaly_pixels_pct: result.anomalous_percent(),
            coverage,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
