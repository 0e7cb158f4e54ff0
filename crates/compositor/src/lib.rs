//! Threshold overlay compositing for anomaly maps.
//!
//! Produces a composite raster: the base image with a highlight color
//! blended over every pixel whose anomaly intensity reaches a threshold.
//!
//! - Output sizing (bounded, aspect-preserving, never upscales)
//! - Nearest-neighbor resampling (flattened or geometric)
//! - Threshold classification
//! - Alpha blending
//! - Heatmap rendering and coverage statistics for intensity rasters

pub mod blend;
pub mod classify;
pub mod config;
pub mod heatmap;
pub mod pipeline;
pub mod resample;
pub mod sizing;
pub mod stats;

pub use config::CompositorConfig;
pub use pipeline::{composite, composite_cancellable, CompositeRequest, CompositeResult};
pub use sizing::{output_size, OutputSize};
pub use stats::{coverage, suggest_threshold, CoverageStats};
