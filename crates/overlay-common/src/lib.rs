//! Common types shared across the anomaly-overlay workspace.

pub mod color;
pub mod error;
pub mod params;
pub mod raster;

pub use color::Color;
pub use error::{OverlayError, Result};
pub use params::{OverlayParams, ResampleMode, DEFAULT_MAX_OUTPUT_DIMENSION, DEFAULT_OPACITY};
pub use raster::{PixelLayout, RasterBuffer};
