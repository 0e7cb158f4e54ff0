//! Configuration for the compositor.

use overlay_common::{
    Color, OverlayParams, ResampleMode, DEFAULT_MAX_OUTPUT_DIMENSION, DEFAULT_OPACITY,
};
use serde::{Deserialize, Serialize};

/// Defaults applied to every redraw unless the caller overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Upper bound on the longer output side, in pixels.
    pub max_output_dimension: u32,

    /// Highlight opacity used when the caller gives none.
    pub default_opacity: f64,

    /// Intensity resampling strategy.
    pub resample_mode: ResampleMode,

    /// Color blended over anomalous pixels.
    pub highlight: Color,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_output_dimension: DEFAULT_MAX_OUTPUT_DIMENSION,
            default_opacity: DEFAULT_OPACITY,
            resample_mode: ResampleMode::Flattened,
            highlight: Color::HIGHLIGHT,
        }
    }
}

impl CompositorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("OVERLAY_MAX_DIMENSION") {
            if let Ok(dim) = val.parse() {
                config.max_output_dimension = dim;
            }
        }

        if let Ok(val) = std::env::var("OVERLAY_OPACITY") {
            if let Ok(opacity) = val.parse() {
                config.default_opacity = opacity;
            }
        }

        if let Ok(val) = std::env::var("OVERLAY_RESAMPLE_MODE") {
            config.resample_mode = ResampleMode::from_str(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_output_dimension == 0 {
            return Err("max_output_dimension must be > 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.default_opacity) {
            return Err(format!(
                "default_opacity must be within [0, 1], got {}",
                self.default_opacity
            ));
        }

        Ok(())
    }

    /// Overlay parameters for `threshold`, filling the rest from this config.
    pub fn params(&self, threshold: f64, opacity: Option<f64>) -> OverlayParams {
        OverlayParams {
            threshold,
            opacity: opacity.unwrap_or(self.default_opacity),
            max_output_dimension: self.max_output_dimension,
            resample_mode: self.resample_mode,
        }
    }
}
