//! Caller-supplied overlay parameters.

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};

/// Default bound on the longer output side, keeps redraw cost constant.
pub const DEFAULT_MAX_OUTPUT_DIMENSION: u32 = 600;

/// Default highlight opacity.
pub const DEFAULT_OPACITY: f64 = 0.45;

/// How intensity samples are located for an output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMode {
    /// Proportional mapping of the flattened pixel index.
    ///
    /// Only geometrically faithful when base and intensity share an aspect
    /// ratio.
    #[default]
    Flattened,
    /// Per-axis nearest-neighbor mapping of (x, y).
    Geometric,
}

impl ResampleMode {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// `Flattened`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "geometric" | "xy" => Self::Geometric,
            _ => Self::Flattened,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flattened => "flattened",
            Self::Geometric => "geometric",
        }
    }
}

/// Threshold/opacity pair plus output bound for one redraw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayParams {
    /// Normalized intensity at or above which a pixel is highlighted.
    pub threshold: f64,
    /// Highlight weight in the blend.
    pub opacity: f64,
    pub max_output_dimension: u32,
    #[serde(default)]
    pub resample_mode: ResampleMode,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            opacity: DEFAULT_OPACITY,
            max_output_dimension: DEFAULT_MAX_OUTPUT_DIMENSION,
            resample_mode: ResampleMode::Flattened,
        }
    }
}

impl OverlayParams {
    pub fn new(threshold: f64, opacity: f64) -> Self {
        Self {
            threshold,
            opacity,
            ..Self::default()
        }
    }

    pub fn with_max_output_dimension(mut self, max_output_dimension: u32) -> Self {
        self.max_output_dimension = max_output_dimension;
        self
    }

    pub fn with_resample_mode(mut self, mode: ResampleMode) -> Self {
        self.resample_mode = mode;
        self
    }

    /// Reject out-of-range values before any pixel work.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("threshold", self.threshold)?;
        check_unit_interval("opacity", self.opacity)?;
        if self.max_output_dimension == 0 {
            return Err(OverlayError::invalid_parameter(
                "max_output_dimension",
                "must be > 0",
            ));
        }
        Ok(())
    }

    /// Copy with threshold and opacity clamped into [0, 1].
    ///
    /// NaN maps to 0. `max_output_dimension` is left as is.
    pub fn clamped(&self) -> Self {
        Self {
            threshold: clamp_unit(self.threshold),
            opacity: clamp_unit(self.opacity),
            ..*self
        }
    }
}

fn check_unit_interval(param: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(OverlayError::invalid_parameter(
            param,
            format!("must be within [0, 1], got {}", value),
        ));
    }
    Ok(())
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
