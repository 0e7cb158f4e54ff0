//! Threshold classification of intensity bytes.

/// Convert a normalized threshold to the byte it is compared against.
///
/// `floor(clamp(threshold, 0, 1) * 255)`.
pub fn threshold_byte(threshold: f64) -> u8 {
    if threshold.is_nan() {
        return 0;
    }
    (threshold.clamp(0.0, 1.0) * 255.0).floor() as u8
}

/// Classifies intensity bytes against a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    threshold: u8,
}

impl Classifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold_byte(threshold),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// A pixel is anomalous when its intensity reaches the threshold byte.
    #[inline]
    pub fn is_anomalous(&self, intensity: u8) -> bool {
        intensity >= self.threshold
    }
}
