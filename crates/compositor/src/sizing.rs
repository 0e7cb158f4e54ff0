//! Bounded output resolution.

/// Output raster dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: usize,
    pub height: usize,
}

impl OutputSize {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Scale factor that fits the longer source side within `max_dimension`.
///
/// Capped at 1, so small sources are never upscaled.
pub fn scale_factor(src_width: usize, src_height: usize, max_dimension: u32) -> f64 {
    let longest = src_width.max(src_height);
    if longest == 0 {
        return 1.0;
    }
    (max_dimension as f64 / longest as f64).min(1.0)
}

/// Compute the output resolution for a source of `src_width` x `src_height`.
///
/// Each side is `round(side * scale)`, kept within `1..=max_dimension`.
/// Aspect ratio is preserved up to rounding.
pub fn output_size(src_width: usize, src_height: usize, max_dimension: u32) -> OutputSize {
    let scale = scale_factor(src_width, src_height, max_dimension);
    let bound = (max_dimension as usize).max(1);
    let fit = |side: usize| ((side as f64 * scale).round() as usize).clamp(1, bound);

    OutputSize {
        width: fit(src_width),
        height: fit(src_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_source_untouched() {
        assert_eq!(
            output_size(320, 200, 600),
            OutputSize {
                width: 320,
                height: 200
            }
        );
    }

    #[test]
    fn test_scale_is_capped_at_one() {
        assert_eq!(scale_factor(10, 10, 600), 1.0);
    }

    #[test]
    fn test_landscape_downscale() {
        let size = output_size(1200, 800, 600);
        assert_eq!(size.width, 600);
        assert_eq!(size.height, 400);
    }

    #[test]
    fn test_portrait_downscale() {
        let size = output_size(500, 1000, 600);
        assert_eq!(size.width, 300);
        assert_eq!(size.height, 600);
    }

    #[test]
    fn test_extreme_aspect_clamps_to_one() {
        let size = output_size(10_000, 3, 600);
        assert_eq!(size.width, 600);
        assert_eq!(size.height, 1);
    }
}
