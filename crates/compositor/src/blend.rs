//! Alpha blending of the highlight color into base pixels.

use overlay_common::Color;

/// `round((1 - opacity) * base + opacity * highlight)`, saturated to a byte.
#[inline]
pub fn blend_channel(base: u8, highlight: u8, opacity: f64) -> u8 {
    let mixed = (1.0 - opacity) * base as f64 + opacity * highlight as f64;
    mixed.round() as u8
}

/// Blends a fixed highlight color at a fixed opacity.
///
/// Opacity is used as given. Callers validate or clamp it beforehand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blender {
    highlight: Color,
    opacity: f64,
}

impl Blender {
    pub fn new(highlight: Color, opacity: f64) -> Self {
        Self { highlight, opacity }
    }

    pub fn highlight(&self) -> Color {
        self.highlight
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Blend the R, G and B channels of `pixel` in place.
    ///
    /// Any channel past the third (alpha) is left untouched.
    #[inline]
    pub fn blend_into(&self, pixel: &mut [u8]) {
        let [hr, hg, hb] = self.highlight.as_array();
        pixel[0] = blend_channel(pixel[0], hr, self.opacity);
        pixel[1] = blend_channel(pixel[1], hg, self.opacity);
        pixel[2] = blend_channel(pixel[2], hb, self.opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_channel_half() {
        assert_eq!(blend_channel(100, 255, 0.5), 178);
        assert_eq!(blend_channel(100, 0, 0.5), 50);
    }

    #[test]
    fn test_blend_channel_extremes() {
        for base in [0u8, 1, 127, 254, 255] {
            assert_eq!(blend_channel(base, 255, 0.0), base);
            assert_eq!(blend_channel(base, 255, 1.0), 255);
            assert_eq!(blend_channel(base, 0, 1.0), 0);
        }
    }

    #[test]
    fn test_blend_into_keeps_alpha() {
        let blender = Blender::new(Color::HIGHLIGHT, 1.0);
        let mut pixel = [10, 20, 30, 77];
        blender.blend_into(&mut pixel);
        assert_eq!(pixel, [255, 0, 0, 77]);
    }
}
