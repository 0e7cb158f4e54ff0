//! Heatmap rendering for intensity rasters.
//!
//! Maps each intensity byte through a "hot" color ramp:
//! black → red → yellow → white.

use overlay_common::{Color, RasterBuffer, Result};

/// Color stops of the hot ramp as (position, color).
const HOT_STOPS: [(f32, Color); 4] = [
    (0.0, Color::new(0, 0, 0)),
    (0.375, Color::new(255, 0, 0)),
    (0.75, Color::new(255, 255, 0)),
    (1.0, Color::new(255, 255, 255)),
];

/// Hot ramp color for a normalized value (clamped to [0, 1]).
pub fn hot_color(value: f32) -> Color {
    let value = value.clamp(0.0, 1.0);

    for pair in HOT_STOPS.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if value <= hi {
            return lo_color.lerp(hi_color, (value - lo) / (hi - lo));
        }
    }
    Color::WHITE
}

/// 256-entry lookup table, one color per intensity byte.
pub fn hot_lut() -> [Color; 256] {
    let mut lut = [Color::BLACK; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = hot_color(i as f32 / 255.0);
    }
    lut
}

/// Render an intensity raster as an RGB heatmap at its native resolution.
pub fn render_heatmap(intensity: &RasterBuffer) -> Result<RasterBuffer> {
    intensity.ensure_non_empty("intensity")?;

    let lut = hot_lut();
    let mut pixels = Vec::with_capacity(intensity.pixel_count() * 3);
    for index in 0..intensity.pixel_count() {
        pixels.extend_from_slice(&lut[intensity.first_channel(index) as usize].as_array());
    }

    RasterBuffer::rgb(intensity.width(), intensity.height(), pixels)
}
