//! Conversion between decoded images and raster buffers.
//!
//! Format handling is delegated to the `image` crate; this module only maps
//! its pixel types onto [`RasterBuffer`] layouts and back.

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};
use overlay_common::{OverlayError, PixelLayout, RasterBuffer, Result};

/// Decode an encoded image (PNG, JPEG, TIFF, ...) into a raster.
///
/// `source_name` only labels the error on failure.
pub fn decode(bytes: &[u8], source_name: &str) -> Result<RasterBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| OverlayError::acquisition(source_name, format!("decode failed: {}", e)))?;
    from_dynamic(img)
}

/// Convert a decoded image into a raster, keeping its channel layout.
///
/// 8-bit gray, RGB and RGBA map directly. Gray+alpha drops the alpha;
/// higher bit depths are reduced to 8-bit RGB or RGBA.
pub fn from_dynamic(img: DynamicImage) -> Result<RasterBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    if matches!(img, DynamicImage::ImageLumaA8(_)) {
        return RasterBuffer::gray(width, height, img.to_luma8().into_raw());
    }

    match img {
        DynamicImage::ImageLuma8(buf) => RasterBuffer::gray(width, height, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => RasterBuffer::rgb(width, height, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => RasterBuffer::rgba(width, height, buf.into_raw()),
        other if other.color().has_alpha() => {
            RasterBuffer::rgba(width, height, other.to_rgba8().into_raw())
        }
        other => RasterBuffer::rgb(width, height, other.to_rgb8().into_raw()),
    }
}

fn color_type(layout: PixelLayout) -> ColorType {
    match layout {
        PixelLayout::Gray => ColorType::L8,
        PixelLayout::Rgb => ColorType::Rgb8,
        PixelLayout::Rgba => ColorType::Rgba8,
    }
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &RasterBuffer) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut cursor,
        raster.data(),
        raster.width() as u32,
        raster.height() as u32,
        color_type(raster.layout()),
        ImageFormat::Png,
    )
    .map_err(|e| OverlayError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Write a raster to `path`; the format follows the file extension.
pub fn save(raster: &RasterBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        raster.data(),
        raster.width() as u32,
        raster.height() as u32,
        color_type(raster.layout()),
    )
    .map_err(|e| OverlayError::Encode(format!("{}: {}", path.display(), e)))
}
