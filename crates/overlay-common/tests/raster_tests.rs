//! Tests for RasterBuffer construction and accessors.

use overlay_common::{OverlayError, PixelLayout, RasterBuffer};

#[test]
fn test_new_accepts_matching_length() {
    let raster = RasterBuffer::rgb(2, 3, vec![0; 18]).unwrap();
    assert_eq!(raster.width(), 2);
    assert_eq!(raster.height(), 3);
    assert_eq!(raster.channels(), 3);
    assert_eq!(raster.pixel_count(), 6);
}

#[test]
fn test_new_rejects_wrong_length() {
    let err = RasterBuffer::rgba(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(err, OverlayError::InvalidBuffer(_)));
}

#[test]
fn test_zero_sized_raster_is_constructible_but_empty() {
    let raster = RasterBuffer::gray(0, 5, Vec::new()).unwrap();
    assert!(raster.is_empty());
    let err = raster.ensure_non_empty("intensity").unwrap_err();
    assert!(matches!(err, OverlayError::DimensionMismatch(_)));
}

#[test]
fn test_filled() {
    let raster = RasterBuffer::filled(3, 2, PixelLayout::Rgb, &[1, 2, 3]).unwrap();
    assert_eq!(raster.data().len(), 18);
    assert_eq!(raster.pixel_at(2, 1), &[1, 2, 3]);
}

#[test]
fn test_filled_rejects_wrong_pixel_width() {
    assert!(RasterBuffer::filled(1, 1, PixelLayout::Rgba, &[1, 2, 3]).is_err());
}

#[test]
fn test_pixel_indexing_is_row_major() {
    let data: Vec<u8> = (0..6).collect();
    let raster = RasterBuffer::gray(3, 2, data).unwrap();
    assert_eq!(raster.pixel_at(0, 1), &[3]);
    assert_eq!(raster.first_channel(5), 5);
}

#[test]
fn test_ensure_color() {
    let gray = RasterBuffer::gray(1, 1, vec![0]).unwrap();
    assert!(gray.ensure_color("base").is_err());
    let rgb = RasterBuffer::rgb(1, 1, vec![0, 0, 0]).unwrap();
    assert!(rgb.ensure_color("base").is_ok());
}
