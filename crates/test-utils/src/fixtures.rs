//! Image file fixtures for acquisition tests.
//!
//! Fixtures are written into a [`tempfile::TempDir`] that is removed when
//! dropped, so tests never depend on checked-in data.

use std::path::{Path, PathBuf};

use overlay_common::{PixelLayout, RasterBuffer};
use tempfile::TempDir;

/// Create a fresh temporary directory for fixtures.
pub fn fixture_dir() -> TempDir {
    tempfile::tempdir().expect("create fixture dir")
}

/// Write `raster` as a PNG named `name` inside `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, raster: &RasterBuffer) -> PathBuf {
    let path = dir.join(name);
    let color = match raster.layout() {
        PixelLayout::Gray => image::ColorType::L8,
        PixelLayout::Rgb => image::ColorType::Rgb8,
        PixelLayout::Rgba => image::ColorType::Rgba8,
    };
    image::save_buffer_with_format(
        &path,
        raster.data(),
        raster.width() as u32,
        raster.height() as u32,
        color,
        image::ImageFormat::Png,
    )
    .expect("write png fixture");
    path
}

/// Write arbitrary bytes to `name` inside `dir`, e.g. a corrupt image.
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture bytes");
    path
}
