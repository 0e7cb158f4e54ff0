//! Tests for file and memory source acquisition.

use overlay_common::{OverlayError, PixelLayout};
use overlay_session::{acquire_pair, FileLoader, MemoryLoader, SourceLoader};
use test_utils::{coordinate_rgb, fixture_dir, horizontal_ramp, write_bytes, write_png};

#[tokio::test]
async fn test_file_loader_decodes_rgb_png() {
    let dir = fixture_dir();
    let raster = coordinate_rgb(5, 3);
    let path = write_png(dir.path(), "base.png", &raster);

    let loaded = FileLoader::new().load(path.to_str().unwrap()).await.unwrap();

    assert_eq!(loaded, raster);
}

#[tokio::test]
async fn test_file_loader_decodes_gray_png() {
    let dir = fixture_dir();
    let raster = horizontal_ramp(8, 2);
    write_png(dir.path(), "anomaly_u8.png", &raster);

    let loaded = FileLoader::with_root(dir.path()).load("anomaly_u8.png").await.unwrap();

    assert_eq!(loaded.layout(), PixelLayout::Gray);
    assert_eq!(loaded, raster);
}

#[tokio::test]
async fn test_file_loader_missing_file() {
    let dir = fixture_dir();
    let err = FileLoader::with_root(dir.path()).load("nope.png").await.unwrap_err();

    match err {
        OverlayError::Acquisition { source_name, .. } => assert_eq!(source_name, "nope.png"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_file_loader_corrupt_file() {
    let dir = fixture_dir();
    write_bytes(dir.path(), "broken.png", b"\x89PNG\r\n\x1a\ntruncated");

    let err = FileLoader::with_root(dir.path()).load("broken.png").await.unwrap_err();

    assert!(matches!(err, OverlayError::Acquisition { .. }));
}

#[tokio::test]
async fn test_memory_loader_missing_key() {
    let err = MemoryLoader::new().load("base").await.unwrap_err();
    assert_eq!(err.code(), "AcquisitionFailure");
}

#[tokio::test]
async fn test_acquire_pair_fails_without_partial_result() {
    let loader = MemoryLoader::new().with("base", coordinate_rgb(2, 2));

    let err = acquire_pair(&loader, "base", "intensity").await.unwrap_err();

    match err {
        OverlayError::Acquisition { source_name, .. } => assert_eq!(source_name, "intensity"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_acquire_pair_from_files() {
    let dir = fixture_dir();
    write_png(dir.path(), "t1.png", &coordinate_rgb(6, 4));
    write_png(dir.path(), "anomaly.png", &horizontal_ramp(3, 2));

    let pair = acquire_pair(&FileLoader::with_root(dir.path()), "t1.png", "anomaly.png")
        .await
        .unwrap();

    assert_eq!((pair.base.width(), pair.base.height()), (6, 4));
    assert_eq!((pair.intensity.width(), pair.intensity.height()), (3, 2));
}
