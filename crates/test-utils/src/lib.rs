//! Shared test utilities for the anomaly-overlay workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Raster generators (uniform, gradient, checkerboard)
//! - Image file fixtures written to temporary directories
//! - Approximate-equality assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert every pixel of a raster equals `expected`.
#[macro_export]
macro_rules! assert_all_pixels {
    ($raster:expr, $expected:expr) => {{
        let raster = &$raster;
        let expected: &[u8] = &$expected;
        for index in 0..raster.pixel_count() {
            assert_eq!(
                raster.pixel(index),
                expected,
                "pixel {} of {}x{} raster",
                index,
                raster.width(),
                raster.height()
            );
        }
    }};
}
